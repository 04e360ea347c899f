//! System configuration parameters
//!
//! All tunable parameters for both alarm clock nodes.  Defaults reproduce
//! the shipped firmware timing; a JSON document can override any field.

use embassy_time::Duration;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::scheduler::TaskId;
use crate::time::HourMode;

/// Core system configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemConfig {
    // --- Task periods ---
    /// Display-Time machine period (milliseconds)
    pub display_period_ms: u32,
    /// Set-Alarm session period (milliseconds)
    pub set_alarm_period_ms: u32,
    /// Set-Time session period (milliseconds)
    pub set_time_period_ms: u32,
    /// Light ramp period (milliseconds)
    pub light_period_ms: u32,
    /// Tone sequencer period (milliseconds)
    pub tone_period_ms: u32,
    /// Alarm-Check period (milliseconds)
    pub alarm_check_period_ms: u32,
    /// Remote off-switch period (milliseconds)
    pub remote_off_period_ms: u32,
    /// Scheduler quantum; every period must be a multiple of it
    pub base_tick_ms: u32,

    // --- Alarm ---
    /// Trigger when the alarm is this many minutes away or closer
    pub alarm_lead_minutes: u16,
    /// Re-send "alarm active" after this long without an off confirmation.
    /// `None` waits forever.
    pub handshake_timeout_secs: Option<u32>,

    // --- Display ---
    /// Display-Time idle ticks between re-renders
    pub display_refresh_ticks: u16,
    /// Hour convention at boot
    pub initial_hour_mode: HourMode,

    // --- Actuators ---
    /// Light ramp ceiling (duty 0-255)
    pub light_max_level: u8,
    /// Input clock of the tone timer (Hz)
    pub tone_timer_clock_hz: u32,

    // --- Remote ---
    /// Contact samples required before "off" is sent
    pub off_hold_ticks: u16,

    // --- Telemetry ---
    /// Status report interval (seconds); 0 disables the reports
    pub status_interval_secs: u32,
}

impl Default for SystemConfig {
    fn default() -> Self {
        Self {
            // Task periods
            display_period_ms: 200,
            set_alarm_period_ms: 50,
            set_time_period_ms: 50,
            light_period_ms: 200,
            tone_period_ms: 200,
            alarm_check_period_ms: 1000,
            remote_off_period_ms: 100,
            base_tick_ms: 50,

            // Alarm
            alarm_lead_minutes: 10,
            handshake_timeout_secs: None,

            // Display
            display_refresh_ticks: 150, // 30 s at 200 ms
            initial_hour_mode: HourMode::Twelve,

            // Actuators
            light_max_level: 255,
            tone_timer_clock_hz: 1_000_000,

            // Remote
            off_hold_ticks: 30, // 3 s at 100 ms

            // Telemetry
            status_interval_secs: 60,
        }
    }
}

impl SystemConfig {
    /// Period in milliseconds of `task`.
    pub fn task_period_ms(&self, task: TaskId) -> u32 {
        match task {
            TaskId::DisplayTime => self.display_period_ms,
            TaskId::SetAlarm => self.set_alarm_period_ms,
            TaskId::SetTime => self.set_time_period_ms,
            TaskId::AlarmCheck => self.alarm_check_period_ms,
            TaskId::Light => self.light_period_ms,
            TaskId::Tone => self.tone_period_ms,
            TaskId::RemoteOff => self.remote_off_period_ms,
        }
    }

    pub fn task_period(&self, task: TaskId) -> Duration {
        Duration::from_millis(u64::from(self.task_period_ms(task)))
    }

    pub fn base_tick(&self) -> Duration {
        Duration::from_millis(u64::from(self.base_tick_ms))
    }

    /// Number of Alarm-Check ticks after which an unanswered handshake is
    /// re-sent, if a timeout is configured.
    pub fn handshake_timeout_ticks(&self) -> Option<u64> {
        let secs = self.handshake_timeout_secs?;
        let period = u64::from(self.alarm_check_period_ms.max(1));
        Some((u64::from(secs) * 1000).div_ceil(period).max(1))
    }

    /// Status timer period, or `None` when reports are switched off.
    pub fn status_period_ms(&self) -> Option<u32> {
        (self.status_interval_secs > 0).then(|| self.status_interval_secs.saturating_mul(1000))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_tick_ms == 0 {
            return Err(ConfigError::ValidationFailed("base_tick_ms must be non-zero"));
        }
        for task in TaskId::MAIN_UNIT.into_iter().chain(TaskId::REMOTE_UNIT) {
            let period = self.task_period_ms(task);
            if period == 0 {
                return Err(ConfigError::ValidationFailed("task period must be non-zero"));
            }
            if period % self.base_tick_ms != 0 {
                return Err(ConfigError::ValidationFailed(
                    "task period must be a multiple of base_tick_ms",
                ));
            }
        }
        if self.display_refresh_ticks == 0 {
            return Err(ConfigError::ValidationFailed(
                "display_refresh_ticks must be non-zero",
            ));
        }
        if self.light_max_level == 0 {
            return Err(ConfigError::ValidationFailed("light_max_level must be non-zero"));
        }
        if self.tone_timer_clock_hz == 0 {
            return Err(ConfigError::ValidationFailed(
                "tone_timer_clock_hz must be non-zero",
            ));
        }
        if self.off_hold_ticks == 0 {
            return Err(ConfigError::ValidationFailed("off_hold_ticks must be non-zero"));
        }
        if self.handshake_timeout_secs == Some(0) {
            return Err(ConfigError::ValidationFailed(
                "handshake_timeout_secs must be non-zero when set",
            ));
        }
        Ok(())
    }
}
