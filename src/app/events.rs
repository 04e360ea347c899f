//! Outbound application events.
//!
//! The services emit these through the
//! [`EventSink`](super::ports::EventSink) port.  Adapters on the other
//! side decide what to do with them: log to serial, count them in tests,
//! and so on.

use serde::Serialize;

use crate::error::ClockError;
use crate::fsm::admin::UiOwner;
use crate::scheduler::TaskId;
use crate::shared::AlarmSetting;
use crate::time::{HourMode, TimeOfDay, TimeSnapshot};

/// Which board a service runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Node {
    Main,
    Remote,
}

/// Structured events emitted by the application core.
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    /// A service has started.
    Started(Node),

    /// One task's state machine moved.
    StateChanged {
        task: TaskId,
        from: &'static str,
        to: &'static str,
    },

    /// The admin token changed hands.
    TokenTransferred { from: UiOwner, to: UiOwner },

    HourModeChanged(HourMode),

    /// Set-Alarm committed a new alarm.
    AlarmArmed(TimeOfDay),

    /// Set-Time wrote a new time to the RTC.
    ClockSet(TimeOfDay),

    /// The alarm came due and the alarm-active flag was raised.
    AlarmTriggered { minutes_until: u16 },

    /// No off confirmation within the configured window; "alarm active"
    /// is being sent again.
    HandshakeRetry,

    /// Off confirmed by the remote; the alarm is cleared.
    AlarmSilenced,

    /// The remote received "alarm active".
    RemoteAlarmHeard,

    /// The remote sent "off" after a sustained press.
    OffSent,

    ClockFault(ClockError),

    /// Periodic status report.
    Status(StatusReport),
}

/// A point-in-time status snapshot suitable for logging.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatusReport {
    pub owner: UiOwner,
    pub hour_mode: HourMode,
    pub time: Option<TimeSnapshot>,
    pub alarm: AlarmSetting,
    pub alarm_active: bool,
    pub alarm_check_state: &'static str,
    pub light_level: u8,
    pub tone_hz: u16,
}
