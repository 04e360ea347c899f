//! Main-unit service: the hexagonal core of the clock node.
//!
//! [`MainUnit`] owns the shared state and the six cooperative machines.
//! The scheduler decides *when* a task runs; [`MainUnit::run_task`]
//! decides *what* that means.  All I/O flows through the port traits
//! bundled in [`MainBoard`], so the whole service runs against mocks.
//!
//! ```text
//!  Scheduler ──TaskId──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!                        │          MainUnit            │
//!  MainBoard  ◀─────────▶│ DisplayTime · SetAlarm ·     │
//!  (RTC, LCD, buttons,   │ SetTime · AlarmCheck ·       │
//!   UART, light, tone)   │ Light · Tone · SharedState   │
//!                        └──────────────────────────────┘
//! ```

use log::{info, warn};

use crate::config::SystemConfig;
use crate::fsm::alarm_check::{AlarmCheck, AlarmCheckState};
use crate::fsm::display_time::{DisplayState, DisplayTime};
use crate::fsm::light::Light;
use crate::fsm::session::{SessionState, SetAlarm, SetTime};
use crate::fsm::tone::Tone;
use crate::fsm::{StateId, Step};
use crate::scheduler::TaskId;
use crate::shared::SharedState;

use super::events::{AppEvent, Node, StatusReport};
use super::ports::{ClockPort, EventSink, MainBoard};

/// Forward a machine's step to the sink when it changed state.
pub(crate) fn report_step<S: StateId>(task: TaskId, step: Step<S>, sink: &mut impl EventSink) {
    if step.changed() {
        sink.emit(&AppEvent::StateChanged {
            task,
            from: step.from.name(),
            to: step.to.name(),
        });
    }
}

/// The clock node.
pub struct MainUnit {
    config: SystemConfig,
    shared: SharedState,
    display: DisplayTime,
    set_alarm: SetAlarm,
    set_time: SetTime,
    alarm_check: AlarmCheck,
    light: Light,
    tone: Tone,
}

impl MainUnit {
    /// Build every machine in its initial state.  Does not touch
    /// hardware; call [`start`](Self::start) next.
    pub fn new(config: SystemConfig) -> Self {
        Self {
            shared: SharedState::new(config.initial_hour_mode),
            display: DisplayTime::new(config.display_refresh_ticks),
            set_alarm: SetAlarm::new(),
            set_time: SetTime::new(),
            alarm_check: AlarmCheck::new(
                config.alarm_lead_minutes,
                config.handshake_timeout_ticks(),
            ),
            light: Light::new(config.light_max_level),
            tone: Tone::new(config.tone_timer_clock_hz),
            config,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Put the RTC into the configured hour convention and seed the
    /// display's view of the hour register.  A clock fault is reported
    /// and the unit starts anyway; Display-Time keeps retrying reads.
    pub fn start(&mut self, clock: &mut impl ClockPort, sink: &mut impl EventSink) {
        let mode = self.shared.hour_mode();
        match clock.read_time() {
            Ok(raw) => match clock.set_hour_mode(mode, raw.hour) {
                Ok(()) => {
                    if let Ok(raw) = clock.read_time() {
                        self.display.set_hour_register(raw.hour);
                    }
                }
                Err(e) => {
                    warn!("MainUnit: could not set hour mode: {}", e);
                    self.display.set_hour_register(raw.hour);
                    sink.emit(&AppEvent::ClockFault(e));
                }
            },
            Err(e) => {
                warn!("MainUnit: RTC unreadable at start: {}", e);
                sink.emit(&AppEvent::ClockFault(e));
            }
        }
        sink.emit(&AppEvent::Started(Node::Main));
        info!("MainUnit started ({:?})", mode);
    }

    // ── Per-task dispatch ─────────────────────────────────────

    /// Run one tick of `task`.
    pub fn run_task<B: MainBoard>(&mut self, task: TaskId, hw: &mut B, sink: &mut impl EventSink) {
        match task {
            TaskId::DisplayTime => {
                let step = self.display.tick(&self.shared, hw, sink);
                report_step(task, step, sink);
            }
            TaskId::SetAlarm => {
                let step = self.set_alarm.tick(&self.shared, hw, sink);
                report_step(task, step, sink);
            }
            TaskId::SetTime => {
                let step = self.set_time.tick(&self.shared, hw, sink);
                report_step(task, step, sink);
            }
            TaskId::AlarmCheck => {
                let step = self.alarm_check.tick(&self.shared, hw, sink);
                report_step(task, step, sink);
            }
            TaskId::Light => {
                let step = self.light.tick(&self.shared, hw);
                report_step(task, step, sink);
            }
            TaskId::Tone => {
                let step = self.tone.tick(&self.shared, hw);
                report_step(task, step, sink);
            }
            TaskId::RemoteOff => {
                warn!("MainUnit: {} is not a main-unit task", task.label());
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn build_status(&self) -> StatusReport {
        StatusReport {
            owner: self.shared.admin.owner(),
            hour_mode: self.shared.hour_mode(),
            time: self.shared.snapshot(),
            alarm: self.shared.alarm(),
            alarm_active: self.shared.alarm_active(),
            alarm_check_state: self.alarm_check.state().name(),
            light_level: self.light.level(),
            tone_hz: self.tone.generator().current_hz(),
        }
    }

    pub fn shared(&self) -> &SharedState {
        &self.shared
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    pub fn display_state(&self) -> DisplayState {
        self.display.state()
    }

    pub fn set_alarm_state(&self) -> SessionState {
        self.set_alarm.state()
    }

    pub fn set_time_state(&self) -> SessionState {
        self.set_time.state()
    }

    pub fn alarm_check(&self) -> &AlarmCheck {
        &self.alarm_check
    }

    pub fn alarm_check_state(&self) -> AlarmCheckState {
        self.alarm_check.state()
    }

    pub fn light(&self) -> &Light {
        &self.light
    }

    pub fn tone(&self) -> &Tone {
        &self.tone
    }
}
