//! Alarm-Check: decides when the alarm is due and runs the main-unit side
//! of the on/off handshake.
//!
//! ```text
//!   Init ──▶ Check ──(armed ∧ due)──▶ SendActive ──(0x01 out)──▶ AwaitRemoteOff
//!              ▲                          ▲                          │  │
//!              │                          └──────(timeout, opt.)─────┘  │
//!              └──────────────── Reset ◀──────(non-zero byte in)────────┘
//! ```
//!
//! Runs whatever the UI is doing.  It is the only writer of the shared
//! alarm-active flag.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::{EventSink, SerialPort};
use crate::fsm::{Fsm, Step};
use crate::shared::SharedState;
use crate::time::{FULL_DAY_MINUTES, HourMode, TimeOfDay, TimeSnapshot};

/// Byte sent to the remote when the alarm goes off.
pub const MSG_ALARM_ACTIVE: u8 = 0x01;

state_ids! {
    /// Alarm-Check states.
    pub enum AlarmCheckState initial Init {
        Init = 0,
        Check = 1,
        SendActive = 2,
        AwaitRemoteOff = 3,
        Reset = 4,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AlarmCheckInputs {
    /// Armed and within the lead window.
    pub due: bool,
    /// "Alarm active" has been handed to the transport this visit.
    pub sent: bool,
    /// The transport reports the last byte has left.
    pub transmitted: bool,
    /// A non-zero byte arrived from the remote.
    pub off_received: bool,
    /// The configured handshake timeout has run out.
    pub timed_out: bool,
}

/// Pure transition function.
pub fn transition(state: AlarmCheckState, inputs: &AlarmCheckInputs) -> AlarmCheckState {
    use AlarmCheckState::*;

    match state {
        Init => Check,
        Check if inputs.due => SendActive,
        Check => Check,
        SendActive if inputs.sent && inputs.transmitted => AwaitRemoteOff,
        SendActive => SendActive,
        AwaitRemoteOff if inputs.off_received => Reset,
        AwaitRemoteOff if inputs.timed_out => SendActive,
        AwaitRemoteOff => AwaitRemoteOff,
        Reset => Check,
    }
}

/// Minutes from `now` forward to `alarm`, folded onto one day.  An alarm
/// that has just passed is almost a day away, never negative.
pub fn minutes_until(now: &TimeSnapshot, mode: HourMode, alarm: TimeOfDay) -> u16 {
    let delta = alarm.minutes_of_day() - now.minutes_of_day(mode);
    delta.rem_euclid(FULL_DAY_MINUTES) as u16
}

/// The Alarm-Check machine.
pub struct AlarmCheck {
    fsm: Fsm<AlarmCheckState>,
    lead_minutes: u16,
    /// Ticks in AwaitRemoteOff before "alarm active" is re-sent.
    timeout_ticks: Option<u64>,
    sent: bool,
    last_minutes_until: Option<u16>,
}

impl AlarmCheck {
    pub fn new(lead_minutes: u16, timeout_ticks: Option<u64>) -> Self {
        Self {
            fsm: Fsm::new("alarm-check"),
            lead_minutes,
            timeout_ticks,
            sent: false,
            last_minutes_until: None,
        }
    }

    pub fn state(&self) -> AlarmCheckState {
        self.fsm.current_state()
    }

    pub fn fsm(&self) -> &Fsm<AlarmCheckState> {
        &self.fsm
    }

    pub fn fsm_mut(&mut self) -> &mut Fsm<AlarmCheckState> {
        &mut self.fsm
    }

    /// Distance computed on the most recent Check tick with an armed alarm
    /// and a clock reading.
    pub fn last_minutes_until(&self) -> Option<u16> {
        self.last_minutes_until
    }

    pub fn tick(
        &mut self,
        shared: &SharedState,
        serial: &mut impl SerialPort,
        sink: &mut impl EventSink,
    ) -> Step<AlarmCheckState> {
        let state = self.fsm.current_state();
        let inputs = AlarmCheckInputs {
            due: state == AlarmCheckState::Check && self.evaluate(shared),
            sent: self.sent,
            transmitted: self.sent && serial.has_transmitted(),
            off_received: state == AlarmCheckState::AwaitRemoteOff && poll_inbound(serial),
            timed_out: state == AlarmCheckState::AwaitRemoteOff
                && self
                    .timeout_ticks
                    // Counts this tick too: the limit-th tick in the state retries.
                    .is_some_and(|limit| self.fsm.ticks_in_current_state() + 1 >= limit),
        };
        let step = self.fsm.step(|s| transition(s, &inputs));

        match step.to {
            AlarmCheckState::Init | AlarmCheckState::Check => {}
            AlarmCheckState::SendActive => {
                if step.entered(AlarmCheckState::SendActive) {
                    self.sent = false;
                    if step.from == AlarmCheckState::AwaitRemoteOff {
                        warn!("alarm-check: no off confirmation, re-sending");
                        sink.emit(&AppEvent::HandshakeRetry);
                    } else {
                        // A fresh alarm: nothing already buffered can be its "off".
                        serial.flush();
                        let minutes_until = self.last_minutes_until.unwrap_or(0);
                        info!("alarm-check: alarm due in {} min, sounding", minutes_until);
                        shared.set_alarm_active(true);
                        sink.emit(&AppEvent::AlarmTriggered { minutes_until });
                    }
                }
                if !self.sent && serial.is_send_ready() {
                    serial.send(MSG_ALARM_ACTIVE);
                    self.sent = true;
                }
            }
            AlarmCheckState::AwaitRemoteOff => {
                self.sent = false;
            }
            AlarmCheckState::Reset => {
                info!("alarm-check: off confirmed, alarm cleared");
                shared.set_alarm_active(false);
                shared.clear_alarm();
                sink.emit(&AppEvent::AlarmSilenced);
            }
        }

        step
    }

    /// Armed and within the lead window of the latest snapshot.
    fn evaluate(&mut self, shared: &SharedState) -> bool {
        let alarm = shared.alarm();
        if !alarm.armed {
            return false;
        }
        let Some(now) = shared.snapshot() else {
            return false;
        };
        let distance = minutes_until(&now, shared.hour_mode(), alarm.time);
        self.last_minutes_until = Some(distance);
        distance <= self.lead_minutes
    }
}

/// Read one pending byte, if any, and drop whatever else is buffered.
fn poll_inbound(serial: &mut impl SerialPort) -> bool {
    if !serial.has_received() {
        return false;
    }
    let byte = serial.receive();
    serial.flush();
    byte != 0
}
