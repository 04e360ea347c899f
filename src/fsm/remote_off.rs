//! Remote off-switch: the second node's only machine.
//!
//! ```text
//!   Init ──▶ WaitAlarm ──(byte in)──▶ WaitPress ──(contact)──▶ Confirming
//!               ▲                        ▲                        │  │
//!               │                        └────(released early)────┘  │
//!               └────(sent)──── SendOff ◀──(hold ≥ off_hold_ticks)───┘
//! ```
//!
//! The hold threshold is checked before the contact, so a press that
//! lasts exactly `off_hold_ticks` samples counts.

use log::info;

use crate::app::events::AppEvent;
use crate::app::ports::{ContactSensor, EventSink, ProgressIndicator, SerialPort};
use crate::fsm::{Fsm, Step};

/// Byte sent to the main unit once the press is confirmed.
pub const MSG_OFF: u8 = 0x01;

/// Progress pattern while sending.
const PROGRESS_FULL: u8 = 0xFF;

state_ids! {
    /// Remote off-switch states.
    pub enum RemoteOffState initial Init {
        Init = 0,
        WaitAlarm = 1,
        WaitPress = 2,
        Confirming = 3,
        SendOff = 4,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RemoteOffInputs {
    /// A non-zero byte arrived from the main unit.
    pub alarm_heard: bool,
    pub contact: bool,
    /// Contact samples counted so far in Confirming.
    pub hold: u16,
    pub hold_limit: u16,
    pub sent: bool,
    pub transmitted: bool,
}

/// Pure transition function.
pub fn transition(state: RemoteOffState, inputs: &RemoteOffInputs) -> RemoteOffState {
    use RemoteOffState::*;

    match state {
        Init => WaitAlarm,
        WaitAlarm if inputs.alarm_heard => WaitPress,
        WaitAlarm => WaitAlarm,
        WaitPress if inputs.contact => Confirming,
        WaitPress => WaitPress,
        Confirming if inputs.hold >= inputs.hold_limit => SendOff,
        Confirming if !inputs.contact => WaitPress,
        Confirming => Confirming,
        SendOff if inputs.sent && inputs.transmitted => WaitAlarm,
        SendOff => SendOff,
    }
}

pub struct RemoteOff {
    fsm: Fsm<RemoteOffState>,
    hold_limit: u16,
    hold: u16,
    sent: bool,
    /// Last pattern written to the indicator.
    shown: Option<u8>,
}

impl RemoteOff {
    pub fn new(hold_limit: u16) -> Self {
        Self {
            fsm: Fsm::new("remote-off"),
            hold_limit,
            hold: 0,
            sent: false,
            shown: None,
        }
    }

    pub fn state(&self) -> RemoteOffState {
        self.fsm.current_state()
    }

    pub fn hold(&self) -> u16 {
        self.hold
    }

    pub fn fsm(&self) -> &Fsm<RemoteOffState> {
        &self.fsm
    }

    pub fn fsm_mut(&mut self) -> &mut Fsm<RemoteOffState> {
        &mut self.fsm
    }

    pub fn tick<B>(&mut self, hw: &mut B, sink: &mut impl EventSink) -> Step<RemoteOffState>
    where
        B: SerialPort + ContactSensor + ProgressIndicator,
    {
        let state = self.fsm.current_state();
        let sampling = matches!(
            state,
            RemoteOffState::WaitPress | RemoteOffState::Confirming
        );
        let inputs = RemoteOffInputs {
            alarm_heard: state == RemoteOffState::WaitAlarm && poll_inbound(hw),
            contact: sampling && hw.is_contact(),
            hold: self.hold,
            hold_limit: self.hold_limit,
            sent: self.sent,
            transmitted: self.sent && hw.has_transmitted(),
        };
        let step = self.fsm.step(|s| transition(s, &inputs));

        let pattern = match step.to {
            RemoteOffState::Init => 0,
            RemoteOffState::WaitAlarm => {
                if step.entered(RemoteOffState::WaitAlarm) && step.from == RemoteOffState::SendOff {
                    // Drop re-sent "alarm active" bytes that arrived during the press.
                    hw.flush();
                }
                self.sent = false;
                0
            }
            RemoteOffState::WaitPress => {
                if step.entered(RemoteOffState::WaitPress) {
                    if step.from == RemoteOffState::WaitAlarm {
                        info!("remote-off: alarm active, waiting for press");
                        sink.emit(&AppEvent::RemoteAlarmHeard);
                    }
                    self.hold = 0;
                }
                0
            }
            RemoteOffState::Confirming => {
                self.hold = self.hold.saturating_add(1);
                self.hold.min(u16::from(u8::MAX - 1)) as u8
            }
            RemoteOffState::SendOff => {
                if !self.sent && hw.is_send_ready() {
                    hw.send(MSG_OFF);
                    self.sent = true;
                    info!("remote-off: press held {} ticks, off sent", self.hold);
                    sink.emit(&AppEvent::OffSent);
                }
                PROGRESS_FULL
            }
        };

        if self.shown != Some(pattern) {
            hw.show(pattern);
            self.shown = Some(pattern);
        }

        step
    }
}

fn poll_inbound(serial: &mut impl SerialPort) -> bool {
    if !serial.has_received() {
        return false;
    }
    let byte = serial.receive();
    serial.flush();
    byte != 0
}
