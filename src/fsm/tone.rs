//! Tone actuator: steps through a fixed note table while the alarm sounds.
//!
//! ```text
//!   Init ──▶ Off ──(active)──▶ On ──(inactive)──▶ Reset ──▶ Off
//!                               │ play NOTE_TABLE[cursor], cursor += 1
//!                               └─ wraps to 0 at the end of the table
//! ```

use crate::app::ports::ToneTimer;
use crate::drivers::tone::ToneGenerator;
use crate::fsm::{Fsm, Step};
use crate::shared::SharedState;

/// Alarm melody in Hz, one entry per tick.  Repeated entries hold the
/// note; 0 is a rest.
pub const NOTE_TABLE: [u16; 8] = [1047, 1047, 1319, 1319, 1568, 1568, 2093, 0];

state_ids! {
    /// Tone actuator states.
    pub enum ToneState initial Init {
        Init = 0,
        Off = 1,
        On = 2,
        Reset = 3,
    }
}

/// Pure transition function of the alarm-active flag.
pub fn transition(state: ToneState, alarm_active: bool) -> ToneState {
    use ToneState::*;

    match (state, alarm_active) {
        (Init | Reset, _) => Off,
        (Off, true) | (On, true) => On,
        (Off, false) => Off,
        (On, false) => Reset,
    }
}

pub struct Tone {
    fsm: Fsm<ToneState>,
    generator: ToneGenerator,
    cursor: usize,
    /// Completed passes through the table.
    passes: u32,
}

impl Tone {
    pub fn new(timer_clock_hz: u32) -> Self {
        Self {
            fsm: Fsm::new("tone"),
            generator: ToneGenerator::new(timer_clock_hz),
            cursor: 0,
            passes: 0,
        }
    }

    pub fn state(&self) -> ToneState {
        self.fsm.current_state()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn passes(&self) -> u32 {
        self.passes
    }

    pub fn generator(&self) -> &ToneGenerator {
        &self.generator
    }

    pub fn fsm_mut(&mut self) -> &mut Fsm<ToneState> {
        &mut self.fsm
    }

    pub fn tick(&mut self, shared: &SharedState, timer: &mut impl ToneTimer) -> Step<ToneState> {
        let active = shared.alarm_active();
        let step = self.fsm.step(|s| transition(s, active));

        match step.to {
            ToneState::Init | ToneState::Off => {}
            ToneState::On => {
                self.generator.set_frequency(timer, NOTE_TABLE[self.cursor]);
                self.cursor += 1;
                if self.cursor == NOTE_TABLE.len() {
                    self.cursor = 0;
                    self.passes += 1;
                }
            }
            ToneState::Reset => self.generator.silence(timer),
        }

        step
    }
}
