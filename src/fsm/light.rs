//! Light actuator: a brightness ramp that follows the alarm-active flag.
//!
//! ```text
//!   Init ──▶ Off ──(active)──▶ On ──(inactive)──▶ Reset ──▶ Off
//!             ▲                 │ level += 1 per tick
//!             └─────────────────┘   up to light_max_level
//! ```

use crate::app::ports::LightPort;
use crate::fsm::{Fsm, Step};
use crate::shared::SharedState;

state_ids! {
    /// Light actuator states.
    pub enum LightState initial Init {
        Init = 0,
        Off = 1,
        On = 2,
        Reset = 3,
    }
}

/// Pure transition function of the alarm-active flag.
pub fn transition(state: LightState, alarm_active: bool) -> LightState {
    use LightState::*;

    match (state, alarm_active) {
        (Init | Reset, _) => Off,
        (Off, true) => On,
        (Off, false) => Off,
        (On, true) => On,
        (On, false) => Reset,
    }
}

pub struct Light {
    fsm: Fsm<LightState>,
    max_level: u8,
    level: u8,
    /// Last duty written to the port.
    written: Option<u8>,
}

impl Light {
    pub fn new(max_level: u8) -> Self {
        Self {
            fsm: Fsm::new("light"),
            max_level,
            level: 0,
            written: None,
        }
    }

    pub fn state(&self) -> LightState {
        self.fsm.current_state()
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn fsm_mut(&mut self) -> &mut Fsm<LightState> {
        &mut self.fsm
    }

    pub fn tick(&mut self, shared: &SharedState, light: &mut impl LightPort) -> Step<LightState> {
        let active = shared.alarm_active();
        let step = self.fsm.step(|s| transition(s, active));

        match step.to {
            LightState::Init | LightState::Off => {}
            LightState::On => {
                if self.level < self.max_level {
                    self.level += 1;
                }
            }
            LightState::Reset => self.level = 0,
        }

        // Init and Off leave the level untouched, so this writes only on
        // the first tick and on real changes.
        if self.written != Some(self.level) {
            light.set_duty(self.level);
            self.written = Some(self.level);
        }

        step
    }
}
