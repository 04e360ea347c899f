//! Cooperative finite state machine engine.
//!
//! Every task on both nodes is a tagged `#[repr(u8)]` state enum plus two
//! functions:
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  one tick                                                    │
//! │                                                              │
//! │   inputs ──▶ transition(state, &inputs) ──▶ next state       │
//! │                 (pure)                          │            │
//! │                                                 ▼            │
//! │                                  action(next) ──▶ ports      │
//! │                                   (effects)                  │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The transition runs first, then the action of the (possibly new)
//! current state.  [`Fsm`] holds only the bookkeeping shared by all
//! machines: current state, tick counters, and transition logging.
//! No tick ever blocks; waiting means "return the same state".

use core::fmt::Debug;

use log::{debug, warn};

// ---------------------------------------------------------------------------
// State identity
// ---------------------------------------------------------------------------

/// Identity of one machine's states.
pub trait StateId: Copy + PartialEq + Debug {
    /// State the machine boots into and falls back to on corruption.
    const INITIAL: Self;

    fn name(self) -> &'static str;

    fn to_raw(self) -> u8;

    /// `None` for bytes that name no state.
    fn from_raw(raw: u8) -> Option<Self>;
}

/// Declare a `#[repr(u8)]` state enum together with its [`StateId`] impl.
macro_rules! state_ids {
    (
        $(#[$meta:meta])*
        pub enum $name:ident initial $initial:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $raw:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u8)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $raw ),+
        }

        impl $crate::fsm::StateId for $name {
            const INITIAL: Self = Self::$initial;

            fn name(self) -> &'static str {
                match self {
                    $( Self::$variant => stringify!($variant) ),+
                }
            }

            fn to_raw(self) -> u8 {
                self as u8
            }

            fn from_raw(raw: u8) -> Option<Self> {
                match raw {
                    $( $raw => Some(Self::$variant), )+
                    _ => None,
                }
            }
        }
    };
}

pub mod admin;
pub mod alarm_check;
pub mod display_time;
pub mod light;
pub mod remote_off;
pub mod render;
pub mod session;
pub mod tone;

// ---------------------------------------------------------------------------
// Step record
// ---------------------------------------------------------------------------

/// Result of one [`Fsm::step`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step<S> {
    pub from: S,
    pub to: S,
}

impl<S: PartialEq + Copy> Step<S> {
    pub fn changed(&self) -> bool {
        self.from != self.to
    }

    /// True on the tick the machine moved into `state`.
    pub fn entered(&self, state: S) -> bool {
        self.changed() && self.to == state
    }
}

// ---------------------------------------------------------------------------
// FSM engine
// ---------------------------------------------------------------------------

/// State bookkeeping for one machine.
#[derive(Debug, Clone)]
pub struct Fsm<S: StateId> {
    /// Machine name used in transition logs.
    machine: &'static str,
    current: S,
    /// Monotonically increasing tick counter.
    tick_count: u64,
    /// Tick at which the current state was entered.
    state_entry_tick: u64,
}

impl<S: StateId> Fsm<S> {
    pub fn new(machine: &'static str) -> Self {
        Self {
            machine,
            current: S::INITIAL,
            tick_count: 0,
            state_entry_tick: 0,
        }
    }

    /// Advance one tick: feed the current state to `transition` and record
    /// the result.  The caller runs the action for `step.to` afterwards.
    pub fn step(&mut self, transition: impl FnOnce(S) -> S) -> Step<S> {
        self.tick_count += 1;
        let from = self.current;
        let to = transition(from);
        if to != from {
            debug!("{}: {} -> {}", self.machine, from.name(), to.name());
            self.current = to;
            self.state_entry_tick = self.tick_count;
        }
        Step { from, to }
    }

    /// Jump to `next` outside the normal transition function.
    pub fn force_transition(&mut self, next: S) {
        if next != self.current {
            debug!(
                "{}: {} -> {} (forced)",
                self.machine,
                self.current.name(),
                next.name()
            );
            self.current = next;
            self.state_entry_tick = self.tick_count;
        }
    }

    pub fn reset(&mut self) {
        self.force_transition(S::INITIAL);
    }

    /// Reinstate a state from its raw byte.  A byte that names no state
    /// resets the machine to its initial state.
    pub fn restore_raw(&mut self, raw: u8) -> S {
        match S::from_raw(raw) {
            Some(state) => self.force_transition(state),
            None => {
                warn!(
                    "{}: invalid state byte 0x{:02x}, resetting to {}",
                    self.machine,
                    raw,
                    S::INITIAL.name()
                );
                self.reset();
            }
        }
        self.current
    }

    pub fn current_state(&self) -> S {
        self.current
    }

    /// How many ticks the machine has spent in the current state; 0 on
    /// the tick it was entered.
    pub fn ticks_in_current_state(&self) -> u64 {
        self.tick_count - self.state_entry_tick
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn machine(&self) -> &'static str {
        self.machine
    }
}
