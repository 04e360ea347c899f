//! Set-Alarm and Set-Time: one editing session machine, two flavours.
//!
//! ```text
//!   Init ──▶ Idle ──(token held, trigger up)──▶ Render ──▶ Editing
//!             ▲                                   ▲          │
//!             │                      HourInc ─────┤◀── Hour  │
//!             │                    MinuteInc ─────┘◀── Minute│
//!             │                                              │
//!             └──── Exit ◀──── Save ◀──── Select ────────────┤
//!                     ▲                                      │
//!                     └───────────────── Cancel ─────────────┘
//! ```
//!
//! The two sessions differ only in who they are, which button woke them
//! and what Save does.  That difference lives in [`SessionKind`].

use core::marker::PhantomData;

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::{ButtonPort, ClockPort, DisplayPort, EventSink};
use crate::error::ClockError;
use crate::fsm::admin::UiOwner;
use crate::fsm::{Fsm, Step, render};
use crate::input::{Button, Buttons};
use crate::shared::SharedState;
use crate::time::{HourMode, TimeOfDay, dec_to_bcd};

state_ids! {
    /// Session states shared by Set-Alarm and Set-Time.
    pub enum SessionState initial Init {
        Init = 0,
        Idle = 1,
        /// One-shot redraw of the staging value.
        Render = 2,
        Editing = 3,
        HourInc = 4,
        MinuteInc = 5,
        Save = 6,
        /// Reset staging and hand the token back.  Reached by Save and
        /// Cancel alike.
        Exit = 7,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionInputs {
    pub owned: bool,
    /// Button sample, all released when not owned.
    pub buttons: Buttons,
}

/// Pure transition function.  `trigger` is the button Display-Time
/// dispatched on; it must be released before the session starts.
pub fn transition(state: SessionState, inputs: &SessionInputs, trigger: Button) -> SessionState {
    use SessionState::*;

    match state {
        Init => Idle,
        Idle if inputs.owned && !inputs.buttons.is_pressed(trigger) => Render,
        Idle => Idle,
        // Token lost mid-session: leave without saving.
        Render | Editing | HourInc | MinuteInc | Save if !inputs.owned => Exit,
        Render => Editing,
        Editing => match inputs.buttons.chord() {
            Some(Button::Select) => Save,
            Some(Button::Cancel) => Exit,
            Some(Button::Minute) => MinuteInc,
            Some(Button::Hour) => HourInc,
            None => Editing,
        },
        HourInc | MinuteInc => Render,
        Save => Exit,
        Exit => Idle,
    }
}

// ---------------------------------------------------------------------------
// Session flavours
// ---------------------------------------------------------------------------

/// What distinguishes one editing session from another.
pub trait SessionKind {
    const OWNER: UiOwner;
    /// Machine name for logs.
    const NAME: &'static str;
    /// Screen title.
    const TITLE: &'static str;
    /// Button Display-Time dispatches on.
    const TRIGGER: Button;

    /// Apply a saved staging value.
    fn commit<C: ClockPort + ?Sized>(
        staging: TimeOfDay,
        shared: &SharedState,
        clock: &mut C,
        sink: &mut impl EventSink,
    );
}

/// Set-Alarm: Save arms the alarm.
#[derive(Debug)]
pub struct AlarmSession;

impl SessionKind for AlarmSession {
    const OWNER: UiOwner = UiOwner::SetAlarm;
    const NAME: &'static str = "set-alarm";
    const TITLE: &'static str = "Set Alarm";
    const TRIGGER: Button = Button::Select;

    fn commit<C: ClockPort + ?Sized>(
        staging: TimeOfDay,
        shared: &SharedState,
        _clock: &mut C,
        sink: &mut impl EventSink,
    ) {
        shared.arm_alarm(staging);
        info!(
            "set-alarm: armed for {:02}:{:02} (pm={})",
            staging.hour, staging.minute, staging.pm
        );
        sink.emit(&AppEvent::AlarmArmed(staging));
    }
}

/// Set-Time: Save writes the RTC.
#[derive(Debug)]
pub struct TimeSession;

impl SessionKind for TimeSession {
    const OWNER: UiOwner = UiOwner::SetTime;
    const NAME: &'static str = "set-time";
    const TITLE: &'static str = "Set Time";
    const TRIGGER: Button = Button::Minute;

    fn commit<C: ClockPort + ?Sized>(
        staging: TimeOfDay,
        shared: &SharedState,
        clock: &mut C,
        sink: &mut impl EventSink,
    ) {
        let mode = shared.hour_mode();
        match write_clock(staging, mode, clock) {
            Ok(()) => {
                info!("set-time: clock set to {:02}:{:02}", staging.hour, staging.minute);
                sink.emit(&AppEvent::ClockSet(staging));
            }
            Err(e) => {
                warn!("set-time: commit failed: {e}");
                sink.emit(&AppEvent::ClockFault(e));
            }
        }
    }
}

/// Strip the 12-hour offset, convert to BCD and write with seconds at 0.
fn write_clock<C: ClockPort + ?Sized>(
    staging: TimeOfDay,
    mode: HourMode,
    clock: &mut C,
) -> Result<(), ClockError> {
    let (hour, pm) = staging.to_clock_hour(mode);
    clock.commit_time(dec_to_bcd(hour), dec_to_bcd(staging.minute), 0x00, pm, mode)
}

// ---------------------------------------------------------------------------
// Machine
// ---------------------------------------------------------------------------

/// One editing session machine.
pub struct Session<K: SessionKind> {
    fsm: Fsm<SessionState>,
    staging: TimeOfDay,
    _kind: PhantomData<K>,
}

pub type SetAlarm = Session<AlarmSession>;
pub type SetTime = Session<TimeSession>;

impl<K: SessionKind> Session<K> {
    pub fn new() -> Self {
        Self {
            fsm: Fsm::new(K::NAME),
            staging: TimeOfDay::NOON,
            _kind: PhantomData,
        }
    }

    pub fn state(&self) -> SessionState {
        self.fsm.current_state()
    }

    pub fn staging(&self) -> TimeOfDay {
        self.staging
    }

    pub fn fsm(&self) -> &Fsm<SessionState> {
        &self.fsm
    }

    pub fn fsm_mut(&mut self) -> &mut Fsm<SessionState> {
        &mut self.fsm
    }

    pub fn tick<B>(
        &mut self,
        shared: &SharedState,
        hw: &mut B,
        sink: &mut impl EventSink,
    ) -> Step<SessionState>
    where
        B: ClockPort + DisplayPort + ButtonPort,
    {
        let owned = shared.admin.is_held_by(K::OWNER);
        let inputs = SessionInputs {
            owned,
            buttons: if owned { hw.sample() } else { Buttons::NONE },
        };
        let step = self.fsm.step(|s| transition(s, &inputs, K::TRIGGER));
        let mode = shared.hour_mode();

        match step.to {
            SessionState::Init | SessionState::Idle | SessionState::Editing => {}
            SessionState::Render => {
                if step.from == SessionState::Idle {
                    info!("{}: session started", K::NAME);
                    self.staging = TimeOfDay::NOON;
                }
                render::session_screen(hw, K::TITLE, self.staging, mode);
            }
            SessionState::HourInc => self.staging.increment_hour(mode),
            SessionState::MinuteInc => self.staging.increment_minute(),
            SessionState::Save => K::commit(self.staging, shared, hw, sink),
            SessionState::Exit => self.exit(shared, owned, sink),
        }

        step
    }

    fn exit(&mut self, shared: &SharedState, owned: bool, sink: &mut impl EventSink) {
        self.staging = TimeOfDay::NOON;
        if !owned {
            warn!("{}: token lost, session abandoned", K::NAME);
            return;
        }
        match shared.admin.return_to_display(K::OWNER) {
            Ok(()) => sink.emit(&AppEvent::TokenTransferred {
                from: K::OWNER,
                to: UiOwner::DisplayTime,
            }),
            Err(e) => warn!("{}: could not return token: {e}", K::NAME),
        }
    }
}

impl<K: SessionKind> Default for Session<K> {
    fn default() -> Self {
        Self::new()
    }
}
