//! Display-Time: the default UI machine.
//!
//! ```text
//!   Init ──▶ Render ──▶ Idle ──(refresh due)──▶ Render
//!                        │
//!        Select alone ───┼──▶ ToSetAlarm ──(token back, keys up)──▶ Render
//!        Minute alone ───┼──▶ ToSetTime  ──(token back, keys up)──▶ Render
//!        Hour alone   ───┴──▶ WaitHourRelease ──(Hour up)──▶ HourSwap ──▶ Render
//! ```
//!
//! Holds the admin token at boot.  While another machine owns it, this
//! machine sits in one of its hand-off states and never touches the
//! display.

use log::{info, warn};

use crate::app::events::AppEvent;
use crate::app::ports::{ButtonPort, ClockPort, DisplayPort, EventSink};
use crate::fsm::admin::UiOwner;
use crate::fsm::{Fsm, Step, render};
use crate::input::{Button, Buttons};
use crate::shared::SharedState;
use crate::time::TimeSnapshot;

state_ids! {
    /// Display-Time states.
    pub enum DisplayState initial Init {
        Init = 0,
        Render = 1,
        Idle = 2,
        WaitHourRelease = 3,
        HourSwap = 4,
        ToSetAlarm = 5,
        ToSetTime = 6,
    }
}

/// Everything the transition function looks at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplayInputs {
    /// DisplayTime holds the admin token.
    pub owned: bool,
    /// Button sample, all released when not owned.
    pub buttons: Buttons,
    /// Idle has waited long enough to redraw.
    pub refresh_due: bool,
}

/// Pure transition function.
pub fn transition(state: DisplayState, inputs: &DisplayInputs) -> DisplayState {
    use DisplayState::*;

    match state {
        Init => Render,
        Render => Idle,
        HourSwap => Render,
        Idle if !inputs.owned => Idle,
        Idle if inputs.refresh_due => Render,
        Idle => match inputs.buttons.chord() {
            Some(Button::Select) => ToSetAlarm,
            Some(Button::Minute) => ToSetTime,
            Some(Button::Hour) => WaitHourRelease,
            _ => Idle,
        },
        WaitHourRelease if inputs.buttons.is_pressed(Button::Hour) => WaitHourRelease,
        WaitHourRelease => HourSwap,
        ToSetAlarm | ToSetTime if inputs.owned && inputs.buttons.pressed_count() == 0 => Render,
        ToSetAlarm | ToSetTime => state,
    }
}

/// The Display-Time machine.
pub struct DisplayTime {
    fsm: Fsm<DisplayState>,
    refresh_ticks: u16,
    since_render: u16,
    /// Hour register from the last successful clock read.
    last_hour_register: Option<u8>,
}

impl DisplayTime {
    pub fn new(refresh_ticks: u16) -> Self {
        Self {
            fsm: Fsm::new("display-time"),
            refresh_ticks,
            since_render: 0,
            last_hour_register: None,
        }
    }

    pub fn state(&self) -> DisplayState {
        self.fsm.current_state()
    }

    pub fn fsm(&self) -> &Fsm<DisplayState> {
        &self.fsm
    }

    pub fn fsm_mut(&mut self) -> &mut Fsm<DisplayState> {
        &mut self.fsm
    }

    /// Seed the hour register used by the hour-mode toggle before the
    /// first render.
    pub fn set_hour_register(&mut self, register: u8) {
        self.last_hour_register = Some(register);
    }

    /// One tick: transition, then the action of the current state.
    pub fn tick<B>(
        &mut self,
        shared: &SharedState,
        hw: &mut B,
        sink: &mut impl EventSink,
    ) -> Step<DisplayState>
    where
        B: ClockPort + DisplayPort + ButtonPort,
    {
        let owned = shared.admin.is_held_by(UiOwner::DisplayTime);
        let inputs = DisplayInputs {
            owned,
            buttons: if owned { hw.sample() } else { Buttons::NONE },
            refresh_due: self.since_render >= self.refresh_ticks,
        };
        let step = self.fsm.step(|s| transition(s, &inputs));

        match step.to {
            DisplayState::Init | DisplayState::WaitHourRelease => {}
            DisplayState::Render => {
                self.refresh_snapshot(shared, hw, sink);
                render::clock_screen(
                    hw,
                    shared.snapshot().as_ref(),
                    shared.hour_mode(),
                    shared.alarm(),
                );
                self.since_render = 0;
            }
            DisplayState::Idle => {
                self.since_render = self.since_render.saturating_add(1);
            }
            DisplayState::HourSwap => self.swap_hour_mode(shared, hw, sink),
            DisplayState::ToSetAlarm if step.entered(DisplayState::ToSetAlarm) => {
                hand_off(shared, UiOwner::SetAlarm, sink);
            }
            DisplayState::ToSetTime if step.entered(DisplayState::ToSetTime) => {
                hand_off(shared, UiOwner::SetTime, sink);
            }
            DisplayState::ToSetAlarm | DisplayState::ToSetTime => {}
        }

        step
    }

    /// Read and decode the clock into the shared snapshot.  On failure the
    /// previous snapshot stays in place.
    fn refresh_snapshot(
        &mut self,
        shared: &SharedState,
        clock: &mut impl ClockPort,
        sink: &mut impl EventSink,
    ) {
        let mode = shared.hour_mode();
        match clock
            .read_time()
            .and_then(|raw| TimeSnapshot::decode(&raw, mode).map(|snap| (raw.hour, snap)))
        {
            Ok((hour_register, snapshot)) => {
                self.last_hour_register = Some(hour_register);
                shared.store_snapshot(snapshot);
            }
            Err(e) => {
                warn!("display-time: clock read failed: {e}");
                sink.emit(&AppEvent::ClockFault(e));
            }
        }
    }

    fn swap_hour_mode(
        &mut self,
        shared: &SharedState,
        clock: &mut impl ClockPort,
        sink: &mut impl EventSink,
    ) {
        let mode = shared.toggle_hour_mode();
        info!("display-time: hour mode now {:?}", mode);

        match self.last_hour_register {
            Some(register) => {
                if let Err(e) = clock.set_hour_mode(mode, register) {
                    warn!("display-time: RTC hour mode switch failed: {e}");
                    sink.emit(&AppEvent::ClockFault(e));
                }
            }
            None => warn!("display-time: no clock reading yet, RTC hour mode unchanged"),
        }
        sink.emit(&AppEvent::HourModeChanged(mode));

        // The old snapshot was decoded under the previous mode.
        self.refresh_snapshot(shared, clock, sink);
    }
}

fn hand_off(shared: &SharedState, to: UiOwner, sink: &mut impl EventSink) {
    match shared.admin.request_transfer(UiOwner::DisplayTime, to) {
        Ok(()) => sink.emit(&AppEvent::TokenTransferred {
            from: UiOwner::DisplayTime,
            to,
        }),
        Err(e) => warn!("display-time: hand-off refused: {e}"),
    }
}
