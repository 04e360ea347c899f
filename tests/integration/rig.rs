//! Test rigs: a started service wired to its mock board and sink, plus
//! button-choreography helpers for the UI sessions.

#![allow(dead_code)]

use alarmlink::app::remote::RemoteUnit;
use alarmlink::app::service::MainUnit;
use alarmlink::config::SystemConfig;
use alarmlink::fsm::display_time::DisplayState;
use alarmlink::fsm::session::SessionState;
use alarmlink::input::{Button, Buttons};
use alarmlink::scheduler::TaskId;

use crate::mock_hw::{MockClock, MockMainBoard, MockRemoteBoard, RecordingSink};

pub struct MainRig {
    pub unit: MainUnit,
    pub hw: MockMainBoard,
    pub sink: RecordingSink,
}

impl MainRig {
    pub fn new(config: SystemConfig, clock: MockClock) -> Self {
        let mut unit = MainUnit::new(config);
        let mut hw = MockMainBoard::new(clock);
        let mut sink = RecordingSink::new();
        unit.start(&mut hw, &mut sink);
        Self { unit, hw, sink }
    }

    /// Default configuration, clock at `hour24:minute`.
    pub fn at(hour24: u8, minute: u8) -> Self {
        Self::new(SystemConfig::default(), MockClock::at(hour24, minute))
    }

    pub fn tick(&mut self, task: TaskId) {
        self.unit.run_task(task, &mut self.hw, &mut self.sink);
    }

    pub fn ticks(&mut self, task: TaskId, n: usize) {
        for _ in 0..n {
            self.tick(task);
        }
    }

    pub fn hold(&mut self, button: Button) {
        self.hw.buttons = Buttons::only(button);
    }

    pub fn release(&mut self) {
        self.hw.buttons = Buttons::NONE;
    }

    /// Display-Time from Init to Idle, clock drawn once.
    pub fn boot_display(&mut self) {
        self.ticks(TaskId::DisplayTime, 2);
        assert_eq!(self.unit.display_state(), DisplayState::Idle);
    }

    fn session_state(&self, task: TaskId) -> SessionState {
        match task {
            TaskId::SetAlarm => self.unit.set_alarm_state(),
            _ => self.unit.set_time_state(),
        }
    }

    /// Press and release `button` inside an open session, leaving it back
    /// in Editing.
    pub fn edit(&mut self, task: TaskId, button: Button) {
        self.hold(button);
        self.tick(task);
        self.release();
        self.ticks(task, 2);
        assert_eq!(self.session_state(task), SessionState::Editing);
    }

    /// Open a session from Display-Time Idle and leave it in Editing.
    pub fn open_session(&mut self, task: TaskId, trigger: Button) {
        self.hold(trigger);
        self.tick(TaskId::DisplayTime);
        // The session waits for the trigger to come up.
        self.tick(task);
        assert_eq!(self.session_state(task), SessionState::Idle);
        self.release();
        self.ticks(task, 2);
        assert_eq!(self.session_state(task), SessionState::Editing);
    }

    /// Leave an open session with `finish` (Select saves, Cancel
    /// discards) and let Display-Time take the screen back.
    pub fn close_session(&mut self, task: TaskId, finish: Button) {
        self.hold(finish);
        while self.session_state(task) != SessionState::Idle {
            self.tick(task);
        }
        self.release();
        self.ticks(TaskId::DisplayTime, 2);
        assert_eq!(self.unit.display_state(), DisplayState::Idle);
    }

    /// Full editing session: open, apply the increments, finish.
    pub fn run_session(
        &mut self,
        task: TaskId,
        trigger: Button,
        hour_incs: usize,
        minute_incs: usize,
        finish: Button,
    ) {
        self.open_session(task, trigger);
        for _ in 0..hour_incs {
            self.edit(task, Button::Hour);
        }
        for _ in 0..minute_incs {
            self.edit(task, Button::Minute);
        }
        self.close_session(task, finish);
    }

    /// Arm the alarm through the Set-Alarm UI.  Staging starts at 12:00 PM.
    pub fn arm_alarm(&mut self, hour_incs: usize, minute_incs: usize) {
        self.run_session(TaskId::SetAlarm, Button::Select, hour_incs, minute_incs, Button::Select);
    }

    /// Set the clock through the Set-Time UI.  Staging starts at 12:00 PM.
    pub fn set_clock(&mut self, hour_incs: usize, minute_incs: usize) {
        self.run_session(TaskId::SetTime, Button::Minute, hour_incs, minute_incs, Button::Select);
    }
}

pub struct RemoteRig {
    pub unit: RemoteUnit,
    pub hw: MockRemoteBoard,
    pub sink: RecordingSink,
}

impl RemoteRig {
    pub fn new(config: &SystemConfig) -> Self {
        let mut unit = RemoteUnit::new(config);
        let mut hw = MockRemoteBoard::new();
        let mut sink = RecordingSink::new();
        unit.start(&mut hw, &mut sink);
        Self { unit, hw, sink }
    }

    pub fn tick(&mut self) {
        self.unit.run_task(TaskId::RemoteOff, &mut self.hw, &mut self.sink);
    }

    pub fn ticks(&mut self, n: usize) {
        for _ in 0..n {
            self.tick();
        }
    }
}
