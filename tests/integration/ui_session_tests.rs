//! Front-panel flows: the clock screen, both editing sessions, the hour
//! toggle and the admin token moving between them.

use alarmlink::app::events::AppEvent;
use alarmlink::config::SystemConfig;
use alarmlink::fsm::admin::UiOwner;
use alarmlink::fsm::display_time::DisplayState;
use alarmlink::fsm::session::SessionState;
use alarmlink::input::{Button, Buttons};
use alarmlink::scheduler::TaskId;
use alarmlink::time::{HourMode, TimeOfDay};

use crate::mock_hw::MockClock;
use crate::rig::MainRig;

#[test]
fn boot_draws_clock_screen() {
    let mut rig = MainRig::at(10, 0);
    rig.boot_display();
    assert_eq!(rig.hw.line(0), "10:00AM         ");
    assert_eq!(rig.hw.line(1), "01/01/2000 SUN  ");
    assert_eq!(rig.hw.clock.register_mode, HourMode::Twelve);
}

#[test]
fn saved_alarm_shows_in_summary() {
    let mut rig = MainRig::at(10, 0);
    rig.boot_display();
    rig.arm_alarm(0, 3);

    assert_eq!(rig.hw.line(0), "10:00AM  *12:03P");
    let alarm = rig.unit.shared().alarm();
    assert!(alarm.armed);
    assert_eq!(alarm.time, TimeOfDay::new(12, 3, true));
    assert!(rig.sink.events.contains(&AppEvent::AlarmArmed(TimeOfDay::new(12, 3, true))));
    assert_eq!(rig.unit.shared().admin.owner(), UiOwner::DisplayTime);
}

#[test]
fn token_goes_out_and_comes_back() {
    let mut rig = MainRig::at(10, 0);
    rig.boot_display();
    rig.arm_alarm(0, 0);

    let transfers: Vec<_> = rig
        .sink
        .events
        .iter()
        .filter_map(|e| match e {
            AppEvent::TokenTransferred { from, to } => Some((*from, *to)),
            _ => None,
        })
        .collect();
    assert_eq!(
        transfers,
        vec![
            (UiOwner::DisplayTime, UiOwner::SetAlarm),
            (UiOwner::SetAlarm, UiOwner::DisplayTime),
        ]
    );
}

#[test]
fn session_screen_tracks_staging() {
    let mut rig = MainRig::at(10, 0);
    rig.boot_display();
    rig.open_session(TaskId::SetAlarm, Button::Select);
    assert_eq!(rig.hw.line(0), "Set Alarm       ");
    assert_eq!(rig.hw.line(1), "12:00PM         ");

    rig.edit(TaskId::SetAlarm, Button::Hour);
    rig.edit(TaskId::SetAlarm, Button::Minute);
    rig.edit(TaskId::SetAlarm, Button::Minute);
    assert_eq!(rig.hw.line(1), "01:02PM         ");
}

#[test]
fn cancel_discards_staging() {
    let mut rig = MainRig::at(10, 0);
    rig.boot_display();
    rig.run_session(TaskId::SetAlarm, Button::Select, 2, 5, Button::Cancel);

    assert!(!rig.unit.shared().alarm().armed);
    assert_eq!(rig.hw.line(0), "10:00AM         ");
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::AlarmArmed(_))), 0);
}

#[test]
fn next_session_starts_from_noon() {
    let mut rig = MainRig::at(10, 0);
    rig.boot_display();
    rig.run_session(TaskId::SetAlarm, Button::Select, 3, 0, Button::Cancel);
    rig.open_session(TaskId::SetAlarm, Button::Select);
    assert_eq!(rig.hw.line(1), "12:00PM         ");
}

#[test]
fn held_key_after_save_does_not_reopen() {
    let mut rig = MainRig::at(10, 0);
    rig.boot_display();
    rig.open_session(TaskId::SetAlarm, Button::Select);
    rig.hold(Button::Select);
    rig.ticks(TaskId::SetAlarm, 3);
    assert_eq!(rig.unit.set_alarm_state(), SessionState::Idle);

    // Token is back but Select is still down.
    rig.ticks(TaskId::DisplayTime, 5);
    assert_eq!(rig.unit.display_state(), DisplayState::ToSetAlarm);
    rig.ticks(TaskId::SetAlarm, 5);
    assert_eq!(rig.unit.set_alarm_state(), SessionState::Idle);

    rig.release();
    rig.ticks(TaskId::DisplayTime, 2);
    assert_eq!(rig.unit.display_state(), DisplayState::Idle);
    assert_eq!(rig.unit.shared().admin.owner(), UiOwner::DisplayTime);
}

#[test]
fn set_time_commits_to_rtc() {
    let mut rig = MainRig::at(10, 0);
    rig.boot_display();
    rig.set_clock(1, 5);

    assert_eq!((rig.hw.clock.hour24, rig.hw.clock.minute), (13, 5));
    assert_eq!(rig.hw.clock.commits, 1);
    assert_eq!(rig.hw.line(0), "01:05PM         ");
    assert!(rig.sink.events.contains(&AppEvent::ClockSet(TimeOfDay::new(13, 5, true))));
}

#[test]
fn set_time_past_midnight_is_am() {
    let mut rig = MainRig::at(10, 0);
    rig.boot_display();
    // 12 PM → 13 … 24 (12 AM) → 1 AM … 7 AM.
    rig.set_clock(19, 30);

    assert_eq!((rig.hw.clock.hour24, rig.hw.clock.minute), (7, 30));
    assert_eq!(rig.hw.line(0), "07:30AM         ");
}

#[test]
fn hour_toggle_switches_display_and_rtc() {
    let mut rig = MainRig::at(15, 0);
    rig.boot_display();
    assert_eq!(rig.hw.line(0), "03:00PM         ");

    rig.hold(Button::Hour);
    rig.ticks(TaskId::DisplayTime, 2);
    assert_eq!(rig.unit.display_state(), DisplayState::WaitHourRelease);
    rig.release();
    rig.tick(TaskId::DisplayTime);
    assert_eq!(rig.unit.display_state(), DisplayState::HourSwap);
    rig.tick(TaskId::DisplayTime);

    assert_eq!(rig.hw.line(0), "15:00           ");
    assert_eq!(rig.unit.shared().hour_mode(), HourMode::TwentyFour);
    assert_eq!(rig.hw.clock.register_mode, HourMode::TwentyFour);
    assert_eq!(rig.hw.clock.hour24, 15);
    assert!(rig.sink.events.contains(&AppEvent::HourModeChanged(HourMode::TwentyFour)));
}

#[test]
fn set_time_in_24h_mode() {
    let mut config = SystemConfig::default();
    config.initial_hour_mode = HourMode::TwentyFour;
    let mut rig = MainRig::new(config, MockClock::at(8, 0));
    rig.boot_display();
    assert_eq!(rig.hw.line(0), "08:00           ");

    rig.set_clock(3, 0);
    assert_eq!(rig.hw.clock.hour24, 15);
    assert_eq!(rig.hw.line(0), "15:00           ");
}

#[test]
fn chord_does_nothing() {
    let mut rig = MainRig::at(10, 0);
    rig.boot_display();
    rig.hw.buttons = Buttons {
        select: true,
        minute: true,
        ..Buttons::NONE
    };
    rig.ticks(TaskId::DisplayTime, 3);
    assert_eq!(rig.unit.display_state(), DisplayState::Idle);
    assert_eq!(rig.unit.shared().admin.owner(), UiOwner::DisplayTime);
}

#[test]
fn sessions_stay_idle_without_token() {
    let mut rig = MainRig::at(10, 0);
    rig.boot_display();
    rig.hold(Button::Select);
    rig.ticks(TaskId::SetAlarm, 4);
    rig.hold(Button::Minute);
    rig.ticks(TaskId::SetTime, 4);
    assert_eq!(rig.unit.set_alarm_state(), SessionState::Idle);
    assert_eq!(rig.unit.set_time_state(), SessionState::Idle);
    assert_eq!(rig.hw.line(0), "10:00AM         ");
}

#[test]
fn dead_clock_shows_placeholder() {
    let mut rig = MainRig::at(10, 0);
    rig.hw.clock.fail = true;
    rig.boot_display();
    assert_eq!(rig.hw.line(0), "--:--           ");
    assert!(rig.sink.count(|e| matches!(e, AppEvent::ClockFault(_))) >= 1);
}
