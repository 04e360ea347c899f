//! Both nodes together: the main unit raises the alarm, the remote hears
//! it, a sustained press sends "off" back and the main unit clears it.

use alarmlink::app::events::{AppEvent, Node};
use alarmlink::app::service::MainUnit;
use alarmlink::config::SystemConfig;
use alarmlink::fsm::alarm_check::AlarmCheckState;
use alarmlink::fsm::remote_off::{MSG_OFF, RemoteOffState};
use alarmlink::scheduler::{Scheduler, SchedulerDelegate, TaskId};
use embassy_time::Duration;

use crate::mock_hw::{MockClock, MockMainBoard, RecordingSink, carry_link};
use crate::rig::{MainRig, RemoteRig};

fn armed_pair() -> (MainRig, RemoteRig) {
    armed_pair_with(SystemConfig::default())
}

fn armed_pair_with(config: SystemConfig) -> (MainRig, RemoteRig) {
    let mut main = MainRig::new(config.clone(), MockClock::at(6, 58));
    main.boot_display();
    // 12 PM → 7 AM is 19 hour steps; two minutes out.
    main.arm_alarm(19, 0);
    let remote = RemoteRig::new(&config);
    (main, remote)
}

#[test]
fn remote_starts_listening() {
    let (_, remote) = armed_pair();
    assert!(remote.sink.events.contains(&AppEvent::Started(Node::Remote)));
    assert_eq!(remote.unit.state(), RemoteOffState::Init);
}

#[test]
fn full_handshake_silences_alarm() {
    let (mut main, mut remote) = armed_pair();
    remote.tick();
    assert_eq!(remote.unit.state(), RemoteOffState::WaitAlarm);

    main.ticks(TaskId::AlarmCheck, 2);
    assert!(main.unit.shared().alarm_active());
    carry_link(&mut main.hw, &mut remote.hw);

    remote.tick();
    assert_eq!(remote.unit.state(), RemoteOffState::WaitPress);
    assert!(remote.sink.events.contains(&AppEvent::RemoteAlarmHeard));
    main.tick(TaskId::AlarmCheck);
    assert_eq!(main.unit.alarm_check_state(), AlarmCheckState::AwaitRemoteOff);

    remote.hw.contact = true;
    remote.ticks(30);
    assert_eq!(remote.unit.state(), RemoteOffState::Confirming);
    assert_eq!(remote.unit.hold(), 30);
    assert!(remote.hw.serial.outbox.is_empty());

    remote.tick();
    assert_eq!(remote.unit.state(), RemoteOffState::SendOff);
    assert_eq!(remote.hw.serial.outbox, vec![MSG_OFF]);
    remote.tick();
    assert_eq!(remote.unit.state(), RemoteOffState::WaitAlarm);

    carry_link(&mut main.hw, &mut remote.hw);
    main.tick(TaskId::AlarmCheck);
    assert_eq!(main.unit.alarm_check_state(), AlarmCheckState::Reset);
    assert!(!main.unit.shared().alarm_active());
    assert!(!main.unit.shared().alarm().armed);

    // Idle, bar, 1..=30, full, idle.
    let mut expected = vec![0u8];
    expected.extend(1..=30);
    expected.extend([0xFF, 0]);
    assert_eq!(remote.hw.progress_log, expected);
}

#[test]
fn resent_alarm_during_press_does_not_rearm_remote() {
    let config = SystemConfig {
        handshake_timeout_secs: Some(5),
        ..SystemConfig::default()
    };
    let (mut main, mut remote) = armed_pair_with(config);
    remote.tick();
    main.ticks(TaskId::AlarmCheck, 2);
    carry_link(&mut main.hw, &mut remote.hw);
    remote.tick();
    assert_eq!(remote.unit.state(), RemoteOffState::WaitPress);
    main.tick(TaskId::AlarmCheck);
    assert_eq!(main.unit.alarm_check_state(), AlarmCheckState::AwaitRemoteOff);

    // No answer within five checks: "alarm active" goes out again and
    // reaches the remote while it is busy with the press.
    main.ticks(TaskId::AlarmCheck, 5);
    assert_eq!(main.sink.count(|e| *e == AppEvent::HandshakeRetry), 1);
    main.tick(TaskId::AlarmCheck);
    carry_link(&mut main.hw, &mut remote.hw);
    assert_eq!(remote.hw.serial.inbox.len(), 1);

    remote.hw.contact = true;
    remote.ticks(32);
    assert_eq!(remote.unit.state(), RemoteOffState::WaitAlarm);
    assert!(remote.hw.serial.inbox.is_empty());
    remote.hw.contact = false;
    remote.tick();
    assert_eq!(remote.unit.state(), RemoteOffState::WaitAlarm);

    carry_link(&mut main.hw, &mut remote.hw);
    main.tick(TaskId::AlarmCheck);
    assert_eq!(main.unit.alarm_check_state(), AlarmCheckState::Reset);
    assert!(!main.unit.shared().alarm_active());

    // A later touch with no alarm sounding sends nothing.
    remote.hw.contact = true;
    remote.ticks(40);
    assert_eq!(remote.unit.state(), RemoteOffState::WaitAlarm);
    assert!(remote.hw.serial.outbox.is_empty());
}

#[test]
fn short_press_does_not_send_off() {
    let (mut main, mut remote) = armed_pair();
    remote.tick();
    main.ticks(TaskId::AlarmCheck, 3);
    carry_link(&mut main.hw, &mut remote.hw);
    remote.tick();

    remote.hw.contact = true;
    remote.ticks(10);
    remote.hw.contact = false;
    remote.tick();
    assert_eq!(remote.unit.state(), RemoteOffState::WaitPress);
    assert_eq!(remote.unit.hold(), 0);
    assert!(remote.hw.serial.outbox.is_empty());

    // Pressing again starts the count over.
    remote.hw.contact = true;
    remote.ticks(5);
    assert_eq!(remote.unit.hold(), 5);
    assert!(main.unit.shared().alarm_active());
}

#[test]
fn press_before_alarm_is_ignored() {
    let (_, mut remote) = armed_pair();
    remote.hw.contact = true;
    remote.ticks(100);
    assert_eq!(remote.unit.state(), RemoteOffState::WaitAlarm);
    assert!(remote.hw.serial.outbox.is_empty());
}

#[test]
fn status_report_follows_the_alarm() {
    let (mut main, mut remote) = armed_pair();
    let status = main.unit.build_status();
    assert!(status.alarm.armed);
    assert_eq!(status.alarm_check_state, "Init");

    remote.tick();
    main.ticks(TaskId::AlarmCheck, 3);
    let status = main.unit.build_status();
    assert!(status.alarm_active);
    assert_eq!(status.alarm_check_state, "AwaitRemoteOff");
    let json = serde_json::to_string(&status).unwrap();
    assert!(json.contains("\"alarm_active\":true"));
}

// ── Scheduler-driven run ──────────────────────────────────────

struct Runner<'a> {
    unit: &'a mut MainUnit,
    hw: &'a mut MockMainBoard,
    sink: &'a mut RecordingSink,
}

impl SchedulerDelegate for Runner<'_> {
    fn on_task_due(&mut self, task: TaskId) {
        self.unit.run_task(task, self.hw, self.sink);
    }
}

#[test]
fn scheduler_drives_every_task_at_its_period() {
    let (mut main, _) = armed_pair();
    let config = SystemConfig::default();
    let mut sched = Scheduler::from_config(&config, &TaskId::MAIN_UNIT);

    // Three seconds of base ticks.
    for _ in 0..60 {
        let mut runner = Runner {
            unit: &mut main.unit,
            hw: &mut main.hw,
            sink: &mut main.sink,
        };
        sched.tick(Duration::from_millis(50), &mut runner);
    }

    assert_eq!(sched.runs(TaskId::AlarmCheck), 3);
    assert_eq!(sched.runs(TaskId::DisplayTime), 15);
    assert_eq!(sched.runs(TaskId::SetAlarm), 60);
    assert_eq!(sched.runs(TaskId::Light), 15);
    // Init → Check → SendActive → AwaitRemoteOff on the three checks.
    assert_eq!(main.unit.alarm_check_state(), AlarmCheckState::AwaitRemoteOff);
    assert!(main.hw.last_duty().unwrap_or(0) > 0);
}
