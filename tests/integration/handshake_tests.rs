//! Alarm-Check against a scripted link: trigger window, the "alarm
//! active" / "off" exchange, transport back-pressure and the optional
//! re-send timeout.  The actuators follow the alarm-active flag.

use alarmlink::app::events::AppEvent;
use alarmlink::config::SystemConfig;
use alarmlink::fsm::alarm_check::{AlarmCheckState, MSG_ALARM_ACTIVE};
use alarmlink::fsm::light::LightState;
use alarmlink::fsm::tone::ToneState;
use alarmlink::scheduler::TaskId;

use crate::mock_hw::{MockClock, ToneCall};
use crate::rig::MainRig;

/// Clock 11:55 AM, alarm armed for 12:03 PM: eight minutes out.
fn armed_rig(config: SystemConfig) -> MainRig {
    let mut rig = MainRig::new(config, MockClock::at(11, 55));
    rig.boot_display();
    rig.arm_alarm(0, 3);
    rig
}

/// Run Alarm-Check until it is waiting for the remote.
fn sound(rig: &mut MainRig) {
    rig.ticks(TaskId::AlarmCheck, 3);
    assert_eq!(rig.unit.alarm_check_state(), AlarmCheckState::AwaitRemoteOff);
}

#[test]
fn due_alarm_raises_flag_and_sends_active() {
    let mut rig = armed_rig(SystemConfig::default());
    rig.ticks(TaskId::AlarmCheck, 2);

    assert_eq!(rig.unit.alarm_check_state(), AlarmCheckState::SendActive);
    assert!(rig.unit.shared().alarm_active());
    assert_eq!(rig.hw.serial.outbox, vec![MSG_ALARM_ACTIVE]);
    assert!(rig.sink.events.contains(&AppEvent::AlarmTriggered { minutes_until: 8 }));

    rig.tick(TaskId::AlarmCheck);
    assert_eq!(rig.unit.alarm_check_state(), AlarmCheckState::AwaitRemoteOff);
}

#[test]
fn outside_lead_window_stays_quiet() {
    let mut rig = MainRig::at(11, 50);
    rig.boot_display();
    rig.arm_alarm(0, 3);
    rig.ticks(TaskId::AlarmCheck, 5);

    assert_eq!(rig.unit.alarm_check_state(), AlarmCheckState::Check);
    assert_eq!(rig.unit.alarm_check().last_minutes_until(), Some(13));
    assert!(!rig.unit.shared().alarm_active());
    assert!(rig.hw.serial.outbox.is_empty());
}

#[test]
fn unarmed_alarm_never_triggers() {
    let mut rig = MainRig::at(12, 0);
    rig.boot_display();
    rig.ticks(TaskId::AlarmCheck, 10);
    assert_eq!(rig.unit.alarm_check_state(), AlarmCheckState::Check);
    assert_eq!(rig.unit.alarm_check().last_minutes_until(), None);
}

#[test]
fn off_byte_clears_alarm() {
    let mut rig = armed_rig(SystemConfig::default());
    sound(&mut rig);

    rig.hw.serial.inbox.push_back(0x01);
    rig.tick(TaskId::AlarmCheck);
    assert_eq!(rig.unit.alarm_check_state(), AlarmCheckState::Reset);
    assert!(!rig.unit.shared().alarm_active());
    assert!(!rig.unit.shared().alarm().armed);
    assert!(rig.sink.events.contains(&AppEvent::AlarmSilenced));

    rig.ticks(TaskId::AlarmCheck, 5);
    assert_eq!(rig.unit.alarm_check_state(), AlarmCheckState::Check);
    assert_eq!(rig.hw.serial.outbox.len(), 1);
}

#[test]
fn zero_byte_is_not_off() {
    let mut rig = armed_rig(SystemConfig::default());
    sound(&mut rig);

    rig.hw.serial.inbox.extend([0x00, 0x01]);
    rig.tick(TaskId::AlarmCheck);
    assert_eq!(rig.unit.alarm_check_state(), AlarmCheckState::AwaitRemoteOff);
    // The rest of the buffer was flushed with the zero.
    assert!(rig.hw.serial.inbox.is_empty());
    assert!(rig.unit.shared().alarm_active());
}

#[test]
fn byte_buffered_before_trigger_is_not_off() {
    let mut rig = armed_rig(SystemConfig::default());
    // Left over from an earlier exchange while Alarm-Check sat in Check.
    rig.hw.serial.inbox.push_back(0x01);
    sound(&mut rig);
    assert!(rig.hw.serial.inbox.is_empty());

    rig.ticks(TaskId::AlarmCheck, 3);
    assert_eq!(rig.unit.alarm_check_state(), AlarmCheckState::AwaitRemoteOff);
    assert!(rig.unit.shared().alarm_active());
    assert_eq!(rig.sink.count(|e| *e == AppEvent::AlarmSilenced), 0);
}

#[test]
fn busy_transport_holds_send_active() {
    let mut rig = armed_rig(SystemConfig::default());
    rig.hw.serial.busy = true;
    rig.ticks(TaskId::AlarmCheck, 6);
    assert_eq!(rig.unit.alarm_check_state(), AlarmCheckState::SendActive);
    assert!(rig.hw.serial.outbox.is_empty());

    rig.hw.serial.busy = false;
    rig.tick(TaskId::AlarmCheck);
    assert_eq!(rig.hw.serial.outbox, vec![MSG_ALARM_ACTIVE]);
    rig.tick(TaskId::AlarmCheck);
    assert_eq!(rig.unit.alarm_check_state(), AlarmCheckState::AwaitRemoteOff);
}

#[test]
fn no_timeout_waits_forever() {
    let mut rig = armed_rig(SystemConfig::default());
    sound(&mut rig);
    rig.ticks(TaskId::AlarmCheck, 500);
    assert_eq!(rig.unit.alarm_check_state(), AlarmCheckState::AwaitRemoteOff);
    assert_eq!(rig.hw.serial.outbox.len(), 1);
}

#[test]
fn timeout_resends_active() {
    let config = SystemConfig {
        handshake_timeout_secs: Some(30),
        ..SystemConfig::default()
    };
    let mut rig = armed_rig(config);
    sound(&mut rig);

    rig.ticks(TaskId::AlarmCheck, 29);
    assert_eq!(rig.unit.alarm_check_state(), AlarmCheckState::AwaitRemoteOff);
    assert_eq!(rig.sink.count(|e| *e == AppEvent::HandshakeRetry), 0);

    rig.tick(TaskId::AlarmCheck);
    assert_eq!(rig.unit.alarm_check_state(), AlarmCheckState::SendActive);
    assert_eq!(rig.hw.serial.outbox, vec![MSG_ALARM_ACTIVE, MSG_ALARM_ACTIVE]);
    assert_eq!(rig.sink.count(|e| *e == AppEvent::HandshakeRetry), 1);
    // Still the same alarm: no second trigger, flag untouched.
    assert_eq!(rig.sink.count(|e| matches!(e, AppEvent::AlarmTriggered { .. })), 1);
    assert!(rig.unit.shared().alarm_active());
}

#[test]
fn light_ramps_and_tone_plays_while_active() {
    let mut rig = armed_rig(SystemConfig::default());
    rig.ticks(TaskId::Light, 1);
    rig.ticks(TaskId::Tone, 1);
    sound(&mut rig);

    rig.ticks(TaskId::Light, 3);
    assert_eq!(rig.unit.light().state(), LightState::On);
    assert_eq!(rig.hw.duty_log, vec![0, 1, 2, 3]);

    rig.ticks(TaskId::Tone, 3);
    assert_eq!(rig.unit.tone().state(), ToneState::On);
    // 1047, 1047, 1319: the repeated note is not reprogrammed.
    assert_eq!(
        rig.hw
            .tone_log
            .iter()
            .filter(|c| matches!(c, ToneCall::Start(_)))
            .count(),
        2
    );
    assert_eq!(rig.unit.build_status().tone_hz, 1319);

    rig.hw.serial.inbox.push_back(0x01);
    rig.tick(TaskId::AlarmCheck);
    rig.tick(TaskId::Light);
    rig.tick(TaskId::Tone);
    assert_eq!(rig.hw.last_duty(), Some(0));
    assert_eq!(rig.hw.tone_log.last(), Some(&ToneCall::Stop));

    rig.tick(TaskId::Light);
    rig.tick(TaskId::Tone);
    assert_eq!(rig.unit.light().state(), LightState::Off);
    assert_eq!(rig.unit.tone().state(), ToneState::Off);
}
