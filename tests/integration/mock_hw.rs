//! Mock hardware for integration tests.
//!
//! [`MockMainBoard`] models the RTC closely enough to honour hour-mode
//! switches and time commits, keeps a 32-cell frame buffer for the LCD and
//! records every actuator call.  [`MockRemoteBoard`] does the same for the
//! remote.  Bytes move between the two only when a test calls
//! [`carry_link`], so every hop of the handshake is visible.

#![allow(dead_code)]

use std::collections::VecDeque;

use alarmlink::app::events::AppEvent;
use alarmlink::app::ports::{
    ButtonPort, ClockPort, ContactSensor, DisplayPort, EventSink, LightPort, ProgressIndicator,
    SerialPort, ToneTimer,
};
use alarmlink::error::ClockError;
use alarmlink::input::Buttons;
use alarmlink::time::{HourMode, RawTime, bcd_to_dec, decode_hour24};

const HOUR_12H_SELECT: u8 = 0x40;
const HOUR_PM_BIT: u8 = 0x20;

// ── RTC model ─────────────────────────────────────────────────

pub struct MockClock {
    pub hour24: u8,
    pub minute: u8,
    pub second: u8,
    /// Layout of the hour register.
    pub register_mode: HourMode,
    pub fail: bool,
    pub commits: u32,
}

impl MockClock {
    pub fn at(hour24: u8, minute: u8) -> Self {
        Self {
            hour24,
            minute,
            second: 0,
            register_mode: HourMode::TwentyFour,
            fail: false,
            commits: 0,
        }
    }
}

// ── Actuator call records ─────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToneCall {
    Start(u16),
    Stop,
}

// ── Serial endpoint ───────────────────────────────────────────

#[derive(Default)]
pub struct MockSerial {
    /// Bytes handed to `send`, oldest first.
    pub outbox: Vec<u8>,
    pub inbox: VecDeque<u8>,
    /// While set, `send` is refused and nothing counts as transmitted.
    pub busy: bool,
}

impl MockSerial {
    fn send(&mut self, byte: u8) {
        self.outbox.push(byte);
    }

    fn is_send_ready(&self) -> bool {
        !self.busy
    }

    fn has_transmitted(&self) -> bool {
        !self.busy
    }

    fn has_received(&self) -> bool {
        !self.inbox.is_empty()
    }

    fn receive(&mut self) -> u8 {
        self.inbox.pop_front().unwrap_or(0)
    }

    fn flush(&mut self) {
        self.inbox.clear();
    }
}

// ── MockMainBoard ─────────────────────────────────────────────

pub struct MockMainBoard {
    pub clock: MockClock,
    pub cells: [char; 32],
    pub clears: u32,
    pub buttons: Buttons,
    pub serial: MockSerial,
    pub duty_log: Vec<u8>,
    pub tone_log: Vec<ToneCall>,
}

impl MockMainBoard {
    pub fn new(clock: MockClock) -> Self {
        Self {
            clock,
            cells: [' '; 32],
            clears: 0,
            buttons: Buttons::NONE,
            serial: MockSerial::default(),
            duty_log: Vec::new(),
            tone_log: Vec::new(),
        }
    }

    /// One display line (0 = top) as a 16-character string.
    pub fn line(&self, n: usize) -> String {
        self.cells[n * 16..(n + 1) * 16].iter().collect()
    }

    pub fn last_duty(&self) -> Option<u8> {
        self.duty_log.last().copied()
    }
}

impl ClockPort for MockMainBoard {
    fn read_time(&mut self) -> Result<RawTime, ClockError> {
        if self.clock.fail {
            return Err(ClockError::Bus);
        }
        let c = &self.clock;
        Ok(RawTime::encode(c.hour24, c.minute, c.second, c.register_mode))
    }

    fn set_hour_mode(&mut self, mode: HourMode, current_hour: u8) -> Result<(), ClockError> {
        if self.clock.fail {
            return Err(ClockError::Bus);
        }
        self.clock.hour24 = decode_hour24(current_hour)?;
        self.clock.register_mode = mode;
        Ok(())
    }

    fn commit_time(
        &mut self,
        hour: u8,
        minute: u8,
        second: u8,
        pm: bool,
        mode: HourMode,
    ) -> Result<(), ClockError> {
        if self.clock.fail {
            return Err(ClockError::Bus);
        }
        let register = match mode {
            HourMode::TwentyFour => hour,
            HourMode::Twelve => {
                let pm_bit = if pm { HOUR_PM_BIT } else { 0 };
                HOUR_12H_SELECT | pm_bit | hour
            }
        };
        self.clock.hour24 = decode_hour24(register)?;
        self.clock.minute = bcd_to_dec(minute)?;
        self.clock.second = bcd_to_dec(second)?;
        self.clock.register_mode = mode;
        self.clock.commits += 1;
        Ok(())
    }
}

impl DisplayPort for MockMainBoard {
    fn clear(&mut self) {
        self.cells = [' '; 32];
        self.clears += 1;
    }

    fn write_char(&mut self, position: u8, ch: char) {
        if (1..=32).contains(&position) {
            self.cells[usize::from(position - 1)] = ch;
        }
    }
}

impl ButtonPort for MockMainBoard {
    fn sample(&mut self) -> Buttons {
        self.buttons
    }
}

impl SerialPort for MockMainBoard {
    fn send(&mut self, byte: u8) {
        self.serial.send(byte);
    }

    fn is_send_ready(&self) -> bool {
        self.serial.is_send_ready()
    }

    fn has_transmitted(&self) -> bool {
        self.serial.has_transmitted()
    }

    fn has_received(&self) -> bool {
        self.serial.has_received()
    }

    fn receive(&mut self) -> u8 {
        self.serial.receive()
    }

    fn flush(&mut self) {
        self.serial.flush();
    }
}

impl LightPort for MockMainBoard {
    fn set_duty(&mut self, level: u8) {
        self.duty_log.push(level);
    }
}

impl ToneTimer for MockMainBoard {
    fn start(&mut self, compare: u16) {
        self.tone_log.push(ToneCall::Start(compare));
    }

    fn stop(&mut self) {
        self.tone_log.push(ToneCall::Stop);
    }
}

// ── MockRemoteBoard ───────────────────────────────────────────

#[derive(Default)]
pub struct MockRemoteBoard {
    pub contact: bool,
    pub serial: MockSerial,
    pub progress_log: Vec<u8>,
}

impl MockRemoteBoard {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ContactSensor for MockRemoteBoard {
    fn is_contact(&mut self) -> bool {
        self.contact
    }
}

impl ProgressIndicator for MockRemoteBoard {
    fn show(&mut self, pattern: u8) {
        self.progress_log.push(pattern);
    }
}

impl SerialPort for MockRemoteBoard {
    fn send(&mut self, byte: u8) {
        self.serial.send(byte);
    }

    fn is_send_ready(&self) -> bool {
        self.serial.is_send_ready()
    }

    fn has_transmitted(&self) -> bool {
        self.serial.has_transmitted()
    }

    fn has_received(&self) -> bool {
        self.serial.has_received()
    }

    fn receive(&mut self) -> u8 {
        self.serial.receive()
    }

    fn flush(&mut self) {
        self.serial.flush();
    }
}

/// Deliver everything each side has sent to the other side's inbox.
pub fn carry_link(main: &mut MockMainBoard, remote: &mut MockRemoteBoard) {
    remote.serial.inbox.extend(main.serial.outbox.drain(..));
    main.serial.inbox.extend(remote.serial.outbox.drain(..));
}

// ── RecordingSink ─────────────────────────────────────────────

#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self, pred: impl Fn(&AppEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
