//! Port traits: the hexagonal boundary between domain logic and the outside world.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ MainUnit / RemoteUnit (domain)
//! ```
//!
//! Driven adapters (RTC, LCD, UART, buttons, PWM, event sinks) implement
//! these traits.  The services consume them via generics, so the state
//! machines never touch hardware directly.
//!
//! None of these calls may block: readiness is always polled.

use crate::error::ClockError;
use crate::input::Buttons;
use crate::time::{HourMode, RawTime};

// ───────────────────────────────────────────────────────────────
// Clock port (RTC driver)
// ───────────────────────────────────────────────────────────────

/// Real-time clock with BCD registers.
pub trait ClockPort {
    /// Read all time/date registers.
    fn read_time(&mut self) -> Result<RawTime, ClockError>;

    /// Switch the RTC's hour register to `mode`, converting
    /// `current_hour` (the raw register last read) so the time of day is
    /// preserved.
    fn set_hour_mode(&mut self, mode: HourMode, current_hour: u8) -> Result<(), ClockError>;

    /// Write a new time.  `hour`, `minute` and `second` are BCD; `hour`
    /// is a clock-face hour in 12-hour mode.
    fn commit_time(
        &mut self,
        hour: u8,
        minute: u8,
        second: u8,
        pm: bool,
        mode: HourMode,
    ) -> Result<(), ClockError>;
}

// ───────────────────────────────────────────────────────────────
// Display port (character LCD)
// ───────────────────────────────────────────────────────────────

/// Character display addressed by 1-based linear position.
pub trait DisplayPort {
    fn clear(&mut self);

    fn write_char(&mut self, position: u8, ch: char);

    fn write_str(&mut self, position: u8, text: &str) {
        for (offset, ch) in text.chars().enumerate() {
            self.write_char(position.saturating_add(offset as u8), ch);
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Serial port (node-to-node link)
// ───────────────────────────────────────────────────────────────

/// Byte-level serial link between the two nodes.
pub trait SerialPort {
    fn send(&mut self, byte: u8);

    /// Transmit buffer can accept a byte.
    fn is_send_ready(&self) -> bool;

    /// The last byte handed to [`send`](Self::send) has left the wire.
    fn has_transmitted(&self) -> bool;

    fn has_received(&self) -> bool;

    fn receive(&mut self) -> u8;

    /// Discard anything still pending in the receive buffer.
    fn flush(&mut self);
}

// ───────────────────────────────────────────────────────────────
// Digital inputs
// ───────────────────────────────────────────────────────────────

/// Four debounced front-panel buttons on the main unit.
pub trait ButtonPort {
    fn sample(&mut self) -> Buttons;
}

/// Force-sensor contact on the remote unit.
pub trait ContactSensor {
    fn is_contact(&mut self) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Actuators
// ───────────────────────────────────────────────────────────────

/// Wake-up light PWM.
pub trait LightPort {
    fn set_duty(&mut self, level: u8);
}

/// Timer-compare output used for the speaker.
pub trait ToneTimer {
    /// Toggle the output every `compare + 1` timer clocks.
    fn start(&mut self, compare: u16);

    fn stop(&mut self);
}

/// LED bar on the remote unit showing hold progress.
pub trait ProgressIndicator {
    fn show(&mut self, pattern: u8);
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging / telemetry)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`](super::events::AppEvent)s
/// through this port.  Adapters decide where they go.
pub trait EventSink {
    fn emit(&mut self, event: &super::events::AppEvent);
}

// ───────────────────────────────────────────────────────────────
// Board bundles
// ───────────────────────────────────────────────────────────────

/// Everything the main unit drives.  Implemented automatically for any
/// type providing all of its ports.
pub trait MainBoard: ClockPort + DisplayPort + ButtonPort + SerialPort + LightPort + ToneTimer {}

impl<T> MainBoard for T where
    T: ClockPort + DisplayPort + ButtonPort + SerialPort + LightPort + ToneTimer
{
}

/// Everything the remote unit drives.
pub trait RemoteBoard: SerialPort + ContactSensor + ProgressIndicator {}

impl<T> RemoteBoard for T where T: SerialPort + ContactSensor + ProgressIndicator {}
