//! Square-wave tone generator on a toggle-on-compare timer.
//!
//! The timer output flips every `compare + 1` input clocks, so one full
//! period of the tone takes two compare matches:
//!
//! ```text
//!   compare = clock / (2 · hz) − 1
//! ```
//!
//! The generator remembers the frequency it last programmed and leaves
//! the timer alone when asked for the same one again, so a held note does
//! not restart its waveform every tick.

use crate::app::ports::ToneTimer;

/// Compare value for `hz` on a timer clocked at `clock_hz`, clamped to the
/// 16-bit compare register.  `hz` must be non-zero.
pub fn compare_for(clock_hz: u32, hz: u16) -> u16 {
    let half_period = clock_hz / (2 * u32::from(hz));
    half_period.saturating_sub(1).clamp(1, u32::from(u16::MAX)) as u16
}

pub struct ToneGenerator {
    clock_hz: u32,
    /// Frequency currently on the output; 0 = silent.
    current_hz: u16,
    /// Times the timer was actually reprogrammed.
    reprograms: u32,
}

impl ToneGenerator {
    pub fn new(clock_hz: u32) -> Self {
        Self {
            clock_hz,
            current_hz: 0,
            reprograms: 0,
        }
    }

    /// Play `hz`, or stop on 0.  A repeat of the current frequency is a
    /// no-op.
    pub fn set_frequency(&mut self, timer: &mut impl ToneTimer, hz: u16) {
        if hz == self.current_hz {
            return;
        }
        if hz == 0 {
            timer.stop();
        } else {
            timer.start(compare_for(self.clock_hz, hz));
        }
        self.current_hz = hz;
        self.reprograms += 1;
    }

    pub fn silence(&mut self, timer: &mut impl ToneTimer) {
        self.set_frequency(timer, 0);
    }

    pub fn current_hz(&self) -> u16 {
        self.current_hz
    }

    pub fn reprograms(&self) -> u32 {
        self.reprograms
    }
}
