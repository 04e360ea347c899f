//! Wall-clock data model: BCD register decoding, the decoded
//! [`TimeSnapshot`], and the editable [`TimeOfDay`] used for staging and
//! the armed alarm.
//!
//! The RTC (DS3231 register layout) reports hours as:
//!
//! ```text
//!   bit 6      bit 5          bits 4..0
//!  ┌───────┬──────────────┬───────────────┐
//!  │ 12/24 │ PM (12h) or  │ BCD hour      │
//!  │ select│ 20s (24h)    │               │
//!  └───────┴──────────────┴───────────────┘
//! ```
//!
//! In 12-hour mode the editable hour runs 1..=24: 12 is noon, 13..=23 the
//! afternoon/evening hours and 24 the midnight sentinel.

use serde::{Deserialize, Serialize};

use crate::error::ClockError;

/// Minutes in half a day.
pub const HALF_DAY_MINUTES: i32 = 720;
/// Minutes in a full day.
pub const FULL_DAY_MINUTES: i32 = 1440;
/// Alarm hour meaning "midnight" in 12-hour mode.
pub const MIDNIGHT_SENTINEL: u8 = 24;

const HOUR_12H_SELECT: u8 = 0x40;
const HOUR_PM_BIT: u8 = 0x20;
const HOUR_12H_MASK: u8 = 0x1F;
const HOUR_24H_MASK: u8 = 0x3F;

const WEEKDAYS: [&str; 7] = ["SUN", "MON", "TUE", "WED", "THU", "FRI", "SAT"];

// ---------------------------------------------------------------------------
// Hour mode
// ---------------------------------------------------------------------------

/// 12/24-hour display and register convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HourMode {
    Twelve,
    TwentyFour,
}

impl HourMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Twelve => Self::TwentyFour,
            Self::TwentyFour => Self::Twelve,
        }
    }
}

// ---------------------------------------------------------------------------
// BCD helpers
// ---------------------------------------------------------------------------

/// Decode one packed-BCD byte, rejecting nibbles above 9.
pub fn bcd_to_dec(raw: u8) -> Result<u8, ClockError> {
    let tens = raw >> 4;
    let ones = raw & 0x0F;
    if tens > 9 || ones > 9 {
        return Err(ClockError::InvalidBcd(raw));
    }
    Ok(tens * 10 + ones)
}

/// Encode a decimal value 0..=99 as packed BCD.
pub fn dec_to_bcd(value: u8) -> u8 {
    let value = value % 100;
    ((value / 10) << 4) | (value % 10)
}

// ---------------------------------------------------------------------------
// Raw registers
// ---------------------------------------------------------------------------

/// Clock registers exactly as the RTC reports them (BCD).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawTime {
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    pub year: u8,
    pub month: u8,
    pub date: u8,
    /// 1 = Sunday .. 7 = Saturday.
    pub weekday: u8,
}

impl RawTime {
    /// Encode a 24-hour wall-clock reading into register form for `mode`.
    /// Date fields default to Sunday 01/01/2000.
    pub fn encode(hour24: u8, minute: u8, second: u8, mode: HourMode) -> Self {
        Self {
            hour: encode_hour(hour24, mode),
            minute: dec_to_bcd(minute),
            second: dec_to_bcd(second),
            year: 0x00,
            month: 0x01,
            date: 0x01,
            weekday: 1,
        }
    }

    pub fn with_date(mut self, year: u8, month: u8, date: u8, weekday: u8) -> Self {
        self.year = dec_to_bcd(year);
        self.month = dec_to_bcd(month);
        self.date = dec_to_bcd(date);
        self.weekday = weekday;
        self
    }
}

/// Encode a 0..=23 hour into the RTC hour register for `mode`.
pub fn encode_hour(hour24: u8, mode: HourMode) -> u8 {
    let hour24 = hour24 % 24;
    match mode {
        HourMode::TwentyFour => dec_to_bcd(hour24),
        HourMode::Twelve => {
            let pm = hour24 >= 12;
            let face = match hour24 {
                0 => 12,
                1..=12 => hour24,
                _ => hour24 - 12,
            };
            let pm_bit = if pm { HOUR_PM_BIT } else { 0 };
            HOUR_12H_SELECT | pm_bit | dec_to_bcd(face)
        }
    }
}

/// Decode an RTC hour register into a 0..=23 hour, honouring its own
/// 12/24 select bit.
pub fn decode_hour24(register: u8) -> Result<u8, ClockError> {
    if register & HOUR_12H_SELECT == 0 {
        return bcd_to_dec(register & HOUR_24H_MASK);
    }
    let face = bcd_to_dec(register & HOUR_12H_MASK)?;
    let pm = register & HOUR_PM_BIT != 0;
    Ok(match (face, pm) {
        (12, false) => 0,
        (12, true) => 12,
        (h, true) => h + 12,
        (h, false) => h,
    })
}

// ---------------------------------------------------------------------------
// Decoded snapshot
// ---------------------------------------------------------------------------

/// Decoded wall clock, refreshed once per Display-Time render.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeSnapshot {
    /// 1..=12 in 12-hour mode, 0..=23 in 24-hour mode.
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
    /// Meaningful in 12-hour mode only.
    pub pm: bool,
    /// Two-digit year (20YY).
    pub year: u8,
    pub month: u8,
    pub day: u8,
    pub weekday: u8,
}

impl TimeSnapshot {
    /// Decode RTC registers the way `mode` says they are laid out.
    pub fn decode(raw: &RawTime, mode: HourMode) -> Result<Self, ClockError> {
        let (hour, pm) = match mode {
            HourMode::Twelve => (
                bcd_to_dec(raw.hour & HOUR_12H_MASK)?,
                raw.hour & HOUR_PM_BIT != 0,
            ),
            HourMode::TwentyFour => (bcd_to_dec(raw.hour & HOUR_24H_MASK)?, false),
        };
        let hour_ok = match mode {
            HourMode::Twelve => (1..=12).contains(&hour),
            HourMode::TwentyFour => hour < 24,
        };

        let snapshot = Self {
            hour,
            minute: bcd_to_dec(raw.minute)?,
            second: bcd_to_dec(raw.second)?,
            pm,
            year: bcd_to_dec(raw.year)?,
            month: bcd_to_dec(raw.month)?,
            day: bcd_to_dec(raw.date)?,
            weekday: raw.weekday,
        };

        if !hour_ok
            || snapshot.minute > 59
            || snapshot.second > 59
            || !(1..=12).contains(&snapshot.month)
            || !(1..=31).contains(&snapshot.day)
        {
            return Err(ClockError::OutOfRange);
        }
        Ok(snapshot)
    }

    /// Three-letter weekday, or `---` when the register is out of range.
    pub fn weekday_name(&self) -> &'static str {
        match self.weekday {
            1..=7 => WEEKDAYS[usize::from(self.weekday - 1)],
            _ => "---",
        }
    }

    /// Minutes since midnight.  In 12-hour mode a PM reading below 12
    /// carries a half-day offset and 12 AM folds back to zero.
    pub fn minutes_of_day(&self, mode: HourMode) -> i32 {
        let mut minutes = i32::from(self.hour) * 60 + i32::from(self.minute);
        if mode == HourMode::Twelve {
            if self.pm && self.hour < 12 {
                minutes += HALF_DAY_MINUTES;
            } else if !self.pm && self.hour == 12 {
                minutes -= HALF_DAY_MINUTES;
            }
        }
        minutes
    }
}

// ---------------------------------------------------------------------------
// Editable time of day
// ---------------------------------------------------------------------------

/// An hour/minute/meridiem triple as edited by the UI sessions and stored
/// as the armed alarm.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeOfDay {
    pub hour: u8,
    pub minute: u8,
    pub pm: bool,
}

impl TimeOfDay {
    /// 12:00 PM, the staging value on entry to and exit from a session.
    pub const NOON: Self = Self {
        hour: 12,
        minute: 0,
        pm: true,
    };

    pub const fn new(hour: u8, minute: u8, pm: bool) -> Self {
        Self { hour, minute, pm }
    }

    /// Minute + 1, wrapping 59 → 0.
    pub fn increment_minute(&mut self) {
        self.minute = if self.minute >= 59 { 0 } else { self.minute + 1 };
    }

    /// Hour + 1.  12-hour mode cycles 1..=24 and recomputes PM; 24-hour
    /// mode wraps 0..=23.
    ///
    /// The 12-hour cycle is 24 steps long: twelve steps return to the same
    /// clock-face hour with AM/PM flipped, twenty-four return exactly.
    pub fn increment_hour(&mut self, mode: HourMode) {
        self.hour = match mode {
            HourMode::Twelve if self.hour >= MIDNIGHT_SENTINEL => 1,
            HourMode::Twelve => self.hour + 1,
            HourMode::TwentyFour if self.hour >= 23 => 0,
            HourMode::TwentyFour => self.hour + 1,
        };
        self.pm = (12..MIDNIGHT_SENTINEL).contains(&self.hour);
    }

    /// The hour as it appears on the clock face.
    pub fn display_hour(&self, mode: HourMode) -> u8 {
        match mode {
            HourMode::Twelve if self.hour > 12 => self.hour - 12,
            HourMode::Twelve if self.hour == 0 => 12,
            HourMode::Twelve => self.hour,
            HourMode::TwentyFour => self.hour % 24,
        }
    }

    /// Minutes from midnight; the sentinel hour contributes a full day.
    pub fn minutes_of_day(&self) -> i32 {
        i32::from(self.hour) * 60 + i32::from(self.minute)
    }

    /// Convert the editing representation into the (hour, pm) pair the RTC
    /// expects for `mode`: the 12-hour offset is stripped.
    pub fn to_clock_hour(&self, mode: HourMode) -> (u8, bool) {
        match mode {
            HourMode::Twelve => (self.display_hour(mode), self.pm),
            HourMode::TwentyFour => (self.hour % 24, false),
        }
    }
}

impl Default for TimeOfDay {
    fn default() -> Self {
        Self::NOON
    }
}
