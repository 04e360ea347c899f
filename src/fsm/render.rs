//! Screen templates for the 2×16 character display.
//!
//! Positions are 1-based and linear: 1..=16 is the top line, 17..=32 the
//! bottom line.
//!
//! ```text
//!  clock screen                    session screen
//!  ┌────────────────┐              ┌────────────────┐
//!  │12:34PM  *07:00A│              │Set Alarm       │
//!  │03/09/2024 FRI  │              │12:00PM         │
//!  └────────────────┘              └────────────────┘
//! ```

use core::fmt::Write;

use heapless::String;

use crate::app::ports::DisplayPort;
use crate::shared::AlarmSetting;
use crate::time::{HourMode, TimeOfDay, TimeSnapshot};

pub const TIME_POS: u8 = 1;
pub const MERIDIEM_POS: u8 = 6;
pub const ALARM_SUMMARY_POS: u8 = 10;
pub const DATE_POS: u8 = 17;
pub const WEEKDAY_POS: u8 = 28;

pub const TITLE_POS: u8 = 1;
pub const STAGING_TIME_POS: u8 = 17;
pub const STAGING_MERIDIEM_POS: u8 = 22;

fn meridiem(pm: bool) -> &'static str {
    if pm { "PM" } else { "AM" }
}

fn hh_mm(hour: u8, minute: u8) -> String<8> {
    let mut s = String::new();
    // Capacity covers the widest u8 pair; the write cannot fail.
    let _ = write!(s, "{:02}:{:02}", hour, minute);
    s
}

/// Draw the default clock screen.  Without a snapshot only the time
/// placeholder is shown.
pub fn clock_screen(
    display: &mut impl DisplayPort,
    snapshot: Option<&TimeSnapshot>,
    mode: HourMode,
    alarm: AlarmSetting,
) {
    display.clear();

    match snapshot {
        Some(now) => {
            display.write_str(TIME_POS, &hh_mm(now.hour, now.minute));
            if mode == HourMode::Twelve {
                display.write_str(MERIDIEM_POS, meridiem(now.pm));
            }
            let mut date: String<12> = String::new();
            let _ = write!(date, "{:02}/{:02}/20{:02}", now.month, now.day, now.year);
            display.write_str(DATE_POS, &date);
            display.write_str(WEEKDAY_POS, now.weekday_name());
        }
        None => display.write_str(TIME_POS, "--:--"),
    }

    if alarm.armed {
        display.write_char(ALARM_SUMMARY_POS, '*');
        let t = alarm.time;
        display.write_str(ALARM_SUMMARY_POS + 1, &hh_mm(t.display_hour(mode), t.minute));
        if mode == HourMode::Twelve {
            display.write_char(ALARM_SUMMARY_POS + 6, if t.pm { 'P' } else { 'A' });
        }
    }
}

/// Draw a Set-Alarm / Set-Time editing screen.
pub fn session_screen(
    display: &mut impl DisplayPort,
    title: &str,
    staging: TimeOfDay,
    mode: HourMode,
) {
    display.clear();
    display.write_str(TITLE_POS, title);
    display.write_str(
        STAGING_TIME_POS,
        &hh_mm(staging.display_hour(mode), staging.minute),
    );
    if mode == HourMode::Twelve {
        display.write_str(STAGING_MERIDIEM_POS, meridiem(staging.pm));
    }
}
