//! Process-wide state shared between the main-unit machines.
//!
//! ```text
//!                 ┌──────────────── SharedState ────────────────┐
//!  DisplayTime ──▶│ admin · hour_mode · snapshot                │
//!  SetAlarm    ──▶│ admin · alarm (write on Save)               │
//!  AlarmCheck  ──▶│ alarm (read, clear) · alarm_active (write)  │
//!  Light/Tone  ──▶│ alarm_active (read)                         │
//!                 └─────────────────────────────────────────────┘
//! ```
//!
//! Multi-field values sit behind critical-section mutexes holding a
//! `Cell`, so readers always see a whole value.  The alarm-active flag is
//! a plain atomic.

use core::cell::Cell;
use core::sync::atomic::{AtomicBool, Ordering};

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use serde::Serialize;

use crate::fsm::admin::AdminToken;
use crate::time::{HourMode, TimeOfDay, TimeSnapshot};

/// Field value the original hardware stored in a cleared alarm.
const CLEARED_FIELD: u8 = 0x0F;

/// The armed alarm, or the cleared sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AlarmSetting {
    pub time: TimeOfDay,
    pub armed: bool,
}

impl AlarmSetting {
    pub const CLEARED: Self = Self {
        time: TimeOfDay::new(CLEARED_FIELD, CLEARED_FIELD, false),
        armed: false,
    };

    pub const fn armed(time: TimeOfDay) -> Self {
        Self { time, armed: true }
    }
}

type Guarded<T> = Mutex<CriticalSectionRawMutex, Cell<T>>;

/// Shared state of the main unit.
pub struct SharedState {
    pub admin: AdminToken,
    hour_mode: Guarded<HourMode>,
    snapshot: Guarded<Option<TimeSnapshot>>,
    alarm: Guarded<AlarmSetting>,
    alarm_active: AtomicBool,
}

impl SharedState {
    pub const fn new(hour_mode: HourMode) -> Self {
        Self {
            admin: AdminToken::new(),
            hour_mode: Mutex::new(Cell::new(hour_mode)),
            snapshot: Mutex::new(Cell::new(None)),
            alarm: Mutex::new(Cell::new(AlarmSetting::CLEARED)),
            alarm_active: AtomicBool::new(false),
        }
    }

    // ── Hour mode ─────────────────────────────────────────────

    pub fn hour_mode(&self) -> HourMode {
        self.hour_mode.lock(Cell::get)
    }

    /// Flip 12/24-hour mode and return the new mode.
    pub(crate) fn toggle_hour_mode(&self) -> HourMode {
        self.hour_mode.lock(|cell| {
            let next = cell.get().toggled();
            cell.set(next);
            next
        })
    }

    // ── Time snapshot ─────────────────────────────────────────

    /// Latest decoded clock reading, `None` before the first render.
    pub fn snapshot(&self) -> Option<TimeSnapshot> {
        self.snapshot.lock(Cell::get)
    }

    pub(crate) fn store_snapshot(&self, snapshot: TimeSnapshot) {
        self.snapshot.lock(|cell| cell.set(Some(snapshot)));
    }

    // ── Alarm store ───────────────────────────────────────────

    pub fn alarm(&self) -> AlarmSetting {
        self.alarm.lock(Cell::get)
    }

    pub(crate) fn arm_alarm(&self, time: TimeOfDay) {
        self.alarm.lock(|cell| cell.set(AlarmSetting::armed(time)));
    }

    pub(crate) fn clear_alarm(&self) {
        self.alarm.lock(|cell| cell.set(AlarmSetting::CLEARED));
    }

    // ── Alarm-active flag ─────────────────────────────────────

    pub fn alarm_active(&self) -> bool {
        self.alarm_active.load(Ordering::Acquire)
    }

    /// Written by the alarm-check machine only.
    pub(crate) fn set_alarm_active(&self, active: bool) {
        self.alarm_active.store(active, Ordering::Release);
    }
}
