//! Fixed-period cooperative task scheduler.
//!
//! Each state machine is a task with its own period.  A hardware timer
//! produces a base tick; every base tick the scheduler adds the elapsed
//! time to each task's accumulator and notifies a [`SchedulerDelegate`]
//! for every task that has come due, in table order.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │  hw_timer ──▶ Event::BaseTick ──▶ Scheduler::tick(elapsed)   │
//! │                                        │                     │
//! │       ┌────────────┬───────────────────┼──────────────┐      │
//! │       ▼            ▼                   ▼              ▼      │
//! │  DisplayTime   SetAlarm/SetTime   AlarmCheck    Light/Tone   │
//! │    200 ms          50 ms            1000 ms       200 ms     │
//! │                                                              │
//! │              SchedulerDelegate::on_task_due(task)            │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! The scheduler knows nothing about the machines it drives; the main
//! loop implements the delegate by forwarding to the service.

use embassy_time::Duration;
use log::{info, warn};
use serde::Serialize;

use crate::config::SystemConfig;

// ═══════════════════════════════════════════════════════════════
//  Task identity
// ═══════════════════════════════════════════════════════════════

/// Every periodic task in the firmware, across both nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TaskId {
    DisplayTime,
    SetAlarm,
    SetTime,
    AlarmCheck,
    Light,
    Tone,
    RemoteOff,
}

impl TaskId {
    /// Tasks run by the main unit, in dispatch order.
    pub const MAIN_UNIT: [Self; 6] = [
        Self::DisplayTime,
        Self::SetAlarm,
        Self::SetTime,
        Self::AlarmCheck,
        Self::Light,
        Self::Tone,
    ];

    /// Tasks run by the remote unit.
    pub const REMOTE_UNIT: [Self; 1] = [Self::RemoteOff];

    pub fn label(self) -> &'static str {
        match self {
            Self::DisplayTime => "display-time",
            Self::SetAlarm => "set-alarm",
            Self::SetTime => "set-time",
            Self::AlarmCheck => "alarm-check",
            Self::Light => "light",
            Self::Tone => "tone",
            Self::RemoteOff => "remote-off",
        }
    }
}

// ═══════════════════════════════════════════════════════════════
//  Delegate
// ═══════════════════════════════════════════════════════════════

/// Callback the scheduler invokes when a task comes due.
pub trait SchedulerDelegate {
    fn on_task_due(&mut self, task: TaskId);
}

// ═══════════════════════════════════════════════════════════════
//  Scheduler engine
// ═══════════════════════════════════════════════════════════════

/// Maximum number of tasks (stack-allocated).
const MAX_TASKS: usize = 8;

/// Internal bookkeeping for one periodic task.
#[derive(Debug, Clone, Copy)]
struct TaskSlot {
    task: TaskId,
    period: Duration,
    elapsed: Duration,
    runs: u64,
}

/// The scheduler engine.
pub struct Scheduler {
    slots: [Option<TaskSlot>; MAX_TASKS],
    enabled: bool,
}

impl Scheduler {
    pub fn new() -> Self {
        Self {
            slots: [None; MAX_TASKS],
            enabled: true,
        }
    }

    /// Build a scheduler with every task in `tasks` at its configured
    /// period.
    pub fn from_config(config: &SystemConfig, tasks: &[TaskId]) -> Self {
        let mut sched = Self::new();
        for &task in tasks {
            if sched.add(task, config.task_period(task)).is_none() {
                warn!("Scheduler: no slot left for '{}'", task.label());
            }
        }
        sched
    }

    /// Add a task.  Returns the slot index, or `None` if full.
    pub fn add(&mut self, task: TaskId, period: Duration) -> Option<usize> {
        for (i, slot) in self.slots.iter_mut().enumerate() {
            if slot.is_none() {
                info!(
                    "Scheduler: '{}' every {} ms at slot {}",
                    task.label(),
                    period.as_millis(),
                    i
                );
                *slot = Some(TaskSlot {
                    task,
                    period,
                    elapsed: Duration::from_ticks(0),
                    runs: 0,
                });
                return Some(i);
            }
        }
        None
    }

    /// Enable or disable the entire scheduler.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Advance every task by `elapsed` and notify `delegate` of each task
    /// that came due.  A task fires at most once per call; any excess
    /// beyond one period is dropped rather than replayed.
    pub fn tick(&mut self, elapsed: Duration, delegate: &mut dyn SchedulerDelegate) {
        if !self.enabled {
            return;
        }

        for slot in self.slots.iter_mut().flatten() {
            slot.elapsed += elapsed;
            if slot.elapsed >= slot.period {
                slot.elapsed = if slot.elapsed >= slot.period + slot.period {
                    Duration::from_ticks(0)
                } else {
                    slot.elapsed - slot.period
                };
                slot.runs += 1;
                delegate.on_task_due(slot.task);
            }
        }
    }

    /// How many times `task` has fired.
    pub fn runs(&self, task: TaskId) -> u64 {
        self.slots
            .iter()
            .flatten()
            .find(|s| s.task == task)
            .map_or(0, |s| s.runs)
    }

    pub fn task_count(&self) -> usize {
        self.slots.iter().flatten().count()
    }
}

impl Default for Scheduler {
    fn default() -> Self {
        Self::new()
    }
}

// ═══════════════════════════════════════════════════════════════
//  Tests
// ═══════════════════════════════════════════════════════════════
