//! Admin token: exclusive ownership of the display and buttons.
//!
//! Exactly one UI machine owns the token at any tick boundary.  Only the
//! owner may hand it on, either to a requester or back to DisplayTime.
//! The owner cell sits behind a critical-section mutex, so a transfer is
//! a single indivisible check-and-set even on a preemptive scheduler.

use core::cell::Cell;

use embassy_sync::blocking_mutex::Mutex;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use log::info;
use serde::Serialize;

use crate::error::AdminError;

/// Identity of each UI state machine that can own the token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum UiOwner {
    DisplayTime,
    SetAlarm,
    SetTime,
}

/// Single-writer arbitration object shared by the three UI machines.
pub struct AdminToken {
    owner: Mutex<CriticalSectionRawMutex, Cell<UiOwner>>,
}

impl AdminToken {
    /// Boot state: DisplayTime owns the token.
    pub const fn new() -> Self {
        Self {
            owner: Mutex::new(Cell::new(UiOwner::DisplayTime)),
        }
    }

    pub fn owner(&self) -> UiOwner {
        self.owner.lock(Cell::get)
    }

    pub fn is_held_by(&self, who: UiOwner) -> bool {
        self.owner() == who
    }

    /// Move the token from `current` to `requested`.  Fails unless
    /// `current` is the present owner.
    pub fn request_transfer(
        &self,
        current: UiOwner,
        requested: UiOwner,
    ) -> Result<(), AdminError> {
        self.owner.lock(|cell| {
            let owner = cell.get();
            if owner != current {
                return Err(AdminError::NotOwner {
                    caller: current,
                    owner,
                });
            }
            cell.set(requested);
            Ok(())
        })?;
        if current != requested {
            info!("ADMIN | {:?} -> {:?}", current, requested);
        }
        Ok(())
    }

    /// Give the token back to DisplayTime at the end of a session.
    /// A no-op when DisplayTime already owns it.
    pub fn return_to_display(&self, from: UiOwner) -> Result<(), AdminError> {
        if self.is_held_by(UiOwner::DisplayTime) {
            return Ok(());
        }
        self.request_transfer(from, UiOwner::DisplayTime)
    }
}

impl Default for AdminToken {
    fn default() -> Self {
        Self::new()
    }
}
