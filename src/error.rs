//! Unified error types for the alarm clock firmware.
//!
//! A single `Error` enum that every subsystem can convert into, keeping
//! the binaries' error handling uniform.  All variants are `Copy` so they
//! can be carried through FSM inputs and [`AppEvent`](crate::app::events::AppEvent)s
//! without allocation.

use core::fmt;

use crate::fsm::admin::UiOwner;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The real-time clock could not be read or written.
    Clock(ClockError),
    /// A UI state machine tried to move the admin token it does not hold.
    Admin(AdminError),
    /// Configuration is invalid.
    Config(ConfigError),
    /// Peripheral initialisation failed.
    Init(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clock(e) => write!(f, "clock: {e}"),
            Self::Admin(e) => write!(f, "admin: {e}"),
            Self::Config(e) => write!(f, "config: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Clock errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClockError {
    /// The I²C transaction with the RTC failed.
    Bus,
    /// A register held a nibble above 9.
    InvalidBcd(u8),
    /// A decoded field is outside its calendar range.
    OutOfRange,
}

impl fmt::Display for ClockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bus => write!(f, "RTC bus transaction failed"),
            Self::InvalidBcd(raw) => write!(f, "invalid BCD byte 0x{raw:02x}"),
            Self::OutOfRange => write!(f, "decoded field out of range"),
        }
    }
}

impl std::error::Error for ClockError {}

impl From<ClockError> for Error {
    fn from(e: ClockError) -> Self {
        Self::Clock(e)
    }
}

// ---------------------------------------------------------------------------
// Admin token errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdminError {
    /// `caller` asked to move the token while `owner` holds it.
    NotOwner { caller: UiOwner, owner: UiOwner },
}

impl fmt::Display for AdminError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotOwner { caller, owner } => {
                write!(f, "{caller:?} does not hold the token (owner is {owner:?})")
            }
        }
    }
}

impl std::error::Error for AdminError {}

impl From<AdminError> for Error {
    fn from(e: AdminError) -> Self {
        Self::Admin(e)
    }
}

// ---------------------------------------------------------------------------
// Configuration errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// A config field failed range validation.
    /// The `&'static str` describes which field and why.
    ValidationFailed(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ValidationFailed(msg) => write!(f, "validation failed: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Self::Config(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
