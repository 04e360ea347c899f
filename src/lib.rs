//! AlarmLink firmware library.
//!
//! Exposes the pure-logic modules for integration testing and external
//! inspection. All ESP-IDF-specific code is guarded by
//! `#[cfg(target_os = "espidf")]` within each module.

#![deny(unused_must_use)]

pub mod app;
pub mod config;
pub mod error;
pub mod events;
pub mod fsm;
pub mod input;
pub mod scheduler;
pub mod shared;
pub mod time;

pub mod pins;

// Hardware-facing modules; the raw ESP-IDF calls inside are cfg-gated
// with host stubs so the crate builds everywhere.
pub mod adapters;
pub mod drivers;
