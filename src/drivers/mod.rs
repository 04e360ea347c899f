//! Peripheral drivers, hardware initialisation and timers.

pub mod ds3231;
pub mod hw_init;
pub mod hw_timer;
pub mod lcd;
pub mod tone;
