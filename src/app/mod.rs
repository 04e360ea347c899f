//! Application core: pure domain logic, zero I/O.
//!
//! [`service::MainUnit`] runs the clock node's six machines and
//! [`remote::RemoteUnit`] the off-switch node.  All interaction with
//! hardware happens through **port traits** defined in [`ports`], keeping
//! this layer fully testable without real peripherals.

pub mod events;
pub mod ports;
pub mod remote;
pub mod service;
