//! Integration test driver for `tests/integration/` submodule.
//!
//! Each `mod` below maps to a file that exercises a specific flow against
//! mock adapters.  All tests run on the host (x86_64) with no real
//! hardware required.

mod end_to_end_tests;
mod handshake_tests;
mod mock_hw;
mod rig;
mod ui_session_tests;
