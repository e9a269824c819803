//! Test utilities shared by the unit tests.
//!
//! - Scripted in-memory gateways that can be held on a `Notify` gate
//! - Factories for credentials, results and documents

mod factories;
mod session_mocks;

pub use factories::*;
pub use session_mocks::*;
