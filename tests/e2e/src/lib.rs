//! WordUp end-to-end test support
//!
//! - [`harness`]: isolated on-disk databases
//! - [`mocks`]: chapter and card fixtures

pub mod mocks;

pub use harness::TestDatabaseManager;
pub use mocks::{TestDataFactory, TestScenario};
