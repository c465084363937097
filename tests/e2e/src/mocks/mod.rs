//! Test fixtures


pub use fixtures::{TestDataFactory, TestScenario};
