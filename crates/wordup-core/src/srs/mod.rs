//! Leitner Scheduling Module
//!
//! Five-box spaced repetition with a fixed interval table:
//!
//! | Box | Interval |
//! |-----|----------|
//! | 1   | 1 day    |
//! | 2   | 3 days   |
//! | 3   | 7 days   |
//! | 4   | 14 days  |
//! | 5   | 30 days  |
//!
//! A correct answer promotes a card one box (box 5 is the ceiling), a wrong
//! answer demotes it straight back to box 1. There is no partial credit.
//!
//! Time is always read through a [`Clock`] so schedules can be tested
//! against a fixed instant.

mod clock;
mod due;
mod policy;

pub use clock::{normalize_timestamp, Clock, FixedClock, SystemClock};
pub use due::{is_due, select_due};
pub use policy::{calculate_next_review, BoxLevel, InvalidBoxLevel, ReviewResult, BOX_INTERVALS};
