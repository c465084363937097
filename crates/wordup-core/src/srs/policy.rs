//! Box transitions and review intervals

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Review interval in days for boxes 1 through 5
pub const BOX_INTERVALS: [i64; 5] = [1, 3, 7, 14, 30];

/// A Leitner box
///
/// Closed enumeration so the 1..=5 range is enforced by the type rather than
/// by clamping integers at every call site.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum BoxLevel {
    /// New or recently missed cards, reviewed daily
    #[default]
    One,
    Two,
    Three,
    Four,
    /// Ceiling box, reviewed monthly
    Five,
}

/// Raised when an integer outside 1..=5 is used as a box level
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("box level must be between 1 and 5, got {0}")]
pub struct InvalidBoxLevel(pub i64);

impl BoxLevel {
    /// All boxes in ascending order
    pub const ALL: [BoxLevel; 5] = [
        BoxLevel::One,
        BoxLevel::Two,
        BoxLevel::Three,
        BoxLevel::Four,
        BoxLevel::Five,
    ];

    /// Convert from the 1-based box number
    pub fn from_number(n: i64) -> Result<Self, InvalidBoxLevel> {
        match n {
            1 => Ok(BoxLevel::One),
            2 => Ok(BoxLevel::Two),
            3 => Ok(BoxLevel::Three),
            4 => Ok(BoxLevel::Four),
            5 => Ok(BoxLevel::Five),
            other => Err(InvalidBoxLevel(other)),
        }
    }

    /// The 1-based box number
    pub fn number(self) -> u8 {
        match self {
            BoxLevel::One => 1,
            BoxLevel::Two => 2,
            BoxLevel::Three => 3,
            BoxLevel::Four => 4,
            BoxLevel::Five => 5,
        }
    }

    /// Zero-based position, used to index per-box tables
    pub fn index(self) -> usize {
        usize::from(self.number()) - 1
    }

    /// Next box up, saturating at box 5
    pub fn promote(self) -> Self {
        match self {
            BoxLevel::One => BoxLevel::Two,
            BoxLevel::Two => BoxLevel::Three,
            BoxLevel::Three => BoxLevel::Four,
            BoxLevel::Four | BoxLevel::Five => BoxLevel::Five,
        }
    }

    pub fn interval_days(self) -> i64 {
        BOX_INTERVALS[self.index()]
    }

    pub fn interval(self) -> Duration {
        Duration::days(self.interval_days())
    }
}

impl TryFrom<u8> for BoxLevel {
    type Error = InvalidBoxLevel;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        BoxLevel::from_number(i64::from(value))
    }
}

impl From<BoxLevel> for u8 {
    fn from(level: BoxLevel) -> Self {
        level.number()
    }
}

impl FromStr for BoxLevel {
    type Err = InvalidBoxLevel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let n: i64 = s.trim().parse().map_err(|_| InvalidBoxLevel(0))?;
        BoxLevel::from_number(n)
    }
}

impl fmt::Display for BoxLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// Outcome of scoring one answer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResult {
    pub box_level: BoxLevel,
    pub next_review: DateTime<Utc>,
}

/// Calculate the new box and next review instant for an answer
///
/// Correct answers move the card up one box, wrong answers reset it to box 1.
/// The next review is `now` plus the interval of the *new* box.
pub fn calculate_next_review(box_level: BoxLevel, correct: bool, now: DateTime<Utc>) -> ReviewResult {
    let new_box = if correct {
        box_level.promote()
    } else {
        BoxLevel::One
    };

    ReviewResult {
        box_level: new_box,
        next_review: now + new_box.interval(),
    }
}
