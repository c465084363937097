//! Vocabulary cards and their review history

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::srs::BoxLevel;

// ============================================================================
// DIRECTION
// ============================================================================

/// Which side of a card is asked
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Show the source word, expect the target word
    SourceToTarget,
    /// Show the target word, expect the source word
    TargetToSource,
    /// Show the source word with its hint, expect the example sentence
    Context,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::SourceToTarget => "source_to_target",
            Direction::TargetToSource => "target_to_source",
            Direction::Context => "context",
        }
    }

    pub fn parse_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "source_to_target" => Some(Direction::SourceToTarget),
            "target_to_source" => Some(Direction::TargetToSource),
            "context" => Some(Direction::Context),
            _ => None,
        }
    }

    pub fn is_context(&self) -> bool {
        matches!(self, Direction::Context)
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// CARD
// ============================================================================

/// A bilingual word pair with its Leitner state
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// Unique identifier (UUID v4)
    pub id: String,
    /// Owning chapter, fixed for the card's lifetime
    pub chapter_id: String,
    pub source_word: String,
    pub target_word: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example_sentence: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_hint: Option<String>,
    pub box_level: BoxLevel,
    /// Next scheduled review (UTC)
    pub next_review: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Card {
    /// Whether the card can be asked in context mode
    ///
    /// Requires both a hint and an example sentence with visible text.
    pub fn has_context(&self) -> bool {
        non_blank(self.context_hint.as_deref()) && non_blank(self.example_sentence.as_deref())
    }

    /// Whether the card is due at `now`
    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        crate::srs::is_due(self, now)
    }
}

fn non_blank(value: Option<&str>) -> bool {
    value.is_some_and(|v| !v.trim().is_empty())
}

/// A card without a source or target word
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Source and target words are required")]
pub struct MissingWords;

/// Input for creating or editing a card
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCard {
    pub source_word: String,
    pub target_word: String,
    #[serde(default)]
    pub example_sentence: Option<String>,
    #[serde(default)]
    pub context_hint: Option<String>,
}

impl NewCard {
    pub fn new(source_word: impl Into<String>, target_word: impl Into<String>) -> Self {
        Self {
            source_word: source_word.into(),
            target_word: target_word.into(),
            ..Default::default()
        }
    }

    pub fn with_example(mut self, sentence: impl Into<String>) -> Self {
        self.example_sentence = Some(sentence.into());
        self
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.context_hint = Some(hint.into());
        self
    }

    /// Trim all fields, drop empty optionals, and reject missing words
    pub fn normalized(self) -> Result<Self, MissingWords> {
        let source_word = self.source_word.trim().to_string();
        let target_word = self.target_word.trim().to_string();
        if source_word.is_empty() || target_word.is_empty() {
            return Err(MissingWords);
        }

        Ok(Self {
            source_word,
            target_word,
            example_sentence: trimmed_optional(self.example_sentence),
            context_hint: trimmed_optional(self.context_hint),
        })
    }
}

fn trimmed_optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// ============================================================================
// REVIEW RECORD
// ============================================================================

/// One scored answer, append-only
///
/// Only word-mode answers outside recap rounds produce records, so the
/// direction is never [`Direction::Context`] for records written by the
/// session engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRecord {
    pub id: String,
    pub card_id: String,
    pub correct: bool,
    pub direction: Direction,
    pub reviewed_at: DateTime<Utc>,
}

impl ReviewRecord {
    pub fn new(card_id: impl Into<String>, correct: bool, direction: Direction, reviewed_at: DateTime<Utc>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            card_id: card_id.into(),
            correct,
            direction,
            reviewed_at,
        }
    }
}
