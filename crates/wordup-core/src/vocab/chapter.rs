//! Chapters group cards sharing a language pair

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Card;

/// A named collection of cards for one source/target language pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    pub id: String,
    pub name: String,
    pub source_language: String,
    pub target_language: String,
    pub created_at: DateTime<Utc>,
}

/// A chapter snapshot with all of its cards
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterWithCards {
    pub chapter: Chapter,
    pub cards: Vec<Card>,
}
