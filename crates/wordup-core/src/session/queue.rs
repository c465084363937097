//! Queue Builder
//!
//! Turns a chapter's cards into an ordered list of [`QueueEntry`] values:
//!
//! 1. pick candidates by practice mode (due only, all cards, one box)
//! 2. shuffle and truncate to the session limit (never more than
//!    [`MAX_SESSION_CARDS`])
//! 3. expand by context mode, resolving each word entry's direction once
//!
//! Directions are decided here and stored on the entry. Nothing downstream
//! re-rolls them, which is what lets a recap round replay a missed entry
//! exactly as it was asked.

use std::fmt;

use chrono::{DateTime, Utc};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::srs::{select_due, BoxLevel};
use crate::vocab::{Card, Direction};

/// Hard ceiling on cards per session, whatever the caller asks for
pub const MAX_SESSION_CARDS: usize = 50;

/// Session size when the caller does not choose one
pub const DEFAULT_SESSION_CARDS: usize = 10;

// ============================================================================
// ENTRIES
// ============================================================================

/// How a card is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PresentationMode {
    Word,
    Context,
}

/// One question in a session
///
/// Context entries always carry [`Direction::Context`]; word entries carry a
/// resolved word direction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueEntry {
    pub card_id: String,
    pub mode: PresentationMode,
    pub direction: Direction,
}

impl QueueEntry {
    pub fn word(card_id: impl Into<String>, direction: Direction) -> Self {
        debug_assert!(!direction.is_context(), "word entries need a word direction");
        Self {
            card_id: card_id.into(),
            mode: PresentationMode::Word,
            direction,
        }
    }

    pub fn context(card_id: impl Into<String>) -> Self {
        Self {
            card_id: card_id.into(),
            mode: PresentationMode::Context,
            direction: Direction::Context,
        }
    }
}

// ============================================================================
// POLICIES
// ============================================================================

/// Which cards are eligible
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "box")]
pub enum PracticeMode {
    /// Only cards whose next review has passed
    #[default]
    DueOnly,
    /// Every card in the chapter
    AllCards,
    /// Every card currently in one box
    BoxSpecific(BoxLevel),
}

/// How word-mode directions are chosen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DirectionPolicy {
    SourceToTarget,
    TargetToSource,
    /// Fair coin per entry
    #[default]
    Random,
}

impl DirectionPolicy {
    pub fn parse_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "source_to_target" => Some(DirectionPolicy::SourceToTarget),
            "target_to_source" => Some(DirectionPolicy::TargetToSource),
            "random" => Some(DirectionPolicy::Random),
            _ => None,
        }
    }

    /// Resolve to a concrete word direction
    pub fn resolve<R: Rng + ?Sized>(&self, rng: &mut R) -> Direction {
        match self {
            DirectionPolicy::SourceToTarget => Direction::SourceToTarget,
            DirectionPolicy::TargetToSource => Direction::TargetToSource,
            DirectionPolicy::Random => {
                if rng.gen_bool(0.5) {
                    Direction::SourceToTarget
                } else {
                    Direction::TargetToSource
                }
            }
        }
    }
}

/// Word questions, context questions, or both
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextMode {
    Word,
    Context,
    #[default]
    Combined,
}

impl ContextMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContextMode::Word => "word",
            ContextMode::Context => "context",
            ContextMode::Combined => "combined",
        }
    }

    pub fn parse_name(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "word" => Some(ContextMode::Word),
            "context" => Some(ContextMode::Context),
            "combined" => Some(ContextMode::Combined),
            _ => None,
        }
    }
}

/// Everything the builder needs besides the cards
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueRequest {
    pub practice_mode: PracticeMode,
    pub direction: DirectionPolicy,
    pub context_mode: ContextMode,
    /// Requested number of cards, clamped to [`MAX_SESSION_CARDS`]
    pub limit: usize,
}

impl Default for QueueRequest {
    fn default() -> Self {
        Self {
            practice_mode: PracticeMode::default(),
            direction: DirectionPolicy::default(),
            context_mode: ContextMode::default(),
            limit: DEFAULT_SESSION_CARDS,
        }
    }
}

impl QueueRequest {
    pub fn effective_limit(&self) -> usize {
        self.limit.min(MAX_SESSION_CARDS)
    }
}

// ============================================================================
// EMPTY QUEUE
// ============================================================================

/// Why no session could be built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyQueueReason {
    /// Box-specific practice found nothing to ask
    NoCardsInBox(BoxLevel),
    /// Context mode found no card with both a hint and an example sentence
    NoContextCards,
    NoCards,
}

impl fmt::Display for EmptyQueueReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EmptyQueueReason::NoCardsInBox(level) => {
                write!(f, "No cards available in Box {} for this chapter", level)
            }
            EmptyQueueReason::NoContextCards => {
                f.write_str("No cards with context hints available for review in this chapter")
            }
            EmptyQueueReason::NoCards => f.write_str("No cards available for review in this chapter"),
        }
    }
}

// ============================================================================
// BUILDER
// ============================================================================

/// Build the entry list for a new session
///
/// Returns the reason instead of an empty list when there is nothing to ask.
/// The context filter runs after truncation, so a context-mode session can
/// hold fewer entries than the limit even when the chapter has more
/// eligible cards.
pub fn build_queue<R: Rng + ?Sized>(
    cards: &[Card],
    request: &QueueRequest,
    now: DateTime<Utc>,
    rng: &mut R,
) -> Result<Vec<QueueEntry>, EmptyQueueReason> {
    let mut candidates: Vec<&Card> = match request.practice_mode {
        PracticeMode::DueOnly => select_due(cards, now),
        PracticeMode::AllCards => cards.iter().collect(),
        PracticeMode::BoxSpecific(level) => cards.iter().filter(|c| c.box_level == level).collect(),
    };

    candidates.shuffle(rng);
    candidates.truncate(request.effective_limit());

    let mut entries = Vec::with_capacity(candidates.len() * 2);
    match request.context_mode {
        ContextMode::Word => {
            for card in candidates {
                entries.push(QueueEntry::word(&card.id, request.direction.resolve(rng)));
            }
        }
        ContextMode::Context => {
            for card in candidates.into_iter().filter(|c| c.has_context()) {
                entries.push(QueueEntry::context(&card.id));
            }
        }
        ContextMode::Combined => {
            for card in candidates {
                if card.has_context() {
                    entries.push(QueueEntry::context(&card.id));
                }
                entries.push(QueueEntry::word(&card.id, request.direction.resolve(rng)));
            }
            entries.shuffle(rng);
        }
    }

    if entries.is_empty() {
        return Err(empty_reason(request));
    }

    Ok(entries)
}

fn empty_reason(request: &QueueRequest) -> EmptyQueueReason {
    match (request.practice_mode, request.context_mode) {
        (PracticeMode::BoxSpecific(level), _) => EmptyQueueReason::NoCardsInBox(level),
        (_, ContextMode::Context) => EmptyQueueReason::NoContextCards,
        _ => EmptyQueueReason::NoCards,
    }
}
