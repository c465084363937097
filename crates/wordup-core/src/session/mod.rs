//! Review Session Module
//!
//! - Queue building under practice, direction and context policies
//! - The per-learner session state machine
//! - Recap rounds over missed entries
//! - [`StudyEngine`], which wires the above to a [`crate::storage::CardStore`]
//!
//! Sessions are plain values. The engine never keeps one; callers hold the
//! live session (in memory, in a file, in a cookie) and pass it back in.

mod engine;
mod prompt;
mod queue;
mod recap;
mod state;

pub use engine::{AnswerOutcome, SessionStart, StudyEngine};
pub use prompt::Prompt;
pub use queue::{
    build_queue, ContextMode, DirectionPolicy, EmptyQueueReason, PracticeMode, PresentationMode,
    QueueEntry, QueueRequest, DEFAULT_SESSION_CARDS, MAX_SESSION_CARDS,
};
pub use recap::start_recap;
pub use state::{Completion, SessionState, SessionSummary};

use crate::storage::StorageError;

/// Session error type
///
/// None of these are fatal; each maps to "go back to a known state".
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// No session is live for this learner
    #[error("No active learning session")]
    NoActiveSession,
    /// Every entry has already been answered
    #[error("Session is complete")]
    SessionComplete,
    /// Recap requested without a previous session
    #[error("No previous session found for recap")]
    NoPriorSession,
    /// Recap requested for a different chapter than the live session
    #[error("Session chapter mismatch: session is for {session}, recap requested for {requested}")]
    ChapterMismatch { session: String, requested: String },
    /// The previous session had no wrong answers
    #[error("No wrong cards to recap")]
    NoWrongCards,
    /// An answered card no longer exists in the store
    #[error("Card not found: {0}")]
    CardNotFound(String),
    /// Summary requested for a session with no entries
    #[error("Session has no entries")]
    EmptySession,
    /// Store failure
    #[error(transparent)]
    Storage(#[from] StorageError),
}
