//! # WordUp Core
//!
//! Leitner-box vocabulary trainer. Cards are bilingual word pairs grouped
//! into chapters; each card sits in one of five boxes with growing review
//! intervals.
//!
//! - **SRS policy**: correct answers move a card up one box (ceiling 5),
//!   wrong answers send it back to box 1
//! - **Queue building**: due-only, all-cards and box-specific practice, with
//!   word, context and combined presentation
//! - **Sessions**: copy-on-write state machine with a wrong-answer log
//! - **Recap**: non-scoring replay of the previous round's misses, chaining
//!   until a round ends clean
//! - **Storage**: SQLite catalog, review history, chapter export/import
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use wordup_core::{NewCard, QueueRequest, SessionStart, Storage, StudyEngine, SystemClock};
//!
//! let storage = Storage::new(None)?;
//! let chapter = storage.create_chapter("Animals", "German", "English")?;
//! storage.create_card(&chapter.id, NewCard::new("Hund", "dog"))?;
//!
//! let engine = StudyEngine::new(&storage, SystemClock);
//! if let SessionStart::Started(session) = engine.start_session(&chapter.id, &QueueRequest::default())? {
//!     let prompt = engine.current_prompt(Some(&session))?;
//!     let entry = session.current_entry()?;
//!     let outcome = engine.submit_answer(Some(&session), &prompt.card_id, true, entry.direction)?;
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `bundled-sqlite` (default): Compile SQLite into the binary
//! - `encryption`: SQLCipher, keyed by `WORDUP_ENCRYPTION_KEY`

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(rustdoc::missing_crate_level_docs)]

// ============================================================================
// MODULES
// ============================================================================

pub mod session;
pub mod srs;
pub mod stats;
pub mod storage;
pub mod vocab;

// ============================================================================
// PUBLIC API RE-EXPORTS
// ============================================================================

// Scheduling
pub use srs::{
    calculate_next_review, is_due, normalize_timestamp, select_due, BoxLevel, Clock, FixedClock,
    InvalidBoxLevel, ReviewResult, SystemClock, BOX_INTERVALS,
};

// Vocabulary
pub use vocab::{
    parse_bulk_text, Card, Chapter, ChapterWithCards, Direction, MissingWords, NewCard, ReviewRecord,
};

// Sessions
pub use session::{
    build_queue, start_recap, AnswerOutcome, Completion, ContextMode, DirectionPolicy,
    EmptyQueueReason, PracticeMode, PresentationMode, Prompt, QueueEntry, QueueRequest,
    SessionError, SessionStart, SessionState, SessionSummary, StudyEngine, DEFAULT_SESSION_CARDS,
    MAX_SESSION_CARDS,
};

// Statistics
pub use stats::{ChapterStats, Dashboard};

// Storage
pub use storage::{ArchiveImport, CardStore, ChapterExport, Result, Storage, StorageError};

// ============================================================================
// VERSION INFO
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// ============================================================================
// PRELUDE
// ============================================================================

/// Convenient imports for common usage
pub mod prelude {
    pub use crate::{
        BoxLevel, Card, CardStore, Chapter, Clock, ContextMode, Direction, NewCard, PracticeMode,
        QueueRequest, Result, SessionError, SessionStart, SessionState, Storage, StorageError,
        StudyEngine, SystemClock,
    };
}
