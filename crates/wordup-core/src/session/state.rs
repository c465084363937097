//! Session State Machine
//!
//! A session is `active` while `current_index < entries.len()` and
//! `complete` once every entry has been answered. Transitions return a new
//! [`SessionState`]; the caller decides where the live session is kept.

use serde::{Deserialize, Serialize};

use super::queue::{ContextMode, QueueEntry};
use super::SessionError;
use crate::stats::percentage;
use crate::vocab::Direction;

/// One learner's in-progress session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    pub chapter_id: String,
    pub entries: Vec<QueueEntry>,
    pub current_index: usize,
    pub correct_count: usize,
    pub total_count: usize,
    /// Entries answered wrong, in answer order, exactly as they were asked
    pub wrong_log: Vec<QueueEntry>,
    /// Recap rounds never touch box levels or review history
    pub is_recap: bool,
    #[serde(default)]
    pub context_mode: ContextMode,
}

/// Completion statistics
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub correct_count: usize,
    pub total_count: usize,
    /// Percentage rounded to one decimal place
    pub accuracy: f64,
    pub wrong_count: usize,
    pub has_wrong: bool,
}

/// Result of finishing a session
///
/// `retained` is `Some` while a recap is still possible, i.e. the session
/// is incomplete or had wrong answers.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub summary: SessionSummary,
    pub retained: Option<SessionState>,
}

impl SessionState {
    pub fn new(chapter_id: impl Into<String>, entries: Vec<QueueEntry>, context_mode: ContextMode) -> Self {
        let total_count = entries.len();
        Self {
            chapter_id: chapter_id.into(),
            entries,
            current_index: 0,
            correct_count: 0,
            total_count,
            wrong_log: Vec::new(),
            is_recap: false,
            context_mode,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.current_index >= self.total_count
    }

    /// The entry awaiting an answer
    pub fn current_entry(&self) -> Result<&QueueEntry, SessionError> {
        if self.is_complete() {
            return Err(SessionError::SessionComplete);
        }
        self.entries
            .get(self.current_index)
            .ok_or(SessionError::SessionComplete)
    }

    /// 1-based position of the current entry and the session length
    pub fn progress(&self) -> (usize, usize) {
        ((self.current_index + 1).min(self.total_count), self.total_count)
    }

    /// Whether an answer asked in `direction` moves its card between boxes
    pub fn scores(&self, direction: Direction) -> bool {
        !self.is_recap && !direction.is_context()
    }

    /// Tally an answer to the current entry and move on
    ///
    /// Wrong answers log the current entry itself, so the recorded
    /// direction and mode are the ones that were asked.
    pub fn record_answer(&self, correct: bool) -> Result<SessionState, SessionError> {
        let entry = self.current_entry()?.clone();
        let mut next = self.clone();

        if correct {
            next.correct_count += 1;
        } else {
            next.wrong_log.push(entry);
        }
        next.current_index += 1;

        Ok(next)
    }

    pub fn summary(&self) -> Result<SessionSummary, SessionError> {
        if self.total_count == 0 {
            return Err(SessionError::EmptySession);
        }

        let accuracy = percentage(self.correct_count, self.total_count);
        let wrong_count = self.wrong_log.len();

        Ok(SessionSummary {
            correct_count: self.correct_count,
            total_count: self.total_count,
            accuracy,
            wrong_count,
            has_wrong: wrong_count > 0,
        })
    }

    /// Summarize and apply the auto-clear rule
    ///
    /// A complete session with no wrong answers is dropped; anything else is
    /// handed back so the learner can recap or continue.
    pub fn finish(self) -> Result<Completion, SessionError> {
        let summary = self.summary()?;
        let retained = if self.is_complete() && !summary.has_wrong {
            None
        } else {
            Some(self)
        };

        Ok(Completion { summary, retained })
    }
}
