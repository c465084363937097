//! Study Engine
//!
//! Applies session transitions against a card store: builds queues from
//! chapter snapshots, renders prompts, and writes box changes and review
//! records for scored answers.

use rand::Rng;

use super::prompt::Prompt;
use super::queue::{build_queue, EmptyQueueReason, QueueRequest};
use super::recap;
use super::{SessionError, SessionState};
use crate::srs::{calculate_next_review, Clock, ReviewResult};
use crate::storage::{CardStore, StorageError};
use crate::vocab::{Card, Direction, ReviewRecord};

/// Outcome of starting a session
#[derive(Debug, Clone, PartialEq)]
pub enum SessionStart {
    Started(SessionState),
    /// Nothing to ask; the learner's previous session is untouched
    Empty(EmptyQueueReason),
}

/// Outcome of one submitted answer
#[derive(Debug, Clone, PartialEq)]
pub struct AnswerOutcome {
    pub session: SessionState,
    /// Set when the answer moved the card between boxes
    pub scored: Option<ReviewResult>,
}

/// Session operations over a [`CardStore`] and a [`Clock`]
pub struct StudyEngine<S, C> {
    store: S,
    clock: C,
}

impl<S: CardStore, C: Clock> StudyEngine<S, C> {
    pub fn new(store: S, clock: C) -> Self {
        Self { store, clock }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Build a new session for a chapter
    pub fn start_session(&self, chapter_id: &str, request: &QueueRequest) -> Result<SessionStart, SessionError> {
        self.start_session_with_rng(chapter_id, request, &mut rand::thread_rng())
    }

    pub fn start_session_with_rng<R: Rng + ?Sized>(
        &self,
        chapter_id: &str,
        request: &QueueRequest,
        rng: &mut R,
    ) -> Result<SessionStart, SessionError> {
        let chapter = self.store.get_chapter(chapter_id)?;
        let now = self.clock.now();

        match build_queue(&chapter.cards, request, now, rng) {
            Ok(entries) => {
                tracing::info!(
                    chapter_id = %chapter_id,
                    entries = entries.len(),
                    practice_mode = ?request.practice_mode,
                    context_mode = request.context_mode.as_str(),
                    "Started review session"
                );
                Ok(SessionStart::Started(SessionState::new(
                    chapter_id,
                    entries,
                    request.context_mode,
                )))
            }
            Err(reason) => {
                tracing::info!(chapter_id = %chapter_id, reason = ?reason, "Nothing to review");
                Ok(SessionStart::Empty(reason))
            }
        }
    }

    /// Render the current entry of a live session
    pub fn current_prompt(&self, session: Option<&SessionState>) -> Result<Prompt, SessionError> {
        let session = session.ok_or(SessionError::NoActiveSession)?;
        let entry = session.current_entry()?;
        let card = self.card(&entry.card_id)?;
        let chapter = self.store.get_chapter(&session.chapter_id)?.chapter;
        let (position, total) = session.progress();

        Ok(Prompt::for_entry(entry, &card, &chapter, position, total))
    }

    /// Score an answer to the current entry
    ///
    /// The entry's own card and direction decide scoring and are what gets
    /// recorded; a different `card_id` or `direction` from the caller is
    /// logged and ignored.
    /// Recap rounds and context entries never touch box levels or history.
    pub fn submit_answer(
        &self,
        session: Option<&SessionState>,
        card_id: &str,
        correct: bool,
        direction: Direction,
    ) -> Result<AnswerOutcome, SessionError> {
        let session = session.ok_or(SessionError::NoActiveSession)?;
        let entry = session.current_entry()?;

        if entry.direction != direction {
            tracing::warn!(
                card_id = %card_id,
                asked = %entry.direction,
                submitted = %direction,
                "Answer direction differs from the asked entry; using the entry's"
            );
        }
        if entry.card_id != card_id {
            tracing::warn!(
                card_id = %card_id,
                expected = %entry.card_id,
                "Answer names a different card than the current entry; scoring the entry's"
            );
        }

        let card = self.card(&entry.card_id)?;

        let scored = if session.scores(entry.direction) {
            let now = self.clock.now();
            let result = calculate_next_review(card.box_level, correct, now);
            self.store.update_card_srs(&card.id, result.box_level, result.next_review)?;
            self.store
                .save_review_record(&ReviewRecord::new(&card.id, correct, entry.direction, now))?;

            tracing::debug!(
                card_id = %card.id,
                correct,
                from = %card.box_level,
                to = %result.box_level,
                "Scored answer"
            );
            Some(result)
        } else {
            None
        };

        Ok(AnswerOutcome {
            session: session.record_answer(correct)?,
            scored,
        })
    }

    /// Start a recap round from the learner's previous session
    pub fn start_recap(&self, prior: Option<&SessionState>, chapter_id: &str) -> Result<SessionState, SessionError> {
        recap::start_recap(prior, chapter_id)
    }

    fn card(&self, card_id: &str) -> Result<Card, SessionError> {
        self.store.get_card(card_id).map_err(|e| match e {
            StorageError::NotFound(_) => SessionError::CardNotFound(card_id.to_string()),
            other => SessionError::Storage(other),
        })
    }
}
