//! Recap Sub-loop
//!
//! Replays only the entries missed in the previous round. A recap's own
//! misses feed the next recap, so rounds chain until one ends without a
//! wrong answer.

use super::{SessionError, SessionState};

/// Start a recap round from the learner's previous session
///
/// On [`SessionError::NoWrongCards`] the caller should drop the prior
/// session; there is nothing left to replay.
pub fn start_recap(prior: Option<&SessionState>, chapter_id: &str) -> Result<SessionState, SessionError> {
    let prior = prior.ok_or(SessionError::NoPriorSession)?;

    if prior.chapter_id != chapter_id {
        return Err(SessionError::ChapterMismatch {
            session: prior.chapter_id.clone(),
            requested: chapter_id.to_string(),
        });
    }

    if prior.wrong_log.is_empty() {
        return Err(SessionError::NoWrongCards);
    }

    let entries = prior.wrong_log.clone();
    tracing::info!(
        chapter_id = %prior.chapter_id,
        entries = entries.len(),
        "Starting recap round"
    );

    Ok(SessionState {
        is_recap: true,
        ..SessionState::new(prior.chapter_id.clone(), entries, prior.context_mode)
    })
}
