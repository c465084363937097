//! What to show for the current entry

use serde::{Deserialize, Serialize};

use super::queue::{PresentationMode, QueueEntry};
use crate::vocab::{Card, Chapter, Direction};

/// A rendered question and its expected answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Prompt {
    pub card_id: String,
    pub mode: PresentationMode,
    pub direction: Direction,
    pub question: String,
    pub answer: String,
    pub question_language: String,
    pub answer_language: String,
    /// Only set for context questions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context_hint: Option<String>,
    /// 1-based position in the session
    pub position: usize,
    pub total: usize,
}

impl Prompt {
    /// Build the prompt for `entry`
    ///
    /// Context questions ask the source word and expect the example
    /// sentence. A context entry for a card that has since lost its example
    /// falls back to the target word.
    pub fn for_entry(entry: &QueueEntry, card: &Card, chapter: &Chapter, position: usize, total: usize) -> Self {
        let source = (card.source_word.clone(), chapter.source_language.clone());
        let target = (card.target_word.clone(), chapter.target_language.clone());

        let (question, answer, context_hint) = match (entry.mode, entry.direction) {
            (PresentationMode::Context, _) | (_, Direction::Context) => {
                let answer = card
                    .example_sentence
                    .clone()
                    .unwrap_or_else(|| card.target_word.clone());
                (source, (answer, chapter.target_language.clone()), card.context_hint.clone())
            }
            (PresentationMode::Word, Direction::TargetToSource) => (target, source, None),
            (PresentationMode::Word, Direction::SourceToTarget) => (source, target, None),
        };

        Self {
            card_id: card.id.clone(),
            mode: entry.mode,
            direction: entry.direction,
            question: question.0,
            answer: answer.0,
            question_language: question.1,
            answer_language: answer.1,
            context_hint,
            position,
            total,
        }
    }
}
