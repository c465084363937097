//! Chapter and dashboard statistics

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::srs::{BoxLevel, BOX_INTERVALS};
use crate::vocab::{Card, ReviewRecord};

/// Per-chapter progress figures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterStats {
    pub total_cards: usize,
    pub due_cards: usize,
    /// Share of correct reviews as a percentage with one decimal, 0 without reviews
    pub success_rate: f64,
    /// Card count per box, index 0 is box 1
    pub box_distribution: [usize; BOX_INTERVALS.len()],
    pub total_reviews: usize,
}

impl ChapterStats {
    /// Compute statistics from a chapter's cards and its review history
    pub fn compute(cards: &[Card], reviews: &[ReviewRecord], now: DateTime<Utc>) -> Self {
        let mut box_distribution = [0; BOX_INTERVALS.len()];
        for card in cards {
            box_distribution[card.box_level.index()] += 1;
        }

        let total_reviews = reviews.len();
        let correct = reviews.iter().filter(|r| r.correct).count();
        let success_rate = if cards.is_empty() || total_reviews == 0 {
            0.0
        } else {
            percentage(correct, total_reviews)
        };

        Self {
            total_cards: cards.len(),
            due_cards: cards.iter().filter(|c| c.is_due(now)).count(),
            success_rate,
            box_distribution,
            total_reviews,
        }
    }

    /// Number of cards currently in `level`
    pub fn in_box(&self, level: BoxLevel) -> usize {
        self.box_distribution[level.index()]
    }
}

/// `part / whole` as a percentage with one decimal, ties to even
///
/// Works on the exact quotient, so 1/16 is 6.2 and 3/16 is 18.8.
pub(crate) fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    let scaled = part * 1000;
    let mut tenths = scaled / whole;
    let twice_rem = 2 * (scaled % whole);
    if twice_rem > whole || (twice_rem == whole && tenths % 2 == 1) {
        tenths += 1;
    }
    tenths as f64 / 10.0
}

/// Totals across every chapter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub total_chapters: usize,
    pub total_cards: usize,
    pub total_due: usize,
}

impl Dashboard {
    pub fn add(&mut self, stats: &ChapterStats) {
        self.total_chapters += 1;
        self.total_cards += stats.total_cards;
        self.total_due += stats.due_cards;
    }
}
