//! Due selection

use chrono::{DateTime, Utc};

use crate::vocab::Card;

/// A card is due once `now` has reached its next review instant
///
/// The boundary counts as due.
pub fn is_due(card: &Card, now: DateTime<Utc>) -> bool {
    now >= card.next_review
}

/// Cards from `cards` that are due at `now`, in their original order
pub fn select_due(cards: &[Card], now: DateTime<Utc>) -> Vec<&Card> {
    cards.iter().filter(|card| is_due(card, now)).collect()
}
