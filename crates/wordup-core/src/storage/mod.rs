//! Storage Module
//!
//! SQLite-based storage layer with:
//! - Chapter and card catalog with cascading deletes
//! - Leitner state per card and append-only review history
//! - Chapter export/import documents

mod migrations;
mod sqlite;
mod transfer;

use chrono::{DateTime, Utc};

pub use migrations::MIGRATIONS;
pub use sqlite::{ArchiveImport, Result, Storage, StorageError};
pub use transfer::{
    read_archive, write_archive, ChapterExport, ExportedCard, ExportedChapter, ExportedReview,
};

use crate::srs::BoxLevel;
use crate::vocab::{Card, ChapterWithCards, ReviewRecord};

/// What the session engine needs from a card store
///
/// Lookups fail with [`StorageError::NotFound`] for unknown ids.
pub trait CardStore {
    fn get_chapter(&self, id: &str) -> Result<ChapterWithCards>;

    fn get_card(&self, id: &str) -> Result<Card>;

    fn save_review_record(&self, record: &ReviewRecord) -> Result<()>;

    fn update_card_srs(&self, card_id: &str, box_level: BoxLevel, next_review: DateTime<Utc>) -> Result<()>;
}

impl<T: CardStore + ?Sized> CardStore for &T {
    fn get_chapter(&self, id: &str) -> Result<ChapterWithCards> {
        (**self).get_chapter(id)
    }

    fn get_card(&self, id: &str) -> Result<Card> {
        (**self).get_card(id)
    }

    fn save_review_record(&self, record: &ReviewRecord) -> Result<()> {
        (**self).save_review_record(record)
    }

    fn update_card_srs(&self, card_id: &str, box_level: BoxLevel, next_review: DateTime<Utc>) -> Result<()> {
        (**self).update_card_srs(card_id, box_level, next_review)
    }
}
