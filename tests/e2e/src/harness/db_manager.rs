//! Test Database Manager
//!
//! Provides isolated database instances for testing:
//! - Temporary databases that are automatically cleaned up
//! - Pre-seeded chapters with test cards
//! - A session file next to the database
//! - Export snapshots and restoration

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use tempfile::TempDir;
use wordup_cli::SessionFile;
use wordup_core::{
    BoxLevel, ChapterExport, ChapterWithCards, FixedClock, NewCard, Storage, StudyEngine,
};

/// Manager for test databases
///
/// Creates isolated database instances for each test to prevent interference.
/// Automatically cleans up temporary databases when dropped.
///
/// # Example
///
/// ```rust,ignore
/// let db = TestDatabaseManager::new_temp();
///
/// // Use the storage
/// let chapter = db.seed_chapter("Animals", 5);
///
/// // Database is automatically deleted when `db` goes out of scope
/// ```
pub struct TestDatabaseManager {
    /// The storage instance
    pub storage: Storage,
    /// Temporary directory (kept alive to prevent premature deletion)
    _temp_dir: TempDir,
    /// Path to the database file
    db_path: PathBuf,
    /// Exported chapters for restore operations
    snapshot: Option<Vec<ChapterExport>>,
}

impl TestDatabaseManager {
    /// Create a new test database in a temporary directory
    ///
    /// The database is automatically deleted when the manager is dropped.
    pub fn new_temp() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test_wordup.db");

        let storage = Storage::new(Some(db_path.clone())).expect("Failed to create test storage");

        Self {
            storage,
            _temp_dir: temp_dir,
            db_path,
            snapshot: None,
        }
    }

    /// Get the database path
    pub fn path(&self) -> &PathBuf {
        &self.db_path
    }

    /// Session slot stored beside the database
    pub fn session_file(&self) -> SessionFile {
        SessionFile::new(self.db_path.with_file_name("session.json"))
    }

    /// Engine over this database with a pinned clock
    pub fn engine(&self, now: DateTime<Utc>) -> StudyEngine<&Storage, FixedClock> {
        StudyEngine::new(&self.storage, FixedClock::new(now))
    }

    /// Check if the database is empty
    pub fn is_empty(&self) -> bool {
        self.chapter_count() == 0
    }

    pub fn chapter_count(&self) -> usize {
        self.storage.list_chapters().map(|c| c.len()).unwrap_or(0)
    }

    /// Get the number of cards across all chapters
    pub fn card_count(&self) -> usize {
        self.storage
            .dashboard(Utc::now())
            .map(|d| d.total_cards)
            .unwrap_or(0)
    }

    // ========================================================================
    // SEEDING METHODS
    // ========================================================================

    /// Seed a chapter with `count` word-only cards
    pub fn seed_chapter(&self, name: &str, count: usize) -> ChapterWithCards {
        let chapter = self
            .storage
            .create_chapter(name, "German", "English")
            .expect("Failed to create chapter");

        for i in 0..count {
            self.storage
                .create_card(&chapter.id, NewCard::new(format!("Wort {i}"), format!("word {i}")))
                .expect("Failed to create card");
        }

        self.storage.get_chapter(&chapter.id).expect("Failed to load chapter")
    }

    /// Seed a chapter where every other card has an example and a hint
    pub fn seed_mixed_chapter(&self, name: &str, count: usize) -> ChapterWithCards {
        let chapter = self
            .storage
            .create_chapter(name, "German", "English")
            .expect("Failed to create chapter");

        for i in 0..count {
            let mut card = NewCard::new(format!("Satz {i}"), format!("sentence {i}"));
            if i % 2 == 0 {
                card = card
                    .with_example(format!("Das ist Satz {i}."))
                    .with_hint(format!("hint {i}"));
            }
            self.storage.create_card(&chapter.id, card).expect("Failed to create card");
        }

        self.storage.get_chapter(&chapter.id).expect("Failed to load chapter")
    }

    /// Put every card of a chapter in `level`, due at `next_review`
    pub fn place_all(&self, chapter_id: &str, level: BoxLevel, next_review: DateTime<Utc>) {
        for card in self.storage.list_cards(chapter_id).expect("Failed to list cards") {
            self.storage
                .update_card_srs(&card.id, level, next_review)
                .expect("Failed to update card");
        }
    }

    // ========================================================================
    // SNAPSHOT/RESTORE
    // ========================================================================

    /// Take a snapshot of current database state
    pub fn take_snapshot(&mut self) {
        let chapters = self.storage.list_chapters().unwrap_or_default();
        let exports = chapters
            .iter()
            .filter_map(|c| self.storage.export_chapter(&c.id).ok())
            .collect();
        self.snapshot = Some(exports);
    }

    /// Restore from the last snapshot
    ///
    /// Note: This recreates the database and re-imports every chapter.
    /// IDs will NOT be preserved (new UUIDs are generated).
    pub fn restore_snapshot(&mut self) -> bool {
        if let Some(exports) = self.snapshot.take() {
            self.recreate();
            for doc in &exports {
                let _ = self.storage.import_chapter(doc);
            }
            true
        } else {
            false
        }
    }

    /// Check if a snapshot exists
    pub fn has_snapshot(&self) -> bool {
        self.snapshot.is_some()
    }

    // ========================================================================
    // CLEANUP
    // ========================================================================

    /// Clear all data from the database
    pub fn clear(&mut self) {
        if let Ok(chapters) = self.storage.list_chapters() {
            for chapter in chapters {
                let _ = self.storage.delete_chapter(&chapter.id);
            }
        }
    }

    /// Recreate the database (useful for testing migrations)
    pub fn recreate(&mut self) {
        // Close the old connection before its files go away
        let placeholder = Storage::new(Some(PathBuf::from(":memory:")))
            .expect("Failed to open placeholder storage");
        drop(std::mem::replace(&mut self.storage, placeholder));

        let _ = std::fs::remove_file(&self.db_path);
        let _ = std::fs::remove_file(self.db_path.with_extension("db-wal"));
        let _ = std::fs::remove_file(self.db_path.with_extension("db-shm"));

        self.storage = Storage::new(Some(self.db_path.clone()))
            .expect("Failed to recreate storage");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_temp_database_creation() {
        let db = TestDatabaseManager::new_temp();
        assert!(db.is_empty());
        assert!(db.path().exists());
    }

    #[test]
    fn test_seed_chapter() {
        let db = TestDatabaseManager::new_temp();
        let chapter = db.seed_chapter("Basics", 10);

        assert_eq!(chapter.cards.len(), 10);
        assert_eq!(db.card_count(), 10);
    }

    #[test]
    fn test_seed_mixed_chapter() {
        let db = TestDatabaseManager::new_temp();
        let chapter = db.seed_mixed_chapter("Mixed", 5);

        let with_context = chapter.cards.iter().filter(|c| c.has_context()).count();
        assert_eq!(with_context, 3);
    }

    #[test]
    fn test_clear_database() {
        let mut db = TestDatabaseManager::new_temp();
        db.seed_chapter("Basics", 5);
        assert_eq!(db.card_count(), 5);

        db.clear();
        assert!(db.is_empty());
    }

    #[test]
    fn test_snapshot_restore() {
        let mut db = TestDatabaseManager::new_temp();
        db.seed_chapter("Basics", 5);

        db.take_snapshot();
        assert!(db.has_snapshot());

        db.clear();
        assert!(db.is_empty());

        assert!(db.restore_snapshot());
        assert_eq!(db.chapter_count(), 1);
        assert_eq!(db.card_count(), 5);
    }
}
