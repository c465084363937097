//! SQLite Storage Implementation
//!
//! Chapters, cards and review history in a single database file.

use std::collections::HashMap;
use std::io::{Read, Seek, Write};
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use directories::ProjectDirs;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use super::transfer::{
    read_archive, write_archive, ChapterExport, ExportedCard, ExportedChapter, ExportedReview,
};
use super::CardStore;
use crate::srs::{normalize_timestamp, BoxLevel};
use crate::stats::{ChapterStats, Dashboard};
use crate::vocab::{
    parse_bulk_text, Card, Chapter, ChapterWithCards, Direction, MissingWords, NewCard, ReviewRecord,
};

// ============================================================================
// ERROR TYPES
// ============================================================================

/// Storage error type
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),
    /// Chapter or card not found
    #[error("Not found: {0}")]
    NotFound(String),
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Invalid timestamp
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),
    /// Rejected user input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    /// Export document encoding
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    /// Backup archive error
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
    /// Initialization error
    #[error("Initialization error: {0}")]
    Init(String),
}

impl From<MissingWords> for StorageError {
    fn from(e: MissingWords) -> Self {
        StorageError::InvalidInput(e.to_string())
    }
}

/// Result of importing a backup archive
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ArchiveImport {
    /// Chapters created, in archive order
    pub imported: Vec<Chapter>,
    /// Entry names that were not imported
    pub skipped: Vec<String>,
}

/// Storage result type
pub type Result<T> = std::result::Result<T, StorageError>;

const CARD_COLUMNS: &str = "id, chapter_id, source_word, target_word, example_sentence, context_hint, \
                            box_level, next_review, created_at";

// ============================================================================
// STORAGE
// ============================================================================

/// Main storage struct
///
/// All methods take `&self`; the connection sits behind a mutex so a
/// `Storage` can be shared by reference.
pub struct Storage {
    conn: Mutex<Connection>,
}

impl Storage {
    /// Apply PRAGMAs and optional encryption to a connection
    fn configure_connection(conn: &Connection) -> Result<()> {
        // Apply encryption key if SQLCipher is enabled and key is provided
        #[cfg(feature = "encryption")]
        {
            if let Ok(key) = std::env::var("WORDUP_ENCRYPTION_KEY") {
                if !key.is_empty() {
                    conn.pragma_update(None, "key", &key)?;
                }
            }
        }

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;
             PRAGMA temp_store = MEMORY;
             PRAGMA foreign_keys = ON;
             PRAGMA busy_timeout = 5000;",
        )?;

        Ok(())
    }

    /// Platform data directory, created owner-only if missing
    pub fn default_data_dir() -> Result<PathBuf> {
        let proj_dirs = ProjectDirs::from("com", "wordup", "wordup").ok_or_else(|| {
            StorageError::Init("Could not determine project directories".to_string())
        })?;

        let data_dir = proj_dirs.data_dir().to_path_buf();
        Self::ensure_private_dir(&data_dir)?;
        Ok(data_dir)
    }

    /// Create a directory and restrict it to the owner on Unix
    pub fn ensure_private_dir(dir: &std::path::Path) -> Result<()> {
        std::fs::create_dir_all(dir)?;
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o700);
            let _ = std::fs::set_permissions(dir, perms);
        }
        Ok(())
    }

    /// Create new storage instance
    ///
    /// `None` opens `wordup.db` in the platform data directory.
    pub fn new(db_path: Option<PathBuf>) -> Result<Self> {
        let path = match db_path {
            Some(p) => p,
            None => Self::default_data_dir()?.join("wordup.db"),
        };

        let conn = Connection::open(&path)?;

        // Restrict database file permissions to owner-only on Unix
        #[cfg(unix)]
        if path.exists() {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            let _ = std::fs::set_permissions(&path, perms);
        }

        Self::configure_connection(&conn)?;
        super::migrations::apply_migrations(&conn)?;

        tracing::debug!(path = %path.display(), "Opened vocabulary database");

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StorageError::Init("Connection lock poisoned".into()))
    }

    // ========================================================================
    // CHAPTERS
    // ========================================================================

    pub fn create_chapter(&self, name: &str, source_language: &str, target_language: &str) -> Result<Chapter> {
        let chapter = Chapter {
            id: Uuid::new_v4().to_string(),
            name: required(name, "Chapter name")?,
            source_language: required(source_language, "Source language")?,
            target_language: required(target_language, "Target language")?,
            created_at: Utc::now(),
        };

        let conn = self.lock()?;
        insert_chapter(&conn, &chapter)?;
        tracing::debug!(chapter_id = %chapter.id, name = %chapter.name, "Created chapter");

        Ok(chapter)
    }

    pub fn list_chapters(&self) -> Result<Vec<Chapter>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, source_language, target_language, created_at
             FROM chapters ORDER BY created_at, rowid",
        )?;
        let chapters = stmt
            .query_map([], Self::row_to_chapter)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(chapters)
    }

    /// Get a chapter header by ID
    pub fn find_chapter(&self, id: &str) -> Result<Option<Chapter>> {
        let conn = self.lock()?;
        find_chapter(&conn, id)
    }

    /// Load a chapter with all of its cards
    pub fn get_chapter(&self, id: &str) -> Result<ChapterWithCards> {
        let chapter = self
            .find_chapter(id)?
            .ok_or_else(|| StorageError::NotFound(format!("chapter {}", id)))?;
        let cards = self.list_cards(id)?;
        Ok(ChapterWithCards { chapter, cards })
    }

    pub fn update_chapter(
        &self,
        id: &str,
        name: &str,
        source_language: &str,
        target_language: &str,
    ) -> Result<Chapter> {
        let name = required(name, "Chapter name")?;
        let source_language = required(source_language, "Source language")?;
        let target_language = required(target_language, "Target language")?;

        let conn = self.lock()?;
        let updated = conn.execute(
            "UPDATE chapters SET name = ?1, source_language = ?2, target_language = ?3 WHERE id = ?4",
            params![name, source_language, target_language, id],
        )?;
        if updated == 0 {
            return Err(StorageError::NotFound(format!("chapter {}", id)));
        }

        find_chapter(&conn, id)?.ok_or_else(|| StorageError::NotFound(format!("chapter {}", id)))
    }

    /// Delete a chapter with its cards and their review history
    pub fn delete_chapter(&self, id: &str) -> Result<()> {
        let conn = self.lock()?;
        let deleted = conn.execute("DELETE FROM chapters WHERE id = ?1", params![id])?;
        if deleted == 0 {
            return Err(StorageError::NotFound(format!("chapter {}", id)));
        }
        tracing::info!(chapter_id = %id, "Deleted chapter");
        Ok(())
    }

    /// Put every card back in box 1, due now, and drop the chapter's review history
    ///
    /// Returns the number of cards reset.
    pub fn reset_chapter(&self, chapter_id: &str) -> Result<usize> {
        let now = Utc::now();
        let mut conn = self.lock()?;
        if find_chapter(&conn, chapter_id)?.is_none() {
            return Err(StorageError::NotFound(format!("chapter {}", chapter_id)));
        }

        let tx = conn.transaction()?;
        tx.execute(
            "DELETE FROM review_history
             WHERE card_id IN (SELECT id FROM vocabulary_cards WHERE chapter_id = ?1)",
            params![chapter_id],
        )?;
        let reset = tx.execute(
            "UPDATE vocabulary_cards SET box_level = ?1, next_review = ?2 WHERE chapter_id = ?3",
            params![BoxLevel::One.number(), now.to_rfc3339(), chapter_id],
        )?;
        tx.commit()?;

        tracing::info!(chapter_id = %chapter_id, cards = reset, "Reset chapter progress");
        Ok(reset)
    }

    // ========================================================================
    // CARDS
    // ========================================================================

    /// Add a card in box 1, due immediately
    pub fn create_card(&self, chapter_id: &str, card: NewCard) -> Result<Card> {
        let card = card.normalized()?;
        let conn = self.lock()?;
        if find_chapter(&conn, chapter_id)?.is_none() {
            return Err(StorageError::NotFound(format!("chapter {}", chapter_id)));
        }

        let now = Utc::now();
        let card = new_card_row(chapter_id, card, BoxLevel::One, now, now);
        insert_card(&conn, &card)?;
        Ok(card)
    }

    /// Get a card by ID
    pub fn find_card(&self, id: &str) -> Result<Option<Card>> {
        let conn = self.lock()?;
        find_card(&conn, id)
    }

    pub fn get_card(&self, id: &str) -> Result<Card> {
        self.find_card(id)?
            .ok_or_else(|| StorageError::NotFound(format!("card {}", id)))
    }

    /// Cards of a chapter in insertion order
    pub fn list_cards(&self, chapter_id: &str) -> Result<Vec<Card>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {CARD_COLUMNS} FROM vocabulary_cards WHERE chapter_id = ?1 ORDER BY created_at, rowid"
        ))?;
        let cards = stmt
            .query_map(params![chapter_id], Self::row_to_card)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(cards)
    }

    /// Replace a card's words, example and hint; Leitner state is kept
    pub fn update_card_content(&self, card_id: &str, card: NewCard) -> Result<Card> {
        let card = card.normalized()?;
        let conn = self.lock()?;
        let updated = conn.execute(
            "UPDATE vocabulary_cards
             SET source_word = ?1, target_word = ?2, example_sentence = ?3, context_hint = ?4
             WHERE id = ?5",
            params![
                card.source_word,
                card.target_word,
                card.example_sentence,
                card.context_hint,
                card_id
            ],
        )?;
        if updated == 0 {
            return Err(StorageError::NotFound(format!("card {}", card_id)));
        }

        find_card(&conn, card_id)?.ok_or_else(|| StorageError::NotFound(format!("card {}", card_id)))
    }

    /// Delete a card and its review history
    pub fn delete_card(&self, card_id: &str) -> Result<()> {
        let conn = self.lock()?;
        let deleted = conn.execute("DELETE FROM vocabulary_cards WHERE id = ?1", params![card_id])?;
        if deleted == 0 {
            return Err(StorageError::NotFound(format!("card {}", card_id)));
        }
        Ok(())
    }

    /// Insert every card parsed from pipe-separated text
    ///
    /// Returns the number of cards added. Lines with an empty source or
    /// target word are skipped.
    pub fn bulk_import(&self, chapter_id: &str, text: &str) -> Result<usize> {
        let parsed = parse_bulk_text(text);
        let now = Utc::now();

        let mut conn = self.lock()?;
        if find_chapter(&conn, chapter_id)?.is_none() {
            return Err(StorageError::NotFound(format!("chapter {}", chapter_id)));
        }

        let tx = conn.transaction()?;
        let mut imported = 0;
        let mut skipped = 0;
        for card in parsed {
            let Ok(card) = card.normalized() else {
                skipped += 1;
                continue;
            };
            insert_card(&tx, &new_card_row(chapter_id, card, BoxLevel::One, now, now))?;
            imported += 1;
        }
        tx.commit()?;

        if skipped > 0 {
            tracing::debug!(chapter_id = %chapter_id, skipped, "Skipped bulk lines without both words");
        }
        tracing::info!(chapter_id = %chapter_id, imported, "Bulk imported cards");
        Ok(imported)
    }

    /// Write a card's new box and due instant
    pub fn update_card_srs(&self, card_id: &str, box_level: BoxLevel, next_review: DateTime<Utc>) -> Result<()> {
        let conn = self.lock()?;
        let updated = conn.execute(
            "UPDATE vocabulary_cards SET box_level = ?1, next_review = ?2 WHERE id = ?3",
            params![box_level.number(), next_review.to_rfc3339(), card_id],
        )?;
        if updated == 0 {
            return Err(StorageError::NotFound(format!("card {}", card_id)));
        }
        Ok(())
    }

    // ========================================================================
    // REVIEW HISTORY
    // ========================================================================

    pub fn save_review_record(&self, record: &ReviewRecord) -> Result<()> {
        let conn = self.lock()?;
        insert_review(&conn, record)
    }

    /// Reviews of one card, oldest first
    pub fn list_reviews(&self, card_id: &str) -> Result<Vec<ReviewRecord>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT id, card_id, correct, direction, reviewed_at
             FROM review_history WHERE card_id = ?1 ORDER BY reviewed_at, rowid",
        )?;
        let reviews = stmt
            .query_map(params![card_id], Self::row_to_review)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(reviews)
    }

    /// Reviews of every card in a chapter, oldest first
    pub fn list_chapter_reviews(&self, chapter_id: &str) -> Result<Vec<ReviewRecord>> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT r.id, r.card_id, r.correct, r.direction, r.reviewed_at
             FROM review_history r
             JOIN vocabulary_cards c ON c.id = r.card_id
             WHERE c.chapter_id = ?1
             ORDER BY r.reviewed_at, r.rowid",
        )?;
        let reviews = stmt
            .query_map(params![chapter_id], Self::row_to_review)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(reviews)
    }

    // ========================================================================
    // STATISTICS
    // ========================================================================

    pub fn chapter_stats(&self, chapter_id: &str, now: DateTime<Utc>) -> Result<ChapterStats> {
        let cards = self.get_chapter(chapter_id)?.cards;
        let reviews = self.list_chapter_reviews(chapter_id)?;
        Ok(ChapterStats::compute(&cards, &reviews, now))
    }

    /// Totals across all chapters
    pub fn dashboard(&self, now: DateTime<Utc>) -> Result<Dashboard> {
        let mut dashboard = Dashboard::default();
        for chapter in self.list_chapters()? {
            dashboard.add(&self.chapter_stats(&chapter.id, now)?);
        }
        Ok(dashboard)
    }

    // ========================================================================
    // EXPORT / IMPORT
    // ========================================================================

    pub fn export_chapter(&self, chapter_id: &str) -> Result<ChapterExport> {
        let ChapterWithCards { chapter, cards } = self.get_chapter(chapter_id)?;

        let mut review_history = Vec::new();
        for card in &cards {
            for review in self.list_reviews(&card.id)? {
                review_history.push(ExportedReview {
                    card_source_word: card.source_word.clone(),
                    card_target_word: card.target_word.clone(),
                    review_date: Some(review.reviewed_at.to_rfc3339()),
                    correct: review.correct,
                    direction: Some(review.direction.as_str().to_string()),
                });
            }
        }

        Ok(ChapterExport {
            chapter: ExportedChapter {
                name: chapter.name,
                source_language: chapter.source_language,
                target_language: chapter.target_language,
                created_at: Some(chapter.created_at.to_rfc3339()),
            },
            cards: cards
                .into_iter()
                .map(|card| ExportedCard {
                    source_word: card.source_word,
                    target_word: card.target_word,
                    example_sentence: card.example_sentence,
                    context_hint: card.context_hint,
                    box_level: i64::from(card.box_level.number()),
                    next_review: Some(card.next_review.to_rfc3339()),
                })
                .collect(),
            review_history,
        })
    }

    /// Export every chapter, in `list_chapters` order
    pub fn export_all(&self) -> Result<Vec<ChapterExport>> {
        self.list_chapters()?
            .iter()
            .map(|chapter| self.export_chapter(&chapter.id))
            .collect()
    }

    /// Write a full backup archive; returns the number of chapters written
    pub fn export_archive<W: Write + Seek>(&self, writer: W) -> Result<(W, usize)> {
        let docs = self.export_all()?;
        let writer = write_archive(&docs, writer)?;
        tracing::info!(chapters = docs.len(), "Exported backup archive");
        Ok((writer, docs.len()))
    }

    /// Import every chapter of a backup archive
    ///
    /// Chapters that already exist or whose document is invalid are skipped
    /// and counted; database failures abort the import.
    pub fn import_archive<R: Read + Seek>(&self, reader: R) -> Result<ArchiveImport> {
        let mut outcome = ArchiveImport::default();

        for (name, doc) in read_archive(reader)? {
            match doc.and_then(|doc| self.import_chapter(&doc)) {
                Ok(imported) => outcome.imported.push(imported.chapter),
                Err(e @ (StorageError::InvalidInput(_) | StorageError::Serialization(_))) => {
                    tracing::warn!(entry = %name, error = %e, "Skipped archive entry");
                    outcome.skipped.push(name);
                }
                Err(e) => return Err(e),
            }
        }

        tracing::info!(
            imported = outcome.imported.len(),
            skipped = outcome.skipped.len(),
            "Imported backup archive"
        );
        Ok(outcome)
    }

    /// Create a new chapter from an export document
    ///
    /// Unparseable timestamps fall back to now. Reviews whose word pair
    /// matches no imported card are skipped.
    pub fn import_chapter(&self, doc: &ChapterExport) -> Result<ChapterWithCards> {
        let now = Utc::now();
        let header = &doc.chapter;

        let chapter = Chapter {
            id: Uuid::new_v4().to_string(),
            name: required(&header.name, "Chapter name")?,
            source_language: required(&header.source_language, "Source language")?,
            target_language: required(&header.target_language, "Target language")?,
            created_at: parse_or_now(header.created_at.as_deref(), now),
        };

        let mut conn = self.lock()?;
        let exists: Option<String> = conn
            .query_row(
                "SELECT id FROM chapters WHERE name = ?1 AND source_language = ?2 AND target_language = ?3",
                params![chapter.name, chapter.source_language, chapter.target_language],
                |row| row.get(0),
            )
            .optional()?;
        if exists.is_some() {
            return Err(StorageError::InvalidInput(format!(
                "Chapter \"{}\" already exists",
                chapter.name
            )));
        }

        let tx = conn.transaction()?;
        insert_chapter(&tx, &chapter)?;

        let mut cards = Vec::with_capacity(doc.cards.len());
        let mut by_words: HashMap<(&str, &str), String> = HashMap::new();
        for exported in &doc.cards {
            let content = NewCard {
                source_word: exported.source_word.clone(),
                target_word: exported.target_word.clone(),
                example_sentence: exported.example_sentence.clone(),
                context_hint: exported.context_hint.clone(),
            }
            .normalized()?;
            let box_level = BoxLevel::from_number(exported.box_level)
                .map_err(|e| StorageError::InvalidInput(e.to_string()))?;
            let next_review = parse_or_now(exported.next_review.as_deref(), now);

            let card = new_card_row(&chapter.id, content, box_level, next_review, now);
            insert_card(&tx, &card)?;
            by_words.insert(
                (exported.source_word.as_str(), exported.target_word.as_str()),
                card.id.clone(),
            );
            cards.push(card);
        }

        let mut skipped = 0;
        for review in &doc.review_history {
            let key = (review.card_source_word.as_str(), review.card_target_word.as_str());
            let Some(card_id) = by_words.get(&key) else {
                skipped += 1;
                continue;
            };
            let direction = review
                .direction
                .as_deref()
                .and_then(Direction::parse_name)
                .unwrap_or(Direction::SourceToTarget);
            let reviewed_at = parse_or_now(review.review_date.as_deref(), now);
            insert_review(&tx, &ReviewRecord::new(card_id.clone(), review.correct, direction, reviewed_at))?;
        }
        tx.commit()?;

        tracing::info!(
            chapter_id = %chapter.id,
            cards = cards.len(),
            reviews = doc.review_history.len() - skipped,
            skipped,
            "Imported chapter"
        );

        Ok(ChapterWithCards { chapter, cards })
    }

    // ========================================================================
    // ROW MAPPING
    // ========================================================================

    /// Parse a stored timestamp, accepting naive values as UTC
    fn parse_timestamp(value: &str, field_name: &str) -> rusqlite::Result<DateTime<Utc>> {
        normalize_timestamp(value).ok_or_else(|| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                Box::new(StorageError::InvalidTimestamp(format!(
                    "Invalid {} timestamp '{}'",
                    field_name, value
                ))),
            )
        })
    }

    fn row_to_chapter(row: &rusqlite::Row) -> rusqlite::Result<Chapter> {
        let created_at: String = row.get("created_at")?;
        Ok(Chapter {
            id: row.get("id")?,
            name: row.get("name")?,
            source_language: row.get("source_language")?,
            target_language: row.get("target_language")?,
            created_at: Self::parse_timestamp(&created_at, "created_at")?,
        })
    }

    fn row_to_card(row: &rusqlite::Row) -> rusqlite::Result<Card> {
        let next_review: String = row.get("next_review")?;
        let created_at: String = row.get("created_at")?;
        let box_level: i64 = row.get("box_level")?;
        let box_level = BoxLevel::from_number(box_level).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Integer, Box::new(e))
        })?;

        Ok(Card {
            id: row.get("id")?,
            chapter_id: row.get("chapter_id")?,
            source_word: row.get("source_word")?,
            target_word: row.get("target_word")?,
            example_sentence: row.get("example_sentence")?,
            context_hint: row.get("context_hint")?,
            box_level,
            next_review: Self::parse_timestamp(&next_review, "next_review")?,
            created_at: Self::parse_timestamp(&created_at, "created_at")?,
        })
    }

    fn row_to_review(row: &rusqlite::Row) -> rusqlite::Result<ReviewRecord> {
        let direction: String = row.get("direction")?;
        let reviewed_at: String = row.get("reviewed_at")?;

        Ok(ReviewRecord {
            id: row.get("id")?,
            card_id: row.get("card_id")?,
            correct: row.get("correct")?,
            direction: Direction::parse_name(&direction).unwrap_or(Direction::SourceToTarget),
            reviewed_at: Self::parse_timestamp(&reviewed_at, "reviewed_at")?,
        })
    }
}

impl CardStore for Storage {
    fn get_chapter(&self, id: &str) -> Result<ChapterWithCards> {
        Storage::get_chapter(self, id)
    }

    fn get_card(&self, id: &str) -> Result<Card> {
        Storage::get_card(self, id)
    }

    fn save_review_record(&self, record: &ReviewRecord) -> Result<()> {
        Storage::save_review_record(self, record)
    }

    fn update_card_srs(&self, card_id: &str, box_level: BoxLevel, next_review: DateTime<Utc>) -> Result<()> {
        Storage::update_card_srs(self, card_id, box_level, next_review)
    }
}

// ============================================================================
// HELPERS
// ============================================================================

fn required(value: &str, field: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(StorageError::InvalidInput(format!("{} is required", field)));
    }
    Ok(trimmed.to_string())
}

fn parse_or_now(value: Option<&str>, now: DateTime<Utc>) -> DateTime<Utc> {
    value.and_then(normalize_timestamp).unwrap_or(now)
}

fn new_card_row(
    chapter_id: &str,
    card: NewCard,
    box_level: BoxLevel,
    next_review: DateTime<Utc>,
    created_at: DateTime<Utc>,
) -> Card {
    Card {
        id: Uuid::new_v4().to_string(),
        chapter_id: chapter_id.to_string(),
        source_word: card.source_word,
        target_word: card.target_word,
        example_sentence: card.example_sentence,
        context_hint: card.context_hint,
        box_level,
        next_review,
        created_at,
    }
}

fn find_chapter(conn: &Connection, id: &str) -> Result<Option<Chapter>> {
    let chapter = conn
        .query_row(
            "SELECT id, name, source_language, target_language, created_at FROM chapters WHERE id = ?1",
            params![id],
            Storage::row_to_chapter,
        )
        .optional()?;
    Ok(chapter)
}

fn find_card(conn: &Connection, id: &str) -> Result<Option<Card>> {
    let card = conn
        .query_row(
            &format!("SELECT {CARD_COLUMNS} FROM vocabulary_cards WHERE id = ?1"),
            params![id],
            Storage::row_to_card,
        )
        .optional()?;
    Ok(card)
}

fn insert_chapter(conn: &Connection, chapter: &Chapter) -> Result<()> {
    conn.execute(
        "INSERT INTO chapters (id, name, source_language, target_language, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            chapter.id,
            chapter.name,
            chapter.source_language,
            chapter.target_language,
            chapter.created_at.to_rfc3339()
        ],
    )?;
    Ok(())
}

fn insert_card(conn: &Connection, card: &Card) -> Result<()> {
    conn.execute(
        "INSERT INTO vocabulary_cards
         (id, chapter_id, source_word, target_word, example_sentence, context_hint, box_level, next_review, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            card.id,
            card.chapter_id,
            card.source_word,
            card.target_word,
            card.example_sentence,
            card.context_hint,
            card.box_level.number(),
            card.next_review.to_rfc3339(),
            card.created_at.to_rfc3339()
        ],
    )?;
    Ok(())
}

fn insert_review(conn: &Connection, record: &ReviewRecord) -> Result<()> {
    conn.execute(
        "INSERT INTO review_history (id, card_id, correct, direction, reviewed_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            record.id,
            record.card_id,
            record.correct,
            record.direction.as_str(),
            record.reviewed_at.to_rfc3339()
        ],
    )?;
    Ok(())
}
