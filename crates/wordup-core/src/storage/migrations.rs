//! Database Migrations
//!
//! Schema migration definitions for the storage layer.

/// Migration definitions
pub const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 1,
        description: "Initial schema: chapters, vocabulary cards, review history",
        up: MIGRATION_V1_UP,
    },
    Migration {
        version: 2,
        description: "Indexes for due lookups and per-chapter review history",
        up: MIGRATION_V2_UP,
    },
];

/// A database migration
#[derive(Debug, Clone)]
pub struct Migration {
    /// Version number
    pub version: u32,
    /// Description
    pub description: &'static str,
    /// SQL to apply
    pub up: &'static str,
}

/// V1: Initial schema
const MIGRATION_V1_UP: &str = r#"
CREATE TABLE IF NOT EXISTS chapters (
    id TEXT PRIMARY KEY,
    name TEXT NOT NULL,
    source_language TEXT NOT NULL,
    target_language TEXT NOT NULL,
    created_at TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS vocabulary_cards (
    id TEXT PRIMARY KEY,
    chapter_id TEXT NOT NULL REFERENCES chapters(id) ON DELETE CASCADE,
    source_word TEXT NOT NULL,
    target_word TEXT NOT NULL,
    example_sentence TEXT,
    context_hint TEXT,
    created_at TEXT NOT NULL,

    -- Leitner state
    box_level INTEGER NOT NULL DEFAULT 1 CHECK (box_level BETWEEN 1 AND 5),
    next_review TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_cards_chapter ON vocabulary_cards(chapter_id);

-- Append-only; rows go away only with their card or on chapter reset
CREATE TABLE IF NOT EXISTS review_history (
    id TEXT PRIMARY KEY,
    card_id TEXT NOT NULL REFERENCES vocabulary_cards(id) ON DELETE CASCADE,
    correct INTEGER NOT NULL,
    direction TEXT NOT NULL,
    reviewed_at TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_reviews_card ON review_history(card_id);

CREATE TABLE IF NOT EXISTS schema_version (
    version INTEGER PRIMARY KEY,
    applied_at TEXT NOT NULL
);

INSERT OR IGNORE INTO schema_version (version, applied_at) VALUES (1, datetime('now'));
"#;

/// V2: Scheduling indexes
const MIGRATION_V2_UP: &str = r#"
CREATE INDEX IF NOT EXISTS idx_cards_chapter_next_review ON vocabulary_cards(chapter_id, next_review);
CREATE INDEX IF NOT EXISTS idx_cards_chapter_box ON vocabulary_cards(chapter_id, box_level);
CREATE INDEX IF NOT EXISTS idx_reviews_reviewed_at ON review_history(reviewed_at);

INSERT OR IGNORE INTO schema_version (version, applied_at) VALUES (2, datetime('now'));
"#;

/// Get current schema version from database
pub fn get_current_version(conn: &rusqlite::Connection) -> rusqlite::Result<u32> {
    conn.query_row(
        "SELECT COALESCE(MAX(version), 0) FROM schema_version",
        [],
        |row| row.get(0),
    )
    .or(Ok(0))
}

/// Apply pending migrations
pub fn apply_migrations(conn: &rusqlite::Connection) -> rusqlite::Result<u32> {
    let current_version = get_current_version(conn)?;
    let mut applied = 0;

    for migration in MIGRATIONS {
        if migration.version > current_version {
            tracing::info!(
                "Applying migration v{}: {}",
                migration.version,
                migration.description
            );

            conn.execute_batch(migration.up)?;
            applied += 1;
        }
    }

    Ok(applied)
}
