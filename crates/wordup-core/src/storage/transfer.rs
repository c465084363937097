//! Chapter export documents
//!
//! One JSON document per chapter. Cards carry no ids; review history is
//! keyed by the card's (source, target) word pair so a document can be
//! imported into any database.
//!
//! A full backup is a ZIP archive holding one `chapter_<name>.json`
//! document per chapter.

use std::collections::HashSet;
use std::io::{Read, Seek, Write};

use serde::{Deserialize, Serialize};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use super::sqlite::{Result, StorageError};

/// Exported chapter header
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedChapter {
    pub name: String,
    pub source_language: String,
    pub target_language: String,
    #[serde(default)]
    pub created_at: Option<String>,
}

/// Exported card with its Leitner state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedCard {
    pub source_word: String,
    pub target_word: String,
    #[serde(default)]
    pub example_sentence: Option<String>,
    #[serde(default)]
    pub context_hint: Option<String>,
    #[serde(default = "default_box_level")]
    pub box_level: i64,
    #[serde(default)]
    pub next_review: Option<String>,
}

/// Exported review, attached to its card by word pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportedReview {
    pub card_source_word: String,
    pub card_target_word: String,
    #[serde(default)]
    pub review_date: Option<String>,
    pub correct: bool,
    #[serde(default)]
    pub direction: Option<String>,
}

/// A whole chapter as written by `wordup export`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterExport {
    pub chapter: ExportedChapter,
    pub cards: Vec<ExportedCard>,
    #[serde(default)]
    pub review_history: Vec<ExportedReview>,
}

fn default_box_level() -> i64 {
    1
}

impl ChapterExport {
    /// Parse a document, rejecting ones without a chapter or card list
    pub fn from_json(text: &str) -> Result<Self> {
        let value: serde_json::Value = serde_json::from_str(text)?;
        if value.get("chapter").is_none() || value.get("cards").is_none() {
            return Err(StorageError::InvalidInput(
                "Invalid file format: missing chapter or cards data".to_string(),
            ));
        }
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

// ============================================================================
// BACKUP ARCHIVES
// ============================================================================

/// Write every document into a ZIP archive, one entry per chapter
pub fn write_archive<W: Write + Seek>(docs: &[ChapterExport], writer: W) -> Result<W> {
    let mut zip = ZipWriter::new(writer);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut used = HashSet::new();

    for doc in docs {
        let stem = file_stem(&doc.chapter.name);
        let mut name = format!("chapter_{stem}.json");
        let mut n = 2;
        while !used.insert(name.clone()) {
            name = format!("chapter_{stem}_{n}.json");
            n += 1;
        }

        zip.start_file(name, options)?;
        zip.write_all(doc.to_json_pretty()?.as_bytes())?;
    }

    Ok(zip.finish()?)
}

/// Read the JSON entries of a backup archive
///
/// Each entry is parsed on its own, so one broken document does not hide
/// the others. Entries that are not `.json` files are ignored.
pub fn read_archive<R: Read + Seek>(reader: R) -> Result<Vec<(String, Result<ChapterExport>)>> {
    let mut archive = ZipArchive::new(reader)?;
    let mut entries = Vec::new();

    for i in 0..archive.len() {
        let mut file = archive.by_index(i)?;
        let name = file.name().to_string();
        if file.is_dir() || !name.ends_with(".json") {
            continue;
        }

        let mut text = String::new();
        let doc = match file.read_to_string(&mut text) {
            Ok(_) => ChapterExport::from_json(&text),
            Err(e) => Err(StorageError::InvalidInput(format!("{name}: {e}"))),
        };
        entries.push((name, doc));
    }

    Ok(entries)
}

/// Chapter name reduced to characters safe in an archive entry name
fn file_stem(name: &str) -> String {
    let stem: String = name
        .trim()
        .chars()
        .filter_map(|c| match c {
            c if c.is_ascii_alphanumeric() || c == '-' || c == '.' => Some(c),
            c if c.is_whitespace() || c == '_' => Some('_'),
            _ => None,
        })
        .collect();
    let stem = stem.trim_matches(|c| c == '.' || c == '_');

    if stem.is_empty() {
        "chapter".to_string()
    } else {
        stem.to_string()
    }
}
