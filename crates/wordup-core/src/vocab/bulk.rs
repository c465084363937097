//! Pipe-separated bulk card entry
//!
//! One card per line:
//!
//! ```text
//! source | target | example sentence | context hint
//! ```
//!
//! The last two fields are optional. Blank lines and lines with fewer than
//! two fields are skipped.

use super::NewCard;

pub fn parse_bulk_text(text: &str) -> Vec<NewCard> {
    text.lines().filter_map(parse_line).collect()
}

fn parse_line(line: &str) -> Option<NewCard> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let parts: Vec<&str> = line.split('|').map(str::trim).collect();
    if parts.len() < 2 {
        return None;
    }

    let optional = |idx: usize| {
        parts
            .get(idx)
            .filter(|p| !p.is_empty())
            .map(|p| p.to_string())
    };

    Some(NewCard {
        source_word: parts[0].to_string(),
        target_word: parts[1].to_string(),
        example_sentence: optional(2),
        context_hint: optional(3),
    })
}
