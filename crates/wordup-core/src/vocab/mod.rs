//! Vocabulary Module
//!
//! Cards, chapters and review records. These are snapshots of what the
//! store holds; the session engine only reads them and writes back box
//! changes and review records through [`crate::storage::CardStore`].

mod bulk;
mod card;
mod chapter;

pub use bulk::parse_bulk_text;
pub use card::{Card, Direction, MissingWords, NewCard, ReviewRecord};
pub use chapter::{Chapter, ChapterWithCards};
