//! Naming conventions shared by all collections.
//!
//! A content item lives in its own folder under a collection root, and the
//! folder name is the item's slug:
//!
//! - `posts/late-night-beans/index.html` → `/posts/late-night-beans/`
//! - `book/chapter-2-the-turn/index.html` → `/book/chapter-2-the-turn/`, chapter 2
//! - `book/prologue/index.html` → `/book/prologue/`, unnumbered
//!
//! ## Display Dates
//!
//! Pages carry ISO dates (`2024-03-05`). The listing pages show them as
//! `March 05 2024`: full month name, zero-padded day, no comma.

use chrono::NaiveDate;
use regex::Regex;
use std::sync::LazyLock;

/// Chapter number given to folders that don't follow `chapter-<n>`.
/// Large enough to sort after every real chapter.
pub const UNNUMBERED_CHAPTER: u32 = 999;

static CHAPTER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"chapter-(\d+)").unwrap());

/// Canonical clean URL for an item: `/{collection}/{slug}/`.
pub fn item_url(collection: &str, slug: &str) -> String {
    format!("/{}/{}/", collection.trim_matches('/'), slug)
}

/// Parse the chapter number out of a folder name.
///
/// - `"chapter-1"` → 1
/// - `"chapter-2-the-turn"` → 2
/// - `"prologue"` → [`UNNUMBERED_CHAPTER`]
pub fn parse_chapter_number(slug: &str) -> u32 {
    CHAPTER_RE
        .captures(slug)
        .and_then(|caps| caps[1].parse().ok())
        .unwrap_or(UNNUMBERED_CHAPTER)
}

/// Format an ISO date for display; anything unparsable passes through.
pub fn format_display_date(date: &str) -> String {
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(parsed) => parsed.format("%B %d %Y").to_string(),
        Err(_) => date.to_string(),
    }
}

/// Cut `text` to at most `max` characters, appending `...` if it was cut.
pub fn truncate_excerpt(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((byte_pos, _)) => format!("{}...", &text[..byte_pos]),
        None => text.to_string(),
    }
}
