//! CLI output formatting for every command.
//!
//! # Information-First Display
//!
//! Output leads with what the site contains (titles, dates, counts) and
//! shows file paths as secondary context. Each entity gets a header line
//! with its positional index and title, followed by indented detail lines.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Posts (2)
//! 001 Ides
//!     March 15 2024 → /posts/ides/
//! 002 New Year
//!     January 01 2024 → /posts/new-year/
//!
//! Reviews (1)
//! 001 Tamper 🍳🍳
//!     March 30 2024 → /benedict/tamper/
//!     Fellow: Joel Delaney
//!
//! Chapters (2)
//! 001 Chapter 1: Start → /book/chapter-1/
//! 002 Prologue → /book/prologue/
//! ```
//!
//! ## Build
//!
//! ```text
//! Reviews → benedict-reviews.js (1 review)
//! Posts → blog-posts.js (2 posts)
//!     Navigation: 2 updated, 0 unchanged
//!     Homepage: latest post "Ides"
//! Chapters → book-chapters.js (2 chapters)
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure: no I/O, no side effects.

use crate::generate::GeneratedFile;
use crate::migrate::MigrationReport;
use crate::naming::UNNUMBERED_CHAPTER;
use crate::pipeline::{BuildReport, Inventory};
use crate::retemplate::RetemplateReport;
use crate::update::HomepageOutcome;
use std::path::Path;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// `1 post`, `2 posts`
fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

/// Path shown relative to the site root when it lives inside it.
fn display_path(path: &Path, site_root: &Path) -> String {
    path.strip_prefix(site_root)
        .unwrap_or(path)
        .display()
        .to_string()
}

fn generated_line(label: &str, file: &GeneratedFile, noun: &str, site_root: &Path) -> String {
    format!(
        "{} \u{2192} {} ({})",
        label,
        display_path(&file.path, site_root),
        plural(file.count, noun)
    )
}

/// A heading followed by indented entries; nothing when `entries` is empty.
fn section<T: std::fmt::Display>(lines: &mut Vec<String>, heading: &str, entries: &[T]) {
    if entries.is_empty() {
        return;
    }
    lines.push(heading.to_string());
    for entry in entries {
        lines.push(format!("    {entry}"));
    }
}

// ============================================================================
// Check
// ============================================================================

pub fn format_check_output(inventory: &Inventory, rating_glyph: &str) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push(format!("Posts ({})", inventory.posts.len()));
    for (i, post) in inventory.posts.iter().enumerate() {
        lines.push(format!("{} {}", format_index(i + 1), post.title));
        lines.push(format!("    {} \u{2192} {}", post.date_display, post.url));
    }

    lines.push(String::new());
    lines.push(format!("Reviews ({})", inventory.reviews.len()));
    for (i, review) in inventory.reviews.iter().enumerate() {
        lines.push(format!(
            "{} {} {}",
            format_index(i + 1),
            review.title,
            rating_glyph.repeat(review.rating)
        ));
        lines.push(format!("    {} \u{2192} {}", review.date_display, review.url));
        lines.push(format!("    Fellow: {}", review.fellow));
    }

    lines.push(String::new());
    lines.push(format!("Chapters ({})", inventory.chapters.len()));
    for (i, chapter) in inventory.chapters.iter().enumerate() {
        let label = if chapter.chapter_number == UNNUMBERED_CHAPTER {
            chapter.title.clone()
        } else {
            format!("Chapter {}: {}", chapter.chapter_number, chapter.title)
        };
        lines.push(format!(
            "{} {} \u{2192} {}",
            format_index(i + 1),
            label,
            chapter.url
        ));
    }

    lines
}

pub fn print_check_output(inventory: &Inventory, rating_glyph: &str) {
    for line in format_check_output(inventory, rating_glyph) {
        println!("{}", line);
    }
}

// ============================================================================
// Build
// ============================================================================

pub fn format_build_output(report: &BuildReport, site_root: &Path) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push(generated_line("Reviews", &report.reviews, "review", site_root));
    lines.push(generated_line("Posts", &report.posts, "post", site_root));

    let links = &report.links;
    let mut nav = format!(
        "    Navigation: {} updated, {} unchanged",
        links.updated, links.unchanged
    );
    if links.failed > 0 {
        nav.push_str(&format!(", {} failed", links.failed));
    }
    lines.push(nav);

    let homepage = match (report.homepage, report.latest.as_deref()) {
        (HomepageOutcome::Updated, Some(title)) => format!("latest post \"{title}\""),
        (HomepageOutcome::Unchanged, Some(title)) => format!("already shows \"{title}\""),
        (HomepageOutcome::NoPosts, _) => "skipped (no posts)".to_string(),
        (HomepageOutcome::MissingFile, _) => "skipped (not found)".to_string(),
        (HomepageOutcome::MissingBlock, _) => "skipped (no latest-post block)".to_string(),
        (_, None) => "skipped".to_string(),
    };
    lines.push(format!("    Homepage: {homepage}"));

    lines.push(generated_line("Chapters", &report.chapters, "chapter", site_root));
    lines
}

pub fn print_build_output(report: &BuildReport, site_root: &Path) {
    for line in format_build_output(report, site_root) {
        println!("{}", line);
    }
}

// ============================================================================
// Migrate
// ============================================================================

pub fn format_migration_output(report: &MigrationReport) -> Vec<String> {
    let mut lines = Vec::new();

    let moves: Vec<String> = report
        .moved
        .iter()
        .map(|m| format!("{} \u{2192} {}", m.from.display(), m.to.display()))
        .collect();
    section(&mut lines, "Moved", &moves);

    let rewritten: Vec<_> = report.rewritten.iter().map(|p| p.display()).collect();
    section(&mut lines, "Rewritten", &rewritten);

    let skipped: Vec<_> = report.skipped.iter().map(|p| p.display()).collect();
    section(&mut lines, "Skipped (target exists)", &skipped);

    let failed: Vec<_> = report.failed.iter().map(|p| p.display()).collect();
    section(&mut lines, "Failed", &failed);

    if report.is_noop() && report.failed.is_empty() {
        lines.push("Nothing to migrate".to_string());
    } else {
        lines.push(format!(
            "Moved {}, rewrote {}, skipped {}, failed {}",
            plural(report.moved.len(), "page"),
            report.rewritten.len(),
            report.skipped.len(),
            report.failed.len()
        ));
    }
    lines
}

pub fn print_migration_output(report: &MigrationReport) {
    for line in format_migration_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Re-template
// ============================================================================

pub fn format_retemplate_output(report: &RetemplateReport) -> Vec<String> {
    let mut lines = Vec::new();

    section(&mut lines, "Updated", &report.updated);

    let failed: Vec<String> = report
        .failed
        .iter()
        .map(|(slug, reason)| format!("{slug}: {reason}"))
        .collect();
    section(&mut lines, "Failed", &failed);

    lines.push(format!(
        "Updated {}, {} already migrated, {} failed",
        plural(report.updated.len(), "post"),
        report.already_migrated.len(),
        report.failed.len()
    ));
    lines
}

pub fn print_retemplate_output(report: &RetemplateReport) {
    for line in format_retemplate_output(report) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
