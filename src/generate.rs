//! Collection generators and data file output.
//!
//! The blog, review map and book pages render their listings in the browser
//! from generated JavaScript data files. Each generator scans one collection
//! root, derives the listing fields from every page, sorts the collection
//! and writes it out:
//!
//! ```text
//! posts/<slug>/index.html     →  blog-posts.js        const blogPosts = [...]
//! benedict/<slug>/index.html  →  benedict-reviews.js  const benedictReviews = [...]
//! book/<slug>/index.html      →  book-chapters.js     const bookChapters = [...]
//! ```
//!
//! ## Ordering
//!
//! Posts and reviews are newest first, compared as ISO date strings (the
//! zero-padded `YYYY-MM-DD` format sorts lexicographically). Chapters are in
//! chapter-number order, with unnumbered folders last. All sorts are stable,
//! and items are scanned in folder-name order, so ties keep that order.
//!
//! ## Data File Format
//!
//! A short `//` comment header (worded per collection; the reviews file
//! notes its ordering) marks the file as generated, followed by a single
//! `const` holding a four-space-indented JSON array. Review coordinates that
//! are whole numbers, like the `0` of a page without a map, are written as
//! integers. Non-ASCII text
//! (the egg glyph, accented names) is written verbatim.

use crate::config::{ChaptersConfig, PostsConfig, ReviewSummary, ReviewsConfig};
use crate::extract::{Coordinates, Metadata};
use crate::naming;
use crate::scan::{self, ScanError};
use crate::types::{Chapter, Post, Review};
use regex::Regex;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;

static FELLOW_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Benedict Fellow:\s*(.+)").unwrap());

pub const POSTS_VARIABLE: &str = "blogPosts";
pub const REVIEWS_VARIABLE: &str = "benedictReviews";
pub const CHAPTERS_VARIABLE: &str = "bookChapters";

const POSTS_HEADER: &[&str] = &[
    "Blog Posts Data",
    "This file is automatically generated by nightbeans",
    "Do not edit manually - run 'nightbeans build' to regenerate",
];
const REVIEWS_HEADER: &[&str] = &[
    "Benedict Reviews Data",
    "This file is automatically generated by nightbeans",
    "Reviews are automatically sorted by date (newest first)",
];
const CHAPTERS_HEADER: &[&str] = &[
    "Book Chapters Data",
    "This file is automatically generated by nightbeans",
    "Do not edit manually - run 'nightbeans build' to regenerate",
];

#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Scan(#[from] ScanError),
}

/// URL segment of a collection: the last component of its root directory.
fn collection_name(dir: &str) -> String {
    Path::new(dir)
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| dir.to_string())
}

// ============================================================================
// Item builders
// ============================================================================

pub fn build_post(collection: &str, slug: &str, meta: &Metadata) -> Post {
    let date = meta.date().unwrap_or_default().to_string();
    Post {
        slug: slug.to_string(),
        title: meta.title.clone().unwrap_or_else(|| slug.to_string()),
        url: naming::item_url(collection, slug),
        date_display: naming::format_display_date(&date),
        date,
        excerpt: meta.paragraphs.first().cloned().unwrap_or_default(),
    }
}

pub fn build_review(
    collection: &str,
    slug: &str,
    meta: &Metadata,
    config: &ReviewsConfig,
) -> Review {
    let glyph = config.rating_glyph.as_str();
    // A page without rating markup counts as a single egg.
    let rating_text = meta.rating_text.as_deref().unwrap_or(glyph);
    let summary = match config.summary {
        ReviewSummary::First => meta.paragraphs.first(),
        ReviewSummary::Last => meta.paragraphs.last(),
    };
    let Coordinates { lat, lng } = meta
        .coordinates
        .unwrap_or(Coordinates { lat: 0.0, lng: 0.0 });
    let date = meta.date().unwrap_or_default().to_string();

    Review {
        slug: slug.to_string(),
        title: meta.title.clone().unwrap_or_else(|| slug.to_string()),
        date_display: naming::format_display_date(&date),
        date,
        rating: rating_text.matches(glyph).count(),
        rating_display: glyph.to_string(),
        summary: summary.cloned().unwrap_or_default(),
        url: naming::item_url(collection, slug),
        lat,
        lng,
        fellow: parse_fellow(meta.fellow_text.as_deref())
            .unwrap_or_else(|| config.default_fellow.clone()),
    }
}

/// Credited name from `Benedict Fellow: <name>` markup text.
pub fn parse_fellow(text: Option<&str>) -> Option<String> {
    let caps = FELLOW_RE.captures(text?)?;
    let name = caps[1].trim();
    (!name.is_empty()).then(|| name.to_string())
}

pub fn build_chapter(
    collection: &str,
    slug: &str,
    meta: &Metadata,
    excerpt_chars: usize,
) -> Chapter {
    let first = meta.paragraphs.first().map(String::as_str).unwrap_or("");
    Chapter {
        slug: slug.to_string(),
        title: meta.title.clone().unwrap_or_else(|| slug.to_string()),
        chapter_number: naming::parse_chapter_number(slug),
        url: naming::item_url(collection, slug),
        excerpt: naming::truncate_excerpt(first, excerpt_chars),
    }
}

// ============================================================================
// Sorting
// ============================================================================

pub fn sort_posts(posts: &mut [Post]) {
    posts.sort_by(|a, b| b.date.cmp(&a.date));
}

pub fn sort_reviews(reviews: &mut [Review]) {
    reviews.sort_by(|a, b| b.date.cmp(&a.date));
}

pub fn sort_chapters(chapters: &mut [Chapter]) {
    chapters.sort_by_key(|c| c.chapter_number);
}

// ============================================================================
// Collect (scan + sort)
// ============================================================================

/// Scan and sort the post collection without writing anything.
pub fn collect_posts(site_root: &Path, config: &PostsConfig) -> Result<Vec<Post>, GenerateError> {
    let collection = collection_name(&config.dir);
    let mut posts = scan::scan_items(&site_root.join(&config.dir), |slug, meta| {
        build_post(&collection, slug, meta)
    })?;
    sort_posts(&mut posts);
    Ok(posts)
}

/// Scan and sort the review collection without writing anything.
pub fn collect_reviews(
    site_root: &Path,
    config: &ReviewsConfig,
) -> Result<Vec<Review>, GenerateError> {
    let collection = collection_name(&config.dir);
    let mut reviews = scan::scan_items(&site_root.join(&config.dir), |slug, meta| {
        build_review(&collection, slug, meta, config)
    })?;
    sort_reviews(&mut reviews);
    Ok(reviews)
}

/// Scan and sort the chapter collection without writing anything.
pub fn collect_chapters(
    site_root: &Path,
    config: &ChaptersConfig,
) -> Result<Vec<Chapter>, GenerateError> {
    let collection = collection_name(&config.dir);
    let mut chapters = scan::scan_items(&site_root.join(&config.dir), |slug, meta| {
        build_chapter(&collection, slug, meta, config.excerpt_chars)
    })?;
    sort_chapters(&mut chapters);
    Ok(chapters)
}

// ============================================================================
// Generate (collect + write)
// ============================================================================

/// A data file written by a generator.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedFile {
    pub path: PathBuf,
    pub count: usize,
}

pub fn generate_posts(
    site_root: &Path,
    config: &PostsConfig,
) -> Result<(Vec<Post>, GeneratedFile), GenerateError> {
    let posts = collect_posts(site_root, config)?;
    let content = render_data_file(POSTS_HEADER, POSTS_VARIABLE, &posts)?;
    let file = write_data_file(&site_root.join(&config.output), &content, posts.len())?;
    Ok((posts, file))
}

pub fn generate_reviews(
    site_root: &Path,
    config: &ReviewsConfig,
) -> Result<(Vec<Review>, GeneratedFile), GenerateError> {
    let reviews = collect_reviews(site_root, config)?;
    let content = render_data_file(REVIEWS_HEADER, REVIEWS_VARIABLE, &reviews)?;
    let file = write_data_file(&site_root.join(&config.output), &content, reviews.len())?;
    Ok((reviews, file))
}

pub fn generate_chapters(
    site_root: &Path,
    config: &ChaptersConfig,
) -> Result<(Vec<Chapter>, GeneratedFile), GenerateError> {
    let chapters = collect_chapters(site_root, config)?;
    let content = render_data_file(CHAPTERS_HEADER, CHAPTERS_VARIABLE, &chapters)?;
    let file = write_data_file(&site_root.join(&config.output), &content, chapters.len())?;
    Ok((chapters, file))
}

/// Render a collection as a generated JavaScript data file: one `//` line
/// per header entry, a blank line, then the array.
pub fn render_data_file<T: Serialize>(
    header: &[&str],
    variable: &str,
    items: &[T],
) -> Result<String, serde_json::Error> {
    let mut buf = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    items.serialize(&mut ser)?;
    let json = String::from_utf8_lossy(&buf);

    let mut out = String::new();
    for line in header {
        out.push_str("// ");
        out.push_str(line);
        out.push('\n');
    }
    out.push_str(&format!("\nconst {variable} = {json};\n"));
    Ok(out)
}

fn write_data_file(
    path: &Path,
    content: &str,
    count: usize,
) -> Result<GeneratedFile, GenerateError> {
    fs::write(path, content)?;
    tracing::info!(path = %path.display(), count, "wrote data file");
    Ok(GeneratedFile {
        path: path.to_path_buf(),
        count,
    })
}
