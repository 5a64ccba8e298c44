//! The `build` and `check` runs.
//!
//! ```text
//! reviews   benedict/  →  benedict-reviews.js
//! posts     posts/     →  blog-posts.js
//!                      →  post pages (prev/next, Book link)
//!                      →  index.html (latest post)
//! chapters  book/      →  book-chapters.js
//! ```
//!
//! `check` runs the same scans and reports what a build would write,
//! without touching any file.

use crate::config::SiteConfig;
use crate::generate::{self, GenerateError, GeneratedFile};
use crate::types::{Chapter, Post, Review};
use crate::update::{self, HomepageOutcome, LinkSummary, UpdateError};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error(transparent)]
    Generate(#[from] GenerateError),
    #[error(transparent)]
    Update(#[from] UpdateError),
}

#[derive(Debug)]
pub struct BuildReport {
    pub reviews: GeneratedFile,
    pub posts: GeneratedFile,
    pub links: LinkSummary,
    pub homepage: HomepageOutcome,
    /// Title of the post shown on the homepage
    pub latest: Option<String>,
    pub chapters: GeneratedFile,
}

/// Regenerate the data files and refresh the post and homepage navigation.
pub fn build(site_root: &Path, config: &SiteConfig) -> Result<BuildReport, BuildError> {
    tracing::info!(root = %site_root.display(), "building site");

    let (_, reviews) = generate::generate_reviews(site_root, &config.reviews)?;
    let (posts, posts_file) = generate::generate_posts(site_root, &config.posts)?;
    let links = update::update_post_links(site_root, &config.posts, &posts);
    let homepage = update::update_homepage(site_root, &config.homepage, &posts)?;
    let (_, chapters) = generate::generate_chapters(site_root, &config.chapters)?;

    Ok(BuildReport {
        reviews,
        posts: posts_file,
        links,
        homepage,
        latest: posts.first().map(|p| p.title.clone()),
        chapters,
    })
}

/// Every collection as a build would see it.
#[derive(Debug, Default)]
pub struct Inventory {
    pub posts: Vec<Post>,
    pub reviews: Vec<Review>,
    pub chapters: Vec<Chapter>,
}

pub fn check(site_root: &Path, config: &SiteConfig) -> Result<Inventory, GenerateError> {
    Ok(Inventory {
        posts: generate::collect_posts(site_root, &config.posts)?,
        reviews: generate::collect_reviews(site_root, &config.reviews)?,
        chapters: generate::collect_chapters(site_root, &config.chapters)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use tempfile::TempDir;

    fn site() -> TempDir {
        let tmp = TempDir::new().unwrap();
        let posts = tmp.path().join("posts");
        write_item(&posts, "new-year", &post_page("New Year", "2024-01-01", &["One."]));
        write_item(&posts, "ides", &post_page("Ides", "2024-03-15", &["Two."]));
        write_item(
            &tmp.path().join("benedict"),
            "tamper",
            &review_page("Tamper", "2024-03-30", Some(2), None, &["Nice."], None),
        );
        write_item(
            &tmp.path().join("book"),
            "chapter-1",
            &chapter_page("Start", &["Once."]),
        );
        std::fs::write(tmp.path().join("index.html"), homepage()).unwrap();
        tmp
    }

    #[test]
    fn build_writes_everything() {
        let tmp = site();
        let report = build(tmp.path(), &SiteConfig::default()).unwrap();

        assert_eq!(report.posts.count, 2);
        assert_eq!(report.reviews.count, 1);
        assert_eq!(report.chapters.count, 1);
        assert_eq!(report.links.updated, 2);
        assert_eq!(report.homepage, HomepageOutcome::Updated);
        assert_eq!(report.latest.as_deref(), Some("Ides"));

        for file in ["blog-posts.js", "benedict-reviews.js", "book-chapters.js"] {
            assert!(tmp.path().join(file).is_file(), "{file}");
        }
    }

    #[test]
    fn check_writes_nothing() {
        let tmp = site();
        let before = read(&tmp.path().join("posts/ides/index.html"));

        let inventory = check(tmp.path(), &SiteConfig::default()).unwrap();
        assert_eq!(inventory.posts.len(), 2);
        assert_eq!(inventory.posts[0].slug, "ides");

        assert!(!tmp.path().join("blog-posts.js").exists());
        assert_eq!(read(&tmp.path().join("posts/ides/index.html")), before);
    }

    #[test]
    fn empty_site_builds() {
        let tmp = TempDir::new().unwrap();
        let report = build(tmp.path(), &SiteConfig::default()).unwrap();
        assert_eq!(report.posts.count, 0);
        assert_eq!(report.homepage, HomepageOutcome::NoPosts);
        assert!(report.latest.is_none());
    }
}
