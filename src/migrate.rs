//! One-shot migration from flat `.html` pages to clean directory URLs.
//!
//! ```text
//! Before                          After
//! blog.html                   →   blog/index.html
//! posts/late-night.html       →   posts/late-night/index.html
//! index.html                      index.html          (links rewritten)
//! publish-blog.html               publish-blog.html   (links rewritten)
//! ```
//!
//! Moving a page one folder deeper breaks its relative links, so every moved
//! or edited page passes through a [`LinkRewriter`] chosen by where the page
//! ends up. Rewriting looks at `href="..."` attribute values only and
//! replaces a value when it exactly matches a rule; prose that happens to
//! mention `blog.html` is left alone.
//!
//! ## Re-running
//!
//! Every rule maps an already-migrated link to itself, and a move whose
//! target `index.html` exists is skipped with the flat page left in place.
//! Running the migration on a migrated site changes nothing.

use crate::config::MigrateConfig;
use regex::{Captures, Regex};
use std::borrow::Cow;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;
use walkdir::WalkDir;

static HREF_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r#"href="([^"]*)""#).unwrap());

/// Content folder whose pages are linked from the homepage.
const POSTS_DIR: &str = "posts";
/// Section that review and work pages link to by bare file name.
const REVIEWS_SECTION: &str = "benedict";

#[derive(Error, Debug)]
pub enum MigrateError {
    #[error("IO error listing {path}: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// Where a page lives after migration, which decides its rewrite rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKind {
    /// `<content-dir>/<slug>/index.html`, one level deeper than before.
    Nested { in_posts: bool },
    /// `<section>/index.html`, linked with root-absolute URLs.
    SectionPage,
    /// The site homepage, edited in place.
    Homepage,
    /// A publishing form at the site root, edited in place.
    PublishForm,
}

pub struct LinkRewriter<'a> {
    kind: PageKind,
    config: &'a MigrateConfig,
}

impl<'a> LinkRewriter<'a> {
    pub fn new(kind: PageKind, config: &'a MigrateConfig) -> Self {
        Self { kind, config }
    }

    /// Rewrite every matching `href` value in `content`.
    pub fn rewrite<'c>(&self, content: &'c str) -> Cow<'c, str> {
        HREF_RE.replace_all(content, |caps: &Captures| match self.rewrite_href(&caps[1]) {
            Some(target) => format!("href=\"{target}\""),
            None => caps[0].to_string(),
        })
    }

    /// New value for one `href`, or `None` when no rule applies.
    pub fn rewrite_href(&self, href: &str) -> Option<String> {
        match self.kind {
            PageKind::Nested { in_posts } => {
                if href == "../style.css" {
                    return Some("../../style.css".to_string());
                }
                if href == "../index.html" {
                    return Some("../../".to_string());
                }
                if let Some(section) = href.strip_prefix("../").and_then(|h| self.section(h)) {
                    return Some(format!("../../{section}/"));
                }
                if !in_posts && href == format!("{REVIEWS_SECTION}.html") {
                    return Some(format!("../../{REVIEWS_SECTION}/"));
                }
                None
            }
            PageKind::SectionPage => self
                .root_link(href)
                .or_else(|| (href == "style.css").then(|| "/style.css".to_string()))
                .or_else(|| self.content_link(href, |_| true)),
            PageKind::Homepage => self
                .root_link(href)
                .or_else(|| self.content_link(href, |dir| dir == POSTS_DIR)),
            PageKind::PublishForm => self.root_link(href),
        }
    }

    /// `<section>.html` → `<section>`
    fn section<'h>(&self, href: &'h str) -> Option<&'h str> {
        let name = href.strip_suffix(".html")?;
        self.config
            .section_pages
            .iter()
            .any(|s| s == name)
            .then_some(name)
    }

    /// Root-level links shared by every page at the site root.
    fn root_link(&self, href: &str) -> Option<String> {
        if href == "index.html" {
            return Some("/".to_string());
        }
        self.section(href).map(|section| format!("/{section}/"))
    }

    /// `<content-dir>/<slug>.html` → `/<content-dir>/<slug>/`
    fn content_link(&self, href: &str, allow: impl Fn(&str) -> bool) -> Option<String> {
        let (dir, rest) = href.split_once('/')?;
        let slug = rest.strip_suffix(".html")?;
        let known = self.config.content_dirs.iter().any(|d| d == dir);
        (known && allow(dir) && !slug.is_empty()).then(|| format!("/{dir}/{slug}/"))
    }
}

// ============================================================================
// Migration run
// ============================================================================

/// A flat page moved into its clean-URL folder. Paths are site-relative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Move {
    pub from: PathBuf,
    pub to: PathBuf,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MigrationReport {
    pub moved: Vec<Move>,
    /// Pages edited in place (homepage, publish forms)
    pub rewritten: Vec<PathBuf>,
    /// Flat pages left alone because their target already exists
    pub skipped: Vec<PathBuf>,
    pub failed: Vec<PathBuf>,
}

impl MigrationReport {
    pub fn is_noop(&self) -> bool {
        self.moved.is_empty() && self.rewritten.is_empty()
    }
}

/// Migrate the site under `site_root` to clean URLs.
///
/// Section pages move first, then the homepage is rewritten, then every
/// content folder's flat pages move, then the publish forms are rewritten.
/// A page that fails is logged, recorded in the report, and the run
/// continues. There is no rollback.
pub fn migrate_urls(
    site_root: &Path,
    config: &MigrateConfig,
) -> Result<MigrationReport, MigrateError> {
    let mut report = MigrationReport::default();

    let rewriter = LinkRewriter::new(PageKind::SectionPage, config);
    for section in &config.section_pages {
        let from = PathBuf::from(format!("{section}.html"));
        if !site_root.join(&from).is_file() {
            tracing::info!(page = %from.display(), "section page not found, skipping");
            continue;
        }
        let to = Path::new(section).join("index.html");
        move_page(site_root, from, to, &rewriter, &mut report);
    }

    let homepage = LinkRewriter::new(PageKind::Homepage, config);
    rewrite_in_place(site_root, Path::new("index.html"), &homepage, &mut report);

    for dir in &config.content_dirs {
        let rewriter = LinkRewriter::new(
            PageKind::Nested {
                in_posts: dir == POSTS_DIR,
            },
            config,
        );
        for slug in flat_pages(&site_root.join(dir))? {
            let from = Path::new(dir).join(format!("{slug}.html"));
            let to = Path::new(dir).join(&slug).join("index.html");
            move_page(site_root, from, to, &rewriter, &mut report);
        }
    }

    let forms = LinkRewriter::new(PageKind::PublishForm, config);
    for form in &config.publish_forms {
        rewrite_in_place(site_root, Path::new(form), &forms, &mut report);
    }

    Ok(report)
}

/// Slugs of the flat `<slug>.html` pages directly inside `dir`, by name.
fn flat_pages(dir: &Path) -> Result<Vec<String>, MigrateError> {
    if !dir.is_dir() {
        tracing::info!(dir = %dir.display(), "content directory not found, skipping");
        return Ok(Vec::new());
    }
    let mut slugs = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|source| MigrateError::Walk {
            path: dir.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if name == "index.html" {
            continue;
        }
        if let Some(slug) = name.strip_suffix(".html") {
            slugs.push(slug.to_string());
        }
    }
    Ok(slugs)
}

fn move_page(
    site_root: &Path,
    from: PathBuf,
    to: PathBuf,
    rewriter: &LinkRewriter,
    report: &mut MigrationReport,
) {
    let target = site_root.join(&to);
    if target.exists() {
        tracing::warn!(from = %from.display(), to = %to.display(), "target exists, leaving page in place");
        report.skipped.push(from);
        return;
    }

    let source = site_root.join(&from);
    let result = (|| -> std::io::Result<()> {
        let content = fs::read_to_string(&source)?;
        let rewritten = rewriter.rewrite(&content);
        if let Some(parent) = target.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, rewritten.as_ref())?;
        fs::remove_file(&source)
    })();

    match result {
        Ok(()) => {
            tracing::info!(from = %from.display(), to = %to.display(), "moved");
            report.moved.push(Move { from, to });
        }
        Err(err) => {
            tracing::warn!(page = %from.display(), %err, "error moving page, skipping");
            report.failed.push(from);
        }
    }
}

fn rewrite_in_place(
    site_root: &Path,
    page: &Path,
    rewriter: &LinkRewriter,
    report: &mut MigrationReport,
) {
    let path = site_root.join(page);
    if !path.is_file() {
        tracing::info!(page = %page.display(), "not found, skipping");
        return;
    }

    let result = (|| -> std::io::Result<bool> {
        let content = fs::read_to_string(&path)?;
        let rewritten = rewriter.rewrite(&content);
        if rewritten == content {
            return Ok(false);
        }
        fs::write(&path, rewritten.as_ref())?;
        Ok(true)
    })();

    match result {
        Ok(true) => {
            tracing::info!(page = %page.display(), "rewrote links");
            report.rewritten.push(page.to_path_buf());
        }
        Ok(false) => tracing::debug!(page = %page.display(), "links already clean"),
        Err(err) => {
            tracing::warn!(page = %page.display(), %err, "error rewriting page, skipping");
            report.failed.push(page.to_path_buf());
        }
    }
}
