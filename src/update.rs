//! In-place updates to existing pages after the collections are built.
//!
//! Two passes touch hand-written HTML:
//!
//! - **Cross-links**: every post's `post-nav` block is re-rendered from the
//!   sorted post collection, and the site navigation gains a Book entry
//!   after Benedict if it doesn't have one yet.
//! - **Homepage**: the `latest-post` article is replaced with a preview of
//!   the newest post.
//!
//! Both passes edit the matched fragments only and leave the rest of each
//! document byte-for-byte intact. A file is written only when its content
//! actually changes, so running a pass twice is a no-op the second time.
//!
//! ## Neighbours
//!
//! Posts are sorted newest first. The "previous" link of a post points at
//! the entry before it in that order (a newer post) and "next" at the entry
//! after it (an older one):
//!
//! ```text
//! [2024-03-15]  ←  [2024-02-10]  →  [2024-01-01]
//! ```

use crate::config::{HomepageConfig, PostsConfig};
use crate::types::{NavigationLink, Post};
use maud::html;
use regex::{NoExpand, Regex};
use std::borrow::Cow;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::sync::LazyLock;
use thiserror::Error;

static POST_NAV_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?s)<nav class="post-nav">.*?</nav>"#).unwrap());

static NAV_LINKS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"(?s)(<ul class="nav-links">.*?<li><a href="\.\./\.\./benedict/">Benedict</a></li>)(.*?</ul>)"#,
    )
    .unwrap()
});

static LATEST_POST_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?s)<article class="latest-post">.*?</article>"#).unwrap());

const BOOK_NAV_ITEM: &str = "\n                <li><a href=\"../../book/\">Book</a></li>";

#[derive(Error, Debug)]
pub enum UpdateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

// ============================================================================
// Cross-links
// ============================================================================

/// Previous (newer) and next (older) neighbours of the post at `index`.
pub fn post_neighbours(
    posts: &[Post],
    index: usize,
) -> (Option<NavigationLink>, Option<NavigationLink>) {
    let prev = index
        .checked_sub(1)
        .and_then(|i| posts.get(i))
        .map(NavigationLink::from);
    let next = posts.get(index + 1).map(NavigationLink::from);
    (prev, next)
}

/// Render a post's bottom navigation. Missing sides become empty spans so
/// the remaining link keeps its position.
pub fn render_post_nav(prev: Option<&NavigationLink>, next: Option<&NavigationLink>) -> String {
    html! {
        nav class="post-nav" {
            @if let Some(prev) = prev {
                a href=(format!("../{}/", prev.slug)) { "← " (prev.title) }
            } @else {
                span {}
            }
            @if let Some(next) = next {
                a href=(format!("../{}/", next.slug)) { (next.title) " →" }
            } @else {
                span {}
            }
        }
    }
    .into_string()
}

/// Insert a Book entry after Benedict in the site navigation unless the
/// rest of the list already has one.
pub fn ensure_book_link(content: &str) -> Cow<'_, str> {
    let Some(caps) = NAV_LINKS_RE.captures(content) else {
        return Cow::Borrowed(content);
    };
    if caps[2].to_lowercase().contains("book") {
        return Cow::Borrowed(content);
    }
    let split = caps.get(1).map_or(0, |m| m.end());
    Cow::Owned(format!(
        "{}{}{}",
        &content[..split],
        BOOK_NAV_ITEM,
        &content[split..]
    ))
}

/// Apply the navigation updates for one post to its page content.
pub fn apply_post_links(
    content: &str,
    prev: Option<&NavigationLink>,
    next: Option<&NavigationLink>,
) -> String {
    let nav = render_post_nav(prev, next);
    let content = POST_NAV_RE.replace_all(content, NoExpand(&nav));
    ensure_book_link(&content).into_owned()
}

/// Files touched by a cross-link pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LinkSummary {
    pub updated: usize,
    pub unchanged: usize,
    pub failed: usize,
}

/// Rewrite the navigation of every post page in `posts` (already sorted).
///
/// A page that can't be read or written is logged and counted as failed;
/// the rest of the collection is still updated.
pub fn update_post_links(site_root: &Path, config: &PostsConfig, posts: &[Post]) -> LinkSummary {
    let posts_dir = site_root.join(&config.dir);
    let mut summary = LinkSummary::default();

    for (index, post) in posts.iter().enumerate() {
        let (prev, next) = post_neighbours(posts, index);
        let path = posts_dir.join(&post.slug).join("index.html");
        match update_post_file(&path, prev.as_ref(), next.as_ref()) {
            Ok(true) => {
                tracing::info!(slug = %post.slug, "updated navigation");
                summary.updated += 1;
            }
            Ok(false) => summary.unchanged += 1,
            Err(err) => {
                tracing::warn!(slug = %post.slug, %err, "error updating navigation, skipping");
                summary.failed += 1;
            }
        }
    }
    summary
}

fn update_post_file(
    path: &Path,
    prev: Option<&NavigationLink>,
    next: Option<&NavigationLink>,
) -> Result<bool, UpdateError> {
    let content = fs::read_to_string(path)?;
    let updated = apply_post_links(&content, prev, next);
    if updated == content {
        return Ok(false);
    }
    fs::write(path, updated)?;
    Ok(true)
}

// ============================================================================
// Homepage
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HomepageOutcome {
    Updated,
    Unchanged,
    NoPosts,
    MissingFile,
    MissingBlock,
}

/// Preview block for the newest post.
pub fn render_latest_post(post: &Post) -> String {
    html! {
        article class="latest-post" {
            h2 { a href=(post.url) { (post.title) } }
            time datetime=(post.date) { (post.date_display) }
            div class="post-preview-content" {
                p { (post.excerpt) }
            }
            a href=(post.url) class="read-more" { "Read more →" }
        }
    }
    .into_string()
}

/// Replace the first `latest-post` article of the homepage with the newest
/// post in `posts`.
pub fn update_homepage(
    site_root: &Path,
    config: &HomepageConfig,
    posts: &[Post],
) -> Result<HomepageOutcome, UpdateError> {
    let Some(latest) = posts.first() else {
        return Ok(HomepageOutcome::NoPosts);
    };
    let path = site_root.join(&config.path);
    let content = match fs::read_to_string(&path) {
        Ok(content) => content,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            tracing::info!(path = %path.display(), "homepage not found, skipping");
            return Ok(HomepageOutcome::MissingFile);
        }
        Err(err) => return Err(err.into()),
    };
    if !LATEST_POST_RE.is_match(&content) {
        tracing::info!(path = %path.display(), "no latest-post block on homepage");
        return Ok(HomepageOutcome::MissingBlock);
    }

    let block = render_latest_post(latest);
    let updated = LATEST_POST_RE.replace(&content, NoExpand(&block));
    if updated == content {
        return Ok(HomepageOutcome::Unchanged);
    }
    fs::write(&path, updated.as_ref())?;
    tracing::info!(slug = %latest.slug, "updated homepage latest post");
    Ok(HomepageOutcome::Updated)
}
