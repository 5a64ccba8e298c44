//! Post page re-templating: arrow navigation in the header.
//!
//! Older post pages carry their previous/next links in a `post-nav` block
//! under the article. The current layout puts arrows beside the title
//! instead, repeats them at the bottom of the content, and links the title
//! back to the blog listing:
//!
//! ```text
//! <header class="post-header">              <header class="post-header">
//!   <h1>Title</h1>                            <div>
//!   <time ...>                        →         <h1><a href="../../blog/">Title</a></h1>
//! </header>                                     <time ...>
//! ...                                         </div>
//! <nav class="post-nav">← prev  next →</nav>  <div class="nav-arrows">→ ←</div>
//!                                           </header>
//! ```
//!
//! The header arrows read "next" then "previous"; the bottom bar reads
//! "previous" then "next". A missing neighbour renders as a disabled arrow.
//!
//! Pages that already have a `nav-arrows` block are left alone, so the pass
//! can be run again after new posts are added.

use crate::config::PostsConfig;
use crate::scan::{self, ScanError};
use maud::{Markup, PreEscaped, html};
use regex::Regex;
use std::fs;
use std::path::Path;
use std::sync::LazyLock;
use thiserror::Error;

static HEADER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?s)<header class="post-header">(.+?)</header>"#).unwrap());
static TITLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<h1>(?:<a[^>]*>)?(.+?)(?:</a>)?</h1>").unwrap());
static TIME_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<time[^>]*>.*?</time>").unwrap());
static POST_NAV_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?s)<nav class="post-nav">\s*(.+?)\s*</nav>"#).unwrap());
static POST_NAV_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"(?s)\s*<nav class="post-nav">.*?</nav>"#).unwrap());
static PREV_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<a href="\.\./([^"]+)/">←"#).unwrap());
static NEXT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"<a href="\.\./([^"]+)/">[^<]*→</a>"#).unwrap());
static ARTICLE_END_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"</div>\s*</article>").unwrap());

const ARROWS_MARKER: &str = r#"class="nav-arrows""#;

#[derive(Error, Debug)]
pub enum RetemplateError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("no post-header block")]
    MissingHeader,
    #[error("no title in post-header")]
    MissingTitle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Updated,
    AlreadyMigrated,
}

/// Neighbour slugs read from an existing `post-nav` block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavTargets {
    pub prev: Option<String>,
    pub next: Option<String>,
}

pub fn read_nav_targets(content: &str) -> NavTargets {
    let Some(caps) = POST_NAV_RE.captures(content) else {
        tracing::debug!("no post-nav block");
        return NavTargets::default();
    };
    let nav = &caps[1];
    NavTargets {
        prev: PREV_RE.captures(nav).map(|c| c[1].to_string()),
        next: NEXT_RE.captures(nav).map(|c| c[1].to_string()),
    }
}

fn arrow(target: Option<&str>, glyph: &str) -> Markup {
    html! {
        @if let Some(slug) = target {
            a href=(format!("../{slug}/")) class="nav-arrow" { (glyph) }
        } @else {
            a href="#" class="nav-arrow disabled" { (glyph) }
        }
    }
}

/// New header: linked title, the original `time` element, then arrows.
///
/// `title` and `time` are markup lifted from the old header and are
/// inserted verbatim.
pub fn render_header(title: &str, time: &str, targets: &NavTargets) -> String {
    html! {
        header class="post-header" {
            div {
                h1 { a href="../../blog/" { (PreEscaped(title)) } }
                (PreEscaped(time))
            }
            div class="nav-arrows" {
                (arrow(targets.next.as_deref(), "→"))
                (arrow(targets.prev.as_deref(), "←"))
            }
        }
    }
    .into_string()
}

pub fn render_bottom_nav(targets: &NavTargets) -> String {
    html! {
        div class="bottom-nav" {
            (arrow(targets.prev.as_deref(), "←"))
            (arrow(targets.next.as_deref(), "→"))
        }
    }
    .into_string()
}

/// Re-template one page. Returns `None` when the page already has arrows.
pub fn retemplate_page(content: &str) -> Result<Option<String>, RetemplateError> {
    if content.contains(ARROWS_MARKER) {
        return Ok(None);
    }

    let header = HEADER_RE
        .captures(content)
        .ok_or(RetemplateError::MissingHeader)?;
    let header_inner = header.get(1).map_or("", |m| m.as_str());
    let header_range = header.get(0).map_or(0..0, |m| m.range());
    let title = TITLE_RE
        .captures(header_inner)
        .and_then(|c| c.get(1))
        .ok_or(RetemplateError::MissingTitle)?
        .as_str();
    let time = TIME_RE.find(header_inner).map_or("", |m| m.as_str());
    let targets = read_nav_targets(content);

    let new_header = render_header(title, time, &targets);
    let page = format!(
        "{}{}{}",
        &content[..header_range.start],
        new_header,
        &content[header_range.end..]
    );

    let mut page = POST_NAV_BLOCK_RE.replace_all(&page, "").into_owned();

    if let Some(end) = ARTICLE_END_RE.find(&page) {
        let bottom = format!("{}\n            ", render_bottom_nav(&targets));
        page.insert_str(end.start(), &bottom);
    } else {
        tracing::debug!("no closing content div before </article>, bottom nav omitted");
    }

    Ok(Some(page))
}

pub fn retemplate_file(path: &Path) -> Result<Outcome, RetemplateError> {
    let content = fs::read_to_string(path)?;
    match retemplate_page(&content)? {
        Some(page) => {
            fs::write(path, page)?;
            Ok(Outcome::Updated)
        }
        None => Ok(Outcome::AlreadyMigrated),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RetemplateReport {
    pub updated: Vec<String>,
    pub already_migrated: Vec<String>,
    /// Slug and reason for each page that couldn't be re-templated
    pub failed: Vec<(String, String)>,
}

/// Re-template every post page. Failures are logged and recorded; the
/// batch always runs to the end.
pub fn retemplate_posts(
    site_root: &Path,
    config: &PostsConfig,
) -> Result<RetemplateReport, ScanError> {
    let mut report = RetemplateReport::default();
    for item in scan::item_dirs(&site_root.join(&config.dir))? {
        match retemplate_file(&item.index_path) {
            Ok(Outcome::Updated) => {
                tracing::info!(slug = %item.slug, "re-templated");
                report.updated.push(item.slug);
            }
            Ok(Outcome::AlreadyMigrated) => {
                tracing::debug!(slug = %item.slug, "already has nav arrows");
                report.already_migrated.push(item.slug);
            }
            Err(err) => {
                tracing::warn!(slug = %item.slug, %err, "could not re-template");
                report.failed.push((item.slug, err.to_string()));
            }
        }
    }
    Ok(report)
}
