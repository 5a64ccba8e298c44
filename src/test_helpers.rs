//! Shared test utilities for the nightbeans test suite.
//!
//! Builds small hand-written-looking pages and drops them into a temporary
//! site so each module's tests can exercise real files.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let tmp = TempDir::new().unwrap();
//! write_item(&tmp.path().join("posts"), "first", &post_page("First", "2024-01-01", &["Hi."]));
//! ```

use std::fs;
use std::path::{Path, PathBuf};

// =========================================================================
// Fixture files
// =========================================================================

/// Write `root/<slug>/index.html` and return its path.
pub fn write_item(root: &Path, slug: &str, markup: &str) -> PathBuf {
    let dir = root.join(slug);
    fs::create_dir_all(&dir).unwrap();
    let path = dir.join("index.html");
    fs::write(&path, markup).unwrap();
    path
}

/// Read a file, panicking with the path on failure.
pub fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| panic!("read {}: {e}", path.display()))
}

// =========================================================================
// Page builders
// =========================================================================

fn paragraphs_html(paragraphs: &[&str]) -> String {
    paragraphs
        .iter()
        .map(|p| format!("                <p>{p}</p>"))
        .collect::<Vec<_>>()
        .join("\n")
}

/// A blog post in the site's pre-arrow layout: header, content, post-nav.
pub fn post_page(title: &str, date: &str, paragraphs: &[&str]) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{title}</title>
    <link rel="stylesheet" href="../../style.css">
</head>
<body>
    <nav class="site-nav">
        <ul class="nav-links">
            <li><a href="../../">Home</a></li>
            <li><a href="../../blog/">Blog</a></li>
            <li><a href="../../benedict/">Benedict</a></li>
        </ul>
    </nav>
    <main>
        <article>
            <header class="post-header">
                <h1>{title}</h1>
                <time datetime="{date}">{date}</time>
            </header>
            <div class="post-content">
{paras}
            </div>
        </article>
        <nav class="post-nav">
            <span></span>
            <span></span>
        </nav>
    </main>
</body>
</html>
"#,
        paras = paragraphs_html(paragraphs)
    )
}

/// A restaurant review. `rating` repeats the egg glyph; `None` omits the
/// rating block entirely.
pub fn review_page(
    title: &str,
    date: &str,
    rating: Option<usize>,
    fellow: Option<&str>,
    paragraphs: &[&str],
    coords: Option<(f64, f64)>,
) -> String {
    let rating_html = rating
        .map(|n| format!(r#"<div class="benedict-rating">{}</div>"#, "🍳".repeat(n)))
        .unwrap_or_default();
    let fellow_html = fellow
        .map(|name| {
            format!(r#"<div class="benedict-fellow"><strong>Benedict Fellow:</strong> {name}</div>"#)
        })
        .unwrap_or_default();
    let script = coords
        .map(|(lat, lng)| {
            format!("<script>var map = L.map('map').setView([{lat:?}, {lng:?}], 16);</script>")
        })
        .unwrap_or_default();
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="UTF-8"><title>{title}</title></head>
<body>
    <article>
        <h1>{title}</h1>
        <time datetime="{date}">{date}</time>
        {rating_html}
        {fellow_html}
        <div class="post-content">
{paras}
        </div>
        <div id="map"></div>
    </article>
    {script}
</body>
</html>
"#,
        paras = paragraphs_html(paragraphs)
    )
}

/// A book chapter.
pub fn chapter_page(title: &str, paragraphs: &[&str]) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="UTF-8"><title>{title}</title></head>
<body>
    <article>
        <h1>{title}</h1>
        <div class="post-content">
{paras}
        </div>
    </article>
</body>
</html>
"#,
        paras = paragraphs_html(paragraphs)
    )
}

/// A homepage with a stale `latest-post` block.
pub fn homepage() -> String {
    r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="UTF-8"><title>Home</title></head>
<body>
    <main>
        <article class="latest-post">
            <h2><a href="/posts/old/">Old Post</a></h2>
            <p>Stale</p>
        </article>
        <section class="elsewhere">unchanged</section>
    </main>
</body>
</html>
"#
    .to_string()
}
