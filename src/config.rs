//! Site configuration module.
//!
//! Handles loading, validating, and merging `site.toml`. Configuration is
//! layered: stock defaults are overridden by an optional `site.toml` at the
//! site root. Every key is optional, so a site that follows the default
//! layout needs no config file at all.
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [posts]
//! dir = "posts"                    # Content root, one subfolder per post
//! output = "blog-posts.js"         # Generated data file
//!
//! [reviews]
//! dir = "benedict"
//! output = "benedict-reviews.js"
//! summary = "first"                # "first" or "last" paragraph
//! rating_glyph = "🍳"
//! default_fellow = "Joel Delaney"
//!
//! [chapters]
//! dir = "book"
//! output = "book-chapters.js"
//! excerpt_chars = 150
//!
//! [homepage]
//! path = "index.html"
//!
//! [migrate]
//! content_dirs = ["posts", "benedict", "work"]
//! section_pages = ["blog", "work", "benedict"]
//! publish_forms = ["publish-blog.html", "publish-eggs.html", "publish-work.html"]
//! ```
//!
//! Unknown keys are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// File name of the optional site configuration, relative to the site root.
pub const CONFIG_FILE: &str = "site.toml";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("Config validation error: {0}")]
    Validation(String),
}

/// Site configuration loaded from `site.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    pub posts: PostsConfig,
    pub reviews: ReviewsConfig,
    pub chapters: ChaptersConfig,
    pub homepage: HomepageConfig,
    pub migrate: MigrateConfig,
}

impl SiteConfig {
    /// Validate config values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let names = [
            ("posts.dir", &self.posts.dir),
            ("posts.output", &self.posts.output),
            ("reviews.dir", &self.reviews.dir),
            ("reviews.output", &self.reviews.output),
            ("chapters.dir", &self.chapters.dir),
            ("chapters.output", &self.chapters.output),
            ("homepage.path", &self.homepage.path),
        ];
        for (key, value) in names {
            if value.trim().is_empty() {
                return Err(ConfigError::Validation(format!("{key} must not be empty")));
            }
        }
        if self.reviews.rating_glyph.is_empty() {
            return Err(ConfigError::Validation(
                "reviews.rating_glyph must not be empty".into(),
            ));
        }
        if self.chapters.excerpt_chars == 0 {
            return Err(ConfigError::Validation(
                "chapters.excerpt_chars must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

/// Blog post collection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PostsConfig {
    /// Content root holding one subfolder per post.
    pub dir: String,
    /// Generated data file, relative to the site root.
    pub output: String,
}

impl Default for PostsConfig {
    fn default() -> Self {
        Self {
            dir: "posts".to_string(),
            output: "blog-posts.js".to_string(),
        }
    }
}

/// Which paragraph of a review becomes its summary.
///
/// The site's history used both rules; `First` matches the data files the
/// review map page was built against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewSummary {
    #[default]
    First,
    Last,
}

/// Restaurant review collection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReviewsConfig {
    pub dir: String,
    pub output: String,
    /// Paragraph rule for the review summary.
    pub summary: ReviewSummary,
    /// Glyph counted in the rating markup; also emitted as `ratingDisplay`.
    pub rating_glyph: String,
    /// Credited reviewer when the page names none.
    pub default_fellow: String,
}

impl Default for ReviewsConfig {
    fn default() -> Self {
        Self {
            dir: "benedict".to_string(),
            output: "benedict-reviews.js".to_string(),
            summary: ReviewSummary::First,
            rating_glyph: "\u{1F373}".to_string(),
            default_fellow: "Joel Delaney".to_string(),
        }
    }
}

/// Book chapter collection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChaptersConfig {
    pub dir: String,
    pub output: String,
    /// Maximum excerpt length in characters before `...` is appended.
    pub excerpt_chars: usize,
}

impl Default for ChaptersConfig {
    fn default() -> Self {
        Self {
            dir: "book".to_string(),
            output: "book-chapters.js".to_string(),
            excerpt_chars: 150,
        }
    }
}

/// Homepage settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct HomepageConfig {
    /// Homepage document holding the `latest-post` article.
    pub path: String,
}

impl Default for HomepageConfig {
    fn default() -> Self {
        Self {
            path: "index.html".to_string(),
        }
    }
}

/// Clean-URL migration settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MigrateConfig {
    /// Directories whose flat `slug.html` files move to `slug/index.html`.
    pub content_dirs: Vec<String>,
    /// Root section pages (`blog` for `blog.html`) that move to `blog/index.html`.
    pub section_pages: Vec<String>,
    /// Auxiliary pages whose links are rewritten but which stay in place.
    pub publish_forms: Vec<String>,
}

impl Default for MigrateConfig {
    fn default() -> Self {
        Self {
            content_dirs: vec!["posts".into(), "benedict".into(), "work".into()],
            section_pages: vec!["blog".into(), "work".into(), "benedict".into()],
            publish_forms: vec![
                "publish-blog.html".into(),
                "publish-eggs.html".into(),
                "publish-work.html".into(),
            ],
        }
    }
}

// =============================================================================
// Config loading, merging, and validation
// =============================================================================

/// Returns the stock default config as a `toml::Value::Table`.
pub fn stock_defaults_value() -> toml::Value {
    toml::Value::try_from(SiteConfig::default()).expect("default config must serialize")
}

/// Recursively merge `overlay` on top of `base`.
///
/// - Tables are merged key-by-key (overlay keys override base keys).
/// - Non-table values in overlay replace base values entirely.
/// - Keys in base that are not in overlay are preserved.
pub fn merge_toml(base: toml::Value, overlay: toml::Value) -> toml::Value {
    match (base, overlay) {
        (toml::Value::Table(mut base_table), toml::Value::Table(overlay_table)) => {
            for (key, overlay_val) in overlay_table {
                let merged = match base_table.remove(&key) {
                    Some(base_val) => merge_toml(base_val, overlay_val),
                    None => overlay_val,
                };
                base_table.insert(key, merged);
            }
            toml::Value::Table(base_table)
        }
        (_, overlay) => overlay,
    }
}

/// Load `site.toml` from the site root as a raw TOML value.
///
/// Returns `Ok(None)` if the file doesn't exist.
pub fn load_raw_config(root: &Path) -> Result<Option<toml::Value>, ConfigError> {
    let config_path = root.join(CONFIG_FILE);
    if !config_path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(&config_path)?;
    let value: toml::Value = toml::from_str(&content)?;
    Ok(Some(value))
}

/// Merge an optional overlay onto a base value, then deserialize and validate.
pub fn resolve_config(
    base: toml::Value,
    overlay: Option<toml::Value>,
) -> Result<SiteConfig, ConfigError> {
    let merged = match overlay {
        Some(ov) => merge_toml(base, ov),
        None => base,
    };
    let config: SiteConfig = merged.try_into()?;
    config.validate()?;
    Ok(config)
}

/// Load config for the site rooted at `root`.
pub fn load_config(root: &Path) -> Result<SiteConfig, ConfigError> {
    let base = stock_defaults_value();
    let overlay = load_raw_config(root)?;
    resolve_config(base, overlay)
}

/// Returns a fully-commented stock `site.toml`.
///
/// Used by the `gen-config` CLI command.
pub fn stock_config_toml() -> &'static str {
    r##"# nightbeans site configuration
# =============================
# All settings are optional. Remove or comment out any you don't need.
# Values shown below are the defaults. Unknown keys cause an error.

# ---------------------------------------------------------------------------
# Blog posts: posts/<slug>/index.html -> blog-posts.js
# ---------------------------------------------------------------------------
[posts]
dir = "posts"
output = "blog-posts.js"

# ---------------------------------------------------------------------------
# Reviews: benedict/<slug>/index.html -> benedict-reviews.js
# ---------------------------------------------------------------------------
[reviews]
dir = "benedict"
output = "benedict-reviews.js"

# Which paragraph becomes the summary: "first" or "last".
summary = "first"

# Glyph counted in the .benedict-rating markup.
rating_glyph = "🍳"

# Credited when a review has no "Benedict Fellow: <name>" line.
default_fellow = "Joel Delaney"

# ---------------------------------------------------------------------------
# Book chapters: book/chapter-N-*/index.html -> book-chapters.js
# ---------------------------------------------------------------------------
[chapters]
dir = "book"
output = "book-chapters.js"

# Excerpts longer than this many characters are cut and end in "...".
excerpt_chars = 150

# ---------------------------------------------------------------------------
# Homepage holding the <article class="latest-post"> block
# ---------------------------------------------------------------------------
[homepage]
path = "index.html"

# ---------------------------------------------------------------------------
# Clean-URL migration (nightbeans migrate-urls)
# ---------------------------------------------------------------------------
[migrate]
content_dirs = ["posts", "benedict", "work"]
section_pages = ["blog", "work", "benedict"]
publish_forms = ["publish-blog.html", "publish-eggs.html", "publish-work.html"]
"##
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn default_config_is_valid() {
        SiteConfig::default().validate().unwrap();
    }

    #[test]
    fn default_layout_matches_site() {
        let config = SiteConfig::default();
        assert_eq!(config.posts.dir, "posts");
        assert_eq!(config.reviews.dir, "benedict");
        assert_eq!(config.chapters.dir, "book");
        assert_eq!(config.reviews.summary, ReviewSummary::First);
        assert_eq!(config.reviews.rating_glyph, "🍳");
    }

    #[test]
    fn load_config_without_file_uses_defaults() {
        let tmp = TempDir::new().unwrap();
        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.posts.output, "blog-posts.js");
        assert_eq!(config.chapters.excerpt_chars, 150);
    }

    #[test]
    fn partial_config_overrides_single_key() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            "[reviews]\nsummary = \"last\"\n",
        )
        .unwrap();

        let config = load_config(tmp.path()).unwrap();
        assert_eq!(config.reviews.summary, ReviewSummary::Last);
        // Sibling keys keep their defaults
        assert_eq!(config.reviews.dir, "benedict");
        assert_eq!(config.reviews.default_fellow, "Joel Delaney");
    }

    #[test]
    fn unknown_key_is_rejected() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(CONFIG_FILE), "[posts]\ndirr = \"x\"\n").unwrap();

        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Toml(_))));
    }

    #[test]
    fn unknown_summary_rule_is_rejected() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            "[reviews]\nsummary = \"middle\"\n",
        )
        .unwrap();

        assert!(load_config(tmp.path()).is_err());
    }

    #[test]
    fn zero_excerpt_length_fails_validation() {
        let tmp = TempDir::new().unwrap();
        fs::write(
            tmp.path().join(CONFIG_FILE),
            "[chapters]\nexcerpt_chars = 0\n",
        )
        .unwrap();

        let result = load_config(tmp.path());
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn empty_glyph_fails_validation() {
        let mut config = SiteConfig::default();
        config.reviews.rating_glyph.clear();
        assert!(matches!(
            config.validate(),
            Err(ConfigError::Validation(_))
        ));
    }

    #[test]
    fn merge_toml_keeps_base_keys() {
        let base: toml::Value = toml::from_str("[a]\nx = 1\ny = 2\n").unwrap();
        let overlay: toml::Value = toml::from_str("[a]\ny = 3\n").unwrap();
        let merged = merge_toml(base, overlay);
        assert_eq!(merged["a"]["x"].as_integer(), Some(1));
        assert_eq!(merged["a"]["y"].as_integer(), Some(3));
    }

    #[test]
    fn stock_config_toml_parses_to_defaults() {
        let value: toml::Value = toml::from_str(stock_config_toml()).unwrap();
        let config = resolve_config(stock_defaults_value(), Some(value)).unwrap();
        let defaults = SiteConfig::default();
        assert_eq!(config.posts.dir, defaults.posts.dir);
        assert_eq!(config.reviews.rating_glyph, defaults.reviews.rating_glyph);
        assert_eq!(config.migrate.content_dirs, defaults.migrate.content_dirs);
        assert_eq!(config.migrate.publish_forms, defaults.migrate.publish_forms);
    }
}
