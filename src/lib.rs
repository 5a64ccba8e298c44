//! # Nightbeans
//!
//! Build tooling for a hand-written static blog. Pages are authored as plain
//! HTML, one folder per item; this crate reads them back, derives the
//! listings the site's browser scripts render, and keeps the cross-page
//! navigation in step with the content.
//!
//! # Architecture: Read Pages, Write Data
//!
//! ```text
//! posts/<slug>/index.html     ─┐
//! benedict/<slug>/index.html  ─┼─ extract → collections → *.js data files
//! book/<slug>/index.html      ─┘                       → post navigation
//!                                                      → homepage preview
//! ```
//!
//! The HTML pages are the only source of truth. Nothing is cached between
//! runs, and every pass that edits a page touches only the fragment it owns,
//! writing the file only when that fragment changes.
//!
//! Two one-shot maintenance passes live beside the build: moving the site
//! from flat `.html` files to clean directory URLs, and re-templating old
//! post pages to the arrow navigation layout. Both detect their own earlier
//! work and can be re-run safely.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`extract`] | Streaming metadata extraction from one HTML page |
//! | [`scan`] | Walks a collection root, one item per `<slug>/index.html` |
//! | [`generate`] | Builds, sorts and writes the post, review and chapter data files |
//! | [`update`] | Post prev/next links, Book nav entry, homepage latest post |
//! | [`pipeline`] | The `build` and `check` runs |
//! | [`migrate`] | Flat `.html` → clean URL migration with link rewriting |
//! | [`retemplate`] | Post header arrow navigation |
//! | [`config`] | Optional `site.toml` loading, merging and validation |
//! | [`types`] | Collection records serialized into the data files |
//! | [`naming`] | Slug, URL, chapter number and date display conventions |
//! | [`output`] | CLI output formatting for every command |
//! | [`logging`] | `tracing` subscriber setup |
//!
//! # Design Decisions
//!
//! ## Lenient Tokenizing Over Tree Parsing
//!
//! Pages are hand-written and not always well formed. The extractor walks
//! `quick-xml` events in its most forgiving mode and tracks open elements on
//! its own stack, so a stray end tag or an unclosed `<p>` costs at most one
//! field, never the whole page.
//!
//! ## Fragment Edits Over Re-serialization
//!
//! Updating a page never round-trips it through a DOM. Each pass matches the
//! block it owns (`post-nav`, `latest-post`, `post-header`, `href` values)
//! and splices in new markup rendered with [Maud](https://maud.lambda.xyz/).
//! Authors' formatting everywhere else survives byte for byte.

pub mod config;
pub mod extract;
pub mod generate;
pub mod logging;
pub mod migrate;
pub mod naming;
pub mod output;
pub mod pipeline;
pub mod retemplate;
pub mod scan;
pub mod types;
pub mod update;

#[cfg(test)]
pub(crate) mod test_helpers;
