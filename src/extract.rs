//! Metadata extraction from hand-authored HTML pages.
//!
//! Every post, review and chapter is a plain HTML file written by hand. The
//! fields the listing pages need are scraped from a single left-to-right
//! pass over the page's tag and text events:
//!
//! | Field | Source |
//! |-------|--------|
//! | `title` | text of the first `<h1>` |
//! | `datetime` | `datetime` attribute of the first `<time>` carrying one |
//! | `paragraphs` | every `<p>` inside an element with class `post-content` |
//! | `rating_text` | text of the first element with class `benedict-rating` |
//! | `fellow_text` | text of the first element with class `benedict-fellow` |
//! | `coordinates` | `setView([lat, lng]` in the page's map script |
//!
//! ## Capture Regions
//!
//! Text is gathered per open element. Each element pushed on the scan stack
//! may own one or more capture regions; text events append to every region
//! currently open, and an end tag pops the stack back to its matching start
//! tag, finalizing everything above it. Because regions nest, an inner
//! classed `<div>` inside `post-content` closes only itself and the
//! surrounding content region keeps collecting paragraphs.
//!
//! ## Leniency
//!
//! Pages are not well-formed XML. Before tokenizing, the bodies of
//! `<script>` and `<style>` are blanked (they are raw text in HTML, and a
//! `<` or quote inside them would otherwise open a bogus tag) and a `<` not
//! followed by a tag name is escaped so prose like `1 < 2` stays text.
//! Entities are resolved one at a time, so a bare `&` stays literal without
//! stopping its neighbours from decoding.
//!
//! The tokenizer runs with end-name checks off, void elements (`<br>`,
//! `<img>`, ...) are never pushed, a new `<p>` implicitly closes an open
//! one, and stray end tags are ignored. If the tokenizer still gives up,
//! extraction returns whatever it collected so far: [`extract`] never
//! fails.

use quick_xml::Reader;
use quick_xml::escape::{resolve_html5_entity, unescape_with};
use quick_xml::events::{BytesStart, BytesText, Event};
use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

static SET_VIEW_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"setView\(\[(-?\d+\.\d+),\s*(-?\d+\.\d+)\]").unwrap());
static SCRIPT_BODY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)(?P<open><script\b[^>]*>).*?(?P<close></script\s*>|\z)").unwrap()
});
static STYLE_BODY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)(?P<open><style\b[^>]*>).*?(?P<close></style\s*>|\z)").unwrap()
});

const CONTENT_CLASS: &str = "post-content";
const RATING_CLASS: &str = "benedict-rating";
const FELLOW_CLASS: &str = "benedict-fellow";

/// Elements that never have an end tag in HTML.
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source",
    "track", "wbr",
];

/// Map centre from a page's Leaflet `setView` call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub lat: f64,
    pub lng: f64,
}

/// Fields scraped from one page. Each is absent when its markup is missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    pub title: Option<String>,
    /// Raw `datetime` attribute, possibly with a time part (`2024-03-05 19:30`)
    pub datetime: Option<String>,
    /// Non-empty content paragraphs in document order
    pub paragraphs: Vec<String>,
    pub rating_text: Option<String>,
    pub fellow_text: Option<String>,
    pub coordinates: Option<Coordinates>,
}

impl Metadata {
    /// The date part of `datetime`: everything before the first space.
    pub fn date(&self) -> Option<&str> {
        self.datetime
            .as_deref()
            .map(|dt| dt.split(' ').next().unwrap_or(dt))
    }
}

/// Extract metadata from a page's markup.
pub fn extract(markup: &str) -> Metadata {
    let prepared = prepare_markup(markup);
    let mut reader = Reader::from_str(&prepared);
    let config = reader.config_mut();
    config.check_end_names = false;
    config.allow_unmatched_ends = true;
    config.check_comments = false;

    let mut scanner = Scanner::default();
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => scanner.open(&e),
            Ok(Event::Empty(e)) => {
                scanner.open(&e);
                scanner.close(&tag_name(e.name().as_ref()));
            }
            Ok(Event::End(e)) => scanner.close(&tag_name(e.name().as_ref())),
            Ok(Event::Text(t)) => scanner.text(&decode_text(&t)),
            Ok(Event::CData(t)) => scanner.text(&String::from_utf8_lossy(&t)),
            Ok(Event::Eof) => break,
            Err(err) => {
                tracing::debug!(
                    %err,
                    position = reader.buffer_position(),
                    "markup scan stopped early"
                );
                break;
            }
            _ => {}
        }
    }

    let mut meta = scanner.finish();
    meta.coordinates = find_coordinates(markup);
    meta
}

/// Find the map centre in a page's inline script.
pub fn find_coordinates(markup: &str) -> Option<Coordinates> {
    let caps = SET_VIEW_RE.captures(markup)?;
    Some(Coordinates {
        lat: caps[1].parse().ok()?,
        lng: caps[2].parse().ok()?,
    })
}

fn tag_name(raw: &[u8]) -> String {
    String::from_utf8_lossy(raw).to_ascii_lowercase()
}

fn decode_text(text: &BytesText<'_>) -> String {
    decode_entities(&String::from_utf8_lossy(text)).into_owned()
}

/// Blank raw-text element bodies and escape stray `<` so the tokenizer sees
/// only real tags.
fn prepare_markup(markup: &str) -> String {
    let without_scripts = SCRIPT_BODY_RE.replace_all(markup, "${open}${close}");
    let without_styles = STYLE_BODY_RE.replace_all(&without_scripts, "${open}${close}");
    escape_stray_lt(&without_styles).into_owned()
}

/// Escape every `<` that can't start a tag, comment or declaration.
fn escape_stray_lt(markup: &str) -> Cow<'_, str> {
    let is_stray = |i: usize| {
        !matches!(
            markup[i + 1..].chars().next(),
            Some(c) if c.is_ascii_alphabetic() || matches!(c, '/' | '!' | '?')
        )
    };
    if !markup.match_indices('<').any(|(i, _)| is_stray(i)) {
        return Cow::Borrowed(markup);
    }

    let mut out = String::with_capacity(markup.len() + 16);
    let mut last = 0;
    for (i, _) in markup.match_indices('<') {
        if is_stray(i) {
            out.push_str(&markup[last..i]);
            out.push_str("&lt;");
            last = i + 1;
        }
    }
    out.push_str(&markup[last..]);
    Cow::Owned(out)
}

/// Resolve character references one at a time. A `&` that doesn't start a
/// known reference is kept literally.
fn decode_entities(raw: &str) -> Cow<'_, str> {
    if !raw.contains('&') {
        return Cow::Borrowed(raw);
    }

    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        let end = tail[1..]
            .find(|c: char| c == ';' || c == '&' || c == '<' || c.is_whitespace())
            .map(|i| i + 1);
        match end {
            Some(end) if tail.as_bytes()[end] == b';' => {
                let reference = &tail[..=end];
                match unescape_with(reference, resolve_html5_entity) {
                    Ok(decoded) => out.push_str(&decoded),
                    Err(_) => out.push_str(reference),
                }
                rest = &tail[end + 1..];
            }
            _ => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

// ============================================================================
// Scan state
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Title,
    Paragraph,
    Rating,
    Fellow,
}

#[derive(Debug)]
struct Capture {
    field: Field,
    text: String,
}

#[derive(Debug)]
struct OpenElement {
    tag: String,
    content_region: bool,
    captures: Vec<Capture>,
}

#[derive(Debug, Default)]
struct Scanner {
    meta: Metadata,
    stack: Vec<OpenElement>,
}

impl Scanner {
    fn open(&mut self, start: &BytesStart<'_>) {
        let tag = tag_name(start.name().as_ref());
        let mut class = String::new();
        let mut datetime = None;
        for attr in start.html_attributes().filter_map(Result::ok) {
            let value = decode_entities(&String::from_utf8_lossy(&attr.value)).into_owned();
            match attr.key.as_ref() {
                b"class" => class = value,
                b"datetime" => datetime = Some(value),
                _ => {}
            }
        }

        if tag == "p" && self.stack.iter().any(|e| e.tag == "p") {
            self.close("p");
        }
        if tag == "time" && self.meta.datetime.is_none() {
            self.meta.datetime = datetime;
        }
        if VOID_ELEMENTS.contains(&tag.as_str()) {
            return;
        }

        let has_class = |name: &str| class.split_whitespace().any(|c| c == name);
        let mut fields = Vec::new();
        if tag == "h1" && self.meta.title.is_none() && !self.is_capturing(Field::Title) {
            fields.push(Field::Title);
        }
        if has_class(RATING_CLASS)
            && self.meta.rating_text.is_none()
            && !self.is_capturing(Field::Rating)
        {
            fields.push(Field::Rating);
        }
        if has_class(FELLOW_CLASS)
            && self.meta.fellow_text.is_none()
            && !self.is_capturing(Field::Fellow)
        {
            fields.push(Field::Fellow);
        }
        if tag == "p" && self.in_content() {
            fields.push(Field::Paragraph);
        }

        let content_region = has_class(CONTENT_CLASS);
        self.stack.push(OpenElement {
            tag,
            content_region,
            captures: fields
                .into_iter()
                .map(|field| Capture {
                    field,
                    text: String::new(),
                })
                .collect(),
        });
    }

    /// Pop back to the innermost open `tag`. Stray end tags are ignored.
    fn close(&mut self, tag: &str) {
        let Some(pos) = self.stack.iter().rposition(|e| e.tag == tag) else {
            return;
        };
        let closed: Vec<OpenElement> = self.stack.drain(pos..).collect();
        for element in closed.into_iter().rev() {
            self.finalize(element);
        }
    }

    fn text(&mut self, text: &str) {
        for element in &mut self.stack {
            for capture in &mut element.captures {
                capture.text.push_str(text);
            }
        }
    }

    fn finish(mut self) -> Metadata {
        while let Some(element) = self.stack.pop() {
            self.finalize(element);
        }
        self.meta
    }

    fn finalize(&mut self, element: OpenElement) {
        for capture in element.captures {
            let text = capture.text.trim();
            match capture.field {
                Field::Title => {
                    self.meta.title.get_or_insert_with(|| text.to_string());
                }
                Field::Paragraph => {
                    if !text.is_empty() {
                        self.meta.paragraphs.push(text.to_string());
                    }
                }
                Field::Rating => {
                    self.meta.rating_text.get_or_insert_with(|| text.to_string());
                }
                Field::Fellow => {
                    self.meta.fellow_text.get_or_insert_with(|| text.to_string());
                }
            }
        }
    }

    fn is_capturing(&self, field: Field) -> bool {
        self.stack
            .iter()
            .any(|e| e.captures.iter().any(|c| c.field == field))
    }

    fn in_content(&self) -> bool {
        self.stack.iter().any(|e| e.content_region)
    }
}
