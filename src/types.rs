//! Collection records shared by the generators and the updaters.
//!
//! These types are serialized into the generated data files read by the
//! browser-side page scripts. Field names (camelCase) and field order are
//! part of that contract and must not change without updating the pages.

use serde::{Serialize, Serializer};

/// A blog post, one per `posts/<slug>/index.html`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(skip)]
    pub slug: String,
    pub title: String,
    /// Canonical clean URL, `/posts/<slug>/`
    pub url: String,
    /// ISO `YYYY-MM-DD`, empty when the page has no `<time datetime>`
    pub date: String,
    /// `March 05 2024`, or `date` verbatim when it doesn't parse
    pub date_display: String,
    /// First content paragraph
    pub excerpt: String,
}

/// A restaurant review, one per `benedict/<slug>/index.html`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(skip)]
    pub slug: String,
    pub title: String,
    pub date: String,
    pub date_display: String,
    /// Number of rating glyphs in the `.benedict-rating` markup
    pub rating: usize,
    /// Always the bare rating glyph; the page repeats it `rating` times
    pub rating_display: String,
    pub summary: String,
    pub url: String,
    #[serde(serialize_with = "whole_as_integer")]
    pub lat: f64,
    #[serde(serialize_with = "whole_as_integer")]
    pub lng: f64,
    /// Credited reviewer
    pub fellow: String,
}

/// A book chapter, one per `book/<slug>/index.html`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    #[serde(skip)]
    pub slug: String,
    pub title: String,
    pub chapter_number: u32,
    pub url: String,
    pub excerpt: String,
}

/// Write whole coordinates (the `0` used for a page without a map) as
/// integers.
fn whole_as_integer<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    let v = *value;
    if v.fract() == 0.0 && v.abs() < i64::MAX as f64 {
        serializer.serialize_i64(v as i64)
    } else {
        serializer.serialize_f64(v)
    }
}

/// Previous/next link target for a post's in-page navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavigationLink {
    pub slug: String,
    pub title: String,
}

impl From<&Post> for NavigationLink {
    fn from(post: &Post) -> Self {
        Self {
            slug: post.slug.clone(),
            title: post.title.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(lat: f64, lng: f64) -> Review {
        Review {
            slug: "tamper".into(),
            title: "Tamper".into(),
            date: "2024-03-30".into(),
            date_display: "March 30 2024".into(),
            rating: 3,
            rating_display: "🍳".into(),
            summary: String::new(),
            url: "/benedict/tamper/".into(),
            lat,
            lng,
            fellow: "Sam Hart".into(),
        }
    }

    // =========================================================================
    // Review coordinates
    // =========================================================================

    #[test]
    fn missing_map_serializes_integer_zero() {
        let json = serde_json::to_value(review(0.0, 0.0)).unwrap();
        assert_eq!(json["lat"], serde_json::json!(0));
        assert_eq!(json["lng"], serde_json::json!(0));
        assert!(json["lat"].is_i64());
        let text = serde_json::to_string(&review(0.0, 0.0)).unwrap();
        assert!(text.contains("\"lat\":0,\"lng\":0,"));
    }

    #[test]
    fn fractional_coordinates_stay_floats() {
        let json = serde_json::to_value(review(53.3811, -1.4701)).unwrap();
        assert_eq!(json["lat"], serde_json::json!(53.3811));
        assert_eq!(json["lng"], serde_json::json!(-1.4701));
    }

    #[test]
    fn whole_nonzero_coordinates_are_integers() {
        let json = serde_json::to_value(review(51.0, -2.0)).unwrap();
        assert!(json["lat"].is_i64());
        assert_eq!(json["lng"], serde_json::json!(-2));
    }

    #[test]
    fn slug_not_serialized() {
        let json = serde_json::to_value(review(0.0, 0.0)).unwrap();
        assert!(json.get("slug").is_none());
        assert_eq!(json["dateDisplay"], "March 30 2024");
    }
}
