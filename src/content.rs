//! The content document: everything the site displays, loaded once.
//!
//! The document is a single JSON object fetched from a well-known path
//! (`content.json` by default):
//!
//! ```json
//! {
//!   "pageName": "Jane Doe Photography",
//!   "hero": { "title": "Light & Stone", "ctaText": "Get in touch" },
//!   "galleries": {
//!     "alps-trip": { "images": ["a.jpg", "b.jpg"], "tags": ["travel"] }
//!   },
//!   "contact": { "email": "jane@example.com" }
//! }
//! ```
//!
//! Gallery order is document order. The engine never mutates the document
//! after loading; views only read slices of it.
//!
//! ## Loading
//!
//! Fetching goes through [`ContentSource`] so hosts decide where bytes come
//! from. A load is attempted exactly once. Any failure (missing file,
//! non-success status, malformed JSON) is a [`ContentError`] that the app
//! turns into a blocking error state; there is no retry.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ContentError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("HTTP {0}")]
    Status(u16),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Root of the content document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ContentDocument {
    /// Site name shown in the header. Absent → header hidden.
    pub page_name: Option<String>,
    /// Home-page hero block.
    pub hero: Option<Hero>,
    /// Galleries keyed by slug, in document order.
    pub galleries: IndexMap<String, Gallery>,
    /// Contact page details.
    pub contact: ContactInfo,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Hero {
    pub title: Option<String>,
    pub subtitle: Option<String>,
    pub cta_text: Option<String>,
    pub background_image: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Gallery {
    /// Image URLs in display order. Galleries without images are not rendered.
    pub images: Vec<String>,
    pub tags: Option<Vec<String>>,
    pub description: Option<String>,
}

/// Contact page details. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContactInfo {
    pub heading: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub location: Option<String>,
    pub message: Option<String>,
    /// External links, label → URL, in document order.
    pub links: IndexMap<String, String>,
}

impl ContentDocument {
    /// Parse a content document from JSON text.
    pub fn from_json(json: &str) -> Result<Self, ContentError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Look up a gallery by slug.
    pub fn gallery(&self, name: &str) -> Option<&Gallery> {
        self.galleries.get(name)
    }

    /// Galleries that have at least one image, in document order.
    pub fn renderable_galleries(&self) -> impl Iterator<Item = (&str, &Gallery)> {
        self.galleries
            .iter()
            .filter(|(_, g)| g.is_renderable())
            .map(|(name, g)| (name.as_str(), g))
    }
}

impl Gallery {
    pub fn is_renderable(&self) -> bool {
        !self.images.is_empty()
    }

    /// First image, used as the home-card thumbnail.
    pub fn cover(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }
}

/// Title shown when the hero has none.
pub const DEFAULT_HERO_TITLE: &str = "Portfolio";

impl Hero {
    pub fn display_title(&self) -> &str {
        non_empty(&self.title).unwrap_or(DEFAULT_HERO_TITLE)
    }
}

/// `Some(s)` only for present, non-empty strings.
pub fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|s| !s.is_empty())
}

/// Where the content document comes from.
///
/// Implementations perform a single fetch attempt and report failure as
/// [`ContentError`]; callers never retry.
pub trait ContentSource {
    fn fetch(&self) -> Result<String, ContentError>;

    /// Human-readable origin, shown when loading fails. `None` leaves the
    /// configured content path in place.
    fn describe(&self) -> Option<String> {
        None
    }
}

/// Reads the document from a file on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ContentSource for FileSource {
    fn fetch(&self) -> Result<String, ContentError> {
        Ok(fs::read_to_string(&self.path)?)
    }

    fn describe(&self) -> Option<String> {
        Some(self.path.display().to_string())
    }
}

/// An in-memory response with an HTTP-like status code.
#[derive(Debug, Clone)]
pub struct StaticSource {
    status: u16,
    body: String,
}

impl StaticSource {
    pub fn ok(body: impl Into<String>) -> Self {
        Self::with_status(200, body)
    }

    pub fn with_status(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

impl ContentSource for StaticSource {
    fn fetch(&self) -> Result<String, ContentError> {
        if !(200..300).contains(&self.status) {
            return Err(ContentError::Status(self.status));
        }
        Ok(self.body.clone())
    }
}

/// Fetch and parse the document in one attempt.
pub fn load(source: &dyn ContentSource) -> Result<ContentDocument, ContentError> {
    let body = source.fetch()?;
    ContentDocument::from_json(&body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn file_source_describes_its_path() {
        let source = FileSource::new("site/data.json");
        assert_eq!(source.describe().as_deref(), Some("site/data.json"));
        assert_eq!(StaticSource::ok("{}").describe(), None);
    }

    #[test]
    fn parses_camel_case_keys() {
        let doc = ContentDocument::from_json(
            r#"{
                "pageName": "Jane",
                "hero": { "title": "T", "ctaText": "Go", "backgroundImage": "bg.jpg" },
                "galleries": {}
            }"#,
        )
        .unwrap();
        assert_eq!(doc.page_name.as_deref(), Some("Jane"));
        let hero = doc.hero.unwrap();
        assert_eq!(hero.cta_text.as_deref(), Some("Go"));
        assert_eq!(hero.background_image.as_deref(), Some("bg.jpg"));
    }

    #[test]
    fn gallery_order_follows_document() {
        let doc = ContentDocument::from_json(
            r#"{ "galleries": {
                "zebra": { "images": ["z.jpg"] },
                "alpha": { "images": ["a.jpg"] },
                "mid": { "images": ["m.jpg"] }
            } }"#,
        )
        .unwrap();
        let names: Vec<&str> = doc.galleries.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["zebra", "alpha", "mid"]);
    }

    #[test]
    fn missing_sections_default() {
        let doc = ContentDocument::from_json("{}").unwrap();
        assert!(doc.page_name.is_none());
        assert!(doc.hero.is_none());
        assert!(doc.galleries.is_empty());
        assert_eq!(doc.contact, ContactInfo::default());
    }

    #[test]
    fn gallery_without_images_is_not_renderable() {
        let doc = ContentDocument::from_json(
            r#"{ "galleries": {
                "empty": { "description": "nothing yet" },
                "full": { "images": ["1.jpg"] }
            } }"#,
        )
        .unwrap();
        let names: Vec<&str> = doc.renderable_galleries().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["full"]);
        assert!(doc.gallery("empty").is_some());
    }

    #[test]
    fn cover_is_first_image() {
        let g = Gallery {
            images: vec!["1.jpg".into(), "2.jpg".into()],
            ..Default::default()
        };
        assert_eq!(g.cover(), Some("1.jpg"));
        assert_eq!(Gallery::default().cover(), None);
    }

    #[test]
    fn hero_title_defaults_when_missing_or_empty() {
        assert_eq!(Hero::default().display_title(), "Portfolio");
        let hero = Hero {
            title: Some(String::new()),
            ..Default::default()
        };
        assert_eq!(hero.display_title(), "Portfolio");
        let hero = Hero {
            title: Some("Light".into()),
            ..Default::default()
        };
        assert_eq!(hero.display_title(), "Light");
    }

    #[test]
    fn malformed_json_is_error() {
        let result = ContentDocument::from_json("{ not json");
        assert!(matches!(result, Err(ContentError::Json(_))));
    }

    #[test]
    fn static_source_non_success_status_is_error() {
        let result = load(&StaticSource::with_status(404, "{}"));
        assert!(matches!(result, Err(ContentError::Status(404))));
    }

    #[test]
    fn static_source_ok() {
        let doc = load(&StaticSource::ok(r#"{ "pageName": "x" }"#)).unwrap();
        assert_eq!(doc.page_name.as_deref(), Some("x"));
    }

    #[test]
    fn file_source_missing_file_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let result = load(&FileSource::new(tmp.path().join("content.json")));
        assert!(matches!(result, Err(ContentError::Io(_))));
    }

    #[test]
    fn file_source_reads_document() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("content.json");
        fs::write(&path, r#"{ "galleries": { "a": { "images": ["x.jpg"] } } }"#).unwrap();
        let doc = load(&FileSource::new(&path)).unwrap();
        assert_eq!(doc.galleries.len(), 1);
    }
}
