//! Shared test utilities for the simple-folio test suite.
//!
//! Provides content-document fixtures and lookup helpers that work with
//! rendered view descriptions (`HomeView`, `GalleryCard`).
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let doc = alps_document();
//! let mut scheduler = ImageLoadScheduler::default();
//! let mut home = PageContainer::new(Page::Home);
//! render_home(&mut home, &doc, &mut scheduler);
//!
//! let Some(View::Home(view)) = home.view() else { panic!() };
//! let card = find_card(view, "alps-trip");
//! assert_eq!(card.display_name, "alps trip");
//! ```

use crate::content::{ContentDocument, Gallery};
use crate::view::{GalleryCard, HomeView};

// =========================================================================
// Fixtures
// =========================================================================

/// JSON for one gallery, `alps-trip`, with three images and no hero.
pub const ALPS_JSON: &str = r#"{
    "galleries": {
        "alps-trip": { "images": ["alps/1.jpg", "alps/2.jpg", "alps/3.jpg"] }
    }
}"#;

pub fn alps_document() -> ContentDocument {
    ContentDocument::from_json(ALPS_JSON).unwrap()
}

/// A document with the given `(slug, images)` galleries, in order.
///
/// ```rust
/// let doc = document_with_galleries(&[("empty", &[]), ("full", &["f.jpg"])]);
/// ```
pub fn document_with_galleries(galleries: &[(&str, &[&str])]) -> ContentDocument {
    let mut doc = ContentDocument::default();
    for (name, images) in galleries {
        doc.galleries.insert(
            name.to_string(),
            Gallery {
                images: images.iter().map(|s| s.to_string()).collect(),
                ..Default::default()
            },
        );
    }
    doc
}

// =========================================================================
// View lookups: panic with a clear message on miss
// =========================================================================

/// Find a home card by gallery slug. Panics if not found.
pub fn find_card<'a>(home: &'a HomeView, name: &str) -> &'a GalleryCard {
    home.cards()
        .iter()
        .find(|c| c.name == name)
        .unwrap_or_else(|| {
            let names: Vec<&str> = home.cards().iter().map(|c| c.name.as_str()).collect();
            panic!("card '{name}' not found. Available: {names:?}")
        })
}

/// All card display names in grid order.
pub fn card_titles(home: &HomeView) -> Vec<&str> {
    home.cards().iter().map(|c| c.display_name.as_str()).collect()
}
