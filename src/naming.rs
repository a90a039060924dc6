//! Display names and element ids derived from gallery slugs.
//!
//! Galleries are identified by the key they carry in the content document
//! (`alps-trip`, `street-2024`). Everything the user sees or activates is
//! derived from that key through this module so every view agrees on it.
//!
//! ## Display Names
//!
//! Dashes in a slug are converted to spaces for display. Nothing else is
//! touched: case, digits and other punctuation are preserved.
//! - `alps-trip` → "alps trip"
//! - `Street-2024` → "Street 2024"
//! - `portraits` → "portraits"

/// Separator used in gallery slugs.
pub const SLUG_SEPARATOR: char = '-';

/// Display name for a gallery slug: separators become spaces.
///
/// - `"alps-trip"` → `"alps trip"`
/// - `"a--b"` → `"a  b"` (runs are not collapsed)
/// - `""` → `""`
pub fn display_name(slug: &str) -> String {
    slug.replace(SLUG_SEPARATOR, " ")
}

/// Element id of the home-view card for a gallery.
pub fn card_id(slug: &str) -> String {
    format!("gallery-card-{slug}")
}

/// Element id of the detail-view tile at a 0-based image index.
pub fn tile_id(index: usize) -> String {
    format!("image-item-{index}")
}
