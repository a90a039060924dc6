//! CLI output formatting.
//!
//! # Information-First Display
//!
//! Every entity (gallery, route, page) leads with its semantic identity:
//! positional index and display name. Secondary facts (the fragment it is
//! reached by, tags, description) follow as indented context lines.
//!
//! # Output Format
//!
//! ## Check
//!
//! ```text
//! Portfolio: Jane Doe
//! Hero: Light
//! Galleries
//! 001 alps trip (3 photos)
//!     Link: #gallery/alps-trip
//!     Tags: travel, snow
//!     Two weeks above the clouds
//! 002 drafts (0 photos)
//!     Hidden: no images
//! Contact
//!     Email: jane@example.com
//!     Links: Instagram, Flickr
//! ```
//!
//! ## Route
//!
//! ```text
//! Route: gallery
//!     Param 1: café noir
//! ```
//!
//! ## Render summary
//!
//! ```text
//! Page: gallery
//!     Lightbox: 2 / 3
//!     Images: 3 (1 loaded, 2 pending)
//! ```
//!
//! # Architecture
//!
//! Each report has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout or stderr.
//! Format functions are pure: no I/O, no side effects.

use crate::app::{App, Status};
use crate::content::{ContentDocument, non_empty};
use crate::lazyload::LoadState;
use crate::naming::display_name;
use crate::router::{RouteState, gallery_fragment};

// ============================================================================
// Shared entity display helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Format an entity header: positional index + title, with optional photo
/// count.
///
/// ```text
/// 001 alps trip (3 photos)
/// 001 Home
/// ```
fn entity_header(index: usize, title: &str, count: Option<usize>) -> String {
    match count {
        Some(n) => format!("{} {} ({} photos)", format_index(index), title, n),
        None => format!("{} {}", format_index(index), title),
    }
}

/// Truncate text to `max` characters, appending `...` if truncated.
fn truncate_desc(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        None => text.to_string(),
        Some((cut, _)) => format!("{}...", &text[..cut]),
    }
}

// ============================================================================
// Check
// ============================================================================

/// Summarize a content document: header, hero, galleries and contact.
pub fn format_check(doc: &ContentDocument) -> Vec<String> {
    let mut lines = Vec::new();

    match non_empty(&doc.page_name) {
        Some(name) => lines.push(format!("Portfolio: {name}")),
        None => lines.push("Portfolio: (no page name, header hidden)".to_string()),
    }
    if let Some(hero) = &doc.hero {
        lines.push(format!("Hero: {}", hero.display_title()));
    }

    lines.push("Galleries".to_string());
    if doc.renderable_galleries().next().is_none() {
        lines.push(format!("{}No galleries yet", indent(1)));
    }
    for (i, (name, gallery)) in doc.galleries.iter().enumerate() {
        lines.push(entity_header(
            i + 1,
            &display_name(name),
            Some(gallery.images.len()),
        ));
        if !gallery.is_renderable() {
            lines.push(format!("{}Hidden: no images", indent(1)));
            continue;
        }
        lines.push(format!("{}Link: {}", indent(1), gallery_fragment(name)));
        if let Some(tags) = gallery.tags.as_ref().filter(|t| !t.is_empty()) {
            lines.push(format!("{}Tags: {}", indent(1), tags.join(", ")));
        }
        if let Some(desc) = non_empty(&gallery.description) {
            let truncated = truncate_desc(desc.trim(), 60);
            if !truncated.is_empty() {
                lines.push(format!("{}{}", indent(1), truncated));
            }
        }
    }

    lines.push("Contact".to_string());
    let contact = &doc.contact;
    for (label, value) in [
        ("Email", &contact.email),
        ("Phone", &contact.phone),
        ("Location", &contact.location),
    ] {
        if let Some(value) = non_empty(value) {
            lines.push(format!("{}{label}: {value}", indent(1)));
        }
    }
    if !contact.links.is_empty() {
        let labels: Vec<&str> = contact.links.keys().map(String::as_str).collect();
        lines.push(format!("{}Links: {}", indent(1), labels.join(", ")));
    }

    lines
}

pub fn print_check(doc: &ContentDocument) {
    for line in format_check(doc) {
        println!("{}", line);
    }
}

// ============================================================================
// Route
// ============================================================================

/// Show a parsed route with its decoded parameters.
pub fn format_route(state: &RouteState) -> Vec<String> {
    let mut lines = vec![format!("Route: {}", state.route)];
    for (i, param) in state.params.iter().enumerate() {
        lines.push(format!("{}Param {}: {}", indent(1), i + 1, param));
    }
    lines
}

pub fn print_route(state: &RouteState) {
    for line in format_route(state) {
        println!("{}", line);
    }
}

// ============================================================================
// Render summary
// ============================================================================

/// One-glance state of a rendered app: visible page, lightbox, images.
pub fn format_page_summary(app: &App) -> Vec<String> {
    let page = match app.status() {
        Status::Loading => return vec!["Page: (loading)".to_string()],
        Status::Failed(failure) => {
            return vec![
                "Page: (error)".to_string(),
                format!("{}{}: {}", indent(1), failure.source, failure.detail),
            ];
        }
        Status::Ready => app.active_page(),
    };

    let mut lines = match page {
        Some(page) => vec![format!("Page: {page}")],
        None => vec!["Page: (none)".to_string()],
    };
    if let Some(display) = app.lightbox().display() {
        lines.push(format!("{}Lightbox: {}", indent(1), display.counter));
    }

    let scheduler = app.scheduler();
    let mut counts: Vec<(LoadState, usize)> = Vec::new();
    for state in [
        LoadState::Loaded,
        LoadState::Failed,
        LoadState::Loading,
        LoadState::Pending,
    ] {
        let n = scheduler.iter().filter(|r| r.state == state).count();
        if n > 0 {
            counts.push((state, n));
        }
    }
    let breakdown: Vec<String> = counts
        .iter()
        .map(|(state, n)| format!("{n} {}", state.as_str()))
        .collect();
    if breakdown.is_empty() {
        lines.push(format!("{}Images: 0", indent(1)));
    } else {
        lines.push(format!(
            "{}Images: {} ({})",
            indent(1),
            scheduler.len(),
            breakdown.join(", ")
        ));
    }
    lines
}

/// Written to stderr so stdout stays pure HTML.
pub fn print_page_summary(app: &App) {
    for line in format_page_summary(app) {
        eprintln!("{}", line);
    }
}
