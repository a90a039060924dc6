//! # Simple Folio
//!
//! The navigation and view-state engine of a single-page photo portfolio.
//! One JSON content document describes the site; the URL fragment says
//! which part of it is visible.
//!
//! # Architecture: Route Events Drive Views
//!
//! ```text
//! Location ─fragment─▶ Router ─RouteState─▶ App ─render─▶ PageContainer ─▶ View
//!                        ▲                   │                              │
//!                        └──── navigate ─────┴──── activation ◀─────────────┘
//!                                            │
//!                                            ├─▶ ImageLoadScheduler (lazy images)
//!                                            └─▶ Lightbox (full-screen carousel)
//! ```
//!
//! Rendering produces typed view descriptions instead of touching a
//! document tree. Every card, tile and link carries the [`view::Activation`]
//! it triggers, so the whole interaction model can be driven and asserted
//! without a browser. [`html`] turns the same state into markup.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`router`] | Fragment parsing, `Location` abstraction, ordered route notification |
//! | [`content`] | Content document model and `ContentSource` loading |
//! | [`view`] | Typed view descriptions: cards, tiles, links and their activations |
//! | [`render`] | Home, detail and contact renderers over `PageContainer`s |
//! | [`lazyload`] | Deferred image loading: one commit per placeholder |
//! | [`lightbox`] | Open/closed carousel state machine with scroll lock |
//! | [`app`] | Bootstrap, route dispatch, page visibility; `Site` wires it to a router |
//! | [`html`] | Maud materialization of the app state |
//! | [`config`] | Layered `folio.toml` loading and validation |
//! | [`naming`] | Slug display names and element ids |
//! | [`input`] | Keyboard keys shared by views and the lightbox |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Single-Threaded Sharing
//!
//! The engine models one browser tab, so shared state is `Rc`/`RefCell`,
//! never `Arc`/`Mutex`. The router holds no borrow while it runs handlers:
//! a handler may navigate, subscribe or unsubscribe from inside a
//! notification.
//!
//! ## One Notification per Navigation
//!
//! [`router::Router::navigate`] notifies synchronously. A browser also
//! reports the write through a later change event; the router counts its
//! own echoed writes and swallows exactly that many change events, so each
//! navigation is delivered once.
//!
//! ## Invalid Lightbox States Are Unrepresentable
//!
//! The lightbox's image list and index only exist in the open state, and
//! everything it displays is derived from them on read.

pub mod app;
pub mod config;
pub mod content;
pub mod html;
pub mod input;
pub mod lazyload;
pub mod lightbox;
pub mod naming;
pub mod output;
pub mod render;
pub mod router;
pub mod view;

#[cfg(test)]
pub(crate) mod test_helpers;
