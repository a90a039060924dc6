//! Full-screen image carousel.
//!
//! One [`Lightbox`] exists per app: it is a shared overlay, not one per
//! gallery. It is a two-state machine:
//!
//! ```text
//!            open(images, i)                 next / prev (wrapping)
//!  Closed ──────────────────▶ Open { images, current } ◀──┐
//!    ▲                          │  │                      │
//!    └──────── close ───────────┘  └──────────────────────┘
//! ```
//!
//! While open, `current` is always a valid index into a non-empty image
//! list. The image, its alt label and the counter are derived from that
//! pair on every read ([`Lightbox::display`]), so they cannot disagree.
//!
//! Opening suspends page scrolling through [`ScrollLock`]; closing restores
//! it. Re-opening while open replaces the images without suspending again,
//! so every suspend is matched by exactly one restore.
//!
//! ## Input
//!
//! | Input | Effect |
//! |-------|--------|
//! | close control, backdrop click, `Escape` | close |
//! | previous control, `ArrowLeft`, drag right | prev |
//! | next control, `ArrowRight`, drag left | next |
//! | click on the image | nothing |
//!
//! Every binding is inert while closed. A drag must exceed the swipe
//! threshold (50 px by default).

use crate::input::Key;
use std::cell::Cell;
use std::rc::Rc;
use tracing::{debug, warn};

/// Minimum horizontal drag distance, in pixels, that counts as a swipe.
pub const DEFAULT_SWIPE_THRESHOLD_PX: f64 = 50.0;

/// Page-level state suspended while the lightbox is open.
pub trait ScrollLock {
    fn suspend(&mut self);
    fn restore(&mut self);
}

/// A lock for hosts without page scrolling.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoScrollLock;

impl ScrollLock for NoScrollLock {
    fn suspend(&mut self) {}
    fn restore(&mut self) {}
}

/// Models `body { overflow: hidden }`. Clones share state so the host can
/// observe the lock after handing one to the lightbox.
#[derive(Debug, Default, Clone)]
pub struct BodyScrollLock {
    locked: Rc<Cell<bool>>,
    suspends: Rc<Cell<usize>>,
    restores: Rc<Cell<usize>>,
}

impl BodyScrollLock {
    pub fn is_locked(&self) -> bool {
        self.locked.get()
    }

    pub fn suspend_count(&self) -> usize {
        self.suspends.get()
    }

    pub fn restore_count(&self) -> usize {
        self.restores.get()
    }
}

impl ScrollLock for BodyScrollLock {
    fn suspend(&mut self) {
        self.locked.set(true);
        self.suspends.set(self.suspends.get() + 1);
    }

    fn restore(&mut self) {
        self.locked.set(false);
        self.restores.set(self.restores.get() + 1);
    }
}

/// Clickable regions of the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    Close,
    Prev,
    Next,
    Backdrop,
    Image,
}

impl ClickTarget {
    /// Map an overlay element id (`lb-close`, `lb-prev`, `lb-next`,
    /// `lb-img`, or the `lightbox` backdrop itself) to its region.
    pub fn from_element_id(id: &str) -> Option<ClickTarget> {
        match id {
            "lb-close" => Some(ClickTarget::Close),
            "lb-prev" => Some(ClickTarget::Prev),
            "lb-next" => Some(ClickTarget::Next),
            "lb-img" => Some(ClickTarget::Image),
            "lightbox" => Some(ClickTarget::Backdrop),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LightboxInput {
    Key(Key),
    Click(ClickTarget),
    PointerDown { x: f64 },
    PointerUp { x: f64 },
}

/// Control holding input focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Close,
}

/// What the overlay shows right now.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightboxDisplay {
    pub src: String,
    /// `"Image K of N"`.
    pub alt: String,
    /// `"K / N"`.
    pub counter: String,
    pub index: usize,
    pub total: usize,
}

#[derive(Debug, Clone, PartialEq)]
enum Phase {
    Closed,
    Open { images: Vec<String>, current: usize },
}

pub struct Lightbox {
    phase: Phase,
    /// The overlay is built on first open and kept afterwards.
    mounted: bool,
    focus: Option<Focus>,
    drag_start: Option<f64>,
    swipe_threshold: f64,
    scroll: Box<dyn ScrollLock>,
}

impl Default for Lightbox {
    fn default() -> Self {
        Self::new(Box::new(NoScrollLock), DEFAULT_SWIPE_THRESHOLD_PX)
    }
}

impl Lightbox {
    pub fn new(scroll: Box<dyn ScrollLock>, swipe_threshold: f64) -> Self {
        Self {
            phase: Phase::Closed,
            mounted: false,
            focus: None,
            drag_start: None,
            swipe_threshold,
            scroll,
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.phase, Phase::Open { .. })
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    pub fn focus(&self) -> Option<Focus> {
        self.focus
    }

    pub fn current_index(&self) -> Option<usize> {
        match &self.phase {
            Phase::Open { current, .. } => Some(*current),
            Phase::Closed => None,
        }
    }

    /// Images being shown; empty while closed.
    pub fn images(&self) -> &[String] {
        match &self.phase {
            Phase::Open { images, .. } => images,
            Phase::Closed => &[],
        }
    }

    /// Show `images` starting at `start`.
    ///
    /// An out-of-range `start` wraps around the image count. Opening with no
    /// images is a caller bug: it asserts in debug builds and is ignored in
    /// release builds.
    pub fn open(&mut self, images: Vec<String>, start: usize) {
        debug_assert!(!images.is_empty(), "lightbox opened with no images");
        if images.is_empty() {
            warn!("ignoring lightbox open with no images");
            return;
        }

        let current = start % images.len();
        if !self.is_open() {
            self.scroll.suspend();
        }
        debug!(total = images.len(), current, "lightbox open");
        self.mounted = true;
        self.phase = Phase::Open { images, current };
        self.focus = Some(Focus::Close);
        self.drag_start = None;
    }

    /// Close the overlay. Closing a closed lightbox does nothing.
    pub fn close(&mut self) {
        if !self.is_open() {
            return;
        }
        self.phase = Phase::Closed;
        self.focus = None;
        self.drag_start = None;
        self.scroll.restore();
        debug!("lightbox closed");
    }

    pub fn next(&mut self) {
        if let Phase::Open { images, current } = &mut self.phase {
            *current = (*current + 1) % images.len();
        }
    }

    pub fn prev(&mut self) {
        if let Phase::Open { images, current } = &mut self.phase {
            *current = (*current + images.len() - 1) % images.len();
        }
    }

    /// Route one input event. Returns whether it was acted on; everything
    /// is ignored while closed.
    pub fn handle(&mut self, input: LightboxInput) -> bool {
        if !self.is_open() {
            return false;
        }
        match input {
            LightboxInput::Key(Key::Escape)
            | LightboxInput::Click(ClickTarget::Close | ClickTarget::Backdrop) => self.close(),
            LightboxInput::Key(Key::ArrowLeft) | LightboxInput::Click(ClickTarget::Prev) => {
                self.prev()
            }
            LightboxInput::Key(Key::ArrowRight) | LightboxInput::Click(ClickTarget::Next) => {
                self.next()
            }
            LightboxInput::Key(_) | LightboxInput::Click(ClickTarget::Image) => return false,
            LightboxInput::PointerDown { x } => {
                self.drag_start = Some(x);
                return false;
            }
            LightboxInput::PointerUp { x } => {
                let Some(start) = self.drag_start.take() else {
                    return false;
                };
                let diff = x - start;
                if diff.abs() <= self.swipe_threshold {
                    return false;
                }
                if diff > 0.0 {
                    self.prev();
                } else {
                    self.next();
                }
            }
        }
        true
    }

    /// Current image, alt label and counter, or `None` while closed.
    pub fn display(&self) -> Option<LightboxDisplay> {
        let Phase::Open { images, current } = &self.phase else {
            return None;
        };
        let (k, n) = (current + 1, images.len());
        Some(LightboxDisplay {
            src: images[*current].clone(),
            alt: format!("Image {k} of {n}"),
            counter: format!("{k} / {n}"),
            index: *current,
            total: n,
        })
    }
}
