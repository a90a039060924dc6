//! Hash-based client-side router.
//!
//! The URL fragment is the only persistent navigation state. The router
//! parses it into a [`RouteState`] and notifies subscribers whenever it
//! changes. It owns no view logic; dispatching a route to a page is the
//! subscriber's job.
//!
//! ## Canonical Fragments
//!
//! ```text
//! #home                  → Home, []
//! #gallery/alps-trip     → Gallery, ["alps-trip"]
//! #gallery/caf%C3%A9     → Gallery, ["café"]
//! #contact               → Contact, []
//! #/gallery/x            → Gallery, ["x"]      (leading slash tolerated)
//! (empty)                → Home, []
//! #typo                  → Other("typo"), []   (consumer decides)
//! ```
//!
//! ## Delivery Guarantees
//!
//! - Subscribers run synchronously, in registration order.
//! - Every [`Router::navigate`] produces exactly one notification cycle.
//!   The router emits immediately after writing the fragment; when the host
//!   reports that the write will also surface as a change event, that echo
//!   is swallowed by [`Router::on_fragment_changed`].
//! - No internal borrow is held while subscribers run, so a subscriber may
//!   navigate, subscribe or unsubscribe.

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, utf8_percent_encode};
use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use tracing::debug;

/// Characters `encodeURIComponent` leaves untouched.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Top-level route selected by the first fragment segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Gallery,
    Contact,
    /// Any other name, passed through unchanged.
    Other(String),
}

impl Route {
    pub fn from_name(name: &str) -> Self {
        match name {
            "" | "home" => Route::Home,
            "gallery" => Route::Gallery,
            "contact" => Route::Contact,
            other => Route::Other(other.to_string()),
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Route::Home => "home",
            Route::Gallery => "gallery",
            Route::Contact => "contact",
            Route::Other(name) => name,
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parsed fragment. Recomputed on every navigation event, never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteState {
    pub route: Route,
    pub params: Vec<String>,
}

impl RouteState {
    pub fn home() -> Self {
        Self {
            route: Route::Home,
            params: Vec::new(),
        }
    }

    /// First positional parameter, if any.
    pub fn param(&self, index: usize) -> Option<&str> {
        self.params.get(index).map(String::as_str)
    }
}

/// Parse a fragment (with or without its leading `#`).
///
/// Never fails: malformed percent-escapes leave the segment raw.
pub fn parse(fragment: &str) -> RouteState {
    let rest = fragment.strip_prefix('#').unwrap_or(fragment);
    let rest = rest.strip_prefix('/').unwrap_or(rest);
    if rest.is_empty() {
        return RouteState::home();
    }

    let mut parts = rest.split('/');
    let route = Route::from_name(parts.next().unwrap_or_default());
    let params = parts.map(decode_segment).collect();
    RouteState { route, params }
}

/// Percent-decode one segment, falling back to the raw text when the
/// escapes are malformed or decode to invalid UTF-8.
pub fn decode_segment(segment: &str) -> String {
    if has_malformed_escape(segment) {
        return segment.to_string();
    }
    match percent_decode_str(segment).decode_utf8() {
        Ok(decoded) => decoded.into_owned(),
        Err(_) => segment.to_string(),
    }
}

fn has_malformed_escape(segment: &str) -> bool {
    let bytes = segment.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let valid = bytes.get(i + 1).is_some_and(u8::is_ascii_hexdigit)
                && bytes.get(i + 2).is_some_and(u8::is_ascii_hexdigit);
            if !valid {
                return true;
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    false
}

/// Percent-encode a path component the way `encodeURIComponent` does.
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}

/// Canonical fragment for a gallery detail view.
pub fn gallery_fragment(name: &str) -> String {
    format!("#gallery/{}", encode_component(name))
}

/// Ensure a fragment starts with `#`.
pub fn normalize_fragment(fragment: &str) -> String {
    if fragment.starts_with('#') {
        fragment.to_string()
    } else {
        format!("#{fragment}")
    }
}

/// Outcome of writing the fragment to the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentWrite {
    /// The host will report this write through a later change event.
    Echoed,
    /// No change event will follow (unchanged fragment, in-process host).
    Silent,
}

/// The host's navigation primitive: the URL fragment.
pub trait Location {
    /// Current fragment including its `#`, or empty when there is none.
    fn fragment(&self) -> String;
    fn set_fragment(&mut self, fragment: &str) -> FragmentWrite;
}

#[derive(Debug)]
struct MemoryHistory {
    entries: Vec<String>,
    cursor: usize,
    echo: bool,
    pending: usize,
}

/// In-process [`Location`] with browser-like history.
///
/// Clones share the same history, so a host (or test) can keep a handle
/// after giving one to the router. In echo mode every changing write is
/// queued as a pending change event, the way a browser fires
/// `hashchange`; the host drains them with [`MemoryLocation::take_pending`].
#[derive(Debug, Clone)]
pub struct MemoryLocation {
    inner: Rc<RefCell<MemoryHistory>>,
}

impl MemoryLocation {
    pub fn new(initial: &str) -> Self {
        Self {
            inner: Rc::new(RefCell::new(MemoryHistory {
                entries: vec![initial.to_string()],
                cursor: 0,
                echo: false,
                pending: 0,
            })),
        }
    }

    /// A location whose writes are reported back as change events.
    pub fn with_echo(initial: &str) -> Self {
        let location = Self::new(initial);
        location.inner.borrow_mut().echo = true;
        location
    }

    /// Simulate the user editing the address bar. Returns whether the
    /// fragment changed; the host must then call
    /// [`Router::on_fragment_changed`].
    pub fn edit(&self, fragment: &str) -> bool {
        let mut history = self.inner.borrow_mut();
        if history.entries[history.cursor] == fragment {
            return false;
        }
        history.push(fragment);
        true
    }

    /// Browser back. Returns whether the fragment changed.
    pub fn back(&self) -> bool {
        let mut history = self.inner.borrow_mut();
        if history.cursor == 0 {
            return false;
        }
        history.cursor -= 1;
        true
    }

    /// Browser forward. Returns whether the fragment changed.
    pub fn forward(&self) -> bool {
        let mut history = self.inner.borrow_mut();
        if history.cursor + 1 >= history.entries.len() {
            return false;
        }
        history.cursor += 1;
        true
    }

    /// Number of queued change events, resetting the queue.
    pub fn take_pending(&self) -> usize {
        std::mem::take(&mut self.inner.borrow_mut().pending)
    }

    pub fn history_len(&self) -> usize {
        self.inner.borrow().entries.len()
    }
}

impl MemoryHistory {
    fn push(&mut self, fragment: &str) {
        self.entries.truncate(self.cursor + 1);
        self.entries.push(fragment.to_string());
        self.cursor = self.entries.len() - 1;
    }
}

impl Location for MemoryLocation {
    fn fragment(&self) -> String {
        let history = self.inner.borrow();
        history.entries[history.cursor].clone()
    }

    fn set_fragment(&mut self, fragment: &str) -> FragmentWrite {
        let mut history = self.inner.borrow_mut();
        if history.entries[history.cursor] == fragment {
            return FragmentWrite::Silent;
        }
        history.push(fragment);
        if history.echo {
            history.pending += 1;
            FragmentWrite::Echoed
        } else {
            FragmentWrite::Silent
        }
    }
}

pub type RouteHandler = Rc<dyn Fn(&RouteState)>;

/// Handle returned by [`Router::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// The single navigation authority.
pub struct Router {
    location: RefCell<Box<dyn Location>>,
    handlers: RefCell<Vec<(SubscriptionId, RouteHandler)>>,
    next_id: Cell<u64>,
    pending_echoes: Cell<usize>,
}

impl Router {
    pub fn new(location: impl Location + 'static) -> Self {
        Self {
            location: RefCell::new(Box::new(location)),
            handlers: RefCell::new(Vec::new()),
            next_id: Cell::new(0),
            pending_echoes: Cell::new(0),
        }
    }

    /// Register a handler, called with every route change from now on.
    pub fn subscribe(&self, handler: impl Fn(&RouteState) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.handlers.borrow_mut().push((id, Rc::new(handler)));
        id
    }

    /// Remove a handler. Returns false if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut handlers = self.handlers.borrow_mut();
        let before = handlers.len();
        handlers.retain(|(hid, _)| *hid != id);
        handlers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.handlers.borrow().len()
    }

    /// Current fragment as the host reports it.
    pub fn fragment(&self) -> String {
        self.location.borrow().fragment()
    }

    /// Parse the current fragment without side effects.
    pub fn parse_current(&self) -> RouteState {
        parse(&self.fragment())
    }

    /// Write `fragment` to the location and deliver exactly one
    /// notification cycle for it.
    pub fn navigate(&self, fragment: &str) {
        let fragment = normalize_fragment(fragment);
        let write = self.location.borrow_mut().set_fragment(&fragment);
        if write == FragmentWrite::Echoed {
            self.pending_echoes.set(self.pending_echoes.get() + 1);
        }
        debug!(%fragment, ?write, "navigate");
        self.emit_current();
    }

    /// Host change event: hash edited, back/forward, or the echo of a
    /// previous [`Router::navigate`].
    ///
    /// Host change events arrive in write order, so the first N events after
    /// N echoed writes are those echoes.
    pub fn on_fragment_changed(&self) {
        let pending = self.pending_echoes.get();
        if pending > 0 {
            self.pending_echoes.set(pending - 1);
            debug!(remaining = pending - 1, "swallowed navigate echo");
            return;
        }
        self.emit_current();
    }

    /// Deliver one notification cycle for the current fragment.
    pub fn emit_current(&self) {
        let state = self.parse_current();
        let handlers: Vec<RouteHandler> = self
            .handlers
            .borrow()
            .iter()
            .map(|(_, h)| Rc::clone(h))
            .collect();
        debug!(route = %state.route, params = ?state.params, subscribers = handlers.len(), "emit");
        for handler in handlers {
            handler(&state);
        }
    }
}
