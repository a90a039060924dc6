//! Deferred image loading.
//!
//! Views never set an image's source directly. They register a placeholder
//! with the [`ImageLoadScheduler`], which commits the real source only once
//! the placeholder comes within a margin of the viewport (200 px by
//! default). Each placeholder moves through:
//!
//! ```text
//! Pending ──(near viewport)──▶ Loading ──(load ok)────▶ Loaded
//!                                      └─(load error)─▶ Failed
//! ```
//!
//! A commit happens at most once per placeholder; after it the placeholder
//! is no longer observed. Failed loads are not retried. Both terminal states
//! count as "loaded" so the placeholder never stays visually pending.
//!
//! Geometry comes from the host, either by polling ([`ImageLoadScheduler::scan`])
//! or as intersection batches ([`ImageLoadScheduler::on_intersections`]).
//! Placeholders are independent: batches carry no ordering between them.

use indexmap::IndexMap;
use tracing::{debug, warn};

/// Default proximity margin around the viewport, in pixels.
pub const DEFAULT_ROOT_MARGIN_PX: f64 = 200.0;

/// Alt text substituted when an image fails to load.
pub const FALLBACK_ALT: &str = "Image could not be loaded";

/// Identity of a registered placeholder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageId(u64);

impl ImageId {
    pub fn value(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    /// Observed, source not yet committed.
    Pending,
    /// Source committed, waiting for the load result.
    Loading,
    Loaded,
    /// Load failed; shows [`FALLBACK_ALT`].
    Failed,
}

impl LoadState {
    /// Whether the placeholder reached a terminal state.
    pub fn is_loaded(self) -> bool {
        matches!(self, LoadState::Loaded | LoadState::Failed)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LoadState::Pending => "pending",
            LoadState::Loading => "loading",
            LoadState::Loaded => "loaded",
            LoadState::Failed => "failed",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct LazyImageRecord {
    pub target_src: String,
    pub alt: String,
    pub state: LoadState,
}

/// Axis-aligned box in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    /// Grow by `margin` on every side.
    pub fn expand(&self, margin: f64) -> Rect {
        Rect::new(
            self.left - margin,
            self.top - margin,
            self.width + 2.0 * margin,
            self.height + 2.0 * margin,
        )
    }

    /// Edge contact counts as intersecting.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.left <= other.right()
            && other.left <= self.right()
            && self.top <= other.bottom()
            && other.top <= self.bottom()
    }
}

/// One entry of a host intersection batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IntersectionEntry {
    pub id: ImageId,
    pub is_intersecting: bool,
}

/// Instruction to the host: start loading `src` into placeholder `id`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Commit {
    pub id: ImageId,
    pub src: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadResult {
    Ok,
    Error,
}

/// Tracks placeholders from registration until they are unregistered.
#[derive(Debug)]
pub struct ImageLoadScheduler {
    root_margin: f64,
    next_id: u64,
    records: IndexMap<ImageId, LazyImageRecord>,
}

impl Default for ImageLoadScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_ROOT_MARGIN_PX)
    }
}

impl ImageLoadScheduler {
    pub fn new(root_margin: f64) -> Self {
        Self {
            root_margin,
            next_id: 0,
            records: IndexMap::new(),
        }
    }

    pub fn root_margin(&self) -> f64 {
        self.root_margin
    }

    /// Start observing a placeholder for `target_src`.
    pub fn register(&mut self, target_src: &str, alt: &str) -> ImageId {
        let id = ImageId(self.next_id);
        self.next_id += 1;
        self.records.insert(
            id,
            LazyImageRecord {
                target_src: target_src.to_string(),
                alt: alt.to_string(),
                state: LoadState::Pending,
            },
        );
        id
    }

    /// Forget a placeholder. Safe at any point; later geometry or load
    /// results for `id` are ignored.
    pub fn unregister(&mut self, id: ImageId) -> bool {
        self.records.shift_remove(&id).is_some()
    }

    pub fn record(&self, id: ImageId) -> Option<&LazyImageRecord> {
        self.records.get(&id)
    }

    pub fn state(&self, id: ImageId) -> Option<LoadState> {
        self.records.get(&id).map(|r| r.state)
    }

    /// Placeholders still waiting for a commit.
    pub fn observed_count(&self) -> usize {
        self.records
            .values()
            .filter(|r| r.state == LoadState::Pending)
            .count()
    }

    /// All placeholders the scheduler currently knows about.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &LazyImageRecord> {
        self.records.values()
    }

    /// Poll geometry: commit every observed placeholder whose box lies
    /// within the margin of `viewport`. `bounds` returns `None` for
    /// placeholders that are not laid out (detached).
    pub fn scan(&mut self, viewport: Rect, bounds: impl Fn(ImageId) -> Option<Rect>) -> Vec<Commit> {
        let zone = viewport.expand(self.root_margin);
        let near: Vec<ImageId> = self
            .records
            .iter()
            .filter(|(_, r)| r.state == LoadState::Pending)
            .filter_map(|(id, _)| bounds(*id).filter(|b| zone.intersects(b)).map(|_| *id))
            .collect();
        near.into_iter().filter_map(|id| self.commit(id)).collect()
    }

    /// Apply an intersection batch computed by the host with this
    /// scheduler's margin.
    pub fn on_intersections(&mut self, entries: &[IntersectionEntry]) -> Vec<Commit> {
        entries
            .iter()
            .filter(|e| e.is_intersecting)
            .filter_map(|e| self.commit(e.id))
            .collect()
    }

    fn commit(&mut self, id: ImageId) -> Option<Commit> {
        let record = self.records.get_mut(&id)?;
        if record.state != LoadState::Pending {
            return None;
        }
        record.state = LoadState::Loading;
        debug!(id = id.0, src = %record.target_src, "commit image source");
        Some(Commit {
            id,
            src: record.target_src.clone(),
        })
    }

    /// Report the outcome of a committed load. Returns the new state, or
    /// `None` when the placeholder is gone or was never committed.
    pub fn complete(&mut self, id: ImageId, result: LoadResult) -> Option<LoadState> {
        let record = self.records.get_mut(&id)?;
        if record.state != LoadState::Loading {
            return None;
        }
        record.state = match result {
            LoadResult::Ok => LoadState::Loaded,
            LoadResult::Error => {
                warn!(src = %record.target_src, "image failed to load");
                record.alt = FALLBACK_ALT.to_string();
                LoadState::Failed
            }
        };
        Some(record.state)
    }
}
