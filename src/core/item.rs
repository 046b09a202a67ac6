//! Work items and the kind taxonomy that routes them.
//!
//! A [`WorkItem`] is an immutable unit of work carrying a process-wide
//! monotonic id, a kind tag from a closed set, a synthetic size, and its
//! creation instant. The processing cost of an item is derived from its
//! size (`size * cost_factor` milliseconds); nothing about an item changes
//! after construction.
//!
//! # Custom Kinds
//!
//! The built-in [`FileKind`] covers the file-processing simulation; domain
//! code can define its own closed set by implementing [`WorkKind`]:
//!
//! ```rust
//! use rust_work_pipeline::WorkKind;
//!
//! #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
//! enum MediaKind {
//!     Audio,
//!     Video,
//!     Image,
//! }
//!
//! impl WorkKind for MediaKind {
//!     fn all_variants() -> &'static [Self] {
//!         &[Self::Audio, Self::Video, Self::Image]
//!     }
//! }
//! ```

use std::fmt::{self, Debug};
use std::hash::Hash;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

static NEXT_ITEM_ID: AtomicU64 = AtomicU64::new(1);

/// Generates a unique, monotonically increasing item id
fn next_item_id() -> u64 {
    NEXT_ITEM_ID.fetch_add(1, Ordering::Relaxed)
}

/// Trait for defining the closed set of work-item kinds.
///
/// Kinds route items to the workers competent to process them. The set is
/// fixed for a run: queues are shared across kinds, but every worker is
/// bound to exactly one kind at construction.
///
/// # Requirements
///
/// Implementations must be:
/// - `Copy + Clone`: kinds are freely copied for routing decisions
/// - `Eq + Hash`: kinds are used as HashMap keys in the configuration
/// - `Send + Sync + 'static`: kinds are shared across threads
/// - `Debug`: kinds can be formatted for logging
pub trait WorkKind: Copy + Clone + Eq + Hash + Send + Sync + Debug + 'static {
    /// Returns all possible variants of this kind set.
    ///
    /// Used during pipeline startup to create one worker group per kind,
    /// and by the generator to draw a uniformly random kind per item.
    fn all_variants() -> &'static [Self];

    /// Returns a human-readable name for this kind.
    ///
    /// Defaults to the `Debug` representation. Override for custom
    /// formatting.
    fn name(&self) -> String {
        format!("{:?}", self)
    }
}

/// Built-in kind set for the file-processing simulation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FileKind {
    /// XML documents.
    Xml,
    /// JSON documents.
    Json,
    /// Spreadsheet files.
    Xls,
}

impl WorkKind for FileKind {
    fn all_variants() -> &'static [Self] {
        &[Self::Xml, Self::Json, Self::Xls]
    }

    fn name(&self) -> String {
        match self {
            Self::Xml => "XML".to_string(),
            Self::Json => "JSON".to_string(),
            Self::Xls => "XLS".to_string(),
        }
    }
}

/// An immutable, typed unit of work.
///
/// Items are created by the generator, owned by the queue while enqueued,
/// and exclusively owned by whichever worker dequeues them until they are
/// either processed (terminal) or reinserted at the tail.
///
/// # Example
///
/// ```rust
/// use rust_work_pipeline::{FileKind, WorkItem};
/// use std::time::Duration;
///
/// let item = WorkItem::new(FileKind::Json, 40);
/// assert_eq!(item.size(), 40);
/// assert_eq!(item.processing_cost(7), Duration::from_millis(280));
/// ```
#[derive(Debug)]
pub struct WorkItem<K: WorkKind> {
    id: u64,
    kind: K,
    size: u32,
    created_at: Instant,
}

impl<K: WorkKind> WorkItem<K> {
    /// Creates a new work item with a fresh process-wide id.
    pub fn new(kind: K, size: u32) -> Self {
        Self {
            id: next_item_id(),
            kind,
            size,
            created_at: Instant::now(),
        }
    }

    /// Returns the unique, monotonically increasing item id.
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Returns the kind tag used for worker routing.
    pub fn kind(&self) -> K {
        self.kind
    }

    /// Returns the synthetic size of the item.
    pub fn size(&self) -> u32 {
        self.size
    }

    /// Returns the creation instant (monotonic clock).
    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    /// Returns the time this item has spent in the system so far.
    pub fn age(&self) -> Duration {
        self.created_at.elapsed()
    }

    /// Returns the simulated processing cost: `size * cost_factor_ms`
    /// milliseconds.
    pub fn processing_cost(&self, cost_factor_ms: u64) -> Duration {
        Duration::from_millis(u64::from(self.size) * cost_factor_ms)
    }
}

impl<K: WorkKind> fmt::Display for WorkItem<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} item #{} [size={}]", self.kind.name(), self.id, self.size)
    }
}
