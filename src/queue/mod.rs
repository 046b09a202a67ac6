//! Queue abstractions for the shared work buffer.
//!
//! This module provides the [`ItemQueue`] trait that abstracts the shared
//! buffer between the generator and the workers, and [`BoundedQueue`], the
//! capacity-limited FIFO implementation the pipeline runs on.
//!
//! A failed insert always hands the item back to the caller through
//! [`QueueError`], so ownership of a work item is never lost inside the
//! queue: the caller decides whether the item is dropped (and counted) or
//! retried.

mod bounded;

pub use bounded::BoundedQueue;

use crate::core::{WorkItem, WorkKind};
use std::time::Duration;

/// Result type for queue operations
pub type QueueResult<T, K> = std::result::Result<T, QueueError<K>>;

/// Outcomes of queue operations that did not deliver or accept an item.
///
/// The insert-side variants return the rejected [`WorkItem`] so the caller
/// keeps ownership; use [`into_item`](Self::into_item) to recover it.
#[derive(Debug, thiserror::Error)]
pub enum QueueError<K: WorkKind> {
    /// The queue was at capacity and the non-blocking insert was refused
    #[error("queue is full")]
    Full(WorkItem<K>),

    /// No capacity became available within the insert timeout window
    #[error("timed out waiting for queue capacity")]
    Timeout(WorkItem<K>),

    /// The queue was closed and the item was not inserted
    #[error("queue is closed")]
    Closed(WorkItem<K>),

    /// No item became available within the remove timeout window
    #[error("queue is empty")]
    Empty,

    /// The queue is closed and fully drained
    #[error("queue is closed and empty")]
    Disconnected,
}

impl<K: WorkKind> QueueError<K> {
    /// Recovers the rejected item from an insert-side error, if any.
    pub fn into_item(self) -> Option<WorkItem<K>> {
        match self {
            QueueError::Full(item) | QueueError::Timeout(item) | QueueError::Closed(item) => {
                Some(item)
            }
            QueueError::Empty | QueueError::Disconnected => None,
        }
    }
}

/// Trait abstracting the shared work buffer.
///
/// Implementations must be safe for multiple concurrent inserters and
/// removers, must never lose or duplicate an accepted item, and must wake
/// blocked waiters promptly when occupancy changes.
pub trait ItemQueue<K: WorkKind>: Send + Sync {
    /// Inserts an item at the tail, blocking until capacity is available.
    fn offer(&self, item: WorkItem<K>) -> QueueResult<(), K>;

    /// Inserts an item at the tail without blocking.
    fn try_offer(&self, item: WorkItem<K>) -> QueueResult<(), K>;

    /// Inserts an item at the tail, blocking up to `timeout` for capacity.
    ///
    /// Returns [`QueueError::Timeout`] with the item if no slot freed up in
    /// the window; the caller treats this as a rejection.
    fn offer_timeout(&self, item: WorkItem<K>, timeout: Duration) -> QueueResult<(), K>;

    /// Removes the head item, blocking until one is available.
    fn poll(&self) -> QueueResult<WorkItem<K>, K>;

    /// Removes the head item without blocking.
    fn try_poll(&self) -> QueueResult<WorkItem<K>, K>;

    /// Removes the head item, blocking up to `timeout` for one to arrive.
    ///
    /// Returns [`QueueError::Empty`] on timeout, or
    /// [`QueueError::Disconnected`] once the queue is closed and drained.
    fn poll_timeout(&self, timeout: Duration) -> QueueResult<WorkItem<K>, K>;

    /// Returns the current occupancy.
    ///
    /// Advisory only: the value may be stale by the time the caller acts
    /// on it.
    fn len(&self) -> usize;

    /// Returns whether the queue is currently empty (advisory).
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the maximum capacity, if bounded.
    fn capacity(&self) -> Option<usize>;

    /// Closes the queue: further inserts fail, removes drain what remains.
    fn close(&self);

    /// Returns whether the queue has been closed.
    fn is_closed(&self) -> bool;
}
