//! Bounded FIFO queue with capacity limit.

use super::{ItemQueue, QueueError, QueueResult};
use crate::core::{WorkItem, WorkKind};
use crossbeam::channel::{self, Receiver, Sender, TryRecvError, TrySendError};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

/// A bounded FIFO queue of work items with configurable capacity.
///
/// The queue provides backpressure by refusing inserts once full: timed
/// offers return the item to the caller after the window expires. Items are
/// delivered in insert order; a reinserted item re-enters at the tail, not
/// at its original position.
///
/// # Example
///
/// ```rust
/// use rust_work_pipeline::queue::{BoundedQueue, ItemQueue, QueueError};
/// use rust_work_pipeline::{FileKind, WorkItem};
///
/// let queue = BoundedQueue::new(2);
///
/// queue.try_offer(WorkItem::new(FileKind::Xml, 10)).unwrap();
/// queue.try_offer(WorkItem::new(FileKind::Json, 20)).unwrap();
///
/// // Queue is now full - the rejected item comes back to the caller
/// match queue.try_offer(WorkItem::new(FileKind::Xls, 30)) {
///     Err(QueueError::Full(item)) => assert_eq!(item.size(), 30),
///     _ => panic!("expected Full error"),
/// }
/// ```
pub struct BoundedQueue<K: WorkKind> {
    sender: Sender<WorkItem<K>>,
    receiver: Receiver<WorkItem<K>>,
    capacity: usize,
    closed: AtomicBool,
}

impl<K: WorkKind> BoundedQueue<K> {
    /// Creates a new bounded queue with the specified capacity.
    ///
    /// # Arguments
    ///
    /// * `capacity` - The maximum number of items the queue can hold.
    ///   Must be greater than 0.
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is 0.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "capacity must be greater than 0");
        let (sender, receiver) = channel::bounded(capacity);
        Self {
            sender,
            receiver,
            capacity,
            closed: AtomicBool::new(false),
        }
    }
}

impl<K: WorkKind> ItemQueue<K> for BoundedQueue<K> {
    fn offer(&self, item: WorkItem<K>) -> QueueResult<(), K> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(QueueError::Closed(item));
        }
        self.sender.send(item).map_err(|e| QueueError::Closed(e.0))
    }

    fn try_offer(&self, item: WorkItem<K>) -> QueueResult<(), K> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(QueueError::Closed(item));
        }
        self.sender.try_send(item).map_err(|e| match e {
            TrySendError::Full(item) => QueueError::Full(item),
            TrySendError::Disconnected(item) => QueueError::Closed(item),
        })
    }

    fn offer_timeout(&self, item: WorkItem<K>, timeout: Duration) -> QueueResult<(), K> {
        if self.closed.load(Ordering::SeqCst) {
            return Err(QueueError::Closed(item));
        }
        self.sender.send_timeout(item, timeout).map_err(|e| match e {
            channel::SendTimeoutError::Timeout(item) => QueueError::Timeout(item),
            channel::SendTimeoutError::Disconnected(item) => QueueError::Closed(item),
        })
    }

    fn poll(&self) -> QueueResult<WorkItem<K>, K> {
        self.receiver.recv().map_err(|_| QueueError::Disconnected)
    }

    fn try_poll(&self) -> QueueResult<WorkItem<K>, K> {
        self.receiver.try_recv().map_err(|e| match e {
            TryRecvError::Empty => QueueError::Empty,
            TryRecvError::Disconnected => QueueError::Disconnected,
        })
    }

    fn poll_timeout(&self, timeout: Duration) -> QueueResult<WorkItem<K>, K> {
        // Check if closed first
        if self.closed.load(Ordering::SeqCst) && self.receiver.is_empty() {
            return Err(QueueError::Disconnected);
        }

        match self.receiver.recv_timeout(timeout) {
            Ok(item) => Ok(item),
            Err(channel::RecvTimeoutError::Timeout) => {
                // On timeout, check if closed
                if self.closed.load(Ordering::SeqCst) && self.receiver.is_empty() {
                    Err(QueueError::Disconnected)
                } else {
                    Err(QueueError::Empty)
                }
            }
            Err(channel::RecvTimeoutError::Disconnected) => Err(QueueError::Disconnected),
        }
    }

    fn len(&self) -> usize {
        self.receiver.len()
    }

    fn capacity(&self) -> Option<usize> {
        Some(self.capacity)
    }

    fn close(&self) {
        self.closed.store(true, Ordering::SeqCst);
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }
}
