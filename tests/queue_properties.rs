//! Property-based tests for the bounded queue.

use proptest::prelude::*;
use rust_work_pipeline::prelude::*;
use std::collections::HashSet;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

// ============================================================================
// Single-threaded ordering properties
// ============================================================================

proptest! {
    /// Items come out in the exact order they went in
    #[test]
    fn fifo_order_is_preserved(capacity in 1usize..32) {
        let queue = BoundedQueue::new(capacity);
        let mut ids = Vec::with_capacity(capacity);
        for _ in 0..capacity {
            let item = WorkItem::new(FileKind::Xml, 10);
            ids.push(item.id());
            queue.try_offer(item).unwrap();
        }
        for expected in ids {
            prop_assert_eq!(queue.try_poll().unwrap().id(), expected);
        }
    }

    /// A refused insert hands the exact same item back to the caller
    #[test]
    fn rejected_items_come_back(capacity in 1usize..8, extra in 1usize..8) {
        let queue = BoundedQueue::new(capacity);
        for _ in 0..capacity {
            queue.try_offer(WorkItem::new(FileKind::Json, 1)).unwrap();
        }
        for _ in 0..extra {
            let item = WorkItem::new(FileKind::Json, 2);
            let id = item.id();
            match queue.try_offer(item) {
                Err(QueueError::Full(returned)) => prop_assert_eq!(returned.id(), id),
                _ => prop_assert!(false, "expected Full error"),
            }
        }
        prop_assert_eq!(queue.len(), capacity);
    }
}

// ============================================================================
// Concurrent properties
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(16))]

    /// Occupancy never exceeds the configured capacity, even with
    /// concurrent producers hammering a consumer-less queue
    #[test]
    fn capacity_is_never_exceeded(capacity in 1usize..6, producers in 1usize..4) {
        let queue = Arc::new(BoundedQueue::new(capacity));
        let per_producer = 12u64;

        let mut handles = Vec::new();
        for _ in 0..producers {
            let q = Arc::clone(&queue);
            handles.push(thread::spawn(move || {
                let mut admitted = 0u64;
                for _ in 0..per_producer {
                    let item = WorkItem::new(FileKind::Xls, 1);
                    if q.offer_timeout(item, Duration::from_millis(1)).is_ok() {
                        admitted += 1;
                    }
                }
                admitted
            }));
        }

        for _ in 0..20 {
            prop_assert!(queue.len() <= capacity);
            thread::sleep(Duration::from_millis(1));
        }

        let admitted: u64 = handles.into_iter().map(|h| h.join().unwrap()).sum();
        prop_assert!(queue.len() <= capacity);
        prop_assert_eq!(queue.len() as u64, admitted);
    }

    /// Every admitted item is delivered exactly once
    #[test]
    fn no_item_is_lost_or_duplicated(producers in 1usize..4, per_producer in 1usize..16) {
        let queue = Arc::new(BoundedQueue::new(4));
        let total = producers * per_producer;

        let mut handles = Vec::new();
        for _ in 0..producers {
            let q = Arc::clone(&queue);
            handles.push(thread::spawn(move || {
                let mut ids = Vec::with_capacity(per_producer);
                for _ in 0..per_producer {
                    let item = WorkItem::new(FileKind::Xml, 1);
                    ids.push(item.id());
                    q.offer(item).unwrap();
                }
                ids
            }));
        }

        let q = Arc::clone(&queue);
        let consumer = thread::spawn(move || {
            let mut seen = Vec::with_capacity(total);
            while seen.len() < total {
                if let Ok(item) = q.poll_timeout(Duration::from_millis(200)) {
                    seen.push(item.id());
                }
            }
            seen
        });

        let mut offered = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                prop_assert!(offered.insert(id));
            }
        }

        let seen = consumer.join().unwrap();
        let seen_set: HashSet<u64> = seen.iter().copied().collect();
        prop_assert_eq!(seen.len(), total);
        prop_assert_eq!(seen_set, offered);
    }
}
