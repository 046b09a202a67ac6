//! Cooperative stop signalling for pipeline actors.
//!
//! Each actor (generator or worker) polls its [`CancellationToken`] at every
//! loop iteration. All blocking queue operations bound their wait with a
//! timeout, so a cancelled actor regains control within one timeout quantum;
//! no forced interruption of in-progress processing ever happens.
//!
//! # Example
//!
//! ```rust
//! use rust_work_pipeline::CancellationToken;
//! use std::thread;
//! use std::time::Duration;
//!
//! let token = CancellationToken::new();
//! let token_clone = token.clone();
//!
//! let handle = thread::spawn(move || {
//!     while !token_clone.is_cancelled() {
//!         thread::sleep(Duration::from_millis(10));
//!     }
//!     "stopped"
//! });
//!
//! thread::sleep(Duration::from_millis(30));
//! token.cancel();
//!
//! assert_eq!(handle.join().unwrap(), "stopped");
//! ```

use parking_lot::RwLock;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Reason for cancellation
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CancellationReason {
    /// Explicitly cancelled via `cancel()`
    Manual,
    /// Cancelled by the coordinator's ordered shutdown sequence
    Shutdown,
}

impl fmt::Display for CancellationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CancellationReason::Manual => write!(f, "manually cancelled"),
            CancellationReason::Shutdown => write!(f, "pipeline shutdown"),
        }
    }
}

/// Internal state for a cancellation token
struct CancellationTokenInner {
    cancelled: AtomicBool,
    reason: RwLock<Option<CancellationReason>>,
}

/// A thread-safe stop signal shared between an actor and its supervisor.
///
/// Cancellation is cooperative: the owning actor polls
/// [`is_cancelled()`](Self::is_cancelled) at each loop iteration and exits
/// cleanly. Cancelling is idempotent; only the first call sets the reason.
#[derive(Clone)]
pub struct CancellationToken {
    inner: Arc<CancellationTokenInner>,
}

impl fmt::Debug for CancellationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CancellationToken")
            .field("cancelled", &self.is_cancelled())
            .field("reason", &self.reason())
            .finish()
    }
}

impl CancellationToken {
    /// Create a new cancellation token (not cancelled)
    pub fn new() -> Self {
        Self {
            inner: Arc::new(CancellationTokenInner {
                cancelled: AtomicBool::new(false),
                reason: RwLock::new(None),
            }),
        }
    }

    /// Cancel this token with the default reason (Manual)
    pub fn cancel(&self) {
        self.cancel_with_reason(CancellationReason::Manual);
    }

    /// Cancel this token with a specific reason
    ///
    /// Idempotent: only the first call sets the reason.
    pub fn cancel_with_reason(&self, reason: CancellationReason) {
        if self
            .inner
            .cancelled
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_ok()
        {
            *self.inner.reason.write() = Some(reason);
        }
    }

    /// Check whether this token has been cancelled
    pub fn is_cancelled(&self) -> bool {
        self.inner.cancelled.load(Ordering::SeqCst)
    }

    /// Returns the cancellation reason, if cancelled
    pub fn reason(&self) -> Option<CancellationReason> {
        self.inner.reason.read().clone()
    }
}

impl Default for CancellationToken {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_new_token_not_cancelled() {
        let token = CancellationToken::new();
        assert!(!token.is_cancelled());
        assert_eq!(token.reason(), None);
    }

    #[test]
    fn test_cancel_sets_reason() {
        let token = CancellationToken::new();
        token.cancel();
        assert!(token.is_cancelled());
        assert_eq!(token.reason(), Some(CancellationReason::Manual));
    }

    #[test]
    fn test_first_reason_wins() {
        let token = CancellationToken::new();
        token.cancel_with_reason(CancellationReason::Shutdown);
        token.cancel();
        assert_eq!(token.reason(), Some(CancellationReason::Shutdown));
    }

    #[test]
    fn test_clones_share_state() {
        let token = CancellationToken::new();
        let clone = token.clone();
        clone.cancel();
        assert!(token.is_cancelled());
    }

    #[test]
    fn test_observed_across_threads() {
        let token = CancellationToken::new();
        let observer = token.clone();

        let handle = thread::spawn(move || {
            for _ in 0..100 {
                if observer.is_cancelled() {
                    return true;
                }
                thread::sleep(Duration::from_millis(5));
            }
            false
        });

        thread::sleep(Duration::from_millis(20));
        token.cancel_with_reason(CancellationReason::Shutdown);
        assert!(handle.join().unwrap());
    }

    #[test]
    fn test_reason_display() {
        assert_eq!(CancellationReason::Manual.to_string(), "manually cancelled");
        assert_eq!(
            CancellationReason::Shutdown.to_string(),
            "pipeline shutdown"
        );
    }
}
