//! Pipeline actors and lifecycle orchestration.
//!
//! # Components
//!
//! - [`PipelineConfig`]: all static knobs for a run
//! - [`Generator`]: the single producer, synthesizing items at jittered
//!   intervals
//! - [`KindWorker`]: a consumer bound to exactly one item kind
//! - [`Coordinator`]: starts the actors, holds for the run duration, then
//!   performs the ordered shutdown (stop producer, drain, stop consumers)
//! - [`PipelineReport`]: the aggregated final statistics
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use rust_work_pipeline::prelude::*;
//! use std::time::Duration;
//!
//! let config = PipelineConfig::<FileKind>::new()
//!     .with_run_duration(Duration::from_secs(20));
//!
//! let report = Coordinator::new(config)?.run()?;
//! println!("{}", report);
//! ```

mod config;
mod coordinator;
mod generator;
mod stats;
mod worker;

pub use config::PipelineConfig;
pub use coordinator::{Coordinator, PipelineState};
pub use generator::Generator;
pub use stats::{GeneratorStats, PipelineReport, WorkerReport, WorkerStats};
pub use worker::KindWorker;

use crate::core::{PipelineError, Result};
use std::thread;
use std::time::{Duration, Instant};

/// Waits for an actor thread to finish, polling up to `timeout`.
///
/// On success the handle is consumed and joined; on timeout the handle is
/// put back so a later attempt (or Drop) can retry, and a
/// [`PipelineError::JoinTimeout`] soft fault is returned.
pub(crate) fn join_with_timeout(
    actor: &str,
    slot: &mut Option<thread::JoinHandle<()>>,
    timeout: Duration,
) -> Result<()> {
    let handle = match slot.take() {
        Some(handle) => handle,
        None => return Ok(()),
    };

    let start = Instant::now();
    loop {
        if handle.is_finished() {
            return handle
                .join()
                .map_err(|_| PipelineError::join(actor, "actor thread panicked"));
        }

        if start.elapsed() >= timeout {
            *slot = Some(handle);
            return Err(PipelineError::join_timeout(
                actor,
                timeout.as_millis() as u64,
            ));
        }

        thread::sleep(Duration::from_millis(10));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_with_timeout_finished_thread() {
        let mut slot = Some(thread::spawn(|| {}));
        thread::sleep(Duration::from_millis(20));
        assert!(join_with_timeout("test-actor", &mut slot, Duration::from_millis(100)).is_ok());
        assert!(slot.is_none());
    }

    #[test]
    fn test_join_with_timeout_slow_thread() {
        let mut slot = Some(thread::spawn(|| {
            thread::sleep(Duration::from_millis(300));
        }));

        let result = join_with_timeout("test-actor", &mut slot, Duration::from_millis(30));
        assert!(matches!(result, Err(PipelineError::JoinTimeout { .. })));
        // Handle is preserved for a later retry
        assert!(slot.is_some());

        // Second attempt with a generous window succeeds
        assert!(join_with_timeout("test-actor", &mut slot, Duration::from_secs(2)).is_ok());
    }

    #[test]
    fn test_join_with_timeout_empty_slot() {
        let mut slot = None;
        assert!(join_with_timeout("test-actor", &mut slot, Duration::from_millis(10)).is_ok());
    }
}
