//! Kind-bound consumers draining the shared queue.

use super::config::PipelineConfig;
use super::join_with_timeout;
use super::stats::WorkerStats;
use crate::core::{CancellationReason, CancellationToken, PipelineError, Result, WorkItem, WorkKind};
use crate::queue::{ItemQueue, QueueError};
use log::{debug, info, trace, warn};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const DROP_JOIN_TIMEOUT: Duration = Duration::from_secs(5);

/// A consumer bound to exactly one work-item kind.
///
/// The worker polls the shared queue with a timeout, processes matching
/// items (sleeping `size * cost_factor` milliseconds of simulated work),
/// and returns foreign-kind items to the queue tail. A returned item loses
/// its original position; under an adversarial kind mix this can starve an
/// item indefinitely, which is an accepted property of the design. If the
/// queue is full at return time the item is dropped and counted, not
/// retried.
///
/// Stopping is cooperative: the token is checked at each loop iteration,
/// and in-flight processing always runs to completion.
pub struct KindWorker<K: WorkKind> {
    id: usize,
    kind: K,
    name: String,
    thread: Option<thread::JoinHandle<()>>,
    stats: Arc<WorkerStats>,
    token: CancellationToken,
}

impl<K: WorkKind> std::fmt::Debug for KindWorker<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KindWorker")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("processed", &self.stats.processed())
            .finish()
    }
}

impl<K: WorkKind> KindWorker<K> {
    /// Creates and starts a new worker thread for the given kind.
    pub fn spawn(
        id: usize,
        kind: K,
        queue: Arc<dyn ItemQueue<K>>,
        config: &PipelineConfig<K>,
        token: CancellationToken,
    ) -> Result<Self> {
        let name = format!("{}-{}-{}", config.thread_name_prefix, kind.name(), id);
        let stats = Arc::new(WorkerStats::new());

        let thread = thread::Builder::new()
            .name(name.clone())
            .spawn({
                let name = name.clone();
                let stats = Arc::clone(&stats);
                let token = token.clone();
                let dequeue_timeout = config.dequeue_timeout;
                let return_timeout = config.return_timeout;
                let mismatch_backoff = config.mismatch_backoff;
                let cost_factor_ms = config.cost_factor_ms;
                move || {
                    Self::run(
                        name,
                        kind,
                        queue,
                        stats,
                        token,
                        dequeue_timeout,
                        return_timeout,
                        mismatch_backoff,
                        cost_factor_ms,
                    )
                }
            })
            .map_err(|e| PipelineError::spawn_with_source(name.clone(), e.to_string(), e))?;

        Ok(Self {
            id,
            kind,
            name,
            thread: Some(thread),
            stats,
            token,
        })
    }

    /// Returns the worker id.
    pub fn id(&self) -> usize {
        self.id
    }

    /// Returns the kind this worker is bound to.
    pub fn kind(&self) -> K {
        self.kind
    }

    /// Returns the worker's thread name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the worker's counters.
    pub fn stats(&self) -> Arc<WorkerStats> {
        Arc::clone(&self.stats)
    }

    /// Requests a cooperative stop.
    pub fn stop(&self) {
        self.token
            .cancel_with_reason(CancellationReason::Shutdown);
    }

    /// Waits up to `timeout` for the worker loop to exit.
    ///
    /// Returns a [`PipelineError::JoinTimeout`] soft fault if it does not
    /// confirm in time; the thread is left running and may be retried.
    pub fn join_timeout(&mut self, timeout: Duration) -> Result<()> {
        join_with_timeout(&self.name, &mut self.thread, timeout)
    }

    /// Returns whether the worker confirmed its stop.
    pub fn stop_confirmed(&self) -> bool {
        self.thread.is_none()
    }

    /// Main worker loop.
    #[allow(clippy::too_many_arguments)]
    fn run(
        name: String,
        kind: K,
        queue: Arc<dyn ItemQueue<K>>,
        stats: Arc<WorkerStats>,
        token: CancellationToken,
        dequeue_timeout: Duration,
        return_timeout: Duration,
        mismatch_backoff: Duration,
        cost_factor_ms: u64,
    ) {
        info!("{} started (handles {})", name, kind.name());

        while !token.is_cancelled() {
            match queue.poll_timeout(dequeue_timeout) {
                Ok(item) => {
                    if item.kind() == kind {
                        Self::process(&name, item, cost_factor_ms, &stats);
                    } else {
                        let label = item.to_string();
                        match queue.offer_timeout(item, return_timeout) {
                            Ok(()) => {
                                stats.record_returned();
                                trace!("{} returned {} to the tail", name, label);
                            }
                            Err(QueueError::Timeout(item) | QueueError::Full(item)) => {
                                stats.record_return_dropped();
                                warn!(
                                    "{} could not return {} to a full queue, item dropped",
                                    name, item
                                );
                            }
                            Err(QueueError::Closed(item)) => {
                                stats.record_return_dropped();
                                debug!("{} queue closed while returning {}", name, item);
                                break;
                            }
                            Err(_) => break,
                        }
                        thread::sleep(mismatch_backoff);
                    }
                }
                Err(QueueError::Empty) => continue,
                Err(QueueError::Disconnected) => break,
                Err(_) => break,
            }
        }

        info!(
            "{} stopped: processed={} returned={}",
            name,
            stats.processed(),
            stats.returned()
        );
    }

    /// Runs the simulated processing for a matching item.
    fn process(name: &str, item: WorkItem<K>, cost_factor_ms: u64, stats: &WorkerStats) {
        let cost = item.processing_cost(cost_factor_ms);
        debug!("{} processing {} for {:?}", name, item, cost);
        thread::sleep(cost);
        let time_in_system = item.age();
        stats.record_processed(cost, time_in_system);
        debug!(
            "{} completed {} (time in system {:?})",
            name, item, time_in_system
        );
    }
}

impl<K: WorkKind> Drop for KindWorker<K> {
    fn drop(&mut self) {
        self.token
            .cancel_with_reason(CancellationReason::Shutdown);
        if self.thread.is_some() {
            if let Err(e) = join_with_timeout(&self.name, &mut self.thread, DROP_JOIN_TIMEOUT) {
                warn!("{} abandoned during drop: {}", self.name, e);
            }
        }
    }
}
