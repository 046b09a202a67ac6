//! The single producer feeding the shared queue.

use super::config::PipelineConfig;
use super::join_with_timeout;
use super::stats::GeneratorStats;
use crate::core::{CancellationReason, CancellationToken, PipelineError, Result, WorkItem, WorkKind};
use crate::queue::{ItemQueue, QueueError};
use log::{debug, info, trace, warn};
use std::ops::RangeInclusive;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

const DROP_JOIN_TIMEOUT: Duration = Duration::from_secs(5);

/// The pipeline's single producer.
///
/// Synthesizes work items with a uniformly random kind and size at jittered
/// intervals and offers each to the queue with a short timeout. Admissions
/// and rejections are counted; a rejected item is dropped, never retried.
///
/// The generator owns one OS thread, started in [`spawn`](Self::spawn) and
/// stopped cooperatively through its [`CancellationToken`]. It reacts to a
/// stop signal within one pause interval plus one enqueue timeout.
pub struct Generator {
    name: String,
    thread: Option<thread::JoinHandle<()>>,
    stats: Arc<GeneratorStats>,
    token: CancellationToken,
}

impl std::fmt::Debug for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Generator")
            .field("name", &self.name)
            .field("generated", &self.stats.generated())
            .field("rejected", &self.stats.rejected())
            .finish()
    }
}

impl Generator {
    /// Creates and starts the generator thread.
    pub fn spawn<K: WorkKind>(
        queue: Arc<dyn ItemQueue<K>>,
        config: &PipelineConfig<K>,
        token: CancellationToken,
    ) -> Result<Self> {
        let name = format!("{}-generator", config.thread_name_prefix);
        let stats = Arc::new(GeneratorStats::new());

        let thread = thread::Builder::new()
            .name(name.clone())
            .spawn({
                let name = name.clone();
                let stats = Arc::clone(&stats);
                let token = token.clone();
                let enqueue_timeout = config.enqueue_timeout;
                let size_range = config.size_range.clone();
                let interval_range = config.interval_range.clone();
                move || {
                    Self::run(
                        name,
                        queue,
                        stats,
                        token,
                        enqueue_timeout,
                        size_range,
                        interval_range,
                    )
                }
            })
            .map_err(|e| PipelineError::spawn_with_source(name.clone(), e.to_string(), e))?;

        Ok(Self {
            name,
            thread: Some(thread),
            stats,
            token,
        })
    }

    /// Returns the generator's thread name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the generator's counters.
    pub fn stats(&self) -> Arc<GeneratorStats> {
        Arc::clone(&self.stats)
    }

    /// Requests a cooperative stop.
    pub fn stop(&self) {
        self.token
            .cancel_with_reason(CancellationReason::Shutdown);
    }

    /// Waits up to `timeout` for the generator loop to exit.
    ///
    /// Returns a [`PipelineError::JoinTimeout`] soft fault if it does not
    /// confirm in time; the thread is left running and may be retried.
    pub fn join_timeout(&mut self, timeout: Duration) -> Result<()> {
        join_with_timeout(&self.name, &mut self.thread, timeout)
    }

    /// Returns whether the generator confirmed its stop.
    pub fn stop_confirmed(&self) -> bool {
        self.thread.is_none()
    }

    /// Main generator loop.
    fn run<K: WorkKind>(
        name: String,
        queue: Arc<dyn ItemQueue<K>>,
        stats: Arc<GeneratorStats>,
        token: CancellationToken,
        enqueue_timeout: Duration,
        size_range: RangeInclusive<u32>,
        interval_range: RangeInclusive<u64>,
    ) {
        info!("{} started", name);
        let kinds = K::all_variants();

        while !token.is_cancelled() {
            let kind = kinds[fastrand::usize(..kinds.len())];
            let size = fastrand::u32(size_range.clone());
            let item = WorkItem::new(kind, size);
            trace!("{} created {}", name, item);

            match queue.offer_timeout(item, enqueue_timeout) {
                Ok(()) => {
                    stats.record_admission();
                    debug!("{} admitted item, queue at {}", name, queue.len());
                }
                Err(QueueError::Timeout(item) | QueueError::Full(item)) => {
                    stats.record_rejection();
                    warn!("{} queue full, rejected {}", name, item);
                }
                Err(QueueError::Closed(item)) => {
                    debug!("{} queue closed, dropping {}", name, item);
                    break;
                }
                Err(_) => break,
            }

            let pause = fastrand::u64(interval_range.clone());
            thread::sleep(Duration::from_millis(pause));
        }

        info!(
            "{} stopped: generated={} rejected={}",
            name,
            stats.generated(),
            stats.rejected()
        );
    }
}

impl Drop for Generator {
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
