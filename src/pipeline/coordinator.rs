//! Lifecycle orchestration for the pipeline.

use super::config::PipelineConfig;
use super::generator::Generator;
use super::stats::{GeneratorStats, PipelineReport, WorkerReport, WorkerStats};
use super::worker::KindWorker;
use crate::core::{CancellationToken, PipelineError, Result, WorkKind};
use crate::queue::{BoundedQueue, ItemQueue};
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::thread;

/// Lifecycle states of a [`Coordinator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PipelineState {
    /// Constructed, nothing spawned yet.
    Idle,
    /// Generator and workers are running.
    Running,
    /// Generator stopped; workers are emptying the queue.
    Draining,
    /// Everything stopped, report available.
    Stopped,
}

/// Supervises the generator and the workers through one pipeline run.
///
/// The coordinator never participates in the hot path: it spawns the
/// actors, holds for the configured run duration, then performs the
/// ordered shutdown — stop the producer, wait out the drain grace period,
/// stop the consumers — and aggregates the final statistics. An actor that
/// misses its stop-confirmation window is abandoned and reported, never
/// force-killed.
///
/// # Example
///
/// ```rust,ignore
/// use rust_work_pipeline::prelude::*;
/// use std::time::Duration;
///
/// let config = PipelineConfig::<FileKind>::new()
///     .with_run_duration(Duration::from_secs(20));
///
/// let report = Coordinator::new(config)?.run()?;
/// println!("{}", report);
/// ```
pub struct Coordinator<K: WorkKind> {
    config: PipelineConfig<K>,
    queue: Arc<BoundedQueue<K>>,
    state: PipelineState,
    generator: Option<Generator>,
    workers: Vec<KindWorker<K>>,
    unconfirmed: Vec<String>,
    started_at: Option<DateTime<Utc>>,
}

impl<K: WorkKind> std::fmt::Debug for Coordinator<K> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Coordinator")
            .field("state", &self.state)
            .field("workers", &self.workers.len())
            .field("queue_len", &self.queue.len())
            .finish()
    }
}

impl<K: WorkKind> Coordinator<K> {
    /// Creates a coordinator with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(config: PipelineConfig<K>) -> Result<Self> {
        config.validate()?;
        let queue = Arc::new(BoundedQueue::new(config.queue_capacity));
        Ok(Self {
            config,
            queue,
            state: PipelineState::Idle,
            generator: None,
            workers: Vec::new(),
            unconfirmed: Vec::new(),
            started_at: None,
        })
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> PipelineState {
        self.state
    }

    /// Returns the current queue occupancy (advisory).
    pub fn queue_len(&self) -> usize {
        self.queue.len()
    }

    /// Returns the configuration.
    pub fn config(&self) -> &PipelineConfig<K> {
        &self.config
    }

    /// Returns the generator's counters, once started.
    pub fn generator_stats(&self) -> Option<Arc<GeneratorStats>> {
        self.generator.as_ref().map(|g| g.stats())
    }

    /// Returns the counters of every spawned worker.
    pub fn worker_stats(&self) -> Vec<Arc<WorkerStats>> {
        self.workers.iter().map(|w| w.stats()).collect()
    }

    /// Spawns the generator and one worker per (kind x replica) pair.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::AlreadyRunning`] unless the coordinator is
    /// idle, or a spawn error if a thread could not be created.
    pub fn start(&mut self) -> Result<()> {
        if self.state != PipelineState::Idle {
            return Err(PipelineError::already_running(
                &self.config.thread_name_prefix,
                self.workers.len(),
            ));
        }

        self.started_at = Some(Utc::now());
        let queue: Arc<dyn ItemQueue<K>> = self.queue.clone();

        self.generator = Some(Generator::spawn(
            Arc::clone(&queue),
            &self.config,
            CancellationToken::new(),
        )?);

        let mut worker_id = 0;
        for kind in K::all_variants() {
            for _ in 0..self.config.get_workers_for(*kind) {
                let worker = KindWorker::spawn(
                    worker_id,
                    *kind,
                    Arc::clone(&queue),
                    &self.config,
                    CancellationToken::new(),
                )?;
                self.workers.push(worker);
                worker_id += 1;
                // Stagger startup so the per-worker start logs stay readable
                thread::sleep(self.config.startup_stagger);
            }
        }

        self.state = PipelineState::Running;
        info!(
            "pipeline '{}' running: {} workers, queue capacity {}",
            self.config.thread_name_prefix,
            self.workers.len(),
            self.config.queue_capacity
        );
        Ok(())
    }

    /// Runs the full lifecycle: start, hold for the configured run
    /// duration, then shut down and return the final report.
    pub fn run(mut self) -> Result<PipelineReport> {
        self.start()?;
        thread::sleep(self.config.run_duration);
        self.shutdown()
    }

    /// Performs the ordered shutdown and returns the final report.
    ///
    /// Stops the generator, waits out the drain grace period so workers can
    /// empty the queue, then stops the workers. Join misses are recorded as
    /// soft faults in the report.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::NotRunning`] unless the coordinator is
    /// running.
    pub fn shutdown(&mut self) -> Result<PipelineReport> {
        if self.state != PipelineState::Running {
            return Err(PipelineError::not_running(&self.config.thread_name_prefix));
        }

        self.state = PipelineState::Draining;
        info!("stopping generator");
        if let Some(generator) = self.generator.as_mut() {
            generator.stop();
            if let Err(e) = generator.join_timeout(self.config.join_timeout) {
                warn!("{}", e);
                self.unconfirmed.push(generator.name().to_string());
            }
        }

        debug!("draining queue for {:?}", self.config.drain_period);
        thread::sleep(self.config.drain_period);

        info!("stopping {} workers", self.workers.len());
        for worker in &self.workers {
            worker.stop();
        }
        for worker in self.workers.iter_mut() {
            if let Err(e) = worker.join_timeout(self.config.join_timeout) {
                warn!("{}", e);
                self.unconfirmed.push(worker.name().to_string());
            }
        }

        self.queue.close();
        self.state = PipelineState::Stopped;

        let report = self.build_report();
        info!(
            "pipeline stopped: generated={} processed={} remaining={}",
            report.generated, report.processed_total, report.remaining_in_queue
        );
        Ok(report)
    }

    /// Aggregates the actors' counters into the final report.
    fn build_report(&self) -> PipelineReport {
        let (generated, rejected) = self
            .generator
            .as_ref()
            .map(|g| {
                let stats = g.stats();
                (stats.generated(), stats.rejected())
            })
            .unwrap_or((0, 0));

        let mut processed_per_kind: BTreeMap<String, u64> = K::all_variants()
            .iter()
            .map(|k| (k.name(), 0))
            .collect();

        let mut processed_total = 0;
        let mut returned_total = 0;
        let mut returns_dropped = 0;
        let mut workers = Vec::with_capacity(self.workers.len());

        for worker in &self.workers {
            let stats = worker.stats();
            processed_total += stats.processed();
            returned_total += stats.returned();
            returns_dropped += stats.returns_dropped();
            *processed_per_kind.entry(worker.kind().name()).or_insert(0) += stats.processed();
            workers.push(WorkerReport {
                name: worker.name().to_string(),
                kind: worker.kind().name(),
                processed: stats.processed(),
                returned: stats.returned(),
                returns_dropped: stats.returns_dropped(),
                confirmed_stop: worker.stop_confirmed(),
            });
        }

        PipelineReport {
            started_at: self.started_at.unwrap_or_else(Utc::now),
            finished_at: Utc::now(),
            generated,
            rejected,
            processed_total,
            processed_per_kind,
            returned_total,
            returns_dropped,
            remaining_in_queue: self.queue.len(),
            efficiency_percent: PipelineReport::compute_efficiency(processed_total, generated),
            workers,
            unconfirmed_stops: self.unconfirmed.clone(),
        }
    }
}

impl<K: WorkKind> Drop for Coordinator<K> {
    fn drop(&mut self) {
        // Signal everyone before the individual actor drops join one by one
        if let Some(generator) = &self.generator {
            generator.stop();
        }
        for worker in &self.workers {
            worker.stop();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FileKind;
    use std::time::Duration;

    fn quick_config() -> PipelineConfig<FileKind> {
        PipelineConfig::new()
            .with_queue_capacity(5)
            .with_default_workers(1)
            .with_run_duration(Duration::from_millis(300))
            .with_interval_range(1..=10)
            .with_size_range(1..=3)
            .with_enqueue_timeout(Duration::from_millis(10))
            .with_dequeue_timeout(Duration::from_millis(50))
            .with_drain_period(Duration::from_millis(200))
            .with_join_timeout(Duration::from_secs(2))
            .with_startup_stagger(Duration::from_millis(1))
    }

    #[test]
    fn test_new_coordinator_is_idle() {
        let coordinator = Coordinator::new(quick_config()).expect("create coordinator");
        assert_eq!(coordinator.state(), PipelineState::Idle);
        assert_eq!(coordinator.queue_len(), 0);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let result = Coordinator::new(quick_config().with_queue_capacity(0));
        assert!(matches!(result, Err(PipelineError::InvalidConfig { .. })));
    }

    #[test]
    fn test_double_start_fails() {
        let mut coordinator = Coordinator::new(quick_config()).expect("create coordinator");
        coordinator.start().expect("first start");
        assert!(matches!(
            coordinator.start(),
            Err(PipelineError::AlreadyRunning { .. })
        ));
        coordinator.shutdown().expect("shutdown");
    }

    #[test]
    fn test_shutdown_when_idle_fails() {
        let mut coordinator = Coordinator::new(quick_config()).expect("create coordinator");
        assert!(matches!(
            coordinator.shutdown(),
            Err(PipelineError::NotRunning { .. })
        ));
    }

    #[test]
    fn test_full_run_reaches_stopped() {
        let mut coordinator = Coordinator::new(quick_config()).expect("create coordinator");
        coordinator.start().expect("start");
        assert_eq!(coordinator.state(), PipelineState::Running);

        thread::sleep(Duration::from_millis(200));
        let report = coordinator.shutdown().expect("shutdown");
        assert_eq!(coordinator.state(), PipelineState::Stopped);

        assert!(report.generated > 0);
        assert!(report.efficiency_percent >= 0.0 && report.efficiency_percent <= 100.0);
        assert_eq!(report.workers.len(), 3);
    }

    #[test]
    fn test_run_conserves_items() {
        let report = Coordinator::new(quick_config())
            .expect("create coordinator")
            .run()
            .expect("run");

        assert_eq!(
            report.generated,
            report.processed_total + report.returns_dropped + report.remaining_in_queue as u64
        );
    }

    #[test]
    fn test_report_covers_all_kinds() {
        let report = Coordinator::new(quick_config())
            .expect("create coordinator")
            .run()
            .expect("run");

        assert!(report.processed_per_kind.contains_key("XML"));
        assert!(report.processed_per_kind.contains_key("JSON"));
        assert!(report.processed_per_kind.contains_key("XLS"));
    }

    #[test]
    fn test_run_without_workers() {
        let config = quick_config()
            .with_default_workers(0)
            .with_queue_capacity(1)
            .with_interval_range(1..=2)
            .with_enqueue_timeout(Duration::from_millis(2))
            .with_drain_period(Duration::from_millis(20));

        let report = Coordinator::new(config)
            .expect("create coordinator")
            .run()
            .expect("run");

        assert_eq!(report.processed_total, 0);
        assert_eq!(report.generated, 1);
        assert!(report.rejected >= 1);
        assert_eq!(report.remaining_in_queue, 1);
        assert_eq!(report.efficiency_percent, 0.0);
    }
}
