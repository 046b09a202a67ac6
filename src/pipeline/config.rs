//! Configuration for a pipeline run.
//!
//! All knobs are static for a run: capacity, worker replicas per kind, the
//! run duration, and every timeout the actors use. Defaults reproduce the
//! file-processing simulation (5-slot queue, two workers per kind, 20 s
//! run, size x 7 ms processing cost).

use crate::core::{PipelineError, Result, WorkKind};
use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::time::Duration;

/// Configuration for a bounded work pipeline.
///
/// # Example
///
/// ```rust
/// use rust_work_pipeline::prelude::*;
/// use std::time::Duration;
///
/// let config = PipelineConfig::<FileKind>::new()
///     .with_queue_capacity(8)
///     .workers_for(FileKind::Xml, 3)
///     .workers_for(FileKind::Json, 1)
///     .with_run_duration(Duration::from_secs(10))
///     .with_cost_factor_ms(7);
///
/// assert_eq!(config.get_workers_for(FileKind::Xml), 3);
/// assert_eq!(config.get_workers_for(FileKind::Xls), 2); // default
/// ```
#[derive(Clone, Debug)]
pub struct PipelineConfig<K: WorkKind> {
    /// Maximum queue occupancy; must be greater than 0.
    pub queue_capacity: usize,

    /// Worker replicas per kind.
    pub workers_per_kind: HashMap<K, usize>,

    /// Default replica count for kinds not explicitly configured.
    ///
    /// Zero is legal: a run without consumers still exercises the
    /// generator and the queue's rejection accounting.
    pub default_workers: usize,

    /// How long the coordinator holds the pipeline in its running state.
    pub run_duration: Duration,

    /// Window the generator waits for free capacity before rejecting an
    /// item.
    pub enqueue_timeout: Duration,

    /// Window a worker waits for an item before re-checking its stop flag.
    pub dequeue_timeout: Duration,

    /// Window a worker waits to return a foreign-kind item to the queue.
    pub return_timeout: Duration,

    /// Pause after a worker returns a foreign-kind item, so mismatched
    /// workers and the same re-surfacing item do not busy-loop.
    pub mismatch_backoff: Duration,

    /// Range the generator draws item sizes from.
    pub size_range: RangeInclusive<u32>,

    /// Simulated processing cost per size unit, in milliseconds.
    pub cost_factor_ms: u64,

    /// Range the generator draws its inter-item pause from, in
    /// milliseconds.
    pub interval_range: RangeInclusive<u64>,

    /// Grace period after the generator stops, letting workers empty the
    /// queue before they are stopped themselves.
    pub drain_period: Duration,

    /// How long the coordinator waits for each actor to confirm its stop.
    pub join_timeout: Duration,

    /// Delay between worker startups; keeps the interleaved startup logs
    /// readable and has no correctness role.
    pub startup_stagger: Duration,

    /// Prefix for actor thread names.
    pub thread_name_prefix: String,
}

impl<K: WorkKind> Default for PipelineConfig<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: WorkKind> PipelineConfig<K> {
    /// Creates a configuration with the simulation's defaults.
    ///
    /// Default values:
    /// - queue capacity 5, 2 workers per kind
    /// - 20 s run, 3 s drain, 2 s join window
    /// - 100 ms enqueue / 500 ms dequeue / 100 ms return timeouts,
    ///   50 ms mismatch backoff
    /// - sizes 10..=100, cost factor 7 ms, generator pause 100..=1000 ms
    #[must_use]
    pub fn new() -> Self {
        Self {
            queue_capacity: 5,
            workers_per_kind: HashMap::new(),
            default_workers: 2,
            run_duration: Duration::from_secs(20),
            enqueue_timeout: Duration::from_millis(100),
            dequeue_timeout: Duration::from_millis(500),
            return_timeout: Duration::from_millis(100),
            mismatch_backoff: Duration::from_millis(50),
            size_range: 10..=100,
            cost_factor_ms: 7,
            interval_range: 100..=1000,
            drain_period: Duration::from_millis(3000),
            join_timeout: Duration::from_millis(2000),
            startup_stagger: Duration::from_millis(100),
            thread_name_prefix: "pipeline".to_string(),
        }
    }

    /// Sets the queue capacity.
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_queue_capacity(mut self, capacity: usize) -> Self {
        self.queue_capacity = capacity;
        self
    }

    /// Sets the worker replica count for a specific kind.
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn workers_for(mut self, kind: K, count: usize) -> Self {
        self.workers_per_kind.insert(kind, count);
        self
    }

    /// Sets the default replica count for unconfigured kinds.
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_default_workers(mut self, count: usize) -> Self {
        self.default_workers = count;
        self
    }

    /// Sets the run duration.
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_run_duration(mut self, duration: Duration) -> Self {
        self.run_duration = duration;
        self
    }

    /// Sets the generator's enqueue timeout.
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_enqueue_timeout(mut self, timeout: Duration) -> Self {
        self.enqueue_timeout = timeout;
        self
    }

    /// Sets the workers' dequeue timeout.
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_dequeue_timeout(mut self, timeout: Duration) -> Self {
        self.dequeue_timeout = timeout;
        self
    }

    /// Sets the workers' return timeout for foreign-kind items.
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_return_timeout(mut self, timeout: Duration) -> Self {
        self.return_timeout = timeout;
        self
    }

    /// Sets the pause after a mismatched dequeue.
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_mismatch_backoff(mut self, backoff: Duration) -> Self {
        self.mismatch_backoff = backoff;
        self
    }

    /// Sets the item size range.
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_size_range(mut self, range: RangeInclusive<u32>) -> Self {
        self.size_range = range;
        self
    }

    /// Sets the processing cost per size unit, in milliseconds.
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_cost_factor_ms(mut self, factor: u64) -> Self {
        self.cost_factor_ms = factor;
        self
    }

    /// Sets the generator's inter-item pause range, in milliseconds.
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_interval_range(mut self, range: RangeInclusive<u64>) -> Self {
        self.interval_range = range;
        self
    }

    /// Sets the post-generator drain grace period.
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_drain_period(mut self, period: Duration) -> Self {
        self.drain_period = period;
        self
    }

    /// Sets the per-actor stop confirmation window.
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_join_timeout(mut self, timeout: Duration) -> Self {
        self.join_timeout = timeout;
        self
    }

    /// Sets the delay between worker startups.
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_startup_stagger(mut self, stagger: Duration) -> Self {
        self.startup_stagger = stagger;
        self
    }

    /// Sets the actor thread name prefix.
    #[must_use = "builder methods return a new value and do not modify the original"]
    pub fn with_thread_name_prefix<S: Into<String>>(mut self, prefix: S) -> Self {
        self.thread_name_prefix = prefix.into();
        self
    }

    /// Returns the worker replica count for a kind.
    pub fn get_workers_for(&self, kind: K) -> usize {
        self.workers_per_kind
            .get(&kind)
            .copied()
            .unwrap_or(self.default_workers)
    }

    /// Returns the total number of workers across all kinds.
    pub fn total_workers(&self) -> usize {
        K::all_variants()
            .iter()
            .map(|k| self.get_workers_for(*k))
            .sum()
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.queue_capacity == 0 {
            return Err(PipelineError::invalid_config(
                "queue_capacity",
                "must be greater than 0",
            ));
        }
        if self.size_range.is_empty() {
            return Err(PipelineError::invalid_config(
                "size_range",
                "range must not be empty",
            ));
        }
        if self.interval_range.is_empty() {
            return Err(PipelineError::invalid_config(
                "interval_range",
                "range must not be empty",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::FileKind;

    #[test]
    fn test_default_config() {
        let config = PipelineConfig::<FileKind>::new();
        assert_eq!(config.queue_capacity, 5);
        assert_eq!(config.default_workers, 2);
        assert_eq!(config.run_duration, Duration::from_secs(20));
        assert_eq!(config.enqueue_timeout, Duration::from_millis(100));
        assert_eq!(config.dequeue_timeout, Duration::from_millis(500));
        assert_eq!(config.cost_factor_ms, 7);
        assert_eq!(config.size_range, 10..=100);
    }

    #[test]
    fn test_workers_for() {
        let config = PipelineConfig::<FileKind>::new().workers_for(FileKind::Json, 4);
        assert_eq!(config.get_workers_for(FileKind::Json), 4);
        assert_eq!(config.get_workers_for(FileKind::Xml), 2);
    }

    #[test]
    fn test_zero_workers_is_legal() {
        let config = PipelineConfig::<FileKind>::new().with_default_workers(0);
        assert_eq!(config.total_workers(), 0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_total_workers() {
        let config = PipelineConfig::<FileKind>::new()
            .workers_for(FileKind::Xml, 3)
            .workers_for(FileKind::Json, 1);
        // Xml: 3, Json: 1, Xls: 2 (default)
        assert_eq!(config.total_workers(), 3 + 1 + 2);
    }

    #[test]
    fn test_validate_rejects_zero_capacity() {
        let config = PipelineConfig::<FileKind>::new().with_queue_capacity(0);
        assert!(matches!(
            config.validate(),
            Err(PipelineError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_empty_size_range() {
        #[allow(clippy::reversed_empty_ranges)]
        let config = PipelineConfig::<FileKind>::new().with_size_range(50..=10);
        assert!(matches!(
            config.validate(),
            Err(PipelineError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_empty_interval_range() {
        #[allow(clippy::reversed_empty_ranges)]
        let config = PipelineConfig::<FileKind>::new().with_interval_range(10..=1);
        assert!(matches!(
            config.validate(),
            Err(PipelineError::InvalidConfig { .. })
        ));
    }

    #[test]
    fn test_builder_chain() {
        let config = PipelineConfig::<FileKind>::new()
            .with_queue_capacity(16)
            .with_run_duration(Duration::from_secs(5))
            .with_drain_period(Duration::from_millis(500))
            .with_thread_name_prefix("sim");
        assert_eq!(config.queue_capacity, 16);
        assert_eq!(config.thread_name_prefix, "sim");
        assert!(config.validate().is_ok());
    }
}
