//! Per-actor counters and the aggregated final report.
//!
//! Every counter has exactly one writer: the generator owns its admission
//! and rejection counts, each worker owns its processed/returned counts.
//! The coordinator only reads them after the owning actor has stopped, so
//! no locking is needed beyond the atomics themselves.

use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Statistics owned by the generator.
#[derive(Debug, Default)]
pub struct GeneratorStats {
    generated: AtomicU64,
    rejected: AtomicU64,
}

impl GeneratorStats {
    /// Creates a new generator statistics tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a successful admission into the queue.
    pub fn record_admission(&self) {
        self.generated.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a rejected (dropped) item.
    pub fn record_rejection(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns the number of items admitted into the queue.
    pub fn generated(&self) -> u64 {
        self.generated.load(Ordering::Relaxed)
    }

    /// Returns the number of items rejected at enqueue time.
    pub fn rejected(&self) -> u64 {
        self.rejected.load(Ordering::Relaxed)
    }
}

/// Statistics owned by a single worker.
#[derive(Debug, Default)]
pub struct WorkerStats {
    processed: AtomicU64,
    returned: AtomicU64,
    returns_dropped: AtomicU64,
    processing_time_us: AtomicU64,
    time_in_system: Mutex<TimeInSystemTracker>,
}

impl WorkerStats {
    /// Creates a new worker statistics tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a completed item with its execution time and the total time
    /// the item spent in the system.
    pub fn record_processed(&self, execution: Duration, time_in_system: Duration) {
        self.processed.fetch_add(1, Ordering::Relaxed);
        self.processing_time_us
            .fetch_add(execution.as_micros() as u64, Ordering::Relaxed);
        self.time_in_system.lock().record(time_in_system);
    }

    /// Records a foreign-kind item successfully returned to the queue.
    pub fn record_returned(&self) {
        self.returned.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a foreign-kind item dropped because the queue was full at
    /// return time.
    pub fn record_return_dropped(&self) {
        self.returns_dropped.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns the number of items this worker processed.
    pub fn processed(&self) -> u64 {
        self.processed.load(Ordering::Relaxed)
    }

    /// Returns the number of foreign-kind items returned to the queue.
    pub fn returned(&self) -> u64 {
        self.returned.load(Ordering::Relaxed)
    }

    /// Returns the number of foreign-kind items dropped on a failed return.
    pub fn returns_dropped(&self) -> u64 {
        self.returns_dropped.load(Ordering::Relaxed)
    }

    /// Returns the total time spent in simulated processing.
    pub fn total_processing_time(&self) -> Duration {
        Duration::from_micros(self.processing_time_us.load(Ordering::Relaxed))
    }

    /// Returns the average time processed items spent in the system, from
    /// creation to completion.
    pub fn avg_time_in_system(&self) -> Duration {
        self.time_in_system.lock().average()
    }

    /// Returns the longest time a processed item spent in the system.
    pub fn max_time_in_system(&self) -> Duration {
        self.time_in_system.lock().max
    }
}

/// Tracks time-in-system measurements for completed items.
#[derive(Debug, Default)]
struct TimeInSystemTracker {
    total: Duration,
    max: Duration,
    count: u64,
}

impl TimeInSystemTracker {
    fn record(&mut self, duration: Duration) {
        self.total += duration;
        self.max = self.max.max(duration);
        self.count += 1;
    }

    fn average(&self) -> Duration {
        if self.count == 0 {
            Duration::ZERO
        } else {
            self.total / self.count as u32
        }
    }
}

/// Final per-worker summary included in the [`PipelineReport`].
#[derive(Clone, Debug, Serialize)]
pub struct WorkerReport {
    /// Worker (thread) name.
    pub name: String,
    /// Kind this worker was bound to.
    pub kind: String,
    /// Items processed by this worker.
    pub processed: u64,
    /// Foreign-kind items returned to the queue.
    pub returned: u64,
    /// Foreign-kind items dropped on a failed return.
    pub returns_dropped: u64,
    /// Whether the worker confirmed its stop within the join window.
    pub confirmed_stop: bool,
}

/// Aggregated statistics for a completed pipeline run.
///
/// Counters are read after the owning actors have stopped. For a clean run,
/// `generated == processed_total + returns_dropped + remaining_in_queue`;
/// `generated + rejected` is the total number of items the generator
/// created.
#[derive(Clone, Debug, Serialize)]
pub struct PipelineReport {
    /// Wall-clock start of the run.
    pub started_at: DateTime<Utc>,
    /// Wall-clock end of the run.
    pub finished_at: DateTime<Utc>,
    /// Items admitted into the queue by the generator.
    pub generated: u64,
    /// Items rejected at enqueue time under full-queue conditions.
    pub rejected: u64,
    /// Items processed across all workers.
    pub processed_total: u64,
    /// Items processed, broken down by kind name.
    pub processed_per_kind: BTreeMap<String, u64>,
    /// Foreign-kind items returned to the queue across all workers.
    pub returned_total: u64,
    /// Foreign-kind items dropped on failed returns across all workers.
    pub returns_dropped: u64,
    /// Items still sitting in the queue when the pipeline stopped.
    pub remaining_in_queue: usize,
    /// `processed / generated` as a percentage; 0 when nothing was
    /// generated.
    pub efficiency_percent: f64,
    /// Per-worker breakdown.
    pub workers: Vec<WorkerReport>,
    /// Actors that did not confirm their stop within the join window.
    pub unconfirmed_stops: Vec<String>,
}

impl PipelineReport {
    /// Computes the efficiency percentage, defined as
    /// `processed / generated * 100`, or 0 when nothing was generated.
    pub fn compute_efficiency(processed: u64, generated: u64) -> f64 {
        if generated == 0 {
            0.0
        } else {
            (processed as f64 / generated as f64) * 100.0
        }
    }

    /// Renders the report as pretty-printed JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for PipelineReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Pipeline summary")?;
        writeln!(f, "  Items generated:      {}", self.generated)?;
        writeln!(f, "  Items rejected:       {}", self.rejected)?;
        writeln!(f, "  Items processed:      {}", self.processed_total)?;
        for (kind, count) in &self.processed_per_kind {
            writeln!(f, "    {}: {}", kind, count)?;
        }
        writeln!(
            f,
            "  Items returned:       {} ({} dropped on return)",
            self.returned_total, self.returns_dropped
        )?;
        writeln!(f, "  Items left in queue:  {}", self.remaining_in_queue)?;
        writeln!(f, "  Efficiency:           {:.1}%", self.efficiency_percent)?;
        for worker in &self.workers {
            writeln!(
                f,
                "  {} [{}]: processed={} returned={}",
                worker.name, worker.kind, worker.processed, worker.returned
            )?;
        }
        for actor in &self.unconfirmed_stops {
            writeln!(f, "  WARNING: {} did not confirm stop", actor)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generator_stats() {
        let stats = GeneratorStats::new();
        stats.record_admission();
        stats.record_admission();
        stats.record_rejection();
        assert_eq!(stats.generated(), 2);
        assert_eq!(stats.rejected(), 1);
    }

    #[test]
    fn test_worker_stats_processed() {
        let stats = WorkerStats::new();
        stats.record_processed(Duration::from_millis(70), Duration::from_millis(100));
        stats.record_processed(Duration::from_millis(30), Duration::from_millis(200));

        assert_eq!(stats.processed(), 2);
        assert_eq!(stats.total_processing_time(), Duration::from_millis(100));
        assert_eq!(stats.avg_time_in_system(), Duration::from_millis(150));
        assert_eq!(stats.max_time_in_system(), Duration::from_millis(200));
    }

    #[test]
    fn test_worker_stats_returns() {
        let stats = WorkerStats::new();
        stats.record_returned();
        stats.record_returned();
        stats.record_return_dropped();
        assert_eq!(stats.returned(), 2);
        assert_eq!(stats.returns_dropped(), 1);
    }

    #[test]
    fn test_avg_time_in_system_empty() {
        let stats = WorkerStats::new();
        assert_eq!(stats.avg_time_in_system(), Duration::ZERO);
    }

    #[test]
    fn test_efficiency() {
        assert!((PipelineReport::compute_efficiency(8, 10) - 80.0).abs() < 0.01);
        assert!((PipelineReport::compute_efficiency(10, 10) - 100.0).abs() < 0.01);
    }

    #[test]
    fn test_efficiency_zero_generated() {
        assert_eq!(PipelineReport::compute_efficiency(0, 0), 0.0);
    }

    fn sample_report() -> PipelineReport {
        let mut per_kind = BTreeMap::new();
        per_kind.insert("JSON".to_string(), 4);
        per_kind.insert("XML".to_string(), 3);
        PipelineReport {
            started_at: Utc::now(),
            finished_at: Utc::now(),
            generated: 10,
            rejected: 2,
            processed_total: 7,
            processed_per_kind: per_kind,
            returned_total: 5,
            returns_dropped: 1,
            remaining_in_queue: 2,
            efficiency_percent: PipelineReport::compute_efficiency(7, 10),
            workers: vec![WorkerReport {
                name: "pipeline-XML-0".to_string(),
                kind: "XML".to_string(),
                processed: 3,
                returned: 5,
                returns_dropped: 1,
                confirmed_stop: true,
            }],
            unconfirmed_stops: Vec::new(),
        }
    }

    #[test]
    fn test_report_display() {
        let rendered = sample_report().to_string();
        assert!(rendered.contains("Items generated:      10"));
        assert!(rendered.contains("XML: 3"));
        assert!(rendered.contains("Efficiency:           70.0%"));
        assert!(!rendered.contains("WARNING"));
    }

    #[test]
    fn test_report_display_unconfirmed() {
        let mut report = sample_report();
        report.unconfirmed_stops.push("pipeline-XML-0".to_string());
        assert!(report.to_string().contains("did not confirm stop"));
    }

    #[test]
    fn test_report_to_json() {
        let json = sample_report().to_json().unwrap();
        assert!(json.contains("\"generated\": 10"));
        assert!(json.contains("\"efficiency_percent\""));
    }
}
