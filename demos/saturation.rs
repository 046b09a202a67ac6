//! Backpressure demo
//!
//! A single-slot queue with no workers at all: the first item is admitted,
//! everything after it times out at the enqueue window and is rejected.
//!
//! Run with: RUST_LOG=info cargo run --example saturation

use rust_work_pipeline::prelude::*;
use std::time::Duration;

fn main() -> Result<()> {
    env_logger::init();

    println!("=== Saturated Queue (no consumers) ===\n");

    let config = PipelineConfig::<FileKind>::new()
        .with_queue_capacity(1)
        .with_default_workers(0)
        .with_interval_range(1..=10)
        .with_enqueue_timeout(Duration::from_millis(20))
        .with_run_duration(Duration::from_secs(3))
        .with_drain_period(Duration::from_millis(100));

    let coordinator = Coordinator::new(config)?;
    let report = coordinator.run()?;

    println!("{}", report);
    println!(
        "{} of {} created items were rejected under backpressure",
        report.rejected,
        report.generated + report.rejected
    );

    Ok(())
}
