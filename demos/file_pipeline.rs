//! File-processing pipeline demo
//!
//! One generator feeds XML/JSON/XLS items into a 5-slot queue; two workers
//! per kind drain it. Processing an item takes size x 7 ms.
//!
//! Run with: RUST_LOG=debug cargo run --example file_pipeline

use rust_work_pipeline::prelude::*;
use std::time::Duration;

fn main() -> Result<()> {
    env_logger::init();

    println!("=== File Processing Pipeline ===\n");
    println!("Queue capacity:  5");
    println!("Kinds:           XML, JSON, XLS (2 workers each)");
    println!("Item sizes:      10-100");
    println!("Processing time: size x 7 ms");
    println!("Run duration:    20 seconds\n");

    let config = PipelineConfig::<FileKind>::new().with_run_duration(Duration::from_secs(20));

    let coordinator = Coordinator::new(config)?;
    let report = coordinator.run()?;

    println!("\n{}", report);

    let json = report
        .to_json()
        .map_err(|e| PipelineError::other(e.to_string()))?;
    println!("JSON report:\n{}", json);

    Ok(())
}
