//! Custom kind set demo
//!
//! The pipeline is generic over the kind taxonomy: any closed enum
//! implementing `WorkKind` works. Here a sensor-ingest pipeline routes
//! three reading kinds to differently sized worker groups.
//!
//! Run with: RUST_LOG=info cargo run --example custom_kinds

use rust_work_pipeline::prelude::*;
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
enum SensorKind {
    Temperature,
    Pressure,
    Humidity,
}

impl WorkKind for SensorKind {
    fn all_variants() -> &'static [Self] {
        &[Self::Temperature, Self::Pressure, Self::Humidity]
    }
}

fn main() -> Result<()> {
    env_logger::init();

    println!("=== Sensor Ingest Pipeline ===\n");

    let config = PipelineConfig::<SensorKind>::new()
        .with_queue_capacity(8)
        .workers_for(SensorKind::Temperature, 3)
        .workers_for(SensorKind::Pressure, 2)
        .workers_for(SensorKind::Humidity, 1)
        .with_size_range(5..=30)
        .with_cost_factor_ms(4)
        .with_interval_range(20..=200)
        .with_run_duration(Duration::from_secs(5))
        .with_drain_period(Duration::from_millis(1000))
        .with_thread_name_prefix("sensor");

    let coordinator = Coordinator::new(config)?;
    let report = coordinator.run()?;

    println!("{}", report);
    Ok(())
}
