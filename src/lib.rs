//! # Rust Work Pipeline
//!
//! A bounded-capacity producer/consumer pipeline with kind-routed workers,
//! demonstrable backpressure, and graceful drain-and-stop shutdown.
//!
//! ## Features
//!
//! - **Bounded Queue**: Fixed-capacity FIFO work buffer with blocking and
//!   timed enqueue/dequeue built on crossbeam channels
//! - **Typed Work Items**: Immutable items with a closed kind set and a
//!   synthetic processing cost
//! - **Kind-Bound Workers**: Each worker consumes exactly one kind and
//!   returns foreign items to the queue tail
//! - **Backpressure**: Full-queue offers time out and are counted as
//!   rejections, never retried
//! - **Graceful Shutdown**: Two-phase stop (producer first, drain grace
//!   period, then consumers) with bounded joins
//! - **Runtime Statistics**: Single-writer counters per actor, aggregated
//!   into a serializable final report
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use rust_work_pipeline::prelude::*;
//! use std::time::Duration;
//!
//! fn main() -> Result<()> {
//!     let config = PipelineConfig::<FileKind>::new()
//!         .with_queue_capacity(5)
//!         .with_run_duration(Duration::from_secs(20));
//!
//!     let coordinator = Coordinator::new(config)?;
//!     let report = coordinator.run()?;
//!
//!     println!("{}", report);
//!     Ok(())
//! }
//! ```
//!
//! ## Configuration
//!
//! ```rust
//! use rust_work_pipeline::prelude::*;
//! use std::time::Duration;
//!
//! let config = PipelineConfig::<FileKind>::new()
//!     .with_queue_capacity(8)
//!     .workers_for(FileKind::Xml, 3)
//!     .with_default_workers(1)
//!     .with_run_duration(Duration::from_secs(5));
//!
//! assert!(config.validate().is_ok());
//! ```
//!
//! ## Custom Kinds
//!
//! The pipeline is generic over [`WorkKind`]; any closed enum works:
//!
//! ```rust
//! use rust_work_pipeline::WorkKind;
//!
//! #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
//! enum SensorKind {
//!     Temperature,
//!     Pressure,
//! }
//!
//! impl WorkKind for SensorKind {
//!     fn all_variants() -> &'static [Self] {
//!         &[Self::Temperature, Self::Pressure]
//!     }
//! }
//! ```
//!
//! ## Final Report
//!
//! ```rust,ignore
//! let report = coordinator.run()?;
//! println!("generated={} processed={} efficiency={:.1}%",
//!     report.generated,
//!     report.processed_total,
//!     report.efficiency_percent);
//! println!("{}", report.to_json()?);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod core;
pub mod pipeline;
pub mod prelude;
pub mod queue;

pub use crate::core::{
    CancellationReason, CancellationToken, FileKind, PipelineError, Result, WorkItem, WorkKind,
};
pub use crate::pipeline::{Coordinator, PipelineConfig, PipelineReport, PipelineState};
pub use crate::queue::{BoundedQueue, ItemQueue, QueueError};
