//! Convenient re-exports of the most commonly used types.

pub use crate::core::{
    CancellationReason, CancellationToken, FileKind, PipelineError, Result, WorkItem, WorkKind,
};
pub use crate::pipeline::{
    Coordinator, PipelineConfig, PipelineReport, PipelineState, WorkerReport,
};
pub use crate::queue::{BoundedQueue, ItemQueue, QueueError};
