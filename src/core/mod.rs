//! Core types shared by the pipeline actors.

pub mod cancellation;
pub mod error;
pub mod item;

pub use cancellation::{CancellationReason, CancellationToken};
pub use error::{PipelineError, Result};
pub use item::{FileKind, WorkItem, WorkKind};
