//! Error types for pipeline lifecycle faults.
//!
//! Capacity exhaustion and empty-queue timeouts are *not* errors in this
//! system; they are normal queue outcomes counted as rejections or drops.
//! The variants here cover lifecycle faults only: spawn failures, state
//! misuse, bad configuration, and stop-confirmation timeouts.

/// Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Errors that can occur while driving the pipeline lifecycle
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum PipelineError {
    /// Pipeline is already past its idle state
    #[error("Pipeline '{name}' is already running with {worker_count} workers")]
    AlreadyRunning {
        /// Name of the pipeline
        name: String,
        /// Number of spawned workers
        worker_count: usize,
    },

    /// Pipeline is not running
    #[error("Pipeline '{name}' is not running")]
    NotRunning {
        /// Name of the pipeline
        name: String,
    },

    /// Failed to spawn an actor thread
    #[error("Failed to spawn {actor}: {message}")]
    SpawnError {
        /// Name of the actor that failed to spawn
        actor: String,
        /// Error message
        message: String,
        /// Source IO error
        #[source]
        source: Option<std::io::Error>,
    },

    /// An actor did not confirm its stop within the join window.
    ///
    /// This is a soft fault: the thread is abandoned, not killed, and the
    /// actor is listed in the final report rather than treated as fatal.
    #[error("{actor} did not confirm stop within {timeout_ms}ms")]
    JoinTimeout {
        /// Name of the actor that missed the deadline
        actor: String,
        /// Join window in milliseconds
        timeout_ms: u64,
    },

    /// Failed to join an actor thread
    #[error("Failed to join {actor}: {message}")]
    JoinError {
        /// Name of the actor that failed to join
        actor: String,
        /// Error message
        message: String,
    },

    /// Invalid configuration with parameter
    #[error("Invalid configuration for '{parameter}': {message}")]
    InvalidConfig {
        /// Configuration parameter name
        parameter: String,
        /// Error message
        message: String,
    },

    /// General error
    #[error("{0}")]
    Other(String),
}

impl PipelineError {
    /// Create an already running error
    pub fn already_running(name: impl Into<String>, worker_count: usize) -> Self {
        PipelineError::AlreadyRunning {
            name: name.into(),
            worker_count,
        }
    }

    /// Create a not running error
    pub fn not_running(name: impl Into<String>) -> Self {
        PipelineError::NotRunning { name: name.into() }
    }

    /// Create a spawn error
    pub fn spawn(actor: impl Into<String>, message: impl Into<String>) -> Self {
        PipelineError::SpawnError {
            actor: actor.into(),
            message: message.into(),
            source: None,
        }
    }

    /// Create a spawn error with source
    pub fn spawn_with_source(
        actor: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        PipelineError::SpawnError {
            actor: actor.into(),
            message: message.into(),
            source: Some(source),
        }
    }

    /// Create a join timeout error
    pub fn join_timeout(actor: impl Into<String>, timeout_ms: u64) -> Self {
        PipelineError::JoinTimeout {
            actor: actor.into(),
            timeout_ms,
        }
    }

    /// Create a join error
    pub fn join(actor: impl Into<String>, message: impl Into<String>) -> Self {
        PipelineError::JoinError {
            actor: actor.into(),
            message: message.into(),
        }
    }

    /// Create an invalid config error
    pub fn invalid_config(parameter: impl Into<String>, message: impl Into<String>) -> Self {
        PipelineError::InvalidConfig {
            parameter: parameter.into(),
            message: message.into(),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        PipelineError::Other(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = PipelineError::already_running("file-pipeline", 6);
        assert!(matches!(err, PipelineError::AlreadyRunning { .. }));

        let err = PipelineError::join_timeout("pipeline-XML-2", 2000);
        assert!(matches!(err, PipelineError::JoinTimeout { .. }));

        let err = PipelineError::invalid_config("queue_capacity", "must be greater than 0");
        assert!(matches!(err, PipelineError::InvalidConfig { .. }));
    }

    #[test]
    fn test_error_display() {
        let err = PipelineError::already_running("file-pipeline", 6);
        assert_eq!(
            err.to_string(),
            "Pipeline 'file-pipeline' is already running with 6 workers"
        );

        let err = PipelineError::join_timeout("pipeline-generator", 2000);
        assert_eq!(
            err.to_string(),
            "pipeline-generator did not confirm stop within 2000ms"
        );

        let err = PipelineError::not_running("file-pipeline");
        assert_eq!(err.to_string(), "Pipeline 'file-pipeline' is not running");
    }

    #[test]
    fn test_spawn_error_with_source() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "access denied");
        let err = PipelineError::spawn_with_source("pipeline-XML-0", "Cannot create thread", io_err);

        assert!(matches!(err, PipelineError::SpawnError { .. }));
        assert!(err.to_string().contains("pipeline-XML-0"));
    }
}
