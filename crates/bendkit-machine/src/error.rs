//! Error types for press brake execution

use thiserror::Error;

/// Profile export failure
#[derive(Error, Debug)]
pub enum ExportError {
    /// Writing the artifact failed
    #[error("I/O error while exporting profile: {0}")]
    Io(#[from] std::io::Error),

    /// Encoding the snapshot failed
    #[error("failed to encode profile: {0}")]
    Encode(#[from] serde_json::Error),

    /// The exporter refused the snapshot
    #[error("export rejected: {0}")]
    Rejected(String),
}

/// Failure of one execution run
#[derive(Error, Debug)]
pub enum ExecutionError {
    /// The press brake refused the job
    #[error(transparent)]
    Engine(#[from] bendkit_core::Error),

    /// The part was bent but the profile could not be exported
    #[error("job processed (parts this session: {parts_bent_session}) but export failed: {source}")]
    Export {
        /// Counter value after the successful bend.
        parts_bent_session: u64,
        #[source]
        source: ExportError,
    },

    /// The executor task is no longer running
    #[error("press brake executor has stopped")]
    ExecutorStopped,
}

impl ExecutionError {
    /// Whether the press did bend the part despite the error
    pub fn part_was_bent(&self) -> bool {
        matches!(self, ExecutionError::Export { .. })
    }
}

/// Result type for execution operations
pub type ExecutionResult<T> = std::result::Result<T, ExecutionError>;
