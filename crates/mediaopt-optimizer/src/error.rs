use mediaopt_storage::StorageError;

/// Optimization errors
#[derive(Debug, thiserror::Error)]
pub enum OptimizerError {
    #[error("No runnable optimizer found for mime type {mime_type}")]
    OptimizerNotFound { mime_type: String },

    #[error("Optimizer {name} is not runnable: {reason}")]
    NotRunnable { name: String, reason: String },

    #[error("Optimizer {name} exited with {status}: {stderr}")]
    CommandFailed {
        name: String,
        status: String,
        stderr: String,
    },

    #[error("Image processing error: {0}")]
    ImageProcessing(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Storage failures pass through with their original value and message
    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for optimization operations
pub type OptimizerResult<T> = Result<T, OptimizerError>;
