//! Error types for the aggregation engine.

/// Error type for engine construction.
#[derive(Debug, thiserror::Error)]
pub enum MaestroError {
    /// The debounce timer needs a tokio runtime to schedule on.
    #[error("no tokio runtime available for the publish timer: {0}")]
    NoRuntime(#[from] tokio::runtime::TryCurrentError),
}

/// Result type for engine operations.
pub type MaestroResult<T> = Result<T, MaestroError>;
