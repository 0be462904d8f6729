//! Error types for finvault-core

use thiserror::Error;

/// Result type alias for finvault-core
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for turn-processing operations
#[derive(Error, Debug)]
pub enum Error {
    /// Generic error message
    #[error("{0}")]
    Generic(String),

    /// Component initialization failed
    #[error("Initialization failed: {0}")]
    InitializationFailed(String),

    /// Processing a turn failed
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),

    /// The agent pipeline failed while producing fragments
    #[error("Pipeline failed: {0}")]
    PipelineFailed(String),

    /// Applying a render instruction to the presentation layer failed
    #[error("Render failed: {0}")]
    RenderFailed(String),
}
