//! Error types for session handling

use thiserror::Error;

/// Result type alias for session operations
pub type Result<T> = std::result::Result<T, SessionError>;

/// Session-specific errors
#[derive(Debug, Error)]
pub enum SessionError {
    /// The identifying string failed validation
    #[error("Invalid identity: {0}")]
    InvalidIdentity(String),

    /// A turn failed while streaming
    #[error(transparent)]
    Turn(#[from] finvault_core::Error),
}
