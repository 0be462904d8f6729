//! Error types for evidence extraction

use thiserror::Error;

/// Evidence-extraction specific errors
///
/// Two families matter to callers: validation errors (`InvalidTicker`,
/// `InvalidSection`) indicate caller misuse and are raised before any
/// extraction work; everything else is a fetch-side failure that the
/// evidence tools recover into in-band text.
#[derive(Debug, Error)]
pub enum EvidenceError {
    /// API request failed
    #[error("API error: {0}")]
    Api(String),

    /// Malformed ticker symbol provided
    #[error("Invalid ticker: {0}")]
    InvalidTicker(String),

    /// Unrecognized filing section identifier
    #[error("Invalid section: {0}")]
    InvalidSection(String),

    /// Data not available for the requested symbol
    #[error("Data not available for {symbol}: {reason}")]
    DataUnavailable { symbol: String, reason: String },

    /// Network or HTTP error
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// JSON parsing error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Yahoo Finance API error
    #[error("Yahoo Finance error: {0}")]
    YahooFinance(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Cache error
    #[error("Cache error: {0}")]
    Cache(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl EvidenceError {
    /// Whether this error indicates caller misuse rather than a transient
    /// external failure
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            EvidenceError::InvalidTicker(_) | EvidenceError::InvalidSection(_)
        )
    }
}

/// Result type alias for evidence operations
pub type Result<T> = std::result::Result<T, EvidenceError>;

/// Convert EvidenceError to finvault_core::Error
impl From<EvidenceError> for finvault_core::Error {
    fn from(err: EvidenceError) -> Self {
        finvault_core::Error::ProcessingFailed(err.to_string())
    }
}

/// Convert anyhow::Error to EvidenceError
impl From<anyhow::Error> for EvidenceError {
    fn from(err: anyhow::Error) -> Self {
        EvidenceError::Other(err.to_string())
    }
}
