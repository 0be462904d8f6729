//! Ticker symbol validation

use crate::error::{EvidenceError, Result};

const MAX_TICKER_LEN: usize = 10;

/// Validate and normalize a ticker symbol
///
/// Tickers are uppercased; anything empty, overlong, or containing
/// characters outside ASCII alphanumerics plus `.`/`-` is rejected before
/// any network work happens.
pub fn validate_ticker(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(EvidenceError::InvalidTicker("empty symbol".to_string()));
    }
    if trimmed.len() > MAX_TICKER_LEN {
        return Err(EvidenceError::InvalidTicker(trimmed.to_string()));
    }
    if !trimmed
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-')
    {
        return Err(EvidenceError::InvalidTicker(trimmed.to_string()));
    }
    Ok(trimmed.to_uppercase())
}
