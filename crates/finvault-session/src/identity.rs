//! User identity for SEC EDGAR access
//!
//! SEC EDGAR requires callers to identify themselves. The identity is an
//! opaque address-like string; validation is deliberately shallow (the SEC
//! needs identification, not verification).

use crate::error::{Result, SessionError};
use serde::{Deserialize, Serialize};

/// A validated identifying string for SEC EDGAR access
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgarIdentity(String);

impl EdgarIdentity {
    /// Validate an identifying string
    ///
    /// Accepts anything non-empty that contains an `@` with a `.` somewhere
    /// after it.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(SessionError::InvalidIdentity(
                "identity must not be empty".to_string(),
            ));
        }

        let domain_has_dot = trimmed
            .split_once('@')
            .is_some_and(|(_, domain)| domain.contains('.'));
        if !domain_has_dot {
            return Err(SessionError::InvalidIdentity(format!(
                "'{trimmed}' is not a valid address"
            )));
        }

        Ok(Self(trimmed.to_string()))
    }

    /// The raw identifying string
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The SEC User-Agent string for this identity
    pub fn user_agent(&self) -> String {
        format!("finvault ({})", self.0)
    }
}

impl std::fmt::Display for EdgarIdentity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
