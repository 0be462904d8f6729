//! Configuration for evidence extraction

use crate::api::sec_edgar::FormType;
use crate::error::{EvidenceError, Result};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for evidence extraction operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvidenceConfig {
    /// Lookback window for historical prices, in days before as-of
    pub lookback_days: i64,

    /// Filing form type the section extractor resolves
    pub filing_form: FormType,

    /// Cache TTL for formatted price evidence
    pub cache_ttl_prices: Duration,

    /// Cache TTL for formatted filing evidence
    pub cache_ttl_filings: Duration,

    /// Request timeout duration
    pub request_timeout: Duration,

    /// Maximum characters kept from a narrative filing section
    pub max_narrative_chars: usize,

    /// Reporting periods shown per financial statement
    pub statement_periods: usize,
}

impl Default for EvidenceConfig {
    fn default() -> Self {
        Self {
            lookback_days: 90,
            filing_form: FormType::Form10Q,
            cache_ttl_prices: Duration::from_secs(300),    // 5 minutes
            cache_ttl_filings: Duration::from_secs(3600),  // 1 hour
            request_timeout: Duration::from_secs(30),
            max_narrative_chars: 20_000,
            statement_periods: 2,
        }
    }
}

impl EvidenceConfig {
    /// Create a new configuration builder
    pub fn builder() -> EvidenceConfigBuilder {
        EvidenceConfigBuilder::default()
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.lookback_days <= 0 {
            return Err(EvidenceError::Config(
                "lookback_days must be positive".to_string(),
            ));
        }
        if self.statement_periods == 0 {
            return Err(EvidenceError::Config(
                "statement_periods must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Builder for EvidenceConfig
#[derive(Debug, Default)]
pub struct EvidenceConfigBuilder {
    lookback_days: Option<i64>,
    filing_form: Option<FormType>,
    cache_ttl_prices: Option<Duration>,
    cache_ttl_filings: Option<Duration>,
    request_timeout: Option<Duration>,
    max_narrative_chars: Option<usize>,
    statement_periods: Option<usize>,
}

impl EvidenceConfigBuilder {
    /// Set the price lookback window in days
    pub fn lookback_days(mut self, days: i64) -> Self {
        self.lookback_days = Some(days);
        self
    }

    /// Set the filing form type
    pub fn filing_form(mut self, form: FormType) -> Self {
        self.filing_form = Some(form);
        self
    }

    /// Set cache TTL for price evidence
    pub fn cache_ttl_prices(mut self, duration: Duration) -> Self {
        self.cache_ttl_prices = Some(duration);
        self
    }

    /// Set cache TTL for filing evidence
    pub fn cache_ttl_filings(mut self, duration: Duration) -> Self {
        self.cache_ttl_filings = Some(duration);
        self
    }

    /// Set request timeout
    pub fn request_timeout(mut self, duration: Duration) -> Self {
        self.request_timeout = Some(duration);
        self
    }

    /// Set the maximum narrative section length
    pub fn max_narrative_chars(mut self, chars: usize) -> Self {
        self.max_narrative_chars = Some(chars);
        self
    }

    /// Set the reporting periods shown per statement
    pub fn statement_periods(mut self, periods: usize) -> Self {
        self.statement_periods = Some(periods);
        self
    }

    /// Build the configuration
    pub fn build(self) -> Result<EvidenceConfig> {
        let defaults = EvidenceConfig::default();

        let config = EvidenceConfig {
            lookback_days: self.lookback_days.unwrap_or(defaults.lookback_days),
            filing_form: self.filing_form.unwrap_or(defaults.filing_form),
            cache_ttl_prices: self.cache_ttl_prices.unwrap_or(defaults.cache_ttl_prices),
            cache_ttl_filings: self.cache_ttl_filings.unwrap_or(defaults.cache_ttl_filings),
            request_timeout: self.request_timeout.unwrap_or(defaults.request_timeout),
            max_narrative_chars: self
                .max_narrative_chars
                .unwrap_or(defaults.max_narrative_chars),
            statement_periods: self.statement_periods.unwrap_or(defaults.statement_periods),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EvidenceConfig::default();
        assert_eq!(config.lookback_days, 90);
        assert_eq!(config.filing_form, FormType::Form10Q);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_builder() {
        let config = EvidenceConfig::builder()
            .lookback_days(30)
            .statement_periods(4)
            .build()
            .unwrap();

        assert_eq!(config.lookback_days, 30);
        assert_eq!(config.statement_periods, 4);
    }

    #[test]
    fn test_validation_rejects_zero_lookback() {
        assert!(EvidenceConfig::builder().lookback_days(0).build().is_err());
    }
}
