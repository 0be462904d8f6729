//! Tool for fetching weekly historical price evidence

use async_trait::async_trait;
use chrono::{Duration, Utc};
use finvault_core::Result as CoreResult;
use finvault_tools::Tool;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

use crate::api::yahoo::YahooFinanceClient;
use crate::cache::{CacheKey, EvidenceCache};
use crate::config::EvidenceConfig;
use crate::error::Result;
use crate::format::format_prices;
use crate::resample::resample_weekly;
use crate::ticker::validate_ticker;

/// Tool that fetches weekly historical closing prices
///
/// Total from the pipeline's perspective: fetch failures come back as
/// descriptive in-band text, never an error. Only malformed parameters are
/// rejected.
pub struct HistoricalPriceTool {
    yahoo_client: YahooFinanceClient,
    cache: EvidenceCache,
    config: Arc<EvidenceConfig>,
}

#[derive(Debug, Deserialize)]
struct PriceParams {
    ticker: String,
}

impl HistoricalPriceTool {
    /// Create a new historical price tool
    pub fn new(config: Arc<EvidenceConfig>) -> Self {
        Self {
            yahoo_client: YahooFinanceClient::new(),
            cache: EvidenceCache::new(config.cache_ttl_prices),
            config,
        }
    }

    async fn fetch_evidence(&self, ticker: &str) -> Result<String> {
        let as_of = Utc::now().date_naive();
        let start = as_of - Duration::days(self.config.lookback_days);

        let samples = self.yahoo_client.daily_closes(ticker, start, as_of).await?;
        let weekly = resample_weekly(&samples, as_of);
        Ok(format_prices(&weekly))
    }

    /// Fetch the price evidence for a validated ticker, recovering fetch
    /// failures into in-band text
    pub async fn evidence_text(&self, ticker: &str) -> String {
        let key = CacheKey::new(
            ticker,
            "historical_price",
            json!({ "lookback_days": self.config.lookback_days }),
        );

        let result = self
            .cache
            .get_or_fetch(key, || self.fetch_evidence(ticker))
            .await;

        match result {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(ticker, error = %e, "historical price fetch failed");
                format!("An error occurred while fetching historical price for '{ticker}': {e}")
            }
        }
    }
}

#[async_trait]
impl Tool for HistoricalPriceTool {
    async fn execute(&self, params: Value) -> CoreResult<Value> {
        let params: PriceParams = serde_json::from_value(params).map_err(|e| {
            finvault_core::Error::ProcessingFailed(format!("Invalid parameters: {e}"))
        })?;

        // Malformed tickers are caller misuse, rejected before any fetch
        let ticker = validate_ticker(&params.ticker)
            .map_err(|e| finvault_core::Error::ProcessingFailed(e.to_string()))?;

        Ok(Value::String(self.evidence_text(&ticker).await))
    }

    fn name(&self) -> &'static str {
        "get_historical_price"
    }

    fn description(&self) -> &'static str {
        "Fetch weekly historical stock closing prices for a given company ticker \
         over the last 90 days. Returns one dated close per week."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "ticker": {
                    "type": "string",
                    "description": "Stock ticker symbol (e.g., 'NVDA', 'AMD')"
                }
            },
            "required": ["ticker"]
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tool() -> HistoricalPriceTool {
        HistoricalPriceTool::new(Arc::new(EvidenceConfig::default()))
    }

    #[tokio::test]
    async fn test_rejects_malformed_params() {
        let result = tool().execute(json!({ "symbol": "NVDA" })).await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_rejects_malformed_ticker_before_fetch() {
        let result = tool().execute(json!({ "ticker": "NV$DA" })).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_schema_names_ticker() {
        let schema = tool().input_schema();
        assert_eq!(schema["required"], json!(["ticker"]));
    }

    #[tokio::test]
    #[ignore] // Requires network access
    async fn test_live_price_evidence() {
        let result = tool().execute(json!({ "ticker": "AAPL" })).await.unwrap();
        let text = result.as_str().unwrap();
        assert!(text.starts_with("<prices>"));
        assert!(text.ends_with("</prices>"));
    }
}
