//! Yahoo Finance API client

use crate::error::{EvidenceError, Result};
use chrono::{DateTime, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use yahoo_finance_api as yahoo;

/// One daily closing price
///
/// Dates are timezone-naive calendar dates; any timezone component on the
/// upstream timestamp is stripped before comparison or formatting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceSample {
    pub date: NaiveDate,
    pub close: f64,
}

/// Yahoo Finance API client
pub struct YahooFinanceClient {}

impl YahooFinanceClient {
    /// Create a new Yahoo Finance client
    pub fn new() -> Self {
        Self {}
    }

    /// Fetch daily closing prices for a symbol over a date range
    ///
    /// Returns one sample per trading day, in chronological order.
    pub async fn daily_closes(
        &self,
        symbol: &str,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<PriceSample>> {
        let provider = yahoo::YahooConnector::new()
            .map_err(|e| EvidenceError::YahooFinance(e.to_string()))?;

        // Convert calendar dates to the time crate's timestamps
        let start_odt = OffsetDateTime::from_unix_timestamp(
            start.and_time(NaiveTime::MIN).and_utc().timestamp(),
        )
        .map_err(|e| EvidenceError::YahooFinance(format!("Invalid start timestamp: {e}")))?;
        let end_odt = OffsetDateTime::from_unix_timestamp(
            end.and_time(NaiveTime::MIN).and_utc().timestamp(),
        )
        .map_err(|e| EvidenceError::YahooFinance(format!("Invalid end timestamp: {e}")))?;

        let response = provider
            .get_quote_history(symbol, start_odt, end_odt)
            .await
            .map_err(|e| EvidenceError::YahooFinance(e.to_string()))?;

        let quotes = response
            .quotes()
            .map_err(|e| EvidenceError::YahooFinance(e.to_string()))?;

        if quotes.is_empty() {
            return Err(EvidenceError::DataUnavailable {
                symbol: symbol.to_string(),
                reason: "no quotes returned for the requested range".to_string(),
            });
        }

        let mut samples = Vec::with_capacity(quotes.len());
        for quote in &quotes {
            let date = DateTime::from_timestamp(quote.timestamp as i64, 0)
                .ok_or_else(|| {
                    EvidenceError::YahooFinance(format!(
                        "Invalid quote timestamp: {}",
                        quote.timestamp
                    ))
                })?
                .date_naive();
            samples.push(PriceSample {
                date,
                close: quote.close,
            });
        }

        Ok(samples)
    }
}

impl Default for YahooFinanceClient {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for YahooFinanceClient {
    fn clone(&self) -> Self {
        Self::new()
    }
}
