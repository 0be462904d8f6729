//! Tool for fetching SEC filing section evidence

use async_trait::async_trait;
use finvault_core::Result as CoreResult;
use finvault_tools::Tool;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

use crate::api::sec_edgar::SecEdgarClient;
use crate::cache::{CacheKey, EvidenceCache};
use crate::config::EvidenceConfig;
use crate::error::Result;
use crate::filing::{FilingExtract, Section, parse_sections};
use crate::format::format_filing;
use crate::ticker::validate_ticker;

/// Tool that extracts named sections from a company's latest filing
///
/// Unknown section identifiers and malformed tickers are validation errors,
/// rejected before any network work. Fetch-side failures are recovered into
/// descriptive in-band text.
pub struct FilingSectionsTool {
    edgar_client: SecEdgarClient,
    cache: EvidenceCache,
    config: Arc<EvidenceConfig>,
}

#[derive(Debug, Deserialize)]
struct FilingParams {
    ticker: String,
    sections: Vec<String>,
}

impl FilingSectionsTool {
    /// Create a new filing sections tool
    pub fn new(edgar_client: SecEdgarClient, config: Arc<EvidenceConfig>) -> Self {
        Self {
            edgar_client,
            cache: EvidenceCache::new(config.cache_ttl_filings),
            config,
        }
    }

    async fn fetch_evidence(&self, ticker: &str, sections: &[Section]) -> Result<String> {
        let filing = self
            .edgar_client
            .latest_filing(ticker, self.config.filing_form)
            .await?
            .with_max_narrative_chars(self.config.max_narrative_chars)
            .with_statement_periods(self.config.statement_periods);

        let extract = FilingExtract::from_source(&filing, sections).await?;
        Ok(format_filing(&extract))
    }

    /// Fetch the filing evidence for validated inputs, recovering fetch
    /// failures into in-band text
    pub async fn evidence_text(&self, ticker: &str, sections: &[Section]) -> String {
        let section_ids: Vec<&str> = sections.iter().map(|s| s.id()).collect();
        let key = CacheKey::new(
            ticker,
            "filing_sections",
            json!({ "form": self.config.filing_form, "sections": section_ids }),
        );

        let result = self
            .cache
            .get_or_fetch(key, || self.fetch_evidence(ticker, sections))
            .await;

        match result {
            Ok(text) => text,
            Err(e) => {
                tracing::warn!(ticker, error = %e, "filing section fetch failed");
                format!("An error occurred while fetching SEC filing sections for '{ticker}': {e}")
            }
        }
    }
}

#[async_trait]
impl Tool for FilingSectionsTool {
    async fn execute(&self, params: Value) -> CoreResult<Value> {
        let params: FilingParams = serde_json::from_value(params).map_err(|e| {
            finvault_core::Error::ProcessingFailed(format!("Invalid parameters: {e}"))
        })?;

        // Validation happens before any extraction work begins
        let ticker = validate_ticker(&params.ticker)
            .map_err(|e| finvault_core::Error::ProcessingFailed(e.to_string()))?;
        let sections = parse_sections(&params.sections)
            .map_err(|e| finvault_core::Error::ProcessingFailed(e.to_string()))?;

        Ok(Value::String(self.evidence_text(&ticker, &sections).await))
    }

    fn name(&self) -> &'static str {
        "fetch_filing_sections"
    }

    fn description(&self) -> &'static str {
        "Fetch specific sections from a company's most recent SEC filing. \
         Available sections are mda, risk_factors, balance_sheet, \
         income_statement, and cashflow_statement."
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "ticker": {
                    "type": "string",
                    "description": "Stock ticker symbol of the company"
                },
                "sections": {
                    "type": "array",
                    "items": {
                        "type": "string",
                        "enum": [
                            "mda",
                            "risk_factors",
                            "balance_sheet",
                            "income_statement",
                            "cashflow_statement"
                        ]
                    },
                    "description": "Sections to fetch from the filing"
                }
            },
            "required": ["ticker", "sections"]
        })
    }
}
