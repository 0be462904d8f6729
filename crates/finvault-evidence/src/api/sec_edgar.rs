//! SEC EDGAR API client for fetching company filings
//!
//! SEC EDGAR is the Electronic Data Gathering, Analysis, and Retrieval
//! system used by the U.S. Securities and Exchange Commission.
//!
//! Rate limit: 10 requests per second (as per SEC fair access policy)
//! User-Agent requirement: must identify the caller with a contact address

use crate::error::{EvidenceError, Result};
use crate::filing::{FilingSource, StatementKind, StatementRow, StatementTable};
use crate::narrative::{self, NarrativeItem};
use async_trait::async_trait;
use chrono::NaiveDate;
use governor::clock::DefaultClock;
use governor::state::{InMemoryState, NotKeyed};
use governor::{Quota, RateLimiter};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::num::NonZeroU32;
use std::sync::Arc;
use tokio::sync::OnceCell;

type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

const SEC_BASE_URL: &str = "https://data.sec.gov";
const SEC_COMPANY_TICKERS_URL: &str = "https://www.sec.gov/files/company_tickers.json";

// SEC allows 10 requests per second
const SEC_REQUESTS_PER_SECOND: NonZeroU32 = NonZeroU32::new(10).unwrap();

const DEFAULT_MAX_NARRATIVE_CHARS: usize = 20_000;
const DEFAULT_STATEMENT_PERIODS: usize = 2;

/// SEC filing form type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FormType {
    /// Quarterly report
    #[serde(rename = "10-Q")]
    Form10Q,
    /// Annual report
    #[serde(rename = "10-K")]
    Form10K,
}

impl FormType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FormType::Form10Q => "10-Q",
            FormType::Form10K => "10-K",
        }
    }
}

/// SEC submissions response
#[derive(Debug, Clone, Deserialize)]
pub struct CompanySubmissions {
    pub cik: String,
    pub name: String,
    pub filings: FilingsData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct FilingsData {
    pub recent: RecentFilings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecentFilings {
    pub accession_number: Vec<String>,
    pub filing_date: Vec<String>,
    pub form: Vec<String>,
    pub primary_document: Vec<String>,
}

/// Company facts response from SEC (XBRL)
#[derive(Debug, Clone, Deserialize)]
pub struct CompanyFacts {
    pub cik: u64,
    #[serde(rename = "entityName")]
    pub entity_name: String,
    pub facts: Facts,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Facts {
    #[serde(rename = "us-gaap")]
    pub us_gaap: Option<serde_json::Value>,
}

/// SEC EDGAR API client
#[derive(Clone)]
pub struct SecEdgarClient {
    client: Client,
    user_agent: String,
    rate_limiter: SharedRateLimiter,
}

impl SecEdgarClient {
    /// Create a new SEC EDGAR client
    ///
    /// # Arguments
    /// * `user_agent` - Caller identification required by the SEC, e.g.
    ///   `"finvault (analyst@example.com)"`
    pub fn new(user_agent: impl Into<String>) -> Self {
        let rate_limiter = Arc::new(RateLimiter::direct(Quota::per_second(
            SEC_REQUESTS_PER_SECOND,
        )));

        Self {
            client: Client::new(),
            user_agent: user_agent.into(),
            rate_limiter,
        }
    }

    /// Create from environment variables
    ///
    /// Uses SEC_USER_AGENT or defaults to "finvault (finvault@example.com)"
    pub fn from_env() -> Self {
        let user_agent = std::env::var("SEC_USER_AGENT")
            .unwrap_or_else(|_| "finvault (finvault@example.com)".to_string());
        Self::new(user_agent)
    }

    /// The User-Agent header sent with every request
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    async fn get(&self, url: &str) -> Result<reqwest::Response> {
        self.rate_limiter.until_ready().await;

        let response = self
            .client
            .get(url)
            .header("User-Agent", &self.user_agent)
            .send()
            .await
            .map_err(|e| EvidenceError::Api(format!("SEC request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(EvidenceError::Api(format!(
                "SEC API error: {}",
                response.status()
            )));
        }

        Ok(response)
    }

    /// Get CIK number from stock ticker
    pub async fn cik_for_ticker(&self, ticker: &str) -> Result<String> {
        let data: serde_json::Value = self
            .get(SEC_COMPANY_TICKERS_URL)
            .await?
            .json()
            .await
            .map_err(|e| EvidenceError::Api(format!("Failed to parse SEC response: {e}")))?;

        let ticker_upper = ticker.to_uppercase();
        if let Some(companies) = data.as_object() {
            for company in companies.values() {
                let matches = company
                    .get("ticker")
                    .and_then(|t| t.as_str())
                    .is_some_and(|t| t.eq_ignore_ascii_case(&ticker_upper));
                if matches {
                    // cik_str arrives as a number in practice, but be
                    // tolerant of the string form
                    let cik = company.get("cik_str").and_then(|c| {
                        c.as_u64()
                            .map(|n| n.to_string())
                            .or_else(|| c.as_str().map(String::from))
                    });
                    if let Some(cik) = cik {
                        return Ok(cik);
                    }
                }
            }
        }

        Err(EvidenceError::InvalidTicker(ticker.to_string()))
    }

    /// Get company submissions (filing history)
    pub async fn company_submissions(&self, cik: &str) -> Result<CompanySubmissions> {
        let cik_padded = format!("{:0>10}", cik.trim_start_matches('0'));
        let url = format!("{SEC_BASE_URL}/submissions/CIK{cik_padded}.json");

        self.get(&url)
            .await?
            .json()
            .await
            .map_err(|e| EvidenceError::Api(format!("Failed to parse SEC response: {e}")))
    }

    /// Get company facts (XBRL financial data)
    pub async fn company_facts(&self, cik: &str) -> Result<CompanyFacts> {
        let cik_padded = format!("{:0>10}", cik.trim_start_matches('0'));
        let url = format!("{SEC_BASE_URL}/api/xbrl/companyfacts/CIK{cik_padded}.json");

        self.get(&url)
            .await?
            .json()
            .await
            .map_err(|e| EvidenceError::Api(format!("Failed to parse SEC response: {e}")))
    }

    /// Fetch a filing document from the archives
    pub async fn filing_document(
        &self,
        cik: &str,
        accession_number: &str,
        document: &str,
    ) -> Result<String> {
        let cik_trimmed = cik.trim_start_matches('0');
        let accession_clean = accession_number.replace('-', "");
        let url = format!(
            "https://www.sec.gov/Archives/edgar/data/{cik_trimmed}/{accession_clean}/{document}"
        );

        self.get(&url)
            .await?
            .text()
            .await
            .map_err(|e| EvidenceError::Api(format!("Failed to read filing document: {e}")))
    }

    /// Resolve the company's most recent filing of the given form type
    pub async fn latest_filing(&self, ticker: &str, form: FormType) -> Result<EdgarFiling> {
        let cik = self.cik_for_ticker(ticker).await?;
        let submissions = self.company_submissions(&cik).await?;
        let recent = &submissions.filings.recent;

        // Submission arrays are ordered most recent first
        let index = recent
            .form
            .iter()
            .position(|f| f == form.as_str())
            .ok_or_else(|| EvidenceError::DataUnavailable {
                symbol: ticker.to_string(),
                reason: format!("no {} filings on record", form.as_str()),
            })?;

        let filing_date = NaiveDate::parse_from_str(&recent.filing_date[index], "%Y-%m-%d")
            .map_err(|e| EvidenceError::Api(format!("Invalid filing date: {e}")))?;

        Ok(EdgarFiling {
            client: self.clone(),
            cik,
            ticker: ticker.to_string(),
            company: submissions.name.clone(),
            accession_number: recent.accession_number[index].clone(),
            primary_document: recent.primary_document[index].clone(),
            filing_date,
            max_narrative_chars: DEFAULT_MAX_NARRATIVE_CHARS,
            statement_periods: DEFAULT_STATEMENT_PERIODS,
            narrative: OnceCell::new(),
            facts: OnceCell::new(),
        })
    }
}

/// A resolved EDGAR filing
///
/// Holds the filing coordinates plus lazily-fetched representations: the
/// narrative document and the XBRL facts are each fetched at most once, and
/// only when a section of that kind is actually requested.
pub struct EdgarFiling {
    client: SecEdgarClient,
    cik: String,
    ticker: String,
    company: String,
    accession_number: String,
    primary_document: String,
    filing_date: NaiveDate,
    max_narrative_chars: usize,
    statement_periods: usize,
    narrative: OnceCell<String>,
    facts: OnceCell<CompanyFacts>,
}

impl EdgarFiling {
    /// Bound the text kept from a narrative section
    pub fn with_max_narrative_chars(mut self, chars: usize) -> Self {
        self.max_narrative_chars = chars;
        self
    }

    /// Set the reporting periods shown per statement
    pub fn with_statement_periods(mut self, periods: usize) -> Self {
        self.statement_periods = periods;
        self
    }

    /// Accession number of the resolved filing
    pub fn accession_number(&self) -> &str {
        &self.accession_number
    }

    async fn narrative_text(&self) -> Result<&str> {
        let text = self
            .narrative
            .get_or_try_init(|| async {
                let html = self
                    .client
                    .filing_document(&self.cik, &self.accession_number, &self.primary_document)
                    .await?;
                Ok::<_, EvidenceError>(narrative::strip_html(&html))
            })
            .await?;
        Ok(text)
    }

    async fn company_facts(&self) -> Result<&CompanyFacts> {
        self.facts
            .get_or_try_init(|| self.client.company_facts(&self.cik))
            .await
    }

    fn statement(&self, kind: StatementKind, facts: &CompanyFacts) -> Result<StatementTable> {
        let us_gaap = facts
            .facts
            .us_gaap
            .as_ref()
            .ok_or_else(|| EvidenceError::DataUnavailable {
                symbol: self.ticker.clone(),
                reason: "no US-GAAP data available".to_string(),
            })?;
        build_statement(us_gaap, kind, self.statement_periods).map_err(|e| match e {
            EvidenceError::DataUnavailable { reason, .. } => EvidenceError::DataUnavailable {
                symbol: self.ticker.clone(),
                reason,
            },
            other => other,
        })
    }
}

#[async_trait]
impl FilingSource for EdgarFiling {
    fn company(&self) -> String {
        self.company.clone()
    }

    fn filing_date(&self) -> NaiveDate {
        self.filing_date
    }

    async fn narrative_item(&self, item: NarrativeItem) -> Result<String> {
        let text = self.narrative_text().await?;
        narrative::extract_item(text, item, self.max_narrative_chars).map_err(|e| match e {
            EvidenceError::DataUnavailable { reason, .. } => EvidenceError::DataUnavailable {
                symbol: self.ticker.clone(),
                reason,
            },
            other => other,
        })
    }

    async fn balance_sheet(&self) -> Result<StatementTable> {
        let facts = self.company_facts().await?;
        self.statement(StatementKind::BalanceSheet, facts)
    }

    async fn income_statement(&self) -> Result<StatementTable> {
        let facts = self.company_facts().await?;
        self.statement(StatementKind::IncomeStatement, facts)
    }

    async fn cashflow_statement(&self) -> Result<StatementTable> {
        let facts = self.company_facts().await?;
        self.statement(StatementKind::CashflowStatement, facts)
    }
}

/// Row specs per statement kind: display label plus us-gaap concept
/// alternatives, first match wins
type RowSpec = (&'static str, &'static [&'static str]);

const BALANCE_SHEET_ROWS: &[RowSpec] = &[
    ("Cash and cash equivalents", &["CashAndCashEquivalentsAtCarryingValue"]),
    ("Total current assets", &["AssetsCurrent"]),
    ("Total assets", &["Assets"]),
    ("Total current liabilities", &["LiabilitiesCurrent"]),
    ("Total liabilities", &["Liabilities"]),
    ("Stockholders' equity", &["StockholdersEquity"]),
];

const INCOME_STATEMENT_ROWS: &[RowSpec] = &[
    (
        "Revenue",
        &[
            "Revenues",
            "RevenueFromContractWithCustomerExcludingAssessedTax",
        ],
    ),
    ("Cost of revenue", &["CostOfRevenue", "CostOfGoodsAndServicesSold"]),
    ("Gross profit", &["GrossProfit"]),
    ("Operating income", &["OperatingIncomeLoss"]),
    ("Net income", &["NetIncomeLoss"]),
    ("Earnings per share, basic", &["EarningsPerShareBasic"]),
    ("Earnings per share, diluted", &["EarningsPerShareDiluted"]),
];

const CASHFLOW_STATEMENT_ROWS: &[RowSpec] = &[
    (
        "Net cash from operating activities",
        &["NetCashProvidedByUsedInOperatingActivities"],
    ),
    (
        "Net cash from investing activities",
        &["NetCashProvidedByUsedInInvestingActivities"],
    ),
    (
        "Net cash from financing activities",
        &["NetCashProvidedByUsedInFinancingActivities"],
    ),
];

fn statement_rows(kind: StatementKind) -> (&'static str, &'static [RowSpec]) {
    match kind {
        StatementKind::BalanceSheet => ("Balance Sheet", BALANCE_SHEET_ROWS),
        StatementKind::IncomeStatement => ("Income Statement", INCOME_STATEMENT_ROWS),
        StatementKind::CashflowStatement => ("Cash Flow Statement", CASHFLOW_STATEMENT_ROWS),
    }
}

/// Collect reported (period end, value) pairs for the first concept
/// alternative present in the us-gaap facts
fn concept_series(us_gaap: &serde_json::Value, concepts: &[&str]) -> BTreeMap<String, f64> {
    let mut series = BTreeMap::new();

    for concept in concepts {
        let Some(units) = us_gaap.get(concept).and_then(|c| c.get("units")) else {
            continue;
        };
        let unit_data = units
            .get("USD")
            .or_else(|| units.get("USD/shares"))
            .or_else(|| units.get("shares"));
        let Some(entries) = unit_data.and_then(|u| u.as_array()) else {
            continue;
        };

        // Later entries correspond to later filings of the same period;
        // they overwrite earlier (possibly restated) values.
        for entry in entries {
            if let (Some(end), Some(val)) = (
                entry.get("end").and_then(|e| e.as_str()),
                entry.get("val").and_then(|v| v.as_f64()),
            ) {
                series.insert(end.to_string(), val);
            }
        }

        if !series.is_empty() {
            break;
        }
    }

    series
}

/// Build one statement table from us-gaap facts
fn build_statement(
    us_gaap: &serde_json::Value,
    kind: StatementKind,
    max_periods: usize,
) -> Result<StatementTable> {
    let (title, row_specs) = statement_rows(kind);

    let series: Vec<(&str, BTreeMap<String, f64>)> = row_specs
        .iter()
        .map(|(label, concepts)| (*label, concept_series(us_gaap, concepts)))
        .collect();

    // Most recent period ends across all rows, newest first
    let mut periods: Vec<String> = series
        .iter()
        .flat_map(|(_, s)| s.keys().cloned())
        .collect();
    periods.sort_unstable();
    periods.dedup();
    periods.reverse();
    periods.truncate(max_periods);

    if periods.is_empty() {
        return Err(EvidenceError::DataUnavailable {
            symbol: String::new(),
            reason: format!("no reported periods for {title}"),
        });
    }

    let rows: Vec<StatementRow> = series
        .into_iter()
        .filter_map(|(label, values)| {
            let row_values: Vec<Option<f64>> =
                periods.iter().map(|p| values.get(p).copied()).collect();
            // Concepts the company never reports are omitted entirely
            row_values.iter().any(Option::is_some).then(|| StatementRow {
                label: label.to_string(),
                values: row_values,
            })
        })
        .collect();

    Ok(StatementTable {
        title: title.to_string(),
        periods,
        rows,
    })
}
