//! Filing section extraction
//!
//! A filing exposes two structurally different data sources: narrative text
//! (MD&A, Risk Factors) addressed by item number, and machine-readable
//! structured statements (balance sheet, income, cash flow) addressed by
//! accessor. Each section identifier maps to exactly one extraction
//! strategy; the table is exhaustive over the closed enum, so adding a
//! section is a one-line entry in `source()`.

use crate::error::{EvidenceError, Result};
use crate::narrative::NarrativeItem;
use async_trait::async_trait;
use chrono::NaiveDate;
use comfy_table::Table;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// A named filing section callers may request
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    Mda,
    RiskFactors,
    BalanceSheet,
    IncomeStatement,
    CashflowStatement,
}

/// A structured financial statement kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatementKind {
    BalanceSheet,
    IncomeStatement,
    CashflowStatement,
}

/// Extraction strategy for one section
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionSource {
    /// Pulled from the narrative document by item number
    Narrative(NarrativeItem),
    /// Pulled from the structured statements by accessor
    Statement(StatementKind),
}

impl Section {
    /// All sections, in rendering order
    pub const ALL: [Section; 5] = [
        Section::Mda,
        Section::RiskFactors,
        Section::BalanceSheet,
        Section::IncomeStatement,
        Section::CashflowStatement,
    ];

    /// Wire identifier used in requests and evidence tags
    pub fn id(self) -> &'static str {
        match self {
            Section::Mda => "mda",
            Section::RiskFactors => "risk_factors",
            Section::BalanceSheet => "balance_sheet",
            Section::IncomeStatement => "income_statement",
            Section::CashflowStatement => "cashflow_statement",
        }
    }

    /// The extraction strategy for this section
    pub fn source(self) -> SectionSource {
        match self {
            Section::Mda => SectionSource::Narrative(NarrativeItem::Item2PartI),
            Section::RiskFactors => SectionSource::Narrative(NarrativeItem::Item1aPartII),
            Section::BalanceSheet => SectionSource::Statement(StatementKind::BalanceSheet),
            Section::IncomeStatement => SectionSource::Statement(StatementKind::IncomeStatement),
            Section::CashflowStatement => {
                SectionSource::Statement(StatementKind::CashflowStatement)
            }
        }
    }
}

impl FromStr for Section {
    type Err = EvidenceError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "mda" => Ok(Section::Mda),
            "risk_factors" => Ok(Section::RiskFactors),
            "balance_sheet" => Ok(Section::BalanceSheet),
            "income_statement" => Ok(Section::IncomeStatement),
            "cashflow_statement" => Ok(Section::CashflowStatement),
            other => Err(EvidenceError::InvalidSection(other.to_string())),
        }
    }
}

impl std::fmt::Display for Section {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.id())
    }
}

/// One row of a rendered financial statement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementRow {
    pub label: String,
    /// One value per period; `None` where the concept was not reported
    pub values: Vec<Option<f64>>,
}

/// A financial statement as a small table: periods across, concepts down
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementTable {
    pub title: String,
    /// Period end dates, most recent first (ISO format)
    pub periods: Vec<String>,
    pub rows: Vec<StatementRow>,
}

fn format_value(value: f64) -> String {
    if value.abs() >= 1000.0 {
        format!("{value:.0}")
    } else {
        format!("{value:.2}")
    }
}

impl StatementTable {
    /// Render the statement as plain text
    pub fn render(&self) -> String {
        let mut table = Table::new();
        table.load_preset(comfy_table::presets::ASCII_MARKDOWN);

        let mut header = vec![self.title.clone()];
        header.extend(self.periods.iter().cloned());
        table.set_header(header);

        for row in &self.rows {
            let mut cells = vec![row.label.clone()];
            cells.extend(
                row.values
                    .iter()
                    .map(|v| v.map_or_else(|| "-".to_string(), format_value)),
            );
            table.add_row(cells);
        }

        table.to_string()
    }
}

/// Extracted content of one section
#[derive(Debug, Clone, PartialEq)]
pub enum SectionContent {
    /// Free text (narrative sections)
    Text(String),
    /// Structured statement (financial-statement sections)
    Table(StatementTable),
}

impl SectionContent {
    /// Render the content as evidence text
    pub fn render(&self) -> String {
        match self {
            SectionContent::Text(text) => text.clone(),
            SectionContent::Table(table) => table.render(),
        }
    }
}

/// A resolved filing the extractor can pull sections from
///
/// Implementations fetch the underlying representations lazily: the
/// narrative document and the structured statements are only materialized
/// when a section of that kind is requested.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait FilingSource: Send + Sync {
    /// Company name as recorded on the filing
    fn company(&self) -> String;

    /// Date the filing was submitted
    fn filing_date(&self) -> NaiveDate;

    /// Fetch one narrative item's text
    async fn narrative_item(&self, item: NarrativeItem) -> Result<String>;

    /// Fetch the balance sheet
    async fn balance_sheet(&self) -> Result<StatementTable>;

    /// Fetch the income statement
    async fn income_statement(&self) -> Result<StatementTable>;

    /// Fetch the cash flow statement
    async fn cashflow_statement(&self) -> Result<StatementTable>;
}

/// The extracted sections of one filing, ready for formatting
#[derive(Debug, Clone)]
pub struct FilingExtract {
    pub company: String,
    pub filing_date: NaiveDate,
    /// Requested sections in `Section::ALL` order
    pub sections: Vec<(Section, SectionContent)>,
}

impl FilingExtract {
    /// Extract the requested sections from a filing source
    ///
    /// Sections are deduplicated and ordered canonically. Only the
    /// requested sections are fetched; requesting narrative sections alone
    /// never touches the statement accessors.
    pub async fn from_source(
        source: &dyn FilingSource,
        requested: &[Section],
    ) -> Result<FilingExtract> {
        let mut sections = Vec::with_capacity(requested.len());

        for section in Section::ALL.iter().copied().filter(|s| requested.contains(s)) {
            let content = match section.source() {
                SectionSource::Narrative(item) => {
                    SectionContent::Text(source.narrative_item(item).await?)
                }
                SectionSource::Statement(StatementKind::BalanceSheet) => {
                    SectionContent::Table(source.balance_sheet().await?)
                }
                SectionSource::Statement(StatementKind::IncomeStatement) => {
                    SectionContent::Table(source.income_statement().await?)
                }
                SectionSource::Statement(StatementKind::CashflowStatement) => {
                    SectionContent::Table(source.cashflow_statement().await?)
                }
            };
            sections.push((section, content));
        }

        Ok(FilingExtract {
            company: source.company(),
            filing_date: source.filing_date(),
            sections,
        })
    }
}

/// Parse caller-supplied section identifiers
///
/// Unknown identifiers are a caller error, rejected before any extraction
/// work begins. An empty request is likewise rejected.
pub fn parse_sections(ids: &[String]) -> Result<Vec<Section>> {
    if ids.is_empty() {
        return Err(EvidenceError::InvalidSection(
            "at least one section must be requested".to_string(),
        ));
    }
    ids.iter().map(|id| id.parse()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stub_table(title: &str) -> StatementTable {
        StatementTable {
            title: title.to_string(),
            periods: vec!["2024-04-28".to_string()],
            rows: vec![StatementRow {
                label: "Total assets".to_string(),
                values: vec![Some(77_072_000_000.0)],
            }],
        }
    }

    fn filing_date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 29).unwrap()
    }

    #[test]
    fn test_section_parse() {
        assert_eq!("mda".parse::<Section>().unwrap(), Section::Mda);
        assert_eq!(
            "cashflow_statement".parse::<Section>().unwrap(),
            Section::CashflowStatement
        );
        assert!(matches!(
            "footnotes".parse::<Section>(),
            Err(EvidenceError::InvalidSection(_))
        ));
    }

    #[test]
    fn test_parse_sections_rejects_unknown_and_empty() {
        assert!(parse_sections(&[]).is_err());
        assert!(parse_sections(&["mda".to_string(), "bogus".to_string()]).is_err());
        assert_eq!(
            parse_sections(&["risk_factors".to_string()]).unwrap(),
            vec![Section::RiskFactors]
        );
    }

    #[test]
    fn test_strategy_table_is_exhaustive() {
        for section in Section::ALL {
            match section.source() {
                SectionSource::Narrative(_) => {
                    assert!(matches!(section, Section::Mda | Section::RiskFactors));
                }
                SectionSource::Statement(_) => {
                    assert!(!matches!(section, Section::Mda | Section::RiskFactors));
                }
            }
        }
    }

    #[tokio::test]
    async fn test_narrative_request_never_touches_statements() {
        let mut source = MockFilingSource::new();
        source
            .expect_company()
            .return_const("NVIDIA Corporation".to_string());
        source.expect_filing_date().return_const(filing_date());
        source
            .expect_narrative_item()
            .times(1)
            .returning(|_| Ok("Supply chain concentration remains a risk.".to_string()));
        source.expect_balance_sheet().times(0);
        source.expect_income_statement().times(0);
        source.expect_cashflow_statement().times(0);

        let extract = FilingExtract::from_source(&source, &[Section::RiskFactors])
            .await
            .unwrap();

        assert_eq!(extract.sections.len(), 1);
        assert_eq!(extract.sections[0].0, Section::RiskFactors);
    }

    #[tokio::test]
    async fn test_only_requested_statements_fetched() {
        let mut source = MockFilingSource::new();
        source
            .expect_company()
            .return_const("NVIDIA Corporation".to_string());
        source.expect_filing_date().return_const(filing_date());
        source
            .expect_balance_sheet()
            .times(1)
            .returning(|| Ok(stub_table("Balance Sheet")));
        source.expect_income_statement().times(0);
        source.expect_cashflow_statement().times(0);
        source.expect_narrative_item().times(0);

        let extract = FilingExtract::from_source(&source, &[Section::BalanceSheet])
            .await
            .unwrap();

        assert!(matches!(
            extract.sections[0].1,
            SectionContent::Table(_)
        ));
    }

    #[tokio::test]
    async fn test_sections_ordered_and_deduplicated() {
        let mut source = MockFilingSource::new();
        source
            .expect_company()
            .return_const("Advanced Micro Devices".to_string());
        source.expect_filing_date().return_const(filing_date());
        source
            .expect_narrative_item()
            .times(2)
            .returning(|item| Ok(format!("text for item {}", item.item_number())));

        let requested = [Section::RiskFactors, Section::Mda, Section::RiskFactors];
        let extract = FilingExtract::from_source(&source, &requested).await.unwrap();

        let order: Vec<Section> = extract.sections.iter().map(|(s, _)| *s).collect();
        assert_eq!(order, vec![Section::Mda, Section::RiskFactors]);
    }

    #[test]
    fn test_statement_table_render() {
        let rendered = stub_table("Balance Sheet").render();
        assert!(rendered.contains("Balance Sheet"));
        assert!(rendered.contains("2024-04-28"));
        assert!(rendered.contains("Total assets"));
        assert!(rendered.contains("77072000000"));
    }
}
