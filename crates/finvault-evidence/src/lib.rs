//! Financial evidence extraction for FinVault
//!
//! This crate turns raw market and regulatory data into the fixed,
//! tag-delimited evidence text the agent pipeline reasons over:
//!
//! - Historical prices: daily closes from Yahoo Finance, resampled to one
//!   close per calendar week with Sunday-anchored buckets
//! - SEC filings: named sections from a company's latest 10-Q, pulled from
//!   the narrative document or the XBRL structured statements
//!
//! Both operations are exposed as [`finvault_tools::Tool`] implementations
//! that never raise toward the pipeline; fetch failures come back as
//! descriptive in-band text.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod filing;
pub mod format;
pub mod narrative;
pub mod resample;
pub mod ticker;
pub mod tools;

// Re-export main types for convenience
pub use api::{EdgarFiling, FormType, PriceSample, SecEdgarClient, YahooFinanceClient};
pub use config::EvidenceConfig;
pub use error::{EvidenceError, Result};
pub use filing::{FilingExtract, FilingSource, Section, SectionContent, StatementTable};
pub use resample::{WeeklyClose, resample_weekly};
pub use tools::{FilingSectionsTool, HistoricalPriceTool};
