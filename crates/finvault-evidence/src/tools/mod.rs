//! Evidence tools exposed to the agent pipeline

pub mod filing_sections;
pub mod price;

pub use filing_sections::FilingSectionsTool;
pub use price::HistoricalPriceTool;
