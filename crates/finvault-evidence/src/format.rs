//! Tag-delimited evidence rendering
//!
//! Evidence is consumed by a language model, not a human, so the encoding
//! is one tag per data point or section rather than prose. Identical input data
//! always produces byte-identical output: ordering is fixed and number
//! formatting is locale-independent.

use crate::filing::FilingExtract;
use crate::resample::WeeklyClose;

/// Render a weekly price series as price evidence
///
/// ```text
/// <prices>
/// <2024-01-07>495.20</2024-01-07>
/// <2024-01-14>530.45</2024-01-14>
/// </prices>
/// ```
pub fn format_prices(weeks: &[WeeklyClose]) -> String {
    let lines: Vec<String> = weeks
        .iter()
        .map(|week| {
            let date = week.week_end.format("%Y-%m-%d");
            format!("<{date}>{close:.2}</{date}>", close = week.close)
        })
        .collect();
    format!("<prices>\n{}\n</prices>", lines.join("\n"))
}

/// Render extracted filing sections as filing evidence
///
/// One child per requested section inside `<sections>`, keyed by section
/// identifier, in canonical section order.
pub fn format_filing(extract: &FilingExtract) -> String {
    let sections = extract
        .sections
        .iter()
        .map(|(section, content)| {
            let id = section.id();
            format!("<{id}>\n{}\n</{id}>", content.render())
        })
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "<filing>\n    <company>{company}</company>\n    <filing_date>{date}</filing_date>\n    <sections>{sections}</sections>\n</filing>",
        company = extract.company,
        date = extract.filing_date.format("%Y-%m-%d"),
    )
}
