//! Narrative text extraction from filing documents
//!
//! 10-Q primary documents are HTML. The narrative sections are located by
//! item heading after markup is stripped. Headings appear twice: once in
//! the table of contents and once in the body, and "Item 2" exists in both
//! Part I (MD&A) and Part II (Unregistered Sales), so lookup is scoped to
//! the item's part and takes the last heading occurrence within it.

use crate::error::{EvidenceError, Result};
use regex::Regex;
use std::sync::OnceLock;

/// A narrative item addressable in a 10-Q
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NarrativeItem {
    /// Part I, Item 2: Management's Discussion & Analysis
    Item2PartI,
    /// Part II, Item 1A: Risk Factors
    Item1aPartII,
}

impl NarrativeItem {
    /// The item number as printed in the filing
    pub fn item_number(self) -> &'static str {
        match self {
            NarrativeItem::Item2PartI => "2",
            NarrativeItem::Item1aPartII => "1A",
        }
    }

    fn in_part_two(self) -> bool {
        matches!(self, NarrativeItem::Item1aPartII)
    }
}

fn tag_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]*>").expect("static regex"))
}

fn whitespace_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[ \t\r\f]+").expect("static regex"))
}

fn part_two_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bPART\s+II\b").expect("static regex"))
}

fn any_item_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)\bItem\s+\d+A?\b").expect("static regex"))
}

/// Strip HTML markup down to plain text
///
/// Tags become spaces, a handful of common entities are decoded, and runs
/// of horizontal whitespace collapse. Line structure is kept so headings
/// stay visually separated.
pub fn strip_html(html: &str) -> String {
    let no_tags = tag_re().replace_all(html, " ");
    let decoded = no_tags
        .replace("&nbsp;", " ")
        .replace("&amp;", "&")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&#8217;", "\u{2019}")
        .replace("&#8220;", "\u{201c}")
        .replace("&#8221;", "\u{201d}")
        .replace("&quot;", "\"");
    let collapsed = whitespace_re().replace_all(&decoded, " ");
    collapsed
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join("\n")
}

fn item_heading_re(item: NarrativeItem) -> Regex {
    // \b after the item number would not stop "1A" matching inside "1A."
    // text, but it does stop "Item 2" matching "Item 20".
    Regex::new(&format!(r"(?i)\bItem\s+{}\b", item.item_number())).expect("static regex")
}

/// Extract one narrative item from a stripped filing document
///
/// `max_chars` bounds the returned text; 10-Q narrative sections can run to
/// hundreds of kilobytes.
pub fn extract_item(text: &str, item: NarrativeItem, max_chars: usize) -> Result<String> {
    // The last "PART II" occurrence is the body heading; earlier ones are
    // table-of-contents entries.
    let part_two_start = part_two_re().find_iter(text).last().map(|m| m.start());

    let (region_start, region_end) = if item.in_part_two() {
        (part_two_start.unwrap_or(0), text.len())
    } else {
        (0, part_two_start.unwrap_or(text.len()))
    };
    let region = &text[region_start..region_end];

    // Last occurrence within the part skips the table of contents.
    let heading = item_heading_re(item)
        .find_iter(region)
        .last()
        .ok_or_else(|| EvidenceError::DataUnavailable {
            symbol: String::new(),
            reason: format!("Item {} not found in filing document", item.item_number()),
        })?;

    let body_start = heading.start();
    let body_end = any_item_re()
        .find_iter(&region[heading.end()..])
        .next()
        .map_or(region.len(), |m| heading.end() + m.start());

    let section = region[body_start..body_end].trim();
    if section.chars().count() > max_chars {
        Ok(section.chars().take(max_chars).collect())
    } else {
        Ok(section.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_html() {
        let html = "<p>Revenue grew&nbsp;<b>strongly</b> &amp; margins held.</p>";
        assert_eq!(strip_html(html), "Revenue grew strongly & margins held.");
    }

    fn fake_filing() -> String {
        [
            "PART I Item 1. Financial Statements Item 2. MD&A",
            "PART II Item 1A. Risk Factors", // table of contents
            "PART I",
            "Item 1. Financial Statements",
            "(tables omitted)",
            "Item 2. Management's Discussion and Analysis",
            "Demand for data-center products remained strong.",
            "Item 3. Quantitative Disclosures",
            "nothing material",
            "PART II",
            "Item 1A. Risk Factors",
            "Supply chain concentration remains a material risk.",
            "Item 2. Unregistered Sales of Equity Securities",
            "none",
        ]
        .join("\n")
    }

    #[test]
    fn test_extract_mda_from_part_one() {
        let text = fake_filing();
        let mda = extract_item(&text, NarrativeItem::Item2PartI, 20_000).unwrap();
        assert!(mda.contains("Management's Discussion"));
        assert!(mda.contains("data-center products"));
        // Stops at the next item heading and stays out of Part II
        assert!(!mda.contains("Quantitative"));
        assert!(!mda.contains("Unregistered"));
    }

    #[test]
    fn test_extract_risk_factors_from_part_two() {
        let text = fake_filing();
        let risks = extract_item(&text, NarrativeItem::Item1aPartII, 20_000).unwrap();
        assert!(risks.contains("Supply chain concentration"));
        assert!(!risks.contains("Unregistered"));
    }

    #[test]
    fn test_missing_item() {
        let result = extract_item("no items here", NarrativeItem::Item2PartI, 100);
        assert!(result.is_err());
    }

    #[test]
    fn test_max_chars_bound() {
        let text = fake_filing();
        let mda = extract_item(&text, NarrativeItem::Item2PartI, 10).unwrap();
        assert_eq!(mda.chars().count(), 10);
    }
}
