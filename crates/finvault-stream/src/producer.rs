//! Producer roles and channel routing
//!
//! The producer-role set is closed: the pipeline has exactly these four
//! speaking nodes. Routing is a static table on the enum rather than
//! open-ended string dispatch, so "unknown producer" is the single `None`
//! case at the parse boundary.

use serde::{Deserialize, Serialize};

/// Output channel a producer's text belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Channel {
    /// Collapsible reasoning area shared by all non-answer producers
    Trace,
    /// The single always-visible final-answer slot
    Answer,
}

/// Presentation treatment of a producer's trace block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockStyle {
    /// Plain text block
    Text,
    /// Highlighted delegation block (supervisor hand-offs)
    Delegation,
}

/// A named participant in the agent pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Producer {
    /// Orchestrator that delegates work to the analysts
    Supervisor,
    /// Analyst working from historical price evidence
    PriceAnalyst,
    /// Analyst working from SEC filing evidence
    FilingAnalyst,
    /// Composes the final answer from the analysts' findings
    Synthesizer,
}

impl Producer {
    /// All known producers, in pipeline order
    pub const ALL: [Producer; 4] = [
        Producer::Supervisor,
        Producer::PriceAnalyst,
        Producer::FilingAnalyst,
        Producer::Synthesizer,
    ];

    /// Resolve a pipeline node name to a producer
    ///
    /// Returns `None` for anything outside the known role set; such
    /// fragments are internal control signals, not conversational content.
    pub fn from_node_name(name: &str) -> Option<Self> {
        match name {
            "supervisor" => Some(Producer::Supervisor),
            "price_analyst" => Some(Producer::PriceAnalyst),
            "filing_analyst" => Some(Producer::FilingAnalyst),
            "synthesizer" => Some(Producer::Synthesizer),
            _ => None,
        }
    }

    /// The node name this producer is tagged with on the wire
    pub fn node_name(self) -> &'static str {
        match self {
            Producer::Supervisor => "supervisor",
            Producer::PriceAnalyst => "price_analyst",
            Producer::FilingAnalyst => "filing_analyst",
            Producer::Synthesizer => "synthesizer",
        }
    }

    /// Which output channel this producer's text belongs to
    pub fn channel(self) -> Channel {
        match self {
            Producer::Synthesizer => Channel::Answer,
            Producer::Supervisor | Producer::PriceAnalyst | Producer::FilingAnalyst => {
                Channel::Trace
            }
        }
    }

    /// Presentation treatment of this producer's trace block
    pub fn block_style(self) -> BlockStyle {
        match self {
            Producer::Supervisor => BlockStyle::Delegation,
            _ => BlockStyle::Text,
        }
    }
}

impl std::fmt::Display for Producer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Producer::Supervisor => write!(f, "Supervisor"),
            Producer::PriceAnalyst => write!(f, "Price Analyst"),
            Producer::FilingAnalyst => write!(f, "Filing Analyst"),
            Producer::Synthesizer => write!(f, "Synthesizer"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_name_round_trip() {
        for producer in Producer::ALL {
            assert_eq!(Producer::from_node_name(producer.node_name()), Some(producer));
        }
    }

    #[test]
    fn test_unknown_node_name() {
        assert_eq!(Producer::from_node_name("router"), None);
        assert_eq!(Producer::from_node_name(""), None);
        assert_eq!(Producer::from_node_name("Supervisor"), None);
    }

    #[test]
    fn test_channel_routing() {
        assert_eq!(Producer::Synthesizer.channel(), Channel::Answer);
        assert_eq!(Producer::Supervisor.channel(), Channel::Trace);
        assert_eq!(Producer::PriceAnalyst.channel(), Channel::Trace);
        assert_eq!(Producer::FilingAnalyst.channel(), Channel::Trace);

        // Exactly one producer maps to the answer channel
        let answers = Producer::ALL
            .iter()
            .filter(|p| p.channel() == Channel::Answer)
            .count();
        assert_eq!(answers, 1);
    }

    #[test]
    fn test_block_style() {
        assert_eq!(Producer::Supervisor.block_style(), BlockStyle::Delegation);
        assert_eq!(Producer::PriceAnalyst.block_style(), BlockStyle::Text);
    }

    #[test]
    fn test_display_labels() {
        assert_eq!(Producer::PriceAnalyst.to_string(), "Price Analyst");
        assert_eq!(Producer::Synthesizer.to_string(), "Synthesizer");
    }
}
