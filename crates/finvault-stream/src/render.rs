//! Render instructions consumed by the presentation layer
//!
//! The presentation slot model supports full replacement only, not
//! incremental append, so the multiplexer always ships the complete running
//! text for a slot.

use crate::producer::{BlockStyle, Producer};
use finvault_core::Result;
use serde::{Deserialize, Serialize};

/// Escape characters the presentation layer would interpret as markup
///
/// Dollar signs trigger the markdown renderer's math mode, which mangles
/// currency amounts ("$500M"). Escaping is not idempotent; callers must
/// apply it exactly once per render pass, on raw text.
pub fn escape_markdown(text: &str) -> String {
    text.replace('$', "\\$")
}

/// A display slot addressable by a replace instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Slot {
    /// The labeled sub-block of a trace producer's current speaking span
    Trace(Producer),
    /// The single persistent final-answer slot
    Answer,
}

/// Terminal state of the trace channel after a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TraceOutcome {
    /// Stream drained normally
    Complete,
    /// Stream failed mid-turn; partial output stays visible
    Error,
}

/// One step of presentation-layer work emitted by the multiplexer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum RenderInstruction {
    /// A trace producer started a new speaking span; open a labeled block
    BeginTraceBlock {
        producer: Producer,
        style: BlockStyle,
    },
    /// Replace a slot's content with the full escaped running text
    ReplaceSlot { slot: Slot, text: String },
    /// Close the trace channel's visual state (collapse, mark terminal)
    FinalizeTrace { outcome: TraceOutcome },
}

/// Consumer of render instructions
///
/// Implementations paint to a terminal, a UI widget tree, or (for headless
/// runs and tests) an in-memory record.
pub trait RenderSink {
    fn apply(&mut self, instruction: RenderInstruction) -> Result<()>;
}

/// Sink that retains every instruction in memory
///
/// Used by headless turn drivers and tests to inspect the exact render
/// sequence a stream produced.
#[derive(Debug, Default)]
pub struct CollectSink {
    instructions: Vec<RenderInstruction>,
}

impl CollectSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// All instructions applied so far, in order
    pub fn instructions(&self) -> &[RenderInstruction] {
        &self.instructions
    }

    /// The latest text replaced into a slot, if any
    pub fn latest_text(&self, slot: Slot) -> Option<&str> {
        self.instructions.iter().rev().find_map(|i| match i {
            RenderInstruction::ReplaceSlot { slot: s, text } if *s == slot => {
                Some(text.as_str())
            }
            _ => None,
        })
    }
}

impl RenderSink for CollectSink {
    fn apply(&mut self, instruction: RenderInstruction) -> Result<()> {
        self.instructions.push(instruction);
        Ok(())
    }
}
