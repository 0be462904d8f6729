//! Streaming response multiplexer for FinVault
//!
//! Consumes the producer-tagged fragment stream emitted by the agent
//! pipeline and turns it into render instructions for the presentation
//! layer: per-producer running text, producer-switch detection, and routing
//! between the collapsible reasoning trace and the always-visible final
//! answer.

pub mod multiplexer;
pub mod producer;
pub mod render;

pub use multiplexer::{StreamMultiplexer, TurnOutput, multiplex};
pub use producer::{BlockStyle, Channel, Producer};
pub use render::{CollectSink, RenderInstruction, RenderSink, Slot, TraceOutcome, escape_markdown};
