//! The streaming response multiplexer
//!
//! One `StreamMultiplexer` handles one logical pass: a single user turn's
//! fragment stream. Fragments are token-level slivers, so the multiplexer
//! holds the full running string per producer and re-emits it on every
//! fragment; the presentation slot model supports only full replacement.

use crate::producer::{Channel, Producer};
use crate::render::{RenderInstruction, RenderSink, Slot, TraceOutcome, escape_markdown};
use finvault_core::{Fragment, Result};
use futures::stream::{Stream, StreamExt};
use std::collections::HashMap;
use tracing::debug;

/// What a drained turn produced
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TurnOutput {
    /// The answer producer's final accumulated text, unescaped.
    /// `None` if the answer producer never spoke.
    pub answer: Option<String>,
}

/// Per-turn accumulation state and routing
///
/// The multiplexer is a pure state machine: `on_fragment` maps one incoming
/// fragment to the render instructions it implies, and `finalize` closes the
/// trace channel exactly once. The async driver [`multiplex`] wires it to a
/// stream and a sink.
#[derive(Debug, Default)]
pub struct StreamMultiplexer {
    /// Producer currently speaking, if any known producer has spoken
    active: Option<Producer>,
    /// Accumulated text per producer for the current speaking span
    buffers: HashMap<Producer, String>,
    finalized: bool,
}

impl StreamMultiplexer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Process one fragment, returning the render instructions it implies
    ///
    /// Empty-text fragments are a no-op: no buffer is created and no
    /// producer switch occurs. Fragments from outside the known role set are
    /// dropped silently.
    pub fn on_fragment(&mut self, fragment: &Fragment) -> Vec<RenderInstruction> {
        if fragment.text.is_empty() {
            return Vec::new();
        }

        let Some(producer) = Producer::from_node_name(&fragment.producer) else {
            debug!(producer = %fragment.producer, "dropping fragment from unknown producer");
            return Vec::new();
        };

        let mut instructions = Vec::with_capacity(2);

        if self.active != Some(producer) {
            self.active = Some(producer);
            // A producer speaking again in the same turn starts a new
            // accumulation span, not a resumption of the old one.
            self.buffers.insert(producer, String::new());

            if producer.channel() == Channel::Trace {
                instructions.push(RenderInstruction::BeginTraceBlock {
                    producer,
                    style: producer.block_style(),
                });
            }
            // The answer producer has one persistent slot for the whole
            // turn; no new block is opened for it.
        }

        let buffer = self.buffers.entry(producer).or_default();
        buffer.push_str(&fragment.text);

        let slot = match producer.channel() {
            Channel::Trace => Slot::Trace(producer),
            Channel::Answer => Slot::Answer,
        };
        instructions.push(RenderInstruction::ReplaceSlot {
            slot,
            text: escape_markdown(buffer),
        });

        instructions
    }

    /// Close the trace channel's visual state
    ///
    /// Returns `None` if the multiplexer was already finalized; a turn emits
    /// exactly one finalize instruction.
    pub fn finalize(&mut self, outcome: TraceOutcome) -> Option<RenderInstruction> {
        if self.finalized {
            return None;
        }
        self.finalized = true;
        Some(RenderInstruction::FinalizeTrace { outcome })
    }

    /// The accumulated raw (unescaped) text of a producer's current span
    pub fn buffer(&self, producer: Producer) -> Option<&str> {
        self.buffers.get(&producer).map(String::as_str)
    }

    /// The answer producer's accumulated raw text, if it has spoken
    pub fn answer(&self) -> Option<&str> {
        self.buffer(Producer::Synthesizer)
    }
}

/// Drive one turn: pull fragments, route them, apply instructions to `sink`
///
/// Exactly one finalize instruction is applied per call. If the stream
/// fails mid-iteration, the trace channel is finalized in the error state so
/// partial output stays visible and consistent, then the failure propagates
/// to the caller.
pub async fn multiplex<S>(stream: S, sink: &mut dyn RenderSink) -> Result<TurnOutput>
where
    S: Stream<Item = Result<Fragment>>,
{
    let mut mux = StreamMultiplexer::new();
    futures::pin_mut!(stream);

    while let Some(next) = stream.next().await {
        match next {
            Ok(fragment) => {
                for instruction in mux.on_fragment(&fragment) {
                    sink.apply(instruction)?;
                }
            }
            Err(err) => {
                if let Some(instruction) = mux.finalize(TraceOutcome::Error) {
                    sink.apply(instruction)?;
                }
                return Err(err);
            }
        }
    }

    if let Some(instruction) = mux.finalize(TraceOutcome::Complete) {
        sink.apply(instruction)?;
    }

    Ok(TurnOutput {
        answer: mux.answer().map(str::to_string),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::producer::BlockStyle;
    use crate::render::CollectSink;
    use finvault_core::Error;
    use futures::stream;

    fn frag(producer: &str, text: &str) -> Result<Fragment> {
        Ok(Fragment::new(producer, text))
    }

    fn finalize_count(sink: &CollectSink) -> usize {
        sink.instructions()
            .iter()
            .filter(|i| matches!(i, RenderInstruction::FinalizeTrace { .. }))
            .count()
    }

    #[tokio::test]
    async fn test_single_finalize_after_last_fragment() {
        let fragments = vec![
            frag("supervisor", "routing "),
            frag("price_analyst", "NVDA up "),
            frag("synthesizer", "Buy."),
        ];
        let mut sink = CollectSink::new();
        multiplex(stream::iter(fragments), &mut sink).await.unwrap();

        assert_eq!(finalize_count(&sink), 1);
        assert!(matches!(
            sink.instructions().last(),
            Some(RenderInstruction::FinalizeTrace {
                outcome: TraceOutcome::Complete
            })
        ));
    }

    #[test]
    fn test_same_producer_never_reopens_block() {
        let mut mux = StreamMultiplexer::new();

        let first = mux.on_fragment(&Fragment::new("price_analyst", "NVDA "));
        assert!(matches!(
            first[0],
            RenderInstruction::BeginTraceBlock {
                producer: Producer::PriceAnalyst,
                style: BlockStyle::Text,
            }
        ));

        let second = mux.on_fragment(&Fragment::new("price_analyst", "rose"));
        assert_eq!(second.len(), 1);
        assert!(matches!(second[0], RenderInstruction::ReplaceSlot { .. }));
    }

    #[test]
    fn test_producer_switch_opens_block() {
        let mut mux = StreamMultiplexer::new();
        mux.on_fragment(&Fragment::new("supervisor", "delegating"));

        let switched = mux.on_fragment(&Fragment::new("filing_analyst", "Risks: "));
        assert!(matches!(
            switched[0],
            RenderInstruction::BeginTraceBlock {
                producer: Producer::FilingAnalyst,
                ..
            }
        ));
    }

    #[test]
    fn test_unknown_producer_dropped() {
        let mut mux = StreamMultiplexer::new();
        mux.on_fragment(&Fragment::new("supervisor", "thinking"));

        // Unknown producer: no instruction, no buffer, no switch
        let dropped = mux.on_fragment(&Fragment::new("router", "control"));
        assert!(dropped.is_empty());

        // Supervisor is still the active producer; no new block
        let resumed = mux.on_fragment(&Fragment::new("supervisor", " more"));
        assert_eq!(resumed.len(), 1);
        assert_eq!(mux.buffer(Producer::Supervisor), Some("thinking more"));
    }

    #[test]
    fn test_empty_fragment_is_noop() {
        let mut mux = StreamMultiplexer::new();
        let instructions = mux.on_fragment(&Fragment::new("price_analyst", ""));
        assert!(instructions.is_empty());
        assert_eq!(mux.buffer(Producer::PriceAnalyst), None);

        // The empty fragment must not count as a switch either: the next
        // non-empty fragment still opens the block.
        let next = mux.on_fragment(&Fragment::new("price_analyst", "data"));
        assert!(matches!(next[0], RenderInstruction::BeginTraceBlock { .. }));
    }

    #[test]
    fn test_returning_producer_starts_fresh_span() {
        let mut mux = StreamMultiplexer::new();
        mux.on_fragment(&Fragment::new("supervisor", "first pass"));
        mux.on_fragment(&Fragment::new("price_analyst", "prices"));

        let back = mux.on_fragment(&Fragment::new("supervisor", "second pass"));
        assert!(matches!(back[0], RenderInstruction::BeginTraceBlock { .. }));
        assert_eq!(mux.buffer(Producer::Supervisor), Some("second pass"));
    }

    #[test]
    fn test_answer_producer_has_no_block() {
        let mut mux = StreamMultiplexer::new();
        let instructions = mux.on_fragment(&Fragment::new("synthesizer", "Overall, "));

        assert_eq!(instructions.len(), 1);
        assert!(matches!(
            &instructions[0],
            RenderInstruction::ReplaceSlot {
                slot: Slot::Answer,
                ..
            }
        ));
    }

    #[test]
    fn test_escaping_applied_once_per_render() {
        let mut mux = StreamMultiplexer::new();
        mux.on_fragment(&Fragment::new("synthesizer", "Revenue: $500M"));
        let instructions = mux.on_fragment(&Fragment::new("synthesizer", " and growing"));

        // Buffer stays raw; each replace escapes the full buffer exactly once
        assert_eq!(mux.answer(), Some("Revenue: $500M and growing"));
        match &instructions[0] {
            RenderInstruction::ReplaceSlot { text, .. } => {
                assert_eq!(text, "Revenue: \\$500M and growing");
            }
            other => panic!("expected ReplaceSlot, got {other:?}"),
        }
    }

    #[test]
    fn test_finalize_exactly_once() {
        let mut mux = StreamMultiplexer::new();
        assert!(mux.finalize(TraceOutcome::Complete).is_some());
        assert!(mux.finalize(TraceOutcome::Complete).is_none());
    }

    #[tokio::test]
    async fn test_stream_error_finalizes_before_propagating() {
        let fragments = vec![
            frag("supervisor", "partial reasoning"),
            Err(Error::PipelineFailed("model unreachable".to_string())),
        ];
        let mut sink = CollectSink::new();
        let result = multiplex(stream::iter(fragments), &mut sink).await;

        assert!(result.is_err());
        assert_eq!(finalize_count(&sink), 1);
        assert!(matches!(
            sink.instructions().last(),
            Some(RenderInstruction::FinalizeTrace {
                outcome: TraceOutcome::Error
            })
        ));
        // Partial trace output was rendered before the failure
        assert_eq!(
            sink.latest_text(Slot::Trace(Producer::Supervisor)),
            Some("partial reasoning")
        );
    }

    #[tokio::test]
    async fn test_turn_output_carries_raw_answer() {
        let fragments = vec![
            frag("supervisor", "asking price analyst"),
            frag("price_analyst", "NVDA: $495 -> $530"),
            frag("synthesizer", "Price rose to $530. "),
            frag("synthesizer", "Recommendation: hold."),
        ];
        let mut sink = CollectSink::new();
        let output = multiplex(stream::iter(fragments), &mut sink).await.unwrap();

        assert_eq!(
            output.answer.as_deref(),
            Some("Price rose to $530. Recommendation: hold.")
        );
        // The rendered slot got the escaped form
        assert_eq!(
            sink.latest_text(Slot::Answer),
            Some("Price rose to \\$530. Recommendation: hold.")
        );
    }

    #[tokio::test]
    async fn test_turn_without_answer_producer() {
        let fragments = vec![frag("supervisor", "nothing to do")];
        let mut sink = CollectSink::new();
        let output = multiplex(stream::iter(fragments), &mut sink).await.unwrap();
        assert_eq!(output.answer, None);
    }
}
