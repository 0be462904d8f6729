//! Boundary to the external agent pipeline
//!
//! The multi-agent graph (supervisor, analysts, synthesizer) lives outside
//! this workspace. From FinVault's point of view it is a component that,
//! given one turn's input, emits a lazy, finite, non-restartable sequence of
//! producer-tagged text fragments. The consumer pulls one fragment at a time;
//! the pipeline suspends between fragments.

use crate::{Context, Result};
use futures::stream::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;

/// Role of a message in the conversation handed to the pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    /// Message authored by the user
    User,
    /// Message authored by the assistant (a previous turn's final answer)
    Assistant,
}

/// One message of conversation history in a turn's input
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnMessage {
    pub role: ChatRole,
    pub content: String,
}

impl TurnMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: content.into(),
        }
    }
}

/// Input for one user turn: the conversation so far, newest message last
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TurnInput {
    pub messages: Vec<TurnMessage>,
}

impl TurnInput {
    pub fn new(messages: Vec<TurnMessage>) -> Self {
        Self { messages }
    }

    /// The latest user message, if any
    pub fn latest_user_message(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == ChatRole::User)
            .map(|m| m.content.as_str())
    }
}

/// A producer-tagged slice of streamed text
///
/// Fragments arrive in strict temporal order but control may bounce between
/// producers, so consecutive fragments are not guaranteed to share a
/// producer. Fragments are ephemeral and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fragment {
    /// Producer role string attached by the pipeline (node name)
    pub producer: String,
    /// Text slice, possibly a partial token; may be empty for control chunks
    pub text: String,
}

impl Fragment {
    pub fn new(producer: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            producer: producer.into(),
            text: text.into(),
        }
    }
}

/// The fragment sequence produced by one pipeline run
pub type FragmentStream = Pin<Box<dyn Stream<Item = Result<Fragment>> + Send>>;

/// The external agent pipeline, seen from the rendering side
///
/// Implementations are expected to be expensive to construct and are built
/// once at process start, then shared read-only across sessions
/// (`Arc<dyn AgentPipeline>`). Running a turn must be side-effect-free on the
/// pipeline itself; any per-turn state belongs in the returned stream.
pub trait AgentPipeline: Send + Sync {
    /// Run one turn and return its fragment stream
    fn run(&self, turn: TurnInput, context: &Context) -> FragmentStream;
}
