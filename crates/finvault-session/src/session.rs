//! Conversation session and per-turn stream driving

use crate::error::Result;
use crate::message::ChatMessage;
use finvault_core::{AgentPipeline, ChatRole, Context, Error, TurnInput};
use finvault_stream::{RenderSink, multiplex};
use tracing::{debug, info};
use uuid::Uuid;

/// Maximum number of messages to keep in history
const MAX_HISTORY_SIZE: usize = 50;

/// One user's conversation with the analysis pipeline
///
/// The session owns message history and re-invokes the pipeline per user
/// turn, handing the resulting fragment stream to the multiplexer. Turns
/// are processed sequentially; a session never runs two passes at once.
#[derive(Debug)]
pub struct ConversationSession {
    thread_id: Uuid,
    messages: Vec<ChatMessage>,
    max_history: usize,
}

impl Default for ConversationSession {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationSession {
    /// Create a new conversation session
    pub fn new() -> Self {
        Self {
            thread_id: Uuid::new_v4(),
            messages: Vec::new(),
            max_history: MAX_HISTORY_SIZE,
        }
    }

    /// Create with a custom history bound
    pub fn with_max_history(max_history: usize) -> Self {
        Self {
            thread_id: Uuid::new_v4(),
            messages: Vec::new(),
            max_history,
        }
    }

    /// Unique identifier of this conversation thread
    pub fn thread_id(&self) -> Uuid {
        self.thread_id
    }

    /// The conversation history, oldest first
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Number of messages in the conversation
    pub fn message_count(&self) -> usize {
        self.messages.len()
    }

    /// Start a fresh conversation: history cleared, new thread id
    pub fn clear(&mut self) {
        self.messages.clear();
        self.thread_id = Uuid::new_v4();
    }

    fn turn_input(&self) -> TurnInput {
        TurnInput::new(self.messages.iter().map(ChatMessage::to_turn_message).collect())
    }

    fn trim_history(&mut self) {
        while self.messages.len() > self.max_history {
            self.messages.remove(0);
        }
    }

    /// Process one user turn
    ///
    /// Appends the user message, runs the pipeline over a copy of the
    /// history, and streams the output through the multiplexer into `sink`.
    /// The final answer is appended to history and returned. If the stream
    /// fails mid-turn the sink has already been finalized in the error
    /// state; the failure propagates and no assistant message is recorded.
    pub async fn handle_turn(
        &mut self,
        input: impl Into<String>,
        pipeline: &dyn AgentPipeline,
        context: &Context,
        sink: &mut dyn RenderSink,
    ) -> Result<String> {
        let input = input.into();
        info!(thread_id = %self.thread_id, "processing user turn");

        self.messages.push(ChatMessage::user(&input));
        self.trim_history();

        let mut turn_context = context.clone();
        turn_context.merge(Context::new().with_thread_id(self.thread_id.to_string()));

        let stream = pipeline.run(self.turn_input(), &turn_context);
        let output = multiplex(stream, sink).await?;

        let answer = output.answer.ok_or_else(|| {
            Error::ProcessingFailed("pipeline produced no final answer".to_string())
        })?;

        debug!(thread_id = %self.thread_id, chars = answer.len(), "turn complete");
        self.messages.push(ChatMessage::assistant(&answer));
        self.trim_history();

        Ok(answer)
    }

    /// Whether the last message in history is from the given role
    pub fn last_role(&self) -> Option<ChatRole> {
        self.messages.last().map(|m| m.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use finvault_core::{Fragment, FragmentStream};
    use finvault_stream::CollectSink;
    use futures::stream;
    use std::sync::Mutex;

    /// Pipeline that replays a fixed fragment script and records its input
    struct ScriptedPipeline {
        script: Vec<finvault_core::Result<Fragment>>,
        seen_input: Mutex<Option<TurnInput>>,
    }

    impl ScriptedPipeline {
        fn new(script: Vec<finvault_core::Result<Fragment>>) -> Self {
            Self {
                script,
                seen_input: Mutex::new(None),
            }
        }

        fn ok(fragments: &[(&str, &str)]) -> Self {
            Self::new(
                fragments
                    .iter()
                    .map(|(p, t)| Ok(Fragment::new(*p, *t)))
                    .collect(),
            )
        }
    }

    impl AgentPipeline for ScriptedPipeline {
        fn run(&self, turn: TurnInput, _context: &Context) -> FragmentStream {
            *self.seen_input.lock().expect("lock poisoned") = Some(turn);
            let script: Vec<finvault_core::Result<Fragment>> = self
                .script
                .iter()
                .map(|r| match r {
                    Ok(f) => Ok(f.clone()),
                    Err(e) => Err(finvault_core::Error::PipelineFailed(e.to_string())),
                })
                .collect();
            Box::pin(stream::iter(script))
        }
    }

    #[tokio::test]
    async fn test_turn_records_user_and_assistant() {
        let pipeline = ScriptedPipeline::ok(&[
            ("supervisor", "delegating to price analyst"),
            ("price_analyst", "NVDA rose 7% this quarter"),
            ("synthesizer", "NVDA shows strong momentum."),
        ]);
        let mut session = ConversationSession::new();
        let mut sink = CollectSink::new();

        let answer = session
            .handle_turn("analyze NVDA", &pipeline, &Context::new(), &mut sink)
            .await
            .unwrap();

        assert_eq!(answer, "NVDA shows strong momentum.");
        assert_eq!(session.message_count(), 2);
        assert_eq!(session.last_role(), Some(ChatRole::Assistant));
    }

    #[tokio::test]
    async fn test_turn_input_carries_history() {
        let pipeline = ScriptedPipeline::ok(&[("synthesizer", "Second answer.")]);
        let mut session = ConversationSession::new();
        session.messages.push(ChatMessage::user("first question"));
        session.messages.push(ChatMessage::assistant("first answer"));
        let mut sink = CollectSink::new();

        session
            .handle_turn("follow-up", &pipeline, &Context::new(), &mut sink)
            .await
            .unwrap();

        let seen = pipeline.seen_input.lock().unwrap().clone().unwrap();
        assert_eq!(seen.messages.len(), 3);
        assert_eq!(seen.latest_user_message(), Some("follow-up"));
    }

    #[tokio::test]
    async fn test_failed_turn_keeps_user_message_only() {
        let pipeline = ScriptedPipeline::new(vec![
            Ok(Fragment::new("supervisor", "partial")),
            Err(finvault_core::Error::PipelineFailed("model died".to_string())),
        ]);
        let mut session = ConversationSession::new();
        let mut sink = CollectSink::new();

        let result = session
            .handle_turn("analyze AMD", &pipeline, &Context::new(), &mut sink)
            .await;

        assert!(result.is_err());
        assert_eq!(session.message_count(), 1);
        assert_eq!(session.last_role(), Some(ChatRole::User));
    }

    #[tokio::test]
    async fn test_turn_without_answer_is_an_error() {
        let pipeline = ScriptedPipeline::ok(&[("supervisor", "no worker responded")]);
        let mut session = ConversationSession::new();
        let mut sink = CollectSink::new();

        let result = session
            .handle_turn("analyze AMD", &pipeline, &Context::new(), &mut sink)
            .await;
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_history_is_bounded() {
        let pipeline = ScriptedPipeline::ok(&[("synthesizer", "ok")]);
        let mut session = ConversationSession::with_max_history(4);
        let mut sink = CollectSink::new();

        for _ in 0..5 {
            session
                .handle_turn("again", &pipeline, &Context::new(), &mut sink)
                .await
                .unwrap();
        }

        assert_eq!(session.message_count(), 4);
    }

    #[test]
    fn test_clear_starts_new_thread() {
        let mut session = ConversationSession::new();
        session.messages.push(ChatMessage::user("hello"));
        let old_thread = session.thread_id();

        session.clear();
        assert_eq!(session.message_count(), 0);
        assert_ne!(session.thread_id(), old_thread);
    }
}
