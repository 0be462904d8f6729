//! Message types for conversation history

use chrono::{DateTime, Utc};
use finvault_core::{ChatRole, TurnMessage};
use serde::{Deserialize, Serialize};

/// One message of conversation history
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// Create a user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role: ChatRole::User,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Create an assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            role: ChatRole::Assistant,
            content: content.into(),
            timestamp: Utc::now(),
        }
    }

    /// Project this message into the pipeline's turn-input shape
    pub fn to_turn_message(&self) -> TurnMessage {
        TurnMessage {
            role: self.role,
            content: self.content.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_construction() {
        let msg = ChatMessage::user("analyze NVDA");
        assert_eq!(msg.role, ChatRole::User);
        assert_eq!(msg.content, "analyze NVDA");
        assert!(!msg.id.is_empty());
    }

    #[test]
    fn test_to_turn_message() {
        let msg = ChatMessage::assistant("NVDA is up");
        let turn = msg.to_turn_message();
        assert_eq!(turn.role, ChatRole::Assistant);
        assert_eq!(turn.content, "NVDA is up");
    }
}
