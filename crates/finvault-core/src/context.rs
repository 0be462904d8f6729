//! Execution context for turn processing
//!
//! The `Context` struct provides a flexible key-value store for passing
//! runtime configuration and state into the agent pipeline for one turn.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Well-known context keys for common configuration
pub mod keys {
    /// Identifying string of the user driving this session (SEC EDGAR identity)
    pub const IDENTITY: &str = "identity";
    /// Session ID for tracking
    pub const SESSION_ID: &str = "session_id";
    /// Thread ID of the conversation
    pub const THREAD_ID: &str = "thread_id";
    /// Model identifier the pipeline host should use
    pub const MODEL: &str = "model";
}

/// Context passed to the agent pipeline when a turn is run
///
/// Context provides a flexible way to hand configuration and state across the
/// pipeline boundary. It supports both untyped JSON values and typed
/// accessors for common fields.
///
/// # Example
///
/// ```
/// use finvault_core::Context;
///
/// let ctx = Context::new()
///     .with_identity("analyst@example.com")
///     .with_session_id("session-123");
///
/// assert_eq!(ctx.identity(), Some("analyst@example.com"));
/// assert_eq!(ctx.session_id(), Some("session-123"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct Context {
    /// Key-value storage for context data
    data: HashMap<String, serde_json::Value>,
}

impl Context {
    /// Create a new empty context
    pub fn new() -> Self {
        Self::default()
    }

    // =========== Builder Methods ===========

    /// Set the user identity string
    pub fn with_identity(mut self, identity: impl Into<String>) -> Self {
        self.insert(keys::IDENTITY, serde_json::json!(identity.into()));
        self
    }

    /// Set the session ID
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.insert(keys::SESSION_ID, serde_json::json!(session_id.into()));
        self
    }

    /// Set the conversation thread ID
    pub fn with_thread_id(mut self, thread_id: impl Into<String>) -> Self {
        self.insert(keys::THREAD_ID, serde_json::json!(thread_id.into()));
        self
    }

    /// Set the model identifier
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.insert(keys::MODEL, serde_json::json!(model.into()));
        self
    }

    // =========== Common Accessors ===========

    /// Get the user identity string
    pub fn identity(&self) -> Option<&str> {
        self.get(keys::IDENTITY).and_then(|v| v.as_str())
    }

    /// Get the session ID
    pub fn session_id(&self) -> Option<&str> {
        self.get(keys::SESSION_ID).and_then(|v| v.as_str())
    }

    /// Get the conversation thread ID
    pub fn thread_id(&self) -> Option<&str> {
        self.get(keys::THREAD_ID).and_then(|v| v.as_str())
    }

    /// Get the model identifier
    pub fn model(&self) -> Option<&str> {
        self.get(keys::MODEL).and_then(|v| v.as_str())
    }

    // =========== Generic Key-Value Operations ===========

    /// Insert a value into the context
    pub fn insert(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.data.insert(key.into(), value);
    }

    /// Get a value from the context
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.data.get(key)
    }

    /// Insert a typed value into the context
    ///
    /// Serializes the value to JSON before storing.
    pub fn insert_typed<T: Serialize>(
        &mut self,
        key: impl Into<String>,
        value: &T,
    ) -> crate::Result<()> {
        let json_value = serde_json::to_value(value).map_err(|e| {
            crate::Error::ProcessingFailed(format!("Failed to serialize context value: {e}"))
        })?;
        self.data.insert(key.into(), json_value);
        Ok(())
    }

    /// Get a typed value from the context
    ///
    /// Deserializes the JSON value into the specified type.
    pub fn get_typed<T: for<'de> Deserialize<'de>>(&self, key: &str) -> crate::Result<Option<T>> {
        match self.data.get(key) {
            None => Ok(None),
            Some(value) => {
                let typed = serde_json::from_value(value.clone()).map_err(|e| {
                    crate::Error::ProcessingFailed(format!(
                        "Failed to deserialize context value: {e}"
                    ))
                })?;
                Ok(Some(typed))
            }
        }
    }

    /// Check if a key exists in the context
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Remove a value from the context
    pub fn remove(&mut self, key: &str) -> Option<serde_json::Value> {
        self.data.remove(key)
    }

    /// Get the number of entries in the context
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Check if the context is empty
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Merge another context into this one (other values override)
    pub fn merge(&mut self, other: Context) {
        self.data.extend(other.data);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_operations() {
        let mut ctx = Context::new();
        assert!(ctx.is_empty());

        ctx.insert("key", serde_json::json!("value"));
        assert_eq!(ctx.len(), 1);
        assert!(ctx.contains_key("key"));
        assert_eq!(ctx.get("key"), Some(&serde_json::json!("value")));

        ctx.remove("key");
        assert!(ctx.is_empty());
    }

    #[test]
    fn test_builder_chain() {
        let ctx = Context::new()
            .with_identity("analyst@example.com")
            .with_session_id("sess-123")
            .with_thread_id("thread-456")
            .with_model("ollama:qwen3:8b");

        assert_eq!(ctx.identity(), Some("analyst@example.com"));
        assert_eq!(ctx.session_id(), Some("sess-123"));
        assert_eq!(ctx.thread_id(), Some("thread-456"));
        assert_eq!(ctx.model(), Some("ollama:qwen3:8b"));
    }

    #[test]
    fn test_typed_insert_get() {
        #[derive(Debug, Serialize, Deserialize, PartialEq)]
        struct TestData {
            value: i32,
        }

        let mut ctx = Context::new();
        ctx.insert_typed("test", &TestData { value: 42 }).unwrap();

        let retrieved: TestData = ctx.get_typed("test").unwrap().unwrap();
        assert_eq!(retrieved, TestData { value: 42 });
    }

    #[test]
    fn test_merge() {
        let mut ctx1 = Context::new().with_identity("a@b.com");
        let ctx2 = Context::new().with_identity("c@d.com").with_session_id("s");

        ctx1.merge(ctx2);
        assert_eq!(ctx1.identity(), Some("c@d.com")); // overridden
        assert_eq!(ctx1.session_id(), Some("s")); // merged
    }

    #[test]
    fn test_get_typed_missing_key() {
        let ctx = Context::new();
        let result: crate::Result<Option<i32>> = ctx.get_typed("missing");
        assert!(result.unwrap().is_none());
    }
}
