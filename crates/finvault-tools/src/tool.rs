//! Tool trait definition

use async_trait::async_trait;
use finvault_core::Result;
use serde_json::Value;

/// Trait for tools the agent pipeline can invoke
///
/// Evidence tools are total functions from the pipeline's perspective:
/// external-fetch failures are recovered inside the tool and returned as
/// descriptive in-band text. An `Err` from `execute` means caller misuse
/// (malformed parameters, unknown identifiers), not a transient fetch
/// failure.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Execute the tool with given parameters
    ///
    /// # Arguments
    ///
    /// * `params` - Tool input as JSON value (should match input_schema)
    ///
    /// # Returns
    ///
    /// Tool output as JSON value; evidence tools return a single text node
    async fn execute(&self, params: Value) -> Result<Value>;

    /// Get the tool's name
    ///
    /// Must be unique within a ToolRegistry
    fn name(&self) -> &str;

    /// Get the tool's description
    ///
    /// This description helps the pipeline decide when to use this tool
    fn description(&self) -> &str;

    /// Get the tool's input schema (JSON Schema format)
    ///
    /// Describes the parameters this tool expects. The pipeline uses this
    /// schema to generate valid tool calls.
    fn input_schema(&self) -> Value;
}
