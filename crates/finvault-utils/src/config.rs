//! Configuration management utilities

use serde::{Deserialize, Serialize};

/// Provider hosting the language model behind the agent pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelProvider {
    /// Local model runner
    Ollama,
}

impl ModelProvider {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelProvider::Ollama => "ollama",
        }
    }
}

/// Configuration for the language model used by the pipeline host
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Model identifier (e.g., "qwen3:8b")
    pub name: String,
    /// Sampling temperature (0.0 = deterministic)
    pub temperature: f32,
    /// Which service hosts this model
    pub provider: ModelProvider,
}

impl ModelConfig {
    /// Provider-qualified model identifier, e.g. "ollama:qwen3:8b"
    pub fn qualified_name(&self) -> String {
        format!("{}:{}", self.provider.as_str(), self.name)
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            name: "qwen3:8b".to_string(),
            temperature: 0.0,
            provider: ModelProvider::Ollama,
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinvaultConfig {
    /// Application name
    pub app_name: String,
    /// Environment (dev, prod, etc.)
    pub environment: String,
    /// Model used by whoever hosts the agent pipeline
    pub model: ModelConfig,
    /// Maximum agent loop iterations per turn
    pub max_iterations: usize,
    /// Maximum tokens the model can process at once
    pub context_window: usize,
}

impl Default for FinvaultConfig {
    fn default() -> Self {
        Self {
            app_name: "finvault".to_string(),
            environment: "development".to_string(),
            model: ModelConfig::default(),
            max_iterations: 10,
            context_window: 8192,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = FinvaultConfig::default();
        assert_eq!(config.app_name, "finvault");
        assert_eq!(config.max_iterations, 10);
        assert_eq!(config.context_window, 8192);
    }

    #[test]
    fn test_qualified_model_name() {
        let model = ModelConfig::default();
        assert_eq!(model.qualified_name(), "ollama:qwen3:8b");
    }
}
