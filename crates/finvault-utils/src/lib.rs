//! Shared utilities for FinVault
//!
//! This crate provides common functionality used across the FinVault workspace,
//! including logging setup and application-level configuration.

pub mod config;
pub mod logging;

pub use config::{FinvaultConfig, ModelConfig, ModelProvider};
pub use logging::init_tracing;
