//! Core abstractions for FinVault
//!
//! This crate defines the fundamental types shared across the FinVault
//! workspace: error types, the per-turn execution context, and the boundary
//! to the external agent pipeline.

pub mod context;
pub mod error;
pub mod pipeline;

pub use context::Context;
pub use error::{Error, Result};
pub use pipeline::{AgentPipeline, ChatRole, Fragment, FragmentStream, TurnInput, TurnMessage};
