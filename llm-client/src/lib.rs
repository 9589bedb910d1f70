//! Completion client shared by the paper-podcast workspace
//!
//! Provides one interface over OpenAI-compatible hosted providers:
//! - Groq (default)
//! - OpenRouter
//! - Cerebras
//! - OpenAI
//!
//! plus a scripted [`MockProvider`] for offline tests.

pub mod config;
pub mod error;
pub mod provider;
pub mod providers;

pub use config::LlmConfig;
pub use error::{LlmError, Result};
pub use provider::{LlmProvider, LlmRequest, LlmResponse, TokenUsage};
pub use providers::{MockProvider, ProviderKind, get_provider};
