//! Chat-Completion Provider Abstraction
//!
//! Defines the `ChatCompletion` trait the documentation generator calls, and the
//! reqwest-backed client that speaks to OpenAI or Azure OpenAI.
//!
//! ## Modules
//!
//! - `endpoint`: provider strategy, URL construction and auth scheme selection
//! - `openai`: HTTP client, status classification, response validation

mod endpoint;
mod openai;

pub use endpoint::{AuthScheme, ResolvedEndpoint, is_azure_host, resolve_endpoint};
pub use openai::{ChatClient, parse_completion};

use async_trait::async_trait;
use std::sync::Arc;

use crate::types::GenerationError;

/// Single-shot chat completion: one system and one user message in, text out
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    /// Issue exactly one request. Implementations never retry.
    async fn complete(&self, system: &str, user: &str) -> Result<String, GenerationError>;

    /// Provider name for logging
    fn name(&self) -> &str;

    /// Model or deployment in use
    fn model(&self) -> &str;
}

/// Shared provider handle
pub type SharedChat = Arc<dyn ChatCompletion>;
