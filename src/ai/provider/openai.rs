//! OpenAI / Azure OpenAI Chat Client
//!
//! One POST per call. Non-2xx responses are classified into `GenerationError`
//! kinds; a 2xx response must carry non-empty content in its first choice.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::{debug, info};

use super::endpoint::{AuthScheme, ResolvedEndpoint, resolve_endpoint};
use super::ChatCompletion;
use crate::config::LlmSettings;
use crate::constants::generation::{CONNECTION_TIMEOUT_SECS, MAX_TOKENS, TEMPERATURE, TIMEOUT_SECS};
use crate::types::{AzdocError, GenerationError, Result};

/// Chat client with secure API key handling
pub struct ChatClient {
    /// Never exposed in logs or debug output
    api_key: SecretString,
    endpoint: ResolvedEndpoint,
    temperature: f32,
    max_tokens: u32,
    timeout: Duration,
    client: reqwest::Client,
}

impl std::fmt::Debug for ChatClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatClient")
            .field("api_key", &"[REDACTED]")
            .field("endpoint", &self.endpoint)
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

impl ChatClient {
    pub fn new(settings: &LlmSettings) -> Result<Self> {
        let endpoint = resolve_endpoint(settings)?;
        let timeout = Duration::from_secs(TIMEOUT_SECS);

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(CONNECTION_TIMEOUT_SECS))
            .build()
            .map_err(|e| AzdocError::config(format!("Failed to create HTTP client: {}", e)))?;

        debug!(
            provider = endpoint.provider,
            url = %endpoint.url,
            "Resolved generation endpoint"
        );

        Ok(Self {
            api_key: settings.api_key.clone(),
            endpoint,
            temperature: TEMPERATURE,
            max_tokens: MAX_TOKENS,
            timeout,
            client,
        })
    }

    fn build_request<'a>(&'a self, system: &'a str, user: &'a str) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &self.endpoint.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: system,
                },
                ChatMessage {
                    role: "user",
                    content: user,
                },
            ],
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }

    fn map_transport(&self, err: reqwest::Error) -> GenerationError {
        if err.is_timeout() {
            GenerationError::transport(format!(
                "Request timed out after {}s",
                self.timeout.as_secs()
            ))
        } else if err.is_connect() {
            GenerationError::transport(format!("Connection failed: {}", err))
        } else {
            GenerationError::transport(format!("Request failed: {}", err))
        }
    }
}

#[async_trait]
impl ChatCompletion for ChatClient {
    async fn complete(
        &self,
        system: &str,
        user: &str,
    ) -> std::result::Result<String, GenerationError> {
        info!(
            "Generating with {} (model: {}, temperature: {})",
            self.endpoint.provider, self.endpoint.model, self.temperature
        );

        let start_time = Instant::now();
        let request = self.build_request(system, user);

        let builder = self.client.post(&self.endpoint.url).json(&request);
        let builder = match self.endpoint.auth {
            AuthScheme::ApiKeyHeader => builder.header("api-key", self.api_key.expose_secret()),
            AuthScheme::Bearer => builder.bearer_auth(self.api_key.expose_secret()),
        };

        let response = builder.send().await.map_err(|e| self.map_transport(e))?;
        let status = response.status();
        let body = response.text().await.map_err(|e| self.map_transport(e))?;

        debug!(
            status = status.as_u16(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "Generation response received"
        );

        if !status.is_success() {
            return Err(GenerationError::from_status(status.as_u16(), &body));
        }

        parse_completion(&body)
    }

    fn name(&self) -> &str {
        self.endpoint.provider
    }

    fn model(&self) -> &str {
        &self.endpoint.model
    }
}

/// Validate a 2xx body and return the first choice's content
pub fn parse_completion(body: &str) -> std::result::Result<String, GenerationError> {
    let response: ChatCompletionResponse = serde_json::from_str(body)
        .map_err(|e| GenerationError::malformed(format!("Response is not valid JSON: {}", e)))?;

    if let Some(usage) = &response.usage {
        debug!(
            prompt_tokens = usage.prompt_tokens,
            completion_tokens = usage.completion_tokens,
            "Token usage"
        );
    }

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| GenerationError::malformed("Response contained no choices"))?;

    match choice.message.and_then(|m| m.content) {
        Some(content) if !content.trim().is_empty() => Ok(content),
        _ => Err(GenerationError::malformed("Response contained no content")),
    }
}

// =============================================================================
// API Types
// =============================================================================

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
}
