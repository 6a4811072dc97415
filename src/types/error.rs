//! Unified Error Type System
//!
//! Centralized error types for the entire action.
//!
//! ## Error Families
//!
//! - **Config**: invalid or missing options (fatal, raised before any network call)
//! - **Generation**: chat-completion failures, classified by HTTP status or transport
//! - **Commit**: the first failing step of blob/tree/commit/ref publishing
//! - **GitHub**: any other source-control REST failure

use std::fmt;
use thiserror::Error;

// =============================================================================
// Generation Errors
// =============================================================================

/// Classified cause of a documentation generation failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerationErrorKind {
    /// 401 from the generation endpoint
    AuthFailure,
    /// 404: wrong endpoint or deployment name
    EndpointNotFound,
    /// 429 from the provider
    RateLimited,
    /// 400, usually a rejected prompt or parameter
    BadRequest,
    /// Timeout, DNS failure, refused connection
    TransportFailure,
    /// 2xx with a body lacking `choices[0].message.content`
    MalformedResponse,
    /// Any other non-2xx status
    GenericApiFailure,
}

impl fmt::Display for GenerationErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AuthFailure => write!(f, "AUTH"),
            Self::EndpointNotFound => write!(f, "NOT_FOUND"),
            Self::RateLimited => write!(f, "RATE_LIMIT"),
            Self::BadRequest => write!(f, "BAD_REQUEST"),
            Self::TransportFailure => write!(f, "TRANSPORT"),
            Self::MalformedResponse => write!(f, "MALFORMED_RESPONSE"),
            Self::GenericApiFailure => write!(f, "API_ERROR"),
        }
    }
}

/// Generation failure with enough context to act on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationError {
    pub kind: GenerationErrorKind,
    pub message: String,
    /// HTTP status when the failure came from a response
    pub status: Option<u16>,
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(f, "[{}:{}] {}", self.kind, status, self.message),
            None => write!(f, "[{}] {}", self.kind, self.message),
        }
    }
}

impl std::error::Error for GenerationError {}

impl GenerationError {
    pub fn new(kind: GenerationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            status: None,
        }
    }

    pub fn with_status(mut self, status: u16) -> Self {
        self.status = Some(status);
        self
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(GenerationErrorKind::TransportFailure, message)
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::new(GenerationErrorKind::MalformedResponse, message)
    }

    /// Classify a non-2xx response from the generation endpoint.
    ///
    /// `body` is the raw response text; for 400 the provider's `error.message`
    /// field is surfaced when present.
    pub fn from_status(status: u16, body: &str) -> Self {
        let provider_message = provider_error_message(body);
        let (kind, message) = match status {
            401 => (
                GenerationErrorKind::AuthFailure,
                "Authentication failed. Check the API key for the generation endpoint".to_string(),
            ),
            404 => (
                GenerationErrorKind::EndpointNotFound,
                "Endpoint or deployment not found. Check the endpoint URL and deployment name"
                    .to_string(),
            ),
            429 => (
                GenerationErrorKind::RateLimited,
                "Rate limit exceeded on the generation endpoint".to_string(),
            ),
            400 => (
                GenerationErrorKind::BadRequest,
                match provider_message {
                    Some(msg) => format!("Bad request: {}", msg),
                    None => "Bad request".to_string(),
                },
            ),
            _ => (
                GenerationErrorKind::GenericApiFailure,
                match provider_message {
                    Some(msg) => format!("API error ({}): {}", status, msg),
                    None => format!("API error ({})", status),
                },
            ),
        };
        Self::new(kind, message).with_status(status)
    }
}

/// Extract `error.message` (OpenAI and Azure share this shape)
fn provider_error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")
        .and_then(|e| e.get("message"))
        .and_then(|m| m.as_str())
        .filter(|m| !m.is_empty())
        .map(String::from)
}

// =============================================================================
// GitHub Errors
// =============================================================================

/// Failed source-control REST call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitHubError {
    pub method: String,
    pub endpoint: String,
    pub status: Option<u16>,
    pub message: String,
}

impl fmt::Display for GitHubError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            Some(status) => write!(
                f,
                "{} {} returned {}: {}",
                self.method, self.endpoint, status, self.message
            ),
            None => write!(f, "{} {} failed: {}", self.method, self.endpoint, self.message),
        }
    }
}

impl std::error::Error for GitHubError {}

impl GitHubError {
    pub fn new(
        method: impl Into<String>,
        endpoint: impl Into<String>,
        status: Option<u16>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            method: method.into(),
            endpoint: endpoint.into(),
            status,
            message: message.into(),
        }
    }
}

// =============================================================================
// Commit Errors
// =============================================================================

/// Step of the blob → tree → commit → ref sequence
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitStep {
    ResolveRef,
    ResolveCommit,
    CreateBlob(String),
    CreateTree,
    CreateCommit,
    UpdateRef,
}

impl fmt::Display for CommitStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ResolveRef => write!(f, "resolve branch ref"),
            Self::ResolveCommit => write!(f, "resolve base commit"),
            Self::CreateBlob(path) => write!(f, "create blob for {}", path),
            Self::CreateTree => write!(f, "create tree"),
            Self::CreateCommit => write!(f, "create commit"),
            Self::UpdateRef => write!(f, "update branch ref"),
        }
    }
}

#[derive(Debug, Error)]
#[error("Commit failed at step '{step}': {source}")]
pub struct CommitError {
    pub step: CommitStep,
    #[source]
    pub source: Box<AzdocError>,
}

impl CommitError {
    pub fn new(step: CommitStep, source: impl Into<AzdocError>) -> Self {
        Self {
            step,
            source: Box::new(source.into()),
        }
    }
}

// =============================================================================
// Application Error
// =============================================================================

#[derive(Debug, Error)]
pub enum AzdocError {
    // -------------------------------------------------------------------------
    // System Errors (auto From impl)
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    // -------------------------------------------------------------------------
    // Domain Errors
    // -------------------------------------------------------------------------
    #[error("Config error: {0}")]
    Config(String),

    #[error("Event payload error: {0}")]
    Event(String),

    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Commit(#[from] CommitError),

    #[error("GitHub API error: {0}")]
    GitHub(#[from] GitHubError),
}

pub type Result<T> = std::result::Result<T, AzdocError>;

impl AzdocError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    pub fn event(message: impl Into<String>) -> Self {
        Self::Event(message.into())
    }

    /// Configuration errors abort before any side effect regardless of `fail-on-error`
    pub fn is_config(&self) -> bool {
        matches!(self, Self::Config(_))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_classification() {
        assert_eq!(
            GenerationError::from_status(401, "").kind,
            GenerationErrorKind::AuthFailure
        );
        assert_eq!(
            GenerationError::from_status(404, "").kind,
            GenerationErrorKind::EndpointNotFound
        );
        assert_eq!(
            GenerationError::from_status(429, "").kind,
            GenerationErrorKind::RateLimited
        );
        assert_eq!(
            GenerationError::from_status(400, "").kind,
            GenerationErrorKind::BadRequest
        );
        let other = GenerationError::from_status(503, "upstream");
        assert_eq!(other.kind, GenerationErrorKind::GenericApiFailure);
        assert_eq!(other.status, Some(503));
    }

    #[test]
    fn test_bad_request_surfaces_provider_message() {
        let body = r#"{"error":{"message":"max_tokens is too large","type":"invalid_request_error"}}"#;
        let err = GenerationError::from_status(400, body);
        assert!(err.message.contains("max_tokens is too large"));
    }

    #[test]
    fn test_generation_error_display() {
        let err = GenerationError::from_status(429, "");
        assert!(err.to_string().starts_with("[RATE_LIMIT:429]"));

        let err = GenerationError::transport("connection refused");
        assert_eq!(err.to_string(), "[TRANSPORT] connection refused");
    }

    #[test]
    fn test_commit_error_wraps_step() {
        let gh = GitHubError::new("POST", "/git/blobs", Some(422), "invalid");
        let err = CommitError::new(CommitStep::CreateBlob("docs/a.md".into()), gh);
        let text = err.to_string();
        assert!(text.contains("create blob for docs/a.md"));
        assert!(text.contains("422"));
    }
}
