//! Endpoint Resolution
//!
//! One strategy selection covers both deployment styles: a fixed provider
//! (`openai` / `azure`) or auto-detection from the endpoint host.

use url::Url;

use crate::config::{LlmSettings, ProviderKind};
use crate::constants::generation::{AZURE_HOST_SUFFIXES, OPENAI_API_BASE};
use crate::types::{AzdocError, Result};

/// How the API key is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthScheme {
    /// `api-key: <key>` (Azure OpenAI)
    ApiKeyHeader,
    /// `Authorization: Bearer <key>` (OpenAI and compatible gateways)
    Bearer,
}

/// Fully qualified chat-completion target
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedEndpoint {
    pub url: String,
    pub auth: AuthScheme,
    /// Value sent in the request's `model` field
    pub model: String,
    pub provider: &'static str,
}

/// True when the endpoint host belongs to an Azure-managed model gateway
pub fn is_azure_host(endpoint: &str) -> bool {
    Url::parse(endpoint)
        .ok()
        .and_then(|url| url.host_str().map(str::to_lowercase))
        .is_some_and(|host| AZURE_HOST_SUFFIXES.iter().any(|s| host.ends_with(s)))
}

/// Resolve URL, auth scheme and model from validated settings
pub fn resolve_endpoint(settings: &LlmSettings) -> Result<ResolvedEndpoint> {
    let azure = match settings.provider {
        ProviderKind::Azure => true,
        ProviderKind::OpenAi => false,
        ProviderKind::Auto => settings.endpoint.as_deref().is_some_and(is_azure_host),
    };

    if azure {
        let endpoint = settings.endpoint.as_deref().ok_or_else(|| {
            AzdocError::config("Azure OpenAI requires an endpoint")
        })?;
        let deployment = settings
            .deployment
            .clone()
            .unwrap_or_else(|| settings.model.clone());
        Ok(ResolvedEndpoint {
            url: azure_url(endpoint, &deployment, &settings.api_version)?,
            auth: AuthScheme::ApiKeyHeader,
            model: deployment,
            provider: "azure-openai",
        })
    } else {
        let base = settings.endpoint.as_deref().unwrap_or(OPENAI_API_BASE);
        let url = parse(base)?;
        let trimmed = url.as_str().trim_end_matches('/');
        let url = if trimmed.ends_with("/chat/completions") {
            trimmed.to_string()
        } else {
            format!("{}/chat/completions", trimmed)
        };
        Ok(ResolvedEndpoint {
            url,
            auth: AuthScheme::Bearer,
            model: settings.model.clone(),
            provider: "openai",
        })
    }
}

/// Bare resource roots get the deployment path and API version appended;
/// explicit deployment URLs are kept, gaining an API version if they lack one.
fn azure_url(endpoint: &str, deployment: &str, api_version: &str) -> Result<String> {
    let mut url = parse(endpoint)?;

    if !url.path().contains("/openai/deployments/") {
        let root = url.as_str().trim_end_matches('/').to_string();
        url = parse(&format!(
            "{}/openai/deployments/{}/chat/completions",
            root, deployment
        ))?;
    }

    if !url.query_pairs().any(|(k, _)| k == "api-version") {
        url.query_pairs_mut().append_pair("api-version", api_version);
    }

    Ok(url.to_string())
}

fn parse(endpoint: &str) -> Result<Url> {
    Url::parse(endpoint)
        .map_err(|e| AzdocError::config(format!("Invalid endpoint '{}': {}", endpoint, e)))
}
