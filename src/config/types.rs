//! Configuration Types
//!
//! `ActionInputs` is the raw, layered view of the action's options (every field
//! optional, scalars accepted in native or string form). `Config` is the validated,
//! immutable value bound once per run.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Component, Path, PathBuf};

use crate::analyzer::patterns::default_patterns;
use crate::constants::{generation, markers, paths};
use crate::types::{AzdocError, Result, to_repo_path};

// =============================================================================
// Documentation Mode
// =============================================================================

/// Where generated documentation is written
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DocMode {
    /// One file per pull request
    #[default]
    Pr,
    /// Append to a single shared file
    Centralized,
    /// Both of the above
    Both,
}

impl DocMode {
    pub fn writes_pr(&self) -> bool {
        matches!(self, Self::Pr | Self::Both)
    }

    pub fn writes_central(&self) -> bool {
        matches!(self, Self::Centralized | Self::Both)
    }

    /// A push has no PR to attach per-PR docs to
    pub fn for_push(self) -> Self {
        match self {
            Self::Pr => Self::Centralized,
            other => other,
        }
    }
}

impl fmt::Display for DocMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocMode::Pr => write!(f, "pr"),
            DocMode::Centralized => write!(f, "centralized"),
            DocMode::Both => write!(f, "both"),
        }
    }
}

impl std::str::FromStr for DocMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "pr" => Ok(DocMode::Pr),
            "centralized" => Ok(DocMode::Centralized),
            "both" => Ok(DocMode::Both),
            _ => Err(format!(
                "Invalid mode '{}'. Valid values: pr, centralized, both",
                s
            )),
        }
    }
}

// =============================================================================
// Provider Selection
// =============================================================================

/// Chat-completion provider strategy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Detect Azure from the endpoint host, OpenAI otherwise
    #[default]
    Auto,
    OpenAi,
    Azure,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderKind::Auto => write!(f, "auto"),
            ProviderKind::OpenAi => write!(f, "openai"),
            ProviderKind::Azure => write!(f, "azure"),
        }
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(ProviderKind::Auto),
            "openai" => Ok(ProviderKind::OpenAi),
            "azure" | "azure-openai" => Ok(ProviderKind::Azure),
            _ => Err(format!(
                "Unknown provider '{}'. Valid values: auto, openai, azure",
                s
            )),
        }
    }
}

// =============================================================================
// Raw Inputs
// =============================================================================

/// Scalar option value as delivered by TOML or the environment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum InputValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    Text(String),
}

impl InputValue {
    fn text(&self) -> String {
        match self {
            InputValue::Bool(b) => b.to_string(),
            InputValue::Integer(i) => i.to_string(),
            InputValue::Float(f) => f.to_string(),
            InputValue::Text(s) => s.trim().to_string(),
        }
    }
}

/// Layered action options before validation
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct ActionInputs {
    pub github_token: Option<InputValue>,
    pub api_key: Option<InputValue>,
    /// Alternate spelling of `api-key`, used when `api-key` is unset
    pub openai_api_key: Option<InputValue>,
    pub provider: Option<InputValue>,
    pub endpoint: Option<InputValue>,
    pub deployment: Option<InputValue>,
    pub model: Option<InputValue>,
    pub api_version: Option<InputValue>,
    pub docs_folder: Option<InputValue>,
    pub commit_message: Option<InputValue>,
    pub file_patterns: Option<InputValue>,
    pub mode: Option<InputValue>,
    pub central_doc_file: Option<InputValue>,
    pub include_architecture_diagram: Option<InputValue>,
    pub include_security_notes: Option<InputValue>,
    pub include_cost_impact: Option<InputValue>,
    pub pr_comment: Option<InputValue>,
    pub update_pr_title: Option<InputValue>,
    pub auto_update: Option<InputValue>,
    pub fail_on_error: Option<InputValue>,
    pub max_commits_to_analyze: Option<InputValue>,
}

impl ActionInputs {
    /// `api-key`, falling back to `openai-api-key`
    pub fn api_key(&self) -> Option<String> {
        text(&self.api_key).or_else(|| text(&self.openai_api_key))
    }

    /// Comma-separated `file-patterns`, or the Azure defaults when unset or blank
    pub fn patterns(&self) -> Vec<String> {
        let parsed: Vec<String> = text(&self.file_patterns)
            .map(|raw| {
                raw.split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();
        if parsed.is_empty() {
            default_patterns()
        } else {
            parsed
        }
    }
}

/// Non-empty text value, empty strings count as unset
fn text(value: &Option<InputValue>) -> Option<String> {
    value.as_ref().map(InputValue::text).filter(|s| !s.is_empty())
}

fn boolean(value: &Option<InputValue>, key: &str, default: bool) -> Result<bool> {
    match value {
        Some(InputValue::Bool(b)) => Ok(*b),
        Some(other) => match other.text().to_lowercase().as_str() {
            "" => Ok(default),
            "true" | "yes" | "1" => Ok(true),
            "false" | "no" | "0" => Ok(false),
            invalid => Err(AzdocError::config(format!(
                "'{}' must be true or false, got '{}'",
                key, invalid
            ))),
        },
        None => Ok(default),
    }
}

/// Checkout-relative path with `.` components dropped; absolute paths and `..` are rejected
fn repo_relative(raw: &str, key: &str) -> Result<PathBuf> {
    let mut normalized = PathBuf::new();
    for component in Path::new(raw).components() {
        match component {
            Component::Normal(part) => normalized.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => {
                return Err(AzdocError::config(format!(
                    "'{}' must be a path inside the repository, got '{}'",
                    key, raw
                )));
            }
        }
    }
    Ok(normalized)
}

fn integer(value: &Option<InputValue>, key: &str, default: usize) -> Result<usize> {
    match text(value) {
        None => Ok(default),
        Some(raw) => raw.parse::<usize>().map_err(|_| {
            AzdocError::config(format!(
                "'{}' must be a non-negative integer, got '{}'",
                key, raw
            ))
        }),
    }
}

// =============================================================================
// Validated Configuration
// =============================================================================

/// Chat-completion settings
#[derive(Debug)]
pub struct LlmSettings {
    pub provider: ProviderKind,
    pub api_key: SecretString,
    pub endpoint: Option<String>,
    pub deployment: Option<String>,
    pub model: String,
    pub api_version: String,
}

/// Flags that add content to prompts; strictly additive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FeatureFlags {
    pub security_notes: bool,
    pub cost_impact: bool,
    pub architecture_diagram: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            security_notes: true,
            cost_impact: false,
            architecture_diagram: true,
        }
    }
}

/// Validated run configuration
#[derive(Debug)]
pub struct Config {
    pub github_token: SecretString,
    pub llm: LlmSettings,
    pub docs_folder: PathBuf,
    pub commit_message: String,
    pub file_patterns: Vec<String>,
    pub mode: DocMode,
    pub central_doc_file: String,
    pub features: FeatureFlags,
    pub pr_comment: bool,
    pub update_pr_title: bool,
    pub auto_update: bool,
    pub fail_on_error: bool,
    pub max_commits: usize,
}

impl Config {
    /// Validate raw inputs. The only place a `Config` is constructed.
    pub fn from_inputs(inputs: &ActionInputs) -> Result<Self> {
        let github_token = text(&inputs.github_token).ok_or_else(|| {
            AzdocError::config("'github-token' is required")
        })?;
        let api_key = inputs.api_key().ok_or_else(|| {
            AzdocError::config(
                "'api-key' is required (or set OPENAI_API_KEY / AZURE_OPENAI_API_KEY)",
            )
        })?;

        let mode = match text(&inputs.mode) {
            Some(raw) => raw.parse::<DocMode>().map_err(AzdocError::Config)?,
            None => DocMode::default(),
        };

        let provider = match text(&inputs.provider) {
            Some(raw) => raw.parse::<ProviderKind>().map_err(AzdocError::Config)?,
            None => ProviderKind::default(),
        };
        let endpoint = text(&inputs.endpoint);
        if provider == ProviderKind::Azure && endpoint.is_none() {
            return Err(AzdocError::config(
                "provider 'azure' requires 'endpoint' to be set",
            ));
        }

        let max_commits = integer(&inputs.max_commits_to_analyze, "max-commits-to-analyze", 5)?;
        if max_commits == 0 {
            return Err(AzdocError::config(
                "'max-commits-to-analyze' must be greater than 0",
            ));
        }

        let file_patterns = inputs.patterns();

        let docs_folder = repo_relative(
            &text(&inputs.docs_folder).unwrap_or_else(|| paths::DOCS_FOLDER.to_string()),
            "docs-folder",
        )?;
        let central_doc_file = repo_relative(
            &text(&inputs.central_doc_file).unwrap_or_else(|| paths::CENTRAL_DOC_FILE.to_string()),
            "central-doc-file",
        )?;
        if central_doc_file.as_os_str().is_empty() {
            return Err(AzdocError::config("'central-doc-file' must name a file"));
        }
        let central_doc_file = to_repo_path(&central_doc_file);

        let defaults = FeatureFlags::default();
        let features = FeatureFlags {
            security_notes: boolean(
                &inputs.include_security_notes,
                "include-security-notes",
                defaults.security_notes,
            )?,
            cost_impact: boolean(
                &inputs.include_cost_impact,
                "include-cost-impact",
                defaults.cost_impact,
            )?,
            architecture_diagram: boolean(
                &inputs.include_architecture_diagram,
                "include-architecture-diagram",
                defaults.architecture_diagram,
            )?,
        };

        Ok(Self {
            github_token: SecretString::from(github_token),
            llm: LlmSettings {
                provider,
                api_key: SecretString::from(api_key),
                endpoint,
                deployment: text(&inputs.deployment),
                model: text(&inputs.model)
                    .unwrap_or_else(|| generation::DEFAULT_MODEL.to_string()),
                api_version: text(&inputs.api_version)
                    .unwrap_or_else(|| generation::AZURE_API_VERSION.to_string()),
            },
            docs_folder,
            commit_message: text(&inputs.commit_message)
                .unwrap_or_else(|| paths::DEFAULT_COMMIT_MESSAGE.to_string()),
            file_patterns,
            mode,
            central_doc_file,
            features,
            pr_comment: boolean(&inputs.pr_comment, "pr-comment", true)?,
            update_pr_title: boolean(&inputs.update_pr_title, "update-pr-title", false)?,
            auto_update: boolean(&inputs.auto_update, "auto-update", true)?,
            fail_on_error: boolean(&inputs.fail_on_error, "fail-on-error", false)?,
            max_commits,
        })
    }

    /// Expand the commit message template for a PR (`PR #n`) or branch target.
    ///
    /// Always carries the skip marker.
    pub fn commit_message_for(&self, target: &str) -> String {
        let message = self.commit_message.replace("{target}", target);
        if message.contains(markers::SKIP_MARKER) {
            message
        } else {
            format!("{} {}", message, markers::SKIP_MARKER)
        }
    }

    /// Redacted view used by `azdoc config show`
    pub fn display_view(&self) -> ConfigView<'_> {
        ConfigView {
            github_token: "[REDACTED]",
            api_key: "[REDACTED]",
            provider: self.llm.provider,
            endpoint: self.llm.endpoint.as_deref(),
            deployment: self.llm.deployment.as_deref(),
            model: &self.llm.model,
            api_version: &self.llm.api_version,
            docs_folder: self.docs_folder.to_string_lossy().into_owned(),
            commit_message: &self.commit_message,
            file_patterns: &self.file_patterns,
            mode: self.mode,
            central_doc_file: &self.central_doc_file,
            include_architecture_diagram: self.features.architecture_diagram,
            include_security_notes: self.features.security_notes,
            include_cost_impact: self.features.cost_impact,
            pr_comment: self.pr_comment,
            update_pr_title: self.update_pr_title,
            auto_update: self.auto_update,
            fail_on_error: self.fail_on_error,
            max_commits_to_analyze: self.max_commits,
        }
    }
}

/// Serializable, secret-free projection of `Config`
#[derive(Debug, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ConfigView<'a> {
    pub github_token: &'static str,
    pub api_key: &'static str,
    pub provider: ProviderKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deployment: Option<&'a str>,
    pub model: &'a str,
    pub api_version: &'a str,
    pub docs_folder: String,
    pub commit_message: &'a str,
    pub file_patterns: &'a [String],
    pub mode: DocMode,
    pub central_doc_file: &'a str,
    pub include_architecture_diagram: bool,
    pub include_security_notes: bool,
    pub include_cost_impact: bool,
    pub pr_comment: bool,
    pub update_pr_title: bool,
    pub auto_update: bool,
    pub fail_on_error: bool,
    pub max_commits_to_analyze: usize,
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
impl ActionInputs {
    /// Inputs carrying only the two required credentials
    pub(crate) fn minimal() -> Self {
        Self {
            github_token: Some(InputValue::Text("ghp_test".into())),
            api_key: Some(InputValue::Text("sk-test".into())),
            ..Default::default()
        }
    }
}
