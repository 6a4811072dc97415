//! Configuration Loader (Figment-based)
//!
//! Loads and merges action options from multiple sources using Figment:
//! 1. Optional project file (.github/azdoc.toml)
//! 2. GitHub Actions inputs (INPUT_* env vars, e.g. INPUT_GITHUB-TOKEN)
//! 3. Environment overrides (AZDOC_* env vars, e.g. AZDOC_DOCS_FOLDER)
//!
//! Well-known token variables (GITHUB_TOKEN, OPENAI_API_KEY, AZURE_OPENAI_API_KEY)
//! fill credentials that none of the layers supplied.

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::env;
use std::path::Path;

use tracing::debug;

use super::types::{ActionInputs, Config, InputValue};
use crate::types::{AzdocError, Result};

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load and validate configuration: defaults → file → action inputs → env
    pub fn load(config_path: &Path) -> Result<Config> {
        Config::from_inputs(&Self::load_inputs(config_path)?)
    }

    /// Merged raw inputs without validation
    pub fn load_inputs(config_path: &Path) -> Result<ActionInputs> {
        let mut figment = Figment::new().merge(Serialized::defaults(ActionInputs::default()));

        if config_path.exists() {
            debug!("Loading config from: {}", config_path.display());
            figment = figment.merge(Toml::file(config_path));
        }

        figment = figment
            .merge(Env::prefixed("INPUT_"))
            .merge(Env::prefixed("AZDOC_").map(|key| key.as_str().replace('_', "-").into()));

        let mut inputs = Self::extract(figment)?;
        Self::apply_env_fallbacks(&mut inputs);
        Ok(inputs)
    }

    /// Extract raw inputs from an assembled figment
    pub fn extract(figment: Figment) -> Result<ActionInputs> {
        figment
            .extract()
            .map_err(|e| AzdocError::config(format!("Configuration error: {}", e)))
    }

    /// Fill missing credentials from the conventional environment variables
    fn apply_env_fallbacks(inputs: &mut ActionInputs) {
        fill_from_env(&mut inputs.github_token, &["GITHUB_TOKEN"]);
        if inputs.api_key().is_none() {
            fill_from_env(&mut inputs.api_key, &["OPENAI_API_KEY", "AZURE_OPENAI_API_KEY"]);
        }
    }
}

fn fill_from_env(slot: &mut Option<InputValue>, vars: &[&str]) {
    let is_empty = match slot {
        None => true,
        Some(InputValue::Text(s)) => s.trim().is_empty(),
        Some(_) => false,
    };
    if !is_empty {
        return;
    }
    if let Some(value) = vars
        .iter()
        .filter_map(|name| env::var(name).ok())
        .find(|v| !v.trim().is_empty())
    {
        *slot = Some(InputValue::Text(value));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DocMode;

    fn from_toml(content: &str) -> Result<Config> {
        let figment = Figment::new()
            .merge(Serialized::defaults(ActionInputs::default()))
            .merge(Toml::string(content));
        Config::from_inputs(&ConfigLoader::extract(figment)?)
    }

    #[test]
    fn test_toml_native_values() {
        let config = from_toml(
            r#"
            github-token = "ghp_x"
            api-key = "sk-x"
            mode = "both"
            include-cost-impact = true
            max-commits-to-analyze = 3
            file-patterns = "**/*.bicep"
            "#,
        )
        .unwrap();
        assert_eq!(config.mode, DocMode::Both);
        assert!(config.features.cost_impact);
        assert_eq!(config.max_commits, 3);
        assert_eq!(config.file_patterns, vec!["**/*.bicep"]);
    }

    #[test]
    fn test_openai_api_key_alias() {
        let config = from_toml(
            r#"
            github-token = "ghp_x"
            openai-api-key = "sk-alias"
            "#,
        )
        .unwrap();
        assert_eq!(config.llm.model, "gpt-4");
    }

    #[test]
    fn test_openai_api_key_alias_from_action_inputs() {
        let figment = Figment::new()
            .merge(Serialized::defaults(ActionInputs::default()))
            .merge(Env::prefixed("AZDOC_ALIAS_TEST_INPUT_"));
        // SAFETY: the variable names are unique to this test
        unsafe {
            env::set_var("AZDOC_ALIAS_TEST_INPUT_GITHUB-TOKEN", "ghp_env");
            env::set_var("AZDOC_ALIAS_TEST_INPUT_OPENAI-API-KEY", "sk-env-alias");
        }
        let inputs = ConfigLoader::extract(figment);
        unsafe {
            env::remove_var("AZDOC_ALIAS_TEST_INPUT_GITHUB-TOKEN");
            env::remove_var("AZDOC_ALIAS_TEST_INPUT_OPENAI-API-KEY");
        }

        let inputs = inputs.unwrap();
        assert_eq!(inputs.api_key().as_deref(), Some("sk-env-alias"));
        assert!(Config::from_inputs(&inputs).is_ok());
    }

    #[test]
    fn test_invalid_mode_is_config_error() {
        let err = from_toml(
            r#"
            github-token = "ghp_x"
            api-key = "sk-x"
            mode = "everything"
            "#,
        )
        .unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_fill_from_env_keeps_existing() {
        let mut slot = Some(InputValue::Text("explicit".into()));
        fill_from_env(&mut slot, &["PATH"]);
        assert_eq!(slot, Some(InputValue::Text("explicit".into())));

        let mut empty = Some(InputValue::Text("  ".into()));
        fill_from_env(&mut empty, &["AZDOC_TEST_SURELY_UNSET_VAR"]);
        assert_eq!(empty, Some(InputValue::Text("  ".into())));
    }
}
