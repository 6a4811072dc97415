//! Config Command
//!
//! Inspect the effective action configuration.
//!
//! Usage:
//!   azdoc config show [-f toml|json]
//!   azdoc config path

use std::path::Path;

use crate::cli::ui::Output;
use crate::config::ConfigLoader;
use crate::types::{AzdocError, Result};

/// Print the merged, validated configuration with secrets redacted
pub fn show(config_path: &Path, format: &str) -> Result<()> {
    let config = ConfigLoader::load(config_path)?;
    let view = config.display_view();

    let rendered = match format {
        "json" => serde_json::to_string_pretty(&view)?,
        "toml" => toml::to_string_pretty(&view)
            .map_err(|e| AzdocError::config(format!("Cannot render config: {}", e)))?,
        other => {
            return Err(AzdocError::config(format!(
                "Unknown format '{}'. Valid values: toml, json",
                other
            )));
        }
    };
    println!("{}", rendered);
    Ok(())
}

/// Print where configuration is read from
pub fn path(config_path: &Path) -> Result<()> {
    let output = Output::new();
    output.section("Configuration sources (lowest to highest priority)");
    let state = if config_path.exists() {
        "found"
    } else {
        "not found"
    };
    println!("  File:    {} ({})", config_path.display(), state);
    println!("  Inputs:  INPUT_<NAME> (workflow `with:` values)");
    println!("  Env:     AZDOC_<NAME>");
    println!("  Secrets: GITHUB_TOKEN, OPENAI_API_KEY, AZURE_OPENAI_API_KEY (fallbacks)");
    Ok(())
}
