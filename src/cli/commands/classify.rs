//! Classify Command
//!
//! Local check of which paths the configured patterns select and how each is
//! labelled. No network access.
//!
//! Usage:
//!   azdoc classify infra/main.bicep apim/policies/global.xml

use std::path::Path;

use crate::analyzer::{PatternMatcher, classify};
use crate::cli::ui::Output;
use crate::config::ConfigLoader;
use crate::types::Result;

/// One classified path
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub path: String,
    pub matched: bool,
    pub service: &'static str,
}

pub fn classify_paths(matcher: &PatternMatcher, paths: &[String]) -> Vec<Classification> {
    paths
        .iter()
        .map(|path| Classification {
            path: path.clone(),
            matched: matcher.matches(path),
            service: classify(path).label(),
        })
        .collect()
}

pub fn run(config_path: &Path, paths: &[String], patterns: Option<&str>) -> Result<()> {
    let patterns: Vec<String> = match patterns {
        Some(raw) => raw
            .split(',')
            .map(str::trim)
            .filter(|p| !p.is_empty())
            .map(String::from)
            .collect(),
        None => ConfigLoader::load_inputs(config_path)?.patterns(),
    };
    let matcher = PatternMatcher::new(&patterns)?;

    let output = Output::new();
    output.header(&format!("Classification ({} patterns)", matcher.len()));
    for item in classify_paths(&matcher, paths) {
        if item.matched {
            output.success(&format!("{}  →  {}", item.path, item.service));
        } else {
            output.warning(&format!("{}  (not matched)", item.path));
        }
    }
    Ok(())
}
