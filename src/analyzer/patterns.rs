//! Azure Integration File Patterns
//!
//! Single source of truth for "is this an Azure integration file". Patterns use
//! standard glob semantics: `**` spans directories, `*` and `?` stay within one
//! path component, and matching is case-sensitive.

use glob::{MatchOptions, Pattern};
use tracing::debug;

use crate::types::{AzdocError, Result};

/// Default pattern set used when configuration supplies none
pub const DEFAULT_PATTERNS: &[&str] = &[
    // Logic Apps
    "**/*logicapp*.json",
    "**/*logic-app*.json",
    "**/workflow.json",
    // API Management
    "**/apim/**/*.xml",
    "**/*apim*.xml",
    "**/*policy*.xml",
    // Messaging
    "**/servicebus-*.json",
    "**/*servicebus*.json",
    "**/eventhub-*.json",
    "**/*eventhub*.json",
    // Azure Functions bindings
    "**/function.json",
    // Infrastructure as code
    "**/*.bicep",
    "**/*.tf",
    // Any YAML mentioning azure
    "**/*azure*.yaml",
    "**/*azure*.yml",
    "**/azure/**/*.yaml",
    "**/azure/**/*.yml",
];

/// Owned copy of the default patterns
pub fn default_patterns() -> Vec<String> {
    DEFAULT_PATTERNS.iter().map(|p| p.to_string()).collect()
}

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// Compiled pattern set
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    patterns: Vec<Pattern>,
}

impl PatternMatcher {
    /// Compile patterns, rejecting any that are not valid globs
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let patterns = patterns
            .iter()
            .map(|p| {
                Pattern::new(p.as_ref()).map_err(|e| {
                    AzdocError::config(format!("Invalid file pattern '{}': {}", p.as_ref(), e))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { patterns })
    }

    /// Matcher over [`DEFAULT_PATTERNS`]
    pub fn azure_defaults() -> Self {
        Self {
            patterns: DEFAULT_PATTERNS
                .iter()
                .filter_map(|p| Pattern::new(p).ok())
                .collect(),
        }
    }

    /// True iff any pattern matches `path`
    pub fn matches(&self, path: &str) -> bool {
        self.patterns
            .iter()
            .any(|p| p.matches_with(path, MATCH_OPTIONS))
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

/// Uncompiled form of [`PatternMatcher::matches`]; invalid patterns never match
pub fn matches<S: AsRef<str>>(path: &str, patterns: &[S]) -> bool {
    patterns.iter().any(|p| match Pattern::new(p.as_ref()) {
        Ok(pattern) => pattern.matches_with(path, MATCH_OPTIONS),
        Err(e) => {
            debug!("Skipping invalid pattern '{}': {}", p.as_ref(), e);
            false
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_single_pattern() {
        assert!(matches(
            "infra/servicebus-queue.json",
            &["**/servicebus-*.json"]
        ));
        assert!(!matches(
            "infra/servicebus-queue.json",
            &["**/eventhub-*.json"]
        ));
    }

    #[test]
    fn test_defaults_cover_azure_artifacts() {
        let matcher = PatternMatcher::azure_defaults();
        for path in [
            "workflows/order-logicapp.json",
            "src/OrderFlow/workflow.json",
            "infra/apim/policies/global.xml",
            "infra/apim-policy.xml",
            "messaging/servicebus-orders.json",
            "messaging/eventhub-telemetry.json",
            "functions/ProcessOrder/function.json",
            "infra/modules/storage.bicep",
            "terraform/main.tf",
            "pipelines/azure-pipelines.yml",
            "deploy/azure-config.yaml",
            "azure/deploy.yml",
            "infra/azure/aks/values.yaml",
        ] {
            assert!(matcher.matches(path), "expected match for {}", path);
        }
    }

    #[test]
    fn test_defaults_reject_unrelated_files() {
        let matcher = PatternMatcher::azure_defaults();
        for path in ["infra/notes.txt", "src/main.rs", "README.md", "config/app.yaml"] {
            assert!(!matcher.matches(path), "unexpected match for {}", path);
        }
    }

    #[test]
    fn test_case_sensitive() {
        assert!(!matches("infra/Main.TF", &["**/*.tf"]));
    }

    #[test]
    fn test_star_stays_within_component() {
        assert!(!matches("a/b/c.tf", &["a/*.tf"]));
        assert!(matches("a/b/c.tf", &["a/**/*.tf"]));
    }

    #[test]
    fn test_invalid_pattern_rejected_on_compile() {
        let err = PatternMatcher::new(&["**/[.json"]).unwrap_err();
        assert!(err.is_config());
        assert!(!matches("x/[.json", &["**/[.json"]));
    }

    proptest! {
        #[test]
        fn prop_matches_iff_any_pattern_matches(
            dir in "[a-z]{1,8}",
            stem in "[a-z-]{1,12}",
            ext in prop::sample::select(vec!["json", "xml", "bicep", "tf", "txt", "yml"]),
        ) {
            let path = format!("{}/{}.{}", dir, stem, ext);
            let set = default_patterns();
            let any_single = set.iter().any(|p| matches(&path, std::slice::from_ref(p)));
            prop_assert_eq!(matches(&path, &set), any_single);
            prop_assert_eq!(PatternMatcher::new(&set).unwrap().matches(&path), any_single);
        }
    }
}
