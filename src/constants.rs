//! Global Constants
//!
//! Centralized constants for configuration and tuning.
//! All magic numbers and marker strings should be defined here with documentation.

/// Prompt construction constants
pub mod prompt {
    /// Maximum characters of a single file diff included in the user prompt
    pub const MAX_DIFF_CHARS: usize = 2000;

    /// Length of the commit id prefix shown for push context
    pub const SHORT_SHA_LEN: usize = 7;

    /// Body used for removed files
    pub const REMOVED_FILE_DIFF: &str = "(File removed)";

    /// Body used when the source-control API omits the patch (binary or oversized)
    pub const MISSING_PATCH_DIFF: &str = "(Binary file or diff too large to display)";
}

/// Chat-completion request constants
pub mod generation {
    /// Single request timeout (seconds); requests are never retried
    pub const TIMEOUT_SECS: u64 = 60;

    /// Connection timeout (seconds)
    pub const CONNECTION_TIMEOUT_SECS: u64 = 10;

    /// Sampling temperature
    pub const TEMPERATURE: f32 = 0.3;

    /// Maximum output tokens
    pub const MAX_TOKENS: u32 = 3000;

    /// Default OpenAI API root
    pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1";

    /// Default model identifier
    pub const DEFAULT_MODEL: &str = "gpt-4";

    /// Azure OpenAI REST API version appended to bare resource roots
    pub const AZURE_API_VERSION: &str = "2024-02-15-preview";

    /// Host suffixes that identify an Azure-hosted model gateway
    pub const AZURE_HOST_SUFFIXES: &[&str] = &[
        ".openai.azure.com",
        ".cognitiveservices.azure.com",
        ".azure-api.net",
    ];
}

/// GitHub REST constants
pub mod github {
    /// Default REST API root (overridden by `GITHUB_API_URL` on GHES)
    pub const API_BASE: &str = "https://api.github.com";

    /// Items per page for list endpoints
    pub const PER_PAGE: usize = 100;

    /// Maximum pages fetched for a single listing (GitHub caps PR files at 3000)
    pub const MAX_PAGES: usize = 30;

    /// Request timeout (seconds)
    pub const TIMEOUT_SECS: u64 = 30;

    /// User agent sent with every request
    pub const USER_AGENT: &str = concat!("azdoc/", env!("CARGO_PKG_VERSION"));

    /// SHA reported for the missing side of a branch create/delete push
    pub const ZERO_SHA: &str = "0000000000000000000000000000000000000000";
}

/// Markers embedded in generated artifacts
pub mod markers {
    /// Hidden marker identifying the single managed PR comment
    pub const COMMENT_MARKER: &str = "<!-- azdoc:azure-integration-docs -->";

    /// Commit message marker that suppresses documentation runs
    pub const SKIP_MARKER: &str = "[skip-docs]";

    /// Suffix appended to PR titles when title tagging is enabled
    pub const TITLE_SUFFIX: &str = " [docs]";

    /// Separator written between entries of the centralized document
    pub const CENTRAL_SEPARATOR: &str = "\n\n---\n\n";

    /// Characters of generated documentation shown in the PR comment preview
    pub const PREVIEW_CHARS: usize = 1500;
}

/// Output locations and fixed messages
pub mod paths {
    /// Default documentation folder
    pub const DOCS_FOLDER: &str = "docs";

    /// Default centralized documentation file name
    pub const CENTRAL_DOC_FILE: &str = "azure-integrations.md";

    /// Audit report file name (inside the docs folder)
    pub const AUDIT_FILE: &str = "azure-integration-audit.md";

    /// Commit message used for scheduled audits
    pub const AUDIT_COMMIT_MESSAGE: &str = "docs: scheduled Azure integration audit [skip-docs]";

    /// Default commit message template; `{target}` expands to `PR #n` or the branch
    pub const DEFAULT_COMMIT_MESSAGE: &str =
        "docs: update Azure integration documentation for {target} [skip-docs]";

    /// Default project config file
    pub const CONFIG_FILE: &str = ".github/azdoc.toml";
}
