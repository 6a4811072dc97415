pub mod changes;
pub mod error;
pub mod utils;

pub use changes::{
    ChangedFile, CommitSummary, DocPaths, EventMetadata, FileDiff, FileStatus,
    GeneratedDocumentation, to_repo_path,
};
pub use error::{
    AzdocError, CommitError, CommitStep, GenerationError, GenerationErrorKind, GitHubError,
    Result,
};
pub use utils::{log_warn, preview, truncate_chars, truncate_with_marker};

// =============================================================================
// Domain Newtypes
// =============================================================================

use std::fmt;

/// `owner/name` repository slug
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepoSlug {
    owner: String,
    name: String,
}

impl RepoSlug {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

impl std::str::FromStr for RepoSlug {
    type Err = AzdocError;

    fn from_str(s: &str) -> Result<Self> {
        match s.split_once('/') {
            Some((owner, name))
                if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
            {
                Ok(Self::new(owner, name))
            }
            _ => Err(AzdocError::config(format!(
                "Invalid repository '{}'. Expected owner/name",
                s
            ))),
        }
    }
}
