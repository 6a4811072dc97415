//! Change Records
//!
//! Records produced by the source-control API and the values derived from them
//! as they move through the documentation pipeline.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Status of a file in a pull request, comparison, or commit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Added,
    Modified,
    Removed,
    Renamed,
}

impl FileStatus {
    /// Map a GitHub file status string.
    ///
    /// `copied`, `changed` and `unchanged` carry no distinct meaning here and
    /// are reported as modifications.
    pub fn from_github(status: &str) -> Self {
        match status {
            "added" => Self::Added,
            "removed" => Self::Removed,
            "renamed" => Self::Renamed,
            _ => Self::Modified,
        }
    }
}

impl fmt::Display for FileStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Added => write!(f, "added"),
            Self::Modified => write!(f, "modified"),
            Self::Removed => write!(f, "removed"),
            Self::Renamed => write!(f, "renamed"),
        }
    }
}

/// Changed file as reported by the source-control API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangedFile {
    pub path: String,
    pub status: FileStatus,
    pub additions: u32,
    pub deletions: u32,
    /// Absent for binary or oversized files
    pub patch: Option<String>,
}

/// Normalized per-file diff consumed by the prompt builder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDiff {
    pub filename: String,
    pub status: FileStatus,
    pub diff: String,
    pub additions: u32,
    pub deletions: u32,
}

/// Commit used as push context
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommitSummary {
    pub id: String,
    pub message: String,
    pub author_name: String,
}

impl CommitSummary {
    /// First line of the commit message
    pub fn title(&self) -> &str {
        self.message.lines().next().unwrap_or("")
    }
}

/// Event context that frames the user prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventMetadata {
    PullRequest {
        title: String,
        number: u64,
        body: Option<String>,
        author: String,
    },
    Push {
        branch: String,
        /// Oldest first; the last entry is the head commit
        commits: Vec<CommitSummary>,
    },
}

/// Markdown returned by the generator; never parsed, only sliced for previews
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedDocumentation(String);

impl GeneratedDocumentation {
    pub fn new(markdown: impl Into<String>) -> Self {
        Self(markdown.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for GeneratedDocumentation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for GeneratedDocumentation {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Repository-relative paths written by one run, in write order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocPaths(Vec<PathBuf>);

impl DocPaths {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, path: PathBuf) {
        self.0.push(path);
    }

    pub fn paths(&self) -> &[PathBuf] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Forward-slash form used for git tree entries and action outputs
    pub fn to_repo_strings(&self) -> Vec<String> {
        self.0.iter().map(|p| to_repo_path(p)).collect()
    }
}

impl From<Vec<PathBuf>> for DocPaths {
    fn from(paths: Vec<PathBuf>) -> Self {
        Self(paths)
    }
}

/// Render a relative path with `/` separators regardless of platform, dropping `.` components
pub fn to_repo_path(path: &std::path::Path) -> String {
    path.components()
        .filter(|c| !matches!(c, std::path::Component::CurDir))
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
