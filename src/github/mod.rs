//! GitHub Integration
//!
//! - `client`: `SourceControl` trait and the REST implementation
//! - `publisher`: multi-file commits through the git data API
//! - `comments`: PR comment upsert and title suffix

pub mod client;
pub mod comments;
pub mod publisher;

#[cfg(test)]
pub(crate) mod mock;

pub use client::{GitHubClient, IssueComment, RepoTree, SourceControl, TreeEntry};
pub use comments::{CommentAction, append_title_suffix, render_comment, upsert_comment};
pub use publisher::CommitPublisher;
