//! Commit Publisher
//!
//! Builds one commit from local files through the git data API:
//! ref → base commit → blobs → tree → commit → ref update. Every step feeds the
//! next, so the first failure stops the sequence and the branch is untouched
//! unless the final ref update runs.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use futures::future::try_join_all;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, info};

use super::client::{SourceControl, TreeEntry};
use crate::types::{CommitError, CommitStep, Result, to_repo_path};

pub struct CommitPublisher {
    scm: Arc<dyn SourceControl>,
    workspace: PathBuf,
}

impl CommitPublisher {
    /// `workspace` is the checkout root that relative paths are read from
    pub fn new(scm: Arc<dyn SourceControl>, workspace: impl Into<PathBuf>) -> Self {
        Self {
            scm,
            workspace: workspace.into(),
        }
    }

    /// Commit `paths` (repository-relative) onto `branch`; returns the new commit SHA
    pub async fn publish(&self, branch: &str, paths: &[PathBuf], message: &str) -> Result<String> {
        let base_commit = self
            .scm
            .get_ref(branch)
            .await
            .map_err(|e| CommitError::new(CommitStep::ResolveRef, e))?;

        let base_tree = self
            .scm
            .get_commit_tree(&base_commit)
            .await
            .map_err(|e| CommitError::new(CommitStep::ResolveCommit, e))?;

        let entries = try_join_all(paths.iter().map(|path| self.upload(path))).await?;
        debug!("Created {} blobs", entries.len());

        let tree = self
            .scm
            .create_tree(&base_tree, &entries)
            .await
            .map_err(|e| CommitError::new(CommitStep::CreateTree, e))?;

        let commit = self
            .scm
            .create_commit(message, &tree, &base_commit)
            .await
            .map_err(|e| CommitError::new(CommitStep::CreateCommit, e))?;

        self.scm
            .update_ref(branch, &commit)
            .await
            .map_err(|e| CommitError::new(CommitStep::UpdateRef, e))?;

        info!(
            "Committed {} file(s) to {} ({})",
            paths.len(),
            branch,
            commit
        );
        Ok(commit)
    }

    async fn upload(&self, path: &Path) -> Result<TreeEntry> {
        let repo_path = to_repo_path(path);
        let step = || CommitStep::CreateBlob(repo_path.clone());

        let bytes = tokio::fs::read(self.workspace.join(path))
            .await
            .map_err(|e| CommitError::new(step(), e))?;

        let sha = self
            .scm
            .create_blob(&STANDARD.encode(&bytes))
            .await
            .map_err(|e| CommitError::new(step(), e))?;

        Ok(TreeEntry {
            path: repo_path,
            sha,
        })
    }
}
