//! In-memory `SourceControl` for tests. Records every call in order and can be
//! told to fail one named operation.

use async_trait::async_trait;
use std::sync::Mutex;

use super::client::{IssueComment, RepoTree, SourceControl, TreeEntry};
use crate::types::{ChangedFile, CommitSummary, GitHubError, Result};

#[derive(Default)]
pub struct MockSourceControl {
    pub pr_files: Vec<ChangedFile>,
    pub pr_commits: Vec<CommitSummary>,
    pub compare_files: Vec<ChangedFile>,
    pub commit_files: Vec<ChangedFile>,
    pub tree: RepoTree,
    pub comments: Mutex<Vec<IssueComment>>,
    pub fail_on: Option<&'static str>,
    pub calls: Mutex<Vec<String>>,
    pub blobs: Mutex<Vec<String>>,
    pub tree_entries: Mutex<Vec<TreeEntry>>,
    pub commit_messages: Mutex<Vec<String>>,
    pub updated_refs: Mutex<Vec<(String, String)>>,
    pub titles: Mutex<Vec<(u64, String)>>,
}

impl MockSourceControl {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing_on(mut self, operation: &'static str) -> Self {
        self.fail_on = Some(operation);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn called(&self, operation: &str) -> bool {
        self.calls.lock().unwrap().iter().any(|c| c == operation)
    }

    fn record(&self, operation: &str) -> Result<()> {
        self.calls.lock().unwrap().push(operation.to_string());
        if self.fail_on == Some(operation) {
            return Err(GitHubError::new("MOCK", operation, Some(500), "injected failure").into());
        }
        Ok(())
    }
}

#[async_trait]
impl SourceControl for MockSourceControl {
    async fn list_pr_files(&self, _pr_number: u64) -> Result<Vec<ChangedFile>> {
        self.record("list_pr_files")?;
        Ok(self.pr_files.clone())
    }

    async fn list_pr_commits(&self, _pr_number: u64) -> Result<Vec<CommitSummary>> {
        self.record("list_pr_commits")?;
        Ok(self.pr_commits.clone())
    }

    async fn compare(&self, _base: &str, _head: &str) -> Result<Vec<ChangedFile>> {
        self.record("compare")?;
        Ok(self.compare_files.clone())
    }

    async fn get_commit_files(&self, _sha: &str) -> Result<Vec<ChangedFile>> {
        self.record("get_commit_files")?;
        Ok(self.commit_files.clone())
    }

    async fn get_ref(&self, _branch: &str) -> Result<String> {
        self.record("get_ref")?;
        Ok("base-commit".to_string())
    }

    async fn get_commit_tree(&self, _commit_sha: &str) -> Result<String> {
        self.record("get_commit_tree")?;
        Ok("base-tree".to_string())
    }

    async fn create_blob(&self, content_base64: &str) -> Result<String> {
        self.record("create_blob")?;
        let mut blobs = self.blobs.lock().unwrap();
        blobs.push(content_base64.to_string());
        Ok(format!("blob-{}", blobs.len()))
    }

    async fn create_tree(&self, _base_tree: &str, entries: &[TreeEntry]) -> Result<String> {
        self.record("create_tree")?;
        self.tree_entries.lock().unwrap().extend_from_slice(entries);
        Ok("new-tree".to_string())
    }

    async fn create_commit(&self, message: &str, _tree: &str, _parent: &str) -> Result<String> {
        self.record("create_commit")?;
        self.commit_messages.lock().unwrap().push(message.to_string());
        Ok("new-commit".to_string())
    }

    async fn update_ref(&self, branch: &str, sha: &str) -> Result<()> {
        self.record("update_ref")?;
        self.updated_refs
            .lock()
            .unwrap()
            .push((branch.to_string(), sha.to_string()));
        Ok(())
    }

    async fn list_issue_comments(&self, _issue_number: u64) -> Result<Vec<IssueComment>> {
        self.record("list_issue_comments")?;
        Ok(self.comments.lock().unwrap().clone())
    }

    async fn create_issue_comment(&self, _issue_number: u64, body: &str) -> Result<()> {
        self.record("create_issue_comment")?;
        let mut comments = self.comments.lock().unwrap();
        let id = comments.len() as u64 + 1;
        comments.push(IssueComment {
            id,
            body: body.to_string(),
        });
        Ok(())
    }

    async fn update_issue_comment(&self, comment_id: u64, body: &str) -> Result<()> {
        self.record("update_issue_comment")?;
        if let Some(comment) = self
            .comments
            .lock()
            .unwrap()
            .iter_mut()
            .find(|c| c.id == comment_id)
        {
            comment.body = body.to_string();
        }
        Ok(())
    }

    async fn update_pr_title(&self, pr_number: u64, title: &str) -> Result<()> {
        self.record("update_pr_title")?;
        self.titles
            .lock()
            .unwrap()
            .push((pr_number, title.to_string()));
        Ok(())
    }

    async fn get_tree_recursive(&self, _git_ref: &str) -> Result<RepoTree> {
        self.record("get_tree_recursive")?;
        Ok(self.tree.clone())
    }
}
