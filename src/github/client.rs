//! GitHub REST Client
//!
//! `SourceControl` is the seam every flow talks to; `GitHubClient` implements it
//! against the REST v3 API with a repository-scoped token.

use async_trait::async_trait;
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, warn};

use crate::constants::github::{API_BASE, MAX_PAGES, PER_PAGE, TIMEOUT_SECS, USER_AGENT};
use crate::types::{
    AzdocError, ChangedFile, CommitSummary, FileStatus, GitHubError, RepoSlug, Result,
    truncate_chars,
};

// =============================================================================
// Domain Types
// =============================================================================

/// One entry of a tree being created (always a regular file)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeEntry {
    pub path: String,
    pub sha: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IssueComment {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub body: String,
}

/// File paths of a recursive tree listing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RepoTree {
    pub paths: Vec<String>,
    /// GitHub stops listing very large trees and sets this flag
    pub truncated: bool,
}

// =============================================================================
// Trait
// =============================================================================

#[async_trait]
pub trait SourceControl: Send + Sync {
    async fn list_pr_files(&self, pr_number: u64) -> Result<Vec<ChangedFile>>;

    /// Oldest first, as GitHub returns them
    async fn list_pr_commits(&self, pr_number: u64) -> Result<Vec<CommitSummary>>;

    async fn compare(&self, base: &str, head: &str) -> Result<Vec<ChangedFile>>;

    async fn get_commit_files(&self, sha: &str) -> Result<Vec<ChangedFile>>;

    /// Branch name → head commit SHA
    async fn get_ref(&self, branch: &str) -> Result<String>;

    /// Commit SHA → tree SHA
    async fn get_commit_tree(&self, commit_sha: &str) -> Result<String>;

    /// Content must already be base64-encoded
    async fn create_blob(&self, content_base64: &str) -> Result<String>;

    async fn create_tree(&self, base_tree: &str, entries: &[TreeEntry]) -> Result<String>;

    async fn create_commit(&self, message: &str, tree: &str, parent: &str) -> Result<String>;

    async fn update_ref(&self, branch: &str, sha: &str) -> Result<()>;

    async fn list_issue_comments(&self, issue_number: u64) -> Result<Vec<IssueComment>>;

    async fn create_issue_comment(&self, issue_number: u64, body: &str) -> Result<()>;

    async fn update_issue_comment(&self, comment_id: u64, body: &str) -> Result<()>;

    async fn update_pr_title(&self, pr_number: u64, title: &str) -> Result<()>;

    async fn get_tree_recursive(&self, git_ref: &str) -> Result<RepoTree>;
}

// =============================================================================
// Client
// =============================================================================

pub struct GitHubClient {
    token: SecretString,
    api_base: String,
    repo: RepoSlug,
    client: reqwest::Client,
}

impl std::fmt::Debug for GitHubClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GitHubClient")
            .field("token", &"[REDACTED]")
            .field("api_base", &self.api_base)
            .field("repo", &self.repo)
            .finish()
    }
}

impl GitHubClient {
    /// `api_base` defaults to the public API (GHES sets `GITHUB_API_URL`)
    pub fn new(token: SecretString, repo: RepoSlug, api_base: Option<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| AzdocError::config(format!("Failed to create HTTP client: {}", e)))?;

        let api_base = api_base
            .filter(|base| !base.trim().is_empty())
            .unwrap_or_else(|| API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        Ok(Self {
            token,
            api_base,
            repo,
            client,
        })
    }

    fn repo_url(&self, path: &str) -> String {
        format!(
            "{}/repos/{}/{}{}",
            self.api_base,
            self.repo.owner(),
            self.repo.name(),
            path
        )
    }

    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<String> {
        let url = self.repo_url(path);
        debug!("{} {}", method, url);

        let mut request = self
            .client
            .request(method.clone(), &url)
            .bearer_auth(self.token.expose_secret())
            .header("Accept", "application/vnd.github+json")
            .header("X-GitHub-Api-Version", "2022-11-28");
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request
            .send()
            .await
            .map_err(|e| GitHubError::new(method.as_str(), path, None, e.to_string()))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            GitHubError::new(method.as_str(), path, Some(status.as_u16()), e.to_string())
        })?;

        if !status.is_success() {
            return Err(GitHubError::new(
                method.as_str(),
                path,
                Some(status.as_u16()),
                api_message(&text),
            )
            .into());
        }

        Ok(text)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let text = self.send::<()>(Method::GET, path, None).await?;
        decode(Method::GET, path, &text)
    }

    async fn post<T: DeserializeOwned>(&self, path: &str, body: &serde_json::Value) -> Result<T> {
        let text = self.send(Method::POST, path, Some(body)).await?;
        decode(Method::POST, path, &text)
    }

    async fn patch(&self, path: &str, body: &serde_json::Value) -> Result<()> {
        self.send(Method::PATCH, path, Some(body)).await?;
        Ok(())
    }

    /// Follow numbered pages until a short page or the page cap
    async fn get_paginated<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>> {
        let separator = if path.contains('?') { '&' } else { '?' };
        let mut items = Vec::new();

        for page in 1..=MAX_PAGES {
            let batch: Vec<T> = self
                .get(&format!(
                    "{}{}per_page={}&page={}",
                    path, separator, PER_PAGE, page
                ))
                .await?;
            let count = batch.len();
            items.extend(batch);
            if count < PER_PAGE {
                return Ok(items);
            }
        }

        warn!("Stopped listing {} after {} pages", path, MAX_PAGES);
        Ok(items)
    }
}

#[async_trait]
impl SourceControl for GitHubClient {
    async fn list_pr_files(&self, pr_number: u64) -> Result<Vec<ChangedFile>> {
        let files: Vec<ApiFile> = self
            .get_paginated(&format!("/pulls/{}/files", pr_number))
            .await?;
        Ok(files.into_iter().map(ChangedFile::from).collect())
    }

    async fn list_pr_commits(&self, pr_number: u64) -> Result<Vec<CommitSummary>> {
        let commits: Vec<ApiCommitEntry> = self
            .get_paginated(&format!("/pulls/{}/commits", pr_number))
            .await?;
        Ok(commits.into_iter().map(CommitSummary::from).collect())
    }

    async fn compare(&self, base: &str, head: &str) -> Result<Vec<ChangedFile>> {
        let response: FilesResponse = self
            .get(&format!("/compare/{}...{}", base, head))
            .await?;
        Ok(response.files.into_iter().map(ChangedFile::from).collect())
    }

    async fn get_commit_files(&self, sha: &str) -> Result<Vec<ChangedFile>> {
        let response: FilesResponse = self.get(&format!("/commits/{}", sha)).await?;
        Ok(response.files.into_iter().map(ChangedFile::from).collect())
    }

    async fn get_ref(&self, branch: &str) -> Result<String> {
        let response: RefResponse = self.get(&format!("/git/ref/heads/{}", branch)).await?;
        Ok(response.object.sha)
    }

    async fn get_commit_tree(&self, commit_sha: &str) -> Result<String> {
        let response: GitCommitResponse = self
            .get(&format!("/git/commits/{}", commit_sha))
            .await?;
        Ok(response.tree.sha)
    }

    async fn create_blob(&self, content_base64: &str) -> Result<String> {
        let response: ShaObject = self
            .post(
                "/git/blobs",
                &json!({ "content": content_base64, "encoding": "base64" }),
            )
            .await?;
        Ok(response.sha)
    }

    async fn create_tree(&self, base_tree: &str, entries: &[TreeEntry]) -> Result<String> {
        let tree: Vec<_> = entries
            .iter()
            .map(|e| json!({ "path": e.path, "mode": "100644", "type": "blob", "sha": e.sha }))
            .collect();
        let response: ShaObject = self
            .post("/git/trees", &json!({ "base_tree": base_tree, "tree": tree }))
            .await?;
        Ok(response.sha)
    }

    async fn create_commit(&self, message: &str, tree: &str, parent: &str) -> Result<String> {
        let response: ShaObject = self
            .post(
                "/git/commits",
                &json!({ "message": message, "tree": tree, "parents": [parent] }),
            )
            .await?;
        Ok(response.sha)
    }

    async fn update_ref(&self, branch: &str, sha: &str) -> Result<()> {
        self.patch(
            &format!("/git/refs/heads/{}", branch),
            &json!({ "sha": sha, "force": false }),
        )
        .await
    }

    async fn list_issue_comments(&self, issue_number: u64) -> Result<Vec<IssueComment>> {
        self.get_paginated(&format!("/issues/{}/comments", issue_number))
            .await
    }

    async fn create_issue_comment(&self, issue_number: u64, body: &str) -> Result<()> {
        let _: serde_json::Value = self
            .post(
                &format!("/issues/{}/comments", issue_number),
                &json!({ "body": body }),
            )
            .await?;
        Ok(())
    }

    async fn update_issue_comment(&self, comment_id: u64, body: &str) -> Result<()> {
        self.patch(
            &format!("/issues/comments/{}", comment_id),
            &json!({ "body": body }),
        )
        .await
    }

    async fn update_pr_title(&self, pr_number: u64, title: &str) -> Result<()> {
        self.patch(&format!("/pulls/{}", pr_number), &json!({ "title": title }))
            .await
    }

    async fn get_tree_recursive(&self, git_ref: &str) -> Result<RepoTree> {
        let response: TreeResponse = self
            .get(&format!("/git/trees/{}?recursive=1", git_ref))
            .await?;
        Ok(response.into())
    }
}

/// GitHub error bodies carry a `message` field; fall back to the raw text
fn api_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
        .unwrap_or_else(|| truncate_chars(body.trim(), 200).to_string())
}

fn decode<T: DeserializeOwned>(method: Method, path: &str, text: &str) -> Result<T> {
    serde_json::from_str(text).map_err(|e| {
        GitHubError::new(
            method.as_str(),
            path,
            None,
            format!("Unexpected response body: {}", e),
        )
        .into()
    })
}

fn null_as_empty<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

// =============================================================================
// API Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct ApiFile {
    filename: String,
    status: String,
    #[serde(default)]
    additions: u32,
    #[serde(default)]
    deletions: u32,
    patch: Option<String>,
}

impl From<ApiFile> for ChangedFile {
    fn from(file: ApiFile) -> Self {
        Self {
            path: file.filename,
            status: FileStatus::from_github(&file.status),
            additions: file.additions,
            deletions: file.deletions,
            patch: file.patch,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiCommitEntry {
    sha: String,
    commit: ApiCommitDetail,
}

#[derive(Debug, Deserialize)]
struct ApiCommitDetail {
    #[serde(default)]
    message: String,
    author: Option<ApiAuthor>,
}

#[derive(Debug, Deserialize)]
struct ApiAuthor {
    #[serde(default)]
    name: String,
}

impl From<ApiCommitEntry> for CommitSummary {
    fn from(entry: ApiCommitEntry) -> Self {
        Self {
            id: entry.sha,
            message: entry.commit.message,
            author_name: entry.commit.author.map(|a| a.name).unwrap_or_default(),
        }
    }
}

/// Shared shape of compare and single-commit responses
#[derive(Debug, Deserialize)]
struct FilesResponse {
    #[serde(default)]
    files: Vec<ApiFile>,
}

#[derive(Debug, Deserialize)]
struct ShaObject {
    sha: String,
}

#[derive(Debug, Deserialize)]
struct RefResponse {
    object: ShaObject,
}

#[derive(Debug, Deserialize)]
struct GitCommitResponse {
    tree: ShaObject,
}

#[derive(Debug, Deserialize)]
struct TreeResponse {
    #[serde(default)]
    tree: Vec<TreeItem>,
    #[serde(default)]
    truncated: bool,
}

#[derive(Debug, Deserialize)]
struct TreeItem {
    path: String,
    #[serde(rename = "type")]
    kind: String,
}

impl From<TreeResponse> for RepoTree {
    fn from(response: TreeResponse) -> Self {
        Self {
            paths: response
                .tree
                .into_iter()
                .filter(|item| item.kind == "blob")
                .map(|item| item.path)
                .collect(),
            truncated: response.truncated,
        }
    }
}
