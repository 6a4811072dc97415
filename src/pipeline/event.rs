//! Trigger Events
//!
//! Parses the runner's event name and JSON payload into a tagged union with one
//! variant per flow. Unknown or irrelevant triggers become `Unsupported`.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::constants::github::ZERO_SHA;
use crate::types::{AzdocError, CommitSummary, RepoSlug, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestEvent {
    pub number: u64,
    pub title: String,
    pub body: Option<String>,
    pub author: String,
    pub head_branch: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushEvent {
    pub branch: String,
    pub before: String,
    pub after: String,
    /// Oldest first
    pub commits: Vec<CommitSummary>,
}

impl PushEvent {
    /// First push of a branch: there is no `before` commit to compare against
    pub fn is_new_branch(&self) -> bool {
        self.before == ZERO_SHA
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    PullRequest(PullRequestEvent),
    Push(PushEvent),
    /// Cron or manual dispatch against a branch
    Scheduled { branch: String },
    Unsupported(String),
}

impl Event {
    /// `git_ref` is `GITHUB_REF` when the runner provides it
    pub fn parse(
        event_name: &str,
        payload: &serde_json::Value,
        git_ref: Option<&str>,
    ) -> Result<Self> {
        match event_name {
            "pull_request" | "pull_request_target" => parse_pull_request(payload),
            "push" => parse_push(payload),
            "schedule" | "workflow_dispatch" => {
                let branch = git_ref
                    .and_then(branch_name)
                    .or_else(|| {
                        payload
                            .pointer("/repository/default_branch")
                            .and_then(|b| b.as_str())
                            .map(String::from)
                    })
                    .ok_or_else(|| {
                        AzdocError::event(format!(
                            "Cannot determine branch for '{}' run",
                            event_name
                        ))
                    })?;
                Ok(Event::Scheduled { branch })
            }
            other => Ok(Event::Unsupported(format!("event '{}'", other))),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Event::PullRequest(_) => "pull_request",
            Event::Push(_) => "push",
            Event::Scheduled { .. } => "scheduled",
            Event::Unsupported(_) => "unsupported",
        }
    }
}

/// `refs/heads/x` → `x`; tags and other refs yield `None`
fn branch_name(git_ref: &str) -> Option<String> {
    git_ref
        .strip_prefix("refs/heads/")
        .filter(|b| !b.is_empty())
        .map(String::from)
}

fn parse_pull_request(payload: &serde_json::Value) -> Result<Event> {
    let parsed: PullRequestPayload = serde_json::from_value(payload.clone())
        .map_err(|e| AzdocError::event(format!("Invalid pull_request payload: {}", e)))?;

    if parsed.action.as_deref() == Some("closed") {
        return Ok(Event::Unsupported("closed pull request".to_string()));
    }

    let pr = parsed.pull_request;
    Ok(Event::PullRequest(PullRequestEvent {
        number: pr.number,
        title: pr.title,
        body: pr.body.filter(|b| !b.trim().is_empty()),
        author: pr.user.map(|u| u.login).unwrap_or_default(),
        head_branch: pr.head.ref_name,
    }))
}

fn parse_push(payload: &serde_json::Value) -> Result<Event> {
    let parsed: PushPayload = serde_json::from_value(payload.clone())
        .map_err(|e| AzdocError::event(format!("Invalid push payload: {}", e)))?;

    let Some(branch) = branch_name(&parsed.git_ref) else {
        return Ok(Event::Unsupported(format!("push to '{}'", parsed.git_ref)));
    };
    if parsed.deleted || parsed.after == ZERO_SHA {
        return Ok(Event::Unsupported(format!("deletion of branch '{}'", branch)));
    }

    Ok(Event::Push(PushEvent {
        branch,
        before: parsed.before,
        after: parsed.after,
        commits: parsed
            .commits
            .into_iter()
            .map(|c| CommitSummary {
                id: c.id,
                message: c.message,
                author_name: c.author.map(|a| a.name).unwrap_or_default(),
            })
            .collect(),
    }))
}

// =============================================================================
// Run Context
// =============================================================================

/// Runner-provided environment for one invocation
#[derive(Debug, Clone)]
pub struct RunContext {
    pub event_name: String,
    pub event_path: Option<PathBuf>,
    pub repository: RepoSlug,
    pub git_ref: Option<String>,
    pub workspace: PathBuf,
    pub api_url: Option<String>,
    pub output_file: Option<PathBuf>,
}

impl RunContext {
    /// Read `GITHUB_*` variables; missing repository or event name is an error
    pub fn from_env() -> Result<Self> {
        let var = |name: &str| std::env::var(name).ok().filter(|v| !v.trim().is_empty());

        let event_name = var("GITHUB_EVENT_NAME")
            .ok_or_else(|| AzdocError::event("GITHUB_EVENT_NAME is not set"))?;
        let repository = var("GITHUB_REPOSITORY")
            .ok_or_else(|| AzdocError::event("GITHUB_REPOSITORY is not set"))?
            .parse::<RepoSlug>()?;

        Ok(Self {
            event_name,
            event_path: var("GITHUB_EVENT_PATH").map(PathBuf::from),
            repository,
            git_ref: var("GITHUB_REF"),
            workspace: var("GITHUB_WORKSPACE")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".")),
            api_url: var("GITHUB_API_URL"),
            output_file: var("GITHUB_OUTPUT").map(PathBuf::from),
        })
    }

    /// Read the payload file and parse the event
    pub async fn load_event(&self) -> Result<Event> {
        let payload = match &self.event_path {
            Some(path) => read_payload(path).await?,
            None => serde_json::Value::Null,
        };
        Event::parse(&self.event_name, &payload, self.git_ref.as_deref())
    }
}

async fn read_payload(path: &Path) -> Result<serde_json::Value> {
    let content = tokio::fs::read_to_string(path).await.map_err(|e| {
        AzdocError::event(format!("Cannot read event payload {}: {}", path.display(), e))
    })?;
    Ok(serde_json::from_str(&content)?)
}

// =============================================================================
// Payload Types
// =============================================================================

#[derive(Debug, Deserialize)]
struct PullRequestPayload {
    action: Option<String>,
    pull_request: PullRequestBody,
}

#[derive(Debug, Deserialize)]
struct PullRequestBody {
    number: u64,
    #[serde(default)]
    title: String,
    body: Option<String>,
    user: Option<UserBody>,
    head: HeadBody,
}

#[derive(Debug, Deserialize)]
struct UserBody {
    login: String,
}

#[derive(Debug, Deserialize)]
struct HeadBody {
    #[serde(rename = "ref")]
    ref_name: String,
}

#[derive(Debug, Deserialize)]
struct PushPayload {
    #[serde(rename = "ref")]
    git_ref: String,
    before: String,
    after: String,
    #[serde(default)]
    deleted: bool,
    #[serde(default)]
    commits: Vec<PushCommit>,
}

#[derive(Debug, Deserialize)]
struct PushCommit {
    id: String,
    #[serde(default)]
    message: String,
    author: Option<PushAuthor>,
}

#[derive(Debug, Deserialize)]
struct PushAuthor {
    #[serde(default)]
    name: String,
}
