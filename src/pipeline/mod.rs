//! Event Router
//!
//! One handler per event variant. Each run is a single pass:
//!
//! ```text
//! PullRequest: files → filter → diffs → generate → write → commit → comment/title
//! Push:        compare → filter → diffs → generate (commit context) → write → commit
//! Scheduled:   tree → filter → group → audit report → write → commit
//! ```
//!
//! PR comment and title updates are best-effort and never fail the run.

pub mod event;

pub use event::{Event, PullRequestEvent, PushEvent, RunContext};

use chrono::Utc;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};

use crate::ai::{DocumentationGenerator, SharedChat};
use crate::analyzer::{self, PatternMatcher, classify};
use crate::config::Config;
use crate::constants::markers::SKIP_MARKER;
use crate::constants::paths::AUDIT_COMMIT_MESSAGE;
use crate::docs::{DocumentationWriter, group_by_service, render_audit_report};
use crate::github::{
    CommitPublisher, SourceControl, append_title_suffix, render_comment, upsert_comment,
};
use crate::types::{
    ChangedFile, CommitSummary, DocPaths, EventMetadata, FileDiff, Result, log_warn,
};

// =============================================================================
// Outputs
// =============================================================================

/// Values reported back to the workflow
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActionOutputs {
    pub docs_updated: bool,
    pub files_processed: usize,
    pub documentation_paths: Vec<String>,
    pub changes_summary: String,
    pub pr_comment_created: bool,
}

impl ActionOutputs {
    /// Zero-effect outputs with an explanatory summary
    pub fn none(summary: impl Into<String>) -> Self {
        Self {
            changes_summary: summary.into(),
            ..Self::default()
        }
    }

    /// Output name/value pairs in reporting order
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        vec![
            ("docs-updated", self.docs_updated.to_string()),
            ("files-processed", self.files_processed.to_string()),
            ("documentation-path", self.documentation_paths.join(",")),
            ("changes-summary", self.changes_summary.clone()),
            ("pr-comment-created", self.pr_comment_created.to_string()),
        ]
    }
}

/// `N file(s): Label (k), Label (k)` in service-type order
pub fn summarize(paths: &[&str]) -> String {
    let mut counts = BTreeMap::new();
    for path in paths {
        *counts.entry(classify(path)).or_insert(0usize) += 1;
    }
    let breakdown = counts
        .iter()
        .map(|(service, count)| format!("{} ({})", service, count))
        .collect::<Vec<_>>()
        .join(", ");
    format!("{} Azure integration file(s): {}", paths.len(), breakdown)
}

// =============================================================================
// Pipeline
// =============================================================================

pub struct Pipeline {
    config: Config,
    scm: Arc<dyn SourceControl>,
    matcher: PatternMatcher,
    generator: DocumentationGenerator,
    writer: DocumentationWriter,
    publisher: CommitPublisher,
}

impl Pipeline {
    pub fn new(
        config: Config,
        scm: Arc<dyn SourceControl>,
        chat: SharedChat,
        workspace: impl Into<PathBuf>,
    ) -> Result<Self> {
        let workspace = workspace.into();
        let matcher = PatternMatcher::new(&config.file_patterns)?;
        let generator = DocumentationGenerator::new(chat, config.features);
        let writer = DocumentationWriter::new(workspace.clone(), &config);
        let publisher = CommitPublisher::new(Arc::clone(&scm), workspace);

        Ok(Self {
            config,
            scm,
            matcher,
            generator,
            writer,
            publisher,
        })
    }

    /// Route one event to its flow
    pub async fn run(&self, event: &Event) -> Result<ActionOutputs> {
        info!("Handling {} event", event.kind());
        match event {
            Event::PullRequest(pr) => self.handle_pull_request(pr).await,
            Event::Push(push) => self.handle_push(push).await,
            Event::Scheduled { branch } => self.handle_scheduled(branch).await,
            Event::Unsupported(reason) => {
                info!("Nothing to do for {}", reason);
                Ok(ActionOutputs::none(format!("Skipped: {}", reason)))
            }
        }
    }

    fn relevant(&self, files: Vec<ChangedFile>) -> Vec<ChangedFile> {
        let total = files.len();
        let matched: Vec<_> = files
            .into_iter()
            .filter(|f| self.matcher.matches(&f.path))
            .collect();
        info!(
            "{} of {} changed file(s) match Azure integration patterns",
            matched.len(),
            total
        );
        matched
    }

    async fn handle_pull_request(&self, pr: &PullRequestEvent) -> Result<ActionOutputs> {
        let files = self.relevant(self.scm.list_pr_files(pr.number).await?);
        if files.is_empty() {
            return Ok(ActionOutputs::none("No Azure integration files changed"));
        }

        let commits = self.scm.list_pr_commits(pr.number).await?;
        if let Some(skip) = skip_outputs(&commits) {
            return Ok(skip);
        }

        let diffs = analyzer::extract(&files);
        let metadata = EventMetadata::PullRequest {
            title: pr.title.clone(),
            number: pr.number,
            body: pr.body.clone(),
            author: pr.author.clone(),
        };

        let doc = self.generator.generate(&diffs, &metadata).await?;
        let paths = self
            .writer
            .write(&doc, Some(pr.number), self.config.mode)
            .await?;

        self.commit(
            &pr.head_branch,
            &paths,
            &self.config.commit_message_for(&format!("PR #{}", pr.number)),
        )
        .await?;

        let mut pr_comment_created = false;
        if self.config.pr_comment {
            let body = render_comment(&diffs, &paths, &doc);
            pr_comment_created = log_warn(
                upsert_comment(self.scm.as_ref(), pr.number, &body).await,
                "Failed to post PR comment",
            )
            .is_some();
        }

        if self.config.update_pr_title {
            log_warn(
                append_title_suffix(self.scm.as_ref(), pr.number, &pr.title).await,
                "Failed to update PR title",
            );
        }

        Ok(self.outputs(&diffs, &paths, pr_comment_created))
    }

    async fn handle_push(&self, push: &PushEvent) -> Result<ActionOutputs> {
        let changed = if push.is_new_branch() {
            self.scm.get_commit_files(&push.after).await?
        } else {
            self.scm.compare(&push.before, &push.after).await?
        };

        let files = self.relevant(changed);
        if files.is_empty() {
            return Ok(ActionOutputs::none("No Azure integration files changed"));
        }
        if let Some(skip) = skip_outputs(&push.commits) {
            return Ok(skip);
        }

        let diffs = analyzer::extract(&files);
        let recent = push.commits.len().saturating_sub(self.config.max_commits);
        let metadata = EventMetadata::Push {
            branch: push.branch.clone(),
            commits: push.commits[recent..].to_vec(),
        };

        let doc = self.generator.generate(&diffs, &metadata).await?;
        let paths = self
            .writer
            .write(&doc, None, self.config.mode.for_push())
            .await?;

        self.commit(
            &push.branch,
            &paths,
            &self.config.commit_message_for(&push.branch),
        )
        .await?;

        Ok(self.outputs(&diffs, &paths, false))
    }

    async fn handle_scheduled(&self, branch: &str) -> Result<ActionOutputs> {
        let tree = self.scm.get_tree_recursive(branch).await?;
        if tree.truncated {
            warn!("Repository tree for {} is truncated; the audit may be incomplete", branch);
        }

        let matched: Vec<String> = tree
            .paths
            .into_iter()
            .filter(|p| self.matcher.matches(p))
            .collect();
        info!("Audit found {} Azure integration file(s)", matched.len());

        let summary = {
            let refs: Vec<&str> = matched.iter().map(String::as_str).collect();
            summarize(&refs)
        };
        let files_processed = matched.len();
        let report = render_audit_report(&group_by_service(matched), Utc::now());
        let path = self.writer.write_audit(&report).await?;

        let paths = DocPaths::from(vec![path]);
        self.commit(branch, &paths, AUDIT_COMMIT_MESSAGE).await?;

        Ok(ActionOutputs {
            docs_updated: true,
            files_processed,
            documentation_paths: paths.to_repo_strings(),
            changes_summary: summary,
            pr_comment_created: false,
        })
    }

    /// Publish written files unless auto-update is off
    async fn commit(&self, branch: &str, paths: &DocPaths, message: &str) -> Result<()> {
        if paths.is_empty() {
            return Ok(());
        }
        if !self.config.auto_update {
            info!("auto-update disabled; leaving {} file(s) uncommitted", paths.len());
            return Ok(());
        }
        self.publisher.publish(branch, paths.paths(), message).await?;
        Ok(())
    }

    fn outputs(
        &self,
        diffs: &[FileDiff],
        paths: &DocPaths,
        pr_comment_created: bool,
    ) -> ActionOutputs {
        let names: Vec<&str> = diffs.iter().map(|d| d.filename.as_str()).collect();
        ActionOutputs {
            docs_updated: !paths.is_empty(),
            files_processed: diffs.len(),
            documentation_paths: paths.to_repo_strings(),
            changes_summary: summarize(&names),
            pr_comment_created,
        }
    }
}

/// Loop prevention: the newest commit carries the skip marker
fn skip_outputs(commits: &[CommitSummary]) -> Option<ActionOutputs> {
    let head = commits.last()?;
    if head.message.contains(SKIP_MARKER) {
        info!("Latest commit {} carries {}; skipping", head.id, SKIP_MARKER);
        Some(ActionOutputs::none(format!("Skipped: latest commit carries {}", SKIP_MARKER)))
    } else {
        None
    }
}
