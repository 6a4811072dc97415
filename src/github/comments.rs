//! Pull Request Feedback
//!
//! A single bot comment per PR, found again through a hidden marker, and an
//! optional title suffix. Callers treat both as best-effort.

use tracing::info;

use super::client::SourceControl;
use crate::analyzer::classify;
use crate::constants::markers::{COMMENT_MARKER, PREVIEW_CHARS, TITLE_SUFFIX};
use crate::types::{DocPaths, FileDiff, GeneratedDocumentation, Result, preview};

/// Outcome of a comment upsert
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentAction {
    Created,
    Updated(u64),
}

/// Comment body: marker, files table, written paths, documentation preview
pub fn render_comment(
    diffs: &[FileDiff],
    paths: &DocPaths,
    doc: &GeneratedDocumentation,
) -> String {
    let mut body = String::new();
    body.push_str(COMMENT_MARKER);
    body.push_str("\n## Azure Integration Documentation\n\n");
    body.push_str(&format!(
        "Documentation was generated for **{}** Azure integration file(s).\n\n",
        diffs.len()
    ));

    body.push_str("| File | Status | Changes | Service Type |\n|---|---|---|---|\n");
    for diff in diffs {
        body.push_str(&format!(
            "| `{}` | {} | +{} / -{} | {} |\n",
            diff.filename,
            diff.status,
            diff.additions,
            diff.deletions,
            classify(&diff.filename)
        ));
    }
    body.push('\n');

    if !paths.is_empty() {
        let written = paths
            .to_repo_strings()
            .iter()
            .map(|p| format!("`{}`", p))
            .collect::<Vec<_>>()
            .join(", ");
        body.push_str(&format!("**Documentation:** {}\n\n", written));
    }

    body.push_str("<details>\n<summary>Preview</summary>\n\n");
    body.push_str(&preview(doc.as_str(), PREVIEW_CHARS));
    body.push_str("\n\n</details>\n");
    body
}

/// Update the marked comment in place, or create it
pub async fn upsert_comment(
    scm: &dyn SourceControl,
    pr_number: u64,
    body: &str,
) -> Result<CommentAction> {
    let existing = scm
        .list_issue_comments(pr_number)
        .await?
        .into_iter()
        .find(|c| c.body.contains(COMMENT_MARKER));

    match existing {
        Some(comment) => {
            scm.update_issue_comment(comment.id, body).await?;
            info!("Updated documentation comment {} on PR #{}", comment.id, pr_number);
            Ok(CommentAction::Updated(comment.id))
        }
        None => {
            scm.create_issue_comment(pr_number, body).await?;
            info!("Created documentation comment on PR #{}", pr_number);
            Ok(CommentAction::Created)
        }
    }
}

/// New title, or `None` when the suffix is already present
pub fn suffixed_title(title: &str) -> Option<String> {
    let trimmed = title.trim_end();
    if trimmed.ends_with(TITLE_SUFFIX.trim()) {
        None
    } else {
        Some(format!("{}{}", trimmed, TITLE_SUFFIX))
    }
}

/// Returns whether the title changed
pub async fn append_title_suffix(
    scm: &dyn SourceControl,
    pr_number: u64,
    title: &str,
) -> Result<bool> {
    match suffixed_title(title) {
        Some(new_title) => {
            scm.update_pr_title(pr_number, &new_title).await?;
            info!("Updated PR #{} title", pr_number);
            Ok(true)
        }
        None => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::github::client::IssueComment;
    use crate::github::mock::MockSourceControl;
    use crate::types::FileStatus;
    use std::path::PathBuf;

    fn diffs() -> Vec<FileDiff> {
        vec![FileDiff {
            filename: "infra/apim-policy.xml".into(),
            status: FileStatus::Modified,
            diff: "+x".into(),
            additions: 5,
            deletions: 2,
        }]
    }

    #[test]
    fn test_render_comment() {
        let paths = DocPaths::from(vec![PathBuf::from("docs/pr-4-azure-integration.md")]);
        let body = render_comment(&diffs(), &paths, &GeneratedDocumentation::new("# Summary"));

        assert!(body.starts_with(COMMENT_MARKER));
        assert!(body.contains("| `infra/apim-policy.xml` | modified | +5 / -2 | API Management |"));
        assert!(body.contains("`docs/pr-4-azure-integration.md`"));
        assert!(body.contains("# Summary"));
    }

    #[test]
    fn test_preview_is_bounded() {
        let long = "x".repeat(PREVIEW_CHARS + 500);
        let body = render_comment(&diffs(), &DocPaths::new(), &GeneratedDocumentation::new(long));
        assert!(body.contains(&"x".repeat(PREVIEW_CHARS)));
        assert!(!body.contains(&"x".repeat(PREVIEW_CHARS + 1)));
    }

    #[tokio::test]
    async fn test_upsert_creates_then_updates() {
        let scm = MockSourceControl::new();
        scm.comments.lock().unwrap().push(IssueComment {
            id: 1,
            body: "LGTM".into(),
        });

        let first = upsert_comment(&scm, 4, &format!("{}\nv1", COMMENT_MARKER))
            .await
            .unwrap();
        assert_eq!(first, CommentAction::Created);

        let second = upsert_comment(&scm, 4, &format!("{}\nv2", COMMENT_MARKER))
            .await
            .unwrap();
        assert_eq!(second, CommentAction::Updated(2));

        let comments = scm.comments.lock().unwrap().clone();
        assert_eq!(comments.len(), 2);
        assert!(comments[1].body.ends_with("v2"));
        assert_eq!(comments[0].body, "LGTM");
    }

    #[test]
    fn test_suffixed_title() {
        assert_eq!(suffixed_title("Add queue").as_deref(), Some("Add queue [docs]"));
        assert_eq!(suffixed_title("Add queue [docs]"), None);
    }

    #[tokio::test]
    async fn test_title_suffix_applied_once() {
        let scm = MockSourceControl::new();
        assert!(append_title_suffix(&scm, 9, "Add queue").await.unwrap());
        assert!(!append_title_suffix(&scm, 9, "Add queue [docs]").await.unwrap());
        assert_eq!(
            scm.titles.lock().unwrap().clone(),
            vec![(9, "Add queue [docs]".to_string())]
        );
    }
}
