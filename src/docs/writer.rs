//! Documentation Writer
//!
//! Persists generated documentation into the checked-out workspace. Returned
//! paths are repository-relative so the commit publisher can use them directly.

use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::{Config, DocMode};
use crate::constants::markers::CENTRAL_SEPARATOR;
use crate::constants::paths::AUDIT_FILE;
use crate::types::{DocPaths, GeneratedDocumentation, Result};

pub struct DocumentationWriter {
    workspace: PathBuf,
    docs_folder: PathBuf,
    central_doc_file: String,
}

impl DocumentationWriter {
    pub fn new(workspace: impl Into<PathBuf>, config: &Config) -> Self {
        Self::with_layout(workspace, &config.docs_folder, &config.central_doc_file)
    }

    pub fn with_layout(
        workspace: impl Into<PathBuf>,
        docs_folder: impl Into<PathBuf>,
        central_doc_file: impl Into<String>,
    ) -> Self {
        Self {
            workspace: workspace.into(),
            docs_folder: docs_folder.into(),
            central_doc_file: central_doc_file.into(),
        }
    }

    pub fn pr_doc_path(&self, pr_number: u64) -> PathBuf {
        self.docs_folder
            .join(format!("pr-{}-azure-integration.md", pr_number))
    }

    pub fn central_doc_path(&self) -> PathBuf {
        self.docs_folder.join(&self.central_doc_file)
    }

    pub fn audit_path(&self) -> PathBuf {
        self.docs_folder.join(AUDIT_FILE)
    }

    pub async fn write(
        &self,
        doc: &GeneratedDocumentation,
        pr_number: Option<u64>,
        mode: DocMode,
    ) -> Result<DocPaths> {
        self.write_at(doc, pr_number, mode, Utc::now()).await
    }

    /// Write with an explicit timestamp for the centralized update marker.
    ///
    /// Per-PR output is written first and overwrites; centralized output appends.
    pub async fn write_at(
        &self,
        doc: &GeneratedDocumentation,
        pr_number: Option<u64>,
        mode: DocMode,
        now: DateTime<Utc>,
    ) -> Result<DocPaths> {
        let mut paths = DocPaths::new();

        if mode.writes_pr()
            && let Some(number) = pr_number
        {
            let relative = self.pr_doc_path(number);
            write_atomic(&self.workspace.join(&relative), doc.as_str()).await?;
            info!("Wrote PR documentation: {}", relative.display());
            paths.push(relative);
        }

        if mode.writes_central() {
            let relative = self.central_doc_path();
            let absolute = self.workspace.join(&relative);
            let existing = read_or_empty(&absolute).await?;
            write_atomic(&absolute, &append_update(&existing, doc.as_str(), now)).await?;
            info!("Appended to centralized documentation: {}", relative.display());
            paths.push(relative);
        }

        Ok(paths)
    }

    /// Overwrite the fixed audit report path
    pub async fn write_audit(&self, report: &str) -> Result<PathBuf> {
        let relative = self.audit_path();
        write_atomic(&self.workspace.join(&relative), report).await?;
        info!("Wrote audit report: {}", relative.display());
        Ok(relative)
    }
}

/// `existing + separator + marker + doc`; the separator is omitted for a new file
fn append_update(existing: &str, doc: &str, now: DateTime<Utc>) -> String {
    let entry = format!(
        "## Update: {}\n\n{}\n",
        now.format("%Y-%m-%d %H:%M:%S UTC"),
        doc.trim_end()
    );

    let prior = existing.trim_end();
    if prior.is_empty() {
        entry
    } else {
        format!("{}{}{}", prior, CENTRAL_SEPARATOR, entry)
    }
}

async fn read_or_empty(path: &Path) -> Result<String> {
    match tokio::fs::read_to_string(path).await {
        Ok(content) => Ok(content),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(String::new()),
        Err(e) => Err(e.into()),
    }
}

/// Write to a sibling temp file, then rename over the target
async fn write_atomic(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);

    tokio::fs::write(&tmp, content).await?;
    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(e.into());
    }

    debug!("Wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn writer(dir: &TempDir) -> DocumentationWriter {
        DocumentationWriter::with_layout(dir.path(), "docs", "azure-integrations.md")
    }

    fn doc(body: &str) -> GeneratedDocumentation {
        GeneratedDocumentation::new(body)
    }

    fn at(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 5, 4, hour, 30, 0).unwrap()
    }

    #[tokio::test]
    async fn test_pr_mode_overwrites() {
        let dir = TempDir::new().unwrap();
        let writer = writer(&dir);

        writer.write_at(&doc("first"), Some(7), DocMode::Pr, at(1)).await.unwrap();
        let paths = writer
            .write_at(&doc("second"), Some(7), DocMode::Pr, at(2))
            .await
            .unwrap();

        assert_eq!(paths.to_repo_strings(), vec!["docs/pr-7-azure-integration.md"]);
        let content =
            std::fs::read_to_string(dir.path().join("docs/pr-7-azure-integration.md")).unwrap();
        assert_eq!(content, "second");
    }

    #[tokio::test]
    async fn test_centralized_mode_appends() {
        let dir = TempDir::new().unwrap();
        let writer = writer(&dir);

        writer
            .write_at(&doc("body one"), None, DocMode::Centralized, at(1))
            .await
            .unwrap();
        writer
            .write_at(&doc("body two"), None, DocMode::Centralized, at(2))
            .await
            .unwrap();

        let content =
            std::fs::read_to_string(dir.path().join("docs/azure-integrations.md")).unwrap();
        let one = content.find("body one").unwrap();
        let sep = content.find("\n\n---\n\n").unwrap();
        let two = content.find("body two").unwrap();
        assert!(one < sep && sep < two);
        assert!(content.starts_with("## Update: 2026-05-04 01:30:00 UTC"));
        assert!(content.contains("## Update: 2026-05-04 02:30:00 UTC"));
    }

    #[tokio::test]
    async fn test_both_mode_orders_pr_first() {
        let dir = TempDir::new().unwrap();
        let paths = writer(&dir)
            .write_at(&doc("x"), Some(3), DocMode::Both, at(1))
            .await
            .unwrap();
        assert_eq!(
            paths.to_repo_strings(),
            vec!["docs/pr-3-azure-integration.md", "docs/azure-integrations.md"]
        );
    }

    #[tokio::test]
    async fn test_pr_mode_without_number_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let paths = writer(&dir)
            .write_at(&doc("x"), None, DocMode::Pr, at(1))
            .await
            .unwrap();
        assert!(paths.is_empty());
        assert!(!dir.path().join("docs").exists());
    }

    #[tokio::test]
    async fn test_write_audit_overwrites() {
        let dir = TempDir::new().unwrap();
        let writer = writer(&dir);
        writer.write_audit("old").await.unwrap();
        let path = writer.write_audit("new").await.unwrap();
        assert_eq!(path, PathBuf::from("docs/azure-integration-audit.md"));
        assert_eq!(std::fs::read_to_string(dir.path().join(path)).unwrap(), "new");
        assert!(!dir.path().join("docs/azure-integration-audit.md.tmp").exists());
    }

    #[test]
    fn test_append_update_existing_content() {
        let merged = append_update("# History\n\n", "new", at(9));
        assert_eq!(merged, "# History\n\n---\n\n## Update: 2026-05-04 09:30:00 UTC\n\nnew\n");
    }
}
