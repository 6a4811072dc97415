//! `GITHUB_OUTPUT` file format
//!
//! Single-line values use `name=value`; multi-line values use the heredoc form
//! with a delimiter that does not occur in the value.

use std::io::Write;
use std::path::Path;

use crate::pipeline::ActionOutputs;
use crate::types::Result;

const DELIMITER: &str = "AZDOC_EOF";

pub fn format_outputs(outputs: &ActionOutputs) -> String {
    let mut out = String::new();
    for (name, value) in outputs.to_pairs() {
        if value.contains('\n') || value.contains('\r') {
            let mut delimiter = DELIMITER.to_string();
            let mut n = 0;
            while value.contains(&delimiter) {
                n += 1;
                delimiter = format!("{}_{}", DELIMITER, n);
            }
            out.push_str(&format!("{}<<{}\n{}\n{}\n", name, delimiter, value, delimiter));
        } else {
            out.push_str(&format!("{}={}\n", name, value));
        }
    }
    out
}

/// Append outputs to the runner's output file
pub fn write_outputs(path: &Path, outputs: &ActionOutputs) -> Result<()> {
    let mut file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)?;
    file.write_all(format_outputs(outputs).as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_line_values() {
        let outputs = ActionOutputs {
            docs_updated: true,
            files_processed: 1,
            documentation_paths: vec!["docs/pr-1-azure-integration.md".into()],
            changes_summary: "1 Azure integration file(s): Azure Function (1)".into(),
            pr_comment_created: true,
        };
        let text = format_outputs(&outputs);
        assert!(text.starts_with("docs-updated=true\nfiles-processed=1\n"));
        assert!(text.contains("documentation-path=docs/pr-1-azure-integration.md\n"));
        assert!(text.ends_with("pr-comment-created=true\n"));
    }

    #[test]
    fn test_multiline_value_uses_heredoc() {
        let outputs = ActionOutputs::none("line one\nAZDOC_EOF\nline three");
        let text = format_outputs(&outputs);
        assert!(text.contains("changes-summary<<AZDOC_EOF_1\nline one\nAZDOC_EOF\nline three\nAZDOC_EOF_1\n"));
    }

    #[test]
    fn test_write_appends() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("output");
        std::fs::write(&path, "existing=1\n").unwrap();

        write_outputs(&path, &ActionOutputs::none("nothing")).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.starts_with("existing=1\ndocs-updated=false\n"));
        assert!(content.contains("files-processed=0\n"));
    }
}
