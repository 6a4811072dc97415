//! Diff Extraction
//!
//! Reduces source-control change records to the per-file diffs fed to the prompt
//! builder. Order-preserving and 1:1; filtering is the caller's job.

use crate::constants::prompt::{MISSING_PATCH_DIFF, REMOVED_FILE_DIFF};
use crate::types::{ChangedFile, FileDiff, FileStatus};

/// Normalize one changed file
pub fn extract_one(file: &ChangedFile) -> FileDiff {
    let (diff, additions) = match (file.status, &file.patch) {
        (FileStatus::Removed, _) => (REMOVED_FILE_DIFF.to_string(), 0),
        (_, Some(patch)) => (patch.clone(), file.additions),
        (_, None) => (MISSING_PATCH_DIFF.to_string(), file.additions),
    };

    FileDiff {
        filename: file.path.clone(),
        status: file.status,
        diff,
        additions,
        deletions: file.deletions,
    }
}

/// Normalize a list of changed files
pub fn extract(files: &[ChangedFile]) -> Vec<FileDiff> {
    files.iter().map(extract_one).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(path: &str, status: FileStatus, patch: Option<&str>) -> ChangedFile {
        ChangedFile {
            path: path.to_string(),
            status,
            additions: 4,
            deletions: 2,
            patch: patch.map(String::from),
        }
    }

    #[test]
    fn test_removed_file_body() {
        let diffs = extract(&[file("a.bicep", FileStatus::Removed, Some("-x"))]);
        assert_eq!(diffs[0].diff, "(File removed)");
        assert_eq!(diffs[0].additions, 0);
        assert_eq!(diffs[0].deletions, 2);
    }

    #[test]
    fn test_missing_patch_placeholder() {
        let diffs = extract(&[file("big.json", FileStatus::Modified, None)]);
        assert_eq!(diffs[0].diff, MISSING_PATCH_DIFF);
        assert_eq!(diffs[0].additions, 4);
    }

    #[test]
    fn test_order_preserved() {
        let input = vec![
            file("b.tf", FileStatus::Added, Some("+b")),
            file("a.tf", FileStatus::Modified, Some("+a")),
            file("c.tf", FileStatus::Renamed, Some("+c")),
        ];
        let diffs = extract(&input);
        assert_eq!(diffs.len(), input.len());
        let names: Vec<_> = diffs.iter().map(|d| d.filename.as_str()).collect();
        assert_eq!(names, vec!["b.tf", "a.tf", "c.tf"]);
        assert_eq!(diffs[1].diff, "+a");
    }

    #[test]
    fn test_extraction_is_pure() {
        let input = vec![file("x.bicep", FileStatus::Modified, Some("+x"))];
        assert_eq!(extract(&input), extract(&input));
    }
}
