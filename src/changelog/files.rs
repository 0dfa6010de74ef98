//! Writing the changelog files through the host.
//!
//! Whether a file already exists, and the blob hash an update must name,
//! come from the CI checkout rather than an extra API round trip.

use git2::{ObjectType, Oid};
use std::fs;
use std::io;
use std::path::Path;

use crate::error::Result;
use crate::host::{FileCommit, FileUpdate, RepositoryHost};

/// How new changelog text combines with what is already in the file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteMode {
    Replace,
    Prepend,
}

/// A changelog file as found in the local checkout
#[derive(Debug, Clone, PartialEq)]
pub struct ExistingFile {
    pub content: String,
    /// Git blob hash of the content, as `git hash-object` prints it
    pub blob_sha: String,
}

/// Reads `path` relative to the workspace, if it is a regular file.
pub fn read_existing(workspace: &Path, path: &str) -> Result<Option<ExistingFile>> {
    let full_path = workspace.join(path);
    if !full_path.is_file() {
        return Ok(None);
    }

    let bytes = fs::read(&full_path)?;
    let blob_sha = Oid::hash_object(ObjectType::Blob, &bytes)?.to_string();

    let content = String::from_utf8(bytes).map_err(|e| {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("{} is not valid UTF-8: {}", full_path.display(), e),
        )
    })?;

    Ok(Some(ExistingFile { content, blob_sha }))
}

/// Combines new changelog text with the existing content.
pub fn compose(changelog: &str, existing: Option<&str>, mode: WriteMode) -> String {
    match (mode, existing) {
        (WriteMode::Prepend, Some(old)) => format!("{}\n{}", changelog, old),
        _ => changelog.to_string(),
    }
}

/// One changelog file to write for a release
#[derive(Debug, Clone)]
pub struct ChangelogFile<'a> {
    pub path: &'a str,
    pub mode: WriteMode,
    pub message: String,
}

/// Creates or updates a changelog file on `branch`.
pub fn write_changelog<H: RepositoryHost>(
    host: &H,
    workspace: &Path,
    branch: &str,
    file: &ChangelogFile<'_>,
    changelog: &str,
) -> Result<FileCommit> {
    let existing = read_existing(workspace, file.path)?;
    let content = compose(
        changelog,
        existing.as_ref().map(|e| e.content.as_str()),
        file.mode,
    );

    let update = FileUpdate {
        path: file.path.to_string(),
        content,
        message: file.message.clone(),
        branch: branch.to_string(),
        sha: existing.map(|e| e.blob_sha),
    };

    host.put_file(&update)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::MockHost;
    use tempfile::TempDir;

    #[test]
    fn test_compose_prepend() {
        assert_eq!(compose("NEW", Some("OLD"), WriteMode::Prepend), "NEW\nOLD");
    }

    #[test]
    fn test_compose_replace_ignores_existing() {
        assert_eq!(compose("NEW", Some("OLD"), WriteMode::Replace), "NEW");
    }

    #[test]
    fn test_compose_prepend_without_existing() {
        assert_eq!(compose("NEW", None, WriteMode::Prepend), "NEW");
    }

    #[test]
    fn test_read_existing_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(read_existing(dir.path(), "CHANGELOG.md").unwrap().is_none());
    }

    #[test]
    fn test_read_existing_blob_hash_matches_git() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("CHANGELOG.md"), "hello\n").unwrap();

        let existing = read_existing(dir.path(), "CHANGELOG.md").unwrap().unwrap();
        assert_eq!(existing.content, "hello\n");
        // `printf 'hello\n' | git hash-object --stdin`
        assert_eq!(
            existing.blob_sha,
            "ce013625030ba8dba906f756967f9e9ca394464a"
        );
    }

    #[test]
    fn test_write_changelog_updates_existing_file() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("CHANGELOG.md"), "OLD").unwrap();
        let host = MockHost::new();

        let file = ChangelogFile {
            path: "CHANGELOG.md",
            mode: WriteMode::Prepend,
            message: "update".to_string(),
        };
        write_changelog(&host, dir.path(), "main", &file, "NEW").unwrap();

        let writes = host.file_writes();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].content, "NEW\nOLD");
        assert_eq!(writes[0].branch, "main");
        assert!(writes[0].sha.is_some());
    }

    #[test]
    fn test_non_utf8_changelog_is_not_rewritten() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("CHANGELOG.md"), b"## v1.0.0\n\xff\xfe caf\xe9\n").unwrap();
        let host = MockHost::new();

        let file = ChangelogFile {
            path: "CHANGELOG.md",
            mode: WriteMode::Prepend,
            message: "update".to_string(),
        };
        let err = write_changelog(&host, dir.path(), "main", &file, "NEW").unwrap_err();

        assert!(err.to_string().starts_with("I/O error"));
        assert!(err.to_string().contains("is not valid UTF-8"));
        assert!(host.file_writes().is_empty());
    }

    #[test]
    fn test_write_changelog_creates_missing_file() {
        let dir = TempDir::new().unwrap();
        let host = MockHost::new();

        let file = ChangelogFile {
            path: "CHANGELOG.current.md",
            mode: WriteMode::Replace,
            message: "create".to_string(),
        };
        write_changelog(&host, dir.path(), "main", &file, "NEW").unwrap();

        let writes = host.file_writes();
        assert_eq!(writes[0].content, "NEW");
        assert_eq!(writes[0].sha, None);
    }
}
