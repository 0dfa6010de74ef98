use crate::error::{ChangebotError, Result};
use crate::host::{
    CommitInfo, CreatedRelease, FileCommit, FileUpdate, NewRelease, ReleaseInfo, RepositoryHost,
};
use git2::{ObjectType, Oid};
use std::collections::HashMap;
use std::sync::Mutex;

/// In-memory host for testing without network access.
///
/// Every write is recorded so tests can assert on exactly what would have
/// been sent to the remote.
pub struct MockHost {
    commits: HashMap<String, CommitInfo>,
    releases: Vec<ReleaseInfo>,
    file_writes: Mutex<Vec<FileUpdate>>,
    created_releases: Mutex<Vec<NewRelease>>,
}

impl MockHost {
    /// Create a new empty mock host
    pub fn new() -> Self {
        MockHost {
            commits: HashMap::new(),
            releases: Vec::new(),
            file_writes: Mutex::new(Vec::new()),
            created_releases: Mutex::new(Vec::new()),
        }
    }

    /// Add a commit that `get_commit` can find
    pub fn add_commit(&mut self, sha: impl Into<String>, author: &str, message: &str) {
        let sha = sha.into();
        self.commits.insert(
            sha.clone(),
            CommitInfo {
                sha,
                author: author.to_string(),
                message: message.to_string(),
            },
        );
    }

    /// Add an existing release; releases are listed in insertion order
    pub fn add_release(&mut self, tag_name: impl Into<String>) {
        self.releases.push(ReleaseInfo {
            tag_name: tag_name.into(),
        });
    }

    /// Files written so far, in order
    pub fn file_writes(&self) -> Vec<FileUpdate> {
        self.file_writes
            .lock()
            .map(|writes| writes.clone())
            .unwrap_or_default()
    }

    /// Releases created so far, in order
    pub fn created_releases(&self) -> Vec<NewRelease> {
        self.created_releases
            .lock()
            .map(|releases| releases.clone())
            .unwrap_or_default()
    }
}

impl Default for MockHost {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryHost for MockHost {
    fn get_commit(&self, sha: &str) -> Result<CommitInfo> {
        self.commits
            .get(sha)
            .cloned()
            .ok_or_else(|| ChangebotError::api(404, "Not Found"))
    }

    fn list_releases(&self) -> Result<Vec<ReleaseInfo>> {
        Ok(self.releases.clone())
    }

    fn put_file(&self, update: &FileUpdate) -> Result<FileCommit> {
        let mut writes = self
            .file_writes
            .lock()
            .map_err(|_| ChangebotError::api(500, "mock host poisoned"))?;
        writes.push(update.clone());

        let blob = Oid::hash_object(ObjectType::Blob, update.content.as_bytes())?;

        Ok(FileCommit {
            commit_sha: format!("{:040x}", writes.len()),
            content_sha: Some(blob.to_string()),
        })
    }

    fn create_release(&self, release: &NewRelease) -> Result<CreatedRelease> {
        let mut releases = self
            .created_releases
            .lock()
            .map_err(|_| ChangebotError::api(500, "mock host poisoned"))?;
        releases.push(release.clone());

        Ok(CreatedRelease {
            id: releases.len() as u64,
            html_url: format!("https://example.invalid/releases/{}", release.tag_name),
        })
    }
}
