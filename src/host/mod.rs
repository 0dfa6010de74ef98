//! Remote repository host abstraction
//!
//! The release workflow only ever talks to the hosting platform through the
//! [RepositoryHost] trait, which covers the four calls a release needs:
//! reading the triggering commit, listing releases, writing a file on the
//! target branch and publishing the release.
//!
//! - [github::GitHubClient]: GitHub REST implementation over blocking `reqwest`
//! - [mock::MockHost]: in-memory implementation recording every call
//!
//! ```rust
//! # use changebot::host::RepositoryHost;
//! # fn example<H: RepositoryHost>(host: &H) -> changebot::Result<()> {
//! let commit = host.get_commit("0123456789abcdef0123456789abcdef01234567")?;
//! println!("{} by {}", commit.message, commit.author);
//! # Ok(())
//! # }
//! ```

pub mod github;
pub mod mock;

pub use github::GitHubClient;
pub use mock::MockHost;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Commit metadata as stored on the host
#[derive(Debug, Clone, PartialEq)]
pub struct CommitInfo {
    pub sha: String,
    pub author: String,
    pub message: String,
}

/// An existing release, in the order the host lists them
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ReleaseInfo {
    pub tag_name: String,
}

/// Write of one whole file on a branch.
///
/// `sha` is the blob hash of the content being replaced; `None` means the
/// file does not exist yet and is created.
#[derive(Debug, Clone, PartialEq)]
pub struct FileUpdate {
    pub path: String,
    pub content: String,
    pub message: String,
    pub branch: String,
    pub sha: Option<String>,
}

/// Commit produced by a file write
#[derive(Debug, Clone, PartialEq)]
pub struct FileCommit {
    pub commit_sha: String,
    /// Blob hash of the written file, when the host reports it
    pub content_sha: Option<String>,
}

/// Release to publish
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewRelease {
    pub tag_name: String,
    pub target_commitish: String,
    pub name: String,
    pub body: String,
}

/// Release as returned by the host after creation
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CreatedRelease {
    pub id: u64,
    #[serde(default)]
    pub html_url: String,
}

/// Remote operations the release workflow depends on.
///
/// Implementations map transport and API failures to
/// [crate::error::ChangebotError] and never retry.
pub trait RepositoryHost: Send + Sync {
    /// Fetch a commit's author and message by SHA
    fn get_commit(&self, sha: &str) -> Result<CommitInfo>;

    /// List releases in the host's own order (newest first on GitHub)
    fn list_releases(&self) -> Result<Vec<ReleaseInfo>>;

    /// Create or replace a file, returning the resulting commit
    fn put_file(&self, update: &FileUpdate) -> Result<FileCommit>;

    /// Publish a release
    fn create_release(&self, release: &NewRelease) -> Result<CreatedRelease>;
}
