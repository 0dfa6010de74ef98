//! Changelog production and publication
//!
//! - `generator` - running the changelog command as a subprocess
//! - `files` - writing the current/full changelog files through the host
//! - `history`, `commits`, `writer` - the built-in generator behind the
//!   `changelog` subcommand: read local history, select conventional
//!   commits, render Markdown

pub mod commits;
pub mod files;
pub mod generator;
pub mod history;
pub mod writer;

pub use files::{ChangelogFile, WriteMode};
pub use generator::{ChangelogGenerator, CommandGenerator, GeneratorOutput};

use chrono::{Local, Utc};
use std::path::PathBuf;
use tracing::debug;

use crate::error::Result;
use history::{latest_tags, History};
use writer::{ReleaseKind, RenderOptions, SinceTag};

/// Inputs of the built-in generator
#[derive(Debug, Clone, PartialEq)]
pub struct ChangelogRequest {
    pub tag_version: String,
    pub codename: Option<String>,
    /// Start of the range; defaults to the most recent tag
    pub from: Option<String>,
    pub to: String,
    pub repository: Option<String>,
    pub repo_path: PathBuf,
}

/// Builds the changelog for `request.tag_version` from local history.
pub fn generate(request: &ChangelogRequest) -> Result<String> {
    let history = History::open(&request.repo_path)?;
    let tags = history.tags()?;

    let from = request
        .from
        .clone()
        .or_else(|| tags.first().map(|t| t.name.clone()));
    debug!(from = ?from, to = %request.to, "collecting commits");

    let raw = history.commits(from.as_deref(), &request.to)?;
    let entries = commits::collect_entries(&raw);
    debug!(total = raw.len(), kept = entries.len(), "selected changelog commits");

    let latest = latest_tags(&tags);
    let since_tag = match ReleaseKind::of(&request.tag_version) {
        ReleaseKind::Major => None,
        ReleaseKind::Minor => latest.minor,
        ReleaseKind::Patch => latest.patch,
    };
    let now = Utc::now();
    let since = since_tag.map(|tag| SinceTag {
        age: now - tag.time,
        name: tag.name,
    });

    let options = RenderOptions {
        version: request.tag_version.clone(),
        codename: request.codename.clone(),
        repository: request.repository.clone(),
        since,
        date: Local::now().date_naive(),
    };

    Ok(writer::render(&entries, &options))
}
