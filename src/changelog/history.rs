use chrono::{DateTime, Utc};
use git2::{Oid, Repository, Sort};
use regex::Regex;
use std::path::Path;
use std::sync::OnceLock;

use crate::changelog::commits::RawCommit;
use crate::error::Result;

/// A tag together with the time of the commit it points at
#[derive(Debug, Clone, PartialEq)]
pub struct TagInfo {
    pub name: String,
    pub time: DateTime<Utc>,
}

/// Most recent version tags, used for the "since" subtitle
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LatestTags {
    /// Newest `X.Y.Z` tag of any kind
    pub patch: Option<TagInfo>,
    /// Newest tag ending in `.0`
    pub minor: Option<TagInfo>,
}

/// Read-only view of the local git history.
pub struct History {
    repo: Repository,
}

impl History {
    /// Discovers the repository containing `path`.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Ok(History {
            repo: Repository::discover(path)?,
        })
    }

    /// All tags that point (directly or through an annotated tag) at a
    /// commit, newest commit first.
    pub fn tags(&self) -> Result<Vec<TagInfo>> {
        let mut tags = Vec::new();

        for name in self.repo.tag_names(None)?.iter().flatten() {
            let Ok(object) = self.repo.revparse_single(&format!("refs/tags/{}", name)) else {
                continue;
            };
            let Ok(commit) = object.peel_to_commit() else {
                continue;
            };
            let Some(time) = DateTime::from_timestamp(commit.time().seconds(), 0) else {
                continue;
            };
            tags.push(TagInfo {
                name: name.to_string(),
                time,
            });
        }

        tags.sort_by(|a, b| b.time.cmp(&a.time).then_with(|| b.name.cmp(&a.name)));
        Ok(tags)
    }

    /// Commits reachable from `to` but not from `from`, newest first.
    pub fn commits(&self, from: Option<&str>, to: &str) -> Result<Vec<RawCommit>> {
        let mut walk = self.repo.revwalk()?;
        walk.set_sorting(Sort::TIME)?;
        walk.push(self.resolve(to)?)?;
        if let Some(from) = from {
            walk.hide(self.resolve(from)?)?;
        }

        let mut commits = Vec::new();
        for oid in walk {
            let commit = self.repo.find_commit(oid?)?;
            commits.push(RawCommit {
                hash: commit.id().to_string(),
                committer: commit.committer().name().unwrap_or("unknown").to_string(),
                message: commit.message().unwrap_or_default().to_string(),
            });
        }

        Ok(commits)
    }

    fn resolve(&self, rev: &str) -> Result<Oid> {
        Ok(self.repo.revparse_single(rev)?.peel_to_commit()?.id())
    }
}

fn version_tag_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^v?\d+\.\d+\.\d+$").ok()).as_ref()
}

/// Picks the newest version tag and the newest minor (`.0`) tag.
///
/// `tags` must already be sorted newest first.
pub fn latest_tags(tags: &[TagInfo]) -> LatestTags {
    let mut latest = LatestTags::default();
    let Some(re) = version_tag_regex() else {
        return latest;
    };

    for tag in tags.iter().filter(|t| re.is_match(&t.name)) {
        if latest.patch.is_none() {
            latest.patch = Some(tag.clone());
        }
        if tag.name.ends_with(".0") {
            latest.minor = Some(tag.clone());
            break;
        }
    }

    latest
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(name: &str, secs: i64) -> TagInfo {
        TagInfo {
            name: name.to_string(),
            time: DateTime::from_timestamp(secs, 0).unwrap(),
        }
    }

    #[test]
    fn test_latest_tags_picks_patch_and_minor() {
        let tags = vec![
            tag("v1.2.3", 300),
            tag("nightly", 250),
            tag("v1.2.0", 200),
            tag("v1.1.0", 100),
        ];
        let latest = latest_tags(&tags);
        assert_eq!(latest.patch.unwrap().name, "v1.2.3");
        assert_eq!(latest.minor.unwrap().name, "v1.2.0");
    }

    #[test]
    fn test_latest_tags_newest_is_minor() {
        let tags = vec![tag("2.0.0", 300), tag("1.9.9", 200)];
        let latest = latest_tags(&tags);
        assert_eq!(latest.patch.unwrap().name, "2.0.0");
        assert_eq!(latest.minor.unwrap().name, "2.0.0");
    }

    #[test]
    fn test_latest_tags_empty() {
        assert_eq!(latest_tags(&[]), LatestTags::default());
    }
}
