use crate::domain::marker::BumpMarker;
use crate::error::Result;

/// Tag assumed when the repository has no releases yet
pub const INITIAL_VERSION: &str = "v0.0.0";

/// Everything decided about a release before anything is written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleasePlan {
    pub old_version: String,
    pub new_version: String,
    pub codename: Option<String>,
}

impl ReleasePlan {
    /// Derives the plan from a marker and the previous release tag.
    pub fn new(marker: &BumpMarker, previous_tag: Option<&str>) -> Result<Self> {
        let old_version = previous_tag.unwrap_or(INITIAL_VERSION).to_string();
        let new_version = marker.kind.next_version(&old_version)?;

        Ok(ReleasePlan {
            old_version,
            new_version,
            codename: marker.codename.clone(),
        })
    }

    /// Release title: the version, plus the quoted codename when there is one.
    pub fn display_name(&self) -> String {
        match &self.codename {
            Some(codename) => format!("{} \"{}\"", self.new_version, codename),
            None => self.new_version.clone(),
        }
    }

    /// Arguments handed to the changelog generator.
    pub fn generator_args(&self) -> Vec<String> {
        let mut args = vec!["--tag_version".to_string(), self.new_version.clone()];
        if let Some(codename) = &self.codename {
            args.push("--codename".to_string());
            args.push(codename.clone());
        }
        args
    }

    pub fn commit_message(&self, path: &str) -> String {
        format!(
            "chore(changelog): changebot update {} for Release {}",
            path, self.new_version
        )
    }
}
