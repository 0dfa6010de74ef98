use regex::Regex;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::domain::version::{Version, VersionBump};
use crate::error::{ChangebotError, Result};

const MARKER_PATTERN: &str =
    r"\[\[BUMP:(MAJOR|MINOR|PATCH|v?\d+\.\d+\.\d+)(:[A-Za-z0-9 _-]+)?\]\]";

fn marker_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(MARKER_PATTERN).ok()).as_ref()
}

/// What a bump marker asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BumpKind {
    /// Increment one component of the previous release's version
    Increment(VersionBump),
    /// Use this version string verbatim
    Explicit(String),
}

impl BumpKind {
    /// Computes the version that follows `old_version`.
    ///
    /// Explicit versions ignore `old_version` entirely, so a malformed
    /// previous tag only matters for increments.
    pub fn next_version(&self, old_version: &str) -> Result<String> {
        match self {
            BumpKind::Increment(bump) => Ok(Version::parse(old_version)?.bump(*bump)?.to_string()),
            BumpKind::Explicit(version) => Ok(version.clone()),
        }
    }
}

impl FromStr for BumpKind {
    type Err = ChangebotError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "MAJOR" => Ok(BumpKind::Increment(VersionBump::Major)),
            "MINOR" => Ok(BumpKind::Increment(VersionBump::Minor)),
            "PATCH" => Ok(BumpKind::Increment(VersionBump::Patch)),
            other => {
                Version::parse(other)
                    .map_err(|_| ChangebotError::marker(format!("unknown bump kind '{}'", other)))?;
                Ok(BumpKind::Explicit(other.to_string()))
            }
        }
    }
}

/// A `[[BUMP:<kind>]]` or `[[BUMP:<kind>:<codename>]]` directive
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BumpMarker {
    pub kind: BumpKind,
    pub codename: Option<String>,
}

impl BumpMarker {
    /// Finds the first bump marker in a commit message.
    pub fn find(message: &str) -> Option<Self> {
        let captures = marker_regex()?.captures(message)?;
        // The pattern only admits the literals or X.Y.Z, both of which parse.
        let kind = captures.get(1)?.as_str().parse().ok()?;
        let codename = captures
            .get(2)
            .map(|m| m.as_str().trim_start_matches(':').to_string());

        Some(BumpMarker { kind, codename })
    }
}
