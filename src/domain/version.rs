use crate::error::{ChangebotError, Result};
use std::fmt;

/// Release version as carried by a release tag: `X.Y.Z` or `vX.Y.Z`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    /// Whether the tag was written with a leading `v`
    pub prefixed: bool,
}

impl Version {
    /// Create a new version
    pub fn new(major: u64, minor: u64, patch: u64, prefixed: bool) -> Self {
        Version {
            major,
            minor,
            patch,
            prefixed,
        }
    }

    /// Parse version from a tag string (e.g., "v1.2.3" -> Version(1,2,3,prefixed))
    pub fn parse(tag: &str) -> Result<Self> {
        let trimmed = tag.trim();
        let (prefixed, body) = match trimmed.strip_prefix('v') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };

        let parts: Vec<&str> = body.split('.').collect();
        if parts.len() != 3 {
            return Err(ChangebotError::version(format!(
                "Invalid version format: '{}' - expected X.Y.Z",
                tag
            )));
        }

        let component = |name: &str, raw: &str| {
            raw.parse::<u64>().map_err(|_| {
                ChangebotError::version(format!("Invalid {} version in '{}': {}", name, tag, raw))
            })
        };

        Ok(Version {
            major: component("major", parts[0])?,
            minor: component("minor", parts[1])?,
            patch: component("patch", parts[2])?,
            prefixed,
        })
    }

    /// Increment exactly one component.
    ///
    /// The other two components are carried forward untouched: a major bump
    /// of `v1.2.3` is `v2.2.3`, not `v2.0.0`. Release history depends on this.
    pub fn bump(&self, bump_type: VersionBump) -> Result<Self> {
        let mut next = *self;
        let component = match bump_type {
            VersionBump::Major => &mut next.major,
            VersionBump::Minor => &mut next.minor,
            VersionBump::Patch => &mut next.patch,
        };
        *component = component.checked_add(1).ok_or_else(|| {
            ChangebotError::version(format!(
                "{} bump of '{}' overflows the {} component",
                bump_type.name(),
                self,
                bump_type.name().to_lowercase()
            ))
        })?;
        Ok(next)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.prefixed {
            write!(f, "v")?;
        }
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// Version component selected by a bump marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VersionBump {
    Major,
    Minor,
    Patch,
}

impl VersionBump {
    pub fn name(&self) -> &'static str {
        match self {
            VersionBump::Major => "MAJOR",
            VersionBump::Minor => "MINOR",
            VersionBump::Patch => "PATCH",
        }
    }
}
