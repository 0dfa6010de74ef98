//! Markdown rendering of a release's changelog.

use chrono::{NaiveDate, TimeDelta};
use std::collections::BTreeMap;
use std::fmt::Write;

use crate::changelog::commits::ChangeEntry;

/// Previous release the header measures against
#[derive(Debug, Clone, PartialEq)]
pub struct SinceTag {
    pub name: String,
    pub age: TimeDelta,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    pub version: String,
    pub codename: Option<String>,
    /// Base URL used to link commits and issues, e.g. `https://github.com/o/r`
    pub repository: Option<String>,
    pub since: Option<SinceTag>,
    pub date: NaiveDate,
}

/// Release size implied by the version string alone
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseKind {
    Major,
    Minor,
    Patch,
}

impl ReleaseKind {
    pub fn of(version: &str) -> Self {
        if version.ends_with(".0.0") {
            ReleaseKind::Major
        } else if version.ends_with(".0") {
            ReleaseKind::Minor
        } else {
            ReleaseKind::Patch
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ReleaseKind::Major => "Major",
            ReleaseKind::Minor => "Minor",
            ReleaseKind::Patch => "Patch",
        }
    }
}

struct Item<'a> {
    subject: &'a str,
    committer: Option<&'a str>,
    hash: &'a str,
    closes: &'a [u32],
}

type Section<'a> = BTreeMap<Option<&'a str>, Vec<Item<'a>>>;

fn item(entry: &ChangeEntry) -> Item<'_> {
    Item {
        subject: &entry.subject,
        committer: Some(&entry.committer),
        hash: &entry.hash,
        closes: &entry.closes,
    }
}

/// Renders the changelog for one release.
pub fn render(entries: &[ChangeEntry], options: &RenderOptions) -> String {
    let mut fixes: Section = BTreeMap::new();
    let mut features: Section = BTreeMap::new();
    let mut refactors: Section = BTreeMap::new();
    let mut chores: Section = BTreeMap::new();
    let mut breaks: Section = BTreeMap::new();
    let mut bugfixes: Section = BTreeMap::new();

    for entry in entries {
        let section = match entry.r#type.as_str() {
            "fix" => Some(&mut fixes),
            "bugfix" => Some(&mut bugfixes),
            "feat" => Some(&mut features),
            "refactor" => Some(&mut refactors),
            "chore" => Some(&mut chores),
            _ => None,
        };
        if let Some(section) = section {
            section
                .entry(entry.component.as_deref())
                .or_default()
                .push(item(entry));
        }

        for note in &entry.breaks {
            breaks.entry(None).or_default().push(Item {
                subject: note,
                committer: None,
                hash: &entry.hash,
                closes: &[],
            });
        }
    }

    for (component, items) in bugfixes {
        fixes.entry(component).or_default().extend(items);
    }

    let mut out = header(options);
    write_section(&mut out, "Bug Fixes", &fixes, options);
    write_section(&mut out, "Features", &features, options);
    write_section(&mut out, "Refactoring", &refactors, options);
    write_section(&mut out, "Chores", &chores, options);
    write_section(&mut out, "Breaking Changes", &breaks, options);
    out
}

fn header(options: &RenderOptions) -> String {
    let version = &options.version;
    let codename = options
        .codename
        .as_ref()
        .map(|c| format!(" \"{}\"", c))
        .unwrap_or_default();
    let mut out = format!(
        "<a name=\"{}\"></a>\n## {}{}\n#### {} Release on {}",
        version,
        version,
        codename,
        ReleaseKind::of(version).label(),
        options.date.format("%Y-%m-%d")
    );

    if let Some(since) = &options.since {
        let _ = write!(
            out,
            "; _{} since {}_\n\n",
            humanize(since.age),
            since.name
        );
    }

    out
}

fn write_section(out: &mut String, title: &str, section: &Section<'_>, options: &RenderOptions) {
    if section.is_empty() {
        return;
    }

    let _ = write!(out, "\n#### {}\n\n", title);

    for (component, items) in section {
        let mut prefix = "*".to_string();
        if let Some(name) = component {
            if items.len() > 1 {
                let _ = writeln!(out, "* **{}:**", name);
                prefix = "  *".to_string();
            } else {
                prefix = format!("* **{}:**", name);
            }
        }

        for item in items {
            let _ = write!(out, "{} {}", prefix, item.subject);
            if let Some(committer) = item.committer {
                let _ = write!(out, " _by {}_", committer);
            }
            let _ = write!(out, " ({}", commit_link(options.repository.as_deref(), item.hash));
            if !item.closes.is_empty() {
                let issues: Vec<String> = item
                    .closes
                    .iter()
                    .map(|issue| issue_link(options.repository.as_deref(), *issue))
                    .collect();
                let _ = write!(out, ", closes {}", issues.join(", "));
            }
            out.push_str(")\n");
        }
    }

    out.push('\n');
}

fn commit_link(repository: Option<&str>, hash: &str) -> String {
    let short: String = hash.chars().take(8).collect();
    match repository {
        Some(repo) => format!("[{}]({}/commit/{})", short, repo.trim_end_matches('/'), hash),
        None => short,
    }
}

fn issue_link(repository: Option<&str>, issue: u32) -> String {
    match repository {
        Some(repo) => format!("[#{}]({}/issues/{})", issue, repo.trim_end_matches('/'), issue),
        None => format!("#{}", issue),
    }
}

/// Coarse human-readable duration: "a few seconds", "3 days", "a year".
pub fn humanize(age: TimeDelta) -> String {
    let seconds = age.num_seconds().max(0);
    let minutes = (seconds + 30) / 60;
    let hours = (minutes + 30) / 60;
    let days = (hours + 12) / 24;

    if seconds < 45 {
        "a few seconds".to_string()
    } else if seconds < 90 {
        "a minute".to_string()
    } else if minutes < 45 {
        format!("{} minutes", minutes)
    } else if minutes < 90 {
        "an hour".to_string()
    } else if hours < 22 {
        format!("{} hours", hours)
    } else if hours < 36 {
        "a day".to_string()
    } else if days < 26 {
        format!("{} days", days)
    } else if days < 45 {
        "a month".to_string()
    } else if days < 320 {
        format!("{} months", (days + 15) / 30)
    } else if days < 548 {
        "a year".to_string()
    } else {
        format!("{} years", (days + 182) / 365)
    }
}
