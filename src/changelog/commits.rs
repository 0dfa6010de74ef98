use regex::Regex;
use std::sync::OnceLock;

const MAX_SUBJECT_LENGTH: usize = 100;

/// A commit as read from local history
#[derive(Debug, Clone, PartialEq)]
pub struct RawCommit {
    pub hash: String,
    pub committer: String,
    pub message: String,
}

/// A commit that made it into the changelog
#[derive(Debug, Clone, PartialEq)]
pub struct ChangeEntry {
    pub hash: String,
    pub committer: String,
    pub r#type: String,
    pub component: Option<String>,
    pub subject: String,
    pub closes: Vec<u32>,
    pub breaks: Vec<String>,
}

struct Patterns {
    candidate: Regex,
    subject: Regex,
    subject_closes: Regex,
    body_closes: Regex,
    breaking: Regex,
}

fn patterns() -> Option<&'static Patterns> {
    static PATTERNS: OnceLock<Option<Patterns>> = OnceLock::new();
    PATTERNS
        .get_or_init(|| {
            Some(Patterns {
                candidate: Regex::new(r"(?m)^feat|^(bug)?fix|^refactor|BREAKING").ok()?,
                subject: Regex::new(r"^(\w*)(\(([\w$.\-*]*)\))?: (.*)$").ok()?,
                subject_closes: Regex::new(r"\s*(?:Closes|Fixes)\s#(\d+)").ok()?,
                body_closes: Regex::new(r"(?:Closes|Fixes)\s((?:#\d+(?:,\s)?)+)").ok()?,
                breaking: Regex::new(r"(?s)BREAKING CHANGE:\s(.*)").ok()?,
            })
        })
        .as_ref()
}

/// Whether a commit message is worth parsing at all: some line starts with
/// `feat`, `fix`, `bugfix` or `refactor`, or the message mentions `BREAKING`.
pub fn is_candidate(message: &str) -> bool {
    patterns().is_some_and(|p| p.candidate.is_match(message))
}

/// Parses a commit into a changelog entry.
///
/// Returns `None` when the subject is not of the form `type(component): text`.
pub fn parse_commit(raw: &RawCommit) -> Option<ChangeEntry> {
    let p = patterns()?;
    let mut lines = raw.message.lines();
    // The subject is the whole first paragraph, unwrapped the way `git log --format=%s` does.
    let mut subject = lines
        .by_ref()
        .take_while(|line| !line.trim().is_empty())
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join(" ");
    if subject.is_empty() {
        return None;
    }
    let mut closes = Vec::new();

    if let Some(captures) = p.subject_closes.captures(&subject) {
        if let Some(issue) = captures.get(1).and_then(|m| m.as_str().parse().ok()) {
            closes.push(issue);
        }
        subject = p.subject_closes.replace(&subject, "").into_owned();
    }

    for line in lines {
        if let Some(list) = p.body_closes.captures(line).and_then(|c| c.get(1)) {
            closes.extend(
                list.as_str()
                    .split(',')
                    .filter_map(|issue| issue.trim().trim_start_matches('#').parse::<u32>().ok()),
            );
        }
    }

    let breaks = p
        .breaking
        .captures(&raw.message)
        .and_then(|c| c.get(1))
        .map(|m| vec![m.as_str().trim_end().to_string()])
        .unwrap_or_default();

    let captures = p.subject.captures(&subject)?;
    let r#type = captures.get(1)?.as_str();
    let text = captures.get(4)?.as_str();
    if r#type.is_empty() || text.is_empty() {
        return None;
    }

    Some(ChangeEntry {
        hash: raw.hash.clone(),
        committer: raw.committer.clone(),
        r#type: r#type.to_string(),
        component: captures
            .get(3)
            .map(|m| m.as_str().to_string())
            .filter(|c| !c.is_empty()),
        subject: text.chars().take(MAX_SUBJECT_LENGTH).collect(),
        closes,
        breaks,
    })
}

/// Keeps the candidate commits that parse, in history order.
pub fn collect_entries(commits: &[RawCommit]) -> Vec<ChangeEntry> {
    commits
        .iter()
        .filter(|c| is_candidate(&c.message))
        .filter_map(parse_commit)
        .collect()
}
