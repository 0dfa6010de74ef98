//! Main release workflow
//!
//! Keeps the release steps out of main.rs: everything here talks to the
//! remote through [RepositoryHost] and to the changelog tool through
//! [ChangelogGenerator], so the whole run can be exercised with test doubles.

use tracing::{error, info, warn};

use crate::changelog::files::{write_changelog, ChangelogFile, WriteMode};
use crate::changelog::generator::ChangelogGenerator;
use crate::config::Config;
use crate::domain::{BumpMarker, ReleasePlan};
use crate::error::{ChangebotError, Result};
use crate::host::{NewRelease, ReleaseInfo, RepositoryHost};

/// How a release run ended
#[derive(Debug, Clone, PartialEq)]
pub enum ReleaseOutcome {
    /// The triggering commit carries no bump marker; nothing was written
    NoMarker,
    Released(WorkflowResult),
}

/// Result of a successful release
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    pub plan: ReleasePlan,
    pub release_name: String,
    /// Commit that added the changelog; the release tag points here
    pub changelog_commit: String,
    pub release_url: String,
}

/// Runs one release for `config.commit_sha`:
/// 1. Fetch the triggering commit and look for a bump marker
/// 2. Derive the new version from the latest release
/// 3. Generate the changelog
/// 4. Write the current and full changelog files
/// 5. Create the release on the changelog commit
pub fn run_release_workflow<H, G>(
    config: &Config,
    host: &H,
    generator: &G,
) -> Result<ReleaseOutcome>
where
    H: RepositoryHost,
    G: ChangelogGenerator,
{
    let commit = host.get_commit(&config.commit_sha)?;
    info!(sha = %commit.sha, author = %commit.author, "inspecting commit");

    let Some(marker) = BumpMarker::find(&commit.message) else {
        info!("No bump message found.");
        return Ok(ReleaseOutcome::NoMarker);
    };

    let releases = host.list_releases()?;
    warn_if_unordered(&releases);
    let plan = ReleasePlan::new(&marker, releases.first().map(|r| r.tag_name.as_str()))?;
    let release_name = plan.display_name();
    info!(
        old = %plan.old_version,
        new = %plan.new_version,
        name = %release_name,
        "computed release version"
    );

    let output = generator.generate(&plan.generator_args())?;
    if !output.success() {
        error!(
            code = output.code,
            stderr = %output.stderr.trim_end(),
            "changelog generator failed"
        );
        return Err(ChangebotError::Generator {
            code: output.code,
            stderr: output.stderr,
        });
    }
    let changelog = output.stdout;

    let settings = &config.settings;
    let current = ChangelogFile {
        path: &settings.current_changelog,
        mode: WriteMode::Replace,
        message: plan.commit_message(&settings.current_changelog),
    };
    let current_commit =
        write_changelog(host, &settings.workspace, &config.branch, &current, &changelog)?;
    info!(
        path = %current.path,
        commit = %current_commit.commit_sha,
        blob = ?current_commit.content_sha,
        "wrote current changelog"
    );

    let full = ChangelogFile {
        path: &settings.full_changelog,
        mode: WriteMode::Prepend,
        message: plan.commit_message(&settings.full_changelog),
    };
    let changelog_commit =
        write_changelog(host, &settings.workspace, &config.branch, &full, &changelog)?;
    info!(
        path = %full.path,
        commit = %changelog_commit.commit_sha,
        blob = ?changelog_commit.content_sha,
        "wrote full changelog"
    );

    let created = host.create_release(&NewRelease {
        tag_name: plan.new_version.clone(),
        target_commitish: changelog_commit.commit_sha.clone(),
        name: release_name.clone(),
        body: changelog,
    })?;
    info!(id = created.id, url = %created.html_url, "created release");

    Ok(ReleaseOutcome::Released(WorkflowResult {
        plan,
        release_name,
        changelog_commit: changelog_commit.commit_sha,
        release_url: created.html_url,
    }))
}

/// The first listed release is taken as the latest, as the host orders them.
/// Flag it when a later entry carries a higher version.
fn warn_if_unordered(releases: &[ReleaseInfo]) {
    let parse = |tag: &str| semver::Version::parse(tag.trim_start_matches('v')).ok();

    let Some(first) = releases.first() else {
        return;
    };
    let Some(first_version) = parse(&first.tag_name) else {
        return;
    };

    if let Some(newer) = releases
        .iter()
        .skip(1)
        .find(|r| parse(&r.tag_name).is_some_and(|v| v > first_version))
    {
        warn!(
            first = %first.tag_name,
            newer = %newer.tag_name,
            "release list is not ordered by version; using the first entry"
        );
    }
}
