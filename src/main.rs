use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use changebot::changelog::{self, ChangelogRequest, CommandGenerator};
use changebot::cli::{run_release_workflow, ReleaseOutcome};
use changebot::config::{self, Config};
use changebot::host::GitHubClient;
use changebot::ui;

#[derive(Parser)]
#[command(
    name = "changebot",
    version,
    about = "Publish changelogs and GitHub releases from bump markers in CI commits"
)]
struct Args {
    #[arg(short, long, help = "Custom settings file path")]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Release the commit named by the CI environment (default)
    Release,
    /// Print the changelog for a version, built from local git history
    Changelog(ChangelogArgs),
}

#[derive(clap::Args)]
struct ChangelogArgs {
    #[arg(short = 'v', long = "tag_version", help = "Version this changelog marks, e.g. v1.0.0")]
    tag_version: String,

    #[arg(short, long, help = "Release codename")]
    codename: Option<String>,

    #[arg(short, long, help = "Start of the range; defaults to the latest tag")]
    from: Option<String>,

    #[arg(short, long, default_value = "HEAD", help = "End of the range")]
    to: String,

    #[arg(short, long, help = "Repository URL used to link commits and issues")]
    repository: Option<String>,

    #[arg(long, default_value = ".", help = "Path inside the git repository")]
    repo_path: PathBuf,
}

fn main() -> ExitCode {
    // stdout carries the changelog text for the `changelog` subcommand
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "changebot=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();
    let result = match args.command.unwrap_or(Command::Release) {
        Command::Release => release(args.config.as_deref()),
        Command::Changelog(changelog_args) => print_changelog(changelog_args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            ui::display_error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

fn release(config_path: Option<&str>) -> Result<()> {
    let settings = config::load_settings(config_path).context("Error loading settings")?;
    let config = Config::from_env(settings)?;

    let host = GitHubClient::new(&config)?;
    let generator = CommandGenerator::from_settings(&config.settings.generator)?
        .current_dir(&config.settings.workspace);

    ui::display_status(&format!(
        "Checking {}/{}@{} for a bump marker",
        config.owner, config.repo, config.commit_sha
    ));

    match run_release_workflow(&config, &host, &generator)? {
        ReleaseOutcome::NoMarker => ui::display_status("No bump message found."),
        ReleaseOutcome::Released(result) => ui::display_release(&result),
    }

    Ok(())
}

fn print_changelog(args: ChangelogArgs) -> Result<()> {
    let request = ChangelogRequest {
        tag_version: args.tag_version,
        codename: args.codename,
        from: args.from,
        to: args.to,
        repository: args.repository,
        repo_path: args.repo_path,
    };

    let text = changelog::generate(&request).context("Failed to generate changelog")?;
    println!("{}", text);
    Ok(())
}
