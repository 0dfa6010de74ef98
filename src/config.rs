use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ChangebotError, Result};

pub const ACCESS_TOKEN_VAR: &str = "CHANGEBOT_ACCESS_TOKEN";
pub const COMMIT_SHA_VAR: &str = "CIRCLE_SHA1";
pub const OWNER_VAR: &str = "CIRCLE_PROJECT_USERNAME";
pub const REPO_VAR: &str = "CIRCLE_PROJECT_REPONAME";
pub const BRANCH_VAR: &str = "CIRCLE_BRANCH";

/// Everything one release run needs, resolved once at process start.
///
/// The CI-injected values come from the environment; paths, the generator
/// command and the API endpoint come from [`Settings`].
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub access_token: String,
    pub commit_sha: String,
    pub owner: String,
    pub repo: String,
    pub branch: String,
    pub settings: Settings,
}

impl Config {
    /// Builds the configuration from the process environment.
    pub fn from_env(settings: Settings) -> Result<Self> {
        Self::from_lookup(settings, |key| std::env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary variable lookup.
    ///
    /// Every CI variable is required and must be non-empty.
    pub fn from_lookup<F>(settings: Settings, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let require = |key: &str| -> Result<String> {
            match lookup(key) {
                Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
                Some(_) => Err(ChangebotError::config(format!("{} is empty", key))),
                None => Err(ChangebotError::config(format!("{} is not set", key))),
            }
        };

        Ok(Config {
            access_token: require(ACCESS_TOKEN_VAR)?,
            commit_sha: require(COMMIT_SHA_VAR)?,
            owner: require(OWNER_VAR)?,
            repo: require(REPO_VAR)?,
            branch: require(BRANCH_VAR)?,
            settings,
        })
    }
}

/// File-based settings for changebot.
///
/// Everything here has a default, so a missing settings file is fine.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Settings {
    #[serde(default = "default_current_changelog")]
    pub current_changelog: String,

    #[serde(default = "default_full_changelog")]
    pub full_changelog: String,

    /// Local checkout the changelog files are read from
    #[serde(default = "default_workspace")]
    pub workspace: PathBuf,

    #[serde(default = "default_api_url")]
    pub api_url: String,

    #[serde(default)]
    pub generator: GeneratorSettings,
}

fn default_current_changelog() -> String {
    "CHANGELOG.current.md".to_string()
}

fn default_full_changelog() -> String {
    "CHANGELOG.md".to_string()
}

fn default_workspace() -> PathBuf {
    PathBuf::from(".")
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            current_changelog: default_current_changelog(),
            full_changelog: default_full_changelog(),
            workspace: default_workspace(),
            api_url: default_api_url(),
            generator: GeneratorSettings::default(),
        }
    }
}

/// Command used to produce the changelog text.
///
/// When `program` is unset the running executable's own `changelog`
/// subcommand is used.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct GeneratorSettings {
    #[serde(default)]
    pub program: Option<String>,

    #[serde(default)]
    pub args: Vec<String>,
}

/// Loads settings from file or returns defaults.
///
/// Attempts to load settings in the following order:
/// 1. Custom path provided as parameter
/// 2. `changebot.toml` in current directory
/// 3. `.changebot.toml` in the user config directory
/// 4. Default settings if no file found
pub fn load_settings(config_path: Option<&str>) -> Result<Settings> {
    let settings_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new("./changebot.toml").exists() {
        fs::read_to_string("./changebot.toml")?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(".changebot.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Settings::default());
        }
    } else {
        return Ok(Settings::default());
    };

    toml::from_str(&settings_str)
        .map_err(|e| ChangebotError::config(format!("invalid settings file: {}", e)))
}
