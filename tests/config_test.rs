// tests/config_test.rs
use changebot::config::{load_settings, Config, Settings};
use serial_test::serial;
use std::io::Write;
use std::path::PathBuf;
use tempfile::NamedTempFile;

const CI_VARS: [(&str, &str); 5] = [
    ("CHANGEBOT_ACCESS_TOKEN", "token"),
    ("CIRCLE_SHA1", "0123456789abcdef0123456789abcdef01234567"),
    ("CIRCLE_PROJECT_USERNAME", "octo"),
    ("CIRCLE_PROJECT_REPONAME", "widgets"),
    ("CIRCLE_BRANCH", "main"),
];

fn set_ci_env() {
    for (key, value) in CI_VARS {
        std::env::set_var(key, value);
    }
}

fn clear_ci_env() {
    for (key, _) in CI_VARS {
        std::env::remove_var(key);
    }
}

#[test]
fn test_load_from_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    let toml_content = r#"
full_changelog = "HISTORY.md"

[generator]
program = "./gen.sh"
"#;
    temp_file.write_all(toml_content.as_bytes()).unwrap();
    temp_file.flush().unwrap();

    let settings = load_settings(Some(temp_file.path().to_str().unwrap())).unwrap();
    assert_eq!(settings.full_changelog, "HISTORY.md");
    assert_eq!(settings.current_changelog, "CHANGELOG.current.md");
    assert_eq!(settings.generator.program.as_deref(), Some("./gen.sh"));
    assert!(settings.generator.args.is_empty());
}

#[test]
fn test_load_fixture() {
    let settings = load_settings(Some("tests/fixtures/changebot.toml"))
        .expect("Failed to load test settings");
    assert_eq!(settings.current_changelog, "docs/CHANGELOG.current.md");
    assert_eq!(settings.full_changelog, "docs/CHANGELOG.md");
    assert_eq!(settings.workspace, PathBuf::from("checkout"));
    assert_eq!(settings.api_url, "https://ghe.example.com/api/v3");
    assert_eq!(
        settings.generator.args,
        vec!["build_files/make-changelog.js".to_string()]
    );
}

#[test]
fn test_invalid_settings_file() {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(b"full_changelog = [").unwrap();
    temp_file.flush().unwrap();

    let err = load_settings(Some(temp_file.path().to_str().unwrap())).unwrap_err();
    assert!(err.to_string().starts_with("Configuration error"));
}

#[test]
fn test_missing_settings_file_is_io_error() {
    let err = load_settings(Some("tests/fixtures/does-not-exist.toml")).unwrap_err();
    assert!(err.to_string().contains("I/O error"));
}

#[test]
#[serial]
fn test_from_env_reads_ci_variables() {
    set_ci_env();
    let config = Config::from_env(Settings::default());
    clear_ci_env();

    let config = config.unwrap();
    assert_eq!(config.access_token, "token");
    assert_eq!(config.commit_sha, "0123456789abcdef0123456789abcdef01234567");
    assert_eq!(config.owner, "octo");
    assert_eq!(config.repo, "widgets");
    assert_eq!(config.branch, "main");
}

#[test]
#[serial]
fn test_from_env_missing_variable_is_fatal() {
    set_ci_env();
    std::env::remove_var("CIRCLE_SHA1");
    let result = Config::from_env(Settings::default());
    clear_ci_env();

    let err = result.unwrap_err();
    assert_eq!(err.to_string(), "Configuration error: CIRCLE_SHA1 is not set");
}
