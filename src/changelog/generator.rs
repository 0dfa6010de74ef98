use crate::config::GeneratorSettings;
use crate::error::{ChangebotError, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Captured result of one generator run.
///
/// A non-zero exit is still a successful *run*; callers decide what a
/// failing code means.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorOutput {
    /// Exit code, or -1 when the process was killed by a signal
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl GeneratorOutput {
    pub fn success(&self) -> bool {
        self.code == 0
    }
}

/// Produces changelog text for a release
pub trait ChangelogGenerator {
    /// Run the generator with the release arguments (`--tag_version ...`)
    fn generate(&self, args: &[String]) -> Result<GeneratorOutput>;
}

impl<F> ChangelogGenerator for F
where
    F: Fn(&[String]) -> Result<GeneratorOutput>,
{
    fn generate(&self, args: &[String]) -> Result<GeneratorOutput> {
        self(args)
    }
}

/// Runs an external program and captures its output
#[derive(Debug, Clone)]
pub struct CommandGenerator {
    program: PathBuf,
    base_args: Vec<String>,
    current_dir: Option<PathBuf>,
}

impl CommandGenerator {
    pub fn new(program: impl Into<PathBuf>, base_args: Vec<String>) -> Self {
        CommandGenerator {
            program: program.into(),
            base_args,
            current_dir: None,
        }
    }

    /// Builds the generator described by the settings file.
    ///
    /// Without an explicit program, the running executable's own
    /// `changelog` subcommand is used.
    pub fn from_settings(settings: &GeneratorSettings) -> Result<Self> {
        match &settings.program {
            Some(program) => Ok(Self::new(program, settings.args.clone())),
            None => {
                let exe = std::env::current_exe()?;
                let mut args = vec!["changelog".to_string()];
                args.extend(settings.args.iter().cloned());
                Ok(Self::new(exe, args))
            }
        }
    }

    /// Run the program from `dir` instead of the current directory
    pub fn current_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.current_dir = Some(dir.as_ref().to_path_buf());
        self
    }
}

impl ChangelogGenerator for CommandGenerator {
    fn generate(&self, args: &[String]) -> Result<GeneratorOutput> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.base_args).args(args);
        if let Some(dir) = &self.current_dir {
            cmd.current_dir(dir);
        }

        let output = cmd.output().map_err(|e| {
            ChangebotError::config(format!(
                "cannot run changelog generator {}: {}",
                self.program.display(),
                e
            ))
        })?;

        Ok(GeneratorOutput {
            code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_program_is_config_error() {
        let generator = CommandGenerator::new("/nonexistent/path/to/generator", vec![]);
        let err = generator.generate(&[]).unwrap_err();
        assert!(err
            .to_string()
            .contains("cannot run changelog generator /nonexistent/path/to/generator"));
    }

    #[cfg(unix)]
    #[test]
    fn test_captures_stdout_and_arguments() {
        let generator = CommandGenerator::new(
            "sh",
            vec!["-c".to_string(), "echo \"$1 $2\"".to_string(), "sh".to_string()],
        );
        let output = generator
            .generate(&["--tag_version".to_string(), "v1.0.0".to_string()])
            .unwrap();
        assert!(output.success());
        assert_eq!(output.stdout, "--tag_version v1.0.0\n");
    }

    #[cfg(unix)]
    #[test]
    fn test_non_zero_exit_is_a_value() {
        let generator = CommandGenerator::new(
            "sh",
            vec!["-c".to_string(), "echo boom >&2; exit 3".to_string()],
        );
        let output = generator.generate(&[]).unwrap();
        assert!(!output.success());
        assert_eq!(output.code, 3);
        assert_eq!(output.stderr.trim(), "boom");
    }

    #[test]
    fn test_default_generator_uses_changelog_subcommand() {
        let generator = CommandGenerator::from_settings(&GeneratorSettings::default()).unwrap();
        assert_eq!(generator.base_args, vec!["changelog".to_string()]);
    }

    #[test]
    fn test_configured_generator() {
        let settings = GeneratorSettings {
            program: Some("node".to_string()),
            args: vec!["build_files/make-changelog.js".to_string()],
        };
        let generator = CommandGenerator::from_settings(&settings).unwrap();
        assert_eq!(generator.program, PathBuf::from("node"));
        assert_eq!(generator.base_args, settings.args);
    }
}
