//! Pure formatting functions for console output.
//!
//! Structured diagnostics go through `tracing`; these are the few lines a
//! person reading the CI job log is meant to see.

use console::style;

use crate::cli::WorkflowResult;

/// Format and print an error message in red.
pub fn display_error(message: &str) {
    eprintln!("{} {}", style("ERROR:").red(), message);
}

/// Format and print a success message with green checkmark.
pub fn display_success(message: &str) {
    println!("{} {}", style("✓").green(), message);
}

/// Format and print a status message with yellow arrow.
pub fn display_status(message: &str) {
    println!("{} {}", style("→").yellow(), message);
}

/// One-line summary of a published release.
pub fn release_summary(result: &WorkflowResult) -> String {
    format!(
        "Released {} ({} -> {}) at {}",
        result.release_name,
        result.plan.old_version,
        result.plan.new_version,
        short_sha(&result.changelog_commit)
    )
}

/// Display the outcome of a successful release.
pub fn display_release(result: &WorkflowResult) {
    display_success(&release_summary(result));
    if !result.release_url.is_empty() {
        println!("  {}", style(&result.release_url).cyan());
    }
}

fn short_sha(sha: &str) -> &str {
    sha.get(..7).unwrap_or(sha)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ReleasePlan;

    #[test]
    fn test_release_summary() {
        let result = WorkflowResult {
            plan: ReleasePlan {
                old_version: "v1.2.3".to_string(),
                new_version: "v2.2.3".to_string(),
                codename: None,
            },
            release_name: "v2.2.3".to_string(),
            changelog_commit: "c0ffee0123456789".to_string(),
            release_url: String::new(),
        };
        assert_eq!(
            release_summary(&result),
            "Released v2.2.3 (v1.2.3 -> v2.2.3) at c0ffee0"
        );
    }

    #[test]
    fn test_short_sha_of_short_input() {
        assert_eq!(short_sha("abc"), "abc");
    }

    #[test]
    fn test_display_status() {
        // Visual verification test - output is printed to stdout
        display_status("test status");
    }
}
