//! Error handling for tanuki.
//! Defines the error type and result alias used throughout the crate.

use std::path::PathBuf;

use thiserror::Error;

use crate::eslint::Violation;
use crate::tools::ToolFailure;

/// Errors raised while resolving configuration or running external tools.
///
/// Tool failures keep the diagnostics the tool printed, so the message shown to the
/// user is the tool's own text.
#[derive(Error, Debug)]
pub enum Error {
    #[error("No configuration found in '{}' or any parent directory (tried: {tried}).", .searched_from.display())]
    ConfigNotFoundError { searched_from: PathBuf, tried: String },

    #[error("Invalid configuration in '{}': {reason}.", .path.display())]
    ConfigValidationError { path: PathBuf, reason: String },

    #[error("Invalid build mode '{0}', expected one of: app, library, lib.")]
    InvalidBuildModeError(String),

    #[error("Build failed: {0}")]
    BuildFailureError(#[source] ToolFailure),

    #[error("Lint failed: {}", describe_lint_failure(.violations, .output))]
    LintFailureError { violations: Vec<Violation>, output: String },

    #[error("Documentation generation failed: {0}")]
    DocsGenerationError(#[source] ToolFailure),

    /// Represents errors that occur during file system operations
    #[error("IO error: {0}.")]
    IoError(#[from] std::io::Error),
}

/// Convenience type alias for Results with [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

fn describe_lint_failure(violations: &[Violation], output: &str) -> String {
    if violations.is_empty() {
        return format!("eslint did not produce a report\n{}", output.trim_end());
    }
    let mut message = format!("{} unresolved violation(s)", violations.len());
    for violation in violations {
        message.push_str("\n  ");
        message.push_str(&violation.to_string());
    }
    message
}

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The error to report
///
/// # Behavior
/// Prints the error message to stderr and exits with status code 1
pub fn default_error_handler(err: Error) -> ! {
    eprintln!("error: {err}");
    std::process::exit(1);
}
