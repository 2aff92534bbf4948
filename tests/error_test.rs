use std::io;

use tanuki::eslint::{Severity, Violation};
use tanuki::tools::{Tool, ToolFailure};
use tanuki::Error;

#[test]
fn test_error_conversion() {
    let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
    let err: Error = io_err.into();

    match err {
        Error::IoError(_) => (),
        _ => panic!("Expected IoError variant"),
    }
}

#[test]
fn test_error_display() {
    let err = Error::InvalidBuildModeError("bundle".to_string());
    assert_eq!(err.to_string(), "Invalid build mode 'bundle', expected one of: app, library, lib.");

    let err = Error::BuildFailureError(ToolFailure {
        tool: Tool::Tsc,
        code: Some(2),
        output: "src/index.ts(3,7): error TS2322".to_string(),
    });
    assert_eq!(
        err.to_string(),
        "Build failed: `tsc` exited with status 2\nsrc/index.ts(3,7): error TS2322"
    );
}

#[test]
fn test_lint_failure_lists_violations() {
    let err = Error::LintFailureError {
        violations: vec![Violation {
            file: "src/a.ts".to_string(),
            line: 4,
            column: 2,
            rule: Some("no-var".to_string()),
            message: "Unexpected var.".to_string(),
            severity: Severity::Error,
        }],
        output: String::new(),
    };
    assert_eq!(
        err.to_string(),
        "Lint failed: 1 unresolved violation(s)\n  src/a.ts:4:2 error Unexpected var. (no-var)"
    );
}
