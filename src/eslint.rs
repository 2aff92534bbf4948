//! Parsing of eslint's JSON report (`--format json`).

use std::fmt;

use serde::Deserialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => f.write_str("warning"),
            Severity::Error => f.write_str("error"),
        }
    }
}

/// A lint message left over after eslint (and its autofix, when enabled) ran.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    pub file: String,
    pub line: u32,
    pub column: u32,
    pub rule: Option<String>,
    pub message: String,
    pub severity: Severity,
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{} {} {}", self.file, self.line, self.column, self.severity, self.message)?;
        if let Some(rule) = &self.rule {
            write!(f, " ({rule})")?;
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct FileReport {
    file_path: String,
    #[serde(default)]
    messages: Vec<Message>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Message {
    rule_id: Option<String>,
    severity: u8,
    message: String,
    #[serde(default)]
    line: u32,
    #[serde(default)]
    column: u32,
}

/// Parses eslint's JSON output into a flat list of violations, in report order.
///
/// # Errors
/// * `serde_json::Error` if `report` is not an eslint JSON report
pub fn parse_report(report: &str) -> Result<Vec<Violation>, serde_json::Error> {
    let files: Vec<FileReport> = serde_json::from_str(report.trim())?;

    Ok(files
        .into_iter()
        .flat_map(|file| {
            let path = file.file_path;
            file.messages.into_iter().map(move |message| Violation {
                file: path.clone(),
                line: message.line,
                column: message.column,
                rule: message.rule_id,
                message: message.message,
                severity: if message.severity >= 2 { Severity::Error } else { Severity::Warning },
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_report() {
        let report = r#"[
            {"filePath": "/p/src/a.ts", "messages": [
                {"ruleId": "semi", "severity": 2, "message": "Missing semicolon.", "line": 3, "column": 14},
                {"ruleId": null, "fatal": true, "severity": 2, "message": "Parsing error: Unexpected token", "line": 9, "column": 1}
            ], "errorCount": 2, "warningCount": 0},
            {"filePath": "/p/src/b.ts", "messages": [
                {"ruleId": "no-console", "severity": 1, "message": "Unexpected console statement.", "line": 1, "column": 1}
            ]},
            {"filePath": "/p/src/c.ts", "messages": []}
        ]"#;

        let violations = parse_report(report).unwrap();
        assert_eq!(violations.len(), 3);
        assert_eq!(violations[0].to_string(), "/p/src/a.ts:3:14 error Missing semicolon. (semi)");
        assert_eq!(violations[1].rule, None);
        assert_eq!(violations[2].severity, Severity::Warning);
    }

    #[test]
    fn test_parse_report_rejects_garbage() {
        assert!(parse_report("Oops! Something went wrong!").is_err());
        assert!(parse_report("[]").unwrap().is_empty());
    }
}
