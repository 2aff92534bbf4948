#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::io;

use tanuki::tools::{Invocation, Tool, ToolOutput, ToolRunner};

/// Records every invocation instead of spawning processes.
///
/// Tools answer with scripted outputs in order, or succeed when nothing is scripted.
/// Typedoc runs write a small document to their `--json` path.
#[derive(Default)]
pub struct RecordingRunner {
    calls: RefCell<Vec<Invocation>>,
    outputs: RefCell<HashMap<Tool, VecDeque<io::Result<ToolOutput>>>>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, tool: Tool, output: ToolOutput) -> Self {
        self.outputs.borrow_mut().entry(tool).or_default().push_back(Ok(output));
        self
    }

    pub fn fail_to_start(self, tool: Tool) -> Self {
        let err = io::Error::new(io::ErrorKind::NotFound, "No such file or directory");
        self.outputs.borrow_mut().entry(tool).or_default().push_back(Err(err));
        self
    }

    pub fn calls(&self) -> Vec<Invocation> {
        self.calls.borrow().clone()
    }

    pub fn tools(&self) -> Vec<Tool> {
        self.calls.borrow().iter().map(|call| call.tool).collect()
    }
}

impl ToolRunner for RecordingRunner {
    fn run(&self, invocation: &Invocation) -> io::Result<ToolOutput> {
        self.calls.borrow_mut().push(invocation.clone());

        if let Some(scripted) = self
            .outputs
            .borrow_mut()
            .get_mut(&invocation.tool)
            .and_then(VecDeque::pop_front)
        {
            return scripted;
        }

        match invocation.tool {
            Tool::Typedoc => {
                if let Some(json) = invocation.flag_value("--json") {
                    let name = invocation
                        .cwd
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    std::fs::write(invocation.cwd.join(json), format!(r#"{{"name":"{name}"}}"#))?;
                }
                Ok(exited(0, ""))
            }
            Tool::Eslint => Ok(exited(0, "[]")),
            _ => Ok(exited(0, "")),
        }
    }
}

pub fn exited(code: i32, stdout: &str) -> ToolOutput {
    ToolOutput { code: Some(code), stdout: stdout.to_string(), stderr: String::new() }
}

pub fn eslint_report(file: &str, messages: &[(&str, u8, &str)]) -> String {
    let messages: Vec<serde_json::Value> = messages
        .iter()
        .map(|(rule, severity, message)| {
            serde_json::json!({
                "ruleId": rule,
                "severity": severity,
                "message": message,
                "line": 1,
                "column": 1,
            })
        })
        .collect();
    serde_json::json!([{ "filePath": file, "messages": messages }]).to_string()
}
