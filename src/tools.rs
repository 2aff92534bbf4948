//! External tool invocation.
//! Every call to esbuild, tsc, eslint or typedoc goes through a [`ToolRunner`],
//! so the facade can be driven by a fake runner in tests.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use log::debug;

/// The external tools tanuki delegates to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tool {
    Esbuild,
    Tsc,
    Eslint,
    Typedoc,
}

impl Tool {
    /// Executable name, as installed under `node_modules/.bin` or on `PATH`.
    pub fn program(&self) -> &'static str {
        match self {
            Tool::Esbuild => "esbuild",
            Tool::Tsc => "tsc",
            Tool::Eslint => "eslint",
            Tool::Typedoc => "typedoc",
        }
    }
}

impl fmt::Display for Tool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.program())
    }
}

/// A single tool call: which tool, with which arguments, from which directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub tool: Tool,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

impl Invocation {
    pub fn new<P: Into<PathBuf>>(tool: Tool, cwd: P) -> Self {
        Self { tool, args: Vec::new(), cwd: cwd.into() }
    }

    pub fn arg<S: Into<String>>(mut self, arg: S) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Returns the value following `flag`, e.g. the path after `--json`.
    pub fn flag_value(&self, flag: &str) -> Option<&str> {
        self.args
            .iter()
            .position(|arg| arg == flag)
            .and_then(|i| self.args.get(i + 1))
            .map(String::as_str)
    }

    pub fn has_flag(&self, flag: &str) -> bool {
        self.args.iter().any(|arg| arg == flag)
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tool)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// Captured result of a finished tool process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Exit code, `None` when the process was killed by a signal.
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Stdout followed by stderr, trimmed.
    pub fn combined(&self) -> String {
        let mut out = self.stdout.trim_end().to_string();
        let stderr = self.stderr.trim_end();
        if !stderr.is_empty() {
            if !out.is_empty() {
                out.push('\n');
            }
            out.push_str(stderr);
        }
        out
    }
}

/// A tool that did not complete successfully, with its diagnostics preserved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolFailure {
    pub tool: Tool,
    pub code: Option<i32>,
    pub output: String,
}

impl ToolFailure {
    pub fn from_output(tool: Tool, output: &ToolOutput) -> Self {
        Self { tool, code: output.code, output: output.combined() }
    }

    pub fn from_io(tool: Tool, err: &io::Error) -> Self {
        Self { tool, code: None, output: format!("failed to start `{tool}`: {err}") }
    }
}

impl fmt::Display for ToolFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.code {
            Some(code) => write!(f, "`{}` exited with status {code}", self.tool)?,
            None => write!(f, "`{}` did not complete", self.tool)?,
        }
        if !self.output.is_empty() {
            write!(f, "\n{}", self.output)?;
        }
        Ok(())
    }
}

impl std::error::Error for ToolFailure {}

/// Trait for running external tools.
pub trait ToolRunner {
    /// Runs the invocation to completion and returns its captured output.
    ///
    /// # Errors
    /// * `io::Error` if the process could not be started
    fn run(&self, invocation: &Invocation) -> io::Result<ToolOutput>;
}

/// Runs tools as child processes, preferring the project's local installation.
#[derive(Debug, Default)]
pub struct ProcessRunner {
    project_root: Option<PathBuf>,
}

impl ProcessRunner {
    /// A relative `project_root` is taken against the current directory, since the
    /// child process runs from the invocation's own cwd.
    pub fn new<P: Into<PathBuf>>(project_root: P) -> Self {
        let project_root = project_root.into();
        let project_root = if project_root.is_relative() {
            std::env::current_dir().map(|cwd| cwd.join(&project_root)).unwrap_or(project_root)
        } else {
            project_root
        };
        Self { project_root: Some(project_root) }
    }

    /// Resolves `<root>/node_modules/.bin/<tool>` if it exists, the bare name otherwise.
    pub fn resolve_program(&self, tool: Tool) -> PathBuf {
        if let Some(root) = &self.project_root {
            let local = local_bin(root, tool);
            if local.exists() {
                return local;
            }
        }
        PathBuf::from(tool.program())
    }
}

fn local_bin(root: &Path, tool: Tool) -> PathBuf {
    let bin = root.join("node_modules").join(".bin");
    if cfg!(windows) {
        bin.join(format!("{}.cmd", tool.program()))
    } else {
        bin.join(tool.program())
    }
}

impl ToolRunner for ProcessRunner {
    fn run(&self, invocation: &Invocation) -> io::Result<ToolOutput> {
        let program = self.resolve_program(invocation.tool);
        debug!("Running '{}' in '{}'.", invocation, invocation.cwd.display());

        let output = Command::new(&program)
            .args(&invocation.args)
            .current_dir(&invocation.cwd)
            .stdin(Stdio::null())
            .output()?;

        let output = ToolOutput {
            code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };
        debug!("'{}' finished with status {:?}.", invocation.tool, output.code);
        Ok(output)
    }
}
