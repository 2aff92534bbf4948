//! Subcommands of the `tanuki` CLI, one module per verb.
//! Each module declares its flags and a handler that maps them onto a [`Tanuki`] call.

use clap::Subcommand;

use crate::error::Result;
use crate::tanuki::Tanuki;
use crate::tools::ToolRunner;

pub mod build;
pub mod docs;
pub mod lint;

pub use build::{BuildArgs, ModeArg};
pub use docs::DocsArgs;
pub use lint::LintArgs;

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Builds the project artifacts.
    Build(BuildArgs),

    /// Lints the project with eslint.
    Lint(LintArgs),

    /// Generates the typedoc JSON documentation.
    Docs(DocsArgs),
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Commands::Build(_) => "build",
            Commands::Lint(_) => "lint",
            Commands::Docs(_) => "docs",
        }
    }
}

/// Runs the handler of `command` against `tanuki`.
pub fn dispatch<R: ToolRunner>(command: &Commands, tanuki: &Tanuki<R>) -> Result<()> {
    match command {
        Commands::Build(args) => build::handle(args, tanuki),
        Commands::Lint(args) => lint::handle(args, tanuki),
        Commands::Docs(args) => docs::handle(args, tanuki),
    }
}
