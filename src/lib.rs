//! tanuki orchestrates the build, lint and documentation tools of a TypeScript project.
//! It resolves the project configuration, normalizes command-line flags and forwards
//! the work to esbuild, tsc, eslint and typedoc.

/// Command-line interface: argument parsing and the runner
pub mod cli;

/// One module per subcommand (`build`, `lint`, `docs`)
pub mod commands;

/// Configuration discovery and build option resolution
/// Supports tanuki.json, tanuki.yml, tanuki.yaml and `package.json#tanuki`
pub mod config;

pub mod constants;

/// Error types and handling for tanuki
pub mod error;

/// eslint JSON report parsing
pub mod eslint;

pub mod logger;

/// The entry point holding the configuration for a run
pub mod tanuki;

/// External tool invocation
pub mod tools;

/// Package discovery for typedoc workspace mode
pub mod workspace;

pub use cli::run_cli;
pub use config::{find_config, BuildMode, Config};
pub use error::{Error, Result};
pub use tanuki::Tanuki;

/// The version of tanuki.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
