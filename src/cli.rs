//! Command-line interface implementation for tanuki.
//! Provides argument parsing with clap and the runner that dispatches subcommands.

use std::path::{Path, PathBuf};

use clap::{error::ErrorKind, CommandFactory, Parser};
use log::debug;

use crate::commands::{dispatch, Commands};
use crate::config::{find_config, load_config_file, Config};
use crate::error::{default_error_handler, Result};
use crate::logger::init_logger;
use crate::tanuki::Tanuki;
use crate::tools::ToolRunner;

/// Command-line arguments structure for tanuki.
#[derive(Parser, Debug)]
#[command(name = "tanuki", author, version, about = "tanuki: build, lint and document TypeScript projects", long_about = None)]
pub struct Cli {
    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a configuration file. Skips discovery of tanuki.json / package.json.
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Parses command line arguments and returns the Cli structure.
///
/// # Exits
/// * With clap's usage status code (2) and the help text if no subcommand was given
/// * With clap's default error handling for other argument errors
pub fn get_args() -> Cli {
    match Cli::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::MissingSubcommand
            | ErrorKind::MissingRequiredArgument
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                let _ = Cli::command()
                    .help_template(
                        r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#,
                    )
                    .print_help();
                std::process::exit(e.exit_code());
            }
            _ => e.exit(),
        },
    }
}

/// Loads `path` when given, otherwise discovers the configuration from the current
/// directory upwards.
pub fn resolve_config(path: Option<&Path>) -> Result<Config> {
    match path {
        Some(path) => load_config_file(path),
        None => find_config(),
    }
}

/// Dispatches the parsed command against `tanuki`.
pub fn run_with<R: ToolRunner>(cli: &Cli, tanuki: &Tanuki<R>) -> Result<()> {
    debug!("Running '{}' for '{}'.", cli.command.name(), tanuki.config().name);
    dispatch(&cli.command, tanuki)
}

/// Resolves the configuration and runs the parsed command with the real tools.
pub fn run(cli: &Cli) -> Result<()> {
    let config = resolve_config(cli.config.as_deref())?;
    let tanuki = Tanuki::new(config);
    run_with(cli, &tanuki)
}

/// Runs the `tanuki` command-line utility.
///
/// Exits with status 1 and a message on stderr when the command fails.
pub fn run_cli() {
    let cli = get_args();
    init_logger(cli.verbose);

    if let Err(err) = run(&cli) {
        default_error_handler(err);
    }
}
