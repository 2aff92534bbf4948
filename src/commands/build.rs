use clap::{Args, ValueEnum};

use crate::config::{BuildMode, BuildOptions};
use crate::error::Result;
use crate::tanuki::Tanuki;
use crate::tools::ToolRunner;

#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildArgs {
    /// If the artifact should include a .mjs file.
    #[arg(short = 'e', long = "esmodules", visible_alias = "esm")]
    pub esmodules: bool,

    /// If the built artifacts should be minified.
    #[arg(short, long)]
    pub minify: bool,

    /// If the build should emit typedoc information (library mode only).
    #[arg(short, long)]
    pub docs: bool,

    /// Build mode. Falls back to the configured mode, then to `app`.
    #[arg(long, value_enum)]
    pub mode: Option<ModeArg>,
}

/// Accepted values of `--mode`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeArg {
    App,
    Library,
    Lib,
}

impl ModeArg {
    pub fn as_str(&self) -> &'static str {
        match self {
            ModeArg::App => "app",
            ModeArg::Library => "library",
            ModeArg::Lib => "lib",
        }
    }
}

impl From<ModeArg> for BuildMode {
    fn from(arg: ModeArg) -> Self {
        BuildMode::resolve(Some(arg.as_str()))
    }
}

impl BuildArgs {
    /// Normalizes the flags into build overrides.
    ///
    /// A flag that was passed sets its option to `true`; one that was not leaves the
    /// configured value in charge.
    pub fn to_options(&self) -> BuildOptions {
        BuildOptions {
            esm: self.esmodules.then_some(true),
            minify: self.minify.then_some(true),
            provide_docs: self.docs.then_some(true),
            mode: self.mode.map(BuildMode::from),
            ..Default::default()
        }
    }
}

pub fn handle<R: ToolRunner>(args: &BuildArgs, tanuki: &Tanuki<R>) -> Result<()> {
    let build = tanuki.build(&args.to_options())?;
    println!("Build of '{}' completed in {} mode.", tanuki.config().name, build.mode);
    Ok(())
}
