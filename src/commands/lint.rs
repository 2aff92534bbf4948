use clap::Args;

use crate::error::Result;
use crate::tanuki::Tanuki;
use crate::tools::ToolRunner;

#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct LintArgs {
    /// Files to lint; the whole project when omitted.
    #[arg(value_name = "FILES")]
    pub files: Vec<String>,
}

pub fn handle<R: ToolRunner>(args: &LintArgs, tanuki: &Tanuki<R>) -> Result<()> {
    tanuki.lint(args.files.as_slice())?;
    println!("Lint passed.");
    Ok(())
}
