use clap::Args;

use crate::constants::DOCS_OUTPUT;
use crate::error::Result;
use crate::tanuki::Tanuki;
use crate::tools::ToolRunner;

#[derive(Args, Debug, Clone, Default, PartialEq, Eq)]
pub struct DocsArgs {}

pub fn handle<R: ToolRunner>(_args: &DocsArgs, tanuki: &Tanuki<R>) -> Result<()> {
    tanuki.docs()?;
    println!("Documentation written to '{}'.", tanuki.root().join(DOCS_OUTPUT).display());
    Ok(())
}
