//! Export command - append a named value to the exports file.

use anyhow::{Context as _, Result};
use clap::Args;
use serde_json::Value;

use super::Context;

/// Arguments for the export command.
#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Export name
    pub name: String,

    /// Value to export, parsed as JSON unless --string is given
    pub value: String,

    /// Export the value as a plain string
    #[arg(long)]
    pub string: bool,
}

/// Run the export command.
pub fn run(args: ExportArgs, ctx: &Context) -> Result<()> {
    let value = if args.string {
        Value::String(args.value)
    } else {
        serde_json::from_str(&args.value)
            .with_context(|| format!("value for '{}' is not valid JSON (use --string)", args.name))?
    };

    ctx.runtime
        .export(&args.name, &value)
        .with_context(|| format!("failed to export '{}'", args.name))?;

    if ctx.verbose {
        eprintln!("exported {}", args.name);
    }
    Ok(())
}
