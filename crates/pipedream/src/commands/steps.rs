//! Steps command - print upstream step outputs.

use anyhow::{Context as _, Result, bail};
use clap::Args;

use super::Context;

/// Arguments for the steps command.
#[derive(Args, Debug)]
pub struct StepsArgs {
    /// Dot-separated path into the payload (e.g. `trigger.event.body`)
    pub path: Option<String>,

    /// Pretty-print the JSON
    #[arg(long)]
    pub pretty: bool,
}

/// Run the steps command.
pub fn run(args: StepsArgs, ctx: &Context) -> Result<()> {
    let steps = ctx
        .runtime
        .steps()
        .context("failed to load steps payload")?;

    let value = match &args.path {
        Some(path) => match steps.path(path) {
            Some(value) => value,
            None => bail!("path '{path}' not found in steps payload"),
        },
        None => steps.raw(),
    };

    let out = if args.pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    if ctx.verbose {
        tracing::debug!(path = ?args.path, bytes = out.len(), "printing steps");
    }
    println!("{out}");
    Ok(())
}
