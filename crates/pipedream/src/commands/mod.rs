//! CLI command handlers.

pub mod export;
pub mod steps;

/// Shared context for all commands.
#[derive(Debug)]
pub struct Context {
    /// Step runtime resolved from the environment.
    pub runtime: pipedream_sdk::StepRuntime,
    /// Verbose output enabled.
    pub verbose: bool,
}
