//! Environment-driven configuration for Pipedream step processes.
//!
//! The host launches each step with a handful of environment variables:
//!
//! - `PIPEDREAM_STEPS` - upstream step outputs, either inline JSON or the
//!   path of a JSON file
//! - `PIPEDREAM_EXPORTS` - file that named exports are appended to
//! - `PIPEDREAM_LOG` - log filter for the step's stderr logging
//!
//! [`ScriptEnv`] resolves them once per process so the rest of the step can
//! receive configuration explicitly instead of reading globals.

pub mod error;
pub mod env;

pub use env::{
    DEFAULT_LOG_FILTER, EXPORTS_ENV, LOG_ENV, STEPS_ENV, ScriptEnv, StepsSource,
};
pub use error::{ConfigError, Result};
