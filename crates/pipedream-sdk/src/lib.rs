//! Pipedream step SDK: typed props, observations and script helpers.
//!
//! A step declares its inputs as props on a [`Component`], the host binds
//! live data to them at invocation time, and every side-effecting prop action
//! is recorded on the invocation's [`Context`] for the host to harvest.
//! [`StepRuntime`] carries the process-wide pieces: the upstream steps
//! payload and the exports file.
//!
//! # Usage
//!
//! Steps implement a `run` function and use the [`entry`] macro to wire up
//! the environment, logging and error reporting:
//!
//! ```rust,no_run
//! use pipedream_sdk::prelude::*;
//!
//! fn run(rt: &StepRuntime) -> anyhow::Result<Value> {
//!     let greeting = rt.steps()?.path("trigger.event.name").cloned();
//!     rt.export("greeting", &greeting)?;
//!     Ok(json!({ "greeted": greeting }))
//! }
//!
//! pipedream_sdk::entry!(run);
//! ```

use std::io::Write;

pub mod component;
pub mod context;
pub mod error;
pub mod exception;
pub mod export;
pub mod json;
pub mod logging;
pub mod prop;
pub mod props;
pub mod runtime;
pub mod steps;
pub mod store;

/// Re-exports for `use pipedream_sdk::prelude::*`.
pub mod prelude {
    pub use crate::component::Component;
    pub use crate::context::Context;
    pub use crate::error::{Result, SdkError};
    pub use crate::prop::{Prop, RuntimeData};
    pub use crate::props::{Db, Http, HttpResponse, StringProp, Timer};
    pub use crate::runtime::StepRuntime;
    pub use crate::steps::Steps;
    pub use crate::store::{KvStore, MemoryStore};
    pub use serde_json::{Value, json};
}

pub use component::Component;
pub use context::Context;
pub use error::{Result, SdkError};
pub use exception::{CommandError, run_command, serialize_anyhow, serialize_exception};
pub use export::{Exporter, format_export_line};
pub use json::to_export_json;
pub use logging::init_logging;
pub use prop::{AsAny, Prop, RuntimeData};
pub use props::{Db, Http, HttpResponse, Schedule, StringOptions, StringProp, Timer};
pub use runtime::{StepReport, StepRuntime};
pub use steps::{Steps, StepsReader};
pub use store::{KvStore, MemoryStore};

pub use pipedream_config::{ScriptEnv, StepsSource};
pub use pipedream_types::{
    ConfigurableProp, Observation, ObservationKind, PropType, SerializedException, TimerSchedule,
};

/// Entry-point macro that generates a `main()` function.
///
/// Builds the [`StepRuntime`] from the environment, calls the provided
/// function, and writes a [`StepReport`] as JSON to stdout. Failures are
/// written as a [`SerializedException`] with a non-zero exit code.
///
/// # Example
///
/// ```rust,no_run
/// use pipedream_sdk::prelude::*;
///
/// fn run(_rt: &StepRuntime) -> anyhow::Result<Value> {
///     Ok(json!({ "status": "ok" }))
/// }
///
/// pipedream_sdk::entry!(run);
/// ```
#[macro_export]
macro_rules! entry {
    ($func:ident) => {
        fn main() {
            let result = $crate::run_harness($func);
            if let Err(code) = result {
                std::process::exit(code);
            }
        }
    };
}

/// Internal harness called by the `entry!` macro. Not intended for direct use.
///
/// Returns `Ok(())` on success, `Err(exit_code)` on failure.
pub fn run_harness(
    f: fn(&StepRuntime) -> anyhow::Result<serde_json::Value>,
) -> std::result::Result<(), i32> {
    let mut stdout = std::io::stdout();
    let env = match ScriptEnv::from_env() {
        Ok(env) => env,
        Err(e) => {
            init_logging(pipedream_config::DEFAULT_LOG_FILTER);
            report_failure(&mut stdout, &anyhow::Error::new(e));
            return Err(1);
        }
    };
    init_logging(env.log_filter());
    run_step(&mut stdout, env, f)
}

/// Run `f` against a runtime built from `env`, writing the outcome to `out`.
///
/// Success writes a [`StepReport`]; failure writes a [`SerializedException`]
/// and returns exit code 1.
pub fn run_step<W: Write>(
    out: &mut W,
    env: ScriptEnv,
    f: fn(&StepRuntime) -> anyhow::Result<serde_json::Value>,
) -> std::result::Result<(), i32> {
    let runtime = StepRuntime::new(env);
    match f(&runtime) {
        Ok(value) => {
            let report = runtime.finish(value);
            match serde_json::to_string(&report) {
                Ok(json) => emit(out, &json),
                Err(e) => {
                    report_failure(out, &anyhow::Error::new(e));
                    Err(1)
                }
            }
        }
        Err(e) => {
            tracing::warn!(error = %e, "step failed");
            report_failure(out, &e);
            Err(1)
        }
    }
}

fn report_failure<W: Write>(out: &mut W, error: &anyhow::Error) {
    let serialized = serialize_anyhow(error, None)
        .map_err(anyhow::Error::new)
        .and_then(|exc| serde_json::to_string(&exc).map_err(anyhow::Error::new));
    let json = match serialized {
        Ok(json) => json,
        Err(e) => {
            tracing::error!(error = %e, "failed to serialize step error");
            serde_json::json!({"code": "Error", "message": error.to_string()}).to_string()
        }
    };
    // The exit code already reports the failure.
    let _ = emit(out, &json);
}

fn emit<W: Write>(out: &mut W, json: &str) -> std::result::Result<(), i32> {
    out.write_all(json.as_bytes())
        .and_then(|()| out.flush())
        .map_err(|e| {
            tracing::error!(error = %e, "failed to write step result");
            1
        })
}
