//! Error serialization for the host's error-reporting pipeline.
//!
//! A failed step is reported as a [`SerializedException`]: the error's short
//! type name, its message, the stack frames that were captured (oldest
//! first), a UTC timestamp, the optional cell id, and the output of a failed
//! subprocess when the error carries one.

use std::backtrace::{Backtrace, BacktraceStatus};
use std::error::Error as StdError;
use std::process::{Command, ExitStatus, Output};

use pipedream_types::SerializedException;

use crate::error::{Result, SdkError};

/// A subprocess that could not be run or exited unsuccessfully.
#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("failed to run '{command}': {source}")]
    Spawn {
        command: String,
        source: std::io::Error,
    },

    #[error("command '{command}' exited with {status}")]
    Failed {
        command: String,
        status: ExitStatus,
        /// Captured stdout followed by captured stderr.
        output: Vec<u8>,
    },
}

impl CommandError {
    /// Combined output of a failed run.
    pub fn output(&self) -> Option<&[u8]> {
        match self {
            CommandError::Failed { output, .. } => Some(output),
            CommandError::Spawn { .. } => None,
        }
    }
}

/// Run `command` to completion, capturing its output.
///
/// A non-zero exit becomes [`CommandError::Failed`] carrying stdout and then
/// stderr, so a serialized report of the failure includes both.
pub fn run_command(command: &mut Command) -> std::result::Result<Output, CommandError> {
    let display = format!("{command:?}");
    let out = command.output().map_err(|source| CommandError::Spawn {
        command: display.clone(),
        source,
    })?;
    if out.status.success() {
        Ok(out)
    } else {
        let mut output = out.stdout;
        output.extend_from_slice(&out.stderr);
        Err(CommandError::Failed {
            command: display,
            status: out.status,
            output,
        })
    }
}

/// Serialize a typed error. `code` is the short name of `E`.
///
/// Typed errors carry no backtrace of their own, so the stack is captured
/// here and reports the caller of this function; the serializer's own frames
/// are dropped.
pub fn serialize_exception<E>(error: &E, cell_id: Option<&str>) -> Result<SerializedException>
where
    E: StdError + 'static,
{
    let backtrace = Backtrace::capture();
    let mut exc = build(
        short_type_name(std::any::type_name::<E>()),
        error,
        &backtrace,
        cell_id,
    )?;
    exc.stack = trim_serializer_frames(exc.stack);
    Ok(exc)
}

/// Serialize an `anyhow::Error`, using the backtrace it captured when created.
pub fn serialize_anyhow(error: &anyhow::Error, cell_id: Option<&str>) -> Result<SerializedException> {
    let source: &(dyn StdError + 'static) = error.as_ref();
    build(anyhow_code(error), source, error.backtrace(), cell_id)
}

fn build(
    code: &str,
    error: &(dyn StdError + 'static),
    backtrace: &Backtrace,
    cell_id: Option<&str>,
) -> Result<SerializedException> {
    let stack = match backtrace.status() {
        BacktraceStatus::Captured => parse_backtrace(&backtrace.to_string()),
        _ => Vec::new(),
    };
    let mut exc = SerializedException::new(code, error.to_string())
        .with_stack(stack)
        .with_cell_id(cell_id);

    if let Some(output) = captured_output(error) {
        exc = exc.with_output(String::from_utf8(output.to_vec())?);
    }
    tracing::debug!(code, frames = exc.stack.len(), "exception serialized");
    Ok(exc)
}

fn captured_output<'a>(error: &'a (dyn StdError + 'static)) -> Option<&'a [u8]> {
    std::iter::successors(Some(error), |&e| e.source())
        .find_map(|e| e.downcast_ref::<CommandError>())
        .and_then(CommandError::output)
}

fn anyhow_code(error: &anyhow::Error) -> &'static str {
    if error.is::<CommandError>() {
        "CommandError"
    } else if error.is::<SdkError>() {
        "SdkError"
    } else if error.is::<pipedream_config::ConfigError>() {
        "ConfigError"
    } else if error.is::<serde_json::Error>() {
        "JsonError"
    } else if error.is::<std::io::Error>() {
        "IoError"
    } else {
        "Error"
    }
}

/// `my_crate::module::MyError<T>` becomes `MyError`.
fn short_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

/// Split a rendered backtrace into frames, oldest first.
///
/// Each frame is its `N: symbol` line plus any `at file:line` lines that
/// follow, joined with newlines.
pub fn parse_backtrace(rendered: &str) -> Vec<String> {
    let mut frames: Vec<String> = Vec::new();
    for line in rendered.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match frame_header(trimmed) {
            Some(symbol) => frames.push(symbol.to_string()),
            None => {
                if let Some(last) = frames.last_mut() {
                    last.push_str("\n    ");
                    last.push_str(trimmed);
                }
            }
        }
    }
    frames.reverse();
    frames
}

/// Frame symbols belonging to backtrace capture and this module.
const SERIALIZER_FRAME_PREFIXES: [&str; 2] = ["std::backtrace", "pipedream_sdk::exception::"];

/// Drop the newest frames while they belong to capture or serialization.
fn trim_serializer_frames(mut frames: Vec<String>) -> Vec<String> {
    while frames.last().is_some_and(|frame| {
        SERIALIZER_FRAME_PREFIXES
            .iter()
            .any(|prefix| frame.starts_with(prefix))
    }) {
        frames.pop();
    }
    frames
}

fn frame_header(line: &str) -> Option<&str> {
    let (index, rest) = line.split_once(':')?;
    if index.is_empty() || !index.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    Some(rest.trim())
}
