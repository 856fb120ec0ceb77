//! Error types for step-side operations.

use std::path::PathBuf;

use pipedream_types::PropType;
use thiserror::Error;

/// Result type for SDK operations.
pub type Result<T> = std::result::Result<T, SdkError>;

/// Errors surfaced to step code. Nothing here is retried or papered over.
#[derive(Debug, Error)]
pub enum SdkError {
    /// Step environment could not be resolved.
    #[error(transparent)]
    Config(#[from] pipedream_config::ConfigError),

    /// The steps payload file could not be read.
    #[error("failed to read steps payload '{path}': {source}")]
    ReadSteps {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The steps payload is not valid JSON.
    #[error("failed to parse steps payload: {0}")]
    ParseSteps(#[source] serde_json::Error),

    /// An export line could not be appended.
    #[error("failed to write exports file '{path}': {source}")]
    WriteExports {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A value could not be encoded as JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A prop action was called before the host bound runtime data.
    #[error("unbound {prop_type} prop: no runtime data has been set")]
    NotBound { prop_type: PropType },

    /// The host bundle lacks a field this prop needs.
    #[error("runtime data for prop '{property}' is missing '{field}'")]
    MissingRuntimeData { property: String, field: String },

    /// The host bundle has the wrong shape.
    #[error("invalid runtime data: {0}")]
    InvalidRuntimeData(String),

    /// Timer schedule rejected.
    #[error("invalid timer schedule: {0}")]
    InvalidTimer(String),

    /// No prop is registered under this name.
    #[error("no prop named '{0}'")]
    UnknownProp(String),

    /// A registered prop is not of the requested kind.
    #[error("prop '{name}' is {actual}, not {expected}")]
    PropTypeMismatch {
        name: String,
        expected: PropType,
        actual: PropType,
    },

    /// The string prop has no remotely computed options.
    #[error("prop '{0}' has no remote options")]
    NoRemoteOptions(String),

    /// Captured process output is not UTF-8.
    #[error("captured output is not valid UTF-8: {0}")]
    OutputEncoding(#[from] std::string::FromUtf8Error),
}
