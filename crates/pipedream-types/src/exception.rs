//! Serialized exception reported to the host's error pipeline.

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// An error flattened into the shape the host reports.
///
/// `cellId` is always written (as `null` when unknown); `output` only
/// appears when the failing error captured process output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedException {
    /// Short name of the error type.
    pub code: String,
    /// Display text of the error.
    pub message: String,
    /// Stack frames, oldest first.
    pub stack: Vec<String>,
    /// ISO-8601 UTC timestamp of serialization.
    pub ts: String,
    #[serde(rename = "cellId")]
    pub cell_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
}

impl SerializedException {
    /// Build a record stamped with the current UTC time.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            stack: Vec::new(),
            ts: now_iso8601(),
            cell_id: None,
            output: None,
        }
    }

    pub fn with_stack(mut self, stack: Vec<String>) -> Self {
        self.stack = stack;
        self
    }

    pub fn with_cell_id(mut self, cell_id: Option<impl Into<String>>) -> Self {
        self.cell_id = cell_id.map(Into::into);
        self
    }

    pub fn with_output(mut self, output: String) -> Self {
        self.output = Some(output);
        self
    }
}

/// Current UTC time as `YYYY-MM-DDTHH:MM:SS.ffffff+00:00`.
pub fn now_iso8601() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, false)
}
