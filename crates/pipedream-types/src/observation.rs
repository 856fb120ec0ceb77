//! Observations recorded during a single step invocation.
//!
//! Each observation serializes as a flat object keyed the way the host
//! expects:
//!
//! ```json
//! {"k": "db.get", "pn": "store", "key": "counter", "ret": 3, "ts": 1700000000000}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A timestamped record of a side-effecting action.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    /// What happened, with its kind-specific fields.
    #[serde(flatten)]
    pub kind: ObservationKind,
    /// Milliseconds since the Unix epoch.
    pub ts: i64,
}

impl Observation {
    pub fn new(kind: ObservationKind, ts: i64) -> Self {
        Self { kind, ts }
    }

    /// The wire name of this observation's kind (`"emit"`, `"db.get"`, ...).
    pub fn kind_name(&self) -> &'static str {
        self.kind.name()
    }
}

/// The action an [`Observation`] records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "k")]
pub enum ObservationKind {
    /// A user event emitted from the step.
    #[serde(rename = "emit")]
    Emit {
        #[serde(rename = "en")]
        event_name: String,
        #[serde(rename = "e")]
        event: Value,
    },

    /// A read through a `$.service.db` prop.
    #[serde(rename = "db.get")]
    DbGet {
        #[serde(rename = "pn")]
        property_name: String,
        key: String,
        #[serde(rename = "ret")]
        return_value: Value,
    },

    /// A write through a `$.service.db` prop.
    #[serde(rename = "db.set")]
    DbSet {
        #[serde(rename = "pn")]
        property_name: String,
        key: String,
        val: Value,
    },

    /// A response the host should deliver through an `$.interface.http` prop.
    #[serde(rename = "http.respond")]
    HttpRespond { config: Value },
}

impl ObservationKind {
    pub fn name(&self) -> &'static str {
        match self {
            ObservationKind::Emit { .. } => "emit",
            ObservationKind::DbGet { .. } => "db.get",
            ObservationKind::DbSet { .. } => "db.set",
            ObservationKind::HttpRespond { .. } => "http.respond",
        }
    }
}
