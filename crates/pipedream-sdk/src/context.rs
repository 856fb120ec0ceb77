//! Per-invocation observation sink.
//!
//! Every side-effecting prop action (and every `emit`) appends one
//! [`Observation`] here. The host harvests the list after the step returns.

use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use pipedream_types::{Observation, ObservationKind};
use serde_json::Value;

/// Append-only, timestamped log of the actions taken by one step invocation.
///
/// Shared between props through `Arc<Context>`; create a fresh one per
/// invocation.
#[derive(Debug, Default)]
pub struct Context {
    log: Mutex<Log>,
}

#[derive(Debug, Default)]
struct Log {
    observations: Vec<Observation>,
    // Survives `take_observations` so timestamps stay monotonic across harvests.
    last_ts: Option<i64>,
}

impl Context {
    pub fn new() -> Self {
        Self::default()
    }

    /// Convenience for the common `Arc<Context>` handle props hold.
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::new())
    }

    /// Emit an unnamed event.
    pub fn emit(&self, event: Value) {
        self.emit_named(event, "");
    }

    /// Emit an event under `event_name`.
    pub fn emit_named(&self, event: Value, event_name: impl Into<String>) {
        self.add_observation(ObservationKind::Emit {
            event_name: event_name.into(),
            event,
        });
    }

    /// Stamp and append an observation.
    ///
    /// Timestamps never go backwards within one context, even if the wall
    /// clock does.
    pub fn add_observation(&self, kind: ObservationKind) {
        self.add_observation_at(kind, Utc::now().timestamp_millis());
    }

    fn add_observation_at(&self, kind: ObservationKind, now: i64) {
        let mut log = self.log.lock();
        let ts = log.last_ts.map_or(now, |last| now.max(last));
        log.last_ts = Some(ts);
        tracing::debug!(kind = kind.name(), ts, "observation recorded");
        log.observations.push(Observation::new(kind, ts));
    }

    /// Snapshot of everything recorded so far, in call order.
    pub fn observations(&self) -> Vec<Observation> {
        self.log.lock().observations.clone()
    }

    /// Drain the recorded observations for delivery to the host.
    pub fn take_observations(&self) -> Vec<Observation> {
        std::mem::take(&mut self.log.lock().observations)
    }

    pub fn len(&self) -> usize {
        self.log.lock().observations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.log.lock().observations.is_empty()
    }
}
