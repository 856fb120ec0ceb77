//! Per-process step runtime.
//!
//! Built once when the step process starts and passed by reference to the
//! code that needs the steps payload, exports or the observation context.

use std::collections::HashMap;
use std::sync::Arc;

use pipedream_config::ScriptEnv;
use pipedream_types::Observation;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::component::Component;
use crate::context::Context;
use crate::error::Result;
use crate::export::Exporter;
use crate::prop::RuntimeData;
use crate::steps::{Steps, StepsReader};

/// Everything a running step reads from or reports to the host.
#[derive(Debug)]
pub struct StepRuntime {
    env: ScriptEnv,
    steps: StepsReader,
    context: Arc<Context>,
}

impl StepRuntime {
    pub fn new(env: ScriptEnv) -> Self {
        let steps = StepsReader::new(env.steps.clone());
        Self {
            env,
            steps,
            context: Context::shared(),
        }
    }

    /// Build from the process environment.
    pub fn from_env() -> Result<Self> {
        Ok(Self::new(ScriptEnv::from_env()?))
    }

    pub fn env(&self) -> &ScriptEnv {
        &self.env
    }

    /// Upstream step outputs, parsed on first call.
    pub fn steps(&self) -> Result<&Steps> {
        self.steps.get()
    }

    /// Exporter for the host's exports file.
    pub fn exporter(&self) -> Result<Exporter> {
        Ok(Exporter::new(self.env.require_exports_path()?))
    }

    /// Export `value` under `name`.
    pub fn export<T: Serialize + ?Sized>(&self, name: &str, value: &T) -> Result<()> {
        self.exporter()?.export(name, value)
    }

    /// The invocation's observation sink.
    pub fn context(&self) -> &Arc<Context> {
        &self.context
    }

    /// Bind `component`'s props to this invocation.
    pub fn bind(
        &self,
        component: &mut Component,
        bundles: &HashMap<String, RuntimeData>,
    ) -> Result<()> {
        component.bind(&self.context, bundles)
    }

    /// Drain observations into a report for the host.
    pub fn finish(&self, return_value: Value) -> StepReport {
        StepReport {
            return_value,
            observations: self.context.take_observations(),
        }
    }
}

/// What a successful step hands back to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StepReport {
    pub return_value: Value,
    pub observations: Vec<Observation>,
}
