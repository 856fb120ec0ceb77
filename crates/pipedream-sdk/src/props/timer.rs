//! Timer interface. Purely a schedule description; the host's scheduler
//! triggers the step.

use std::sync::Arc;

use pipedream_types::{ConfigurableProp, PropType, TimerSchedule};

use crate::context::Context;
use crate::error::{Result, SdkError};
use crate::prop::{Prop, RuntimeData};

/// When the step runs. Exactly one form per timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Schedule {
    Cron(String),
    IntervalSeconds(u64),
}

/// Timer interface prop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Timer {
    schedule: Schedule,
}

impl Timer {
    /// Run on a cron expression (5 or 6 fields).
    pub fn cron(expression: impl Into<String>) -> Result<Self> {
        let expression = expression.into();
        let fields = expression.split_whitespace().count();
        if fields == 0 {
            return Err(SdkError::InvalidTimer("cron expression is empty".into()));
        }
        if !(5..=6).contains(&fields) {
            return Err(SdkError::InvalidTimer(format!(
                "cron expression '{expression}' has {fields} fields, expected 5 or 6"
            )));
        }
        Ok(Self {
            schedule: Schedule::Cron(expression.trim().to_string()),
        })
    }

    /// Run every `seconds` seconds.
    pub fn interval_seconds(seconds: u64) -> Result<Self> {
        if seconds == 0 {
            return Err(SdkError::InvalidTimer(
                "interval must be at least one second".into(),
            ));
        }
        Ok(Self {
            schedule: Schedule::IntervalSeconds(seconds),
        })
    }

    /// Build from optional parts; exactly one must be given.
    pub fn from_parts(cron: Option<String>, interval_seconds: Option<u64>) -> Result<Self> {
        match (cron, interval_seconds) {
            (Some(cron), None) => Self::cron(cron),
            (None, Some(seconds)) => Self::interval_seconds(seconds),
            (Some(_), Some(_)) => Err(SdkError::InvalidTimer(
                "set either cron or interval_seconds, not both".into(),
            )),
            (None, None) => Err(SdkError::InvalidTimer(
                "one of cron or interval_seconds is required".into(),
            )),
        }
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    fn wire_schedule(&self) -> TimerSchedule {
        match &self.schedule {
            Schedule::Cron(expr) => TimerSchedule {
                cron: Some(expr.clone()),
                interval_seconds: None,
            },
            Schedule::IntervalSeconds(secs) => TimerSchedule {
                cron: None,
                interval_seconds: Some(*secs),
            },
        }
    }
}

impl Prop for Timer {
    fn prop_type(&self) -> PropType {
        PropType::Timer
    }

    // Nothing to bind: timers carry no local capability.
    fn set_runtime_data(
        &mut self,
        _property_name: &str,
        _context: Arc<Context>,
        _data: &RuntimeData,
    ) -> Result<()> {
        Ok(())
    }

    fn to_configurable_prop(&self, name: &str) -> ConfigurableProp {
        ConfigurableProp::new(name, self.prop_type()).with_schedule(self.wire_schedule())
    }
}
