//! Configurable-prop descriptions.
//!
//! A step declares its inputs as props; the host asks each one to describe
//! itself so the UI can render a form and validate configuration. The
//! description is a small object whose `type` tells the host which runtime
//! data it must inject later.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The kind of a prop, as the host names it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropType {
    /// Plain string input.
    #[serde(rename = "string")]
    String,
    /// Key/value store service.
    #[serde(rename = "$.service.db")]
    Db,
    /// HTTP interface; the step can respond to the triggering request.
    #[serde(rename = "$.interface.http")]
    Http,
    /// Timer interface; the host's scheduler triggers the step.
    #[serde(rename = "$.interface.timer")]
    Timer,
}

impl PropType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PropType::String => "string",
            PropType::Db => "$.service.db",
            PropType::Http => "$.interface.http",
            PropType::Timer => "$.interface.timer",
        }
    }
}

impl std::fmt::Display for PropType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A prop's self-description, sent to the host for rendering and validation.
///
/// Schedule fields are only kept for timer props, so a description read
/// back from JSON never carries fields its `type` does not allow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawConfigurableProp")]
pub struct ConfigurableProp {
    pub name: String,

    #[serde(rename = "type")]
    pub prop_type: PropType,

    /// Fixed choices for a string prop.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<Value>>,

    /// Set when choices must be fetched from the component at config time.
    #[serde(
        rename = "remoteOptions",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub remote_options: Option<bool>,

    /// Schedule fields, present only on timer props.
    #[serde(flatten)]
    pub schedule: Option<TimerSchedule>,
}

#[derive(Deserialize)]
struct RawConfigurableProp {
    name: String,
    #[serde(rename = "type")]
    prop_type: PropType,
    #[serde(default)]
    options: Option<Vec<Value>>,
    #[serde(rename = "remoteOptions", default)]
    remote_options: Option<bool>,
    #[serde(flatten)]
    schedule: Option<TimerSchedule>,
}

impl From<RawConfigurableProp> for ConfigurableProp {
    fn from(raw: RawConfigurableProp) -> Self {
        let schedule = match raw.prop_type {
            PropType::Timer => raw.schedule,
            _ => None,
        };
        Self {
            name: raw.name,
            prop_type: raw.prop_type,
            options: raw.options,
            remote_options: raw.remote_options,
            schedule,
        }
    }
}

impl ConfigurableProp {
    /// A bare `{name, type}` description.
    pub fn new(name: impl Into<String>, prop_type: PropType) -> Self {
        Self {
            name: name.into(),
            prop_type,
            options: None,
            remote_options: None,
            schedule: None,
        }
    }

    pub fn with_options(mut self, options: Vec<Value>) -> Self {
        self.options = Some(options);
        self
    }

    pub fn with_remote_options(mut self) -> Self {
        self.remote_options = Some(true);
        self
    }

    pub fn with_schedule(mut self, schedule: TimerSchedule) -> Self {
        self.schedule = Some(schedule);
        self
    }
}

/// Timer schedule fields. Both keys are always written; the unused one is `null`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerSchedule {
    pub cron: Option<String>,
    #[serde(rename = "intervalSeconds")]
    pub interval_seconds: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bare_prop() {
        let prop = ConfigurableProp::new("store", PropType::Db);
        assert_eq!(
            serde_json::to_value(&prop).unwrap(),
            json!({"name": "store", "type": "$.service.db"})
        );
    }

    #[test]
    fn test_string_options() {
        let prop = ConfigurableProp::new("color", PropType::String)
            .with_options(vec![json!("red"), json!("blue")]);
        assert_eq!(
            serde_json::to_value(&prop).unwrap(),
            json!({"name": "color", "type": "string", "options": ["red", "blue"]})
        );
    }

    #[test]
    fn test_remote_options() {
        let prop = ConfigurableProp::new("repo", PropType::String).with_remote_options();
        assert_eq!(
            serde_json::to_value(&prop).unwrap(),
            json!({"name": "repo", "type": "string", "remoteOptions": true})
        );
    }

    #[test]
    fn test_timer_writes_both_schedule_keys() {
        let prop = ConfigurableProp::new("timer", PropType::Timer).with_schedule(TimerSchedule {
            cron: None,
            interval_seconds: Some(900),
        });
        assert_eq!(
            serde_json::to_value(&prop).unwrap(),
            json!({
                "name": "timer",
                "type": "$.interface.timer",
                "cron": null,
                "intervalSeconds": 900
            })
        );
    }

    #[test]
    fn test_roundtrip_keeps_shape_per_type() {
        let props = [
            ConfigurableProp::new("label", PropType::String).with_options(vec![json!("a")]),
            ConfigurableProp::new("repo", PropType::String).with_remote_options(),
            ConfigurableProp::new("store", PropType::Db),
            ConfigurableProp::new("http", PropType::Http),
            ConfigurableProp::new("timer", PropType::Timer).with_schedule(TimerSchedule {
                cron: Some("0 * * * *".into()),
                interval_seconds: None,
            }),
        ];
        for prop in props {
            let wire = serde_json::to_value(&prop).unwrap();
            let back: ConfigurableProp = serde_json::from_value(wire.clone()).unwrap();
            assert_eq!(back, prop);
            assert_eq!(serde_json::to_value(&back).unwrap(), wire);
        }
    }

    #[test]
    fn test_schedule_fields_dropped_for_non_timer() {
        let back: ConfigurableProp = serde_json::from_value(json!({
            "name": "store",
            "type": "$.service.db",
            "cron": null,
            "intervalSeconds": null
        }))
        .unwrap();
        assert!(back.schedule.is_none());
        assert_eq!(
            serde_json::to_value(&back).unwrap(),
            json!({"name": "store", "type": "$.service.db"})
        );
    }

    #[test]
    fn test_prop_type_display_matches_wire() {
        for ty in [PropType::String, PropType::Db, PropType::Http, PropType::Timer] {
            assert_eq!(
                serde_json::to_value(ty).unwrap(),
                Value::String(ty.to_string())
            );
        }
    }
}
