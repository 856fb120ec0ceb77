//! Upstream step outputs.
//!
//! The host passes the outputs of earlier steps as one JSON document, either
//! inline in `PIPEDREAM_STEPS` or in a file it names. [`StepsReader`] parses
//! it on first access and hands out the same [`Steps`] afterwards.

use std::path::Path;

use once_cell::sync::OnceCell;
use pipedream_config::StepsSource;
use serde_json::Value;

use crate::error::{Result, SdkError};

/// Immutable view of the steps payload.
#[derive(Debug, Clone, PartialEq)]
pub struct Steps {
    data: Value,
}

impl Steps {
    pub fn from_value(data: Value) -> Self {
        Self { data }
    }

    /// Parse a payload from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let data = serde_json::from_str(json).map_err(SdkError::ParseSteps)?;
        Ok(Self { data })
    }

    /// Read and parse a payload file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| SdkError::ReadSteps {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text)
    }

    /// An empty (`null`) payload.
    pub fn null() -> Self {
        Self { data: Value::Null }
    }

    pub fn is_null(&self) -> bool {
        self.data.is_null()
    }

    pub fn raw(&self) -> &Value {
        &self.data
    }

    /// Output of the step named `step`.
    pub fn get(&self, step: &str) -> Option<&Value> {
        self.data.get(step)
    }

    /// Nested value by dot-separated path (`"fetch.$return_value.items.0"`).
    ///
    /// Numeric segments index into arrays.
    pub fn path(&self, path: &str) -> Option<&Value> {
        let mut current = &self.data;
        for segment in path.split('.') {
            current = match current {
                Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
                other => other.get(segment)?,
            };
        }
        Some(current)
    }

    /// Deserialize the value at `path` into `T`.
    pub fn get_as<T: serde::de::DeserializeOwned>(&self, path: &str) -> Option<T> {
        serde_json::from_value(self.path(path)?.clone()).ok()
    }
}

impl PartialEq<Value> for Steps {
    fn eq(&self, other: &Value) -> bool {
        &self.data == other
    }
}

/// Lazily loads the steps payload once per process.
#[derive(Debug, Default)]
pub struct StepsReader {
    source: Option<StepsSource>,
    cache: OnceCell<Steps>,
}

impl StepsReader {
    pub fn new(source: Option<StepsSource>) -> Self {
        Self {
            source,
            cache: OnceCell::new(),
        }
    }

    pub fn source(&self) -> Option<&StepsSource> {
        self.source.as_ref()
    }

    /// The payload, loading it on first call. Without a source it is `null`.
    ///
    /// A failed load is not cached; the next call tries again.
    pub fn get(&self) -> Result<&Steps> {
        self.cache.get_or_try_init(|| {
            let steps = match &self.source {
                None => Steps::null(),
                Some(StepsSource::Inline(json)) => Steps::from_json(json)?,
                Some(StepsSource::File(path)) => Steps::from_file(path)?,
            };
            tracing::debug!(
                source = ?self.source.as_ref().map(StepsSource::describe),
                "steps payload loaded"
            );
            Ok(steps)
        })
    }

    pub fn is_loaded(&self) -> bool {
        self.cache.get().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;

    #[test]
    fn test_inline_payload() {
        let reader = StepsReader::new(Some(StepsSource::Inline(r#"{"foo": true}"#.into())));
        assert!(!reader.is_loaded());
        assert_eq!(reader.get().unwrap(), &Steps::from_value(json!({"foo": true})));
        assert!(reader.is_loaded());
    }

    #[test]
    fn test_file_payload_read_once() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"foo": true}}"#).unwrap();
        let path = file.path().to_path_buf();

        let reader = StepsReader::new(Some(StepsSource::File(path)));
        let first = reader.get().unwrap().clone();
        assert!(first == json!({"foo": true}));

        drop(file);
        let second = reader.get().unwrap();
        assert_eq!(&first, second);
    }

    #[test]
    fn test_missing_source_is_null() {
        let reader = StepsReader::default();
        assert!(reader.get().unwrap().is_null());
    }

    #[test]
    fn test_malformed_inline_errors() {
        let reader = StepsReader::new(Some(StepsSource::Inline("{nope".into())));
        assert!(matches!(reader.get(), Err(SdkError::ParseSteps(_))));
        assert!(!reader.is_loaded());
    }

    #[test]
    fn test_missing_file_errors() {
        let reader = StepsReader::new(Some(StepsSource::File(
            "/definitely/not/here/steps.json".into(),
        )));
        let err = reader.get().unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here/steps.json"));
    }

    #[test]
    fn test_path_access() {
        let steps = Steps::from_value(json!({
            "trigger": {"event": {"body": {"items": [{"id": 1}, {"id": 2}]}}},
            "fetch": {"$return_value": "ok"}
        }));
        assert_eq!(steps.get("fetch"), Some(&json!({"$return_value": "ok"})));
        assert_eq!(steps.path("fetch.$return_value"), Some(&json!("ok")));
        assert_eq!(steps.path("trigger.event.body.items.1.id"), Some(&json!(2)));
        assert!(steps.path("trigger.event.body.items.9").is_none());
        assert!(steps.path("trigger.event.body.items.x").is_none());
        assert!(steps.path("nope").is_none());
    }

    #[test]
    fn test_get_as() {
        #[derive(serde::Deserialize, Debug, PartialEq)]
        struct Item {
            id: u32,
        }
        let steps = Steps::from_value(json!({"a": {"items": [{"id": 7}]}}));
        assert_eq!(steps.get_as::<Item>("a.items.0"), Some(Item { id: 7 }));
        assert_eq!(steps.get_as::<Item>("a.items"), None);
    }
}
