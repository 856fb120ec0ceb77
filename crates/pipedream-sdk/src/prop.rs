//! The prop capability contract and the host's runtime-data bundle.
//!
//! A prop is anything that can (1) describe itself to the host as a
//! [`ConfigurableProp`] and (2) accept the live data the host injects at
//! invocation time. The description's `type` and the data the prop reads
//! from the bundle must agree: both come from [`Prop::prop_type`].

use std::any::Any;
use std::sync::Arc;

use pipedream_types::{ConfigurableProp, PropType};
use serde_json::{Map, Value};

use crate::context::Context;
use crate::error::{Result, SdkError};
use crate::store::{KvStore, MemoryStore};

/// Bundle key carrying the key/value store.
pub const DB_KEY: &str = "$db";

/// Bundle key carrying the HTTP endpoint.
pub const ENDPOINT_KEY: &str = "endpoint";

/// Bundle key carrying a resolved scalar value.
pub const VALUE_KEY: &str = "value";

/// Upcasting helper so registered props can be downcast to their concrete type.
pub trait AsAny: Any {
    fn as_any(&self) -> &dyn Any;
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A typed, host-configurable step input.
pub trait Prop: AsAny + Send + Sync {
    /// The kind this prop reports and behaves as.
    fn prop_type(&self) -> PropType;

    /// Receive live data from the host.
    ///
    /// `property_name` is the name the prop is registered under; `context`
    /// is the invocation's observation sink.
    fn set_runtime_data(
        &mut self,
        property_name: &str,
        context: Arc<Context>,
        data: &RuntimeData,
    ) -> Result<()>;

    /// Describe this prop for host-side rendering and validation.
    fn to_configurable_prop(&self, name: &str) -> ConfigurableProp {
        ConfigurableProp::new(name, self.prop_type())
    }
}

/// Live values the host injects into one prop.
#[derive(Debug, Clone, Default)]
pub struct RuntimeData {
    db: Option<Arc<dyn KvStore>>,
    endpoint: Option<String>,
    value: Option<Value>,
    extra: Map<String, Value>,
}

impl RuntimeData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse the host's JSON bundle.
    ///
    /// `$db` must be an object (it seeds a [`MemoryStore`]), `endpoint` a
    /// string; `value` is taken as-is; other keys are kept in `extra`.
    pub fn from_json(value: Value) -> Result<Self> {
        let Value::Object(mut map) = value else {
            return Err(SdkError::InvalidRuntimeData(format!(
                "expected an object, got {}",
                json_kind(&value)
            )));
        };

        let mut data = Self::new();
        if let Some(db) = map.shift_remove(DB_KEY) {
            let Value::Object(seed) = db else {
                return Err(SdkError::InvalidRuntimeData(format!(
                    "'{DB_KEY}' must be an object, got {}",
                    json_kind(&db)
                )));
            };
            data.db = Some(Arc::new(MemoryStore::from_map(seed)));
        }
        if let Some(endpoint) = map.shift_remove(ENDPOINT_KEY) {
            let Value::String(endpoint) = endpoint else {
                return Err(SdkError::InvalidRuntimeData(format!(
                    "'{ENDPOINT_KEY}' must be a string, got {}",
                    json_kind(&endpoint)
                )));
            };
            data.endpoint = Some(endpoint);
        }
        data.value = map.shift_remove(VALUE_KEY);
        data.extra = map;
        Ok(data)
    }

    pub fn with_db(mut self, db: Arc<dyn KvStore>) -> Self {
        self.db = Some(db);
        self
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn with_value(mut self, value: Value) -> Self {
        self.value = Some(value);
        self
    }

    pub fn db(&self) -> Option<&Arc<dyn KvStore>> {
        self.db.as_ref()
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn extra(&self) -> &Map<String, Value> {
        &self.extra
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
