//! Key/value store service.

use std::fmt;
use std::sync::Arc;

use pipedream_types::{ObservationKind, PropType};
use serde_json::Value;

use crate::context::Context;
use crate::error::{Result, SdkError};
use crate::prop::{DB_KEY, Prop, RuntimeData};
use crate::store::KvStore;

struct Binding {
    property_name: String,
    context: Arc<Context>,
    store: Arc<dyn KvStore>,
}

/// Key/value accessor over a host-supplied store. Every access is observed.
#[derive(Default)]
pub struct Db {
    binding: Option<Binding>,
}

impl fmt::Debug for Db {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Db")
            .field(
                "property_name",
                &self.binding.as_ref().map(|b| b.property_name.as_str()),
            )
            .finish()
    }
}

impl Db {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_bound(&self) -> bool {
        self.binding.is_some()
    }

    fn binding(&self) -> Result<&Binding> {
        self.binding.as_ref().ok_or(SdkError::NotBound {
            prop_type: PropType::Db,
        })
    }

    /// Read `key`; `None` on a miss.
    pub fn get(&self, key: &str) -> Result<Option<Value>> {
        let binding = self.binding()?;
        let value = binding.store.get(key);
        binding.context.add_observation(ObservationKind::DbGet {
            property_name: binding.property_name.clone(),
            key: key.to_string(),
            return_value: value.clone().unwrap_or(Value::Null),
        });
        Ok(value)
    }

    /// Write `val` under `key`. The write is recorded before the store sees it.
    pub fn set(&self, key: &str, val: Value) -> Result<()> {
        let binding = self.binding()?;
        binding.context.add_observation(ObservationKind::DbSet {
            property_name: binding.property_name.clone(),
            key: key.to_string(),
            val: val.clone(),
        });
        binding.store.set(key, val);
        Ok(())
    }
}

impl Prop for Db {
    fn prop_type(&self) -> PropType {
        PropType::Db
    }

    fn set_runtime_data(
        &mut self,
        property_name: &str,
        context: Arc<Context>,
        data: &RuntimeData,
    ) -> Result<()> {
        let store = data
            .db()
            .cloned()
            .ok_or_else(|| SdkError::MissingRuntimeData {
                property: property_name.to_string(),
                field: DB_KEY.to_string(),
            })?;
        tracing::debug!(property = property_name, "db prop bound");
        self.binding = Some(Binding {
            property_name: property_name.to_string(),
            context,
            store,
        });
        Ok(())
    }
}
