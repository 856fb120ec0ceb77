//! Step container holding declared props in declaration order.
//!
//! ```rust
//! use pipedream_sdk::prelude::*;
//!
//! let component = Component::new("counter")
//!     .with_prop("store", Db::new())
//!     .with_prop("label", StringProp::with_options(["a", "b"]));
//!
//! let names: Vec<&str> = component.prop_names().collect();
//! assert_eq!(names, ["store", "label"]);
//! ```

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use pipedream_types::ConfigurableProp;
use serde_json::Value;

use crate::context::Context;
use crate::error::{Result, SdkError};
use crate::prop::{Prop, RuntimeData};
use crate::props::StringProp;

/// A user-authored step and its registered props.
#[derive(Default)]
pub struct Component {
    name: String,
    props: IndexMap<String, Box<dyn Prop>>,
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("name", &self.name)
            .field("props", &self.props.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Component {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            props: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Register `prop` under `name`.
    ///
    /// Registering an existing name replaces the prop but keeps its position.
    pub fn register_prop<P: Prop>(&mut self, name: impl Into<String>, prop: P) -> &mut Self {
        let name = name.into();
        tracing::debug!(component = %self.name, prop = %name, "prop registered");
        self.props.insert(name, Box::new(prop));
        self
    }

    /// Builder form of [`Component::register_prop`].
    pub fn with_prop<P: Prop>(mut self, name: impl Into<String>, prop: P) -> Self {
        self.register_prop(name, prop);
        self
    }

    /// Registered props in declaration order.
    pub fn props(&self) -> impl Iterator<Item = (&str, &dyn Prop)> {
        self.props.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }

    pub fn prop_names(&self) -> impl Iterator<Item = &str> {
        self.props.keys().map(String::as_str)
    }

    pub fn prop(&self, name: &str) -> Option<&dyn Prop> {
        self.props.get(name).map(|p| p.as_ref())
    }

    pub fn len(&self) -> usize {
        self.props.len()
    }

    pub fn is_empty(&self) -> bool {
        self.props.is_empty()
    }

    /// The prop under `name`, if it is a `T`.
    pub fn get<T: Prop>(&self, name: &str) -> Option<&T> {
        let prop: &dyn Prop = self.props.get(name)?.as_ref();
        prop.as_any().downcast_ref::<T>()
    }

    pub fn get_mut<T: Prop>(&mut self, name: &str) -> Option<&mut T> {
        let prop: &mut dyn Prop = self.props.get_mut(name)?.as_mut();
        prop.as_any_mut().downcast_mut::<T>()
    }

    /// Descriptions of every prop, in declaration order.
    pub fn configurable_props(&self) -> Vec<ConfigurableProp> {
        self.props
            .iter()
            .map(|(name, prop)| prop.to_configurable_prop(name))
            .collect()
    }

    /// Hand each prop its runtime data. Props without a bundle get an empty one.
    pub fn bind(
        &mut self,
        context: &Arc<Context>,
        bundles: &HashMap<String, RuntimeData>,
    ) -> Result<()> {
        let empty = RuntimeData::new();
        for (name, prop) in self.props.iter_mut() {
            let data = bundles.get(name).unwrap_or(&empty);
            prop.set_runtime_data(name, Arc::clone(context), data)?;
        }
        tracing::debug!(component = %self.name, props = self.props.len(), "runtime data bound");
        Ok(())
    }

    /// Evaluate the remote options of the string prop `name` against this component.
    pub fn remote_options(&self, name: &str) -> Result<Vec<Value>> {
        let prop = self
            .prop(name)
            .ok_or_else(|| SdkError::UnknownProp(name.to_string()))?;
        let string_prop = prop.as_any().downcast_ref::<StringProp>().ok_or_else(|| {
            SdkError::PropTypeMismatch {
                name: name.to_string(),
                expected: pipedream_types::PropType::String,
                actual: prop.prop_type(),
            }
        })?;
        if !string_prop.has_remote_options() {
            return Err(SdkError::NoRemoteOptions(name.to_string()));
        }
        Ok(string_prop.options(self).unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::props::{Db, Http, Timer};
    use crate::store::{KvStore, MemoryStore};
    use serde_json::json;

    fn sample() -> Component {
        Component::new("sample")
            .with_prop("store", Db::new())
            .with_prop("http", Http::new())
            .with_prop("timer", Timer::interval_seconds(60).unwrap())
            .with_prop("color", StringProp::with_options(["red", "green"]))
    }

    #[test]
    fn test_registration_order() {
        let c = sample();
        assert_eq!(
            c.prop_names().collect::<Vec<_>>(),
            vec!["store", "http", "timer", "color"]
        );
        assert_eq!(c.len(), 4);
    }

    #[test]
    fn test_reregistration_keeps_position() {
        let mut c = sample();
        c.register_prop("store", StringProp::new());
        assert_eq!(c.prop_names().next(), Some("store"));
        assert!(c.get::<StringProp>("store").is_some());
        assert!(c.get::<Db>("store").is_none());
    }

    #[test]
    fn test_typed_lookup() {
        let c = sample();
        assert!(c.get::<Db>("store").is_some());
        assert!(c.get::<Http>("store").is_none());
        assert!(c.get::<Db>("nope").is_none());
    }

    #[test]
    fn test_configurable_props() {
        let props = sample().configurable_props();
        let v = serde_json::to_value(&props).unwrap();
        assert_eq!(v[0], json!({"name": "store", "type": "$.service.db"}));
        assert_eq!(v[1], json!({"name": "http", "type": "$.interface.http"}));
        assert_eq!(v[2]["type"], "$.interface.timer");
        assert_eq!(v[3]["options"], json!(["red", "green"]));
    }

    #[test]
    fn test_bind_and_use() {
        let mut c = sample();
        let ctx = Context::shared();
        let store = Arc::new(MemoryStore::new());
        let mut bundles = HashMap::new();
        bundles.insert(
            "store".to_string(),
            RuntimeData::new().with_db(store.clone()),
        );
        bundles.insert(
            "http".to_string(),
            RuntimeData::new().with_endpoint("https://e"),
        );

        c.bind(&ctx, &bundles).unwrap();

        c.get::<Db>("store").unwrap().set("k", json!(1)).unwrap();
        assert_eq!(store.get("k"), Some(json!(1)));
        assert_eq!(c.get::<Http>("http").unwrap().endpoint(), Some("https://e"));
        assert_eq!(ctx.len(), 1);
    }

    #[test]
    fn test_bind_fails_on_missing_db() {
        let mut c = sample();
        let err = c.bind(&Context::shared(), &HashMap::new()).unwrap_err();
        assert!(matches!(err, SdkError::MissingRuntimeData { ref property, .. } if property == "store"));
    }

    #[test]
    fn test_remote_options_see_component() {
        let c = Component::new("repos")
            .with_prop("store", Db::new())
            .with_prop(
                "repo",
                StringProp::with_remote_options(|c: &Component| {
                    c.prop_names().map(|n| json!(n)).collect()
                }),
            );
        assert_eq!(c.remote_options("repo").unwrap(), vec![json!("store"), json!("repo")]);
    }

    #[test]
    fn test_remote_options_errors() {
        let c = sample();
        assert!(matches!(c.remote_options("nope"), Err(SdkError::UnknownProp(_))));
        assert!(matches!(
            c.remote_options("store"),
            Err(SdkError::PropTypeMismatch { .. })
        ));
        assert!(matches!(
            c.remote_options("color"),
            Err(SdkError::NoRemoteOptions(_))
        ));
    }

    #[test]
    fn test_get_mut() {
        let mut c = sample();
        c.get_mut::<StringProp>("color")
            .unwrap()
            .set_runtime_data("color", Context::shared(), &RuntimeData::new().with_value(json!("red")))
            .unwrap();
        assert_eq!(c.get::<StringProp>("color").unwrap().as_str(), Some("red"));
    }
}
