//! Plain string input.

use std::fmt;
use std::sync::Arc;

use pipedream_types::{ConfigurableProp, PropType};
use serde_json::Value;

use crate::component::Component;
use crate::context::Context;
use crate::error::Result;
use crate::prop::{Prop, RuntimeData};

/// Computes a string prop's choices from the component at config time.
pub type OptionsFn = Arc<dyn Fn(&Component) -> Vec<Value> + Send + Sync>;

/// Where a string prop's choices come from.
#[derive(Clone)]
pub enum StringOptions {
    /// Fixed list, rendered straight into the description.
    Static(Vec<Value>),
    /// Computed on demand; the host asks for them through the component.
    Remote(OptionsFn),
}

impl fmt::Debug for StringOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StringOptions::Static(options) => f.debug_tuple("Static").field(options).finish(),
            StringOptions::Remote(_) => f.write_str("Remote(..)"),
        }
    }
}

/// A string input, optionally constrained to a set of choices.
///
/// The host resolves the configured value itself; when it passes it in the
/// bundle's `value` field it is available through [`StringProp::value`].
#[derive(Debug, Clone, Default)]
pub struct StringProp {
    options: Option<StringOptions>,
    value: Option<Value>,
}

impl StringProp {
    pub fn new() -> Self {
        Self::default()
    }

    /// Constrain to a fixed list of choices.
    pub fn with_options<I, V>(options: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            options: Some(StringOptions::Static(
                options.into_iter().map(Into::into).collect(),
            )),
            value: None,
        }
    }

    /// Constrain to choices computed from the component.
    pub fn with_remote_options<F>(options: F) -> Self
    where
        F: Fn(&Component) -> Vec<Value> + Send + Sync + 'static,
    {
        Self {
            options: Some(StringOptions::Remote(Arc::new(options))),
            value: None,
        }
    }

    pub fn options_source(&self) -> Option<&StringOptions> {
        self.options.as_ref()
    }

    pub fn has_remote_options(&self) -> bool {
        matches!(self.options, Some(StringOptions::Remote(_)))
    }

    /// Evaluate the choices against `component`.
    pub fn options(&self, component: &Component) -> Option<Vec<Value>> {
        match self.options.as_ref()? {
            StringOptions::Static(options) => Some(options.clone()),
            StringOptions::Remote(f) => Some(f(component)),
        }
    }

    /// Host-resolved value, if one was bound.
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    pub fn as_str(&self) -> Option<&str> {
        self.value.as_ref()?.as_str()
    }
}

impl Prop for StringProp {
    fn prop_type(&self) -> PropType {
        PropType::String
    }

    fn set_runtime_data(
        &mut self,
        _property_name: &str,
        _context: Arc<Context>,
        data: &RuntimeData,
    ) -> Result<()> {
        if let Some(value) = data.value() {
            self.value = Some(value.clone());
        }
        Ok(())
    }

    fn to_configurable_prop(&self, name: &str) -> ConfigurableProp {
        let prop = ConfigurableProp::new(name, self.prop_type());
        match &self.options {
            Some(StringOptions::Remote(_)) => prop.with_remote_options(),
            Some(StringOptions::Static(options)) => prop.with_options(options.clone()),
            None => prop,
        }
    }
}
