//! HTTP interface.
//!
//! `respond` performs no I/O: it records the response as an `http.respond`
//! observation and the host delivers it to the waiting client.

use std::collections::BTreeMap;
use std::sync::Arc;

use pipedream_types::{ObservationKind, PropType};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::context::Context;
use crate::error::{Result, SdkError};
use crate::prop::{ENDPOINT_KEY, Prop, RuntimeData};

/// A response for the host to send back to the triggering request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HttpResponse {
    pub status: u16,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub body: Value,
}

impl HttpResponse {
    pub fn new(status: u16) -> Self {
        Self {
            status,
            headers: BTreeMap::new(),
            body: Value::Null,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn body(mut self, body: impl Into<Value>) -> Self {
        self.body = body.into();
        self
    }
}

/// HTTP interface prop.
#[derive(Debug, Default)]
pub struct Http {
    endpoint: Option<String>,
    context: Option<Arc<Context>>,
}

impl Http {
    pub fn new() -> Self {
        Self::default()
    }

    /// Public URL of the step's HTTP endpoint, once bound.
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    /// Ask the host to deliver `config` as the HTTP response.
    pub fn respond<T: Serialize + ?Sized>(&self, config: &T) -> Result<()> {
        let context = self.context.as_ref().ok_or(SdkError::NotBound {
            prop_type: PropType::Http,
        })?;
        let config = serde_json::to_value(config)?;
        context.add_observation(ObservationKind::HttpRespond { config });
        Ok(())
    }
}

impl Prop for Http {
    fn prop_type(&self) -> PropType {
        PropType::Http
    }

    fn set_runtime_data(
        &mut self,
        property_name: &str,
        context: Arc<Context>,
        data: &RuntimeData,
    ) -> Result<()> {
        let endpoint = data
            .endpoint()
            .ok_or_else(|| SdkError::MissingRuntimeData {
                property: property_name.to_string(),
                field: ENDPOINT_KEY.to_string(),
            })?;
        tracing::debug!(property = property_name, endpoint, "http prop bound");
        self.endpoint = Some(endpoint.to_string());
        self.context = Some(context);
        Ok(())
    }
}
