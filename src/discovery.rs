//! Typed view of a discovery document.
//!
//! Mappings are kept as [`IndexMap`]s so resources, methods and parameters
//! come back out in the order the document lists them.

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{GenerateError, GenerateResult};

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Descriptor {
    pub name: String,
    pub version: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub documentation_link: String,
    pub protocol: String,
    pub base_url: String,
    #[serde(default)]
    pub resources: IndexMap<String, Resource>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Resource {
    /// Key of this resource in its parent's `resources` mapping.
    #[serde(skip)]
    pub name: String,
    #[serde(default)]
    pub resources: IndexMap<String, Resource>,
    #[serde(default)]
    pub methods: IndexMap<String, Method>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Method {
    #[serde(skip)]
    pub name: String,
    pub id: String,
    #[serde(default)]
    pub description: String,
    pub http_method: String,
    pub path: String,
    #[serde(default)]
    pub parameter_order: Vec<String>,
    #[serde(default)]
    pub parameters: IndexMap<String, Parameter>,
    #[serde(default)]
    pub request: Option<Value>,
    #[serde(default)]
    pub scopes: Vec<String>,
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct Parameter {
    #[serde(skip)]
    pub name: String,
    /// Absent on some enum-only parameters, where `variants` decides the type.
    #[serde(default, rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub repeated: bool,
    #[serde(default, rename = "enum")]
    pub variants: Vec<String>,
    #[serde(default)]
    pub description: String,
}

impl Descriptor {
    /// Decodes a raw discovery document.
    ///
    /// A document without a usable `title` is almost always an error payload
    /// returned in place of the descriptor, so it is rejected before the
    /// typed decode is attempted.
    pub fn from_json(raw: &str) -> GenerateResult<Self> {
        let value: Value = serde_json::from_str(raw)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> GenerateResult<Self> {
        let has_title = value
            .get("title")
            .and_then(Value::as_str)
            .is_some_and(|title| !title.is_empty());
        if !has_title {
            return Err(GenerateError::InvalidDescriptor);
        }

        let mut descriptor: Descriptor = serde_json::from_value(value)?;
        assign_resource_names(&mut descriptor.resources);
        Ok(descriptor)
    }

    /// URL the API's own discovery document is served from.
    pub fn discovery_url(&self) -> String {
        format!(
            "{}$discovery/{}?version={}",
            self.base_url, self.protocol, self.version
        )
    }
}

impl Method {
    /// Whether the method accepts a request payload.
    pub fn has_request_body(&self) -> bool {
        match &self.request {
            None | Some(Value::Null) => false,
            Some(Value::Object(map)) => !map.is_empty(),
            Some(_) => true,
        }
    }
}

fn assign_resource_names(resources: &mut IndexMap<String, Resource>) {
    for (name, resource) in resources.iter_mut() {
        resource.name = name.clone();
        for (method_name, method) in resource.methods.iter_mut() {
            method.name = method_name.clone();
            for (param_name, param) in method.parameters.iter_mut() {
                param.name = param_name.clone();
            }
        }
        assign_resource_names(&mut resource.resources);
    }
}
