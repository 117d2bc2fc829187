use std::collections::BTreeMap;

use crate::types::{Assertion, ParamMap, ParamValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParamType {
    #[default]
    String,
    Integer,
    Number,
    Boolean,
    Object,
    Array,
}

/// A parameter declared by a script.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ParamSpec {
    pub name: String,

    #[serde(default)]
    pub r#type: ParamType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<ParamValue>,

    #[serde(default)]
    pub required: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// HTTP request shape; every string may contain `${...}` placeholders.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RequestTemplate {
    #[serde(default = "default_method")]
    pub method: String,

    pub url: String,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub headers: BTreeMap<String, String>,

    #[serde(default, skip_serializing_if = "ParamMap::is_empty")]
    pub query: ParamMap,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<ParamValue>,
}

fn default_method() -> String {
    "GET".to_string()
}

/// The smallest executable unit: one API call plus assertions and extraction.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScriptDefinition {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub parameters: Vec<ParamSpec>,

    #[serde(default, skip_serializing_if = "ParamMap::is_empty")]
    pub variables: ParamMap,

    /// Names read back out of the script context after a successful run.
    #[serde(default, rename = "outputs", skip_serializing_if = "Vec::is_empty")]
    pub output_variables: Vec<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request: Option<RequestTemplate>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assertions: Vec<Assertion>,

    /// Variable name -> response expression.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extract: BTreeMap<String, String>,
}

impl ScriptDefinition {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            description: None,
            parameters: Vec::new(),
            variables: ParamMap::new(),
            output_variables: Vec::new(),
            request: None,
            assertions: Vec::new(),
            extract: BTreeMap::new(),
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}
