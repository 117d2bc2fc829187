use crate::types::{ParamMap, ParamValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionMode {
    #[default]
    Sequential,
    Concurrent,
    Conditional,
}

impl ExecutionMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionMode::Sequential => "sequential",
            ExecutionMode::Concurrent => "concurrent",
            ExecutionMode::Conditional => "conditional",
        }
    }
}

/// A script reference inside a component.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ComponentStep {
    #[serde(rename = "script")]
    pub script_id: String,

    #[serde(default)]
    pub order: i64,

    #[serde(default = "enabled_by_default")]
    pub enabled: bool,

    #[serde(default, skip_serializing_if = "ParamMap::is_empty")]
    pub parameters: ParamMap,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub condition: Option<ParamValue>,

    #[serde(default)]
    pub skip_on_condition_false: bool,
}

impl ComponentStep {
    pub fn new(script_id: impl Into<String>, order: i64) -> Self {
        Self {
            script_id: script_id.into(),
            order,
            enabled: true,
            parameters: ParamMap::new(),
            condition: None,
            skip_on_condition_false: false,
        }
    }
}

pub(crate) fn enabled_by_default() -> bool {
    true
}

/// An ordered, possibly nested group of script references.
///
/// Child components are not stored inline: the store keeps the tree by id
/// and each component only records its parent.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ComponentDefinition {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default)]
    pub mode: ExecutionMode,

    #[serde(default, skip_serializing_if = "ParamMap::is_empty")]
    pub shared_variables: ParamMap,

    #[serde(default)]
    pub continue_on_failure: bool,

    #[serde(default, rename = "parent", skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,

    #[serde(default)]
    pub steps: Vec<ComponentStep>,
}

impl ComponentDefinition {
    pub fn new(id: impl Into<String>, mode: ExecutionMode) -> Self {
        Self {
            id: id.into(),
            name: None,
            mode,
            shared_variables: ParamMap::new(),
            continue_on_failure: false,
            parent_id: None,
            steps: Vec::new(),
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    /// Enabled steps in ascending order; ties keep declaration order.
    pub fn ordered_steps(&self) -> Vec<&ComponentStep> {
        let mut steps: Vec<&ComponentStep> = self.steps.iter().filter(|s| s.enabled).collect();
        steps.sort_by_key(|s| s.order);
        steps
    }
}
