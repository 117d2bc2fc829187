use crate::types::component::enabled_by_default;
use crate::types::ParamMap;

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CaseScriptRef {
    #[serde(rename = "script")]
    pub script_id: String,

    #[serde(default)]
    pub order: i64,

    #[serde(default = "enabled_by_default")]
    pub enabled: bool,

    #[serde(default, skip_serializing_if = "ParamMap::is_empty")]
    pub parameters: ParamMap,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CaseComponentRef {
    #[serde(rename = "component")]
    pub component_id: String,

    #[serde(default)]
    pub order: i64,

    #[serde(default = "enabled_by_default")]
    pub enabled: bool,

    #[serde(default, skip_serializing_if = "ParamMap::is_empty")]
    pub parameters: ParamMap,
}

/// Top-level test case: script and component references share one ordering axis.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CaseDefinition {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "ParamMap::is_empty")]
    pub test_data: ParamMap,

    #[serde(default)]
    pub continue_on_failure: bool,

    #[serde(default)]
    pub scripts: Vec<CaseScriptRef>,

    #[serde(default)]
    pub components: Vec<CaseComponentRef>,
}

impl CaseDefinition {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            test_data: ParamMap::new(),
            continue_on_failure: false,
            scripts: Vec::new(),
            components: Vec::new(),
        }
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    /// Enabled script and component references on their shared order axis.
    ///
    /// The sort is stable: ties keep scripts before components, each in
    /// declaration order.
    pub fn ordered_refs(&self) -> Vec<CaseRef<'_>> {
        let mut refs: Vec<CaseRef<'_>> = self
            .scripts
            .iter()
            .filter(|s| s.enabled)
            .map(CaseRef::Script)
            .chain(
                self.components
                    .iter()
                    .filter(|c| c.enabled)
                    .map(CaseRef::Component),
            )
            .collect();
        refs.sort_by_key(|r| r.order());
        refs
    }
}

/// One entry of a case's execution order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CaseRef<'a> {
    Script(&'a CaseScriptRef),
    Component(&'a CaseComponentRef),
}

impl<'a> CaseRef<'a> {
    pub fn order(&self) -> i64 {
        match self {
            CaseRef::Script(s) => s.order,
            CaseRef::Component(c) => c.order,
        }
    }

    pub fn id(&self) -> &'a str {
        match *self {
            CaseRef::Script(s) => &s.script_id,
            CaseRef::Component(c) => &c.component_id,
        }
    }

    pub fn parameters(&self) -> &'a ParamMap {
        match *self {
            CaseRef::Script(s) => &s.parameters,
            CaseRef::Component(c) => &c.parameters,
        }
    }
}
