use crate::types::{CaseDefinition, ComponentDefinition, ParamMap, ScriptDefinition};

/// A suite file: environment defaults plus every definition it ships.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize, serde::Deserialize)]
pub struct SuiteDocument {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default, skip_serializing_if = "ParamMap::is_empty")]
    pub environment: ParamMap,

    #[serde(default)]
    pub scripts: Vec<ScriptDefinition>,

    #[serde(default)]
    pub components: Vec<ComponentDefinition>,

    #[serde(default)]
    pub cases: Vec<CaseDefinition>,
}

impl SuiteDocument {
    pub fn script(&self, id: &str) -> Option<&ScriptDefinition> {
        self.scripts.iter().find(|s| s.id == id)
    }

    pub fn component(&self, id: &str) -> Option<&ComponentDefinition> {
        self.components.iter().find(|c| c.id == id)
    }

    pub fn case(&self, id: &str) -> Option<&CaseDefinition> {
        self.cases.iter().find(|c| c.id == id)
    }
}
