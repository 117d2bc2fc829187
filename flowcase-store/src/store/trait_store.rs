use std::sync::Arc;

use async_trait::async_trait;
use flowcase_core::types::{CaseDefinition, ComponentDefinition, ScriptDefinition};

/// Read-only lookup of definitions by id.
#[async_trait]
pub trait DefinitionStore: Send + Sync {
    async fn get_script(&self, id: &str) -> Result<Option<Arc<ScriptDefinition>>, StoreError>;

    async fn get_component(&self, id: &str)
        -> Result<Option<Arc<ComponentDefinition>>, StoreError>;

    async fn get_case(&self, id: &str) -> Result<Option<Arc<CaseDefinition>>, StoreError>;

    /// Declared parent of a component; `None` for roots and unknown ids.
    async fn parent_of(&self, component_id: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .get_component(component_id)
            .await?
            .and_then(|c| c.parent_id.clone()))
    }

    /// Direct children of a component, in insertion order.
    async fn children_of(&self, component_id: &str) -> Result<Vec<String>, StoreError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionKind {
    Script,
    Component,
    Case,
}

impl DefinitionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DefinitionKind::Script => "script",
            DefinitionKind::Component => "component",
            DefinitionKind::Case => "case",
        }
    }
}

impl std::fmt::Display for DefinitionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: DefinitionKind, id: String },
    #[error("{kind} already exists: {id}")]
    Duplicate { kind: DefinitionKind, id: String },
    #[error("attaching component '{subject}' under '{parent}' would create a cycle")]
    CycleDetected { parent: String, subject: String },
    #[error("store lock poisoned")]
    Poisoned,
    #[error("store error: {0}")]
    Other(String),
}
