use std::sync::Arc;

use flowcase_core::types::{ComponentDefinition, ParamMap, ScriptDefinition};

use super::{ExecutionHistory, ParamScope, ScriptContext};
use crate::executor::ExecutionRecord;

/// Context of one component run: environment, shared variables, overrides.
#[derive(Debug, Clone)]
pub struct ComponentContext {
    pub scope: ParamScope,
    component: Arc<ComponentDefinition>,
    history: ExecutionHistory,
}

impl ComponentContext {
    pub fn new(
        component: Arc<ComponentDefinition>,
        env: Option<&ParamMap>,
        overrides: &ParamMap,
    ) -> Self {
        let mut scope = ParamScope::from_env(env);
        scope.update_params(component.shared_variables.clone());
        scope.apply_overrides(overrides);
        Self {
            scope,
            component,
            history: ExecutionHistory::default(),
        }
    }

    pub fn component(&self) -> &Arc<ComponentDefinition> {
        &self.component
    }

    pub fn history(&self) -> &ExecutionHistory {
        &self.history
    }

    pub fn record(&mut self, record: ExecutionRecord) {
        self.history.push(record);
    }

    /// Script context seeded with a snapshot of this mapping plus the step's
    /// resolved parameter overrides.
    pub fn derive_script(
        &self,
        script: Arc<ScriptDefinition>,
        step_params: &ParamMap,
    ) -> ScriptContext {
        let mut seed = self.scope.snapshot();
        seed.extend(self.scope.resolve_params(step_params));
        ScriptContext::new(script, None, &seed)
    }

    /// Context for a child component, seeded with a snapshot of this mapping.
    pub fn derive_child(&self, child: Arc<ComponentDefinition>) -> ComponentContext {
        ComponentContext::new(child, None, &self.scope.snapshot())
    }
}
