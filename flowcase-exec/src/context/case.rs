use std::sync::Arc;

use flowcase_core::types::{CaseDefinition, ComponentDefinition, ParamMap, ScriptDefinition};

use super::{ComponentContext, ExecutionHistory, ParamScope, ScriptContext};
use crate::executor::ExecutionRecord;

/// Context of one test case run: environment, test data, runtime params.
#[derive(Debug, Clone)]
pub struct CaseContext {
    pub scope: ParamScope,
    case: Arc<CaseDefinition>,
    history: ExecutionHistory,
}

impl CaseContext {
    pub fn new(
        case: Arc<CaseDefinition>,
        env: Option<&ParamMap>,
        runtime_params: &ParamMap,
    ) -> Self {
        let mut scope = ParamScope::from_env(env);
        scope.update_params(case.test_data.clone());
        scope.apply_overrides(runtime_params);
        Self {
            scope,
            case,
            history: ExecutionHistory::default(),
        }
    }

    pub fn case(&self) -> &Arc<CaseDefinition> {
        &self.case
    }

    pub fn history(&self) -> &ExecutionHistory {
        &self.history
    }

    pub fn record(&mut self, record: ExecutionRecord) {
        self.history.push(record);
    }

    pub fn derive_script(
        &self,
        script: Arc<ScriptDefinition>,
        ref_params: &ParamMap,
    ) -> ScriptContext {
        ScriptContext::new(script, None, &self.seed(ref_params))
    }

    pub fn derive_component(
        &self,
        component: Arc<ComponentDefinition>,
        ref_params: &ParamMap,
    ) -> ComponentContext {
        ComponentContext::new(component, None, &self.seed(ref_params))
    }

    fn seed(&self, ref_params: &ParamMap) -> ParamMap {
        let mut seed = self.scope.snapshot();
        seed.extend(self.scope.resolve_params(ref_params));
        seed
    }
}
