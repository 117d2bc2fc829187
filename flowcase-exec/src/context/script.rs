use std::sync::Arc;

use flowcase_core::types::{ParamMap, ParamValue, ScriptDefinition};

use super::ParamScope;

/// Context of one script run.
///
/// Layers, lowest priority first: environment, declared parameter defaults,
/// script variables, caller overrides.
#[derive(Debug, Clone)]
pub struct ScriptContext {
    pub scope: ParamScope,
    script: Arc<ScriptDefinition>,
}

impl ScriptContext {
    pub fn new(
        script: Arc<ScriptDefinition>,
        env: Option<&ParamMap>,
        overrides: &ParamMap,
    ) -> Self {
        let mut scope = ParamScope::from_env(env);
        let defaults: ParamMap = script
            .parameters
            .iter()
            .filter_map(|p| p.default.clone().map(|d| (p.name.clone(), d)))
            .collect();
        scope.update_params(defaults);
        scope.update_params(script.variables.clone());
        scope.apply_overrides(overrides);
        Self { scope, script }
    }

    pub fn script(&self) -> &Arc<ScriptDefinition> {
        &self.script
    }

    /// Declared `required` parameters that have no value after layering.
    pub fn missing_required(&self) -> Vec<String> {
        self.script
            .parameters
            .iter()
            .filter(|p| p.required)
            .filter(|p| matches!(self.scope.get_param(&p.name), None | Some(ParamValue::Null)))
            .map(|p| p.name.clone())
            .collect()
    }

    /// Declared output variables present in the mapping, read as the step
    /// ran with them.
    pub fn output_variables(&self) -> ParamMap {
        self.script
            .output_variables
            .iter()
            .filter_map(|name| {
                self.scope
                    .get_param(name)
                    .map(|v| (name.clone(), v.clone()))
            })
            .collect()
    }
}
