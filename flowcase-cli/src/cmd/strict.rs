use std::sync::Arc;

use async_trait::async_trait;
use flowcase_core::types::{ParamMap, ScriptDefinition};
use flowcase_core::VariableResolver;
use flowcase_exec::executor::{StepError, StepOutcome, StepRunner};
use tracing::warn;

/// Fails a script before it runs when its request template still
/// references names that nothing in the resolved parameters provides.
pub struct StrictRunner {
    inner: Arc<dyn StepRunner>,
}

impl StrictRunner {
    pub fn new(inner: Arc<dyn StepRunner>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl StepRunner for StrictRunner {
    async fn execute(
        &self,
        script: &ScriptDefinition,
        params: &ParamMap,
    ) -> Result<StepOutcome, StepError> {
        if let Some(request) = &script.request {
            let template = serde_json::to_value(request)
                .map_err(|e| StepError::Build(format!("failed to inspect request: {e}")))?;
            let missing = VariableResolver::new(params).unresolved(&template);
            if !missing.is_empty() {
                warn!(script_id = %script.id, missing = ?missing, "unresolved references");
                return Ok(StepOutcome::fail(format!(
                    "unresolved references: {}",
                    missing.join(", ")
                )));
            }
        }
        self.inner.execute(script, params).await
    }
}
