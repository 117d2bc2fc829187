use async_trait::async_trait;
use flowcase_core::types::{ParamMap, ParamValue, ScriptDefinition};

use crate::executor::http::HttpError;

/// What a step runner reports back for one script invocation.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StepOutcome {
    pub passed: bool,
    pub error: Option<String>,
    /// Response payload, kept as the script result's `output`.
    pub output: ParamValue,
    /// Values merged into the script context before its outputs are read.
    pub variables: ParamMap,
}

impl StepOutcome {
    pub fn pass() -> Self {
        Self {
            passed: true,
            ..Self::default()
        }
    }

    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            passed: false,
            error: Some(error.into()),
            ..Self::default()
        }
    }

    pub fn with_output(mut self, output: ParamValue) -> Self {
        self.output = output;
        self
    }

    pub fn with_variable(mut self, name: impl Into<String>, value: ParamValue) -> Self {
        self.variables.insert(name.into(), value);
        self
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum StepError {
    #[error("request build failed: {0}")]
    Build(String),
    #[error(transparent)]
    Http(#[from] HttpError),
    #[error("{0}")]
    Other(String),
}

/// The capability that actually performs a script: the engine's only
/// suspension point.
#[async_trait]
pub trait StepRunner: Send + Sync {
    async fn execute(
        &self,
        script: &ScriptDefinition,
        params: &ParamMap,
    ) -> Result<StepOutcome, StepError>;
}
