#![forbid(unsafe_code)]

//! Execution engine for flowcase.
//!
//! Definitions come from a [`flowcase_store::DefinitionStore`]; the actual
//! work of a script is delegated to a [`StepRunner`].

pub mod context;
pub mod executor;

use std::sync::Arc;
use std::time::Duration;

use flowcase_core::types::ParamMap;
use flowcase_store::DefinitionStore;

pub use crate::context::{CaseContext, ComponentContext, ParamScope, ScriptContext};
pub use crate::executor::{
    ConditionEvaluator, EventSink, ExecutionResult, ExecutionStatus, Executor, ExecutorConfig,
    HttpStepRunner, StepOutcome, StepRunner, TruthyCondition,
};

/// Id-based entry points over an [`Executor`].
pub struct Engine {
    store: Arc<dyn DefinitionStore>,
    runner: Arc<dyn StepRunner>,
    condition: Arc<dyn ConditionEvaluator>,
    event_sink: Arc<dyn EventSink>,
    config: ExecutorConfig,
    environment: ParamMap,
}

impl Engine {
    pub fn new(store: Arc<dyn DefinitionStore>, runner: Arc<dyn StepRunner>) -> Self {
        Self {
            store,
            runner,
            condition: Arc::new(TruthyCondition),
            event_sink: Arc::new(executor::NoOpEventSink),
            config: ExecutorConfig::default(),
            environment: ParamMap::new(),
        }
    }

    pub fn with_condition(mut self, condition: Arc<dyn ConditionEvaluator>) -> Self {
        self.condition = condition;
        self
    }

    pub fn with_event_sink(mut self, event_sink: Arc<dyn EventSink>) -> Self {
        self.event_sink = event_sink;
        self
    }

    pub fn with_config(mut self, config: ExecutorConfig) -> Self {
        self.config = config;
        self
    }

    /// Environment configuration for `run_script` and `run_component`, and
    /// for `run_case` when the call passes none.
    pub fn with_environment(mut self, environment: ParamMap) -> Self {
        self.environment = environment;
        self
    }

    /// A fresh executor; each top-level run gets its own concurrency limit.
    pub fn executor(&self) -> Executor {
        Executor::new(
            self.config.clone(),
            self.store.clone(),
            self.runner.clone(),
            self.condition.clone(),
            self.event_sink.clone(),
        )
    }

    pub async fn run_script(&self, script_id: &str, overrides: &ParamMap) -> ExecutionResult {
        let exec = self.executor();
        match exec.load_script(script_id).await {
            Ok(script) => {
                let mut ctx = ScriptContext::new(script, Some(&self.environment), overrides);
                exec.run_script(&mut ctx).await
            }
            Err(e) => ExecutionResult::failed(e.to_string(), Duration::ZERO),
        }
    }

    /// Always runs the whole tree under `component_id`.
    pub async fn run_component(&self, component_id: &str, overrides: &ParamMap) -> ExecutionResult {
        let exec = self.executor();
        match exec.load_component(component_id).await {
            Ok(component) => {
                let mut ctx = ComponentContext::new(component, Some(&self.environment), overrides);
                exec.run_nested_component(&mut ctx).await
            }
            Err(e) => ExecutionResult::failed(e.to_string(), Duration::ZERO),
        }
    }

    pub async fn run_case(
        &self,
        case_id: &str,
        runtime_params: &ParamMap,
        env_config: Option<&ParamMap>,
    ) -> ExecutionResult {
        let exec = self.executor();
        match exec.load_case(case_id).await {
            Ok(case) => {
                let env = env_config.unwrap_or(&self.environment);
                exec.run_test_case(case, runtime_params, Some(env)).await
            }
            Err(e) => ExecutionResult::failed(e.to_string(), Duration::ZERO),
        }
    }
}
