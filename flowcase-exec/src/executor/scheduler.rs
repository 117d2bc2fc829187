use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::{Duration, Instant};

use flowcase_core::types::{
    CaseDefinition, CaseRef, ComponentDefinition, ExecutionMode, ParamMap, ScriptDefinition,
};
use flowcase_store::{DefinitionKind, DefinitionStore};
use futures_util::future::{BoxFuture, FutureExt};
use tracing::{debug, info, instrument, warn, Instrument, Span};

use crate::context::{CaseContext, ComponentContext, ExecutionHistory, ScriptContext};
use crate::executor::concurrency::ConcurrencyLimits;
use crate::executor::condition::ConditionEvaluator;
use crate::executor::events::{Event, EventSink};
use crate::executor::result::{ExecutionError, ExecutionRecord, ExecutionResult, RecordKind};
use crate::executor::step_runner::{StepOutcome, StepRunner};
use crate::executor::types::ExecutorConfig;

/// Runs scripts, components and test cases against a definition store.
///
/// Cloning is cheap; clones share the runner, sinks and concurrency limit.
#[derive(Clone)]
pub struct Executor {
    config: ExecutorConfig,
    store: Arc<dyn DefinitionStore>,
    runner: Arc<dyn StepRunner>,
    condition: Arc<dyn ConditionEvaluator>,
    event_sink: Arc<dyn EventSink>,
    limits: ConcurrencyLimits,
}

impl Executor {
    pub fn new(
        config: ExecutorConfig,
        store: Arc<dyn DefinitionStore>,
        runner: Arc<dyn StepRunner>,
        condition: Arc<dyn ConditionEvaluator>,
        event_sink: Arc<dyn EventSink>,
    ) -> Self {
        let limits = ConcurrencyLimits::new(config.max_concurrency);
        Self {
            config,
            store,
            runner,
            condition,
            event_sink,
            limits,
        }
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    /// Resolve the script context, call the step runner, and read the
    /// declared output variables back out of the context.
    #[instrument(skip_all, fields(script_id = %ctx.script().id))]
    pub async fn run_script(&self, ctx: &mut ScriptContext) -> ExecutionResult {
        let started = Instant::now();
        let script_id = ctx.script().id.clone();
        self.event_sink
            .emit(Event::ScriptStarted {
                script_id: script_id.clone(),
            })
            .await;

        let result = match self.execute_script(ctx).await {
            Ok(outcome) if outcome.passed => {
                ExecutionResult::success(outcome.output, ctx.output_variables(), started.elapsed())
            }
            Ok(outcome) => ExecutionResult::failed(
                outcome.error.unwrap_or_else(|| "step failed".to_string()),
                started.elapsed(),
            )
            .with_output(outcome.output),
            Err(e) => ExecutionResult::failed(e.to_string(), started.elapsed()),
        };

        match &result.error {
            None => debug!(duration_ms = result.duration_ms(), "script succeeded"),
            Some(error) => warn!(duration_ms = result.duration_ms(), %error, "script failed"),
        }
        self.event_sink
            .emit(Event::ScriptFinished {
                script_id,
                status: result.status,
                duration_ms: result.duration_ms(),
            })
            .await;
        result
    }

    async fn execute_script(&self, ctx: &mut ScriptContext) -> Result<StepOutcome, ExecutionError> {
        let missing = ctx.missing_required();
        if !missing.is_empty() {
            return Err(ExecutionError::MissingRequired(missing));
        }

        ctx.scope.resolve_in_place();
        let params = ctx.scope.snapshot();
        let mut outcome = self.call_runner(ctx.script().clone(), params).await?;
        ctx.scope.update_params(std::mem::take(&mut outcome.variables));
        Ok(outcome)
    }

    async fn call_runner(
        &self,
        script: Arc<ScriptDefinition>,
        params: ParamMap,
    ) -> Result<StepOutcome, ExecutionError> {
        let _permit = self.limits.acquire().await?;
        let runner = self.runner.clone();
        let call =
            AssertUnwindSafe(async move { runner.execute(&script, &params).await }).catch_unwind();

        let caught = match self.config.step_timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| ExecutionError::Timeout {
                    ms: limit.as_millis() as u64,
                })?,
            None => call.await,
        };
        match caught {
            Ok(result) => Ok(result?),
            Err(payload) => Err(ExecutionError::Panicked(panic_message(payload.as_ref()))),
        }
    }

    /// Run a component's own steps (not its children) in its execution mode.
    #[instrument(
        skip_all,
        fields(component_id = %ctx.component().id, mode = ctx.component().mode.as_str())
    )]
    pub async fn run_component(&self, ctx: &mut ComponentContext) -> ExecutionResult {
        let started = Instant::now();
        let component = ctx.component().clone();
        self.event_sink
            .emit(Event::ComponentStarted {
                component_id: component.id.clone(),
                mode: component.mode,
            })
            .await;

        match component.mode {
            ExecutionMode::Concurrent => self.run_concurrent_steps(&component, ctx).await,
            ExecutionMode::Sequential | ExecutionMode::Conditional => {
                self.run_sequential_steps(&component, ctx).await
            }
        }

        let result = history_result(ctx.history(), ctx.scope.snapshot(), started.elapsed());
        info!(
            status = %result.status,
            duration_ms = result.duration_ms(),
            "component finished"
        );
        self.event_sink
            .emit(Event::ComponentFinished {
                component_id: component.id.clone(),
                status: result.status,
                duration_ms: result.duration_ms(),
            })
            .await;
        result
    }

    async fn run_sequential_steps(
        &self,
        component: &ComponentDefinition,
        ctx: &mut ComponentContext,
    ) {
        for step in component.ordered_steps() {
            if let Some(condition) = &step.condition {
                let resolved = ctx.scope.resolve_value(condition);
                if !self.condition.evaluate(&resolved) && step.skip_on_condition_false {
                    debug!(script_id = %step.script_id, "condition false, step skipped");
                    self.event_sink
                        .emit(Event::StepSkipped {
                            component_id: component.id.clone(),
                            script_id: step.script_id.clone(),
                        })
                        .await;
                    let name = self.step_name(&step.script_id).await;
                    ctx.record(ExecutionRecord::skipped(&step.script_id, name));
                    continue;
                }
            }

            let (name, result) = match self.load_script(&step.script_id).await {
                Ok(script) => {
                    let name = script.display_name().to_string();
                    let mut script_ctx = ctx.derive_script(script, &step.parameters);
                    (name, self.run_script(&mut script_ctx).await)
                }
                Err(e) => (
                    step.script_id.clone(),
                    ExecutionResult::failed(e.to_string(), Duration::ZERO),
                ),
            };

            let stop = !result.success && !component.continue_on_failure;
            ctx.scope.update_params(result.output_variables.clone());
            ctx.record(ExecutionRecord::from_result(
                RecordKind::Script,
                &step.script_id,
                name,
                &result,
            ));
            if stop {
                warn!(script_id = %step.script_id, "step failed, stopping component");
                break;
            }
        }
    }

    async fn run_concurrent_steps(
        &self,
        component: &ComponentDefinition,
        ctx: &mut ComponentContext,
    ) {
        let mut pending = Vec::new();
        for step in component.ordered_steps() {
            let launched = match self.load_script(&step.script_id).await {
                Ok(script) => {
                    let name = script.display_name().to_string();
                    let mut script_ctx = ctx.derive_script(script, &step.parameters);
                    let exec = self.clone();
                    let handle = tokio::spawn(
                        async move { exec.run_script(&mut script_ctx).await }
                            .instrument(Span::current()),
                    );
                    (name, Ok(handle))
                }
                Err(e) => (step.script_id.clone(), Err(e)),
            };
            pending.push((step.script_id.clone(), launched));
        }

        // Join barrier: nothing is merged until every task has finished.
        let mut finished = Vec::with_capacity(pending.len());
        for (script_id, (name, launched)) in pending {
            let result = match launched {
                Ok(handle) => match handle.await {
                    Ok(result) => result,
                    Err(e) => ExecutionResult::failed(
                        ExecutionError::TaskJoin(format!("step {script_id}: {e}")).to_string(),
                        Duration::ZERO,
                    ),
                },
                Err(e) => ExecutionResult::failed(e.to_string(), Duration::ZERO),
            };
            finished.push((script_id, name, result));
        }

        for (script_id, name, result) in finished {
            ctx.scope.update_params(result.output_variables.clone());
            ctx.record(ExecutionRecord::from_result(
                RecordKind::Script,
                script_id,
                name,
                &result,
            ));
        }
    }

    /// Run a component tree: every child (recursively) first, then the
    /// component's own steps.
    pub async fn run_nested_component(&self, ctx: &mut ComponentContext) -> ExecutionResult {
        let mut path = Vec::new();
        self.run_nested(ctx, &mut path).await
    }

    fn run_nested<'a>(
        &'a self,
        ctx: &'a mut ComponentContext,
        path: &'a mut Vec<String>,
    ) -> BoxFuture<'a, ExecutionResult> {
        async move {
            let id = ctx.component().id.clone();
            if path.contains(&id) {
                warn!(component_id = %id, "component already on the execution path");
                return ExecutionResult::failed(
                    ExecutionError::ComponentCycle(id).to_string(),
                    Duration::ZERO,
                );
            }
            let children = match self.store.children_of(&id).await {
                Ok(children) => children,
                Err(e) => {
                    return ExecutionResult::failed(
                        ExecutionError::from(e).to_string(),
                        Duration::ZERO,
                    )
                }
            };

            path.push(id);
            for child_id in children {
                let (name, result) = match self.load_component(&child_id).await {
                    Ok(child) => {
                        let name = child.display_name().to_string();
                        let mut child_ctx = ctx.derive_child(child);
                        (name, self.run_nested(&mut child_ctx, path).await)
                    }
                    Err(e) => (
                        child_id.clone(),
                        ExecutionResult::failed(e.to_string(), Duration::ZERO),
                    ),
                };
                ctx.scope.update_params(result.output_variables.clone());
                ctx.record(ExecutionRecord::from_result(
                    RecordKind::Component,
                    &child_id,
                    name,
                    &result,
                ));
            }

            let result = self.run_component(ctx).await;
            path.pop();
            result
        }
        .boxed()
    }

    /// Run a test case: scripts and component trees interleaved on one order axis.
    #[instrument(skip_all, fields(case_id = %case.id))]
    pub async fn run_test_case(
        &self,
        case: Arc<CaseDefinition>,
        runtime_params: &ParamMap,
        env: Option<&ParamMap>,
    ) -> ExecutionResult {
        let started = Instant::now();
        self.event_sink
            .emit(Event::CaseStarted {
                case_id: case.id.clone(),
            })
            .await;

        let mut ctx = CaseContext::new(case.clone(), env, runtime_params);
        for step in case.ordered_refs() {
            let (kind, name, result) = match step {
                CaseRef::Script(r) => match self.load_script(&r.script_id).await {
                    Ok(script) => {
                        let name = script.display_name().to_string();
                        let mut script_ctx = ctx.derive_script(script, &r.parameters);
                        (RecordKind::Script, name, self.run_script(&mut script_ctx).await)
                    }
                    Err(e) => (
                        RecordKind::Script,
                        r.script_id.clone(),
                        ExecutionResult::failed(e.to_string(), Duration::ZERO),
                    ),
                },
                CaseRef::Component(r) => match self.load_component(&r.component_id).await {
                    Ok(component) => {
                        let name = component.display_name().to_string();
                        let mut component_ctx = ctx.derive_component(component, &r.parameters);
                        (
                            RecordKind::Component,
                            name,
                            self.run_nested_component(&mut component_ctx).await,
                        )
                    }
                    Err(e) => (
                        RecordKind::Component,
                        r.component_id.clone(),
                        ExecutionResult::failed(e.to_string(), Duration::ZERO),
                    ),
                },
            };

            let stop = !result.success && !case.continue_on_failure;
            ctx.scope.update_params(result.output_variables.clone());
            ctx.record(ExecutionRecord::from_result(kind, step.id(), name, &result));
            if stop {
                warn!(step_id = step.id(), "step failed, stopping case");
                break;
            }
        }

        let result = history_result(ctx.history(), ctx.scope.snapshot(), started.elapsed());
        let summary = ctx.history().summary();
        info!(
            status = %result.status,
            succeeded = summary.succeeded,
            failed = summary.failed,
            skipped = summary.skipped,
            duration_ms = result.duration_ms(),
            "case finished"
        );
        self.event_sink
            .emit(Event::CaseFinished {
                case_id: case.id.clone(),
                status: result.status,
                duration_ms: result.duration_ms(),
            })
            .await;
        result
    }

    /// Display name of a step's script, or its id when it cannot be loaded.
    async fn step_name(&self, script_id: &str) -> String {
        match self.load_script(script_id).await {
            Ok(script) => script.display_name().to_string(),
            Err(_) => script_id.to_string(),
        }
    }

    pub(crate) async fn load_script(
        &self,
        id: &str,
    ) -> Result<Arc<ScriptDefinition>, ExecutionError> {
        self.store
            .get_script(id)
            .await?
            .ok_or_else(|| ExecutionError::NotFound {
                kind: DefinitionKind::Script,
                id: id.to_string(),
            })
    }

    pub(crate) async fn load_component(
        &self,
        id: &str,
    ) -> Result<Arc<ComponentDefinition>, ExecutionError> {
        self.store
            .get_component(id)
            .await?
            .ok_or_else(|| ExecutionError::NotFound {
                kind: DefinitionKind::Component,
                id: id.to_string(),
            })
    }

    pub(crate) async fn load_case(&self, id: &str) -> Result<Arc<CaseDefinition>, ExecutionError> {
        self.store
            .get_case(id)
            .await?
            .ok_or_else(|| ExecutionError::NotFound {
                kind: DefinitionKind::Case,
                id: id.to_string(),
            })
    }
}

/// SUCCESS iff nothing in the history failed; the mapping is kept either way.
fn history_result(
    history: &ExecutionHistory,
    vars: ParamMap,
    duration: Duration,
) -> ExecutionResult {
    let summary = history.summary();
    let output = history.to_output();
    if summary.failed == 0 {
        return ExecutionResult::success(output, vars, duration);
    }
    ExecutionResult::failed(
        format!(
            "{} of {} steps failed",
            summary.failed,
            summary.succeeded + summary.failed
        ),
        duration,
    )
    .with_output(output)
    .with_output_variables(vars)
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        return (*s).to_string();
    }
    if let Some(s) = payload.downcast_ref::<String>() {
        return s.clone();
    }
    "unknown panic payload".to_string()
}
