use std::path::Path;
use std::sync::Arc;

use flowcase_exec::executor::{
    CompositeEventSink, EventSink, HttpStepRunner, MetricsCollector, MetricsEventSink,
    NoOpEventSink, StdoutEventSink,
};
use flowcase_exec::{Engine, ExecutionResult, StepRunner};
use flowcase_store::MemoryStore;
use serde_json::json;

use super::config::{
    executor_config, http_config, load_env_file, load_suite, merge_env, parse_set_params,
};
use super::progress::ProgressEventSink;
use super::strict::StrictRunner;
use crate::exit_codes;
use crate::output::{is_human, print_error, print_result};
use crate::{EventsMode, OutputArgs, RunArgs};

#[derive(Debug, Clone)]
pub enum RunTarget {
    Script(String),
    Component(String),
    Case(String),
}

impl RunTarget {
    fn kind(&self) -> &'static str {
        match self {
            RunTarget::Script(_) => "script",
            RunTarget::Component(_) => "component",
            RunTarget::Case(_) => "case",
        }
    }

    fn id(&self) -> &str {
        match self {
            RunTarget::Script(id) | RunTarget::Component(id) | RunTarget::Case(id) => id,
        }
    }
}

pub async fn run_cmd(path: &Path, target: RunTarget, run: RunArgs, output: OutputArgs) -> i32 {
    let doc = match load_suite(path, &output) {
        Ok(doc) => doc,
        Err(code) => return code,
    };

    let mut environment = doc.environment.clone();
    if let Some(env_path) = &run.env {
        match load_env_file(env_path, &output) {
            Ok(extra) => merge_env(&mut environment, extra),
            Err(code) => return code,
        }
    }

    let params = match parse_set_params(&run.set_params) {
        Ok(p) => p,
        Err(e) => {
            print_error(output.format, output.quiet, &e);
            return exit_codes::RUNTIME_ERROR;
        }
    };

    let store = match MemoryStore::from_document(&doc) {
        Ok(s) => Arc::new(s),
        Err(e) => {
            print_error(output.format, output.quiet, &e.to_string());
            return exit_codes::VALIDATION_FAILED;
        }
    };

    let http_runner = match HttpStepRunner::new(http_config(&run)) {
        Ok(r) => Arc::new(r),
        Err(e) => {
            print_error(output.format, output.quiet, &e.to_string());
            return exit_codes::RUNTIME_ERROR;
        }
    };
    let runner: Arc<dyn StepRunner> = if run.strict {
        Arc::new(StrictRunner::new(http_runner))
    } else {
        http_runner
    };

    let base: Arc<dyn EventSink> = match run.events {
        EventsMode::None => Arc::new(NoOpEventSink),
        EventsMode::Stdout => Arc::new(StdoutEventSink),
    };
    let mut sinks = CompositeEventSink::new();
    sinks.add(base);
    if is_human(output.format, output.quiet) {
        sinks.add(Arc::new(ProgressEventSink::new()));
    }
    let collector = Arc::new(MetricsCollector::new(format!(
        "{}:{}",
        target.kind(),
        target.id()
    )));
    let event_sink: Arc<dyn EventSink> =
        Arc::new(MetricsEventSink::new(collector.clone(), Arc::new(sinks)));

    let engine = Engine::new(store, runner)
        .with_config(executor_config(&run))
        .with_event_sink(event_sink)
        .with_environment(environment);

    tracing::info!(kind = target.kind(), id = target.id(), "run started");
    let result = match &target {
        RunTarget::Script(id) => engine.run_script(id, &params).await,
        RunTarget::Component(id) => engine.run_component(id, &params).await,
        RunTarget::Case(id) => engine.run_case(id, &params, None).await,
    };
    collector.finish(result.status).await;
    let metrics = collector.get_metrics().await;

    if is_human(output.format, output.quiet) {
        print_summary(&target, &result);
    } else {
        let mut body = result.to_json();
        if let Some(obj) = body.as_object_mut() {
            obj.insert("kind".to_string(), json!(target.kind()));
            obj.insert("id".to_string(), json!(target.id()));
            obj.insert("metrics".to_string(), metrics.to_json());
        }
        print_result(output.format, output.quiet, &body);
    }

    if result.success {
        exit_codes::SUCCESS
    } else {
        exit_codes::RUN_FAILED
    }
}

fn print_summary(target: &RunTarget, result: &ExecutionResult) {
    println!(
        "{} {}: {} ({}ms)",
        target.kind(),
        target.id(),
        result.status,
        result.duration_ms()
    );
    if let Some(history) = result.output.get("history").and_then(|h| h.as_array()) {
        for record in history {
            let status = record["status"].as_str().unwrap_or_default();
            let mark = match status {
                "success" => "✓",
                "skipped" => "~",
                _ => "✗",
            };
            let mut line = format!(
                "  {mark} {} {}",
                record["kind"].as_str().unwrap_or_default(),
                record["id"].as_str().unwrap_or_default()
            );
            if let Some(error) = record["error"].as_str() {
                line.push_str(&format!(": {error}"));
            }
            println!("{line}");
        }
    } else if let Some(error) = &result.error {
        println!("  error: {error}");
    }
    if let Some(summary) = result.output.get("summary") {
        println!(
            "summary: {} total, {} succeeded, {} failed, {} skipped",
            summary["total"], summary["succeeded"], summary["failed"], summary["skipped"]
        );
    }
    if matches!(target, RunTarget::Script(_)) {
        for (name, value) in &result.output_variables {
            println!("  {name} = {value}");
        }
    }
}
