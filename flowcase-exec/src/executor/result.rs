use std::time::Duration;

use chrono::{DateTime, Utc};
use flowcase_core::types::{ParamMap, ParamValue};
use flowcase_store::{DefinitionKind, StoreError};
use serde_json::json;

use crate::executor::step_runner::StepError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExecutionStatus {
    Success,
    Failed,
    Skipped,
}

impl ExecutionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExecutionStatus::Success => "success",
            ExecutionStatus::Failed => "failed",
            ExecutionStatus::Skipped => "skipped",
        }
    }
}

impl std::fmt::Display for ExecutionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one `run_*` call. Engine operations always return one of
/// these; failures are carried in `error`, never raised.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionResult {
    pub status: ExecutionStatus,
    pub success: bool,
    pub output: ParamValue,
    pub error: Option<String>,
    pub duration: Duration,
    pub output_variables: ParamMap,
}

impl ExecutionResult {
    pub fn success(output: ParamValue, output_variables: ParamMap, duration: Duration) -> Self {
        Self {
            status: ExecutionStatus::Success,
            success: true,
            output,
            error: None,
            duration,
            output_variables,
        }
    }

    pub fn failed(error: impl Into<String>, duration: Duration) -> Self {
        Self {
            status: ExecutionStatus::Failed,
            success: false,
            output: ParamValue::Null,
            error: Some(error.into()),
            duration,
            output_variables: ParamMap::new(),
        }
    }

    pub fn with_output(mut self, output: ParamValue) -> Self {
        self.output = output;
        self
    }

    pub fn with_output_variables(mut self, vars: ParamMap) -> Self {
        self.output_variables = vars;
        self
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration.as_millis() as u64
    }

    pub fn to_json(&self) -> serde_json::Value {
        json!({
            "status": self.status.as_str(),
            "success": self.success,
            "error": self.error,
            "duration_ms": self.duration_ms(),
            "output": self.output,
            "output_variables": self.output_variables,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Script,
    Component,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Script => "script",
            RecordKind::Component => "component",
        }
    }
}

/// One entry of a component or case execution history.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct ExecutionRecord {
    pub kind: RecordKind,
    pub id: String,
    pub name: String,
    pub status: ExecutionStatus,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub duration_ms: u64,
    pub timestamp: DateTime<Utc>,
}

impl ExecutionRecord {
    pub fn from_result(
        kind: RecordKind,
        id: impl Into<String>,
        name: impl Into<String>,
        result: &ExecutionResult,
    ) -> Self {
        Self {
            kind,
            id: id.into(),
            name: name.into(),
            status: result.status,
            success: result.success,
            error: result.error.clone(),
            duration_ms: result.duration_ms(),
            timestamp: Utc::now(),
        }
    }

    pub fn skipped(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: RecordKind::Script,
            id: id.into(),
            name: name.into(),
            status: ExecutionStatus::Skipped,
            success: false,
            error: None,
            duration_ms: 0,
            timestamp: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize)]
pub struct RunSummary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    pub success_rate: f64,
}

impl RunSummary {
    pub fn from_records(records: &[ExecutionRecord]) -> Self {
        let mut summary = RunSummary {
            total: records.len(),
            ..RunSummary::default()
        };
        for r in records {
            match r.status {
                ExecutionStatus::Success => summary.succeeded += 1,
                ExecutionStatus::Failed => summary.failed += 1,
                ExecutionStatus::Skipped => summary.skipped += 1,
            }
        }
        let executed = summary.succeeded + summary.failed;
        if executed > 0 {
            summary.success_rate = summary.succeeded as f64 / executed as f64;
        }
        summary
    }
}

/// Internal failure of an engine operation; rendered into a FAILED result.
#[derive(Debug, thiserror::Error)]
pub enum ExecutionError {
    #[error("store error: {0}")]
    Store(#[from] StoreError),
    #[error("{kind} not found: {id}")]
    NotFound { kind: DefinitionKind, id: String },
    #[error("missing required parameters: {}", .0.join(", "))]
    MissingRequired(Vec<String>),
    #[error(transparent)]
    Step(#[from] StepError),
    #[error("step timed out after {ms}ms")]
    Timeout { ms: u64 },
    #[error("step runner panicked: {0}")]
    Panicked(String),
    #[error("task join error: {0}")]
    TaskJoin(String),
    #[error("component cycle detected at {0}")]
    ComponentCycle(String),
    #[error("concurrency limiter closed")]
    LimiterClosed,
}
