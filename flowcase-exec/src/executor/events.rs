use std::sync::Arc;

use async_trait::async_trait;
use flowcase_core::types::ExecutionMode;
use serde_json::json;

use crate::executor::result::ExecutionStatus;

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    CaseStarted {
        case_id: String,
    },
    CaseFinished {
        case_id: String,
        status: ExecutionStatus,
        duration_ms: u64,
    },
    ComponentStarted {
        component_id: String,
        mode: ExecutionMode,
    },
    ComponentFinished {
        component_id: String,
        status: ExecutionStatus,
        duration_ms: u64,
    },
    ScriptStarted {
        script_id: String,
    },
    ScriptFinished {
        script_id: String,
        status: ExecutionStatus,
        duration_ms: u64,
    },
    StepSkipped {
        component_id: String,
        script_id: String,
    },
}

impl Event {
    pub fn to_json(&self) -> serde_json::Value {
        match self {
            Event::CaseStarted { case_id } => {
                json!({ "type": "case.started", "case_id": case_id })
            }
            Event::CaseFinished { case_id, status, duration_ms } => {
                json!({ "type": "case.finished", "case_id": case_id, "status": status.as_str(), "duration_ms": duration_ms })
            }
            Event::ComponentStarted { component_id, mode } => {
                json!({ "type": "component.started", "component_id": component_id, "mode": mode.as_str() })
            }
            Event::ComponentFinished { component_id, status, duration_ms } => {
                json!({ "type": "component.finished", "component_id": component_id, "status": status.as_str(), "duration_ms": duration_ms })
            }
            Event::ScriptStarted { script_id } => {
                json!({ "type": "script.started", "script_id": script_id })
            }
            Event::ScriptFinished { script_id, status, duration_ms } => {
                json!({ "type": "script.finished", "script_id": script_id, "status": status.as_str(), "duration_ms": duration_ms })
            }
            Event::StepSkipped { component_id, script_id } => {
                json!({ "type": "step.skipped", "component_id": component_id, "script_id": script_id })
            }
        }
    }
}

#[async_trait]
pub trait EventSink: Send + Sync {
    async fn emit(&self, event: Event);
}

pub struct CompositeEventSink {
    sinks: Vec<Arc<dyn EventSink>>,
}

impl Default for CompositeEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl CompositeEventSink {
    pub fn new() -> Self {
        Self { sinks: Vec::new() }
    }

    pub fn add(&mut self, sink: Arc<dyn EventSink>) {
        self.sinks.push(sink);
    }
}

#[async_trait]
impl EventSink for CompositeEventSink {
    async fn emit(&self, event: Event) {
        for sink in &self.sinks {
            sink.emit(event.clone()).await;
        }
    }
}

/// Writes each event as one JSON line on stdout.
pub struct StdoutEventSink;

#[async_trait]
impl EventSink for StdoutEventSink {
    async fn emit(&self, event: Event) {
        println!("{}", serde_json::to_string(&event.to_json()).unwrap_or_default());
    }
}

pub struct NoOpEventSink;

#[async_trait]
impl EventSink for NoOpEventSink {
    async fn emit(&self, _event: Event) {}
}
