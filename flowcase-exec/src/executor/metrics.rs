use crate::executor::result::ExecutionStatus;
use crate::executor::{Event, EventSink};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

#[derive(Debug, Clone, Default)]
pub struct RunMetrics {
    pub target: String,
    pub status: String,
    pub started_at: Option<Instant>,
    pub finished_at: Option<Instant>,
    pub total_duration: Option<Duration>,
    pub scripts_total: usize,
    pub scripts_succeeded: usize,
    pub scripts_failed: usize,
    pub components_run: usize,
    pub steps_skipped: usize,
}

impl RunMetrics {
    pub fn new(target: String) -> Self {
        Self {
            target,
            started_at: Some(Instant::now()),
            ..Default::default()
        }
    }

    pub fn record_script_success(&mut self) {
        self.scripts_succeeded += 1;
        self.scripts_total += 1;
    }

    pub fn record_script_failure(&mut self) {
        self.scripts_failed += 1;
        self.scripts_total += 1;
    }

    pub fn record_component(&mut self) {
        self.components_run += 1;
    }

    pub fn record_skip(&mut self) {
        self.steps_skipped += 1;
    }

    pub fn finish(&mut self, status: ExecutionStatus) {
        self.status = status.as_str().to_string();
        self.finished_at = Some(Instant::now());
        if let (Some(started), Some(finished)) = (self.started_at, self.finished_at) {
            self.total_duration = Some(finished.duration_since(started));
        }
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "target": self.target,
            "status": self.status,
            "duration_ms": self.total_duration.map(|d| d.as_millis() as u64),
            "scripts": {
                "total": self.scripts_total,
                "succeeded": self.scripts_succeeded,
                "failed": self.scripts_failed,
            },
            "components": self.components_run,
            "skipped": self.steps_skipped,
        })
    }
}

pub struct MetricsCollector {
    metrics: Arc<Mutex<RunMetrics>>,
}

impl MetricsCollector {
    pub fn new(target: String) -> Self {
        Self {
            metrics: Arc::new(Mutex::new(RunMetrics::new(target))),
        }
    }

    pub async fn record_script_success(&self) {
        self.metrics.lock().await.record_script_success();
    }

    pub async fn record_script_failure(&self) {
        self.metrics.lock().await.record_script_failure();
    }

    pub async fn record_component(&self) {
        self.metrics.lock().await.record_component();
    }

    pub async fn record_skip(&self) {
        self.metrics.lock().await.record_skip();
    }

    pub async fn finish(&self, status: ExecutionStatus) {
        self.metrics.lock().await.finish(status);
    }

    pub async fn get_metrics(&self) -> RunMetrics {
        self.metrics.lock().await.clone()
    }
}

/// Counts events into a [`MetricsCollector`] and forwards them to `base`.
pub struct MetricsEventSink {
    collector: Arc<MetricsCollector>,
    base: Arc<dyn EventSink>,
}

impl MetricsEventSink {
    pub fn new(collector: Arc<MetricsCollector>, base: Arc<dyn EventSink>) -> Self {
        Self { collector, base }
    }
}

#[async_trait]
impl EventSink for MetricsEventSink {
    async fn emit(&self, event: Event) {
        match &event {
            Event::ScriptFinished { status, .. } => match status {
                ExecutionStatus::Success => self.collector.record_script_success().await,
                _ => self.collector.record_script_failure().await,
            },
            Event::ComponentFinished { .. } => {
                self.collector.record_component().await;
            }
            Event::StepSkipped { .. } => {
                self.collector.record_skip().await;
            }
            Event::CaseFinished { status, .. } => {
                self.collector.finish(*status).await;
            }
            _ => {}
        }

        self.base.emit(event).await;
    }
}
