use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use flowcase_exec::executor::{Event, EventSink};
use flowcase_exec::ExecutionStatus;

/// Prints one line per finished script and skipped step to stderr.
#[derive(Default)]
pub struct ProgressEventSink {
    succeeded: AtomicUsize,
    failed: AtomicUsize,
    skipped: AtomicUsize,
}

impl ProgressEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    fn tally(&self) -> String {
        format!(
            "✓{} ✗{} ~{}",
            self.succeeded.load(Ordering::Relaxed),
            self.failed.load(Ordering::Relaxed),
            self.skipped.load(Ordering::Relaxed)
        )
    }
}

#[async_trait]
impl EventSink for ProgressEventSink {
    async fn emit(&self, event: Event) {
        match event {
            Event::ScriptFinished {
                script_id,
                status,
                duration_ms,
            } => {
                let mark = if status == ExecutionStatus::Success {
                    self.succeeded.fetch_add(1, Ordering::Relaxed);
                    "✓"
                } else {
                    self.failed.fetch_add(1, Ordering::Relaxed);
                    "✗"
                };
                eprintln!("{mark} {script_id} ({duration_ms}ms) [{}]", self.tally());
            }
            Event::StepSkipped {
                component_id,
                script_id,
            } => {
                self.skipped.fetch_add(1, Ordering::Relaxed);
                eprintln!("~ {component_id}/{script_id} skipped [{}]", self.tally());
            }
            _ => {}
        }
    }
}
