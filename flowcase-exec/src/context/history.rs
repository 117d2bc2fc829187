use serde_json::json;

use crate::executor::{ExecutionRecord, RunSummary};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExecutionHistory {
    records: Vec<ExecutionRecord>,
}

impl ExecutionHistory {
    pub fn push(&mut self, record: ExecutionRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[ExecutionRecord] {
        &self.records
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary::from_records(&self.records)
    }

    /// `{history, summary}` payload used as a component or case result output.
    pub fn to_output(&self) -> serde_json::Value {
        json!({
            "history": self.records,
            "summary": self.summary(),
        })
    }
}
