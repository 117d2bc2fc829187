pub mod concurrency;
pub mod condition;
mod criteria;
pub mod events;
pub mod http;
pub mod metrics;
mod request;
pub mod response;
mod result;
mod scheduler;
mod step_runner;
mod types;
pub mod worker;

pub use metrics::{MetricsCollector, MetricsEventSink, RunMetrics};

pub use condition::{ConditionEvaluator, TruthyCondition};
pub use events::{CompositeEventSink, Event, EventSink, NoOpEventSink, StdoutEventSink};
pub use http::{HttpClient, HttpError, HttpRequestParts, HttpResponseParts, ReqwestHttpClient};
pub use request::build_request;
pub use result::{
    ExecutionError, ExecutionRecord, ExecutionResult, ExecutionStatus, RecordKind, RunSummary,
};
pub use scheduler::Executor;
pub use step_runner::{StepError, StepOutcome, StepRunner};
pub use types::{ExecutorConfig, HttpRunnerConfig};
pub use worker::HttpStepRunner;
