use std::path::PathBuf;

use clap::Args;

use crate::output::OutputFormat;

#[derive(Debug, Args, Clone)]
pub struct OutputArgs {
    #[arg(long, value_enum, default_value_t = OutputFormat::Text, global = true)]
    pub format: OutputFormat,
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Args, Clone)]
pub struct LogArgs {
    /// Log line format; the filter comes from `FLOWCASE_LOG`.
    #[arg(long, value_enum, default_value_t = LogFormat::Text, global = true)]
    pub log_format: LogFormat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum EventsMode {
    None,
    Stdout,
}

#[derive(Debug, Args, Clone)]
pub struct RunArgs {
    /// JSON or YAML environment file merged over the suite's `environment`.
    #[arg(long)]
    pub env: Option<PathBuf>,
    /// Runtime parameter; the value is parsed as JSON when possible.
    #[arg(long = "set", value_name = "KEY=VALUE")]
    pub set_params: Vec<String>,
    #[arg(long, default_value_t = 10)]
    pub max_concurrency: usize,
    /// Per-step deadline in milliseconds.
    #[arg(long, value_name = "MS")]
    pub step_timeout: Option<u64>,
    /// HTTP request timeout in milliseconds.
    #[arg(long, value_name = "MS", default_value_t = 30_000)]
    pub http_timeout: u64,
    #[arg(long, value_enum, default_value_t = EventsMode::None)]
    pub events: EventsMode,
    /// Fail a step whose request still references unresolved names.
    #[arg(long)]
    pub strict: bool,
}
