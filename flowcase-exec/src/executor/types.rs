use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ExecutorConfig {
    /// Upper bound on step runner calls in flight at once.
    pub max_concurrency: usize,
    /// Deadline for a single step runner call; `None` waits indefinitely.
    pub step_timeout: Option<Duration>,
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self {
            max_concurrency: 10,
            step_timeout: None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpRunnerConfig {
    pub timeout: Duration,
    pub max_response_bytes: usize,
}

impl Default for HttpRunnerConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_response_bytes: 4 * 1024 * 1024,
        }
    }
}
