use std::sync::Arc;

use async_trait::async_trait;
use flowcase_core::types::{ParamMap, ScriptDefinition};
use tracing::debug;

use crate::executor::criteria::failed_assertions;
use crate::executor::http::{HttpClient, HttpError, ReqwestHttpClient};
use crate::executor::request::build_request;
use crate::executor::response::{extract_variables, response_to_json, ResponseContext};
use crate::executor::step_runner::{StepError, StepOutcome, StepRunner};
use crate::executor::types::HttpRunnerConfig;

/// Step runner that performs a script's HTTP request, checks its
/// assertions and extracts variables from the response.
pub struct HttpStepRunner {
    http: Arc<dyn HttpClient>,
    config: HttpRunnerConfig,
}

impl HttpStepRunner {
    pub fn new(config: HttpRunnerConfig) -> Result<Self, HttpError> {
        Ok(Self::with_client(Arc::new(ReqwestHttpClient::new()?), config))
    }

    pub fn with_client(http: Arc<dyn HttpClient>, config: HttpRunnerConfig) -> Self {
        Self { http, config }
    }
}

#[async_trait]
impl StepRunner for HttpStepRunner {
    async fn execute(
        &self,
        script: &ScriptDefinition,
        params: &ParamMap,
    ) -> Result<StepOutcome, StepError> {
        let Some(template) = &script.request else {
            return Err(StepError::Build(format!(
                "script '{}' has no request",
                script.id
            )));
        };

        let req = build_request(template, params)?;
        debug!(script_id = %script.id, method = %req.method, url = %req.url, "sending request");

        let resp = self
            .http
            .send(req, self.config.timeout, self.config.max_response_bytes)
            .await?;
        let ctx = ResponseContext::new(&resp);
        debug!(script_id = %script.id, status = ctx.status, "response received");

        let failures = failed_assertions(&script.assertions, &ctx);
        let outcome = if failures.is_empty() {
            StepOutcome::pass()
        } else {
            StepOutcome::fail(failures.join("; "))
        };

        Ok(StepOutcome {
            output: response_to_json(&ctx),
            variables: extract_variables(&script.extract, &ctx),
            ..outcome
        })
    }
}
