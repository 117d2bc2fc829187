use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use flowcase_core::types::{ParamMap, ScriptDefinition};
use flowcase_exec::executor::{
    HttpClient, HttpError, HttpRequestParts, HttpResponseParts, HttpRunnerConfig, HttpStepRunner,
    StepError, StepRunner,
};
use serde_json::json;

/// Records every request and answers with a fixed response.
struct CannedClient {
    status: u16,
    body: String,
    seen: Mutex<Vec<HttpRequestParts>>,
}

impl CannedClient {
    fn new(status: u16, body: &str) -> Arc<Self> {
        Arc::new(Self {
            status,
            body: body.to_string(),
            seen: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl HttpClient for CannedClient {
    async fn send(
        &self,
        req: HttpRequestParts,
        _timeout: Duration,
        _max_response_bytes: usize,
    ) -> Result<HttpResponseParts, HttpError> {
        self.seen.lock().unwrap().push(req);
        let mut headers = BTreeMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());
        headers.insert("x-request-id".to_string(), "req-7".to_string());
        Ok(HttpResponseParts {
            status: self.status,
            headers,
            body: self.body.clone().into_bytes(),
        })
    }
}

struct DownClient;

#[async_trait]
impl HttpClient for DownClient {
    async fn send(
        &self,
        _req: HttpRequestParts,
        _timeout: Duration,
        _max_response_bytes: usize,
    ) -> Result<HttpResponseParts, HttpError> {
        Err(HttpError::Network("connection refused".to_string()))
    }
}

fn script(yaml: &str) -> ScriptDefinition {
    serde_yaml::from_str(yaml).unwrap()
}

fn runner(client: Arc<dyn HttpClient>) -> HttpStepRunner {
    HttpStepRunner::with_client(client, HttpRunnerConfig::default())
}

#[tokio::test]
async fn renders_request_from_params() {
    let client = CannedClient::new(200, "{}");
    let s = script(
        r#"
id: create_user
request:
  method: post
  url: "${base}/users"
  headers: { Authorization: "Bearer ${token}" }
  query: { tag: [a, b], skip: null }
  body: { name: "${name}" }
"#,
    );
    let params: ParamMap = serde_json::from_value(json!({
        "base": "https://api.test",
        "token": "t0k",
        "name": "ada",
    }))
    .unwrap();

    let outcome = runner(client.clone()).execute(&s, &params).await.unwrap();
    assert!(outcome.passed);

    let seen = client.seen.lock().unwrap();
    let req = &seen[0];
    assert_eq!(req.method, "POST");
    assert_eq!(req.url.as_str(), "https://api.test/users?tag=a&tag=b");
    assert_eq!(req.headers["Authorization"], "Bearer t0k");
    assert_eq!(req.headers["Content-Type"], "application/json");
    let body: serde_json::Value = serde_json::from_slice(&req.body).unwrap();
    assert_eq!(body, json!({"name": "ada"}));
}

#[tokio::test]
async fn assertions_and_extraction() {
    let client = CannedClient::new(201, r#"{"id": 42, "user": {"name": "ada"}}"#);
    let s = script(
        r#"
id: create_user
request: { url: "https://api.test/users" }
assertions:
  - condition: "$status == 201"
  - kind: jsonpath
    condition: "$.user.name == 'ada'"
extract:
  user_id: "$body#/id"
  request_id: "$header.x-request-id"
  missing: "$body#/nope"
"#,
    );

    let outcome = runner(client).execute(&s, &ParamMap::new()).await.unwrap();
    assert!(outcome.passed, "{:?}", outcome.error);
    assert_eq!(outcome.variables.get("user_id"), Some(&json!(42)));
    assert_eq!(outcome.variables.get("request_id"), Some(&json!("req-7")));
    assert!(!outcome.variables.contains_key("missing"));
    assert_eq!(outcome.output["status"], 201);
    assert_eq!(outcome.output["body"]["user"]["name"], "ada");
}

#[tokio::test]
async fn failed_assertion_is_reported_not_raised() {
    let client = CannedClient::new(200, r#"{"ok": false}"#);
    let s = script(
        r#"
id: health
request: { url: "https://api.test/health" }
assertions:
  - condition: "$status == 200"
  - condition: "$body#/ok == true"
"#,
    );

    let outcome = runner(client).execute(&s, &ParamMap::new()).await.unwrap();
    assert!(!outcome.passed);
    assert_eq!(outcome.error.as_deref(), Some("assertion failed: $body#/ok == true"));
}

#[tokio::test]
async fn without_assertions_a_2xx_is_required() {
    let s = script("id: ping\nrequest: { url: \"https://api.test/ping\" }\n");

    let ok = runner(CannedClient::new(204, "")).execute(&s, &ParamMap::new()).await.unwrap();
    assert!(ok.passed);

    let bad = runner(CannedClient::new(503, "")).execute(&s, &ParamMap::new()).await.unwrap();
    assert!(!bad.passed);
    assert_eq!(bad.error.as_deref(), Some("expected a 2xx status, got 503"));
}

#[tokio::test]
async fn build_and_transport_errors_surface_as_step_errors() {
    let no_request = script("id: empty\n");
    let err = runner(CannedClient::new(200, "{}"))
        .execute(&no_request, &ParamMap::new())
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "request build failed: script 'empty' has no request");

    let bad_url = script("id: bad\nrequest: { url: \"${host}/x\" }\n");
    let err = runner(CannedClient::new(200, "{}"))
        .execute(&bad_url, &ParamMap::new())
        .await
        .unwrap_err();
    assert!(matches!(err, StepError::Build(_)), "{err}");

    let ok = script("id: ok\nrequest: { url: \"https://api.test/\" }\n");
    let err = runner(Arc::new(DownClient))
        .execute(&ok, &ParamMap::new())
        .await
        .unwrap_err();
    assert!(matches!(err, StepError::Http(HttpError::Network(_))));
}
