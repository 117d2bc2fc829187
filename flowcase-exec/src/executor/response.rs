use std::collections::BTreeMap;

use flowcase_core::expressions::{parse_response_expr, ResponseExpr};
use flowcase_core::types::ParamMap;
use serde_json::Value as JsonValue;
use serde_json_path::JsonPath;
use tracing::debug;

use crate::executor::http::HttpResponseParts;

#[derive(Clone)]
pub struct ResponseContext<'a> {
    pub status: u16,
    pub headers: &'a BTreeMap<String, String>,
    pub body: &'a [u8],
    pub body_json: Option<JsonValue>,
}

impl<'a> ResponseContext<'a> {
    pub fn new(resp: &'a HttpResponseParts) -> Self {
        Self {
            status: resp.status,
            headers: &resp.headers,
            body: &resp.body,
            body_json: parse_body_json(&resp.body),
        }
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(self.body).to_string()
    }

    /// The body as JSON when it parses, else as a string.
    pub fn body_value(&self) -> JsonValue {
        match &self.body_json {
            Some(j) => j.clone(),
            None => JsonValue::String(self.body_text()),
        }
    }
}

pub fn parse_body_json(body: &[u8]) -> Option<JsonValue> {
    let s = std::str::from_utf8(body).ok()?;
    serde_json::from_str(s).ok()
}

/// Evaluate a response expression; anything that cannot be found is `Null`.
pub fn resolve_response_expr(expr: &str, resp: &ResponseContext<'_>) -> JsonValue {
    let parsed = match parse_response_expr(expr) {
        Ok(p) => p,
        Err(_) => return JsonValue::Null,
    };

    match parsed {
        ResponseExpr::Status => JsonValue::Number(resp.status.into()),
        ResponseExpr::Header(name) => resp
            .headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(&name))
            .map(|(_, v)| JsonValue::String(v.clone()))
            .unwrap_or(JsonValue::Null),
        ResponseExpr::Body { pointer: None } => resp.body_value(),
        ResponseExpr::Body { pointer: Some(ptr) } => resp
            .body_json
            .as_ref()
            .and_then(|j| j.pointer(&ptr))
            .cloned()
            .unwrap_or(JsonValue::Null),
        ResponseExpr::JsonPath(path) => {
            let (Some(json), Ok(path)) = (&resp.body_json, JsonPath::parse(&path)) else {
                return JsonValue::Null;
            };
            path.query(json)
                .all()
                .first()
                .map(|v| (*v).clone())
                .unwrap_or(JsonValue::Null)
        }
    }
}

/// Apply `extract` rules; expressions that find nothing are left out.
pub fn extract_variables(rules: &BTreeMap<String, String>, resp: &ResponseContext<'_>) -> ParamMap {
    let mut vars = ParamMap::new();
    for (name, expr) in rules {
        match resolve_response_expr(expr, resp) {
            JsonValue::Null => debug!(variable = %name, expr = %expr, "extraction found nothing"),
            value => {
                vars.insert(name.clone(), value);
            }
        }
    }
    vars
}

pub fn response_to_json(resp: &ResponseContext<'_>) -> JsonValue {
    serde_json::json!({
        "status": resp.status,
        "headers": resp.headers,
        "body": resp.body_value(),
    })
}
