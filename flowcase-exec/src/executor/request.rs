use std::collections::BTreeMap;

use flowcase_core::expressions::VariableResolver;
use flowcase_core::types::{ParamMap, ParamValue, RequestTemplate};
use url::Url;

use crate::executor::http::HttpRequestParts;
use crate::executor::step_runner::StepError;

/// Render a script's request template with its resolved parameters.
pub fn build_request(
    template: &RequestTemplate,
    params: &ParamMap,
) -> Result<HttpRequestParts, StepError> {
    let resolver = VariableResolver::new(params);

    let method = resolver.render(template.method.trim()).to_ascii_uppercase();
    let raw_url = resolver.render(template.url.trim());
    let mut url = Url::parse(&raw_url)
        .map_err(|e| StepError::Build(format!("invalid url '{raw_url}': {e}")))?;

    if !template.query.is_empty() {
        let query = resolver.resolve_map(&template.query);
        let mut pairs = url.query_pairs_mut();
        for (name, value) in &query {
            match value {
                ParamValue::Null => {}
                ParamValue::Array(items) => {
                    for item in items {
                        pairs.append_pair(name, &value_to_string(item));
                    }
                }
                other => {
                    pairs.append_pair(name, &value_to_string(other));
                }
            }
        }
    }

    let mut headers = BTreeMap::<String, String>::new();
    for (name, value) in &template.headers {
        headers.insert(name.clone(), resolver.render(value));
    }

    let body = match &template.body {
        None => Vec::new(),
        Some(ParamValue::String(s)) => resolver.render(s).into_bytes(),
        Some(value) => {
            let resolved = resolver.resolve(value);
            if !headers.keys().any(|k| k.eq_ignore_ascii_case("content-type")) {
                headers.insert("Content-Type".to_string(), "application/json".to_string());
            }
            serde_json::to_vec(&resolved)
                .map_err(|e| StepError::Build(format!("failed to serialize request body: {e}")))?
        }
    };

    Ok(HttpRequestParts {
        method,
        url,
        headers,
        body,
    })
}

fn value_to_string(v: &ParamValue) -> String {
    match v {
        ParamValue::String(s) => s.clone(),
        ParamValue::Null => String::new(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn template(url: &str) -> RequestTemplate {
        RequestTemplate {
            method: "post".to_string(),
            url: url.to_string(),
            headers: BTreeMap::new(),
            query: ParamMap::new(),
            body: None,
        }
    }

    #[test]
    fn renders_url_query_and_json_body() {
        let mut t = template("${base}/users/${id}");
        t.query.insert("tag".to_string(), json!(["a", "${id}"]));
        t.query.insert("skip".to_string(), json!(null));
        t.headers.insert("X-Token".to_string(), "Bearer ${token}".to_string());
        t.body = Some(json!({"id": "${id}", "active": true}));

        let params: ParamMap = [
            ("base".to_string(), json!("https://api.test")),
            ("id".to_string(), json!(42)),
            ("token".to_string(), json!("t0k")),
        ]
        .into_iter()
        .collect();

        let req = build_request(&t, &params).unwrap();
        assert_eq!(req.method, "POST");
        assert_eq!(req.url.as_str(), "https://api.test/users/42?tag=a&tag=42");
        assert_eq!(req.headers.get("X-Token").map(String::as_str), Some("Bearer t0k"));
        assert_eq!(
            req.headers.get("Content-Type").map(String::as_str),
            Some("application/json")
        );
        let body: serde_json::Value = serde_json::from_slice(&req.body).unwrap();
        assert_eq!(body, json!({"id": "42", "active": true}));
    }

    #[test]
    fn unresolved_url_is_a_build_error() {
        let err = build_request(&template("${base}/x"), &ParamMap::new()).unwrap_err();
        assert!(matches!(err, StepError::Build(_)));
    }
}
