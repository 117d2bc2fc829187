use flowcase_core::types::{Assertion, AssertionKind};
use regex::Regex;
use serde_json::Value as JsonValue;
use serde_json_path::JsonPath;

use super::response::{resolve_response_expr, ResponseContext};

const DEFAULT_CONTEXT: &str = "$body";

/// Failure messages for every assertion that does not hold.
///
/// With no assertions the status code must be 2xx.
pub fn failed_assertions(assertions: &[Assertion], resp: &ResponseContext<'_>) -> Vec<String> {
    if assertions.is_empty() {
        if (200..300).contains(&resp.status) {
            return Vec::new();
        }
        return vec![format!("expected a 2xx status, got {}", resp.status)];
    }
    assertions
        .iter()
        .filter(|a| !evaluate_assertion(a, resp))
        .map(|a| format!("assertion failed: {}", a.condition.trim()))
        .collect()
}

fn evaluate_assertion(a: &Assertion, resp: &ResponseContext<'_>) -> bool {
    match a.kind {
        AssertionKind::Simple => evaluate_simple(a, resp),
        AssertionKind::Jsonpath => evaluate_jsonpath(a, resp),
        AssertionKind::Regex => evaluate_regex(a, resp),
    }
}

fn evaluate_simple(a: &Assertion, resp: &ResponseContext<'_>) -> bool {
    let cond = a.condition.trim();

    // <expr> <op> <literal>
    let ops = ["==", "!=", "<=", ">=", "<", ">"];
    for op in ops {
        if let Some((lhs, rhs)) = cond.split_once(op) {
            let lhs_val = resolve_response_expr(lhs.trim(), resp);
            let rhs_val = parse_literal(rhs.trim());
            return compare_values(&lhs_val, &rhs_val, op);
        }
    }

    false
}

fn evaluate_jsonpath(a: &Assertion, resp: &ResponseContext<'_>) -> bool {
    let context_expr = a.context.as_deref().unwrap_or(DEFAULT_CONTEXT);
    let context_json = resolve_response_expr(context_expr, resp);
    if context_json.is_null() {
        return false;
    }

    let condition = a.condition.trim();

    // Filters need an array to select from.
    let query_target = if condition.contains("[?") && !context_json.is_array() {
        JsonValue::Array(vec![context_json])
    } else {
        context_json
    };

    if !condition.starts_with("$[?") {
        for op in ["==", "!="] {
            if let Some((path, expected)) = condition.split_once(op) {
                let Ok(jsonpath) = JsonPath::parse(path.trim()) else {
                    return false;
                };
                let nodes = jsonpath.query(&query_target).all();
                let Some(actual) = nodes.first() else {
                    return false;
                };
                return compare_values(actual, &parse_literal(expected), op);
            }
        }
    }

    // Filter expression or existence check.
    match JsonPath::parse(condition) {
        Ok(p) => !p.query(&query_target).all().is_empty(),
        Err(_) => false,
    }
}

fn evaluate_regex(a: &Assertion, resp: &ResponseContext<'_>) -> bool {
    let context_expr = a.context.as_deref().unwrap_or(DEFAULT_CONTEXT);
    let context_str = match resolve_response_expr(context_expr, resp) {
        JsonValue::String(s) => s,
        JsonValue::Null => return false,
        v => v.to_string(),
    };

    Regex::new(a.condition.trim())
        .map(|re| re.is_match(&context_str))
        .unwrap_or(false)
}

fn parse_literal(s: &str) -> JsonValue {
    let s = s.trim();

    if let Ok(v) = serde_json::from_str::<JsonValue>(s) {
        return v;
    }

    if s.len() >= 2
        && ((s.starts_with('"') && s.ends_with('"')) || (s.starts_with('\'') && s.ends_with('\'')))
    {
        return JsonValue::String(s[1..s.len() - 1].to_string());
    }

    JsonValue::String(s.to_string())
}

fn compare_values(actual: &JsonValue, expected: &JsonValue, op: &str) -> bool {
    match op {
        "==" => json_eq(actual, expected),
        "!=" => !json_eq(actual, expected),
        "<" => json_cmp(actual, expected).is_some_and(|o| o.is_lt()),
        ">" => json_cmp(actual, expected).is_some_and(|o| o.is_gt()),
        "<=" => json_cmp(actual, expected).is_some_and(|o| o.is_le()),
        ">=" => json_cmp(actual, expected).is_some_and(|o| o.is_ge()),
        _ => false,
    }
}

fn json_eq(a: &JsonValue, b: &JsonValue) -> bool {
    match (a, b) {
        (JsonValue::Null, JsonValue::Null) => true,
        (JsonValue::Bool(a), JsonValue::Bool(b)) => a == b,
        (JsonValue::Number(a), JsonValue::Number(b)) => a.as_f64() == b.as_f64(),
        (JsonValue::String(a), JsonValue::String(b)) => a == b,
        // Header values are text; compare them to numeric literals by value.
        (JsonValue::String(s), JsonValue::Number(n)) | (JsonValue::Number(n), JsonValue::String(s)) => {
            s.trim().parse::<f64>().ok() == n.as_f64()
        }
        (JsonValue::Array(a), JsonValue::Array(b)) => {
            a.len() == b.len() && a.iter().zip(b.iter()).all(|(x, y)| json_eq(x, y))
        }
        (JsonValue::Object(a), JsonValue::Object(b)) => {
            a.len() == b.len()
                && a.iter().all(|(k, v)| b.get(k).is_some_and(|bv| json_eq(v, bv)))
        }
        _ => false,
    }
}

fn json_cmp(a: &JsonValue, b: &JsonValue) -> Option<std::cmp::Ordering> {
    let num = |v: &JsonValue| match v {
        JsonValue::String(s) => s.trim().parse::<f64>().ok(),
        other => other.as_f64(),
    };
    num(a)?.partial_cmp(&num(b)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn make_resp(status: u16, body: &str) -> ResponseContext<'static> {
        let body_bytes: &'static [u8] = Box::leak(body.as_bytes().to_vec().into_boxed_slice());
        let mut headers = BTreeMap::new();
        headers.insert("X-Rate-Remaining".to_string(), "17".to_string());
        let headers: &'static BTreeMap<String, String> = Box::leak(Box::new(headers));
        ResponseContext {
            status,
            headers,
            body: body_bytes,
            body_json: serde_json::from_str(body).ok(),
        }
    }

    fn assertion(kind: AssertionKind, context: Option<&str>, condition: &str) -> Assertion {
        Assertion {
            context: context.map(String::from),
            condition: condition.to_string(),
            kind,
        }
    }

    #[test]
    fn test_simple_status_code() {
        let resp = make_resp(201, "{}");
        assert!(evaluate_assertion(&Assertion::simple("$status == 201"), &resp));
        assert!(evaluate_assertion(&Assertion::simple("$statusCode < 300"), &resp));
        assert!(!evaluate_assertion(&Assertion::simple("$status >= 400"), &resp));
    }

    #[test]
    fn test_simple_header_and_pointer() {
        let resp = make_resp(200, r#"{"user": {"name": "ada"}}"#);
        assert!(evaluate_assertion(&Assertion::simple("$header.x-rate-remaining > 10"), &resp));
        assert!(evaluate_assertion(&Assertion::simple(r#"$body#/user/name == "ada""#), &resp));
        assert!(evaluate_assertion(&Assertion::simple("$.user.name == 'ada'"), &resp));
    }

    #[test]
    fn test_no_assertions_requires_2xx() {
        assert!(failed_assertions(&[], &make_resp(204, "")).is_empty());
        let failures = failed_assertions(&[], &make_resp(500, ""));
        assert_eq!(failures, vec!["expected a 2xx status, got 500".to_string()]);
    }

    #[test]
    fn test_failure_messages_name_the_condition() {
        let resp = make_resp(200, "{}");
        let failures = failed_assertions(
            &[Assertion::simple("$status == 200"), Assertion::simple("$status == 404")],
            &resp,
        );
        assert_eq!(failures, vec!["assertion failed: $status == 404".to_string()]);
    }

    #[test]
    fn test_jsonpath_boolean() {
        let resp = make_resp(200, r#"{"authenticated": true}"#);
        let a = assertion(AssertionKind::Jsonpath, None, "$.authenticated == true");
        assert!(evaluate_assertion(&a, &resp));
    }

    #[test]
    fn test_jsonpath_string() {
        let resp = make_resp(200, r#"{"user": "testuser"}"#);
        let a = assertion(AssertionKind::Jsonpath, Some("$body"), r#"$.user == "testuser""#);
        assert!(evaluate_assertion(&a, &resp));
    }

    #[test]
    fn test_jsonpath_filter_existence() {
        let resp = make_resp(200, r#"{"origin": "1.2.3.4"}"#);
        let a = assertion(AssertionKind::Jsonpath, None, "$[?(@.origin)]");
        assert!(evaluate_assertion(&a, &resp), "filter existence check should pass");

        let resp = make_resp(200, r#"{"other": "value"}"#);
        assert!(!evaluate_assertion(&a, &resp), "filter should fail when field missing");
    }

    #[test]
    fn test_regex() {
        let resp = make_resp(200, "hello world");
        let a = assertion(AssertionKind::Regex, None, "^hello.*");
        assert!(evaluate_assertion(&a, &resp));

        let a = assertion(AssertionKind::Regex, Some("$header.x-rate-remaining"), r"^\d+$");
        assert!(evaluate_assertion(&a, &resp));
    }
}
