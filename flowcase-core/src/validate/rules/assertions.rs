use crate::expressions::parse_response_expr;
use crate::types::{Assertion, AssertionKind};
use crate::validate::validator::Validator;

const OPERATORS: [&str; 6] = ["==", "!=", "<=", ">=", "<", ">"];

pub(crate) fn validate_assertion(v: &mut Validator, a: &Assertion, path: &str) {
    let condition = a.condition.trim();
    if condition.is_empty() {
        v.push(format!("{path}.condition"), "must not be empty");
        return;
    }

    if let Some(ctx) = &a.context {
        if let Err(e) = parse_response_expr(ctx) {
            v.push(format!("{path}.context"), format!("invalid response expression: {e}"));
        }
    }

    match a.kind {
        AssertionKind::Simple => {
            let Some(lhs) = OPERATORS
                .iter()
                .find_map(|op| condition.split_once(op).map(|(lhs, _)| lhs))
            else {
                v.push(
                    format!("{path}.condition"),
                    "simple assertions must have the form '<expr> <op> <literal>'",
                );
                return;
            };
            if let Err(e) = parse_response_expr(lhs) {
                v.push(format!("{path}.condition"), format!("invalid response expression: {e}"));
            }
        }
        AssertionKind::Jsonpath => {
            if !condition.starts_with('$') {
                v.push(format!("{path}.condition"), "jsonpath conditions must start with '$'");
            }
        }
        AssertionKind::Regex => {
            if let Err(e) = regex::Regex::new(condition) {
                v.push(format!("{path}.condition"), format!("invalid regex: {e}"));
            }
        }
    }
}
