use std::collections::HashSet;

use crate::expressions::parse_response_expr;
use crate::types::ScriptDefinition;
use crate::validate::rules::assertions;
use crate::validate::validator::Validator;

pub(crate) fn validate_script(v: &mut Validator, script: &ScriptDefinition, path: &str) {
    let mut names = HashSet::<&str>::new();
    for (idx, p) in script.parameters.iter().enumerate() {
        let ppath = format!("{path}.parameters[{idx}]");
        if p.name.trim().is_empty() {
            v.push(format!("{ppath}.name"), "must not be empty");
        }
        if !names.insert(p.name.as_str()) {
            v.push(format!("{ppath}.name"), "duplicate parameter name");
        }
    }

    let mut outputs = HashSet::<&str>::new();
    for (idx, name) in script.output_variables.iter().enumerate() {
        if name.trim().is_empty() {
            v.push(format!("{path}.outputs[{idx}]"), "must not be empty");
        } else if !outputs.insert(name.as_str()) {
            v.push(format!("{path}.outputs[{idx}]"), "duplicate output name");
        }
    }

    if let Some(request) = &script.request {
        if request.url.trim().is_empty() {
            v.push(format!("{path}.request.url"), "must not be empty");
        }
        if request.method.trim().is_empty() {
            v.push(format!("{path}.request.method"), "must not be empty");
        }
    }

    for (idx, a) in script.assertions.iter().enumerate() {
        assertions::validate_assertion(v, a, &format!("{path}.assertions[{idx}]"));
    }

    for (name, expr) in &script.extract {
        if let Err(e) = parse_response_expr(expr) {
            v.push(format!("{path}.extract.{name}"), format!("invalid response expression: {e}"));
        }
    }
}
