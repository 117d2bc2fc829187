use std::collections::HashSet;

use crate::types::CaseDefinition;
use crate::validate::validator::Validator;

pub(crate) fn validate_case(
    v: &mut Validator,
    case: &CaseDefinition,
    path: &str,
    script_ids: &HashSet<String>,
    component_ids: &HashSet<String>,
) {
    for (idx, r) in case.scripts.iter().enumerate() {
        if !script_ids.contains(&r.script_id) {
            v.push(
                format!("{path}.scripts[{idx}].script"),
                format!("unknown script '{}'", r.script_id),
            );
        }
    }
    for (idx, r) in case.components.iter().enumerate() {
        if !component_ids.contains(&r.component_id) {
            v.push(
                format!("{path}.components[{idx}].component"),
                format!("unknown component '{}'", r.component_id),
            );
        }
    }
    if case.scripts.iter().all(|r| !r.enabled) && case.components.iter().all(|r| !r.enabled) {
        v.push(path, "case has no enabled steps");
    }
}
