use std::collections::HashSet;

use crate::types::ComponentDefinition;
use crate::validate::validator::Validator;

pub(crate) fn validate_component(
    v: &mut Validator,
    component: &ComponentDefinition,
    path: &str,
    script_ids: &HashSet<String>,
    component_ids: &HashSet<String>,
) {
    if let Some(parent) = &component.parent_id {
        if parent == &component.id {
            v.push(format!("{path}.parent"), "component cannot be its own parent");
        } else if !component_ids.contains(parent) {
            v.push(format!("{path}.parent"), format!("unknown component '{parent}'"));
        }
    }

    for (idx, step) in component.steps.iter().enumerate() {
        let spath = format!("{path}.steps[{idx}]");
        if !script_ids.contains(&step.script_id) {
            v.push(
                format!("{spath}.script"),
                format!("unknown script '{}'", step.script_id),
            );
        }
        if step.skip_on_condition_false && step.condition.is_none() {
            v.push(
                format!("{spath}.skip_on_condition_false"),
                "has no effect without a condition",
            );
        }
    }
}
