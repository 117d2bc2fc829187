use std::collections::{HashMap, HashSet};

use crate::types::SuiteDocument;
use crate::validate::rules::{case, component, script};
use crate::validate::validator::Validator;

pub(crate) fn validate_document(v: &mut Validator, doc: &SuiteDocument) {
    if let Some(version) = &doc.version {
        if version.trim() != "1" && !version.trim().starts_with("1.") {
            v.push("$.version", "only suite format version 1 is supported");
        }
    }

    let mut script_ids = HashSet::<String>::new();
    for (idx, s) in doc.scripts.iter().enumerate() {
        let path = format!("$.scripts[{idx}]");
        v.validate_id(&format!("{path}.id"), &s.id, &mut script_ids);
        script::validate_script(v, s, &path);
    }

    let mut component_ids = HashSet::<String>::new();
    for (idx, c) in doc.components.iter().enumerate() {
        let path = format!("$.components[{idx}]");
        v.validate_id(&format!("{path}.id"), &c.id, &mut component_ids);
    }
    for (idx, c) in doc.components.iter().enumerate() {
        let path = format!("$.components[{idx}]");
        component::validate_component(v, c, &path, &script_ids, &component_ids);
    }
    validate_parent_chains(v, doc);

    let mut case_ids = HashSet::<String>::new();
    for (idx, c) in doc.cases.iter().enumerate() {
        let path = format!("$.cases[{idx}]");
        v.validate_id(&format!("{path}.id"), &c.id, &mut case_ids);
        case::validate_case(v, c, &path, &script_ids, &component_ids);
    }
}

/// Every parent chain must end at a root; report each component that sits on a cycle once.
fn validate_parent_chains(v: &mut Validator, doc: &SuiteDocument) {
    let parents: HashMap<&str, &str> = doc
        .components
        .iter()
        .filter_map(|c| c.parent_id.as_deref().map(|p| (c.id.as_str(), p)))
        .collect();

    let mut reported = HashSet::<&str>::new();
    for (idx, c) in doc.components.iter().enumerate() {
        if c.parent_id.as_deref() == Some(c.id.as_str()) {
            continue;
        }
        let mut visited = HashSet::<&str>::new();
        let mut cur = c.id.as_str();
        visited.insert(cur);
        while let Some(&parent) = parents.get(cur) {
            if parent == c.id {
                if reported.insert(c.id.as_str()) {
                    v.push(
                        format!("$.components[{idx}].parent"),
                        format!("component '{}' is its own ancestor", c.id),
                    );
                }
                break;
            }
            if !visited.insert(parent) {
                // Cycle above this component; it is reported on its own members.
                break;
            }
            cur = parent;
        }
    }
}
