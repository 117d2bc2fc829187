use std::collections::{HashMap, VecDeque};
use std::path::Path;
use std::sync::Arc;

use flowcase_core::types::{CaseRef, ComponentDefinition, SuiteDocument};
use flowcase_store::{DefinitionStore, MemoryStore, StoreError};
use serde::Serialize;

use crate::cmd::config::load_suite;
use crate::exit_codes;
use crate::output::{is_human, print_error, print_result};
use crate::OutputArgs;

#[derive(Serialize)]
struct ComponentNode {
    id: String,
    mode: &'static str,
    steps: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<ComponentNode>,
}

#[derive(Serialize)]
struct CaseStep {
    order: i64,
    kind: &'static str,
    id: String,
}

#[derive(Serialize)]
struct CaseNode {
    id: String,
    steps: Vec<CaseStep>,
}

#[derive(Serialize)]
struct TreeResult {
    components: Vec<ComponentNode>,
    cases: Vec<CaseNode>,
}

pub async fn tree_cmd(path: &Path, output: OutputArgs) -> i32 {
    let doc = match load_suite(path, &output) {
        Ok(doc) => doc,
        Err(code) => return code,
    };

    let result = match build_tree(&doc).await {
        Ok(r) => r,
        Err(e) => {
            print_error(output.format, output.quiet, &e.to_string());
            return exit_codes::VALIDATION_FAILED;
        }
    };

    if is_human(output.format, output.quiet) {
        println!("components:");
        for node in &result.components {
            print_component(node, 1);
        }
        println!("cases:");
        for case in &result.cases {
            println!("  {}", case.id);
            for step in &case.steps {
                println!("    {:>3}. {} {}", step.order, step.kind, step.id);
            }
        }
    } else {
        print_result(output.format, output.quiet, &result);
    }
    exit_codes::SUCCESS
}

async fn build_tree(doc: &SuiteDocument) -> Result<TreeResult, StoreError> {
    let store = MemoryStore::from_document(doc)?;
    let roots = store.roots()?;

    let mut definitions = HashMap::new();
    let mut children = HashMap::new();
    let mut queue: VecDeque<String> = roots.iter().cloned().collect();
    while let Some(id) = queue.pop_front() {
        let kids = store.children_of(&id).await?;
        queue.extend(kids.iter().cloned());
        if let Some(def) = store.get_component(&id).await? {
            definitions.insert(id.clone(), def);
        }
        children.insert(id, kids);
    }
    let components = roots
        .iter()
        .filter_map(|id| component_node(id, &definitions, &children))
        .collect();

    let cases = doc
        .cases
        .iter()
        .map(|case| CaseNode {
            id: case.id.clone(),
            steps: case
                .ordered_refs()
                .iter()
                .map(|r| CaseStep {
                    order: r.order(),
                    kind: match r {
                        CaseRef::Script(_) => "script",
                        CaseRef::Component(_) => "component",
                    },
                    id: r.id().to_string(),
                })
                .collect(),
        })
        .collect();

    Ok(TreeResult { components, cases })
}

fn component_node(
    id: &str,
    definitions: &HashMap<String, Arc<ComponentDefinition>>,
    children: &HashMap<String, Vec<String>>,
) -> Option<ComponentNode> {
    let def = definitions.get(id)?;
    Some(ComponentNode {
        id: id.to_string(),
        mode: def.mode.as_str(),
        steps: def
            .ordered_steps()
            .iter()
            .map(|s| s.script_id.clone())
            .collect(),
        children: children
            .get(id)
            .into_iter()
            .flatten()
            .filter_map(|child| component_node(child, definitions, children))
            .collect(),
    })
}

fn print_component(node: &ComponentNode, depth: usize) {
    let steps = match node.steps.len() {
        1 => "1 step".to_string(),
        n => format!("{n} steps"),
    };
    println!("{}{} [{}] {}", "  ".repeat(depth), node.id, node.mode, steps);
    for child in &node.children {
        print_component(child, depth + 1);
    }
}
