use std::path::Path;

use flowcase_store::{ensure_acyclic, DefinitionKind, DefinitionStore, MemoryStore, StoreError};
use serde::Serialize;

use crate::cmd::config::load_suite;
use crate::exit_codes;
use crate::output::{is_human, print_error, print_result};
use crate::OutputArgs;

#[derive(Serialize)]
struct CheckParentResult {
    component: String,
    current_parent: Option<String>,
    proposed_parent: Option<String>,
    allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    reason: Option<String>,
}

pub async fn check_parent_cmd(
    path: &Path,
    component: &str,
    parent: Option<&str>,
    output: OutputArgs,
) -> i32 {
    let doc = match load_suite(path, &output) {
        Ok(doc) => doc,
        Err(code) => return code,
    };
    let store = match MemoryStore::from_document(&doc) {
        Ok(s) => s,
        Err(e) => {
            print_error(output.format, output.quiet, &e.to_string());
            return exit_codes::VALIDATION_FAILED;
        }
    };

    let current_parent = match lookup(&store, component, parent).await {
        Ok(current) => current,
        Err(e) => {
            print_error(output.format, output.quiet, &e.to_string());
            return exit_codes::VALIDATION_FAILED;
        }
    };

    let verdict = match parent {
        Some(p) => ensure_acyclic(&store, p, Some(component)).await,
        None => Ok(()),
    };
    let (allowed, reason) = match verdict {
        Ok(()) => (true, None),
        Err(e @ StoreError::CycleDetected { .. }) => (false, Some(e.to_string())),
        Err(e) => {
            print_error(output.format, output.quiet, &e.to_string());
            return exit_codes::RUNTIME_ERROR;
        }
    };

    let result = CheckParentResult {
        component: component.to_string(),
        current_parent,
        proposed_parent: parent.map(String::from),
        allowed,
        reason,
    };
    if is_human(output.format, output.quiet) {
        let target = parent.unwrap_or("<root>");
        match &result.reason {
            None => println!("ok: '{component}' can be placed under {target}"),
            Some(reason) => println!("rejected: {reason}"),
        }
    } else {
        print_result(output.format, output.quiet, &result);
    }

    if allowed {
        exit_codes::SUCCESS
    } else {
        exit_codes::VALIDATION_FAILED
    }
}

/// Both components must exist; returns the subject's current parent.
async fn lookup(
    store: &MemoryStore,
    component: &str,
    parent: Option<&str>,
) -> Result<Option<String>, StoreError> {
    let ids = std::iter::once(component).chain(parent);
    for id in ids {
        if store.get_component(id).await?.is_none() {
            return Err(StoreError::NotFound {
                kind: DefinitionKind::Component,
                id: id.to_string(),
            });
        }
    }
    store.parent_of(component).await
}
