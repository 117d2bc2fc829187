use std::collections::HashSet;

use tracing::warn;

use super::trait_store::{DefinitionStore, StoreError};

/// Visited-set bookkeeping shared by the sync and async walkers.
struct AncestorWalk<'a> {
    subject: &'a str,
    visited: HashSet<String>,
}

impl<'a> AncestorWalk<'a> {
    fn new(subject: &'a str) -> Self {
        Self {
            subject,
            visited: HashSet::new(),
        }
    }

    /// Returns `true` when entering `id` proves a cycle: either the subject
    /// itself was reached or the existing chain already loops.
    fn enters_cycle(&mut self, id: &str) -> bool {
        if id == self.subject {
            return true;
        }
        if !self.visited.insert(id.to_string()) {
            warn!(component_id = id, "pre-existing cycle in component parent chain");
            return true;
        }
        false
    }
}

/// Would making `proposed_parent` the parent of `subject` create a cycle?
///
/// `subject == None` means a brand-new component, which can never close a
/// cycle. Cost is proportional to the depth of `proposed_parent`.
pub async fn would_create_cycle(
    store: &dyn DefinitionStore,
    proposed_parent: &str,
    subject: Option<&str>,
) -> Result<bool, StoreError> {
    let Some(subject) = subject else {
        return Ok(false);
    };

    let mut walk = AncestorWalk::new(subject);
    let mut current = proposed_parent.to_string();
    loop {
        if walk.enters_cycle(&current) {
            return Ok(true);
        }
        match store.parent_of(&current).await? {
            Some(parent) => current = parent,
            None => return Ok(false),
        }
    }
}

/// Like [`would_create_cycle`], but a cycle is a rejected operation.
pub async fn ensure_acyclic(
    store: &dyn DefinitionStore,
    proposed_parent: &str,
    subject: Option<&str>,
) -> Result<(), StoreError> {
    if would_create_cycle(store, proposed_parent, subject).await? {
        return Err(StoreError::CycleDetected {
            parent: proposed_parent.to_string(),
            subject: subject.unwrap_or_default().to_string(),
        });
    }
    Ok(())
}

/// Synchronous walk for stores that check while already holding their own lock.
pub(crate) fn would_create_cycle_with(
    proposed_parent: &str,
    subject: Option<&str>,
    mut parent_of: impl FnMut(&str) -> Option<String>,
) -> bool {
    let Some(subject) = subject else {
        return false;
    };

    let mut walk = AncestorWalk::new(subject);
    let mut current = proposed_parent.to_string();
    loop {
        if walk.enters_cycle(&current) {
            return true;
        }
        match parent_of(&current) {
            Some(parent) => current = parent,
            None => return false,
        }
    }
}
