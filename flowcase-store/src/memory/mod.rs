use std::collections::HashMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use flowcase_core::types::{CaseDefinition, ComponentDefinition, ScriptDefinition, SuiteDocument};
use tracing::debug;

use crate::store::{would_create_cycle_with, DefinitionKind, DefinitionStore, StoreError};

struct ComponentNode {
    def: Arc<ComponentDefinition>,
    children: Vec<String>,
}

#[derive(Default)]
struct Arena {
    scripts: HashMap<String, Arc<ScriptDefinition>>,
    components: HashMap<String, ComponentNode>,
    cases: HashMap<String, Arc<CaseDefinition>>,
    /// Root components in insertion order.
    roots: Vec<String>,
}

impl Arena {
    fn parent_of(&self, id: &str) -> Option<String> {
        self.components
            .get(id)
            .and_then(|n| n.def.parent_id.clone())
    }

    fn require_component(&self, id: &str) -> Result<(), StoreError> {
        if self.components.contains_key(id) {
            Ok(())
        } else {
            Err(not_found(DefinitionKind::Component, id))
        }
    }

    fn attach(&mut self, id: &str, parent: Option<&str>) {
        match parent.and_then(|p| self.components.get_mut(p)) {
            Some(node) => node.children.push(id.to_string()),
            None => self.roots.push(id.to_string()),
        }
    }

    fn detach(&mut self, id: &str, parent: Option<&str>) {
        match parent.and_then(|p| self.components.get_mut(p)) {
            Some(node) => node.children.retain(|c| c != id),
            None => self.roots.retain(|c| c != id),
        }
    }
}

/// In-memory arena owning every definition.
///
/// Components are addressed by id; each node stores its parent id and the
/// ordered ids of its children. Parent assignments go through the cycle
/// guard, and removing a component removes its whole subtree.
#[derive(Default)]
pub struct MemoryStore {
    arena: RwLock<Arena>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load every definition of a suite document.
    ///
    /// Components are inserted parents-first, so unknown parents and parent
    /// cycles are rejected exactly as they would be by [`MemoryStore::insert_component`].
    pub fn from_document(doc: &SuiteDocument) -> Result<Self, StoreError> {
        let store = Self::new();
        for script in &doc.scripts {
            store.insert_script(script.clone())?;
        }

        let mut pending: Vec<&ComponentDefinition> = doc.components.iter().collect();
        while !pending.is_empty() {
            let before = pending.len();
            let mut deferred = Vec::new();
            for c in pending {
                let parent_ready = match &c.parent_id {
                    None => true,
                    Some(p) => store.contains_component(p)?,
                };
                if parent_ready {
                    store.insert_component(c.clone())?;
                } else {
                    deferred.push(c);
                }
            }
            if deferred.len() == before {
                return Err(unplaceable(doc, &deferred));
            }
            pending = deferred;
        }

        for case in &doc.cases {
            store.insert_case(case.clone())?;
        }
        Ok(store)
    }

    pub fn insert_script(&self, script: ScriptDefinition) -> Result<(), StoreError> {
        let mut arena = self.write()?;
        if arena.scripts.contains_key(&script.id) {
            return Err(duplicate(DefinitionKind::Script, &script.id));
        }
        debug!(script_id = %script.id, "script inserted");
        arena.scripts.insert(script.id.clone(), Arc::new(script));
        Ok(())
    }

    pub fn insert_case(&self, case: CaseDefinition) -> Result<(), StoreError> {
        let mut arena = self.write()?;
        if arena.cases.contains_key(&case.id) {
            return Err(duplicate(DefinitionKind::Case, &case.id));
        }
        debug!(case_id = %case.id, "case inserted");
        arena.cases.insert(case.id.clone(), Arc::new(case));
        Ok(())
    }

    /// Insert a component, linking it under its declared parent.
    pub fn insert_component(&self, component: ComponentDefinition) -> Result<(), StoreError> {
        let mut arena = self.write()?;
        if arena.components.contains_key(&component.id) {
            return Err(duplicate(DefinitionKind::Component, &component.id));
        }
        if let Some(parent) = component.parent_id.as_deref() {
            // A new component has no descendants, so only self-parenting can loop.
            if parent == component.id {
                return Err(cycle(parent, &component.id));
            }
            arena.require_component(parent)?;
            if would_create_cycle_with(parent, Some(component.id.as_str()), |id| {
                arena.parent_of(id)
            }) {
                return Err(cycle(parent, &component.id));
            }
        }

        let id = component.id.clone();
        let parent = component.parent_id.clone();
        arena.components.insert(
            id.clone(),
            ComponentNode {
                def: Arc::new(component),
                children: Vec::new(),
            },
        );
        arena.attach(&id, parent.as_deref());
        debug!(component_id = %id, parent_id = ?parent, "component inserted");
        Ok(())
    }

    /// Move a component under `new_parent`, or make it a root with `None`.
    pub fn set_parent(&self, id: &str, new_parent: Option<&str>) -> Result<(), StoreError> {
        let mut arena = self.write()?;
        arena.require_component(id)?;
        if let Some(parent) = new_parent {
            arena.require_component(parent)?;
            if would_create_cycle_with(parent, Some(id), |c| arena.parent_of(c)) {
                return Err(cycle(parent, id));
            }
        }

        let old_parent = arena.parent_of(id);
        if old_parent.as_deref() == new_parent {
            return Ok(());
        }
        arena.detach(id, old_parent.as_deref());
        arena.attach(id, new_parent);
        if let Some(node) = arena.components.get_mut(id) {
            Arc::make_mut(&mut node.def).parent_id = new_parent.map(String::from);
        }
        debug!(component_id = id, parent_id = ?new_parent, "component re-parented");
        Ok(())
    }

    /// Remove a component and all of its descendants; returns the removed ids.
    pub fn remove_component(&self, id: &str) -> Result<Vec<String>, StoreError> {
        let mut arena = self.write()?;
        arena.require_component(id)?;
        let parent = arena.parent_of(id);
        arena.detach(id, parent.as_deref());

        let mut removed = Vec::new();
        let mut stack = vec![id.to_string()];
        while let Some(cur) = stack.pop() {
            if let Some(node) = arena.components.remove(&cur) {
                stack.extend(node.children.iter().rev().cloned());
                removed.push(cur);
            }
        }
        debug!(component_id = id, removed = removed.len(), "component subtree removed");
        Ok(removed)
    }

    pub fn contains_component(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.read()?.components.contains_key(id))
    }

    /// Root components in insertion order.
    pub fn roots(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.read()?.roots.clone())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Arena>, StoreError> {
        self.arena.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Arena>, StoreError> {
        self.arena.write().map_err(|_| StoreError::Poisoned)
    }
}

#[async_trait]
impl DefinitionStore for MemoryStore {
    async fn get_script(&self, id: &str) -> Result<Option<Arc<ScriptDefinition>>, StoreError> {
        Ok(self.read()?.scripts.get(id).cloned())
    }

    async fn get_component(
        &self,
        id: &str,
    ) -> Result<Option<Arc<ComponentDefinition>>, StoreError> {
        Ok(self.read()?.components.get(id).map(|n| n.def.clone()))
    }

    async fn get_case(&self, id: &str) -> Result<Option<Arc<CaseDefinition>>, StoreError> {
        Ok(self.read()?.cases.get(id).cloned())
    }

    async fn parent_of(&self, component_id: &str) -> Result<Option<String>, StoreError> {
        Ok(self.read()?.parent_of(component_id))
    }

    async fn children_of(&self, component_id: &str) -> Result<Vec<String>, StoreError> {
        Ok(self
            .read()?
            .components
            .get(component_id)
            .map(|n| n.children.clone())
            .unwrap_or_default())
    }
}

fn not_found(kind: DefinitionKind, id: &str) -> StoreError {
    StoreError::NotFound {
        kind,
        id: id.to_string(),
    }
}

fn duplicate(kind: DefinitionKind, id: &str) -> StoreError {
    StoreError::Duplicate {
        kind,
        id: id.to_string(),
    }
}

fn cycle(parent: &str, subject: &str) -> StoreError {
    StoreError::CycleDetected {
        parent: parent.to_string(),
        subject: subject.to_string(),
    }
}

/// Explain why the remaining components could not be inserted.
fn unplaceable(doc: &SuiteDocument, deferred: &[&ComponentDefinition]) -> StoreError {
    let known = |id: &str| doc.components.iter().any(|c| c.id == id);
    for c in deferred {
        if let Some(parent) = c.parent_id.as_deref() {
            if !known(parent) {
                return not_found(DefinitionKind::Component, parent);
            }
        }
    }
    match deferred.first() {
        Some(c) => cycle(c.parent_id.as_deref().unwrap_or_default(), &c.id),
        None => StoreError::Other("no components left to place".to_string()),
    }
}
