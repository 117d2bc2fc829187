use std::sync::Arc;

use async_trait::async_trait;
use flowcase_core::types::{
    CaseDefinition, ComponentDefinition, ExecutionMode, ScriptDefinition, SuiteDocument,
};
use flowcase_store::{
    ensure_acyclic, would_create_cycle, DefinitionKind, DefinitionStore, MemoryStore, StoreError,
};

fn component(id: &str, parent: Option<&str>) -> ComponentDefinition {
    let mut c = ComponentDefinition::new(id, ExecutionMode::Sequential);
    c.parent_id = parent.map(String::from);
    c
}

/// A <- B <- C, plus an unrelated root D.
fn chain() -> MemoryStore {
    let store = MemoryStore::new();
    store.insert_component(component("A", None)).unwrap();
    store.insert_component(component("B", Some("A"))).unwrap();
    store.insert_component(component("C", Some("B"))).unwrap();
    store.insert_component(component("D", None)).unwrap();
    store
}

#[tokio::test]
async fn descendant_as_parent_is_a_cycle() {
    let store = chain();
    assert!(would_create_cycle(&store, "C", Some("A")).await.unwrap());
    assert!(would_create_cycle(&store, "B", Some("A")).await.unwrap());
    assert!(!would_create_cycle(&store, "D", Some("A")).await.unwrap());
    assert!(!would_create_cycle(&store, "A", Some("C")).await.unwrap());
}

#[tokio::test]
async fn new_component_never_cycles() {
    let store = chain();
    assert!(!would_create_cycle(&store, "C", None).await.unwrap());
    assert!(!would_create_cycle(&store, "missing", None).await.unwrap());
}

#[tokio::test]
async fn self_parent_is_a_cycle() {
    let store = chain();
    assert!(would_create_cycle(&store, "B", Some("B")).await.unwrap());

    let err = ensure_acyclic(&store, "B", Some("B")).await.unwrap_err();
    assert_eq!(
        err,
        StoreError::CycleDetected {
            parent: "B".to_string(),
            subject: "B".to_string()
        }
    );
}

#[tokio::test]
async fn pre_existing_cycle_terminates() {
    // A store whose data already loops (X -> Y -> X) must not hang the guard.
    struct Looping;

    #[async_trait]
    impl DefinitionStore for Looping {
        async fn get_script(
            &self,
            _id: &str,
        ) -> Result<Option<Arc<ScriptDefinition>>, StoreError> {
            Ok(None)
        }

        async fn get_component(
            &self,
            id: &str,
        ) -> Result<Option<Arc<ComponentDefinition>>, StoreError> {
            let parent = if id == "X" { "Y" } else { "X" };
            Ok(Some(Arc::new(component(id, Some(parent)))))
        }

        async fn get_case(&self, _id: &str) -> Result<Option<Arc<CaseDefinition>>, StoreError> {
            Ok(None)
        }

        async fn children_of(&self, _id: &str) -> Result<Vec<String>, StoreError> {
            Ok(Vec::new())
        }
    }

    assert!(would_create_cycle(&Looping, "X", Some("Z")).await.unwrap());
}

#[tokio::test]
async fn reparent_into_own_subtree_is_rejected() {
    let store = chain();
    let err = store.set_parent("A", Some("C")).unwrap_err();
    assert!(matches!(err, StoreError::CycleDetected { .. }));
    // Tree unchanged.
    assert_eq!(store.parent_of("A").await.unwrap(), None);
    assert_eq!(store.children_of("C").await.unwrap(), Vec::<String>::new());

    let err = store.set_parent("B", Some("B")).unwrap_err();
    assert!(matches!(err, StoreError::CycleDetected { .. }));
}

#[tokio::test]
async fn reparent_moves_child_lists() {
    let store = chain();
    store.set_parent("C", Some("D")).unwrap();
    assert_eq!(store.children_of("B").await.unwrap(), Vec::<String>::new());
    assert_eq!(store.children_of("D").await.unwrap(), vec!["C".to_string()]);
    assert_eq!(store.parent_of("C").await.unwrap().as_deref(), Some("D"));

    store.set_parent("C", None).unwrap();
    assert_eq!(store.roots().unwrap(), vec!["A", "D", "C"]);
}

#[tokio::test]
async fn insert_rejects_unknown_parent_and_duplicates() {
    let store = chain();
    let err = store.insert_component(component("E", Some("nope"))).unwrap_err();
    assert_eq!(
        err,
        StoreError::NotFound {
            kind: DefinitionKind::Component,
            id: "nope".to_string()
        }
    );

    let err = store.insert_component(component("A", None)).unwrap_err();
    assert!(matches!(err, StoreError::Duplicate { kind: DefinitionKind::Component, .. }));

    let err = store.insert_component(component("S", Some("S"))).unwrap_err();
    assert!(matches!(err, StoreError::CycleDetected { .. }));
}

#[tokio::test]
async fn children_keep_insertion_order() {
    let store = MemoryStore::new();
    store.insert_component(component("root", None)).unwrap();
    for id in ["z", "a", "m"] {
        store.insert_component(component(id, Some("root"))).unwrap();
    }
    assert_eq!(store.children_of("root").await.unwrap(), vec!["z", "a", "m"]);
}

#[tokio::test]
async fn remove_component_cascades() {
    let store = chain();
    let removed = store.remove_component("B").unwrap();
    assert_eq!(removed, vec!["B", "C"]);
    assert!(store.get_component("C").await.unwrap().is_none());
    assert_eq!(store.children_of("A").await.unwrap(), Vec::<String>::new());
    assert!(store.get_component("D").await.unwrap().is_some());

    let err = store.remove_component("B").unwrap_err();
    assert!(matches!(err, StoreError::NotFound { .. }));
}

#[tokio::test]
async fn from_document_inserts_parents_first() {
    let doc = SuiteDocument {
        scripts: vec![ScriptDefinition::new("login")],
        // Child listed before its parent.
        components: vec![component("child", Some("parent")), component("parent", None)],
        cases: vec![CaseDefinition::new("smoke")],
        ..SuiteDocument::default()
    };
    let store = MemoryStore::from_document(&doc).unwrap();

    assert!(store.get_script("login").await.unwrap().is_some());
    assert!(store.get_case("smoke").await.unwrap().is_some());
    assert_eq!(store.children_of("parent").await.unwrap(), vec!["child"]);
    assert_eq!(store.roots().unwrap(), vec!["parent"]);
}

#[tokio::test]
async fn from_document_rejects_cycles_and_dangling_parents() {
    let looped = SuiteDocument {
        components: vec![component("a", Some("b")), component("b", Some("a"))],
        ..SuiteDocument::default()
    };
    assert!(matches!(
        MemoryStore::from_document(&looped),
        Err(StoreError::CycleDetected { .. })
    ));

    let dangling = SuiteDocument {
        components: vec![component("a", Some("ghost"))],
        ..SuiteDocument::default()
    };
    assert_eq!(
        MemoryStore::from_document(&dangling).err(),
        Some(StoreError::NotFound {
            kind: DefinitionKind::Component,
            id: "ghost".to_string()
        })
    );
}
