#![forbid(unsafe_code)]

pub mod memory;
pub mod store;

pub use crate::memory::MemoryStore;
pub use crate::store::{
    ensure_acyclic, would_create_cycle, DefinitionKind, DefinitionStore, StoreError,
};
