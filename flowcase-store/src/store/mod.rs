mod guard;
mod trait_store;

pub use guard::{ensure_acyclic, would_create_cycle};
pub(crate) use guard::would_create_cycle_with;
pub use trait_store::{DefinitionKind, DefinitionStore, StoreError};
