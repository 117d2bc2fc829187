//! Execution contexts: the live parameter mapping of one script, component
//! or case run, plus the derivation rules that carry values down the tree.

mod case;
mod component;
mod history;
mod scope;
mod script;

pub use case::CaseContext;
pub use component::ComponentContext;
pub use history::ExecutionHistory;
pub use scope::ParamScope;
pub use script::ScriptContext;
