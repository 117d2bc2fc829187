mod assertion;
mod case;
mod component;
mod document;
mod script;
mod value;

pub use assertion::{Assertion, AssertionKind};
pub use case::{CaseComponentRef, CaseDefinition, CaseRef, CaseScriptRef};
pub use component::{ComponentDefinition, ComponentStep, ExecutionMode};
pub use document::SuiteDocument;
pub use script::{ParamSpec, ParamType, RequestTemplate, ScriptDefinition};
pub use value::{ParamMap, ParamValue};
