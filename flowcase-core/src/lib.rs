#![forbid(unsafe_code)]

pub mod error;
pub mod expressions;
pub mod parser;
pub mod types;
pub mod validate;

pub use crate::error::{FlowcaseError, ParseError, ValidationError, Violation};
pub use crate::expressions::{flatten_env, VariableResolver};
pub use crate::parser::{parse_any, parse_document_str, DocumentFormat, ParsedDocument};
pub use crate::types::{
    CaseDefinition, ComponentDefinition, ComponentStep, ExecutionMode, ParamMap, ParamValue,
    ScriptDefinition, SuiteDocument,
};
pub use crate::validate::{validate_document, Validate};
