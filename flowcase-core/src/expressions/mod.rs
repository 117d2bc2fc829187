mod builtins;
mod env;
mod resolver;
mod response;
mod template;

pub use builtins::Builtin;
pub use env::{flatten_env, ENV_KEY};
pub use resolver::VariableResolver;
pub use response::{parse_response_expr, ResponseExpr, ResponseExprError};
pub use template::{parse_template, Segment, Template, VarRef};
