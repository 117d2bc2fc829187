use std::collections::BTreeMap;

/// A parameter value: null, bool, number, string, sequence or mapping.
pub type ParamValue = serde_json::Value;

/// Flat name -> value mapping owned by an execution context.
pub type ParamMap = BTreeMap<String, ParamValue>;
