#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssertionKind {
    #[default]
    Simple,
    Jsonpath,
    Regex,
}

/// A check applied to a step's response.
///
/// - `simple`: `<expr> <op> <literal>`, e.g. `$status == 200`.
/// - `jsonpath`: `$.path <op> <literal>` or a bare path (existence), evaluated
///   against `context` (default `$body`).
/// - `regex`: pattern matched against `context` rendered as text.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Assertion {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    pub condition: String,

    #[serde(default)]
    pub kind: AssertionKind,
}

impl Assertion {
    pub fn simple(condition: impl Into<String>) -> Self {
        Self {
            context: None,
            condition: condition.into(),
            kind: AssertionKind::Simple,
        }
    }
}
