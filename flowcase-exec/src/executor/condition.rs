use flowcase_core::types::ParamValue;

/// Decides whether a component step with a condition should run.
///
/// Receives the condition already resolved against the component context.
pub trait ConditionEvaluator: Send + Sync {
    fn evaluate(&self, condition: &ParamValue) -> bool;
}

/// Plain truthiness; there is no expression grammar.
#[derive(Debug, Clone, Copy, Default)]
pub struct TruthyCondition;

const FALSY_WORDS: &[&str] = &["false", "0", "no", "off", "null", "none"];

impl ConditionEvaluator for TruthyCondition {
    fn evaluate(&self, condition: &ParamValue) -> bool {
        match condition {
            ParamValue::Null => false,
            ParamValue::Bool(b) => *b,
            ParamValue::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
            ParamValue::Array(a) => !a.is_empty(),
            ParamValue::Object(m) => !m.is_empty(),
            ParamValue::String(s) => {
                let s = s.trim();
                if s.is_empty() || s.contains("${") {
                    return false;
                }
                !FALSY_WORDS.iter().any(|w| s.eq_ignore_ascii_case(w))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strings() {
        let c = TruthyCondition;
        assert!(c.evaluate(&json!("yes")));
        assert!(c.evaluate(&json!("1")));
        assert!(!c.evaluate(&json!("  ")));
        assert!(!c.evaluate(&json!("FALSE")));
        assert!(!c.evaluate(&json!("Off")));
        assert!(!c.evaluate(&json!("${flag}")));
    }

    #[test]
    fn non_strings() {
        let c = TruthyCondition;
        assert!(!c.evaluate(&json!(null)));
        assert!(c.evaluate(&json!(true)));
        assert!(!c.evaluate(&json!(0)));
        assert!(c.evaluate(&json!(0.5)));
        assert!(!c.evaluate(&json!([])));
        assert!(c.evaluate(&json!({"a": 1})));
    }
}
