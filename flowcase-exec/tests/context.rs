use std::sync::Arc;

use flowcase_core::types::{
    CaseDefinition, ComponentDefinition, ExecutionMode, ParamMap, ParamSpec, ParamType,
    ScriptDefinition,
};
use flowcase_exec::{CaseContext, ComponentContext, ParamScope, ScriptContext};
use serde_json::json;

fn map(value: serde_json::Value) -> ParamMap {
    serde_json::from_value(value).unwrap()
}

fn param(name: &str, default: Option<serde_json::Value>, required: bool) -> ParamSpec {
    ParamSpec {
        name: name.to_string(),
        r#type: ParamType::String,
        default,
        required,
        description: None,
    }
}

#[test]
fn env_is_flattened_and_kept_nested() {
    let env = map(json!({"api": {"base_url": "https://x", "v": 2}}));
    let scope = ParamScope::from_env(Some(&env));
    assert_eq!(scope.get_param("api.base_url"), Some(&json!("https://x")));
    assert_eq!(scope.get_param("api.v"), Some(&json!(2)));
    assert_eq!(
        scope.resolve_value(&json!("${env.api.base_url}/users")),
        json!("https://x/users")
    );
}

#[test]
fn runtime_override_wins_over_script_variables() {
    let env = map(json!({"a": {"b": 1}}));
    let mut case = CaseDefinition::new("case");
    case.test_data = map(json!({"k": "case"}));
    let case_ctx = CaseContext::new(Arc::new(case), Some(&env), &map(json!({"k": "override"})));

    let mut script = ScriptDefinition::new("s");
    script.variables = map(json!({"k": "v"}));
    let script_ctx = case_ctx.derive_script(Arc::new(script), &ParamMap::new());

    assert_eq!(script_ctx.scope.get_param("k"), Some(&json!("override")));
    assert_eq!(script_ctx.scope.get_param("a.b"), Some(&json!(1)));
}

#[test]
fn script_layers_apply_in_order() {
    let mut script = ScriptDefinition::new("s");
    script.parameters = vec![
        param("user", Some(json!("alice")), false),
        param("page", Some(json!(1)), false),
    ];
    script.variables = map(json!({"page": 2, "greeting": "hi ${user}"}));

    let ctx = ScriptContext::new(Arc::new(script), None, &map(json!({"user": "bob"})));
    assert_eq!(ctx.scope.get_param("user"), Some(&json!("bob")));
    assert_eq!(ctx.scope.get_param("page"), Some(&json!(2)));
    // Stored unresolved; resolution happens when the step runs.
    assert_eq!(ctx.scope.resolved().get("greeting"), Some(&json!("hi bob")));
}

#[test]
fn overrides_resolve_against_accumulated_mapping() {
    let mut component = ComponentDefinition::new("c", ExecutionMode::Sequential);
    component.shared_variables = map(json!({"host": "api.test"}));
    let ctx = ComponentContext::new(
        Arc::new(component),
        None,
        &map(json!({"url": "https://${host}/v1"})),
    );
    assert_eq!(ctx.scope.get_param("url"), Some(&json!("https://api.test/v1")));
}

#[test]
fn step_parameters_merge_into_derived_script() {
    let mut component = ComponentDefinition::new("c", ExecutionMode::Sequential);
    component.shared_variables = map(json!({"id": 7}));
    let ctx = ComponentContext::new(Arc::new(component), None, &ParamMap::new());

    let script = Arc::new(ScriptDefinition::new("s"));
    let derived = ctx.derive_script(script, &map(json!({"path": "/items/${id}"})));
    assert_eq!(derived.scope.get_param("path"), Some(&json!("/items/7")));
    assert_eq!(derived.scope.get_param("id"), Some(&json!(7)));
    // The parent mapping is untouched.
    assert_eq!(ctx.scope.get_param("path"), None);
}

#[test]
fn resolved_follows_chains() {
    let mut scope = ParamScope::new();
    scope.set_param("base", json!("https://${host}"));
    scope.set_param("host", json!("example.com"));
    scope.set_param("url", json!("${base}/login"));
    assert_eq!(
        scope.resolved().get("url"),
        Some(&json!("https://example.com/login"))
    );
}

#[test]
fn missing_required_parameters_are_listed() {
    let mut script = ScriptDefinition::new("s");
    script.parameters = vec![
        param("token", None, true),
        param("user", Some(json!("alice")), true),
        param("opt", None, false),
    ];
    let ctx = ScriptContext::new(Arc::new(script.clone()), None, &ParamMap::new());
    assert_eq!(ctx.missing_required(), vec!["token".to_string()]);

    let ctx = ScriptContext::new(Arc::new(script), None, &map(json!({"token": "t"})));
    assert!(ctx.missing_required().is_empty());
}

#[test]
fn output_variables_only_include_present_names() {
    let mut script = ScriptDefinition::new("s");
    script.output_variables = vec!["token".to_string(), "absent".to_string()];
    let mut ctx = ScriptContext::new(Arc::new(script), None, &ParamMap::new());
    ctx.scope.set_param("token", json!("abc"));
    assert_eq!(ctx.output_variables(), map(json!({"token": "abc"})));
}

#[test]
fn resolved_shares_builtin_values_and_keeps_cycles_literal() {
    let mut scope = ParamScope::new();
    scope.set_param("when", json!("${timestamp}-${uuid}"));
    scope.set_param("copy", json!("${when}"));
    scope.set_param("loop_a", json!("${loop_b}"));
    scope.set_param("loop_b", json!("${loop_a}"));

    let resolved = scope.resolved();
    assert_eq!(resolved["copy"], resolved["when"]);
    assert!(!resolved["when"].as_str().unwrap().contains("${"));
    assert!(resolved["loop_a"].as_str().unwrap().contains("${loop_"));
}
