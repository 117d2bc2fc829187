use flowcase_core::types::{AssertionKind, ExecutionMode};
use flowcase_core::{parse_document_str, validate_document, DocumentFormat};

fn minimal_valid_yaml() -> &'static str {
    r#"
version: "1"
environment:
  api:
    base_url: https://example.com
scripts:
  - id: login
    parameters:
      - name: user
        default: alice
        required: true
    outputs: [token]
    request:
      method: POST
      url: "${env.api.base_url}/login"
      body: { user: "${user}" }
    assertions:
      - condition: "$status == 200"
    extract:
      token: "$.token"
components:
  - id: auth
    mode: concurrent
    steps:
      - script: login
        order: 1
cases:
  - id: smoke
    scripts:
      - script: login
        order: 1
    components:
      - component: auth
        order: 2
"#
}

#[test]
fn parse_yaml_and_validate_ok() {
    let parsed = parse_document_str(minimal_valid_yaml(), DocumentFormat::Yaml).unwrap();
    validate_document(&parsed.document).unwrap();

    let doc = parsed.document;
    assert_eq!(doc.components[0].mode, ExecutionMode::Concurrent);
    assert!(doc.components[0].steps[0].enabled);
    assert_eq!(doc.scripts[0].output_variables, vec!["token".to_string()]);
    assert_eq!(doc.scripts[0].assertions[0].kind, AssertionKind::Simple);
    assert_eq!(doc.scripts[0].request.as_ref().unwrap().method, "POST");
}

#[test]
fn parse_auto_detects_yaml() {
    let parsed = parse_document_str(minimal_valid_yaml(), DocumentFormat::Auto).unwrap();
    assert_eq!(parsed.format, DocumentFormat::Yaml);
}

#[test]
fn parse_auto_detects_json() {
    let json = r#"
{
  "scripts": [{ "id": "ping", "request": { "url": "https://example.com/ping" } }],
  "cases": [{ "id": "c1", "scripts": [{ "script": "ping" }] }]
}
"#;
    let parsed = parse_document_str(json, DocumentFormat::Auto).unwrap();
    assert_eq!(parsed.format, DocumentFormat::Json);
    validate_document(&parsed.document).unwrap();
    assert_eq!(parsed.document.scripts[0].request.as_ref().unwrap().method, "GET");
}

#[test]
fn empty_input_is_unknown_format() {
    assert!(parse_document_str("   ", DocumentFormat::Auto).is_err());
}

#[test]
fn validate_reports_duplicate_parameter_names() {
    let yaml = r#"
scripts:
  - id: s1
    parameters:
      - name: a
      - name: a
"#;
    let parsed = parse_document_str(yaml, DocumentFormat::Yaml).unwrap();
    let err = validate_document(&parsed.document).unwrap_err();
    assert!(err
        .violations
        .iter()
        .any(|v| v.path == "$.scripts[0].parameters[1].name" && v.message.contains("duplicate")));
}

#[test]
fn validate_reports_unknown_references() {
    let yaml = r#"
scripts:
  - id: s1
components:
  - id: c1
    parent: nope
    steps:
      - script: missing
cases:
  - id: k1
    components:
      - component: ghost
"#;
    let parsed = parse_document_str(yaml, DocumentFormat::Yaml).unwrap();
    let err = validate_document(&parsed.document).unwrap_err();
    let paths: Vec<&str> = err.violations.iter().map(|v| v.path.as_str()).collect();
    assert!(paths.contains(&"$.components[0].parent"));
    assert!(paths.contains(&"$.components[0].steps[0].script"));
    assert!(paths.contains(&"$.cases[0].components[0].component"));
}

#[test]
fn validate_reports_parent_cycles() {
    let yaml = r#"
components:
  - id: a
    parent: c
  - id: b
    parent: a
  - id: c
    parent: b
  - id: d
"#;
    let parsed = parse_document_str(yaml, DocumentFormat::Yaml).unwrap();
    let err = validate_document(&parsed.document).unwrap_err();
    let cyclic: Vec<&str> = err
        .violations
        .iter()
        .filter(|v| v.message.contains("own ancestor"))
        .map(|v| v.path.as_str())
        .collect();
    assert_eq!(
        cyclic,
        vec![
            "$.components[0].parent",
            "$.components[1].parent",
            "$.components[2].parent"
        ]
    );
}

#[test]
fn validate_reports_duplicate_and_malformed_ids() {
    let yaml = r#"
scripts:
  - id: "bad id"
  - id: ok
  - id: ok
"#;
    let parsed = parse_document_str(yaml, DocumentFormat::Yaml).unwrap();
    let err = validate_document(&parsed.document).unwrap_err();
    assert!(err.violations.iter().any(|v| v.path == "$.scripts[0].id"));
    assert!(err
        .violations
        .iter()
        .any(|v| v.path == "$.scripts[2].id" && v.message == "must be unique"));
}

#[test]
fn validate_reports_bad_assertions_and_extractions() {
    let yaml = r#"
scripts:
  - id: s1
    assertions:
      - condition: "status is 200"
      - condition: "(unclosed"
        kind: regex
    extract:
      token: "body.token"
"#;
    let parsed = parse_document_str(yaml, DocumentFormat::Yaml).unwrap();
    let err = validate_document(&parsed.document).unwrap_err();
    let paths: Vec<&str> = err.violations.iter().map(|v| v.path.as_str()).collect();
    assert!(paths.contains(&"$.scripts[0].assertions[0].condition"));
    assert!(paths.contains(&"$.scripts[0].assertions[1].condition"));
    assert!(paths.contains(&"$.scripts[0].extract.token"));
}

#[test]
fn case_refs_share_one_order_axis() {
    let yaml = r#"
id: smoke
scripts:
  - { script: s3, order: 3 }
  - { script: s1, order: 1 }
  - { script: off, order: 0, enabled: false }
  - { script: tie, order: 2 }
components:
  - { component: c2, order: 2 }
"#;
    let case: flowcase_core::CaseDefinition = serde_yaml::from_str(yaml).unwrap();
    let ids: Vec<&str> = case.ordered_refs().iter().map(|r| r.id()).collect();
    // Ties keep scripts ahead of components.
    assert_eq!(ids, vec!["s1", "tie", "c2", "s3"]);
}

#[test]
fn component_steps_sort_stably_and_drop_disabled() {
    let yaml = r#"
id: grp
steps:
  - { script: b, order: 1 }
  - { script: a, order: 1 }
  - { script: z, order: -5, enabled: false }
  - { script: first, order: -1 }
"#;
    let component: flowcase_core::ComponentDefinition = serde_yaml::from_str(yaml).unwrap();
    assert_eq!(component.mode, ExecutionMode::Sequential);
    let ids: Vec<&str> = component
        .ordered_steps()
        .iter()
        .map(|s| s.script_id.as_str())
        .collect();
    assert_eq!(ids, vec!["first", "b", "a"]);
}
