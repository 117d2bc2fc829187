use std::path::Path;
use std::time::Duration;

use flowcase_core::{
    parse_any, parse_document_str, DocumentFormat, ParamMap, ParamValue, SuiteDocument, Validate,
};
use flowcase_exec::executor::{ExecutorConfig, HttpRunnerConfig};

use crate::exit_codes;
use crate::output::print_error;
use crate::{OutputArgs, RunArgs};

/// Read, parse and validate a suite file. On failure the error has been
/// printed and the exit code is returned.
pub fn load_suite(path: &Path, output: &OutputArgs) -> Result<SuiteDocument, i32> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        print_error(
            output.format,
            output.quiet,
            &format!("failed to read {}: {e}", path.display()),
        );
        exit_codes::RUNTIME_ERROR
    })?;

    let parsed = parse_document_str(&content, DocumentFormat::Auto).map_err(|e| {
        print_error(output.format, output.quiet, &e.to_string());
        exit_codes::VALIDATION_FAILED
    })?;

    if let Err(err) = parsed.document.validate() {
        let lines: Vec<String> = err.violations.iter().map(|v| v.to_string()).collect();
        print_error(
            output.format,
            output.quiet,
            &format!("suite failed validation: {}", lines.join("; ")),
        );
        return Err(exit_codes::VALIDATION_FAILED);
    }
    Ok(parsed.document)
}

pub fn load_env_file(path: &Path, output: &OutputArgs) -> Result<ParamMap, i32> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        print_error(
            output.format,
            output.quiet,
            &format!("failed to read env file {}: {e}", path.display()),
        );
        exit_codes::RUNTIME_ERROR
    })?;
    parse_any::<ParamMap>(&content, DocumentFormat::Auto)
        .map(|(env, _)| env)
        .map_err(|e| {
            print_error(
                output.format,
                output.quiet,
                &format!("env file {}: {e}", path.display()),
            );
            exit_codes::RUNTIME_ERROR
        })
}

/// Merge `overlay` into `base`; nested mappings merge key by key.
pub fn merge_env(base: &mut ParamMap, overlay: ParamMap) {
    for (key, value) in overlay {
        merge_value(base.entry(key).or_insert(ParamValue::Null), value);
    }
}

fn merge_value(target: &mut ParamValue, incoming: ParamValue) {
    match (target, incoming) {
        (ParamValue::Object(existing), ParamValue::Object(incoming)) => {
            for (k, v) in incoming {
                merge_value(existing.entry(k).or_insert(ParamValue::Null), v);
            }
        }
        (target, incoming) => *target = incoming,
    }
}

/// Parse `--set KEY=VALUE` pairs. Values that parse as JSON keep their
/// type (`--set page=2` is a number); anything else is a string.
pub fn parse_set_params(pairs: &[String]) -> Result<ParamMap, String> {
    let mut params = ParamMap::new();
    for pair in pairs {
        let Some((key, raw)) = pair.split_once('=') else {
            return Err(format!("invalid --set '{pair}': expected KEY=VALUE"));
        };
        let key = key.trim();
        if key.is_empty() {
            return Err(format!("invalid --set '{pair}': empty key"));
        }
        let value =
            serde_json::from_str(raw).unwrap_or_else(|_| ParamValue::String(raw.to_string()));
        params.insert(key.to_string(), value);
    }
    Ok(params)
}

pub fn executor_config(run: &RunArgs) -> ExecutorConfig {
    ExecutorConfig {
        max_concurrency: run.max_concurrency,
        step_timeout: run.step_timeout.map(Duration::from_millis),
    }
}

pub fn http_config(run: &RunArgs) -> HttpRunnerConfig {
    HttpRunnerConfig {
        timeout: Duration::from_millis(run.http_timeout),
        ..HttpRunnerConfig::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn set_params_keep_json_types() {
        let params = parse_set_params(&[
            "page=2".to_string(),
            "user=ada".to_string(),
            "flags={\"a\":true}".to_string(),
            "expr=a=b".to_string(),
        ])
        .unwrap();
        assert_eq!(params["page"], json!(2));
        assert_eq!(params["user"], json!("ada"));
        assert_eq!(params["flags"], json!({"a": true}));
        assert_eq!(params["expr"], json!("a=b"));
    }

    #[test]
    fn set_params_reject_missing_separator() {
        assert!(parse_set_params(&["nope".to_string()]).is_err());
        assert!(parse_set_params(&["=1".to_string()]).is_err());
    }

    #[test]
    fn env_merges_nested_mappings() {
        let mut base: ParamMap =
            serde_json::from_value(json!({"api": {"host": "a", "port": 80}, "user": "x"})).unwrap();
        let overlay: ParamMap =
            serde_json::from_value(json!({"api": {"host": "b", "tls": {"on": true}}, "user": "y"}))
                .unwrap();
        merge_env(&mut base, overlay);
        assert_eq!(
            ParamValue::Object(base.into_iter().collect()),
            json!({"api": {"host": "b", "port": 80, "tls": {"on": true}}, "user": "y"})
        );
    }
}
