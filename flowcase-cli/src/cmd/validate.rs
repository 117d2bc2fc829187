use std::path::Path;

use flowcase_core::{parse_document_str, DocumentFormat, ParseError, Validate};
use serde::Serialize;

use crate::exit_codes;
use crate::output::{is_human, print_error, print_result};
use crate::OutputArgs;

#[derive(Serialize)]
struct ValidateResult {
    valid: bool,
    format: String,
    scripts: usize,
    components: usize,
    cases: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    errors: Vec<String>,
}

pub async fn validate_cmd(path: &Path, output: OutputArgs) -> i32 {
    let content = match std::fs::read_to_string(path) {
        Ok(v) => v,
        Err(e) => {
            print_error(
                output.format,
                output.quiet,
                &format!("failed to read {}: {e}", path.display()),
            );
            return exit_codes::RUNTIME_ERROR;
        }
    };

    let parsed = match parse_document_str(&content, DocumentFormat::Auto) {
        Ok(p) => p,
        Err(ParseError::Json(e)) => {
            print_error(output.format, output.quiet, &format!("JSON parse failed: {e}"));
            return exit_codes::VALIDATION_FAILED;
        }
        Err(ParseError::Yaml(e)) => {
            print_error(output.format, output.quiet, &format!("YAML parse failed: {e}"));
            return exit_codes::VALIDATION_FAILED;
        }
        Err(ParseError::UnknownFormat) => {
            print_error(
                output.format,
                output.quiet,
                "input is neither valid JSON nor valid YAML",
            );
            return exit_codes::VALIDATION_FAILED;
        }
    };

    let doc = &parsed.document;
    let errors: Vec<String> = match doc.validate() {
        Ok(()) => Vec::new(),
        Err(err) => err.violations.iter().map(|v| v.to_string()).collect(),
    };
    let result = ValidateResult {
        valid: errors.is_empty(),
        format: format!("{:?}", parsed.format),
        scripts: doc.scripts.len(),
        components: doc.components.len(),
        cases: doc.cases.len(),
        errors,
    };

    if is_human(output.format, output.quiet) {
        if result.valid {
            println!(
                "ok: valid suite ({:?}): {} scripts, {} components, {} cases",
                parsed.format, result.scripts, result.components, result.cases
            );
        } else {
            eprintln!("error: validation failed");
            for e in &result.errors {
                eprintln!("- {e}");
            }
        }
    } else {
        print_result(output.format, output.quiet, &result);
    }

    if result.valid {
        exit_codes::SUCCESS
    } else {
        exit_codes::VALIDATION_FAILED
    }
}
