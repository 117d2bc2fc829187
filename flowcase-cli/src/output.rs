use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Print a result as JSON: pretty for text mode, one line for `--format json`.
pub fn print_result<T: Serialize>(format: OutputFormat, quiet: bool, result: &T) {
    if quiet {
        return;
    }
    let rendered = match format {
        OutputFormat::Text => serde_json::to_string_pretty(result),
        OutputFormat::Json => serde_json::to_string(result),
    };
    if let Ok(json) = rendered {
        println!("{json}");
    }
}

pub fn print_error(format: OutputFormat, quiet: bool, message: &str) {
    if quiet {
        return;
    }
    match format {
        OutputFormat::Text => eprintln!("error: {message}"),
        OutputFormat::Json => {
            let err = serde_json::json!({"error": message});
            eprintln!("{}", serde_json::to_string(&err).unwrap_or_default());
        }
    }
}

/// Human output is only printed in text mode without `--quiet`.
pub fn is_human(format: OutputFormat, quiet: bool) -> bool {
    format == OutputFormat::Text && !quiet
}
