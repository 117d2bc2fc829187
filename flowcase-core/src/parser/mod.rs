use serde::de::DeserializeOwned;

use crate::error::ParseError;
use crate::types::SuiteDocument;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    Json,
    Yaml,
    Auto,
}

#[derive(Debug, Clone)]
pub struct ParsedDocument {
    pub document: SuiteDocument,
    pub format: DocumentFormat,
}

pub fn parse_document_str(input: &str, format: DocumentFormat) -> Result<ParsedDocument, ParseError> {
    let (document, format) = parse_any::<SuiteDocument>(input, format)?;
    Ok(ParsedDocument { document, format })
}

/// Deserialize JSON or YAML into any type, reporting which format matched.
///
/// With `Auto`, input that looks like JSON is tried as JSON first and YAML
/// second; everything else the other way round. The error of the first
/// attempt is the one reported.
pub fn parse_any<T: DeserializeOwned>(
    input: &str,
    format: DocumentFormat,
) -> Result<(T, DocumentFormat), ParseError> {
    match format {
        DocumentFormat::Json => Ok((serde_json::from_str(input)?, DocumentFormat::Json)),
        DocumentFormat::Yaml => Ok((serde_yaml::from_str(input)?, DocumentFormat::Yaml)),
        DocumentFormat::Auto => {
            let trimmed = input.trim_start();
            if trimmed.is_empty() {
                return Err(ParseError::UnknownFormat);
            }
            if trimmed.starts_with('{') || trimmed.starts_with('[') {
                match serde_json::from_str(input) {
                    Ok(v) => Ok((v, DocumentFormat::Json)),
                    Err(e) => serde_yaml::from_str(input)
                        .map(|v| (v, DocumentFormat::Yaml))
                        .map_err(|_| ParseError::Json(e)),
                }
            } else {
                match serde_yaml::from_str(input) {
                    Ok(v) => Ok((v, DocumentFormat::Yaml)),
                    Err(e) => serde_json::from_str(input)
                        .map(|v| (v, DocumentFormat::Json))
                        .map_err(|_| ParseError::Yaml(e)),
                }
            }
        }
    }
}
