use std::sync::LazyLock;

use regex::Regex;

static HEADER_TOKEN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[!#$%&'*+\-.^_`|~0-9A-Za-z]+$").expect("valid regex"));

/// Reference into an HTTP response, used by assertions and variable extraction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseExpr {
    /// `$status`
    Status,
    /// `$header.<name>` (case-insensitive match)
    Header(String),
    /// `$body` or `$body#/json/pointer`
    Body { pointer: Option<String> },
    /// `$.a.b` / `$[0]`, evaluated as JSONPath against the body.
    JsonPath(String),
}

pub fn parse_response_expr(input: &str) -> Result<ResponseExpr, ResponseExprError> {
    let s = input.trim();
    if !s.starts_with('$') {
        return Err(ResponseExprError::MissingDollarPrefix);
    }
    if s.starts_with("$.") || s.starts_with("$[") {
        return Ok(ResponseExpr::JsonPath(s.to_string()));
    }

    let head = &s[1..];
    if head == "status" || head == "statusCode" {
        return Ok(ResponseExpr::Status);
    }
    if let Some(token) = head.strip_prefix("header.") {
        if token.is_empty() {
            return Err(ResponseExprError::EmptyName);
        }
        if !HEADER_TOKEN_RE.is_match(token) {
            return Err(ResponseExprError::InvalidHeaderToken(token.to_string()));
        }
        return Ok(ResponseExpr::Header(token.to_string()));
    }
    if head == "body" {
        return Ok(ResponseExpr::Body { pointer: None });
    }
    if let Some(ptr) = head.strip_prefix("body#") {
        validate_pointer(ptr)?;
        return Ok(ResponseExpr::Body {
            pointer: Some(ptr.to_string()),
        });
    }

    Err(ResponseExprError::UnknownExpression(s.to_string()))
}

/// RFC 6901: empty (whole document) or `/`-prefixed with only `~0`/`~1` escapes.
fn validate_pointer(ptr: &str) -> Result<(), ResponseExprError> {
    if ptr.is_empty() {
        return Ok(());
    }
    if !ptr.starts_with('/') {
        return Err(ResponseExprError::InvalidPointer(ptr.to_string()));
    }
    let mut chars = ptr.chars();
    while let Some(ch) = chars.next() {
        if ch == '~' && !matches!(chars.next(), Some('0' | '1')) {
            return Err(ResponseExprError::InvalidPointer(ptr.to_string()));
        }
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResponseExprError {
    #[error("response expression must start with '$'")]
    MissingDollarPrefix,
    #[error("unknown response expression: {0}")]
    UnknownExpression(String),
    #[error("name segment must not be empty")]
    EmptyName,
    #[error("invalid header token: {0}")]
    InvalidHeaderToken(String),
    #[error("invalid json pointer: {0}")]
    InvalidPointer(String),
}
