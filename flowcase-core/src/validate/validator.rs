use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;

use crate::error::{ValidationError, Violation};
use crate::types::SuiteDocument;

use super::rules;

pub(crate) static ID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_\-]+$").expect("valid"));

pub struct Validator {
    violations: Vec<Violation>,
}

impl Validator {
    pub fn new() -> Self {
        Self {
            violations: Vec::new(),
        }
    }

    pub fn finish(self) -> Result<(), ValidationError> {
        if self.violations.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(self.violations))
        }
    }

    pub fn validate_document(&mut self, doc: &SuiteDocument) {
        rules::document::validate_document(self, doc);
    }

    pub(crate) fn push(&mut self, path: impl Into<String>, message: impl Into<String>) {
        self.violations.push(Violation::new(path, message));
    }

    /// Check id syntax and uniqueness within `seen`.
    pub(crate) fn validate_id(&mut self, path: &str, id: &str, seen: &mut HashSet<String>) {
        if !ID_RE.is_match(id) {
            self.push(path, "must match regex [A-Za-z0-9_\\-]+");
        }
        if !seen.insert(id.to_string()) {
            self.push(path, "must be unique");
        }
    }
}
