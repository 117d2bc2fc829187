mod rules;
mod validator;

use crate::error::ValidationError;
use crate::types::SuiteDocument;
use validator::Validator;

pub trait Validate {
    fn validate(&self) -> Result<(), ValidationError>;
}

impl Validate for SuiteDocument {
    fn validate(&self) -> Result<(), ValidationError> {
        validate_document(self)
    }
}

/// Check a suite document for structural problems, collecting every violation.
pub fn validate_document(doc: &SuiteDocument) -> Result<(), ValidationError> {
    let mut v = Validator::new();
    v.validate_document(doc);
    v.finish()
}
