//! Input validation for consultation submissions

pub mod rules;
pub mod validators;

pub use rules::*;

use crate::error::{AppError, Result};

/// Ordered collection of field failures. Rules append in the order they run
/// so the caller sees messages in a stable sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValidationResult {
    pub errors: Vec<FieldValidationError>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldValidationError {
    pub field: String,
    pub message: String,
}

impl ValidationResult {
    pub fn success() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn add_error(&mut self, field: &str, message: &str) {
        self.errors.push(FieldValidationError {
            field: field.to_string(),
            message: message.to_string(),
        });
    }

    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(|e| e.message.clone()).collect()
    }

    pub fn into_result(self) -> Result<()> {
        if self.is_valid() {
            Ok(())
        } else {
            Err(AppError::Validation(self.messages()))
        }
    }
}

pub trait Validatable {
    fn validate_comprehensive(&self) -> ValidationResult;
}
