//! Validation rules and custom validators

use lazy_static::lazy_static;
use regex::Regex;
use validator::{ValidateEmail, ValidationError};

lazy_static! {
    static ref EMAIL_DOMAIN_REGEX: Regex = Regex::new(
        r"^[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]*[a-zA-Z0-9])?)*\.[a-zA-Z]{2,}$"
    ).unwrap();
}

const MAX_EMAIL_LENGTH: usize = 254;

pub fn validate_required(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("required"));
    }
    Ok(())
}

/// Requires a local part, an `@` and a dotted domain. The local part follows
/// the RFC 5322 grammar checked by `validator`; the domain must additionally
/// be a dotted hostname with an alphabetic TLD.
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::new("Email cannot be empty"));
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::new("Email is too long"));
    }

    let has_dotted_domain = email
        .rsplit_once('@')
        .map(|(_, domain)| EMAIL_DOMAIN_REGEX.is_match(domain))
        .unwrap_or(false);

    if !email.validate_email() || !has_dotted_domain {
        return Err(ValidationError::new("Invalid email format"));
    }

    Ok(())
}
