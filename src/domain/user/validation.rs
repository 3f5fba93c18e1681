//! User profile validation utilities

use thiserror::Error;

use super::entity::UserProfile;

/// Errors that can occur during profile validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("{0} cannot be empty")]
    EmptyField(&'static str),

    #[error("{field} exceeds maximum length of {max} characters")]
    FieldTooLong { field: &'static str, max: usize },

    #[error("Email cannot be empty")]
    EmptyEmail,

    #[error("Email '{0}' is not a valid address")]
    InvalidEmail(String),
}

const MAX_FIELD_LENGTH: usize = 255;

/// Validate an email address
///
/// Rules:
/// - Cannot be empty
/// - Exactly one '@' with a non-empty local part and domain
/// - Domain contains a '.' that is neither its first nor last character
/// - No whitespace
pub fn validate_email(email: &str) -> Result<(), UserValidationError> {
    if email.is_empty() {
        return Err(UserValidationError::EmptyEmail);
    }

    let invalid = || UserValidationError::InvalidEmail(email.to_string());

    if email.chars().any(char::is_whitespace) {
        return Err(invalid());
    }

    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;

    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(invalid());
    }

    match domain.find('.') {
        Some(pos) if pos > 0 && !domain.ends_with('.') => Ok(()),
        _ => Err(invalid()),
    }
}

fn require(field: &'static str, value: &str) -> Result<(), UserValidationError> {
    if value.trim().is_empty() {
        return Err(UserValidationError::EmptyField(field));
    }

    if value.chars().count() > MAX_FIELD_LENGTH {
        return Err(UserValidationError::FieldTooLong {
            field,
            max: MAX_FIELD_LENGTH,
        });
    }

    Ok(())
}

/// Validate the required fields of a profile
///
/// Address line 2 is optional; everything else must be present.
pub fn validate_profile(profile: &UserProfile) -> Result<(), UserValidationError> {
    require("First name", &profile.first_name)?;
    require("Last name", &profile.last_name)?;
    require("Address", &profile.address1)?;
    require("Zip code", &profile.zip_code)?;
    validate_email(&profile.email)
}
