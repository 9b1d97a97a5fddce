//! User validation utilities

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

/// Returned when any signup field is absent or empty
pub const MISSING_FIELDS_MESSAGE: &str =
    "All fields are mandatory. Please provide your username, email and password.";

/// Returned when a password does not satisfy the strength policy
pub const PASSWORD_POLICY_MESSAGE: &str = "Password needs to have at least 6 chars and must contain at least one number, one lowercase and one uppercase letter.";

const MIN_PASSWORD_LENGTH: usize = 6;
const MAX_NAME_LENGTH: usize = 100;
const MAX_EMAIL_LENGTH: usize = 254;

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

/// Errors that can occur during user validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum UserValidationError {
    #[error("{}", MISSING_FIELDS_MESSAGE)]
    MissingFields,

    #[error("{}", PASSWORD_POLICY_MESSAGE)]
    WeakPassword,

    #[error("Please use a valid email address.")]
    InvalidEmail,

    #[error("Email exceeds maximum length of {0} characters")]
    EmailTooLong(usize),

    #[error("{0} cannot be empty")]
    EmptyName(&'static str),

    #[error("{0} exceeds maximum length of {1} characters")]
    NameTooLong(&'static str, usize),
}

/// Trim and lower-case an email address for storage and lookup
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate an already normalized email address
pub fn validate_email(email: &str) -> Result<(), UserValidationError> {
    if email.len() > MAX_EMAIL_LENGTH {
        return Err(UserValidationError::EmailTooLong(MAX_EMAIL_LENGTH));
    }

    if !EMAIL_PATTERN.is_match(email) {
        return Err(UserValidationError::InvalidEmail);
    }

    Ok(())
}

/// Validate a password against the strength policy
///
/// The policy holds when a single line of the password has:
/// - at least 6 UTF-16 code units
/// - an ASCII digit
/// - an ASCII lowercase letter
/// - an ASCII uppercase letter
///
/// Lines are split on `\n`, `\r`, U+2028 and U+2029.
pub fn validate_password(password: &str) -> Result<(), UserValidationError> {
    if password.split(is_line_terminator).any(line_satisfies_policy) {
        Ok(())
    } else {
        Err(UserValidationError::WeakPassword)
    }
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

fn line_satisfies_policy(line: &str) -> bool {
    line.encode_utf16().count() >= MIN_PASSWORD_LENGTH
        && line.chars().any(|c| c.is_ascii_digit())
        && line.chars().any(|c| c.is_ascii_lowercase())
        && line.chars().any(|c| c.is_ascii_uppercase())
}

/// Validate a first or last name
pub fn validate_name(field: &'static str, value: &str) -> Result<(), UserValidationError> {
    let trimmed = value.trim();

    if trimmed.is_empty() {
        return Err(UserValidationError::EmptyName(field));
    }

    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(UserValidationError::NameTooLong(field, MAX_NAME_LENGTH));
    }

    Ok(())
}
