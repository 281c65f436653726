// ============================
// crates/backend-lib/src/validation/mod.rs
// ============================
//! Request body validation, applied before any workflow logic runs.

use crate::config::PasswordRequirements;
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;
use userservice_common::{LoginRequest, SignupRequest};

const MIN_USERNAME_LENGTH: usize = 3;
const MAX_USERNAME_LENGTH: usize = 20;
const MAX_EMAIL_LENGTH: usize = 50;

static USERNAME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9._-]+$").expect("username pattern compiles"));
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email pattern compiles")
});

/// Possible validation errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Invalid username: {0}")]
    InvalidUsername(String),

    #[error("Invalid email: {0}")]
    InvalidEmail(String),

    #[error("Invalid password: {0}")]
    InvalidPassword(String),
}

/// Result type for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validate a username chosen at registration
pub fn validate_username(username: &str) -> ValidationResult<&str> {
    let length = username.chars().count();
    if length < MIN_USERNAME_LENGTH || length > MAX_USERNAME_LENGTH {
        return Err(ValidationError::InvalidUsername(format!(
            "Username must be between {MIN_USERNAME_LENGTH} and {MAX_USERNAME_LENGTH} characters"
        )));
    }

    if !USERNAME_REGEX.is_match(username) {
        return Err(ValidationError::InvalidUsername(
            "Username may only contain letters, digits, '.', '_' and '-'".to_string(),
        ));
    }

    Ok(username)
}

/// Validate an email address
pub fn validate_email(email: &str) -> ValidationResult<&str> {
    if email.is_empty() {
        return Err(ValidationError::InvalidEmail(
            "Email address cannot be empty".to_string(),
        ));
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::InvalidEmail(format!(
            "Email address cannot exceed {MAX_EMAIL_LENGTH} characters"
        )));
    }

    if !EMAIL_REGEX.is_match(email) {
        return Err(ValidationError::InvalidEmail(
            "Invalid email address format".to_string(),
        ));
    }

    Ok(email)
}

/// Validate a new password against the configured policy
pub fn validate_password<'a>(
    password: &'a str,
    requirements: &PasswordRequirements,
) -> ValidationResult<&'a str> {
    let length = password.chars().count();
    if length < requirements.min_length {
        return Err(ValidationError::InvalidPassword(format!(
            "Password must be at least {} characters",
            requirements.min_length
        )));
    }

    if length > requirements.max_length {
        return Err(ValidationError::InvalidPassword(format!(
            "Password cannot exceed {} characters",
            requirements.max_length
        )));
    }

    if requirements.require_uppercase && !password.chars().any(char::is_uppercase) {
        return Err(ValidationError::InvalidPassword(
            "Password must contain an uppercase letter".to_string(),
        ));
    }

    if requirements.require_lowercase && !password.chars().any(char::is_lowercase) {
        return Err(ValidationError::InvalidPassword(
            "Password must contain a lowercase letter".to_string(),
        ));
    }

    if requirements.require_digit && !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(ValidationError::InvalidPassword(
            "Password must contain a digit".to_string(),
        ));
    }

    if requirements.require_special && !password.chars().any(|c| !c.is_alphanumeric()) {
        return Err(ValidationError::InvalidPassword(
            "Password must contain a special character".to_string(),
        ));
    }

    Ok(password)
}

/// Sign-in only requires both fields to be present; format rules apply at
/// registration so that existing accounts can always attempt to log in.
pub fn validate_login(request: &LoginRequest) -> ValidationResult<()> {
    if request.username.trim().is_empty() {
        return Err(ValidationError::InvalidUsername(
            "Username must not be empty".to_string(),
        ));
    }

    if request.password.is_empty() {
        return Err(ValidationError::InvalidPassword(
            "Password must not be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validate a registration request
pub fn validate_signup(
    request: &SignupRequest,
    requirements: &PasswordRequirements,
) -> ValidationResult<()> {
    validate_username(&request.username)?;
    validate_email(&request.email)?;
    validate_password(&request.password, requirements)?;
    Ok(())
}
