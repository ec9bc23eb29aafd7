use crate::error::ValidationError;
use regex::Regex;
use std::sync::LazyLock;

/// Practical subset of RFC 5322, compiled once.
static EMAIL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("Invalid email regex pattern")
});

const MAX_EMAIL_LENGTH: usize = 254;
const MAX_PASSWORD_LENGTH: usize = 128;

/// Validates an email address for a new or changed record.
///
/// ```rust
/// use timeline_core::validation::validate_email;
///
/// assert!(validate_email("alice@example.com").is_ok());
/// assert!(validate_email("alice").is_err());
/// ```
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::MissingField(
            "Email is required".to_string(),
        ));
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::InvalidEmail(
            "Email is too long".to_string(),
        ));
    }

    if EMAIL_REGEX.is_match(email) {
        Ok(())
    } else {
        Err(ValidationError::InvalidEmail(email.to_string()))
    }
}

/// Validates a password chosen at registration.
///
/// Only presence and an upper bound are enforced; strength rules are left to
/// the client.
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(ValidationError::MissingField(
            "Password is required".to_string(),
        ));
    }

    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(ValidationError::InvalidField(format!(
            "Password must be at most {MAX_PASSWORD_LENGTH} characters"
        )));
    }

    Ok(())
}

/// Rejects an empty value for a required field.
pub fn require_non_empty(value: &str, field_name: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        Err(ValidationError::MissingField(format!(
            "{field_name} is required"
        )))
    } else {
        Ok(())
    }
}

/// Validates a product price: finite and not negative.
pub fn validate_price(price: f64) -> Result<(), ValidationError> {
    if price.is_finite() && price >= 0.0 {
        Ok(())
    } else {
        Err(ValidationError::InvalidField(
            "Price must be a non-negative number".to_string(),
        ))
    }
}
