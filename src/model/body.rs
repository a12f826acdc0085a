use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

/// Payload of `POST /accounts`.
///
/// Every field falls back to its default when absent so that incomplete
/// payloads reach the validator instead of failing deserialization.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct CreateAccountRequestBody {
    #[validate(
        length(
            min = 3,
            max = 32,
            message = "Username must contain between 3 and 32 characters."
        ),
        custom(
            function = "validate_username",
            message = "Username must be alphanumeric."
        )
    )]
    pub username: String,
    #[validate(email(message = "Email must be formatted."))]
    pub email: String,
    #[validate(
        length(
            min = 8,
            max = 255,
            message = "Password must contain at least 8 characters."
        ),
        custom(
            function = "validate_password",
            message = "Password must contain a letter and a digit."
        )
    )]
    pub password: String,
}

/// Allow ASCII letters, digits, `_` and `-`.
fn validate_username(username: &str) -> Result<(), ValidationError> {
    if username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
    {
        Ok(())
    } else {
        Err(ValidationError::new("username"))
    }
}

fn validate_password(password: &str) -> Result<(), ValidationError> {
    let has_letter = password.chars().any(char::is_alphabetic);
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if has_letter && has_digit {
        Ok(())
    } else {
        Err(ValidationError::new("password"))
    }
}
