//! User (authentication principal) model.
//!
//! Notes only care about a user's identity; credentials stay in the user
//! repository and never travel with this struct.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a user.
pub type UserId = Uuid;

pub const USERNAME_MAX_CHARS: usize = 150;
pub const PASSWORD_MIN_CHARS: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
}

impl User {
    /// Creates a user with a generated stable ID.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            username: username.into(),
        }
    }

    pub fn validate(&self) -> Result<(), UserValidationError> {
        validate_username(&self.username)
    }
}

/// Username and password rule violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    EmptyUsername,
    UsernameTooLong { max: usize, actual: usize },
    InvalidUsername(String),
    PasswordTooShort { min: usize },
    PasswordEntirelyNumeric,
    PasswordMismatch,
}

impl Display for UserValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyUsername => write!(f, "username must not be empty"),
            Self::UsernameTooLong { max, actual } => {
                write!(f, "username must be at most {max} characters (got {actual})")
            }
            Self::InvalidUsername(value) => write!(
                f,
                "username `{value}` may only contain letters, digits and @/./+/-/_"
            ),
            Self::PasswordTooShort { min } => {
                write!(f, "password must contain at least {min} characters")
            }
            Self::PasswordEntirelyNumeric => write!(f, "password must not be entirely numeric"),
            Self::PasswordMismatch => write!(f, "the two password fields didn't match"),
        }
    }
}

impl Error for UserValidationError {}

/// Validates a username: letters, digits and `@.+-_`, up to 150 chars.
pub fn validate_username(username: &str) -> Result<(), UserValidationError> {
    if username.is_empty() {
        return Err(UserValidationError::EmptyUsername);
    }
    let actual = username.chars().count();
    if actual > USERNAME_MAX_CHARS {
        return Err(UserValidationError::UsernameTooLong {
            max: USERNAME_MAX_CHARS,
            actual,
        });
    }
    let allowed = |ch: char| ch.is_alphanumeric() || matches!(ch, '@' | '.' | '+' | '-' | '_');
    if !username.chars().all(allowed) {
        return Err(UserValidationError::InvalidUsername(username.to_string()));
    }
    Ok(())
}

/// Validates a new password and its confirmation.
pub fn validate_password(password: &str, confirmation: &str) -> Vec<UserValidationError> {
    let mut errors = Vec::new();
    if password != confirmation {
        errors.push(UserValidationError::PasswordMismatch);
        return errors;
    }
    if password.chars().count() < PASSWORD_MIN_CHARS {
        errors.push(UserValidationError::PasswordTooShort {
            min: PASSWORD_MIN_CHARS,
        });
    }
    if !password.is_empty() && password.chars().all(|ch| ch.is_ascii_digit()) {
        errors.push(UserValidationError::PasswordEntirelyNumeric);
    }
    errors
}
