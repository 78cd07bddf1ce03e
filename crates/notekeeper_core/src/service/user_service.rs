//! Account use-case service: signup validation, registration, lookup.
//!
//! Password hashing is left to the caller so this crate stays free of
//! CPU-heavy crypto and async runtimes.

use crate::model::user::{validate_password, validate_username, User, UserId};
use crate::repo::user_repo::{UserCredentials, UserRepository};
use crate::repo::{RepoError, RepoResult};
use crate::service::FieldError;
use log::info;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

const USERNAME_TAKEN_MESSAGE: &str = "A user with that username already exists.";

/// Submitted signup form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignupForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password1: String,
    #[serde(default)]
    pub password2: String,
}

#[derive(Debug)]
pub enum UserServiceError {
    Validation(Vec<FieldError>),
    Repo(RepoError),
}

impl Display for UserServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(errors) => write!(f, "signup rejected with {} error(s)", errors.len()),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for UserServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Validation(_) => None,
        }
    }
}

impl From<RepoError> for UserServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::UsernameTaken(_) => {
                Self::Validation(vec![FieldError::new("username", USERNAME_TAKEN_MESSAGE)])
            }
            RepoError::UserValidation(err) => {
                Self::Validation(vec![FieldError::new("username", err.to_string())])
            }
            other => Self::Repo(other),
        }
    }
}

pub struct UserService<R: UserRepository> {
    repo: R,
}

impl<R: UserRepository> UserService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Checks username and password rules without touching storage.
    pub fn validate_signup(&self, form: &SignupForm) -> Result<(), UserServiceError> {
        let mut errors = Vec::new();
        if let Err(err) = validate_username(form.username.trim()) {
            errors.push(FieldError::new("username", err.to_string()));
        }
        for err in validate_password(&form.password1, &form.password2) {
            errors.push(FieldError::new("password2", err.to_string()));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(UserServiceError::Validation(errors))
        }
    }

    /// Stores a new account with an already computed password hash.
    pub fn register(
        &self,
        form: &SignupForm,
        password_hash: &str,
    ) -> Result<User, UserServiceError> {
        self.validate_signup(form)?;
        let user = User::new(form.username.trim());
        self.repo.insert_user(&user, password_hash)?;
        info!("event=user_signup module=users status=ok user_id={}", user.id);
        Ok(user)
    }

    pub fn find_credentials(&self, username: &str) -> RepoResult<Option<UserCredentials>> {
        self.repo.find_credentials(username.trim())
    }

    pub fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        self.repo.get_user(id)
    }
}
