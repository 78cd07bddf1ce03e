//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Apply authorization and slug policy before storage is touched.
//! - Keep the web layer decoupled from storage details.

pub mod note_service;
pub mod user_service;

use serde::Serialize;

/// A validation message attached to one form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Form field name (`title`, `slug`, `username`, ...).
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Messages for `field`, in submission order.
pub fn messages_for<'a>(errors: &'a [FieldError], field: &'a str) -> Vec<&'a str> {
    errors
        .iter()
        .filter(|error| error.field == field)
        .map(|error| error.message.as_str())
        .collect()
}
