//! Core domain logic for notekeeper.
//! This crate is the single source of truth for note ownership and slug rules.

pub mod access;
pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;
pub mod slug;

pub use access::{
    decide, owned_or_not_found, require_authenticated, AccessDecision, AccessError,
    OperationScope, Requester,
};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::note::{Note, NoteDraft, NoteField, NoteId, NoteValidationError};
pub use model::user::{User, UserId, UserValidationError};
pub use repo::note_repo::{NoteChanges, NoteRepository, SqliteNoteRepository};
pub use repo::user_repo::{SqliteUserRepository, UserCredentials, UserRepository};
pub use repo::{RepoError, RepoResult};
pub use service::note_service::{NoteService, NoteServiceError};
pub use service::user_service::{SignupForm, UserService, UserServiceError};
pub use service::{messages_for, FieldError};
pub use slug::{resolve_slug, slugify, SLUG_TAKEN_WARNING};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
