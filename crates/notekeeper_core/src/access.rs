//! Ownership-based authorization gate for note operations.
//!
//! # Responsibility
//! - Classify each operation as public, collection-scoped or note-scoped.
//! - Decide whether a requester may run it.
//!
//! # Invariants
//! - Anonymous requesters never reach collection- or note-scoped operations.
//! - A note owned by someone else is reported exactly like a missing note.
//! - Denial never mutates state.

use crate::model::note::Note;
use crate::model::user::UserId;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Identity acting on a request, threaded explicitly into every use-case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Requester {
    Anonymous,
    Authenticated(UserId),
}

impl Requester {
    pub fn user_id(&self) -> Option<UserId> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(id) => Some(*id),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::Authenticated(_))
    }
}

impl From<Option<UserId>> for Requester {
    fn from(value: Option<UserId>) -> Self {
        value.map_or(Self::Anonymous, Self::Authenticated)
    }
}

/// What an operation touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationScope {
    /// Open to everyone (home, login, signup).
    Public,
    /// The requester's own collection (list, add, success).
    OwnCollection,
    /// One specific note (detail, edit, delete).
    Note,
}

/// Gate outcome before any note is loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDecision {
    Allow,
    LoginRequired,
}

/// Authorization failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessError {
    /// No session; callers send the requester to the login page.
    Unauthenticated,
    /// Note is missing or belongs to another user. The two are not told apart.
    NotAuthorOrMissing,
}

impl Display for AccessError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthenticated => write!(f, "authentication required"),
            Self::NotAuthorOrMissing => write!(f, "note not found"),
        }
    }
}

impl Error for AccessError {}

/// Decides access from identity and scope alone.
///
/// Ownership of a specific note is checked later by [`owned_or_not_found`]
/// or by owner-scoped storage statements.
pub fn decide(requester: &Requester, scope: OperationScope) -> AccessDecision {
    match scope {
        OperationScope::Public => AccessDecision::Allow,
        _ if requester.is_authenticated() => AccessDecision::Allow,
        _ => AccessDecision::LoginRequired,
    }
}

/// Returns the requester's user id or `Unauthenticated`.
pub fn require_authenticated(requester: &Requester) -> Result<UserId, AccessError> {
    requester.user_id().ok_or(AccessError::Unauthenticated)
}

/// Keeps `note` only when `user` authored it.
pub fn owned_or_not_found(user: UserId, note: Option<Note>) -> Result<Note, AccessError> {
    match note {
        Some(note) if note.is_authored_by(user) => Ok(note),
        _ => Err(AccessError::NotAuthorOrMissing),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        decide, owned_or_not_found, require_authenticated, AccessDecision, AccessError,
        OperationScope, Requester,
    };
    use crate::model::note::Note;
    use uuid::Uuid;

    #[test]
    fn anonymous_is_sent_to_login_for_protected_scopes() {
        let anonymous = Requester::Anonymous;
        assert_eq!(
            decide(&anonymous, OperationScope::Public),
            AccessDecision::Allow
        );
        assert_eq!(
            decide(&anonymous, OperationScope::OwnCollection),
            AccessDecision::LoginRequired
        );
        assert_eq!(
            decide(&anonymous, OperationScope::Note),
            AccessDecision::LoginRequired
        );
        assert_eq!(
            require_authenticated(&anonymous),
            Err(AccessError::Unauthenticated)
        );
    }

    #[test]
    fn authenticated_passes_scope_check() {
        let user = Uuid::new_v4();
        let requester = Requester::Authenticated(user);
        for scope in [
            OperationScope::Public,
            OperationScope::OwnCollection,
            OperationScope::Note,
        ] {
            assert_eq!(decide(&requester, scope), AccessDecision::Allow);
        }
        assert_eq!(require_authenticated(&requester), Ok(user));
    }

    #[test]
    fn foreign_and_missing_notes_are_indistinguishable() {
        let author = Uuid::new_v4();
        let reader = Uuid::new_v4();
        let note = Note::new(author, "Заголовок", "Текст", "zagolovok");

        let foreign = owned_or_not_found(reader, Some(note.clone())).unwrap_err();
        let missing = owned_or_not_found(reader, None).unwrap_err();
        assert_eq!(foreign, missing);
        assert_eq!(foreign, AccessError::NotAuthorOrMissing);

        assert_eq!(owned_or_not_found(author, Some(note.clone())), Ok(note));
    }

    #[test]
    fn requester_from_optional_id() {
        assert_eq!(Requester::from(None), Requester::Anonymous);
        let id = Uuid::new_v4();
        assert_eq!(Requester::from(Some(id)), Requester::Authenticated(id));
    }
}
