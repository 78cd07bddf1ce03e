//! Note use-case service.
//!
//! # Responsibility
//! - Provide create/list/get/update/delete for the acting requester.
//! - Resolve slugs (submitted or derived) and map collisions to field errors.
//! - Report foreign and missing notes through the same `NotAuthorOrMissing`.
//!
//! # Invariants
//! - Authentication is checked before any validation or storage call.
//! - Ownership is checked before a submitted draft is validated.
//! - The author of a note is the creator; edits never reassign it.
//! - Rejected submissions leave storage untouched.

use crate::access::{owned_or_not_found, require_authenticated, AccessError, Requester};
use crate::model::note::{Note, NoteDraft};
use crate::repo::note_repo::{NoteChanges, NoteRepository};
use crate::repo::{RepoError, RepoResult};
use crate::service::FieldError;
use crate::slug::{resolve_slug, slug_taken_message};
use log::{info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for note use-cases.
#[derive(Debug)]
pub enum NoteServiceError {
    /// Requester has no session.
    Unauthenticated,
    /// Note is missing or owned by someone else.
    NotAuthorOrMissing,
    /// Submission rejected; errors are attached to form fields.
    Validation(Vec<FieldError>),
    /// Persistence-layer failure.
    Repo(RepoError),
}

impl Display for NoteServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthenticated => write!(f, "authentication required"),
            Self::NotAuthorOrMissing => write!(f, "note not found"),
            Self::Validation(errors) => write!(f, "note rejected with {} error(s)", errors.len()),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for NoteServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<AccessError> for NoteServiceError {
    fn from(value: AccessError) -> Self {
        match value {
            AccessError::Unauthenticated => Self::Unauthenticated,
            AccessError::NotAuthorOrMissing => Self::NotAuthorOrMissing,
        }
    }
}

impl From<RepoError> for NoteServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(_) => Self::NotAuthorOrMissing,
            RepoError::SlugTaken(slug) => {
                Self::Validation(vec![FieldError::new("slug", slug_taken_message(&slug))])
            }
            RepoError::NoteValidation(errors) => Self::Validation(
                errors
                    .iter()
                    .map(|err| FieldError::new(err.field().as_str(), err.to_string()))
                    .collect(),
            ),
            other => Self::Repo(other),
        }
    }
}

/// Note service facade over repository implementations.
pub struct NoteService<R: NoteRepository> {
    repo: R,
}

impl<R: NoteRepository> NoteService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates a note owned by the requester.
    ///
    /// A blank `draft.slug` is derived from the title.
    pub fn create_note(
        &self,
        requester: &Requester,
        draft: NoteDraft,
    ) -> Result<Note, NoteServiceError> {
        let author = require_authenticated(requester)?;
        let title = draft.title.trim();
        let slug = resolve_slug(draft.slug.as_deref(), title);
        let note = Note::new(author, title, draft.text.trim(), slug);

        self.repo
            .insert_note(&note)
            .map_err(|err| rejected("note_create", err))?;
        info!(
            "event=note_create module=notes status=ok note_id={} author_id={}",
            note.id, author
        );
        Ok(note)
    }

    /// Lists the requester's own notes in insertion order.
    pub fn list_notes(&self, requester: &Requester) -> Result<Vec<Note>, NoteServiceError> {
        let author = require_authenticated(requester)?;
        Ok(self.repo.list_by_author(author)?)
    }

    /// Gets one of the requester's notes by slug.
    pub fn get_note(&self, requester: &Requester, slug: &str) -> Result<Note, NoteServiceError> {
        let user = require_authenticated(requester)?;
        let found = self.repo.find_by_slug(slug)?;
        Ok(owned_or_not_found(user, found)?)
    }

    /// Replaces title, text and slug of one of the requester's notes.
    ///
    /// A blank `draft.slug` is re-derived from the new title. A foreign or
    /// missing note is reported before the draft is validated.
    pub fn update_note(
        &self,
        requester: &Requester,
        slug: &str,
        draft: NoteDraft,
    ) -> Result<Note, NoteServiceError> {
        let user = require_authenticated(requester)?;
        if let Err(err) = owned_or_not_found(user, self.repo.find_by_slug(slug)?) {
            warn!("event=note_update module=notes status=rejected reason=not_found");
            return Err(err.into());
        }

        let title = draft.title.trim();
        let changes = NoteChanges {
            title: title.to_string(),
            text: draft.text.trim().to_string(),
            slug: resolve_slug(draft.slug.as_deref(), title),
        };

        let note = self
            .repo
            .update_owned(user, slug, &changes)
            .map_err(|err| rejected("note_update", err))?;
        info!(
            "event=note_update module=notes status=ok note_id={} author_id={}",
            note.id, note.author
        );
        Ok(note)
    }

    /// Deletes one of the requester's notes.
    pub fn delete_note(&self, requester: &Requester, slug: &str) -> Result<(), NoteServiceError> {
        let user = require_authenticated(requester)?;
        self.repo
            .delete_owned(user, slug)
            .map_err(|err| rejected("note_delete", err))?;
        info!("event=note_delete module=notes status=ok author_id={user}");
        Ok(())
    }

    /// Total number of stored notes across all authors.
    pub fn count_notes(&self) -> RepoResult<u64> {
        self.repo.count_notes()
    }
}

fn rejected(event: &str, err: RepoError) -> NoteServiceError {
    let reason = match &err {
        RepoError::NotFound(_) => "not_found",
        RepoError::SlugTaken(_) => "slug_taken",
        RepoError::NoteValidation(_) => "invalid",
        _ => "storage",
    };
    warn!("event={event} module=notes status=rejected reason={reason}");
    err.into()
}
