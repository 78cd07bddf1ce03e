//! Note domain model.
//!
//! # Responsibility
//! - Define the persisted note record and the submitted draft shape.
//! - Validate title and slug fields before any storage write.
//!
//! # Invariants
//! - `id` is stable and never reused for another note.
//! - `author` is set once at creation and never rewritten.
//! - `slug` matches `[-a-zA-Z0-9_]+` and is at most `SLUG_MAX_CHARS` long.

use crate::model::user::UserId;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a note.
pub type NoteId = Uuid;

/// Maximum title length in characters.
pub const TITLE_MAX_CHARS: usize = 100;
/// Maximum slug length in characters.
pub const SLUG_MAX_CHARS: usize = 100;

/// Canonical persisted note.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: NoteId,
    pub title: String,
    pub text: String,
    /// Unique URL identifier across all notes.
    pub slug: String,
    /// Owning user. Only this user may read or mutate the note.
    pub author: UserId,
}

impl Note {
    /// Creates a note with a generated stable ID.
    ///
    /// Does not validate; call [`Note::validate`] before persisting.
    pub fn new(
        author: UserId,
        title: impl Into<String>,
        text: impl Into<String>,
        slug: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            text: text.into(),
            slug: slug.into(),
            author,
        }
    }

    /// Checks title and slug against field rules.
    ///
    /// Returns every violated rule so that callers can attach all errors to
    /// their fields at once.
    pub fn validate(&self) -> Result<(), Vec<NoteValidationError>> {
        let mut errors = Vec::new();
        if let Err(err) = validate_title(&self.title) {
            errors.push(err);
        }
        if let Err(err) = validate_slug(&self.slug) {
            errors.push(err);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Returns whether `user` owns this note.
    pub fn is_authored_by(&self, user: UserId) -> bool {
        self.author == user
    }
}

/// Submitted form values for create and edit.
///
/// An absent or blank `slug` asks the slug policy to derive one from `title`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoteDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub slug: Option<String>,
}

impl NoteDraft {
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            text: text.into(),
            slug: None,
        }
    }

    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }
}

/// Note form field that a validation error belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NoteField {
    Title,
    Slug,
}

impl NoteField {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Title => "title",
            Self::Slug => "slug",
        }
    }
}

/// Field rule violations for notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    EmptyTitle,
    TitleTooLong { max: usize, actual: usize },
    EmptySlug,
    SlugTooLong { max: usize, actual: usize },
    InvalidSlug(String),
}

impl NoteValidationError {
    /// Form field the violation is reported on.
    pub fn field(&self) -> NoteField {
        match self {
            Self::EmptyTitle | Self::TitleTooLong { .. } => NoteField::Title,
            Self::EmptySlug | Self::SlugTooLong { .. } | Self::InvalidSlug(_) => NoteField::Slug,
        }
    }
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "title must not be empty"),
            Self::TitleTooLong { max, actual } => {
                write!(f, "title must be at most {max} characters (got {actual})")
            }
            Self::EmptySlug => write!(
                f,
                "slug could not be derived from the title; enter one explicitly"
            ),
            Self::SlugTooLong { max, actual } => {
                write!(f, "slug must be at most {max} characters (got {actual})")
            }
            Self::InvalidSlug(value) => write!(
                f,
                "slug `{value}` may only contain latin letters, digits, hyphens and underscores"
            ),
        }
    }
}

impl Error for NoteValidationError {}

fn validate_title(title: &str) -> Result<(), NoteValidationError> {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        return Err(NoteValidationError::EmptyTitle);
    }
    let actual = trimmed.chars().count();
    if actual > TITLE_MAX_CHARS {
        return Err(NoteValidationError::TitleTooLong {
            max: TITLE_MAX_CHARS,
            actual,
        });
    }
    Ok(())
}

fn validate_slug(slug: &str) -> Result<(), NoteValidationError> {
    if slug.is_empty() {
        return Err(NoteValidationError::EmptySlug);
    }
    let actual = slug.chars().count();
    if actual > SLUG_MAX_CHARS {
        return Err(NoteValidationError::SlugTooLong {
            max: SLUG_MAX_CHARS,
            actual,
        });
    }
    if !slug
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_')
    {
        return Err(NoteValidationError::InvalidSlug(slug.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{Note, NoteField, NoteValidationError, SLUG_MAX_CHARS};
    use uuid::Uuid;

    #[test]
    fn validate_accepts_plain_note() {
        let note = Note::new(Uuid::new_v4(), "Title", "", "note_slug-1");
        assert!(note.validate().is_ok());
    }

    #[test]
    fn validate_reports_title_and_slug_errors_together() {
        let note = Note::new(Uuid::new_v4(), "   ", "body", "bad slug");
        let errors = note.validate().expect_err("note must be rejected");
        assert_eq!(
            errors,
            vec![
                NoteValidationError::EmptyTitle,
                NoteValidationError::InvalidSlug("bad slug".to_string()),
            ]
        );
        assert_eq!(errors[0].field(), NoteField::Title);
        assert_eq!(errors[1].field(), NoteField::Slug);
    }

    #[test]
    fn validate_rejects_overlong_slug() {
        let slug = "a".repeat(SLUG_MAX_CHARS + 1);
        let note = Note::new(Uuid::new_v4(), "Title", "", slug);
        let errors = note.validate().expect_err("long slug must be rejected");
        assert!(matches!(
            errors[0],
            NoteValidationError::SlugTooLong { actual: 101, .. }
        ));
    }

    #[test]
    fn validate_rejects_non_latin_slug() {
        let note = Note::new(Uuid::new_v4(), "Title", "", "заметка");
        let errors = note.validate().expect_err("cyrillic slug must be rejected");
        assert!(matches!(errors[0], NoteValidationError::InvalidSlug(_)));
    }
}
