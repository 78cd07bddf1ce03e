//! Note repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Persist notes keyed by slug, each owned by one author.
//! - Keep ownership filtering and slug uniqueness inside single statements.
//!
//! # Invariants
//! - `notes.slug` is UNIQUE; violations surface as `RepoError::SlugTaken`.
//! - `update_owned`/`delete_owned` never touch rows of other authors.
//! - `list_by_author` returns insertion order (`seq ASC`).

use crate::model::note::{Note, NoteId};
use crate::model::user::UserId;
use crate::repo::{ensure_tables, parse_uuid, unique_violation_target, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension, Row};

const NOTE_SELECT_SQL: &str = "SELECT
    id,
    title,
    text,
    slug,
    author_id
FROM notes";

/// Replacement values for an owned note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteChanges {
    pub title: String,
    pub text: String,
    pub slug: String,
}

/// Repository interface for note CRUD.
pub trait NoteRepository {
    /// Inserts one validated note. Fails with `SlugTaken` on slug collision.
    fn insert_note(&self, note: &Note) -> RepoResult<NoteId>;
    /// Gets one note by slug regardless of author.
    fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Note>>;
    /// Lists notes owned by `author` in insertion order.
    fn list_by_author(&self, author: UserId) -> RepoResult<Vec<Note>>;
    /// Rewrites title/text/slug of a note owned by `author`.
    fn update_owned(&self, author: UserId, slug: &str, changes: &NoteChanges) -> RepoResult<Note>;
    /// Deletes a note owned by `author`.
    fn delete_owned(&self, author: UserId, slug: &str) -> RepoResult<()>;
    /// Total number of notes across all authors.
    fn count_notes(&self) -> RepoResult<u64>;
}

/// SQLite-backed note repository.
pub struct SqliteNoteRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteNoteRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["users", "notes"])?;
        Ok(Self { conn })
    }
}

impl NoteRepository for SqliteNoteRepository<'_> {
    fn insert_note(&self, note: &Note) -> RepoResult<NoteId> {
        note.validate().map_err(RepoError::NoteValidation)?;

        self.conn
            .execute(
                "INSERT INTO notes (id, title, text, slug, author_id)
                 VALUES (?1, ?2, ?3, ?4, ?5);",
                params![
                    note.id.to_string(),
                    note.title.as_str(),
                    note.text.as_str(),
                    note.slug.as_str(),
                    note.author.to_string(),
                ],
            )
            .map_err(|err| map_write_error(err, &note.slug))?;

        Ok(note.id)
    }

    fn find_by_slug(&self, slug: &str) -> RepoResult<Option<Note>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{NOTE_SELECT_SQL} WHERE slug = ?1;"))?;
        let mut rows = stmt.query([slug])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_note_row(row)?));
        }
        Ok(None)
    }

    fn list_by_author(&self, author: UserId) -> RepoResult<Vec<Note>> {
        let mut stmt = self.conn.prepare(&format!(
            "{NOTE_SELECT_SQL} WHERE author_id = ?1 ORDER BY seq ASC;"
        ))?;
        let mut rows = stmt.query([author.to_string()])?;
        let mut notes = Vec::new();
        while let Some(row) = rows.next()? {
            notes.push(parse_note_row(row)?);
        }
        Ok(notes)
    }

    fn update_owned(&self, author: UserId, slug: &str, changes: &NoteChanges) -> RepoResult<Note> {
        let candidate = Note {
            id: NoteId::nil(),
            title: changes.title.clone(),
            text: changes.text.clone(),
            slug: changes.slug.clone(),
            author,
        };
        candidate.validate().map_err(RepoError::NoteValidation)?;

        // Single statement: ownership filter and unique index apply atomically.
        let updated = self
            .conn
            .query_row(
                "UPDATE notes
                 SET
                    title = ?3,
                    text = ?4,
                    slug = ?5,
                    updated_at = (strftime('%s', 'now') * 1000)
                 WHERE slug = ?1
                   AND author_id = ?2
                 RETURNING id, title, text, slug, author_id;",
                params![
                    slug,
                    author.to_string(),
                    changes.title.as_str(),
                    changes.text.as_str(),
                    changes.slug.as_str(),
                ],
                |row| Ok(parse_note_row(row)),
            )
            .optional()
            .map_err(|err| map_write_error(err, &changes.slug))?;

        match updated {
            Some(note) => note,
            None => Err(RepoError::NotFound(slug.to_string())),
        }
    }

    fn delete_owned(&self, author: UserId, slug: &str) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM notes WHERE slug = ?1 AND author_id = ?2;",
            params![slug, author.to_string()],
        )?;

        if changed == 0 {
            return Err(RepoError::NotFound(slug.to_string()));
        }
        Ok(())
    }

    fn count_notes(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM notes;", [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative note count {count}")))
    }
}

fn map_write_error(err: rusqlite::Error, slug: &str) -> RepoError {
    match unique_violation_target(&err) {
        Some("notes.slug") => RepoError::SlugTaken(slug.to_string()),
        _ => err.into(),
    }
}

fn parse_note_row(row: &Row<'_>) -> RepoResult<Note> {
    let id_text: String = row.get("id")?;
    let author_text: String = row.get("author_id")?;
    Ok(Note {
        id: parse_uuid(&id_text, "notes.id")?,
        title: row.get("title")?,
        text: row.get("text")?,
        slug: row.get("slug")?,
        author: parse_uuid(&author_text, "notes.author_id")?,
    })
}

#[cfg(test)]
mod tests {
    use super::{NoteChanges, NoteRepository, SqliteNoteRepository};
    use crate::db::open_db_in_memory;
    use crate::model::note::Note;
    use crate::model::user::User;
    use crate::repo::user_repo::{SqliteUserRepository, UserRepository};
    use crate::repo::RepoError;
    use rusqlite::Connection;

    fn seed_user(conn: &Connection, name: &str) -> User {
        let repo = SqliteUserRepository::try_new(conn).unwrap();
        let user = User::new(name);
        repo.insert_user(&user, "hash").unwrap();
        user
    }

    #[test]
    fn insert_rejects_duplicate_slug_without_second_row() {
        let conn = open_db_in_memory().unwrap();
        let author = seed_user(&conn, "author");
        let repo = SqliteNoteRepository::try_new(&conn).unwrap();

        repo.insert_note(&Note::new(author.id, "One", "", "same"))
            .unwrap();
        let err = repo
            .insert_note(&Note::new(author.id, "Two", "", "same"))
            .unwrap_err();

        assert!(matches!(err, RepoError::SlugTaken(ref slug) if slug == "same"));
        assert_eq!(repo.count_notes().unwrap(), 1);
    }

    #[test]
    fn update_owned_ignores_foreign_rows() {
        let conn = open_db_in_memory().unwrap();
        let author = seed_user(&conn, "author");
        let reader = seed_user(&conn, "reader");
        let repo = SqliteNoteRepository::try_new(&conn).unwrap();
        repo.insert_note(&Note::new(author.id, "One", "body", "one"))
            .unwrap();

        let changes = NoteChanges {
            title: "Hijacked".to_string(),
            text: "x".to_string(),
            slug: "one".to_string(),
        };
        let err = repo.update_owned(reader.id, "one", &changes).unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));

        let stored = repo.find_by_slug("one").unwrap().unwrap();
        assert_eq!(stored.title, "One");
        assert_eq!(stored.author, author.id);
    }

    #[test]
    fn update_owned_keeps_own_slug_and_rejects_foreign_slug() {
        let conn = open_db_in_memory().unwrap();
        let author = seed_user(&conn, "author");
        let repo = SqliteNoteRepository::try_new(&conn).unwrap();
        repo.insert_note(&Note::new(author.id, "One", "", "one"))
            .unwrap();
        repo.insert_note(&Note::new(author.id, "Two", "", "two"))
            .unwrap();

        let same_slug = NoteChanges {
            title: "One v2".to_string(),
            text: String::new(),
            slug: "one".to_string(),
        };
        let updated = repo.update_owned(author.id, "one", &same_slug).unwrap();
        assert_eq!(updated.title, "One v2");

        let taken = NoteChanges {
            slug: "two".to_string(),
            ..same_slug
        };
        let err = repo.update_owned(author.id, "one", &taken).unwrap_err();
        assert!(matches!(err, RepoError::SlugTaken(ref slug) if slug == "two"));
    }

    #[test]
    fn list_by_author_uses_insertion_order() {
        let conn = open_db_in_memory().unwrap();
        let author = seed_user(&conn, "author");
        let repo = SqliteNoteRepository::try_new(&conn).unwrap();
        for slug in ["c", "a", "b"] {
            repo.insert_note(&Note::new(author.id, slug, "", slug))
                .unwrap();
        }

        let slugs: Vec<String> = repo
            .list_by_author(author.id)
            .unwrap()
            .into_iter()
            .map(|note| note.slug)
            .collect();
        assert_eq!(slugs, vec!["c", "a", "b"]);
    }
}
