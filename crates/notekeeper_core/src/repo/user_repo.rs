//! User repository contract and SQLite implementation.
//!
//! # Invariants
//! - `users.username` is UNIQUE; violations surface as `UsernameTaken`.
//! - Password hashes are stored opaque; hashing happens in the caller.

use crate::model::user::{User, UserId};
use crate::repo::{ensure_tables, parse_uuid, unique_violation_target, RepoError, RepoResult};
use rusqlite::{params, Connection, OptionalExtension};

/// A user row together with its stored password hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCredentials {
    pub user: User,
    pub password_hash: String,
}

/// Repository interface for user accounts.
pub trait UserRepository {
    fn insert_user(&self, user: &User, password_hash: &str) -> RepoResult<UserId>;
    fn find_credentials(&self, username: &str) -> RepoResult<Option<UserCredentials>>;
    fn get_user(&self, id: UserId) -> RepoResult<Option<User>>;
    fn count_users(&self) -> RepoResult<u64>;
}

/// SQLite-backed user repository.
pub struct SqliteUserRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteUserRepository<'conn> {
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_tables(conn, &["users"])?;
        Ok(Self { conn })
    }
}

impl UserRepository for SqliteUserRepository<'_> {
    fn insert_user(&self, user: &User, password_hash: &str) -> RepoResult<UserId> {
        user.validate().map_err(RepoError::UserValidation)?;

        self.conn
            .execute(
                "INSERT INTO users (id, username, password_hash) VALUES (?1, ?2, ?3);",
                params![user.id.to_string(), user.username.as_str(), password_hash],
            )
            .map_err(|err| match unique_violation_target(&err) {
                Some("users.username") => RepoError::UsernameTaken(user.username.clone()),
                _ => err.into(),
            })?;

        Ok(user.id)
    }

    fn find_credentials(&self, username: &str) -> RepoResult<Option<UserCredentials>> {
        let row = self
            .conn
            .query_row(
                "SELECT id, username, password_hash FROM users WHERE username = ?1;",
                [username],
                |row| {
                    Ok((
                        row.get::<_, String>("id")?,
                        row.get::<_, String>("username")?,
                        row.get::<_, String>("password_hash")?,
                    ))
                },
            )
            .optional()?;

        row.map(|(id, username, password_hash)| {
            Ok(UserCredentials {
                user: User {
                    id: parse_uuid(&id, "users.id")?,
                    username,
                },
                password_hash,
            })
        })
        .transpose()
    }

    fn get_user(&self, id: UserId) -> RepoResult<Option<User>> {
        let username = self
            .conn
            .query_row(
                "SELECT username FROM users WHERE id = ?1;",
                [id.to_string()],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(username.map(|username| User { id, username }))
    }

    fn count_users(&self) -> RepoResult<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM users;", [], |row| row.get(0))?;
        u64::try_from(count)
            .map_err(|_| RepoError::InvalidData(format!("negative user count {count}")))
    }
}
