//! HTTP surface for notekeeper: routing, sessions and HTML pages.
//!
//! # Responsibility
//! - Map named routes to core note and account use-cases.
//! - Derive the requester from the session cookie and pass it explicitly.
//! - Turn core outcomes into redirects, pages and status codes.
//!
//! # Invariants
//! - The database mutex is never held across an `.await`.
//! - Non-owners see 404 on note routes, never 403.

pub mod auth;
pub mod config;
pub mod crypto;
pub mod error;
pub mod handlers;
pub mod pages;
pub mod routes;

use auth::SessionStore;
use axum::routing::get;
use axum::Router;
use error::WebError;
use notekeeper_core::{
    NoteService, SqliteNoteRepository, SqliteUserRepository, UserService,
};
use rusqlite::Connection;
use std::sync::{Arc, Mutex};
use tower_http::limit::RequestBodyLimitLayer;

pub type AppState = Arc<AppData>;

/// Tunables that do not change while the server runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AppSettings {
    /// bcrypt work factor for new password hashes.
    pub password_cost: u32,
    pub max_body_bytes: usize,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            password_cost: bcrypt::DEFAULT_COST,
            max_body_bytes: 64 * 1024,
        }
    }
}

pub struct AppData {
    db: Mutex<Connection>,
    pub sessions: SessionStore,
    pub settings: AppSettings,
}

impl AppData {
    /// Wraps a migrated connection (see `notekeeper_core::db::open_db`).
    pub fn new(conn: Connection, settings: AppSettings) -> Self {
        Self {
            db: Mutex::new(conn),
            sessions: SessionStore::default(),
            settings,
        }
    }

    pub fn into_state(self) -> AppState {
        Arc::new(self)
    }

    /// Runs `f` against the note service while holding the database lock.
    pub fn with_notes<T>(
        &self,
        f: impl FnOnce(&NoteService<SqliteNoteRepository<'_>>) -> T,
    ) -> Result<T, WebError> {
        let conn = self.lock_db()?;
        let service = NoteService::new(SqliteNoteRepository::try_new(&conn)?);
        Ok(f(&service))
    }

    /// Runs `f` against the user service while holding the database lock.
    pub fn with_users<T>(
        &self,
        f: impl FnOnce(&UserService<SqliteUserRepository<'_>>) -> T,
    ) -> Result<T, WebError> {
        let conn = self.lock_db()?;
        let service = UserService::new(SqliteUserRepository::try_new(&conn)?);
        Ok(f(&service))
    }

    fn lock_db(&self) -> Result<std::sync::MutexGuard<'_, Connection>, WebError> {
        self.db
            .lock()
            .map_err(|_| WebError::Internal("database mutex poisoned".to_string()))
    }
}

pub fn create_router(state: AppState) -> Router {
    use handlers::{notes, users};

    let max_body_bytes = state.settings.max_body_bytes;
    Router::new()
        .route("/", get(notes::home))
        .route("/notes/", get(notes::list))
        .route("/add/", get(notes::add_form).post(notes::add_submit))
        .route("/done/", get(notes::success))
        .route("/note/:slug/", get(notes::detail))
        .route("/edit/:slug/", get(notes::edit_form).post(notes::edit_submit))
        .route(
            "/delete/:slug/",
            get(notes::delete_confirm)
                .post(notes::delete_submit)
                .delete(notes::delete_submit),
        )
        .route("/auth/login/", get(users::login_form).post(users::login_submit))
        .route("/auth/logout/", get(users::logout).post(users::logout))
        .route(
            "/auth/signup/",
            get(users::signup_form).post(users::signup_submit),
        )
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .with_state(state)
}
