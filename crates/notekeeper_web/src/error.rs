//! Request-level error type and its HTTP mapping.

use crate::pages;
use crate::routes;
use axum::http::{StatusCode, Uri};
use axum::response::{Html, IntoResponse, Response};
use notekeeper_core::{NoteServiceError, RepoError, UserServiceError};
use thiserror::Error;

/// Errors that end a request without rendering its page.
///
/// Validation failures are not represented here: handlers re-render the
/// submitted form instead of failing.
#[derive(Debug, Error)]
pub enum WebError {
    /// Anonymous requester on a protected route.
    #[error("login required for {next}")]
    LoginRequired { next: String },

    /// Missing note or a note owned by someone else.
    #[error("not found")]
    NotFound,

    /// Malformed form body.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Storage, hashing or other server-side failure.
    #[error("internal error: {0}")]
    Internal(String),
}

impl WebError {
    /// Login redirect that brings the requester back to `uri` afterwards.
    pub fn login_required(uri: &Uri) -> Self {
        let next = uri
            .path_and_query()
            .map_or_else(|| uri.path().to_string(), ToString::to_string);
        Self::LoginRequired { next }
    }

    /// Maps a note use-case failure that is not a form validation error.
    pub fn from_note_error(err: NoteServiceError, uri: &Uri) -> Self {
        match err {
            NoteServiceError::Unauthenticated => Self::login_required(uri),
            NoteServiceError::NotAuthorOrMissing => Self::NotFound,
            NoteServiceError::Validation(errors) => {
                Self::Internal(format!("unhandled note validation ({} errors)", errors.len()))
            }
            NoteServiceError::Repo(err) => err.into(),
        }
    }

    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::LoginRequired { .. } => StatusCode::FOUND,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<RepoError> for WebError {
    fn from(value: RepoError) -> Self {
        Self::Internal(value.to_string())
    }
}

impl From<UserServiceError> for WebError {
    fn from(value: UserServiceError) -> Self {
        Self::Internal(value.to_string())
    }
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match self {
            Self::LoginRequired { next } => routes::found(&routes::login_url(&next)),
            Self::NotFound => (StatusCode::NOT_FOUND, Html(pages::not_found())).into_response(),
            Self::BadRequest(reason) => {
                log::warn!("event=http_request module=web status=bad_request reason={reason}");
                (StatusCode::BAD_REQUEST, Html(pages::bad_request())).into_response()
            }
            Self::Internal(reason) => {
                log::error!("event=http_request module=web status=error error={reason}");
                // Details stay in the log.
                (StatusCode::INTERNAL_SERVER_ERROR, Html(pages::server_error())).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::WebError;
    use axum::http::{header, StatusCode, Uri};
    use axum::response::IntoResponse;
    use notekeeper_core::NoteServiceError;

    #[test]
    fn status_codes() {
        assert_eq!(WebError::NotFound.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            WebError::Internal("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            WebError::BadRequest("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn unauthenticated_note_error_redirects_with_next() {
        let uri: Uri = "/edit/zagolovok/".parse().unwrap();
        let response =
            WebError::from_note_error(NoteServiceError::Unauthenticated, &uri).into_response();
        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(
            response.headers()[header::LOCATION],
            "/auth/login/?next=/edit/zagolovok/"
        );
    }

    #[test]
    fn foreign_note_maps_to_not_found() {
        let uri: Uri = "/note/zagolovok/".parse().unwrap();
        let err = WebError::from_note_error(NoteServiceError::NotAuthorOrMissing, &uri);
        assert!(matches!(err, WebError::NotFound));
    }
}
