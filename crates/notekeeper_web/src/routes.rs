//! Named routes, URL reversal and redirect helpers.

use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters kept verbatim in the login `next` parameter.
const NEXT_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'/')
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Every page the application serves, by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    Home,
    List,
    Add,
    Success,
    Detail(&'a str),
    Edit(&'a str),
    Delete(&'a str),
    Login,
    Logout,
    Signup,
}

impl Route<'_> {
    /// Reverses the route into its URL path.
    pub fn path(&self) -> String {
        match self {
            Self::Home => "/".to_string(),
            Self::List => "/notes/".to_string(),
            Self::Add => "/add/".to_string(),
            Self::Success => "/done/".to_string(),
            Self::Detail(slug) => format!("/note/{slug}/"),
            Self::Edit(slug) => format!("/edit/{slug}/"),
            Self::Delete(slug) => format!("/delete/{slug}/"),
            Self::Login => "/auth/login/".to_string(),
            Self::Logout => "/auth/logout/".to_string(),
            Self::Signup => "/auth/signup/".to_string(),
        }
    }
}

/// Login page URL carrying `next` so the user returns after signing in.
pub fn login_url(next: &str) -> String {
    format!(
        "{}?next={}",
        Route::Login.path(),
        utf8_percent_encode(next, NEXT_ENCODE_SET)
    )
}

/// Accepts only same-site absolute paths as post-login targets.
pub fn safe_next(next: Option<&str>) -> Option<&str> {
    next.map(str::trim)
        .filter(|value| value.starts_with('/') && !value.starts_with("//"))
        .filter(|value| !value.contains('\\'))
}

/// `302 Found` redirect.
pub fn found(location: &str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location.to_string())]).into_response()
}
