#![allow(dead_code)]

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use notekeeper_core::db::open_db_in_memory;
use notekeeper_core::{Note, Requester, SignupForm, User};
use notekeeper_web::{auth, create_router, AppData, AppSettings, AppState};
use tower::ServiceExt;

pub const PASSWORD: &str = "correct-horse-42";

pub fn test_state() -> AppState {
    let conn = open_db_in_memory().unwrap();
    let settings = AppSettings {
        password_cost: 4,
        ..AppSettings::default()
    };
    AppData::new(conn, settings).into_state()
}

/// Registers `username` with a throwaway hash; login is done via [`force_login`].
pub fn create_user(state: &AppState, username: &str) -> User {
    let form = SignupForm {
        username: username.to_string(),
        password1: PASSWORD.to_string(),
        password2: PASSWORD.to_string(),
    };
    state
        .with_users(|users| users.register(&form, "not-a-real-hash"))
        .unwrap()
        .unwrap()
}

/// Returns a `Cookie` header value for a fresh session of `user`.
pub async fn force_login(state: &AppState, user: &User) -> String {
    let session_id = auth::create_session(user.id, &state.sessions).await;
    format!("{}={session_id}", auth::SESSION_COOKIE)
}

pub async fn send(
    state: &AppState,
    method: Method,
    uri: &str,
    cookie: Option<&str>,
    form: Option<&[(&str, &str)]>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let body = match form {
        Some(fields) => {
            builder = builder.header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
            Body::from(encode_form(fields))
        }
        None => Body::empty(),
    };
    create_router(state.clone())
        .oneshot(builder.body(body).unwrap())
        .await
        .unwrap()
}

pub async fn get(state: &AppState, uri: &str, cookie: Option<&str>) -> Response {
    send(state, Method::GET, uri, cookie, None).await
}

pub async fn post(
    state: &AppState,
    uri: &str,
    cookie: Option<&str>,
    form: &[(&str, &str)],
) -> Response {
    send(state, Method::POST, uri, cookie, Some(form)).await
}

pub async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn location(response: &Response) -> &str {
    assert_eq!(response.status(), StatusCode::FOUND);
    response.headers()[header::LOCATION].to_str().unwrap()
}

pub fn count_notes(state: &AppState) -> u64 {
    state.with_notes(|notes| notes.count_notes()).unwrap().unwrap()
}

pub fn note_of(state: &AppState, author: &User, slug: &str) -> Note {
    let requester = Requester::Authenticated(author.id);
    state
        .with_notes(|notes| notes.get_note(&requester, slug))
        .unwrap()
        .unwrap()
}

/// Author and reader with one note owned by the author.
pub struct Fixture {
    pub state: AppState,
    pub author: User,
    pub reader: User,
    pub author_cookie: String,
    pub reader_cookie: String,
    pub note: Note,
}

impl Fixture {
    pub async fn new() -> Self {
        let state = test_state();
        let author = create_user(&state, "author");
        let reader = create_user(&state, "reader");
        let author_cookie = force_login(&state, &author).await;
        let reader_cookie = force_login(&state, &reader).await;

        let draft = notekeeper_core::NoteDraft::new("Заголовок", "Текст").with_slug("note-slug");
        let requester = Requester::Authenticated(author.id);
        let note = state
            .with_notes(|notes| notes.create_note(&requester, draft))
            .unwrap()
            .unwrap();

        Self {
            state,
            author,
            reader,
            author_cookie,
            reader_cookie,
            note,
        }
    }
}

fn encode_form(fields: &[(&str, &str)]) -> String {
    use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
    fields
        .iter()
        .map(|(key, value)| {
            format!(
                "{}={}",
                utf8_percent_encode(key, NON_ALPHANUMERIC),
                utf8_percent_encode(value, NON_ALPHANUMERIC)
            )
        })
        .collect::<Vec<_>>()
        .join("&")
}
