//! Account pages: login, logout, signup.

use crate::auth;
use crate::crypto::{hash_password, verify_password};
use crate::error::WebError;
use crate::pages;
use crate::routes::{found, safe_next, Route};
use crate::AppState;
use axum::extract::rejection::FormRejection;
use axum::extract::{Query, State};
use axum::http::{header, HeaderMap, HeaderValue};
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use log::{info, warn};
use notekeeper_core::{FieldError, SignupForm, UserServiceError};
use serde::Deserialize;

const INVALID_CREDENTIALS: &str =
    "Введите правильные имя пользователя и пароль. Оба поля могут быть чувствительны к регистру.";

#[derive(Debug, Default, Deserialize)]
pub struct LoginQuery {
    next: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
    next: Option<String>,
}

pub async fn login_form(Query(query): Query<LoginQuery>) -> Html<String> {
    Html(pages::login(safe_next(query.next.as_deref()), &[], ""))
}

pub async fn login_submit(
    State(state): State<AppState>,
    form: Result<Form<LoginForm>, FormRejection>,
) -> Result<Response, WebError> {
    let Form(form) = form.map_err(|err| WebError::BadRequest(err.body_text()))?;
    let next = safe_next(form.next.as_deref());

    let credentials = state.with_users(|users| users.find_credentials(&form.username))??;
    let authenticated = match credentials {
        Some(credentials) => verify_password(&form.password, &credentials.password_hash)
            .await
            .map_err(|err| WebError::Internal(err.to_string()))?
            .then_some(credentials.user),
        None => None,
    };

    let Some(user) = authenticated else {
        warn!("event=user_login module=users status=rejected reason=invalid_credentials");
        let errors = [FieldError::new("__all__", INVALID_CREDENTIALS)];
        return Ok(Html(pages::login(next, &errors, &form.username)).into_response());
    };

    let session_id = auth::create_session(user.id, &state.sessions).await;
    info!("event=user_login module=users status=ok user_id={}", user.id);

    let mut response = found(next.unwrap_or(&Route::Home.path()));
    set_cookie(&mut response, &auth::session_cookie(&session_id))?;
    Ok(response)
}

pub async fn logout(State(state): State<AppState>, headers: HeaderMap) -> Result<Response, WebError> {
    auth::drop_session(&headers, &state.sessions).await;
    let mut response = Html(pages::logged_out()).into_response();
    set_cookie(&mut response, &auth::expired_session_cookie())?;
    Ok(response)
}

pub async fn signup_form() -> Html<String> {
    Html(pages::signup(&SignupForm::default(), &[]))
}

pub async fn signup_submit(
    State(state): State<AppState>,
    form: Result<Form<SignupForm>, FormRejection>,
) -> Result<Response, WebError> {
    let Form(form) = form.map_err(|err| WebError::BadRequest(err.body_text()))?;

    if let Err(err) = state.with_users(|users| users.validate_signup(&form))? {
        return signup_rejected(&form, err);
    }

    let password_hash = hash_password(&form.password1, state.settings.password_cost)
        .await
        .map_err(|err| WebError::Internal(err.to_string()))?;
    match state.with_users(|users| users.register(&form, &password_hash))? {
        Ok(_) => Ok(found(&Route::Login.path())),
        Err(err) => signup_rejected(&form, err),
    }
}

fn signup_rejected(form: &SignupForm, err: UserServiceError) -> Result<Response, WebError> {
    match err {
        UserServiceError::Validation(errors) => {
            Ok(Html(pages::signup(form, &errors)).into_response())
        }
        other => Err(other.into()),
    }
}

fn set_cookie(response: &mut Response, cookie: &str) -> Result<(), WebError> {
    let value = HeaderValue::from_str(cookie)
        .map_err(|err| WebError::Internal(format!("invalid cookie header: {err}")))?;
    response.headers_mut().insert(header::SET_COOKIE, value);
    Ok(())
}
