//! Note pages: home, list, add, detail, edit, delete, success.

use super::gate;
use crate::auth;
use crate::error::WebError;
use crate::pages::{self, NoteFormTarget};
use crate::routes::{found, Route};
use crate::AppState;
use axum::extract::rejection::FormRejection;
use axum::extract::{OriginalUri, Path, State};
use axum::http::HeaderMap;
use axum::response::{Html, IntoResponse, Response};
use axum::Form;
use notekeeper_core::{Note, NoteDraft, NoteServiceError, OperationScope, Requester};

pub async fn home(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Html<String>, WebError> {
    let requester = auth::requester(&headers, &state.sessions).await;
    let username = match requester.user_id() {
        Some(id) => state.with_users(|users| users.get_user(id))??,
        None => None,
    };
    Ok(Html(pages::home(
        username.as_ref().map(|user| user.username.as_str()),
    )))
}

pub async fn list(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
) -> Result<Html<String>, WebError> {
    let requester = auth::requester(&headers, &state.sessions).await;
    let notes = state
        .with_notes(|notes| notes.list_notes(&requester))?
        .map_err(|err| WebError::from_note_error(err, &uri))?;
    Ok(Html(pages::notes_list(&notes)))
}

pub async fn success(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
) -> Result<Html<String>, WebError> {
    let requester = auth::requester(&headers, &state.sessions).await;
    gate(&requester, OperationScope::OwnCollection, &uri)?;
    Ok(Html(pages::success()))
}

pub async fn add_form(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
) -> Result<Html<String>, WebError> {
    let requester = auth::requester(&headers, &state.sessions).await;
    gate(&requester, OperationScope::OwnCollection, &uri)?;
    Ok(Html(pages::note_form(
        NoteFormTarget::Add,
        &NoteDraft::default(),
        &[],
    )))
}

pub async fn add_submit(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    headers: HeaderMap,
    form: Result<Form<NoteDraft>, FormRejection>,
) -> Result<Response, WebError> {
    let requester = auth::requester(&headers, &state.sessions).await;
    gate(&requester, OperationScope::OwnCollection, &uri)?;
    let Form(draft) = form.map_err(|err| WebError::BadRequest(err.body_text()))?;

    let outcome = state.with_notes(|notes| notes.create_note(&requester, draft.clone()))?;
    submission_response(outcome, NoteFormTarget::Add, &draft, &uri)
}

pub async fn detail(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(slug): Path<String>,
    headers: HeaderMap,
) -> Result<Html<String>, WebError> {
    let note = owned_note(&state, &headers, &slug, &uri).await?;
    Ok(Html(pages::note_detail(&note)))
}

pub async fn edit_form(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(slug): Path<String>,
    headers: HeaderMap,
) -> Result<Html<String>, WebError> {
    let note = owned_note(&state, &headers, &slug, &uri).await?;
    let draft = NoteDraft::new(note.title, note.text).with_slug(note.slug);
    Ok(Html(pages::note_form(
        NoteFormTarget::Edit(&slug),
        &draft,
        &[],
    )))
}

pub async fn edit_submit(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(slug): Path<String>,
    headers: HeaderMap,
    form: Result<Form<NoteDraft>, FormRejection>,
) -> Result<Response, WebError> {
    owned_note(&state, &headers, &slug, &uri).await?;
    let Form(draft) = form.map_err(|err| WebError::BadRequest(err.body_text()))?;

    let requester = auth::requester(&headers, &state.sessions).await;
    let outcome =
        state.with_notes(|notes| notes.update_note(&requester, &slug, draft.clone()))?;
    submission_response(outcome, NoteFormTarget::Edit(&slug), &draft, &uri)
}

pub async fn delete_confirm(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(slug): Path<String>,
    headers: HeaderMap,
) -> Result<Html<String>, WebError> {
    let note = owned_note(&state, &headers, &slug, &uri).await?;
    Ok(Html(pages::delete_confirm(&note)))
}

pub async fn delete_submit(
    State(state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Path(slug): Path<String>,
    headers: HeaderMap,
) -> Result<Response, WebError> {
    let requester = auth::requester(&headers, &state.sessions).await;
    state
        .with_notes(|notes| notes.delete_note(&requester, &slug))?
        .map_err(|err| WebError::from_note_error(err, &uri))?;
    Ok(found(&Route::Success.path()))
}

async fn owned_note(
    state: &AppState,
    headers: &HeaderMap,
    slug: &str,
    uri: &axum::http::Uri,
) -> Result<Note, WebError> {
    let requester: Requester = auth::requester(headers, &state.sessions).await;
    state
        .with_notes(|notes| notes.get_note(&requester, slug))?
        .map_err(|err| WebError::from_note_error(err, uri))
}

/// Saved → redirect to success; rejected → same form with field errors.
fn submission_response(
    outcome: Result<Note, NoteServiceError>,
    target: NoteFormTarget<'_>,
    draft: &NoteDraft,
    uri: &axum::http::Uri,
) -> Result<Response, WebError> {
    match outcome {
        Ok(_) => Ok(found(&Route::Success.path())),
        Err(NoteServiceError::Validation(errors)) => {
            Ok(Html(pages::note_form(target, draft, &errors)).into_response())
        }
        Err(other) => Err(WebError::from_note_error(other, uri)),
    }
}
