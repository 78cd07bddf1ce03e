//! Route handlers. Each resolves the requester first, then calls one use-case.

pub mod notes;
pub mod users;

use crate::error::WebError;
use axum::http::Uri;
use notekeeper_core::{decide, AccessDecision, OperationScope, Requester};

/// Scope check done before any storage access.
fn gate(requester: &Requester, scope: OperationScope, uri: &Uri) -> Result<(), WebError> {
    match decide(requester, scope) {
        AccessDecision::Allow => Ok(()),
        AccessDecision::LoginRequired => Err(WebError::login_required(uri)),
    }
}
