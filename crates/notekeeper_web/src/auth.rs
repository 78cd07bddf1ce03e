//! Cookie sessions: the web side of "who is the requester".

use axum::http::{header, HeaderMap};
use notekeeper_core::{Requester, UserId};
use std::{collections::HashMap, sync::Arc};
use tokio::sync::RwLock;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "sessionid";

/// session id -> user id
pub type SessionStore = Arc<RwLock<HashMap<String, UserId>>>;

pub async fn create_session(user_id: UserId, sessions: &SessionStore) -> String {
    let session_id = Uuid::new_v4().to_string();
    sessions.write().await.insert(session_id.clone(), user_id);
    session_id
}

/// Resolves the request's session cookie; unknown or absent means anonymous.
pub async fn requester(headers: &HeaderMap, sessions: &SessionStore) -> Requester {
    let Some(session_id) = extract_session_id(headers) else {
        return Requester::Anonymous;
    };
    let user_id = sessions.read().await.get(&session_id).copied();
    Requester::from(user_id)
}

pub async fn drop_session(headers: &HeaderMap, sessions: &SessionStore) {
    if let Some(session_id) = extract_session_id(headers) {
        sessions.write().await.remove(&session_id);
    }
}

pub fn session_cookie(session_id: &str) -> String {
    format!("{SESSION_COOKIE}={session_id}; HttpOnly; Path=/; SameSite=Lax")
}

pub fn expired_session_cookie() -> String {
    format!("{SESSION_COOKIE}=; HttpOnly; Path=/; Max-Age=0; SameSite=Lax")
}

pub fn extract_session_id(headers: &HeaderMap) -> Option<String> {
    let prefix = format!("{SESSION_COOKIE}=");
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|cookies| cookies.split(';'))
        .find_map(|cookie| cookie.trim().strip_prefix(prefix.as_str()))
        .filter(|value| !value.is_empty())
        .map(ToString::to_string)
}

#[cfg(test)]
mod tests {
    use super::{create_session, extract_session_id, requester, SessionStore};
    use axum::http::{header, HeaderMap, HeaderValue};
    use notekeeper_core::Requester;
    use uuid::Uuid;

    fn cookie_headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::COOKIE, HeaderValue::from_str(value).unwrap());
        headers
    }

    #[test]
    fn extract_session_id_among_other_cookies() {
        let headers = cookie_headers("theme=dark; sessionid=abc123; lang=ru");
        assert_eq!(extract_session_id(&headers).as_deref(), Some("abc123"));
        assert_eq!(extract_session_id(&cookie_headers("sessionid=")), None);
        assert_eq!(extract_session_id(&HeaderMap::new()), None);
    }

    #[tokio::test]
    async fn requester_resolves_known_sessions_only() {
        let sessions = SessionStore::default();
        let user_id = Uuid::new_v4();
        let session_id = create_session(user_id, &sessions).await;

        let known = cookie_headers(&format!("sessionid={session_id}"));
        assert_eq!(
            requester(&known, &sessions).await,
            Requester::Authenticated(user_id)
        );

        let forged = cookie_headers("sessionid=forged");
        assert_eq!(requester(&forged, &sessions).await, Requester::Anonymous);
    }
}
