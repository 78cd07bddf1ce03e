mod common;

use axum::http::{header, StatusCode};
use common::{body_text, get, location, post, test_state};

const SIGNUP: [(&str, &str); 3] = [
    ("username", "writer"),
    ("password1", "correct-horse-42"),
    ("password2", "correct-horse-42"),
];

fn session_cookie(response: &axum::response::Response) -> String {
    let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
    set_cookie.split(';').next().unwrap().to_string()
}

#[tokio::test]
async fn signup_then_login_returns_to_next() {
    let state = test_state();

    let response = post(&state, "/auth/signup/", None, &SIGNUP).await;
    assert_eq!(location(&response), "/auth/login/");

    let login = [
        ("username", "writer"),
        ("password", "correct-horse-42"),
        ("next", "/notes/"),
    ];
    let response = post(&state, "/auth/login/", None, &login).await;
    assert_eq!(location(&response), "/notes/");
    let cookie = session_cookie(&response);
    assert!(cookie.starts_with("sessionid="));

    let response = get(&state, "/notes/", Some(&cookie)).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn wrong_password_rerenders_login() {
    let state = test_state();
    post(&state, "/auth/signup/", None, &SIGNUP).await;

    let login = [("username", "writer"), ("password", "wrong-password")];
    let response = post(&state, "/auth/login/", None, &login).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(header::SET_COOKIE).is_none());
    assert!(body_text(response).await.contains("id=\"errors___all__\""));
}

#[tokio::test]
async fn offsite_next_is_ignored() {
    let state = test_state();
    post(&state, "/auth/signup/", None, &SIGNUP).await;

    let login = [
        ("username", "writer"),
        ("password", "correct-horse-42"),
        ("next", "//evil.example/"),
    ];
    let response = post(&state, "/auth/login/", None, &login).await;
    assert_eq!(location(&response), "/");
}

#[tokio::test]
async fn duplicate_username_is_a_form_error() {
    let state = test_state();
    post(&state, "/auth/signup/", None, &SIGNUP).await;

    let response = post(&state, "/auth/signup/", None, &SIGNUP).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response)
        .await
        .contains("A user with that username already exists."));
}

#[tokio::test]
async fn logout_ends_the_session() {
    let state = test_state();
    post(&state, "/auth/signup/", None, &SIGNUP).await;
    let login = [("username", "writer"), ("password", "correct-horse-42")];
    let cookie = session_cookie(&post(&state, "/auth/login/", None, &login).await);

    let response = post(&state, "/auth/logout/", Some(&cookie), &[]).await;
    assert_eq!(response.status(), StatusCode::OK);

    let response = get(&state, "/notes/", Some(&cookie)).await;
    assert_eq!(location(&response), "/auth/login/?next=/notes/");
}
