mod common;

use axum::http::StatusCode;
use common::{get, location, test_state, Fixture};

#[tokio::test]
async fn public_pages_are_open_to_anonymous() {
    let state = test_state();
    for url in ["/", "/auth/login/", "/auth/logout/", "/auth/signup/"] {
        let response = get(&state, url, None).await;
        assert_eq!(response.status(), StatusCode::OK, "GET {url}");
    }
}

#[tokio::test]
async fn own_collection_pages_are_open_to_any_logged_in_user() {
    let fx = Fixture::new().await;
    for url in ["/notes/", "/done/", "/add/"] {
        let response = get(&fx.state, url, Some(&fx.reader_cookie)).await;
        assert_eq!(response.status(), StatusCode::OK, "GET {url}");
    }
}

#[tokio::test]
async fn note_pages_are_author_only_and_404_for_others() {
    let fx = Fixture::new().await;
    let slug = fx.note.slug.as_str();
    let urls = [
        format!("/note/{slug}/"),
        format!("/edit/{slug}/"),
        format!("/delete/{slug}/"),
    ];

    for url in &urls {
        let as_author = get(&fx.state, url, Some(&fx.author_cookie)).await;
        assert_eq!(as_author.status(), StatusCode::OK, "author GET {url}");

        let as_reader = get(&fx.state, url, Some(&fx.reader_cookie)).await;
        assert_eq!(as_reader.status(), StatusCode::NOT_FOUND, "reader GET {url}");
    }
}

#[tokio::test]
async fn missing_note_is_404_even_for_its_would_be_author() {
    let fx = Fixture::new().await;
    let response = get(&fx.state, "/note/no-such-note/", Some(&fx.author_cookie)).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn anonymous_is_redirected_to_login_with_next() {
    let fx = Fixture::new().await;
    let slug = fx.note.slug.as_str();
    let urls = [
        "/notes/".to_string(),
        "/done/".to_string(),
        "/add/".to_string(),
        format!("/note/{slug}/"),
        format!("/edit/{slug}/"),
        format!("/delete/{slug}/"),
    ];

    for url in &urls {
        let response = get(&fx.state, url, None).await;
        assert_eq!(location(&response), format!("/auth/login/?next={url}"));
    }
}

#[tokio::test]
async fn forged_session_cookie_counts_as_anonymous() {
    let fx = Fixture::new().await;
    let response = get(&fx.state, "/notes/", Some("sessionid=forged")).await;
    assert_eq!(location(&response), "/auth/login/?next=/notes/");
}
