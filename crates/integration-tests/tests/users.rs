//! Integration tests for user listing and profiles.

use axum::http::StatusCode;

use cake_maker_integration_tests::{TestApp, emmas_cake};

#[tokio::test]
async fn test_listing_hides_credentials() {
    let app = TestApp::new();
    app.signup("Emma", "emma@emma.se", "emmaemma").await;
    app.signup("Klara", "klara@emma.se", "klaraklara").await;

    let response = app.get("/users").await;
    assert_eq!(response.status, StatusCode::OK);

    let users = response.body.as_array().unwrap();
    assert_eq!(users.len(), 2);
    assert_eq!(users[0]["name"], "Klara");
    assert_eq!(users[1]["name"], "Emma");
    for user in users {
        assert!(user.get("password").is_none());
        assert!(user.get("passwordHash").is_none());
        assert!(user.get("accessToken").is_none());
        assert!(user["orderedCakes"].is_array());
    }
}

#[tokio::test]
async fn test_listing_is_capped_and_newest_first() {
    let app = TestApp::new();
    for i in 0..22 {
        app.signup(&format!("User {i}"), &format!("user{i}@emma.se"), "password")
            .await;
    }

    let response = app.get("/users").await;
    assert_eq!(response.status, StatusCode::OK);
    let users = response.body.as_array().unwrap();
    assert_eq!(users.len(), 20);
    assert_eq!(users[0]["name"], "User 21");
    assert_eq!(users[19]["name"], "User 2");
}

#[tokio::test]
async fn test_listing_respects_limit() {
    let app = TestApp::new();
    for i in 0..3 {
        app.signup(&format!("User {i}"), &format!("user{i}@emma.se"), "password")
            .await;
    }

    let response = app.get("/users?limit=2").await;
    assert_eq!(response.body.as_array().unwrap().len(), 2);

    let response = app.get("/users?limit=many").await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_profile_requires_token() {
    let app = TestApp::new();
    let emma = app.signup("Emma", "emma@emma.se", "emmaemma").await;

    let response = app.get(&format!("/users/{}", emma.id)).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert_eq!(response.body["loggedOut"], true);
}

#[tokio::test]
async fn test_profile_resolves_orders() {
    let app = TestApp::new();
    let emma = app.signup("Emma", "emma@emma.se", "emmaemma").await;
    let first = app.post_authed("/cakeorders", &emma.token, &emmas_cake()).await;
    let second = app.post_authed("/cakeorders", &emma.token, &emmas_cake()).await;

    let response = app
        .get_authed(&format!("/users/{}", emma.id), &emma.token)
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["name"], "Emma");
    assert!(response.body.get("accessToken").is_none());
    let ordered = response.body["orderedCakes"].as_array().unwrap();
    assert_eq!(ordered.len(), 2);
    assert_eq!(ordered[0]["id"], first.body["id"]);
    assert_eq!(ordered[1]["id"], second.body["id"]);
}

#[tokio::test]
async fn test_any_signed_in_user_may_view_a_profile() {
    let app = TestApp::new();
    let emma = app.signup("Emma", "emma@emma.se", "emmaemma").await;
    let klara = app.signup("Klara", "klara@emma.se", "klaraklara").await;

    let response = app
        .get_authed(&format!("/users/{}", emma.id), &klara.token)
        .await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body["email"], "emma@emma.se");
}

#[tokio::test]
async fn test_profile_unknown_or_malformed_id() {
    let app = TestApp::new();
    let emma = app.signup("Emma", "emma@emma.se", "emmaemma").await;

    let unknown = app
        .get_authed("/users/00000000-0000-4000-8000-000000000000", &emma.token)
        .await;
    assert_eq!(unknown.status, StatusCode::BAD_REQUEST);
    assert_eq!(unknown.body["message"], "User not found.");

    let malformed = app.get_authed("/users/emma", &emma.token).await;
    assert_eq!(malformed.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_listing_store_failure_is_server_error() {
    let app = TestApp::new();
    app.store.set_unavailable(true);

    let response = app.get("/users").await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(response.body["message"], "Internal server error");
}
