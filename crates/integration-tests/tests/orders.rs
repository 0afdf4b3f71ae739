//! Integration tests for cake orders.

use axum::http::StatusCode;
use serde_json::json;

use cake_maker_integration_tests::{TestApp, emmas_cake};

// =============================================================================
// Placing orders
// =============================================================================

#[tokio::test]
async fn test_emma_orders_her_cake() {
    let app = TestApp::new();
    let emma = app.signup("Emma", "emma@emma.se", "emmaemma").await;

    let response = app.post_authed("/cakeorders", &emma.token, &emmas_cake()).await;

    assert_eq!(response.status, StatusCode::CREATED);
    let order = &response.body;
    assert_eq!(order["cakeName"], "Emmas cool cake");
    assert_eq!(order["topping"], "strawberries");
    assert_eq!(order["cover"], "cream");
    assert_eq!(order["layer1"], "custard");
    assert_eq!(order["layer2"], "jam");
    assert_eq!(order["sponge"], "vanilla");
    assert!(order["createdAt"].is_string());
    assert_eq!(order["orderedBy"]["id"], emma.id.as_str());
    assert_eq!(order["orderedBy"]["name"], "Emma");
}

#[tokio::test]
async fn test_bearer_prefix_is_accepted() {
    let app = TestApp::new();
    let emma = app.signup("Emma", "emma@emma.se", "emmaemma").await;

    let response = app
        .post_authed("/cakeorders", &format!("Bearer {}", emma.token), &emmas_cake())
        .await;
    assert_eq!(response.status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_order_without_valid_token_is_unauthorized() {
    let app = TestApp::new();
    let emma = app.signup("Emma", "emma@emma.se", "emmaemma").await;

    let missing = app.post("/cakeorders", &emmas_cake()).await;
    let unknown = app.post_authed("/cakeorders", "made-up-token", &emmas_cake()).await;
    let truncated = app
        .post_authed("/cakeorders", &emma.token[..emma.token.len() - 1], &emmas_cake())
        .await;

    for response in [missing, unknown, truncated] {
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
        assert_eq!(response.body["loggedOut"], true);
    }

    // Nothing was stored
    let listed = app.get("/cakeorders").await;
    assert_eq!(listed.body.as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_invalid_order_fields() {
    let app = TestApp::new();
    let emma = app.signup("Emma", "emma@emma.se", "emmaemma").await;

    let response = app
        .post_authed("/cakeorders", &emma.token, &json!({ "cakeName": "Cake" }))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert_eq!(response.body["message"], "Could not create cake order.");
    assert_eq!(response.body["errors"]["cakeName"]["kind"], "min_length");
    assert_eq!(response.body["errors"]["sponge"]["kind"], "required");
}

#[tokio::test]
async fn test_placed_order_is_linked_to_owner() {
    let app = TestApp::new();
    let emma = app.signup("Emma", "emma@emma.se", "emmaemma").await;
    let placed = app.post_authed("/cakeorders", &emma.token, &emmas_cake()).await;

    let profile = app
        .get_authed(&format!("/users/{}", emma.id), &emma.token)
        .await;
    let ordered = profile.body["orderedCakes"].as_array().unwrap();
    assert_eq!(ordered.len(), 1);
    assert_eq!(ordered[0]["id"], placed.body["id"]);
    assert_eq!(ordered[0]["cakeName"], "Emmas cool cake");
}

// =============================================================================
// Reading orders
// =============================================================================

#[tokio::test]
async fn test_order_round_trips_by_id() {
    let app = TestApp::new();
    let emma = app.signup("Emma", "emma@emma.se", "emmaemma").await;
    let placed = app.post_authed("/cakeorders", &emma.token, &emmas_cake()).await;
    let id = placed.body["id"].as_str().unwrap();

    let fetched = app
        .get_authed(&format!("/cakeorders/{id}"), &emma.token)
        .await;

    assert_eq!(fetched.status, StatusCode::OK);
    assert_eq!(fetched.body, placed.body);
    assert_eq!(fetched.body["orderedBy"]["name"], "Emma");
}

#[tokio::test]
async fn test_get_order_requires_token() {
    let app = TestApp::new();
    let emma = app.signup("Emma", "emma@emma.se", "emmaemma").await;
    let placed = app.post_authed("/cakeorders", &emma.token, &emmas_cake()).await;
    let id = placed.body["id"].as_str().unwrap();

    let response = app.get(&format!("/cakeorders/{id}")).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_get_unknown_or_malformed_order_id() {
    let app = TestApp::new();
    let emma = app.signup("Emma", "emma@emma.se", "emmaemma").await;

    let unknown = app
        .get_authed(
            "/cakeorders/00000000-0000-4000-8000-000000000000",
            &emma.token,
        )
        .await;
    assert_eq!(unknown.status, StatusCode::BAD_REQUEST);
    assert_eq!(unknown.body["message"], "Cake order not found.");

    let malformed = app.get_authed("/cakeorders/not-a-uuid", &emma.token).await;
    assert_eq!(malformed.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_list_is_capped_and_newest_first() {
    let app = TestApp::new();
    let emma = app.signup("Emma", "emma@emma.se", "emmaemma").await;

    for i in 0..22 {
        let mut cake = emmas_cake();
        cake["cakeName"] = json!(format!("Cake number {i}"));
        let response = app.post_authed("/cakeorders", &emma.token, &cake).await;
        assert_eq!(response.status, StatusCode::CREATED);
    }

    let listed = app.get("/cakeorders").await;
    assert_eq!(listed.status, StatusCode::OK);
    let orders = listed.body.as_array().unwrap();
    assert_eq!(orders.len(), 20);
    assert_eq!(orders[0]["cakeName"], "Cake number 21");
    assert_eq!(orders[19]["cakeName"], "Cake number 2");
    assert_eq!(orders[0]["orderedBy"]["name"], "Emma");

    let limited = app.get("/cakeorders?limit=3").await;
    assert_eq!(limited.body.as_array().unwrap().len(), 3);

    let oversized = app.get("/cakeorders?limit=1000").await;
    assert_eq!(oversized.body.as_array().unwrap().len(), 20);
}

#[tokio::test]
async fn test_list_store_failure_is_not_found() {
    let app = TestApp::new();
    app.store.set_unavailable(true);

    let response = app.get("/cakeorders").await;
    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(response.body["message"], "Could not fetch cake orders.");
}

#[tokio::test]
async fn test_gate_store_failure_is_server_error() {
    let app = TestApp::new();
    let emma = app.signup("Emma", "emma@emma.se", "emmaemma").await;
    app.store.set_unavailable(true);

    let response = app.post_authed("/cakeorders", &emma.token, &emmas_cake()).await;
    assert_eq!(response.status, StatusCode::INTERNAL_SERVER_ERROR);
}
