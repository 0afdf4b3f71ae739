//! Integration tests for Cake Maker.
//!
//! # Running Tests
//!
//! ```bash
//! # In-process tests (router + in-memory store, no database needed)
//! cargo test -p cake-maker-integration-tests
//!
//! # Live server smoke tests (needs a running API)
//! CAKE_API_URL=http://127.0.0.1:8080 cargo test -p cake-maker-integration-tests -- --ignored
//! ```
//!
//! # Test Categories
//!
//! - `auth_flow` - Signup and sign-in
//! - `orders` - Placing, listing and fetching cake orders
//! - `users` - User listing and token-gated profiles
//! - `catalog` - Layer catalog
//! - `live_server` - Smoke tests against a running server (ignored by default)

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use secrecy::SecretString;
use serde_json::Value;
use tower::ServiceExt;

use cake_maker_api::config::{ApiConfig, LogFormat};
use cake_maker_api::db::MemoryStore;
use cake_maker_api::models::OrderSchema;
use cake_maker_api::state::AppState;

/// The full router over a fresh in-memory store.
pub struct TestApp {
    router: Router,
    state: AppState,
    /// The store behind the router, for toggling availability.
    pub store: Arc<MemoryStore>,
}

/// A buffered response.
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// Parsed JSON body, or the raw text as a JSON string.
    pub body: Value,
}

/// A signed-up user.
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: String,
    pub token: String,
}

impl TestApp {
    /// An app accepting classic orders.
    #[must_use]
    pub fn new() -> Self {
        Self::with_schema(OrderSchema::Classic)
    }

    /// An app accepting orders of the given schema.
    #[must_use]
    pub fn with_schema(order_schema: OrderSchema) -> Self {
        let config = ApiConfig {
            database_url: SecretString::from("postgres://unused"),
            host: [127, 0, 0, 1].into(),
            port: 0,
            reset_database: false,
            order_schema,
            log_format: LogFormat::Pretty,
            sentry_dsn: None,
            sentry_environment: None,
        };
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(config, Arc::clone(&store));
        Self {
            router: cake_maker_api::app(state.clone()),
            state,
            store,
        }
    }

    /// The state behind the router, for calling services directly.
    #[must_use]
    pub const fn state(&self) -> &AppState {
        &self.state
    }

    /// Send a request, optionally with an `Authorization` header and a JSON body.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built or the body cannot be read.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<&Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, token);
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let request = builder.body(body).expect("Failed to build request");
        self.send(request).await
    }

    /// Send a prebuilt request.
    ///
    /// # Panics
    ///
    /// Panics if the body cannot be read.
    pub async fn send(&self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Router is infallible");

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to read body")
            .to_bytes();
        let body = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

        TestResponse {
            status,
            headers,
            body,
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None, None).await
    }

    pub async fn get_authed(&self, uri: &str, token: &str) -> TestResponse {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, body: &Value) -> TestResponse {
        self.request(Method::POST, uri, None, Some(body)).await
    }

    pub async fn post_authed(&self, uri: &str, token: &str, body: &Value) -> TestResponse {
        self.request(Method::POST, uri, Some(token), Some(body)).await
    }

    /// Sign up a user and return their id and token.
    ///
    /// # Panics
    ///
    /// Panics if signup does not return 201.
    pub async fn signup(&self, name: &str, email: &str, password: &str) -> TestUser {
        let response = self
            .post(
                "/users",
                &serde_json::json!({ "name": name, "email": email, "password": password }),
            )
            .await;
        assert_eq!(response.status, StatusCode::CREATED, "{:?}", response.body);

        TestUser {
            id: response.body["userId"]
                .as_str()
                .expect("userId missing")
                .to_string(),
            token: response.body["accessToken"]
                .as_str()
                .expect("accessToken missing")
                .to_string(),
        }
    }
}

impl Default for TestApp {
    fn default() -> Self {
        Self::new()
    }
}

/// The order from the cake shop's canonical example.
#[must_use]
pub fn emmas_cake() -> Value {
    serde_json::json!({
        "cakeName": "Emmas cool cake",
        "topping": "strawberries",
        "cover": "cream",
        "layer1": "custard",
        "layer2": "jam",
        "sponge": "vanilla"
    })
}
