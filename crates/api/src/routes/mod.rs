//! HTTP route handlers for the cake shop API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                   - Endpoint index
//! GET  /health             - Liveness check
//! GET  /health/ready       - Readiness check (store reachable)
//!
//! # Users
//! POST /users              - Sign up
//! GET  /users              - List users (newest first)
//! GET  /users/{id}         - User profile with orders (requires token)
//!
//! # Sessions
//! POST /sessions           - Sign in, returns the access token
//!
//! # Cake orders
//! GET  /cakeorders         - List orders (newest first)
//! GET  /cakeorders/{id}    - Single order (requires token)
//! POST /cakeorders         - Place an order (requires token)
//!
//! # Catalog
//! GET  /layers             - Layers and their ingredients
//! ```

pub mod extract;
pub mod layers;
pub mod orders;
pub mod sessions;
pub mod users;

use axum::{
    Json, Router,
    extract::{Request, State},
    http::StatusCode,
    middleware::from_fn,
    routing::{get, post},
};
use serde::Serialize;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::middleware::request_id_middleware;
use crate::state::AppState;

/// One entry of the endpoint index served at `GET /`.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Endpoint {
    pub path: &'static str,
    pub methods: &'static [&'static str],
}

/// Every route this API serves.
pub const ENDPOINTS: &[Endpoint] = &[
    Endpoint { path: "/", methods: &["GET"] },
    Endpoint { path: "/health", methods: &["GET"] },
    Endpoint { path: "/health/ready", methods: &["GET"] },
    Endpoint { path: "/users", methods: &["GET", "POST"] },
    Endpoint { path: "/users/{id}", methods: &["GET"] },
    Endpoint { path: "/sessions", methods: &["POST"] },
    Endpoint { path: "/cakeorders", methods: &["GET", "POST"] },
    Endpoint { path: "/cakeorders/{id}", methods: &["GET"] },
    Endpoint { path: "/layers", methods: &["GET"] },
];

/// Create the user routes router.
pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(users::index).post(users::create))
        .route("/{id}", get(users::show))
}

/// Create the cake order routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index).post(orders::create))
        .route("/{id}", get(orders::show))
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/users", user_routes())
        .route("/sessions", post(sessions::create))
        .nest("/cakeorders", order_routes())
        .route("/layers", get(layers::index))
        .fallback(not_found)
}

/// Build the complete application with its middleware stack.
pub fn app(state: AppState) -> Router {
    routes()
        .with_state(state)
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &Request| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    request_id = tracing::field::Empty,
                    user_id = tracing::field::Empty,
                )
            }),
        )
        .layer(CorsLayer::permissive())
}

/// `GET /`
async fn index() -> Json<&'static [Endpoint]> {
    Json(ENDPOINTS)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the store is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match state.ping().await {
        Ok(()) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

async fn not_found() -> AppError {
    AppError::NotFound("No such endpoint.".to_string())
}
