//! HTTP middleware and extractors.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, added in `main`)
//! 2. CORS (permissive)
//! 3. `TraceLayer` (one `http_request` span per request)
//! 4. Request ID (recorded on the span, echoed in the response)
//!
//! The authorization gate is the [`RequireUser`] extractor, applied per
//! handler rather than as a layer.

pub mod auth;
pub mod request_id;

pub use auth::RequireUser;
pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
