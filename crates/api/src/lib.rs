//! Cake Maker API library.
//!
//! User signup and sign-in, token-gated cake ordering and a read-only layer
//! catalog, served as JSON over HTTP. Exposed as a library so the binary,
//! the CLI and the integration tests share one router and one set of
//! services.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod services;
pub mod state;

pub use routes::app;
