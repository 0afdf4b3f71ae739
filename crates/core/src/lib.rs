//! Cake Maker Core - Shared domain types.
//!
//! This crate provides the types shared by every Cake Maker component:
//! - `api` - The HTTP/JSON backend
//! - `cli` - Command-line tools for migrations and catalog resets
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, and access tokens

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
