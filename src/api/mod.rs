//! HTTP API layer for Council Core.
//!
//! Provides REST endpoints for identity, profiles and admin key checks.

pub mod handlers;
mod routes;
pub mod types;

pub use routes::{build_router, ApiDoc};
