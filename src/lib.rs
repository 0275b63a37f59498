//! Council Core - backend for the council conversational app.
//!
//! Verifies identity-provider bearer tokens, gates analytics behind a static
//! admin key and keeps each user's locked onboarding profile.

use std::sync::Arc;

pub mod analytics;
pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod error;
pub mod logging;
pub mod storage;

use crate::auth::{AdminKeyChecker, TokenVerifier};
use crate::config::Config;
use crate::storage::{FileProfileStore, ProfileStore};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Bearer token verification.
    pub token_verifier: TokenVerifier,
    /// Admin key gate.
    pub admin_keys: AdminKeyChecker,
    /// Profile storage.
    pub profiles: Arc<dyn ProfileStore>,
}

impl AppState {
    /// Build state from loaded configuration with the file-backed profile store.
    pub fn from_config(config: &Config) -> Self {
        Self {
            token_verifier: TokenVerifier::new(&config.auth.jwt_secret),
            admin_keys: AdminKeyChecker::new(&config.auth.admin_api_key),
            profiles: Arc::new(FileProfileStore::new(config.profiles.data_dir.clone())),
        }
    }
}
