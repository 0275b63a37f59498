//! API request and response types.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::Profile;

// ==================== Profiles ====================

/// Onboarding answers. Values are checked against the accepted labels.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProfileRequest {
    /// One of `Male`, `Female`, `Other`, `Prefer not to say`.
    pub gender: String,
    /// One of `12-17`, `18-24`, `25-34`, `35-44`, `45-54`, `55-64`, `65+`.
    pub age_range: String,
    /// One of `Happy`, `I don't know`, `Sad`.
    pub mood: String,
}

/// Profile lookup result; a missing profile is not an error.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileStatusResponse {
    pub exists: bool,
    pub profile: Option<Profile>,
}

/// Prompt preamble built from the caller's profile.
#[derive(Debug, Serialize, ToSchema)]
pub struct ProfileContextResponse {
    /// Empty when the caller has no profile.
    pub context: String,
}

// ==================== Admin ====================

#[derive(Debug, Serialize, ToSchema)]
pub struct AdminVerifyResponse {
    pub authorized: bool,
}

// ==================== Health ====================

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Service status.
    pub status: String,
    /// Service version.
    pub version: String,
    /// Whether bearer tokens can be verified.
    pub auth_configured: bool,
    /// Whether the admin key gate is usable.
    pub admin_configured: bool,
    /// Timestamp.
    pub timestamp: String,
}
