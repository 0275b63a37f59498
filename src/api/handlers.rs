//! HTTP request handlers.

use axum::{extract::State, http::StatusCode, Extension, Json};

use crate::api::types::*;
use crate::auth::IdentityClaims;
use crate::domain::{Profile, ProfileFields};
use crate::error::{CouncilError, CouncilResult};
use crate::AppState;

/// Health check endpoint.
///
/// GET /api/health
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse)
    ),
    tag = "health"
)]
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        auth_configured: state.token_verifier.is_configured(),
        admin_configured: state.admin_keys.is_configured(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

// ==================== Authentication Endpoints ====================

/// Get current user info from the bearer token.
///
/// GET /api/auth/me
#[utoipa::path(
    get,
    path = "/api/auth/me",
    responses(
        (status = 200, description = "Current user info", body = IdentityClaims),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = [])),
    tag = "auth"
)]
pub async fn get_current_user(Extension(claims): Extension<IdentityClaims>) -> Json<IdentityClaims> {
    Json(claims)
}

// ==================== Profile Endpoints ====================

/// Get the caller's profile, if any.
///
/// GET /api/profile
#[utoipa::path(
    get,
    path = "/api/profile",
    responses(
        (status = 200, description = "Profile lookup result", body = ProfileStatusResponse),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = [])),
    tag = "profile"
)]
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<IdentityClaims>,
) -> CouncilResult<Json<ProfileStatusResponse>> {
    let profile = state.profiles.get(&claims.user_id).await?;

    Ok(Json(ProfileStatusResponse {
        exists: profile.is_some(),
        profile,
    }))
}

/// Create the caller's profile. Profiles are locked once created.
///
/// POST /api/profile
#[utoipa::path(
    post,
    path = "/api/profile",
    request_body = CreateProfileRequest,
    responses(
        (status = 201, description = "Profile created", body = Profile),
        (status = 400, description = "Answer outside the accepted set"),
        (status = 401, description = "Not authenticated"),
        (status = 409, description = "Profile already exists and is locked")
    ),
    security(("bearer_auth" = [])),
    tag = "profile"
)]
pub async fn create_profile(
    State(state): State<AppState>,
    Extension(claims): Extension<IdentityClaims>,
    Json(request): Json<CreateProfileRequest>,
) -> CouncilResult<(StatusCode, Json<Profile>)> {
    let fields = ProfileFields::parse(&request.gender, &request.age_range, &request.mood)?;

    if state.profiles.exists(&claims.user_id).await? {
        tracing::warn!(user_id = %claims.user_id, "Attempt to overwrite locked profile");
        return Err(CouncilError::Conflict(
            "Profile is locked and cannot be modified".to_string(),
        ));
    }

    let profile = state.profiles.create(&claims.user_id, fields).await?;

    Ok((StatusCode::CREATED, Json(profile)))
}

/// Get the caller's profile rendered as model prompt context.
///
/// GET /api/profile/context
#[utoipa::path(
    get,
    path = "/api/profile/context",
    responses(
        (status = 200, description = "Prompt context", body = ProfileContextResponse),
        (status = 401, description = "Not authenticated")
    ),
    security(("bearer_auth" = [])),
    tag = "profile"
)]
pub async fn get_profile_context(
    State(state): State<AppState>,
    Extension(claims): Extension<IdentityClaims>,
) -> CouncilResult<Json<ProfileContextResponse>> {
    let context = state.profiles.context(&claims.user_id).await?;
    Ok(Json(ProfileContextResponse { context }))
}

// ==================== Admin Endpoints ====================

/// Confirm that the supplied admin key is accepted.
///
/// GET /api/admin/verify
#[utoipa::path(
    get,
    path = "/api/admin/verify",
    responses(
        (status = 200, description = "Admin key accepted", body = AdminVerifyResponse),
        (status = 403, description = "Missing or invalid admin key"),
        (status = 500, description = "Admin key not configured on server")
    ),
    security(("admin_key" = [])),
    tag = "admin"
)]
pub async fn verify_admin() -> Json<AdminVerifyResponse> {
    Json(AdminVerifyResponse { authorized: true })
}
