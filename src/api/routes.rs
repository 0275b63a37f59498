//! Route definitions for the API.

use axum::{middleware, routing::get, Router};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{ApiKey, ApiKeyValue, HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::handlers;
use crate::auth::{require_admin_key, require_user, ADMIN_KEY_HEADER};
use crate::AppState;

/// Security scheme modifier for OpenAPI.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
            components.add_security_scheme(
                "admin_key",
                SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::new(ADMIN_KEY_HEADER))),
            );
        }
    }
}

/// OpenAPI documentation.
#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health_check,
        handlers::get_current_user,
        handlers::get_profile,
        handlers::create_profile,
        handlers::get_profile_context,
        handlers::verify_admin,
    ),
    components(schemas(
        crate::api::types::CreateProfileRequest,
        crate::api::types::ProfileStatusResponse,
        crate::api::types::ProfileContextResponse,
        crate::api::types::AdminVerifyResponse,
        crate::api::types::HealthResponse,
        crate::auth::IdentityClaims,
        crate::domain::Profile,
        crate::domain::Gender,
        crate::domain::AgeRange,
        crate::domain::Mood,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "auth", description = "Identity of the signed-in user"),
        (name = "profile", description = "Locked onboarding profile"),
        (name = "admin", description = "Admin key gated endpoints"),
        (name = "health", description = "Health and status endpoints")
    ),
    info(
        title = "Council Core API",
        version = "0.1.0",
        description = "Identity, admin gate and user profiles for the council conversational app",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Build the API router.
pub fn build_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Routes requiring a signed-in user
    let user_routes = Router::new()
        .route("/api/auth/me", get(handlers::get_current_user))
        .route(
            "/api/profile",
            get(handlers::get_profile).post(handlers::create_profile),
        )
        .route("/api/profile/context", get(handlers::get_profile_context))
        .layer(middleware::from_fn_with_state(
            state.token_verifier.clone(),
            require_user,
        ))
        .with_state(state.clone());

    // Routes requiring the admin key
    let admin_routes = Router::new()
        .route("/api/admin/verify", get(handlers::verify_admin))
        .layer(middleware::from_fn_with_state(
            state.admin_keys.clone(),
            require_admin_key,
        ));

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/api/health", get(handlers::health_check))
        .with_state(state);

    Router::new()
        .merge(user_routes)
        .merge(admin_routes)
        .merge(public_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
