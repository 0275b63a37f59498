//! Authentication middleware for axum.

use axum::{
    body::Body,
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::auth::{AdminKeyChecker, TokenVerifier, ADMIN_KEY_HEADER};
use crate::error::CouncilError;

/// Read a header as text; undecodable bytes are kept lossily so they fail verification.
fn header_text(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .map(|value| String::from_utf8_lossy(value.as_bytes()).into_owned())
}

/// Extract and verify the bearer token from request.
///
/// Expects `Authorization: Bearer <token>` header.
pub async fn require_user(
    State(verifier): State<TokenVerifier>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, CouncilError> {
    let authorization = header_text(request.headers(), AUTHORIZATION.as_str());
    let claims = verifier.authenticate(authorization.as_deref())?;

    // Add claims to request extensions for handlers to access
    request.extensions_mut().insert(claims);

    Ok(next.run(request).await)
}

/// Require a valid `X-Admin-Key` header.
pub async fn require_admin_key(
    State(checker): State<AdminKeyChecker>,
    request: Request<Body>,
    next: Next,
) -> Result<Response, CouncilError> {
    let provided = header_text(request.headers(), ADMIN_KEY_HEADER);
    checker.check(provided.as_deref())?;

    Ok(next.run(request).await)
}

