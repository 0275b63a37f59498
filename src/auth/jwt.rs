//! Bearer token verification for tokens issued by the identity provider.
//!
//! The provider (Supabase) signs access tokens with HS256 using a secret
//! shared with this service. Tokens carry no audience we can rely on, so
//! audience validation is off. `exp` and `nbf` are enforced whenever they
//! are present, and must be numeric.

use std::collections::HashSet;
use std::sync::Arc;

use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, get_current_timestamp, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::error::{CouncilError, CouncilResult};

/// Email reported for tokens that carry no usable `email` claim.
pub const FALLBACK_EMAIL: &str = "unknown@supabase.local";

/// Identity extracted from a verified token.
///
/// Built fresh for every request and never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct IdentityClaims {
    /// Provider-issued subject identifier, passed through unvalidated.
    pub user_id: String,
    pub email: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

/// Raw token payload as signed by the provider.
#[derive(Debug, Deserialize)]
struct ProviderClaims {
    #[serde(default)]
    sub: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    user_metadata: Option<UserMetadata>,
    /// Typed so a non-numeric value fails to decode instead of being skipped.
    #[serde(default)]
    exp: Option<u64>,
    /// Checked by `Validation`; only declared for its type.
    #[serde(default)]
    #[allow(dead_code)]
    nbf: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct UserMetadata {
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
}

impl From<ProviderClaims> for IdentityClaims {
    fn from(claims: ProviderClaims) -> Self {
        let metadata = claims.user_metadata.unwrap_or_default();
        let email = claims
            .email
            .filter(|email| !email.is_empty())
            .unwrap_or_else(|| FALLBACK_EMAIL.to_string());

        Self {
            user_id: claims.sub,
            email,
            first_name: metadata.first_name,
            last_name: metadata.last_name,
        }
    }
}

/// Why a bearer token was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,
    #[error("Signature verification failed")]
    SignatureMismatch,
    #[error("{0}")]
    Malformed(String),
    #[error("{0}")]
    Other(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(error: jsonwebtoken::errors::Error) -> Self {
        match error.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::InvalidSignature => TokenError::SignatureMismatch,
            ErrorKind::InvalidToken
            | ErrorKind::InvalidAlgorithm
            | ErrorKind::InvalidAlgorithmName
            | ErrorKind::ImmatureSignature
            | ErrorKind::MissingRequiredClaim(_)
            | ErrorKind::Base64(_)
            | ErrorKind::Json(_)
            | ErrorKind::Utf8(_) => TokenError::Malformed(error.to_string()),
            _ => TokenError::Other(error.to_string()),
        }
    }
}

impl From<TokenError> for CouncilError {
    fn from(error: TokenError) -> Self {
        let message = match &error {
            TokenError::Expired => "Token has expired. Please sign in again.".to_string(),
            TokenError::SignatureMismatch | TokenError::Malformed(_) => {
                format!("Invalid token: {}", error)
            }
            TokenError::Other(reason) => format!("Authentication error: {}", reason),
        };
        CouncilError::Unauthenticated(message)
    }
}

/// Verifies provider tokens against the shared HS256 secret.
#[derive(Clone)]
pub struct TokenVerifier {
    /// `None` when no secret is configured; every token is then refused.
    decoding_key: Option<Arc<DecodingKey>>,
    validation: Validation,
}

impl TokenVerifier {
    /// Create a verifier for the given shared secret.
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_aud = false;
        validation.validate_exp = true;
        validation.validate_nbf = true;
        validation.required_spec_claims = HashSet::new();
        validation.leeway = 0;

        let decoding_key = (!secret.is_empty())
            .then(|| Arc::new(DecodingKey::from_secret(secret.as_bytes())));

        Self {
            decoding_key,
            validation,
        }
    }

    /// Whether a signing secret is available.
    pub fn is_configured(&self) -> bool {
        self.decoding_key.is_some()
    }

    /// Turn a raw `Authorization` header value into identity claims.
    pub fn authenticate(&self, authorization: Option<&str>) -> CouncilResult<IdentityClaims> {
        let header = authorization
            .filter(|value| !value.is_empty())
            .ok_or_else(|| CouncilError::Unauthenticated("Missing authorization header".into()))?;

        let mut parts = header.split_whitespace();
        let (scheme, token) = match (parts.next(), parts.next(), parts.next()) {
            (Some(scheme), Some(token), None) => (scheme, token),
            _ => {
                return Err(CouncilError::Unauthenticated(
                    "Invalid authorization header format. Expected 'Bearer <token>'".into(),
                ))
            }
        };

        if !scheme.eq_ignore_ascii_case("bearer") {
            return Err(CouncilError::Unauthenticated(
                "Invalid authentication scheme. Expected 'Bearer <token>'".into(),
            ));
        }

        self.decode(token).map_err(|e| {
            tracing::debug!(error = %e, "Bearer token rejected");
            CouncilError::from(e)
        })
    }

    /// Verify a bare token and extract its claims.
    pub fn decode(&self, token: &str) -> Result<IdentityClaims, TokenError> {
        let key = self
            .decoding_key
            .as_deref()
            .ok_or_else(|| TokenError::Other("token verification is not configured".into()))?;

        let claims = decode::<ProviderClaims>(token, key, &self.validation)?.claims;

        // A token is already expired in the second named by `exp`
        if claims.exp.is_some_and(|exp| exp <= get_current_timestamp()) {
            return Err(TokenError::Expired);
        }

        Ok(claims.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    const SECRET: &str = "test-secret-key-12345";

    fn sign(payload: serde_json::Value, secret: &str) -> String {
        encode(
            &Header::new(Algorithm::HS256),
            &payload,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn in_one_hour() -> i64 {
        (Utc::now() + Duration::hours(1)).timestamp()
    }

    fn unauthenticated_message(result: CouncilResult<IdentityClaims>) -> String {
        match result {
            Err(CouncilError::Unauthenticated(message)) => message,
            other => panic!("expected Unauthenticated, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_header() {
        let verifier = TokenVerifier::new(SECRET);
        assert!(unauthenticated_message(verifier.authenticate(None)).contains("Missing"));
        assert!(unauthenticated_message(verifier.authenticate(Some(""))).contains("Missing"));
    }

    #[test]
    fn test_wrong_number_of_parts() {
        let verifier = TokenVerifier::new(SECRET);
        for header in ["Bearer", "   ", "Bearer a b", "token"] {
            let message = unauthenticated_message(verifier.authenticate(Some(header)));
            assert!(message.contains("format"), "{header:?} gave {message}");
        }
    }

    #[test]
    fn test_scheme_is_case_insensitive() {
        let verifier = TokenVerifier::new(SECRET);
        let token = sign(json!({"sub": "u1", "exp": in_one_hour()}), SECRET);

        for scheme in ["Bearer", "BEARER", "bEaReR"] {
            let claims = verifier
                .authenticate(Some(&format!("{scheme} {token}")))
                .unwrap();
            assert_eq!(claims.user_id, "u1");
        }

        let message = unauthenticated_message(verifier.authenticate(Some("Basic x")));
        assert!(message.contains("scheme"));
    }

    #[test]
    fn test_valid_token_without_metadata() {
        let verifier = TokenVerifier::new(SECRET);
        let token = sign(
            json!({"sub": "u1", "email": "a@b.com", "exp": in_one_hour()}),
            SECRET,
        );

        let claims = verifier
            .authenticate(Some(&format!("Bearer {token}")))
            .unwrap();
        assert_eq!(
            claims,
            IdentityClaims {
                user_id: "u1".to_string(),
                email: "a@b.com".to_string(),
                first_name: None,
                last_name: None,
            }
        );
    }

    #[test]
    fn test_metadata_names_are_extracted() {
        let verifier = TokenVerifier::new(SECRET);
        let token = sign(
            json!({
                "sub": "u2",
                "email": "ada@example.com",
                "exp": in_one_hour(),
                "user_metadata": {"first_name": "Ada", "avatar": "x.png"}
            }),
            SECRET,
        );

        let claims = verifier.decode(&token).unwrap();
        assert_eq!(claims.first_name.as_deref(), Some("Ada"));
        assert_eq!(claims.last_name, None);
    }

    #[test]
    fn test_missing_or_empty_email_falls_back() {
        let verifier = TokenVerifier::new(SECRET);

        let missing = sign(json!({"sub": "u1", "exp": in_one_hour()}), SECRET);
        assert_eq!(verifier.decode(&missing).unwrap().email, FALLBACK_EMAIL);

        let empty = sign(json!({"sub": "u1", "email": "", "exp": in_one_hour()}), SECRET);
        assert_eq!(verifier.decode(&empty).unwrap().email, "unknown@supabase.local");
    }

    #[test]
    fn test_subject_is_passed_through() {
        let verifier = TokenVerifier::new(SECRET);
        let token = sign(json!({"sub": "", "exp": in_one_hour()}), SECRET);
        assert_eq!(verifier.decode(&token).unwrap().user_id, "");
    }

    #[test]
    fn test_token_without_exp_is_accepted() {
        let verifier = TokenVerifier::new(SECRET);
        let token = sign(json!({"sub": "u1"}), SECRET);
        assert!(verifier.decode(&token).is_ok());
    }

    #[test]
    fn test_audience_is_ignored() {
        let verifier = TokenVerifier::new(SECRET);
        let token = sign(
            json!({"sub": "u1", "aud": "authenticated", "exp": in_one_hour()}),
            SECRET,
        );
        assert!(verifier.decode(&token).is_ok());
    }

    #[test]
    fn test_expired_token_has_distinct_message() {
        let verifier = TokenVerifier::new(SECRET);
        let exp = (Utc::now() - Duration::minutes(5)).timestamp();
        let token = sign(json!({"sub": "u1", "exp": exp}), SECRET);

        assert_eq!(verifier.decode(&token), Err(TokenError::Expired));

        let message = unauthenticated_message(verifier.authenticate(Some(&format!("Bearer {token}"))));
        assert_eq!(message, "Token has expired. Please sign in again.");
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let verifier = TokenVerifier::new(SECRET);
        let token = sign(
            json!({"sub": "u1", "email": "a@b.com", "exp": in_one_hour()}),
            "some-other-secret",
        );

        assert_eq!(verifier.decode(&token), Err(TokenError::SignatureMismatch));
        let message = unauthenticated_message(verifier.authenticate(Some(&format!("Bearer {token}"))));
        assert!(message.starts_with("Invalid token:"));
    }

    #[test]
    fn test_garbage_token_is_malformed() {
        let verifier = TokenVerifier::new(SECRET);
        assert!(matches!(
            verifier.decode("not-a-jwt"),
            Err(TokenError::Malformed(_))
        ));
        assert!(matches!(
            verifier.decode("a.b.c"),
            Err(TokenError::Malformed(_))
        ));
    }

    #[test]
    fn test_unexpected_claim_type_is_malformed() {
        let verifier = TokenVerifier::new(SECRET);
        let token = sign(json!({"sub": 42, "exp": in_one_hour()}), SECRET);
        assert!(matches!(verifier.decode(&token), Err(TokenError::Malformed(_))));
    }

    #[test]
    fn test_non_numeric_exp_is_malformed() {
        let verifier = TokenVerifier::new(SECRET);
        let token = sign(json!({"sub": "u1", "exp": "yesterday"}), SECRET);

        assert!(matches!(verifier.decode(&token), Err(TokenError::Malformed(_))));
        let message = unauthenticated_message(verifier.authenticate(Some(&format!("Bearer {token}"))));
        assert!(message.starts_with("Invalid token:"));
    }

    #[test]
    fn test_exp_equal_to_now_is_expired() {
        let verifier = TokenVerifier::new(SECRET);
        let token = sign(json!({"sub": "u1", "exp": get_current_timestamp()}), SECRET);
        assert_eq!(verifier.decode(&token), Err(TokenError::Expired));
    }

    #[test]
    fn test_token_not_yet_valid_is_rejected() {
        let verifier = TokenVerifier::new(SECRET);
        let nbf = (Utc::now() + Duration::hours(1)).timestamp();
        let token = sign(json!({"sub": "u1", "nbf": nbf, "exp": nbf + 3600}), SECRET);

        assert!(matches!(verifier.decode(&token), Err(TokenError::Malformed(_))));
        let message = unauthenticated_message(verifier.authenticate(Some(&format!("Bearer {token}"))));
        assert!(message.starts_with("Invalid token:"));

        let started = sign(
            json!({"sub": "u1", "nbf": Utc::now().timestamp() - 60, "exp": in_one_hour()}),
            SECRET,
        );
        assert!(verifier.decode(&started).is_ok());

        let bogus = sign(json!({"sub": "u1", "nbf": "soon", "exp": in_one_hour()}), SECRET);
        assert!(matches!(verifier.decode(&bogus), Err(TokenError::Malformed(_))));
    }

    #[test]
    fn test_unconfigured_secret_rejects_everything() {
        let verifier = TokenVerifier::new("");
        assert!(!verifier.is_configured());

        let token = sign(json!({"sub": "u1", "exp": in_one_hour()}), "");
        let message = unauthenticated_message(verifier.authenticate(Some(&format!("Bearer {token}"))));
        assert!(message.starts_with("Authentication error:"));
    }
}
