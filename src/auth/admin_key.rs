//! Static admin key gate for privileged analytics endpoints.

use sha2::{Digest, Sha256};

use crate::error::{CouncilError, CouncilResult};

/// Header carrying the admin key.
pub const ADMIN_KEY_HEADER: &str = "X-Admin-Key";

/// Checks the `X-Admin-Key` header against the configured key.
///
/// Independent of user identity; holds only the digest of the expected key.
#[derive(Clone)]
pub struct AdminKeyChecker {
    expected_hash: Option<String>,
}

impl AdminKeyChecker {
    /// Create a checker; an empty key leaves the server unconfigured.
    pub fn new(expected_key: &str) -> Self {
        let expected_hash = (!expected_key.is_empty()).then(|| Self::hash_key(expected_key));
        Self { expected_hash }
    }

    /// Hash a key for storage/comparison.
    fn hash_key(key: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(key.as_bytes());
        hex::encode(hasher.finalize())
    }

    pub fn is_configured(&self) -> bool {
        self.expected_hash.is_some()
    }

    /// Validate a supplied key.
    ///
    /// A missing key is always 403, even on a server with no key configured;
    /// the 500 only fires once the caller actually supplied one.
    pub fn check(&self, provided: Option<&str>) -> CouncilResult<bool> {
        let provided = provided.filter(|key| !key.is_empty()).ok_or_else(|| {
            CouncilError::Forbidden(
                "Admin key required. Please provide X-Admin-Key header.".into(),
            )
        })?;

        let expected = self.expected_hash.as_deref().ok_or_else(|| {
            CouncilError::Misconfigured("Admin key not configured on server".into())
        })?;

        if Self::hash_key(provided) != expected {
            tracing::warn!("Invalid admin key attempted");
            return Err(CouncilError::Forbidden("Invalid admin key".into()));
        }

        Ok(true)
    }
}
