//! Authentication module for Council Core.
//!
//! Provides two independent gates:
//! - Bearer token: identity of the signed-in user, issued by the identity provider
//! - Admin key: static shared secret for analytics endpoints

mod admin_key;
mod jwt;
mod middleware;

pub use admin_key::*;
pub use jwt::*;
pub use middleware::*;
