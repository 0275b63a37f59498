//! Domain types for Council Core.

mod analytics;
mod profile;

pub use analytics::*;
pub use profile::*;
