//! Storage layer for Council Core.
//!
//! Profiles live behind the `ProfileStore` trait; the shipped backend keeps
//! one JSON file per user.

mod profile_store;

pub use profile_store::{FileProfileStore, ProfileStore};
