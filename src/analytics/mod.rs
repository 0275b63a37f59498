//! Admin analytics tooling.
//!
//! Client, text reports and smoke checks for the conversation service's
//! stage-2 (peer ranking) endpoints.

pub mod checks;
mod client;
pub mod report;

pub use checks::{run_admin_checks, CheckOutcome};
pub use client::{AdminClient, ClientError, Probe};
