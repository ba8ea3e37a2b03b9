//! Service layer for studykeep
//!
//! Sits between a front end and the storage crate: decides which backend to
//! run against, moves local data into an account on first sign-in, funnels
//! every mutation through one change-publishing path, and drives the review
//! session state machine.

mod auth;
mod data;
mod error;
mod migration;
mod mode;
mod review;
#[cfg(test)]
mod tests;

pub use auth::{AuthError, AuthEvent, AuthProvider, Identity, StaticAuth};
pub use data::DataService;
pub use error::ServiceError;
pub use migration::{migrate_to_remote, MigrationCounts, MigrationOutcome};
pub use mode::ModeResolver;
pub use review::{ReviewPhase, ReviewReport, ReviewSession};
