//! Typed error enum for the service layer.
//!
//! Unifies storage and auth failures into one type so callers can match on
//! failure modes instead of downcasting opaque `anyhow::Error` boxes.

use studykeep_storage::StoreError;
use thiserror::Error;

use crate::auth::AuthError;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Operation requires a signed-in identity.
    #[error("not authenticated")]
    NotAuthenticated,

    /// Storage operation failed (database, corruption, unavailability).
    #[error("storage: {0}")]
    Storage(#[from] StoreError),

    /// Caller provided invalid input (out-of-range level, oversized minutes).
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Auth collaborator failed outright.
    #[error("auth: {0}")]
    Auth(#[from] AuthError),
}

impl ServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::Storage(StoreError::NotFound { .. }))
    }
}
