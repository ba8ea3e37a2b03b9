use async_trait::async_trait;

use crate::error::StoreError;

/// Bulk operations used by the migration engine and the mode resolver.
#[async_trait]
pub trait MaintenanceStore: Send + Sync {
    /// Whether at least one course exists for the current tenant. The
    /// migration engine treats any remote course as "real account data" and
    /// refuses to migrate on top of it.
    async fn has_any_courses(&self) -> Result<bool, StoreError>;

    /// Remove every entity for the current tenant. On the local backend this
    /// also clears the initialized flag so no stale shadow copy remains.
    async fn clear_all(&self) -> Result<(), StoreError>;
}
