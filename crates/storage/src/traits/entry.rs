use async_trait::async_trait;
use studykeep_core::{DailyEntry, DailyEntryDraft, DailyEntryPatch};

use crate::error::StoreError;

/// Daily study-journal entry operations.
#[async_trait]
pub trait DailyEntryStore: Send + Sync {
    /// All entries for the current tenant, ordered by date descending.
    async fn list_entries(&self) -> Result<Vec<DailyEntry>, StoreError>;

    /// Upsert-by-date: when an entry for the draft's date already exists,
    /// its fields are replaced and `updated_at` refreshed instead of
    /// inserting a duplicate.
    async fn create_entry(&self, draft: DailyEntryDraft) -> Result<DailyEntry, StoreError>;

    /// Merge a partial update and refresh `updated_at`. `Ok(None)` when the
    /// id does not exist.
    async fn update_entry(
        &self,
        id: &str,
        patch: DailyEntryPatch,
    ) -> Result<Option<DailyEntry>, StoreError>;

    /// Remove an entry. Returns `false` when the id does not exist.
    async fn delete_entry(&self, id: &str) -> Result<bool, StoreError>;
}
