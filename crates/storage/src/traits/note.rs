use async_trait::async_trait;
use studykeep_core::{Note, NoteDraft, NoteFilters, NotePatch};

use crate::error::StoreError;

/// Note CRUD operations.
#[async_trait]
pub trait NoteStore: Send + Sync {
    /// Notes matching the filter conjunction, ordered by `created_at`
    /// descending (id descending as tiebreak). An empty filter returns all
    /// notes for the current tenant.
    async fn list_notes(&self, filters: &NoteFilters) -> Result<Vec<Note>, StoreError>;

    /// Persist a new note; the backend assigns id and timestamps.
    async fn create_note(&self, draft: NoteDraft) -> Result<Note, StoreError>;

    /// Merge a partial update and refresh `updated_at`. `Ok(None)` when the
    /// id does not exist.
    async fn update_note(&self, id: &str, patch: NotePatch) -> Result<Option<Note>, StoreError>;

    /// Remove a note. Returns `false` when the id does not exist.
    async fn delete_note(&self, id: &str) -> Result<bool, StoreError>;
}
