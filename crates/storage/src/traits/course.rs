use async_trait::async_trait;
use studykeep_core::{Course, CourseDraft, CoursePatch};

use crate::error::StoreError;

/// Course CRUD operations.
#[async_trait]
pub trait CourseStore: Send + Sync {
    /// All courses for the current tenant, ordered by title ascending
    /// (id as tiebreak).
    async fn list_courses(&self) -> Result<Vec<Course>, StoreError>;

    /// Persist a new course; the backend assigns id and timestamps.
    async fn create_course(&self, draft: CourseDraft) -> Result<Course, StoreError>;

    /// Merge a partial update and refresh `updated_at`. `Ok(None)` when the
    /// id does not exist.
    async fn update_course(&self, id: &str, patch: CoursePatch)
        -> Result<Option<Course>, StoreError>;

    /// Remove a course. Returns `false` when the id does not exist. The
    /// remote backend cascades to dependent notes; the local backend leaves
    /// them orphaned and readers tolerate that.
    async fn delete_course(&self, id: &str) -> Result<bool, StoreError>;
}
