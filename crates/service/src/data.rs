//! Single mutation path over the selected backend.
//!
//! Every successful create/update/delete publishes exactly one change event
//! for its entity kind, so readers in both modes converge by re-fetching.
//! Reads delegate to the backend unchanged.

use std::sync::Arc;

use studykeep_core::{
    Course, CourseDraft, CoursePatch, DailyEntry, DailyEntryDraft, DailyEntryPatch, Note,
    NoteDraft, NoteFilters, NotePatch, StorageMode,
};
use studykeep_storage::traits::{CourseStore, DailyEntryStore, MaintenanceStore, NoteStore};
use studykeep_storage::{ChangeBus, EntityKind, StorageBackend};

use crate::error::ServiceError;

pub struct DataService {
    backend: Arc<StorageBackend>,
    bus: ChangeBus,
}

impl DataService {
    pub fn new(backend: Arc<StorageBackend>, bus: ChangeBus) -> Self {
        Self { backend, bus }
    }

    pub fn bus(&self) -> &ChangeBus {
        &self.bus
    }

    pub fn mode(&self) -> StorageMode {
        self.backend.mode()
    }

    // Courses

    pub async fn list_courses(&self) -> Result<Vec<Course>, ServiceError> {
        Ok(self.backend.list_courses().await?)
    }

    pub async fn create_course(&self, draft: CourseDraft) -> Result<Course, ServiceError> {
        let course = self.backend.create_course(draft).await?;
        self.bus.publish(EntityKind::Course);
        Ok(course)
    }

    pub async fn update_course(
        &self,
        id: &str,
        patch: CoursePatch,
    ) -> Result<Option<Course>, ServiceError> {
        let updated = self.backend.update_course(id, patch).await?;
        if updated.is_some() {
            self.bus.publish(EntityKind::Course);
        }
        Ok(updated)
    }

    pub async fn delete_course(&self, id: &str) -> Result<bool, ServiceError> {
        let deleted = self.backend.delete_course(id).await?;
        if deleted {
            self.bus.publish(EntityKind::Course);
            // Remote cascades note rows; local readers filter orphans. Either
            // way note views are stale after a course delete.
            self.bus.publish(EntityKind::Note);
        }
        Ok(deleted)
    }

    // Notes

    pub async fn list_notes(&self, filters: &NoteFilters) -> Result<Vec<Note>, ServiceError> {
        Ok(self.backend.list_notes(filters).await?)
    }

    pub async fn create_note(&self, draft: NoteDraft) -> Result<Note, ServiceError> {
        let note = self.backend.create_note(draft).await?;
        self.bus.publish(EntityKind::Note);
        Ok(note)
    }

    pub async fn update_note(
        &self,
        id: &str,
        patch: NotePatch,
    ) -> Result<Option<Note>, ServiceError> {
        let updated = self.backend.update_note(id, patch).await?;
        if updated.is_some() {
            self.bus.publish(EntityKind::Note);
        }
        Ok(updated)
    }

    /// Same storage effect as [`update_note`](Self::update_note), the bus
    /// still fires; callers that batch per-item updates (the review machine)
    /// use this name to signal that no per-item user messaging should happen.
    pub async fn update_note_silent(
        &self,
        id: &str,
        patch: NotePatch,
    ) -> Result<Option<Note>, ServiceError> {
        self.update_note(id, patch).await
    }

    pub async fn delete_note(&self, id: &str) -> Result<bool, ServiceError> {
        let deleted = self.backend.delete_note(id).await?;
        if deleted {
            self.bus.publish(EntityKind::Note);
        }
        Ok(deleted)
    }

    // Daily entries

    pub async fn list_entries(&self) -> Result<Vec<DailyEntry>, ServiceError> {
        Ok(self.backend.list_entries().await?)
    }

    pub async fn create_entry(&self, draft: DailyEntryDraft) -> Result<DailyEntry, ServiceError> {
        draft.validate().map_err(|e| ServiceError::InvalidInput(e.to_string()))?;
        let entry = self.backend.create_entry(draft).await?;
        self.bus.publish(EntityKind::DailyEntry);
        Ok(entry)
    }

    pub async fn update_entry(
        &self,
        id: &str,
        patch: DailyEntryPatch,
    ) -> Result<Option<DailyEntry>, ServiceError> {
        let updated = self.backend.update_entry(id, patch).await?;
        if updated.is_some() {
            self.bus.publish(EntityKind::DailyEntry);
        }
        Ok(updated)
    }

    pub async fn delete_entry(&self, id: &str) -> Result<bool, ServiceError> {
        let deleted = self.backend.delete_entry(id).await?;
        if deleted {
            self.bus.publish(EntityKind::DailyEntry);
        }
        Ok(deleted)
    }

    // Maintenance

    pub async fn clear_all(&self) -> Result<(), ServiceError> {
        self.backend.clear_all().await?;
        self.bus.publish(EntityKind::Course);
        self.bus.publish(EntityKind::Note);
        self.bus.publish(EntityKind::DailyEntry);
        Ok(())
    }
}
