//! Unified storage backend with enum dispatch.
//!
//! The backend is selected once by the mode resolver; leaf operations never
//! re-check which mode is active.

use async_trait::async_trait;
use studykeep_core::{
    Course, CourseDraft, CoursePatch, DailyEntry, DailyEntryDraft, DailyEntryPatch, Note,
    NoteDraft, NoteFilters, NotePatch, StorageMode,
};

use crate::error::StoreError;
use crate::traits::{CourseStore, DailyEntryStore, MaintenanceStore, NoteStore};

macro_rules! dispatch {
    ($self:expr, $trait:path, $method:ident ( $($arg:expr),* $(,)? )) => {
        match $self {
            StorageBackend::Local(s) => <crate::LocalStore as $trait>::$method(s, $($arg),*).await,
            StorageBackend::Remote(s) => <crate::PgStore as $trait>::$method(s, $($arg),*).await,
        }
    };
}

#[derive(Clone, Debug)]
pub enum StorageBackend {
    Local(crate::LocalStore),
    Remote(crate::PgStore),
}

impl StorageBackend {
    pub fn mode(&self) -> StorageMode {
        match self {
            Self::Local(_) => StorageMode::Local,
            Self::Remote(_) => StorageMode::Remote,
        }
    }
}

// ── CourseStore ──────────────────────────────────────────────────

#[async_trait]
impl CourseStore for StorageBackend {
    async fn list_courses(&self) -> Result<Vec<Course>, StoreError> {
        dispatch!(self, CourseStore, list_courses())
    }

    async fn create_course(&self, draft: CourseDraft) -> Result<Course, StoreError> {
        dispatch!(self, CourseStore, create_course(draft))
    }

    async fn update_course(
        &self,
        id: &str,
        patch: CoursePatch,
    ) -> Result<Option<Course>, StoreError> {
        dispatch!(self, CourseStore, update_course(id, patch))
    }

    async fn delete_course(&self, id: &str) -> Result<bool, StoreError> {
        dispatch!(self, CourseStore, delete_course(id))
    }
}

// ── NoteStore ────────────────────────────────────────────────────

#[async_trait]
impl NoteStore for StorageBackend {
    async fn list_notes(&self, filters: &NoteFilters) -> Result<Vec<Note>, StoreError> {
        dispatch!(self, NoteStore, list_notes(filters))
    }

    async fn create_note(&self, draft: NoteDraft) -> Result<Note, StoreError> {
        dispatch!(self, NoteStore, create_note(draft))
    }

    async fn update_note(&self, id: &str, patch: NotePatch) -> Result<Option<Note>, StoreError> {
        dispatch!(self, NoteStore, update_note(id, patch))
    }

    async fn delete_note(&self, id: &str) -> Result<bool, StoreError> {
        dispatch!(self, NoteStore, delete_note(id))
    }
}

// ── DailyEntryStore ──────────────────────────────────────────────

#[async_trait]
impl DailyEntryStore for StorageBackend {
    async fn list_entries(&self) -> Result<Vec<DailyEntry>, StoreError> {
        dispatch!(self, DailyEntryStore, list_entries())
    }

    async fn create_entry(&self, draft: DailyEntryDraft) -> Result<DailyEntry, StoreError> {
        dispatch!(self, DailyEntryStore, create_entry(draft))
    }

    async fn update_entry(
        &self,
        id: &str,
        patch: DailyEntryPatch,
    ) -> Result<Option<DailyEntry>, StoreError> {
        dispatch!(self, DailyEntryStore, update_entry(id, patch))
    }

    async fn delete_entry(&self, id: &str) -> Result<bool, StoreError> {
        dispatch!(self, DailyEntryStore, delete_entry(id))
    }
}

// ── MaintenanceStore ─────────────────────────────────────────────

#[async_trait]
impl MaintenanceStore for StorageBackend {
    async fn has_any_courses(&self) -> Result<bool, StoreError> {
        dispatch!(self, MaintenanceStore, has_any_courses())
    }

    async fn clear_all(&self) -> Result<(), StoreError> {
        dispatch!(self, MaintenanceStore, clear_all())
    }
}
