//! Local backend: flat per-kind JSON records in key-value storage.
//!
//! Single tenant, no suspension points: every operation deserializes the
//! whole record set, works on it in memory, and writes it back. Filtering
//! and ordering happen client-side and must match what the PostgreSQL
//! backend pushes down as predicates.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use serde::de::DeserializeOwned;
use serde::Serialize;
use studykeep_core::{
    Course, CourseDraft, CoursePatch, DailyEntry, DailyEntryDraft, DailyEntryPatch, Note,
    NoteDraft, NoteFilters, NotePatch,
};

use crate::error::StoreError;
use crate::kv::{keys, KvStore};
use crate::traits::{CourseStore, DailyEntryStore, MaintenanceStore, NoteStore};

/// Entity store over a [`KvStore`] collaborator.
#[derive(Clone, Debug)]
pub struct LocalStore {
    kv: Arc<dyn KvStore>,
}

/// Local ids: millisecond timestamp plus a short random suffix, mirroring
/// the format remote-migrated data gets rewritten away from.
fn generate_id() -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("{}-{}", Utc::now().timestamp_millis(), &suffix[..9])
}

/// Case-insensitive substring match used by the note search filter.
fn contains_ci(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

pub(crate) fn note_matches(note: &Note, filters: &NoteFilters) -> bool {
    if let Some(course_id) = &filters.course_id {
        if note.course_id != *course_id {
            return false;
        }
    }
    if let Some(level) = filters.understanding_level {
        if note.understanding_level != level {
            return false;
        }
    }
    if let Some(flagged) = filters.flagged {
        if note.flag != flagged {
            return false;
        }
    }
    if let Some(search) = &filters.search {
        let needle = search.to_lowercase();
        let snippet_hit =
            note.code_snippet.as_deref().is_some_and(|s| contains_ci(s, &needle));
        if !contains_ci(&note.question, &needle)
            && !contains_ci(&note.answer, &needle)
            && !snippet_hit
        {
            return false;
        }
    }
    true
}

impl LocalStore {
    pub fn new(kv: Arc<dyn KvStore>) -> Self {
        Self { kv }
    }

    pub fn kv(&self) -> &Arc<dyn KvStore> {
        &self.kv
    }

    /// Read a record set. A missing key is an empty set; an unparseable
    /// payload is logged and degrades to empty for that key only.
    fn read_list<T: DeserializeOwned>(&self, key: &str) -> Vec<T> {
        let Some(raw) = self.kv.get(key) else {
            return Vec::new();
        };
        match serde_json::from_str(&raw) {
            Ok(list) => list,
            Err(e) => {
                tracing::warn!(key, error = %e, "unparseable record set, treating as empty");
                Vec::new()
            },
        }
    }

    fn write_list<T: Serialize>(&self, key: &str, list: &[T]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(list)?;
        self.kv.set(key, &raw);
        Ok(())
    }

    /// Whether all three record sets are empty (migration pre-check).
    pub fn is_empty(&self) -> bool {
        self.read_list::<Course>(keys::COURSES).is_empty()
            && self.read_list::<Note>(keys::NOTES).is_empty()
            && self.read_list::<DailyEntry>(keys::DAILY_ENTRIES).is_empty()
    }
}

#[async_trait]
impl CourseStore for LocalStore {
    async fn list_courses(&self) -> Result<Vec<Course>, StoreError> {
        let mut courses = self.read_list::<Course>(keys::COURSES);
        courses.sort_by(|a, b| a.title.cmp(&b.title).then_with(|| a.id.cmp(&b.id)));
        Ok(courses)
    }

    async fn create_course(&self, draft: CourseDraft) -> Result<Course, StoreError> {
        let mut courses = self.read_list::<Course>(keys::COURSES);
        let now = Utc::now();
        let course = Course {
            id: generate_id(),
            instructor: draft.instructor,
            title: draft.title,
            links: draft.links,
            topics: draft.topics,
            created_at: now,
            updated_at: now,
        };
        courses.push(course.clone());
        self.write_list(keys::COURSES, &courses)?;
        Ok(course)
    }

    async fn update_course(
        &self,
        id: &str,
        patch: CoursePatch,
    ) -> Result<Option<Course>, StoreError> {
        let mut courses = self.read_list::<Course>(keys::COURSES);
        let Some(course) = courses.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        course.apply(patch);
        course.updated_at = Utc::now();
        let updated = course.clone();
        self.write_list(keys::COURSES, &courses)?;
        Ok(Some(updated))
    }

    async fn delete_course(&self, id: &str) -> Result<bool, StoreError> {
        let mut courses = self.read_list::<Course>(keys::COURSES);
        let before = courses.len();
        courses.retain(|c| c.id != id);
        if courses.len() == before {
            return Ok(false);
        }
        self.write_list(keys::COURSES, &courses)?;
        Ok(true)
    }
}

#[async_trait]
impl NoteStore for LocalStore {
    async fn list_notes(&self, filters: &NoteFilters) -> Result<Vec<Note>, StoreError> {
        let mut notes = self.read_list::<Note>(keys::NOTES);
        notes.retain(|n| note_matches(n, filters));
        notes.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));
        Ok(notes)
    }

    async fn create_note(&self, draft: NoteDraft) -> Result<Note, StoreError> {
        let mut notes = self.read_list::<Note>(keys::NOTES);
        let now = Utc::now();
        let note = Note {
            id: generate_id(),
            course_id: draft.course_id,
            question: draft.question,
            answer: draft.answer,
            code_snippet: draft.code_snippet,
            code_language: draft.code_language,
            understanding_level: draft.understanding_level,
            flag: draft.flag,
            created_at: now,
            updated_at: now,
        };
        notes.push(note.clone());
        self.write_list(keys::NOTES, &notes)?;
        Ok(note)
    }

    async fn update_note(&self, id: &str, patch: NotePatch) -> Result<Option<Note>, StoreError> {
        let mut notes = self.read_list::<Note>(keys::NOTES);
        let Some(note) = notes.iter_mut().find(|n| n.id == id) else {
            return Ok(None);
        };
        note.apply(patch);
        note.updated_at = Utc::now();
        let updated = note.clone();
        self.write_list(keys::NOTES, &notes)?;
        Ok(Some(updated))
    }

    async fn delete_note(&self, id: &str) -> Result<bool, StoreError> {
        let mut notes = self.read_list::<Note>(keys::NOTES);
        let before = notes.len();
        notes.retain(|n| n.id != id);
        if notes.len() == before {
            return Ok(false);
        }
        self.write_list(keys::NOTES, &notes)?;
        Ok(true)
    }
}

#[async_trait]
impl DailyEntryStore for LocalStore {
    async fn list_entries(&self) -> Result<Vec<DailyEntry>, StoreError> {
        let mut entries = self.read_list::<DailyEntry>(keys::DAILY_ENTRIES);
        entries.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| b.id.cmp(&a.id)));
        Ok(entries)
    }

    async fn create_entry(&self, draft: DailyEntryDraft) -> Result<DailyEntry, StoreError> {
        let mut entries = self.read_list::<DailyEntry>(keys::DAILY_ENTRIES);
        let now = Utc::now();

        // Upsert-by-date: an existing entry for this date is merged in place.
        if let Some(existing) = entries.iter_mut().find(|e| e.date == draft.date) {
            existing.merge_draft(draft);
            existing.updated_at = now;
            let merged = existing.clone();
            self.write_list(keys::DAILY_ENTRIES, &entries)?;
            return Ok(merged);
        }

        let entry = DailyEntry {
            id: generate_id(),
            date: draft.date,
            study_time: draft.study_time,
            mood: draft.mood,
            notes: draft.notes,
            created_at: now,
            updated_at: now,
        };
        entries.push(entry.clone());
        self.write_list(keys::DAILY_ENTRIES, &entries)?;
        Ok(entry)
    }

    async fn update_entry(
        &self,
        id: &str,
        patch: DailyEntryPatch,
    ) -> Result<Option<DailyEntry>, StoreError> {
        let mut entries = self.read_list::<DailyEntry>(keys::DAILY_ENTRIES);
        let Some(entry) = entries.iter_mut().find(|e| e.id == id) else {
            return Ok(None);
        };
        entry.apply(patch);
        entry.updated_at = Utc::now();
        let updated = entry.clone();
        self.write_list(keys::DAILY_ENTRIES, &entries)?;
        Ok(Some(updated))
    }

    async fn delete_entry(&self, id: &str) -> Result<bool, StoreError> {
        let mut entries = self.read_list::<DailyEntry>(keys::DAILY_ENTRIES);
        let before = entries.len();
        entries.retain(|e| e.id != id);
        if entries.len() == before {
            return Ok(false);
        }
        self.write_list(keys::DAILY_ENTRIES, &entries)?;
        Ok(true)
    }
}

#[async_trait]
impl MaintenanceStore for LocalStore {
    async fn has_any_courses(&self) -> Result<bool, StoreError> {
        Ok(!self.read_list::<Course>(keys::COURSES).is_empty())
    }

    async fn clear_all(&self) -> Result<(), StoreError> {
        self.kv.remove(keys::COURSES);
        self.kv.remove(keys::NOTES);
        self.kv.remove(keys::DAILY_ENTRIES);
        self.kv.remove(keys::STORAGE_INITIALIZED);
        Ok(())
    }
}
