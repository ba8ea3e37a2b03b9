//! Test utilities and module declarations for service tests.

use std::sync::Arc;

use chrono::NaiveDate;
use studykeep_core::{
    CodeLanguage, CourseDraft, DailyEntryDraft, Mood, NoteDraft, UnderstandingLevel,
};
use studykeep_storage::{ChangeBus, LocalStore, MemoryKv, StorageBackend};

use crate::DataService;

mod migration_tests;
mod mode_tests;

/// Everything a service test needs: the data service plus the kv it writes
/// checkpoints and flags into.
pub struct Harness {
    pub kv: Arc<MemoryKv>,
    pub data: Arc<DataService>,
}

pub fn harness() -> Harness {
    let kv = Arc::new(MemoryKv::new());
    let local = LocalStore::new(kv.clone());
    let backend = Arc::new(StorageBackend::Local(local));
    let data = Arc::new(DataService::new(backend, ChangeBus::new()));
    Harness { kv, data }
}

pub fn course_draft(title: &str) -> CourseDraft {
    CourseDraft {
        instructor: "Test Instructor".to_owned(),
        title: title.to_owned(),
        links: Vec::new(),
        topics: Vec::new(),
    }
}

#[expect(clippy::unwrap_used, reason = "test code")]
pub fn note_draft(course_id: &str, question: &str, level: u8) -> NoteDraft {
    NoteDraft {
        course_id: course_id.to_owned(),
        question: question.to_owned(),
        answer: format!("answer to {question}"),
        code_snippet: None,
        code_language: CodeLanguage::Plaintext,
        understanding_level: UnderstandingLevel::new(level).unwrap(),
        flag: false,
    }
}

#[expect(clippy::unwrap_used, reason = "test code")]
pub fn entry_draft(date: NaiveDate, study_time: u16, mood: u8) -> DailyEntryDraft {
    DailyEntryDraft {
        date,
        study_time,
        mood: Mood::new(mood).unwrap(),
        notes: String::new(),
    }
}

#[expect(clippy::unwrap_used, reason = "test code")]
pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}
