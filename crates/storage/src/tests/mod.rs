//! Test utilities and module declarations for storage tests.

use std::sync::Arc;

use chrono::NaiveDate;
use studykeep_core::{CodeLanguage, CourseDraft, DailyEntryDraft, Mood, NoteDraft, UnderstandingLevel};

use crate::kv::MemoryKv;
use crate::LocalStore;

mod seed_tests;

pub fn create_test_store() -> LocalStore {
    LocalStore::new(Arc::new(MemoryKv::new()))
}

pub fn course_draft(title: &str) -> CourseDraft {
    CourseDraft {
        instructor: "Test Instructor".to_owned(),
        title: title.to_owned(),
        links: vec!["https://example.com".to_owned()],
        topics: vec!["topic".to_owned()],
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

/// Guarantees distinct `created_at` millisecond stamps between calls.
pub fn tick() {
    std::thread::sleep(std::time::Duration::from_millis(2));
}
