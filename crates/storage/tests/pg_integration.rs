//! Integration tests for PgStore.
//! Run with: DATABASE_URL=... cargo test -p studykeep-storage -- --ignored pg_

#![allow(clippy::unwrap_used, reason = "integration test code")]

use studykeep_core::{
    CodeLanguage, CourseDraft, DailyEntryDraft, DailyEntryPatch, Mood, NoteDraft, NoteFilters,
    NotePatch, UnderstandingLevel,
};
use studykeep_storage::traits::{CourseStore, DailyEntryStore, MaintenanceStore, NoteStore};
use studykeep_storage::PgStore;
use uuid::Uuid;

/// Every test runs under its own tenant so parallel runs never collide.
async fn create_pg_store() -> PgStore {
    let url = std::env::var("DATABASE_URL")
        .expect("DATABASE_URL must be set for PgStore integration tests");
    let tenant = format!("test-{}", Uuid::new_v4());
    PgStore::connect(&url, tenant).await.expect("Failed to connect to PostgreSQL")
}

fn course_draft(title: &str) -> CourseDraft {
    CourseDraft {
        instructor: "Integration Instructor".to_owned(),
        title: title.to_owned(),
        links: vec!["https://example.com".to_owned()],
        topics: vec!["topic".to_owned()],
    }
}

fn note_draft(course_id: &str, question: &str, level: u8) -> NoteDraft {
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

fn entry_draft(date: chrono::NaiveDate, study_time: u16, mood: u8) -> DailyEntryDraft {
    DailyEntryDraft {
        date,
        study_time,
        mood: Mood::new(mood).unwrap(),
        notes: String::new(),
    }
}

fn date(y: i32, m: u32, d: u32) -> chrono::NaiveDate {
    chrono::NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ── Course tests ─────────────────────────────────────────────────

#[tokio::test]
#[ignore]
async fn pg_course_crud_roundtrip() {
    let store = create_pg_store().await;

    let created = store.create_course(course_draft("Algorithms")).await.unwrap();
    assert!(!created.id.is_empty());
    assert_eq!(created.links, vec!["https://example.com".to_owned()]);

    let patch = studykeep_core::CoursePatch {
        title: Some("Algorithms II".to_owned()),
        ..studykeep_core::CoursePatch::default()
    };
    let updated = store.update_course(&created.id, patch).await.unwrap().unwrap();
    assert_eq!(updated.title, "Algorithms II");
    assert_eq!(updated.instructor, created.instructor);

    assert!(store.delete_course(&created.id).await.unwrap());
    assert!(!store.delete_course(&created.id).await.unwrap());
    store.clear_all().await.unwrap();
}

#[tokio::test]
#[ignore]
async fn pg_courses_ordered_by_title_bytewise() {
    let store = create_pg_store().await;
    store.create_course(course_draft("Zig")).await.unwrap();
    store.create_course(course_draft("Ada")).await.unwrap();
    store.create_course(course_draft("ML")).await.unwrap();

    let titles: Vec<String> =
        store.list_courses().await.unwrap().into_iter().map(|c| c.title).collect();
    assert_eq!(titles, ["Ada", "ML", "Zig"]);
    store.clear_all().await.unwrap();
}

// ── Note tests ───────────────────────────────────────────────────

#[tokio::test]
#[ignore]
async fn pg_note_filters_match_local_semantics() {
    let store = create_pg_store().await;
    let rust = store.create_course(course_draft("Rust")).await.unwrap();
    let sql = store.create_course(course_draft("SQL")).await.unwrap();

    let mut flagged = note_draft(&rust.id, "lifetimes", 2);
    flagged.flag = true;
    store.create_note(flagged).await.unwrap();
    store.create_note(note_draft(&rust.id, "traits", 4)).await.unwrap();
    store.create_note(note_draft(&sql.id, "joins", 2)).await.unwrap();

    let by_course = store.list_notes(&NoteFilters::for_course(&rust.id)).await.unwrap();
    assert_eq!(by_course.len(), 2);

    let combined = store
        .list_notes(&NoteFilters {
            course_id: Some(rust.id.clone()),
            understanding_level: Some(UnderstandingLevel::new(2).unwrap()),
            flagged: Some(true),
            ..NoteFilters::default()
        })
        .await
        .unwrap();
    assert_eq!(combined.len(), 1);
    assert_eq!(combined[0].question, "lifetimes");

    let search = store
        .list_notes(&NoteFilters { search: Some("LIFE".to_owned()), ..NoteFilters::default() })
        .await
        .unwrap();
    assert_eq!(search.len(), 1);

    // LIKE metacharacters in a search term must be literal.
    let underscore = store
        .list_notes(&NoteFilters { search: Some("_".to_owned()), ..NoteFilters::default() })
        .await
        .unwrap();
    assert!(underscore.is_empty());

    store.clear_all().await.unwrap();
}

#[tokio::test]
#[ignore]
async fn pg_course_delete_cascades_to_notes() {
    let store = create_pg_store().await;
    let course = store.create_course(course_draft("Doomed")).await.unwrap();
    store.create_note(note_draft(&course.id, "q", 3)).await.unwrap();

    assert!(store.delete_course(&course.id).await.unwrap());

    assert!(store.list_notes(&NoteFilters::default()).await.unwrap().is_empty());
    store.clear_all().await.unwrap();
}

#[tokio::test]
#[ignore]
async fn pg_review_patch_only_touches_understanding() {
    let store = create_pg_store().await;
    let course = store.create_course(course_draft("Rust")).await.unwrap();
    let note = store.create_note(note_draft(&course.id, "q", 2)).await.unwrap();

    let updated = store
        .update_note(&note.id, NotePatch::understanding(UnderstandingLevel::new(5).unwrap()))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(updated.understanding_level.get(), 5);
    assert_eq!(updated.question, note.question);
    store.clear_all().await.unwrap();
}

// ── Daily entry tests ────────────────────────────────────────────

#[tokio::test]
#[ignore]
async fn pg_entry_create_upserts_by_date() {
    let store = create_pg_store().await;
    let d = date(2025, 6, 1);

    let first = store.create_entry(entry_draft(d, 30, 3)).await.unwrap();
    let second = store.create_entry(entry_draft(d, 90, 5)).await.unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.study_time, 90);
    assert_eq!(store.list_entries().await.unwrap().len(), 1);
    store.clear_all().await.unwrap();
}

#[tokio::test]
#[ignore]
async fn pg_entry_update_and_delete() {
    let store = create_pg_store().await;
    let entry = store.create_entry(entry_draft(date(2025, 6, 2), 30, 3)).await.unwrap();

    let patch = DailyEntryPatch { study_time: Some(45), ..DailyEntryPatch::default() };
    let updated = store.update_entry(&entry.id, patch).await.unwrap().unwrap();
    assert_eq!(updated.study_time, 45);

    assert!(store.delete_entry(&entry.id).await.unwrap());
    assert!(!store.delete_entry(&entry.id).await.unwrap());
    store.clear_all().await.unwrap();
}

// ── Tenant isolation ─────────────────────────────────────────────

#[tokio::test]
#[ignore]
async fn pg_tenants_never_see_each_other() {
    let a = create_pg_store().await;
    let b = PgStore::with_pool(a.pool().clone(), format!("test-{}", Uuid::new_v4()));

    a.create_course(course_draft("A only")).await.unwrap();

    assert!(b.list_courses().await.unwrap().is_empty());
    assert!(!b.has_any_courses().await.unwrap());
    a.clear_all().await.unwrap();
}
