#![expect(clippy::unwrap_used, reason = "test code")]

use std::collections::HashSet;

use studykeep_core::NoteFilters;

use super::create_test_store;
use crate::seed::{seed_demo_data, SeedCounts};
use crate::traits::{CourseStore, DailyEntryStore, MaintenanceStore, NoteStore};

#[tokio::test]
async fn seed_populates_all_record_sets() {
    let store = create_test_store();
    let counts = seed_demo_data(&store).await.unwrap();

    assert_eq!(counts, SeedCounts { courses: 2, notes: 4, entries: 5 });
    assert_eq!(store.list_courses().await.unwrap().len(), 2);
    assert_eq!(store.list_notes(&NoteFilters::default()).await.unwrap().len(), 4);
    assert_eq!(store.list_entries().await.unwrap().len(), 5);
    assert!(store.has_any_courses().await.unwrap());
}

#[tokio::test]
async fn seeded_notes_reference_seeded_courses() {
    let store = create_test_store();
    seed_demo_data(&store).await.unwrap();

    let course_ids: HashSet<String> =
        store.list_courses().await.unwrap().into_iter().map(|c| c.id).collect();
    for note in store.list_notes(&NoteFilters::default()).await.unwrap() {
        assert!(course_ids.contains(&note.course_id), "note points at unknown course");
    }
}

#[tokio::test]
async fn seeded_entries_carry_distinct_recent_dates() {
    let store = create_test_store();
    seed_demo_data(&store).await.unwrap();

    let entries = store.list_entries().await.unwrap();
    let dates: HashSet<_> = entries.iter().map(|e| e.date).collect();
    assert_eq!(dates.len(), entries.len());
    for entry in &entries {
        assert!(entry.study_time > 0);
    }
}
