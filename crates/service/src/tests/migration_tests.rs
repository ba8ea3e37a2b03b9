#![expect(clippy::unwrap_used, reason = "test code")]

use std::collections::HashSet;
use std::sync::Arc;

use studykeep_core::NoteFilters;
use studykeep_storage::traits::{CourseStore, DailyEntryStore, MaintenanceStore, NoteStore};
use studykeep_storage::{LocalStore, MemoryKv};

use super::{course_draft, date, entry_draft, note_draft};
use crate::{migrate_to_remote, MigrationOutcome, ServiceError, StaticAuth};

fn store() -> LocalStore {
    LocalStore::new(Arc::new(MemoryKv::new()))
}

#[tokio::test]
async fn anonymous_caller_is_rejected() {
    let err = migrate_to_remote(&StaticAuth::anonymous(), &store(), &store()).await.unwrap_err();
    assert!(matches!(err, ServiceError::NotAuthenticated));
}

#[tokio::test]
async fn populated_account_is_never_clobbered() {
    let auth = StaticAuth::signed_in("user-1");
    let local = store();
    let remote = store();

    local.create_course(course_draft("Local Only")).await.unwrap();
    let existing = remote.create_course(course_draft("Already There")).await.unwrap();

    let outcome = migrate_to_remote(&auth, &local, &remote).await.unwrap();

    assert_eq!(outcome, MigrationOutcome::Skipped);
    // Local side cleared, remote side untouched.
    assert!(local.list_courses().await.unwrap().is_empty());
    let remote_courses = remote.list_courses().await.unwrap();
    assert_eq!(remote_courses.len(), 1);
    assert_eq!(remote_courses[0].id, existing.id);
}

#[tokio::test]
async fn empty_both_sides_seeds_the_account() {
    let auth = StaticAuth::signed_in("user-1");
    let local = store();
    let remote = store();

    let outcome = migrate_to_remote(&auth, &local, &remote).await.unwrap();

    assert_eq!(outcome, MigrationOutcome::Seeded);
    assert!(remote.has_any_courses().await.unwrap());
    assert!(!remote.list_notes(&NoteFilters::default()).await.unwrap().is_empty());
}

#[tokio::test]
async fn migration_rewrites_course_ids_on_notes() {
    let auth = StaticAuth::signed_in("user-1");
    let local = store();
    let remote = store();

    let course = local.create_course(course_draft("Rust")).await.unwrap();
    local.create_note(note_draft(&course.id, "ownership", 3)).await.unwrap();
    local.create_note(note_draft(&course.id, "borrowing", 2)).await.unwrap();
    local.create_entry(entry_draft(date(2025, 6, 1), 45, 4)).await.unwrap();

    let outcome = migrate_to_remote(&auth, &local, &remote).await.unwrap();

    let MigrationOutcome::Migrated(counts) = outcome else {
        panic!("expected Migrated, got {outcome:?}");
    };
    assert_eq!(counts.courses, 1);
    assert_eq!(counts.notes, 2);
    assert_eq!(counts.entries, 1);
    assert_eq!(counts.skipped_notes, 0);

    let remote_ids: HashSet<String> =
        remote.list_courses().await.unwrap().into_iter().map(|c| c.id).collect();
    assert!(!remote_ids.contains(&course.id), "remote must assign fresh ids");
    for note in remote.list_notes(&NoteFilters::default()).await.unwrap() {
        assert!(remote_ids.contains(&note.course_id), "note must point at a migrated course");
    }

    // Source data is gone after a successful run.
    assert!(local.list_courses().await.unwrap().is_empty());
    assert!(local.list_notes(&NoteFilters::default()).await.unwrap().is_empty());
    assert!(local.list_entries().await.unwrap().is_empty());
}

#[tokio::test]
async fn notes_without_a_migrated_course_are_left_out() {
    let auth = StaticAuth::signed_in("user-1");
    let local = store();
    let remote = store();

    let course = local.create_course(course_draft("Rust")).await.unwrap();
    local.create_note(note_draft(&course.id, "kept", 3)).await.unwrap();
    // Orphan from a long-deleted course; the local backend tolerates it.
    local.create_note(note_draft("dead-course-id", "orphan", 2)).await.unwrap();

    let outcome = migrate_to_remote(&auth, &local, &remote).await.unwrap();

    let MigrationOutcome::Migrated(counts) = outcome else {
        panic!("expected Migrated, got {outcome:?}");
    };
    assert_eq!(counts.notes, 1);
    assert_eq!(counts.skipped_notes, 1);

    let migrated = remote.list_notes(&NoteFilters::default()).await.unwrap();
    assert_eq!(migrated.len(), 1);
    assert_eq!(migrated[0].question, "kept");
}

#[tokio::test]
async fn same_date_entries_merge_on_the_remote() {
    let auth = StaticAuth::signed_in("user-1");
    let local = store();
    let remote = store();

    // Stage remote data through a lower layer than the existence check sees:
    // only courses gate the clobber check, entries do not.
    remote.create_entry(entry_draft(date(2025, 6, 1), 15, 2)).await.unwrap();
    local.create_course(course_draft("Rust")).await.unwrap();
    local.create_entry(entry_draft(date(2025, 6, 1), 60, 5)).await.unwrap();

    migrate_to_remote(&auth, &local, &remote).await.unwrap();

    let entries = remote.list_entries().await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].study_time, 60);
    assert_eq!(entries[0].mood.get(), 5);
}
