//! One-shot local-to-remote migration on first sign-in.
//!
//! Moves everything the anonymous user accumulated locally into their fresh
//! account, in dependency order so rewritten foreign keys always resolve.
//! Deliberately not atomic: a partial run leaves the remote ahead and the
//! local data untouched, and re-running may duplicate courses. That tradeoff
//! is documented rather than hidden behind a transaction the local backend
//! cannot join.

use std::collections::HashMap;

use studykeep_storage::seed_demo_data;
use studykeep_storage::traits::{CourseStore, DailyEntryStore, MaintenanceStore, NoteStore};
use studykeep_storage::StoreError;

use crate::auth::AuthProvider;
use crate::error::ServiceError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MigrationCounts {
    pub courses: usize,
    pub notes: usize,
    pub entries: usize,
    /// Notes left behind because their course failed to migrate.
    pub skipped_notes: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrationOutcome {
    /// Local data moved into the account; local store cleared.
    Migrated(MigrationCounts),
    /// The account already had courses; local data discarded untouched.
    Skipped,
    /// Both sides were empty; the account got the demo dataset instead.
    Seeded,
}

/// Infrastructure failures abort the run; anything row-shaped is logged and
/// skipped so one bad record cannot hold the rest of the data hostage.
fn is_fatal(error: &StoreError) -> bool {
    matches!(error, StoreError::Database(_) | StoreError::Unavailable(_))
}

pub async fn migrate_to_remote<A, L, R>(
    auth: &A,
    local: &L,
    remote: &R,
) -> Result<MigrationOutcome, ServiceError>
where
    A: AuthProvider + ?Sized,
    L: CourseStore + NoteStore + DailyEntryStore + MaintenanceStore + ?Sized,
    R: CourseStore + NoteStore + DailyEntryStore + MaintenanceStore + ?Sized,
{
    if auth.current_identity().await?.is_none() {
        return Err(ServiceError::NotAuthenticated);
    }

    // Never clobber an account that already holds data. An error here aborts:
    // we cannot tell an empty account from an unreachable one.
    if remote.has_any_courses().await? {
        tracing::info!("account already populated, discarding local data");
        local.clear_all().await?;
        return Ok(MigrationOutcome::Skipped);
    }

    let courses = local.list_courses().await?;
    let notes = local.list_notes(&studykeep_core::NoteFilters::default()).await?;
    let entries = local.list_entries().await?;

    if courses.is_empty() && notes.is_empty() && entries.is_empty() {
        seed_demo_data(remote).await?;
        local.clear_all().await?;
        tracing::info!("fresh account and empty local store, seeded demo data");
        return Ok(MigrationOutcome::Seeded);
    }

    let mut counts = MigrationCounts::default();

    // Courses first, remembering old-id to new-id so notes can be rewritten.
    let mut course_id_map: HashMap<String, String> = HashMap::with_capacity(courses.len());
    for course in courses {
        let old_id = course.id.clone();
        match remote.create_course(course.into_draft()).await {
            Ok(created) => {
                course_id_map.insert(old_id, created.id);
                counts.courses += 1;
            },
            Err(e) if is_fatal(&e) => return Err(e.into()),
            Err(e) => tracing::warn!(course_id = %old_id, error = %e, "course not migrated"),
        }
    }

    for note in notes {
        let Some(new_course_id) = course_id_map.get(&note.course_id) else {
            tracing::warn!(note_id = %note.id, course_id = %note.course_id,
                "note references a course that did not migrate, skipping");
            counts.skipped_notes += 1;
            continue;
        };
        let mut draft = note.into_draft();
        draft.course_id = new_course_id.clone();
        match remote.create_note(draft).await {
            Ok(_) => counts.notes += 1,
            Err(e) if is_fatal(&e) => return Err(e.into()),
            Err(e) => tracing::warn!(error = %e, "note not migrated"),
        }
    }

    // Entry create is upsert-by-date, so a collision with anything the
    // account wrote in the meantime resolves in place.
    for entry in entries {
        match remote.create_entry(entry.into_draft()).await {
            Ok(_) => counts.entries += 1,
            Err(e) if is_fatal(&e) => return Err(e.into()),
            Err(e) => tracing::warn!(error = %e, "daily entry not migrated"),
        }
    }

    local.clear_all().await?;
    tracing::info!(
        courses = counts.courses,
        notes = counts.notes,
        entries = counts.entries,
        skipped_notes = counts.skipped_notes,
        "local data migrated to account"
    );
    Ok(MigrationOutcome::Migrated(counts))
}
