//! Demonstration dataset for first-run users.
//!
//! Inserted through the store traits so the exact same data lands in the
//! local store for fresh anonymous users and in the remote store for
//! brand-new authenticated accounts.

use chrono::{Days, Utc};
use studykeep_core::{
    CodeLanguage, CourseDraft, DailyEntryDraft, Mood, NoteDraft, UnderstandingLevel,
};

use crate::error::StoreError;
use crate::traits::{CourseStore, DailyEntryStore, NoteStore};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedCounts {
    pub courses: usize,
    pub notes: usize,
    pub entries: usize,
}

fn demo_courses() -> Vec<CourseDraft> {
    vec![
        CourseDraft {
            instructor: "Elena Vasquez".to_owned(),
            title: "Practical Rust".to_owned(),
            links: vec![
                "https://doc.rust-lang.org/book/".to_owned(),
                "https://doc.rust-lang.org/std/".to_owned(),
            ],
            topics: vec![
                "Ownership".to_owned(),
                "Traits".to_owned(),
                "Error Handling".to_owned(),
                "Async".to_owned(),
            ],
        },
        CourseDraft {
            instructor: "Tomasz Adamczyk".to_owned(),
            title: "SQL Foundations".to_owned(),
            links: vec![
                "https://www.postgresql.org/docs/".to_owned(),
                "https://use-the-index-luke.com/".to_owned(),
            ],
            topics: vec![
                "Joins".to_owned(),
                "Indexes".to_owned(),
                "Transactions".to_owned(),
                "Constraints".to_owned(),
            ],
        },
    ]
}

fn demo_notes(rust_course_id: &str, sql_course_id: &str) -> Vec<NoteDraft> {
    let level = |v| UnderstandingLevel::new(v).unwrap_or(UnderstandingLevel::MIN);
    vec![
        NoteDraft {
            course_id: rust_course_id.to_owned(),
            question: "What is the difference between String and &str?".to_owned(),
            answer: "String is an owned, growable buffer on the heap; &str is a borrowed \
                     view into string data. APIs usually accept &str and store String."
                .to_owned(),
            code_snippet: Some("fn greet(name: &str) -> String {\n    format!(\"hello {name}\")\n}".to_owned()),
            code_language: CodeLanguage::Rust,
            understanding_level: level(4),
            flag: false,
        },
        NoteDraft {
            course_id: rust_course_id.to_owned(),
            question: "When does a value get dropped?".to_owned(),
            answer: "At the end of its owner's scope, or earlier when moved into a consumer. \
                     Drop order within a scope is reverse declaration order."
                .to_owned(),
            code_snippet: None,
            code_language: CodeLanguage::Plaintext,
            understanding_level: level(3),
            flag: true,
        },
        NoteDraft {
            course_id: sql_course_id.to_owned(),
            question: "What does ON CONFLICT DO UPDATE do?".to_owned(),
            answer: "Turns an INSERT into an upsert: when the conflict target's unique \
                     constraint would fire, the existing row is updated instead."
                .to_owned(),
            code_snippet: Some(
                "INSERT INTO t (k, v) VALUES ($1, $2)\nON CONFLICT (k) DO UPDATE SET v = EXCLUDED.v;"
                    .to_owned(),
            ),
            code_language: CodeLanguage::Sql,
            understanding_level: level(2),
            flag: false,
        },
        NoteDraft {
            course_id: sql_course_id.to_owned(),
            question: "Why prefer a partial index?".to_owned(),
            answer: "It indexes only rows matching a predicate, so it is smaller and \
                     cheaper to maintain when queries always carry that predicate."
                .to_owned(),
            code_snippet: None,
            code_language: CodeLanguage::Plaintext,
            understanding_level: level(3),
            flag: false,
        },
    ]
}

fn demo_entries() -> Vec<DailyEntryDraft> {
    let today = Utc::now().date_naive();
    let minutes = [45_u16, 90, 30, 120, 60];
    let moods = [3_u8, 4, 2, 5, 4];
    minutes
        .iter()
        .zip(moods.iter())
        .enumerate()
        .filter_map(|(days_ago, (&study_time, &m))| {
            let date = today.checked_sub_days(Days::new(days_ago as u64))?;
            Some(DailyEntryDraft {
                date,
                study_time,
                mood: Mood::new(m).ok()?,
                notes: String::new(),
            })
        })
        .collect()
}

/// Insert the demo dataset through the given store. Notes are wired to the
/// freshly created course ids, so this works against either backend.
pub async fn seed_demo_data<S>(store: &S) -> Result<SeedCounts, StoreError>
where
    S: CourseStore + NoteStore + DailyEntryStore + ?Sized,
{
    let mut counts = SeedCounts::default();

    let mut course_ids = Vec::new();
    for draft in demo_courses() {
        let course = store.create_course(draft).await?;
        course_ids.push(course.id);
        counts.courses += 1;
    }
    let [rust_id, sql_id] = &course_ids[..] else {
        return Ok(counts);
    };

    for draft in demo_notes(rust_id, sql_id) {
        store.create_note(draft).await?;
        counts.notes += 1;
    }

    for draft in demo_entries() {
        store.create_entry(draft).await?;
        counts.entries += 1;
    }

    tracing::info!(
        courses = counts.courses,
        notes = counts.notes,
        entries = counts.entries,
        "seeded demo data"
    );
    Ok(counts)
}
