//! PostgreSQL backend using sqlx.
//!
//! Multi-tenant: the tenant id is resolved once at construction and scopes
//! every query. Filters push down as SQL predicates and must stay equivalent
//! to the local backend's in-memory filtering.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, QueryBuilder, Row};
use studykeep_core::{
    CodeLanguage, Course, CourseDraft, CoursePatch, DailyEntry, DailyEntryDraft, DailyEntryPatch,
    Mood, Note, NoteDraft, NoteFilters, NotePatch, UnderstandingLevel,
};

use crate::error::StoreError;
use crate::pg_migrations::run_pg_migrations;
use crate::traits::{CourseStore, DailyEntryStore, MaintenanceStore, NoteStore};

const COURSE_COLUMNS: &str = "id, instructor, title, links, topics, created_at, updated_at";
const NOTE_COLUMNS: &str = "id, course_id, question, answer, code_snippet, code_language, \
                            understanding_level, flag, created_at, updated_at";
const ENTRY_COLUMNS: &str = "id, date, study_time, mood, notes, created_at, updated_at";

#[derive(Clone, Debug)]
pub struct PgStore {
    pool: PgPool,
    tenant: String,
}

fn parse_json_strings(val: &serde_json::Value) -> Vec<String> {
    serde_json::from_value(val.clone()).unwrap_or_default()
}

fn escape_like(s: &str) -> String {
    s.replace('\\', "\\\\").replace('%', "\\%").replace('_', "\\_")
}

fn row_to_course(row: &PgRow) -> Result<Course, StoreError> {
    let links: serde_json::Value = row.try_get("links")?;
    let topics: serde_json::Value = row.try_get("topics")?;
    Ok(Course {
        id: row.try_get("id")?,
        instructor: row.try_get("instructor")?,
        title: row.try_get("title")?,
        links: parse_json_strings(&links),
        topics: parse_json_strings(&topics),
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn row_to_note(row: &PgRow) -> Result<Note, StoreError> {
    let level_raw: i16 = row.try_get("understanding_level")?;
    let level = u8::try_from(level_raw)
        .ok()
        .and_then(|v| UnderstandingLevel::new(v).ok())
        .ok_or_else(|| StoreError::DataCorruption {
            context: format!("understanding_level {level_raw} out of range"),
            source: "value outside [1,5]".into(),
        })?;
    let language: String = row.try_get("code_language")?;
    Ok(Note {
        id: row.try_get("id")?,
        course_id: row.try_get("course_id")?,
        question: row.try_get("question")?,
        answer: row.try_get("answer")?,
        code_snippet: row.try_get("code_snippet")?,
        code_language: CodeLanguage::parse_lossy(&language),
        understanding_level: level,
        flag: row.try_get("flag")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

fn row_to_entry(row: &PgRow) -> Result<DailyEntry, StoreError> {
    let study_time_raw: i32 = row.try_get("study_time")?;
    let study_time = u16::try_from(study_time_raw).map_err(|e| {
        StoreError::corrupt(format!("study_time {study_time_raw} out of range"), e)
    })?;
    let mood_raw: i16 = row.try_get("mood")?;
    let mood = u8::try_from(mood_raw)
        .ok()
        .and_then(|v| Mood::new(v).ok())
        .ok_or_else(|| StoreError::DataCorruption {
            context: format!("mood {mood_raw} out of range"),
            source: "value outside [1,5]".into(),
        })?;
    Ok(DailyEntry {
        id: row.try_get("id")?,
        date: row.try_get::<NaiveDate, _>("date")?,
        study_time,
        mood,
        notes: row.try_get("notes")?,
        created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        updated_at: row.try_get::<DateTime<Utc>, _>("updated_at")?,
    })
}

impl PgStore {
    /// Connect, run migrations, and scope the store to one tenant.
    pub async fn connect(database_url: &str, tenant: impl Into<String>) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(8)
            .connect(database_url)
            .await
            .map_err(|e| StoreError::Unavailable(e.to_string()))?;
        run_pg_migrations(&pool).await?;
        tracing::info!("PgStore initialized");
        Ok(Self::with_pool(pool, tenant))
    }

    /// Reuse an existing pool (migrations assumed already run).
    pub fn with_pool(pool: PgPool, tenant: impl Into<String>) -> Self {
        Self { pool, tenant: tenant.into() }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    pub fn tenant(&self) -> &str {
        &self.tenant
    }
}

#[async_trait]
impl CourseStore for PgStore {
    async fn list_courses(&self) -> Result<Vec<Course>, StoreError> {
        // COLLATE "C" matches the local backend's byte-order title sort.
        let rows = sqlx::query(&format!(
            r#"SELECT {COURSE_COLUMNS} FROM courses WHERE user_id = $1
               ORDER BY title COLLATE "C" ASC, id ASC"#
        ))
        .bind(&self.tenant)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_course).collect()
    }

    async fn create_course(&self, draft: CourseDraft) -> Result<Course, StoreError> {
        let row = sqlx::query(&format!(
            r#"INSERT INTO courses (user_id, instructor, title, links, topics)
               VALUES ($1, $2, $3, $4, $5)
               RETURNING {COURSE_COLUMNS}"#
        ))
        .bind(&self.tenant)
        .bind(&draft.instructor)
        .bind(&draft.title)
        .bind(serde_json::json!(draft.links))
        .bind(serde_json::json!(draft.topics))
        .fetch_one(&self.pool)
        .await?;
        row_to_course(&row)
    }

    async fn update_course(
        &self,
        id: &str,
        patch: CoursePatch,
    ) -> Result<Option<Course>, StoreError> {
        let Some(row) = sqlx::query(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses WHERE user_id = $1 AND id = $2"
        ))
        .bind(&self.tenant)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        else {
            return Ok(None);
        };
        let mut course = row_to_course(&row)?;
        course.apply(patch);

        let row = sqlx::query(&format!(
            r#"UPDATE courses
               SET instructor = $3, title = $4, links = $5, topics = $6, updated_at = NOW()
               WHERE user_id = $1 AND id = $2
               RETURNING {COURSE_COLUMNS}"#
        ))
        .bind(&self.tenant)
        .bind(id)
        .bind(&course.instructor)
        .bind(&course.title)
        .bind(serde_json::json!(course.links))
        .bind(serde_json::json!(course.topics))
        .fetch_one(&self.pool)
        .await?;
        row_to_course(&row).map(Some)
    }

    async fn delete_course(&self, id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM courses WHERE user_id = $1 AND id = $2")
            .bind(&self.tenant)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl NoteStore for PgStore {
    async fn list_notes(&self, filters: &NoteFilters) -> Result<Vec<Note>, StoreError> {
        let mut qb: QueryBuilder<'_, Postgres> = QueryBuilder::new(format!(
            "SELECT {NOTE_COLUMNS} FROM notes WHERE user_id = "
        ));
        qb.push_bind(&self.tenant);
        if let Some(course_id) = &filters.course_id {
            qb.push(" AND course_id = ");
            qb.push_bind(course_id);
        }
        if let Some(level) = filters.understanding_level {
            qb.push(" AND understanding_level = ");
            qb.push_bind(i16::from(level.get()));
        }
        if let Some(flagged) = filters.flagged {
            qb.push(" AND flag = ");
            qb.push_bind(flagged);
        }
        if let Some(search) = &filters.search {
            let pattern = format!("%{}%", escape_like(search));
            qb.push(" AND (question ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR answer ILIKE ");
            qb.push_bind(pattern.clone());
            qb.push(" OR code_snippet ILIKE ");
            qb.push_bind(pattern);
            qb.push(")");
        }
        qb.push(" ORDER BY created_at DESC, id DESC");

        let rows = qb.build().fetch_all(&self.pool).await?;
        rows.iter().map(row_to_note).collect()
    }

    async fn create_note(&self, draft: NoteDraft) -> Result<Note, StoreError> {
        let row = sqlx::query(&format!(
            r#"INSERT INTO notes
               (user_id, course_id, question, answer, code_snippet, code_language,
                understanding_level, flag)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
               RETURNING {NOTE_COLUMNS}"#
        ))
        .bind(&self.tenant)
        .bind(&draft.course_id)
        .bind(&draft.question)
        .bind(&draft.answer)
        .bind(&draft.code_snippet)
        .bind(draft.code_language.as_str())
        .bind(i16::from(draft.understanding_level.get()))
        .bind(draft.flag)
        .fetch_one(&self.pool)
        .await?;
        row_to_note(&row)
    }

    async fn update_note(&self, id: &str, patch: NotePatch) -> Result<Option<Note>, StoreError> {
        let Some(row) = sqlx::query(&format!(
            "SELECT {NOTE_COLUMNS} FROM notes WHERE user_id = $1 AND id = $2"
        ))
        .bind(&self.tenant)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        else {
            return Ok(None);
        };
        let mut note = row_to_note(&row)?;
        note.apply(patch);

        let row = sqlx::query(&format!(
            r#"UPDATE notes
               SET course_id = $3, question = $4, answer = $5, code_snippet = $6,
                   code_language = $7, understanding_level = $8, flag = $9,
                   updated_at = NOW()
               WHERE user_id = $1 AND id = $2
               RETURNING {NOTE_COLUMNS}"#
        ))
        .bind(&self.tenant)
        .bind(id)
        .bind(&note.course_id)
        .bind(&note.question)
        .bind(&note.answer)
        .bind(&note.code_snippet)
        .bind(note.code_language.as_str())
        .bind(i16::from(note.understanding_level.get()))
        .bind(note.flag)
        .fetch_one(&self.pool)
        .await?;
        row_to_note(&row).map(Some)
    }

    async fn delete_note(&self, id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM notes WHERE user_id = $1 AND id = $2")
            .bind(&self.tenant)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl DailyEntryStore for PgStore {
    async fn list_entries(&self) -> Result<Vec<DailyEntry>, StoreError> {
        let rows = sqlx::query(&format!(
            "SELECT {ENTRY_COLUMNS} FROM daily_entries WHERE user_id = $1
             ORDER BY date DESC, id DESC"
        ))
        .bind(&self.tenant)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(row_to_entry).collect()
    }

    async fn create_entry(&self, draft: DailyEntryDraft) -> Result<DailyEntry, StoreError> {
        let row = sqlx::query(&format!(
            r#"INSERT INTO daily_entries (user_id, date, study_time, mood, notes)
               VALUES ($1, $2, $3, $4, $5)
               ON CONFLICT (user_id, date) DO UPDATE
               SET study_time = EXCLUDED.study_time,
                   mood = EXCLUDED.mood,
                   notes = EXCLUDED.notes,
                   updated_at = NOW()
               RETURNING {ENTRY_COLUMNS}"#
        ))
        .bind(&self.tenant)
        .bind(draft.date)
        .bind(i32::from(draft.study_time))
        .bind(i16::from(draft.mood.get()))
        .bind(&draft.notes)
        .fetch_one(&self.pool)
        .await?;
        row_to_entry(&row)
    }

    async fn update_entry(
        &self,
        id: &str,
        patch: DailyEntryPatch,
    ) -> Result<Option<DailyEntry>, StoreError> {
        let Some(row) = sqlx::query(&format!(
            "SELECT {ENTRY_COLUMNS} FROM daily_entries WHERE user_id = $1 AND id = $2"
        ))
        .bind(&self.tenant)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        else {
            return Ok(None);
        };
        let mut entry = row_to_entry(&row)?;
        entry.apply(patch);

        let row = sqlx::query(&format!(
            r#"UPDATE daily_entries
               SET date = $3, study_time = $4, mood = $5, notes = $6, updated_at = NOW()
               WHERE user_id = $1 AND id = $2
               RETURNING {ENTRY_COLUMNS}"#
        ))
        .bind(&self.tenant)
        .bind(id)
        .bind(entry.date)
        .bind(i32::from(entry.study_time))
        .bind(i16::from(entry.mood.get()))
        .bind(&entry.notes)
        .fetch_one(&self.pool)
        .await?;
        row_to_entry(&row).map(Some)
    }

    async fn delete_entry(&self, id: &str) -> Result<bool, StoreError> {
        let result = sqlx::query("DELETE FROM daily_entries WHERE user_id = $1 AND id = $2")
            .bind(&self.tenant)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl MaintenanceStore for PgStore {
    async fn has_any_courses(&self) -> Result<bool, StoreError> {
        let row = sqlx::query("SELECT 1 FROM courses WHERE user_id = $1 LIMIT 1")
            .bind(&self.tenant)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    async fn clear_all(&self) -> Result<(), StoreError> {
        // Notes cascade from course deletion.
        sqlx::query("DELETE FROM courses WHERE user_id = $1")
            .bind(&self.tenant)
            .execute(&self.pool)
            .await?;
        sqlx::query("DELETE FROM daily_entries WHERE user_id = $1")
            .bind(&self.tenant)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
