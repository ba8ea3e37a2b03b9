//! PostgreSQL schema migrations for the studykeep entity store.

use sqlx::PgPool;

use crate::bus::CHANGE_CHANNEL;
use crate::error::StoreError;

/// Run all PostgreSQL migrations. Idempotent; executed at pool construction.
pub async fn run_pg_migrations(pool: &PgPool) -> Result<(), StoreError> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS courses (
            id TEXT PRIMARY KEY DEFAULT gen_random_uuid()::text,
            user_id TEXT NOT NULL,
            instructor TEXT NOT NULL DEFAULT '',
            title TEXT NOT NULL,
            links JSONB NOT NULL DEFAULT '[]',
            topics JSONB NOT NULL DEFAULT '[]',
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS notes (
            id TEXT PRIMARY KEY DEFAULT gen_random_uuid()::text,
            user_id TEXT NOT NULL,
            course_id TEXT NOT NULL REFERENCES courses(id) ON DELETE CASCADE,
            question TEXT NOT NULL,
            answer TEXT NOT NULL DEFAULT '',
            code_snippet TEXT,
            code_language TEXT NOT NULL DEFAULT 'plaintext',
            understanding_level SMALLINT NOT NULL DEFAULT 3
                CHECK (understanding_level BETWEEN 1 AND 5),
            flag BOOLEAN NOT NULL DEFAULT FALSE,
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS daily_entries (
            id TEXT PRIMARY KEY DEFAULT gen_random_uuid()::text,
            user_id TEXT NOT NULL,
            date DATE NOT NULL,
            study_time INTEGER NOT NULL DEFAULT 0
                CHECK (study_time BETWEEN 0 AND 1440),
            mood SMALLINT NOT NULL DEFAULT 3 CHECK (mood BETWEEN 1 AND 5),
            notes TEXT NOT NULL DEFAULT '',
            created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
            updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
        )
        "#,
    )
    .execute(pool)
    .await?;

    // One entry per tenant per calendar date; the upsert conflict target.
    sqlx::query(
        "CREATE UNIQUE INDEX IF NOT EXISTS idx_entries_user_date
         ON daily_entries (user_id, date)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_courses_user_title ON courses (user_id, title)",
    )
    .execute(pool)
    .await?;

    sqlx::query(
        "CREATE INDEX IF NOT EXISTS idx_notes_user_created
         ON notes (user_id, created_at DESC)",
    )
    .execute(pool)
    .await?;

    sqlx::query("CREATE INDEX IF NOT EXISTS idx_notes_course ON notes (course_id)")
        .execute(pool)
        .await?;

    // Change push: statement-level triggers notify the table name so
    // listeners can re-fetch the affected entity kind.
    sqlx::query(&format!(
        r#"
        CREATE OR REPLACE FUNCTION studykeep_notify_change() RETURNS trigger AS $$
        BEGIN
            PERFORM pg_notify('{CHANGE_CHANNEL}', TG_TABLE_NAME);
            RETURN NULL;
        END;
        $$ LANGUAGE plpgsql
        "#
    ))
    .execute(pool)
    .await?;

    for table in ["courses", "notes", "daily_entries"] {
        sqlx::query(&format!(
            "DROP TRIGGER IF EXISTS {table}_notify_change ON {table}"
        ))
        .execute(pool)
        .await?;
        sqlx::query(&format!(
            "CREATE TRIGGER {table}_notify_change
             AFTER INSERT OR UPDATE OR DELETE ON {table}
             FOR EACH STATEMENT EXECUTE FUNCTION studykeep_notify_change()"
        ))
        .execute(pool)
        .await?;
    }

    tracing::info!("PostgreSQL migrations complete");
    Ok(())
}
