use eyre::Result;
use sqlx::{Pool, Postgres};
use tracing::info;

pub async fn initialize_database(pool: &Pool<Postgres>) -> Result<()> {
    info!("Initializing database schema...");

    // Create calendar_events table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS calendar_events (
            id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
            title VARCHAR(255) NOT NULL,
            description TEXT NULL,
            start_time TIMESTAMP WITH TIME ZONE NOT NULL,
            end_time TIMESTAMP WITH TIME ZONE NOT NULL,
            coach_id UUID NOT NULL,
            client_id UUID NULL,
            event_type VARCHAR(32) NOT NULL,
            check_in_id UUID NULL,
            is_recurring BOOLEAN NOT NULL DEFAULT FALSE,
            recurrence_pattern VARCHAR(16) NULL,
            recurrence_interval INTEGER NULL,
            created_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW(),
            CONSTRAINT valid_event_range CHECK (end_time > start_time),
            CONSTRAINT positive_recurrence_interval CHECK (
                recurrence_interval IS NULL OR recurrence_interval > 0
            )
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create drafts table
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS drafts (
            key VARCHAR(255) PRIMARY KEY,
            value JSONB NOT NULL,
            updated_at TIMESTAMP WITH TIME ZONE NOT NULL DEFAULT NOW()
        );
        "#,
    )
    .execute(pool)
    .await?;

    // Create indexes
    for statement in [
        "CREATE INDEX IF NOT EXISTS idx_calendar_events_coach_start ON calendar_events(coach_id, start_time)",
        "CREATE INDEX IF NOT EXISTS idx_calendar_events_client_id ON calendar_events(client_id)",
    ] {
        sqlx::query(statement).execute(pool).await?;
    }

    info!("Database schema initialized successfully.");
    Ok(())
}
