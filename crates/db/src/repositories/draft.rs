use crate::{models::DbDraft, store::DraftStore};
use async_trait::async_trait;
use chrono::Utc;
use eyre::Result;
use serde_json::Value;
use sqlx::{Pool, Postgres};

pub async fn load_draft(pool: &Pool<Postgres>, key: &str) -> Result<Option<DbDraft>> {
    let draft = sqlx::query_as::<_, DbDraft>(
        r#"
        SELECT key, value, updated_at
        FROM drafts
        WHERE key = $1
        "#,
    )
    .bind(key)
    .fetch_optional(pool)
    .await?;

    Ok(draft)
}

pub async fn upsert_draft(pool: &Pool<Postgres>, key: &str, value: &Value) -> Result<()> {
    tracing::debug!("Saving draft: key={}", key);

    sqlx::query(
        r#"
        INSERT INTO drafts (key, value, updated_at)
        VALUES ($1, $2, $3)
        ON CONFLICT (key) DO UPDATE
        SET value = EXCLUDED.value, updated_at = EXCLUDED.updated_at
        "#,
    )
    .bind(key)
    .bind(value)
    .bind(Utc::now())
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn delete_draft(pool: &Pool<Postgres>, key: &str) -> Result<bool> {
    let result = sqlx::query("DELETE FROM drafts WHERE key = $1")
        .bind(key)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

#[derive(Debug, Clone)]
pub struct PgDraftStore {
    pool: Pool<Postgres>,
}

impl PgDraftStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DraftStore for PgDraftStore {
    async fn load(&self, key: &str) -> Result<Option<Value>> {
        Ok(load_draft(&self.pool, key).await?.map(|draft| draft.value))
    }

    async fn save(&self, key: &str, value: Value) -> Result<()> {
        upsert_draft(&self.pool, key, &value).await
    }

    async fn remove(&self, key: &str) -> Result<bool> {
        delete_draft(&self.pool, key).await
    }
}
