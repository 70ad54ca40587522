use crate::{
    models::DbCalendarEvent,
    store::{EventQuery, EventStore, SortOrder},
};
use async_trait::async_trait;
use chrono::Utc;
use eyre::{Result, WrapErr};
use fitcoach_core::models::event::{CalendarEvent, NewCalendarEvent};
use sqlx::{Executor, Pool, Postgres, QueryBuilder};
use uuid::Uuid;

const EVENT_COLUMNS: &str = "id, title, description, start_time, end_time, coach_id, client_id, \
     event_type, check_in_id, is_recurring, recurrence_pattern, recurrence_interval, created_at";

async fn insert_event<'e, E>(executor: E, event: &NewCalendarEvent) -> Result<DbCalendarEvent>
where
    E: Executor<'e, Database = Postgres>,
{
    let id = Uuid::new_v4();
    let now = Utc::now();
    let recurrence_interval = event
        .recurrence_interval
        .map(i32::try_from)
        .transpose()
        .wrap_err("Recurrence interval does not fit the recurrence_interval column")?;

    let row = sqlx::query_as::<_, DbCalendarEvent>(
        r#"
        INSERT INTO calendar_events (
            id, title, description, start_time, end_time, coach_id, client_id,
            event_type, check_in_id, is_recurring, recurrence_pattern, recurrence_interval,
            created_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
        RETURNING id, title, description, start_time, end_time, coach_id, client_id,
            event_type, check_in_id, is_recurring, recurrence_pattern, recurrence_interval,
            created_at
        "#,
    )
    .bind(id)
    .bind(&event.title)
    .bind(&event.description)
    .bind(event.start_time)
    .bind(event.end_time)
    .bind(event.coach_id)
    .bind(event.client_id)
    .bind(event.event_type.as_str())
    .bind(event.check_in_id)
    .bind(event.is_recurring)
    .bind(event.recurrence_pattern.map(|pattern| pattern.as_str()))
    .bind(recurrence_interval)
    .bind(now)
    .fetch_one(executor)
    .await?;

    Ok(row)
}

pub async fn create_event(pool: &Pool<Postgres>, event: &NewCalendarEvent) -> Result<CalendarEvent> {
    tracing::debug!(
        "Creating calendar event: coach_id={}, title={}, start={}",
        event.coach_id, event.title, event.start_time
    );
    let row = insert_event(pool, event).await?;
    CalendarEvent::try_from(row)
}

pub async fn bulk_create_events(
    pool: &Pool<Postgres>,
    events: &[NewCalendarEvent],
) -> Result<Vec<CalendarEvent>> {
    tracing::debug!("Creating {} calendar events in one transaction", events.len());

    let mut tx = pool.begin().await?;
    let mut rows = Vec::with_capacity(events.len());
    for event in events {
        rows.push(insert_event(&mut *tx, event).await?);
    }
    tx.commit().await?;

    rows.into_iter().map(CalendarEvent::try_from).collect()
}

pub async fn get_event_by_id(pool: &Pool<Postgres>, id: Uuid) -> Result<Option<CalendarEvent>> {
    tracing::debug!("Getting calendar event by id: {}", id);

    let row = sqlx::query_as::<_, DbCalendarEvent>(&format!(
        "SELECT {} FROM calendar_events WHERE id = $1",
        EVENT_COLUMNS
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;

    row.map(CalendarEvent::try_from).transpose()
}

pub async fn filter_events(pool: &Pool<Postgres>, query: &EventQuery) -> Result<Vec<CalendarEvent>> {
    let mut builder = QueryBuilder::<Postgres>::new(format!(
        "SELECT {} FROM calendar_events WHERE TRUE",
        EVENT_COLUMNS
    ));

    if let Some(coach_id) = query.coach_id {
        builder.push(" AND coach_id = ").push_bind(coach_id);
    }
    if let Some(client_id) = query.client_id {
        builder.push(" AND client_id = ").push_bind(client_id);
    }
    if let Some(from) = query.starts_at_or_after {
        builder.push(" AND start_time >= ").push_bind(from);
    }
    if let Some(to) = query.starts_before {
        builder.push(" AND start_time < ").push_bind(to);
    }
    builder.push(match query.sort {
        SortOrder::StartAscending => " ORDER BY start_time ASC, id ASC",
        SortOrder::StartDescending => " ORDER BY start_time DESC, id ASC",
    });
    if let Some(limit) = query.limit {
        builder.push(" LIMIT ").push_bind(limit as i64);
    }

    let rows = builder
        .build_query_as::<DbCalendarEvent>()
        .fetch_all(pool)
        .await?;
    tracing::debug!("Calendar event filter matched {} rows", rows.len());

    rows.into_iter().map(CalendarEvent::try_from).collect()
}

pub async fn update_event(pool: &Pool<Postgres>, event: &CalendarEvent) -> Result<CalendarEvent> {
    tracing::debug!("Updating calendar event: id={}", event.id);

    let row = sqlx::query_as::<_, DbCalendarEvent>(&format!(
        r#"
        UPDATE calendar_events
        SET title = $2, description = $3, start_time = $4, end_time = $5,
            client_id = $6, event_type = $7, check_in_id = $8
        WHERE id = $1
        RETURNING {}
        "#,
        EVENT_COLUMNS
    ))
    .bind(event.id)
    .bind(&event.title)
    .bind(&event.description)
    .bind(event.start_time)
    .bind(event.end_time)
    .bind(event.client_id)
    .bind(event.event_type.as_str())
    .bind(event.check_in_id)
    .fetch_one(pool)
    .await?;

    CalendarEvent::try_from(row)
}

pub async fn delete_event(pool: &Pool<Postgres>, id: Uuid) -> Result<bool> {
    tracing::debug!("Deleting calendar event: id={}", id);

    let result = sqlx::query(
        r#"
        DELETE FROM calendar_events
        WHERE id = $1
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// [`EventStore`] backed by the `calendar_events` table.
#[derive(Debug, Clone)]
pub struct PgEventStore {
    pool: Pool<Postgres>,
}

impl PgEventStore {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventStore for PgEventStore {
    async fn filter(&self, query: &EventQuery) -> Result<Vec<CalendarEvent>> {
        filter_events(&self.pool, query).await
    }

    async fn get(&self, id: Uuid) -> Result<Option<CalendarEvent>> {
        get_event_by_id(&self.pool, id).await
    }

    async fn create(&self, event: NewCalendarEvent) -> Result<CalendarEvent> {
        create_event(&self.pool, &event).await
    }

    async fn bulk_create(&self, events: Vec<NewCalendarEvent>) -> Result<Vec<CalendarEvent>> {
        bulk_create_events(&self.pool, &events).await
    }

    async fn update(&self, event: CalendarEvent) -> Result<CalendarEvent> {
        update_event(&self.pool, &event).await
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        delete_event(&self.pool, id).await
    }
}
