use chrono::{DateTime, Utc};
use fitcoach_core::models::event::{CalendarEvent, EventType, RecurrencePattern};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbCalendarEvent {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub coach_id: Uuid,
    pub client_id: Option<Uuid>,
    pub event_type: String,
    pub check_in_id: Option<Uuid>,
    pub is_recurring: bool,
    pub recurrence_pattern: Option<String>,
    pub recurrence_interval: Option<i32>,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<DbCalendarEvent> for CalendarEvent {
    type Error = eyre::Report;

    fn try_from(row: DbCalendarEvent) -> Result<Self, Self::Error> {
        let recurrence_pattern = row
            .recurrence_pattern
            .as_deref()
            .map(str::parse::<RecurrencePattern>)
            .transpose()?;
        let recurrence_interval = row
            .recurrence_interval
            .map(u32::try_from)
            .transpose()?;

        Ok(CalendarEvent {
            id: row.id,
            title: row.title,
            description: row.description,
            start_time: row.start_time,
            end_time: row.end_time,
            coach_id: row.coach_id,
            client_id: row.client_id,
            event_type: row.event_type.parse::<EventType>()?,
            check_in_id: row.check_in_id,
            is_recurring: row.is_recurring,
            recurrence_pattern,
            recurrence_interval,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct DbDraft {
    pub key: String,
    pub value: Value,
    pub updated_at: DateTime<Utc>,
}
