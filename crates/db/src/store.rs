use async_trait::async_trait;
use chrono::{DateTime, Utc};
use eyre::Result;
use fitcoach_core::models::event::{CalendarEvent, NewCalendarEvent};
use serde_json::Value;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    StartAscending,
    StartDescending,
}

/// Filter for [`EventStore::filter`]. Unset fields match everything.
///
/// The start window is half-open: `starts_at_or_after <= start < starts_before`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventQuery {
    pub coach_id: Option<Uuid>,
    pub client_id: Option<Uuid>,
    pub starts_at_or_after: Option<DateTime<Utc>>,
    pub starts_before: Option<DateTime<Utc>>,
    pub sort: SortOrder,
    pub limit: Option<usize>,
}

impl EventQuery {
    pub fn for_coach(coach_id: Uuid) -> Self {
        Self {
            coach_id: Some(coach_id),
            ..Default::default()
        }
    }

    pub fn for_client(client_id: Uuid) -> Self {
        Self {
            client_id: Some(client_id),
            ..Default::default()
        }
    }

    pub fn between(mut self, from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        self.starts_at_or_after = Some(from);
        self.starts_before = Some(to);
        self
    }

    pub fn sorted(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn matches(&self, event: &CalendarEvent) -> bool {
        self.coach_id.is_none_or(|id| event.coach_id == id)
            && self.client_id.is_none_or(|id| event.client_id == Some(id))
            && self.starts_at_or_after.is_none_or(|from| event.start_time >= from)
            && self.starts_before.is_none_or(|to| event.start_time < to)
    }
}

/// CRUD over persisted calendar events.
///
/// No call spans more than one logical write except `bulk_create`, which
/// either stores every event or none of them.
#[async_trait]
pub trait EventStore: Send + Sync {
    async fn filter(&self, query: &EventQuery) -> Result<Vec<CalendarEvent>>;

    async fn get(&self, id: Uuid) -> Result<Option<CalendarEvent>>;

    async fn create(&self, event: NewCalendarEvent) -> Result<CalendarEvent>;

    async fn bulk_create(&self, events: Vec<NewCalendarEvent>) -> Result<Vec<CalendarEvent>>;

    /// Overwrites the stored row with `event`.
    async fn update(&self, event: CalendarEvent) -> Result<CalendarEvent>;

    /// Returns whether a row was removed.
    async fn delete(&self, id: Uuid) -> Result<bool>;
}

/// Key-value persistence for autosaved drafts.
#[async_trait]
pub trait DraftStore: Send + Sync {
    async fn load(&self, key: &str) -> Result<Option<Value>>;

    async fn save(&self, key: &str, value: Value) -> Result<()>;

    /// Returns whether a draft was removed.
    async fn remove(&self, key: &str) -> Result<bool>;
}
