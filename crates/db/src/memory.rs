//! In-process stores with the same semantics as the PostgreSQL ones.
//!
//! Used by tests and by the server when no `DATABASE_URL` is configured.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use eyre::{eyre, Result};
use fitcoach_core::models::event::{CalendarEvent, NewCalendarEvent};
use serde_json::Value;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::store::{DraftStore, EventQuery, EventStore, SortOrder};

#[derive(Debug, Default)]
pub struct InMemoryEventStore {
    events: RwLock<HashMap<Uuid, CalendarEvent>>,
}

impl InMemoryEventStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_events(events: impl IntoIterator<Item = CalendarEvent>) -> Self {
        Self {
            events: RwLock::new(events.into_iter().map(|event| (event.id, event)).collect()),
        }
    }

    pub async fn len(&self) -> usize {
        self.events.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.events.read().await.is_empty()
    }
}

#[async_trait]
impl EventStore for InMemoryEventStore {
    async fn filter(&self, query: &EventQuery) -> Result<Vec<CalendarEvent>> {
        let events = self.events.read().await;
        let mut matched: Vec<CalendarEvent> = events
            .values()
            .filter(|event| query.matches(event))
            .cloned()
            .collect();

        matched.sort_by(|a, b| {
            let by_start = match query.sort {
                SortOrder::StartAscending => a.start_time.cmp(&b.start_time),
                SortOrder::StartDescending => b.start_time.cmp(&a.start_time),
            };
            by_start.then_with(|| a.id.cmp(&b.id))
        });
        if let Some(limit) = query.limit {
            matched.truncate(limit);
        }

        tracing::debug!("In-memory event filter matched {} events", matched.len());
        Ok(matched)
    }

    async fn get(&self, id: Uuid) -> Result<Option<CalendarEvent>> {
        Ok(self.events.read().await.get(&id).cloned())
    }

    async fn create(&self, event: NewCalendarEvent) -> Result<CalendarEvent> {
        let event = event.into_event(Uuid::new_v4(), Utc::now());
        self.events.write().await.insert(event.id, event.clone());
        Ok(event)
    }

    async fn bulk_create(&self, events: Vec<NewCalendarEvent>) -> Result<Vec<CalendarEvent>> {
        let now = Utc::now();
        let created: Vec<CalendarEvent> = events
            .into_iter()
            .map(|event| event.into_event(Uuid::new_v4(), now))
            .collect();

        let mut store = self.events.write().await;
        for event in &created {
            store.insert(event.id, event.clone());
        }
        Ok(created)
    }

    async fn update(&self, event: CalendarEvent) -> Result<CalendarEvent> {
        let mut store = self.events.write().await;
        let slot = store
            .get_mut(&event.id)
            .ok_or_else(|| eyre!("Calendar event {} not found", event.id))?;
        *slot = event.clone();
        Ok(event)
    }

    async fn delete(&self, id: Uuid) -> Result<bool> {
        Ok(self.events.write().await.remove(&id).is_some())
    }
}

#[derive(Debug, Default)]
pub struct InMemoryDraftStore {
    drafts: RwLock<HashMap<String, Value>>,
}

impl InMemoryDraftStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DraftStore for InMemoryDraftStore {
    async fn load(&self, key: &str) -> Result<Option<Value>> {
        Ok(self.drafts.read().await.get(key).cloned())
    }

    async fn save(&self, key: &str, value: Value) -> Result<()> {
        self.drafts.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn remove(&self, key: &str) -> Result<bool> {
        Ok(self.drafts.write().await.remove(key).is_some())
    }
}
