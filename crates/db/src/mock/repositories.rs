use async_trait::async_trait;
use fitcoach_core::models::event::{CalendarEvent, NewCalendarEvent};
use mockall::mock;
use serde_json::Value;
use uuid::Uuid;

use crate::store::{DraftStore, EventQuery, EventStore};

// Mock stores for testing
mock! {
    pub EventStore {}

    #[async_trait]
    impl EventStore for EventStore {
        async fn filter(&self, query: &EventQuery) -> eyre::Result<Vec<CalendarEvent>>;

        async fn get(&self, id: Uuid) -> eyre::Result<Option<CalendarEvent>>;

        async fn create(&self, event: NewCalendarEvent) -> eyre::Result<CalendarEvent>;

        async fn bulk_create(
            &self,
            events: Vec<NewCalendarEvent>,
        ) -> eyre::Result<Vec<CalendarEvent>>;

        async fn update(&self, event: CalendarEvent) -> eyre::Result<CalendarEvent>;

        async fn delete(&self, id: Uuid) -> eyre::Result<bool>;
    }
}

mock! {
    pub DraftStore {}

    #[async_trait]
    impl DraftStore for DraftStore {
        async fn load(&self, key: &str) -> eyre::Result<Option<Value>>;

        async fn save(&self, key: &str, value: Value) -> eyre::Result<()>;

        async fn remove(&self, key: &str) -> eyre::Result<bool>;
    }
}
