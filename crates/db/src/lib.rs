//! # FitCoach Persistence
//!
//! Entity-store seams for the coaching service. Handlers talk to the
//! [`store::EventStore`] and [`store::DraftStore`] traits; this crate ships a
//! PostgreSQL implementation, an in-memory one for tests and local runs, and
//! mockall mocks.

pub mod memory;
pub mod models;
pub mod repositories;
pub mod schema;
pub mod store;

pub mod mock;

use eyre::Result;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};

pub use memory::{InMemoryDraftStore, InMemoryEventStore};
pub use repositories::{calendar_event::PgEventStore, draft::PgDraftStore};
pub use store::{DraftStore, EventQuery, EventStore, SortOrder};

pub type DbPool = Pool<Postgres>;

pub async fn create_pool(database_url: &str) -> Result<DbPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(pool)
}
