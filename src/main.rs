use std::sync::Arc;

use color_eyre::eyre::Result;
use dotenv::dotenv;
use fitcoach_api::{config::ApiConfig, ApiState};
use fitcoach_db::{
    create_pool, schema::initialize_database, InMemoryDraftStore, InMemoryEventStore,
    PgDraftStore, PgEventStore,
};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Load environment variables
    dotenv().ok();

    // Load configuration
    let config = ApiConfig::from_env()?;

    // Initialize tracing for logging
    fitcoach_api::init_tracing(config.log_level)?;

    let state = match &config.database_url {
        Some(database_url) => {
            info!("Connecting to database...");
            let db_pool = create_pool(database_url).await?;

            // Initialize database schema
            initialize_database(&db_pool).await?;

            ApiState {
                events: Arc::new(PgEventStore::new(db_pool.clone())),
                drafts: Arc::new(PgDraftStore::new(db_pool)),
                scheduling: config.scheduling,
            }
        }
        None => {
            warn!("DATABASE_URL not set; using in-memory stores, data will not persist");
            ApiState {
                events: Arc::new(InMemoryEventStore::new()),
                drafts: Arc::new(InMemoryDraftStore::new()),
                scheduling: config.scheduling,
            }
        }
    };

    // Start API server
    fitcoach_api::start_server(config, state).await?;

    Ok(())
}
