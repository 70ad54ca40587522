//! # FitCoach API
//!
//! The API crate provides the web server for the FitCoach coaching service.
//! It exposes the coach calendar (layout view, event management, recurring
//! series creation) and workout draft autosave.
//!
//! ## Architecture
//!
//! - **Routes**: Define API endpoints and URL structure
//! - **Handlers**: Implement request processing logic
//! - **Middleware**: Session extraction and error mapping
//! - **Config**: Environment and scheduling configuration
//!
//! Handlers reach persistence only through the `fitcoach-db` store traits, so
//! the same router runs against PostgreSQL or the in-memory stores.

/// Configuration module for API settings
pub mod config;
/// Request handlers that implement business logic
pub mod handlers;
/// Middleware for sessions and error handling
pub mod middleware;
/// Route definitions and API endpoint structure
pub mod routes;

use std::sync::Arc;

use axum::Router;
use eyre::Result;
use fitcoach_db::{DraftStore, EventStore};
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use crate::config::SchedulingConfig;

/// Shared application state that is accessible to all request handlers
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use fitcoach_api::{app, config::SchedulingConfig, ApiState};
/// use fitcoach_db::{InMemoryDraftStore, InMemoryEventStore};
///
/// let state = ApiState {
///     events: Arc::new(InMemoryEventStore::new()),
///     drafts: Arc::new(InMemoryDraftStore::new()),
///     scheduling: SchedulingConfig::default(),
/// };
/// let router = app(Arc::new(state));
/// ```
pub struct ApiState {
    /// Calendar event persistence
    pub events: Arc<dyn EventStore>,
    /// Draft autosave persistence
    pub drafts: Arc<dyn DraftStore>,
    /// Recurrence and duplicate-suppression settings
    pub scheduling: SchedulingConfig,
}

/// Builds the application router with all routes attached to `state`.
pub fn app(state: Arc<ApiState>) -> Router {
    Router::new()
        // Health check endpoints
        .merge(routes::health::routes())
        // Calendar endpoints
        .merge(routes::calendar::routes())
        // Draft autosave endpoints
        .merge(routes::drafts::routes())
        // Attach shared state to all routes
        .with_state(state)
}

/// Installs the global tracing subscriber at `level`.
pub fn init_tracing(level: tracing::Level) -> Result<()> {
    let subscriber = FmtSubscriber::builder().with_max_level(level).finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

/// Starts the API server with the provided configuration and state
///
/// Applies CORS, timeout and request tracing layers, and serves until the
/// listener fails. Call [`init_tracing`] first to see its logs.
pub async fn start_server(config: config::ApiConfig, state: ApiState) -> Result<()> {
    let app = app(Arc::new(state));

    // Apply CORS configuration if origins are specified
    let app = if let Some(origins) = &config.cors_origins {
        let origins = origins
            .iter()
            .map(|origin| origin.parse())
            .collect::<Result<Vec<axum::http::HeaderValue>, _>>()?;

        let cors = tower_http::cors::CorsLayer::new()
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PUT,
                axum::http::Method::DELETE,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers([
                axum::http::header::CONTENT_TYPE,
                axum::http::header::AUTHORIZATION,
                axum::http::header::ACCEPT,
                axum::http::HeaderName::from_static(middleware::auth::USER_ID_HEADER),
                axum::http::HeaderName::from_static(middleware::auth::USER_ROLE_HEADER),
                axum::http::HeaderName::from_static(middleware::auth::TIMEZONE_HEADER),
            ])
            .allow_origin(origins)
            .allow_credentials(true);

        app.layer(cors)
    } else {
        app
    };

    // Add request timeout and request tracing middleware
    let app = app
        .layer(tower_http::timeout::TimeoutLayer::new(
            std::time::Duration::from_secs(config.request_timeout),
        ))
        .layer(tower_http::trace::TraceLayer::new_for_http());

    // Start the HTTP server
    let addr = config.server_addr();
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on http://{}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}
