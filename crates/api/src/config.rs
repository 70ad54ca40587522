//! # API Configuration Module
//!
//! This module handles loading and managing configuration for the FitCoach API server.
//! It retrieves configuration values from environment variables and provides defaults
//! where appropriate.
//!
//! ## Environment Variables
//!
//! - `API_HOST`: The host address to bind the server to (default: "0.0.0.0")
//! - `API_PORT`: The port to listen on (default: 3000)
//! - `DATABASE_URL`: PostgreSQL connection string; in-memory stores are used when unset
//! - `LOG_LEVEL`: Logging level (default: "info")
//! - `API_CORS_ORIGINS`: Comma-separated list of allowed CORS origins
//! - `API_REQUEST_TIMEOUT_SECONDS`: Request timeout (default: 30)
//! - `DUPLICATE_TOLERANCE_SECONDS`: Start-time window for duplicate events (default: 60)
//! - `RECURRENCE_CONFIRM_THRESHOLD`: Occurrence count above which creation
//!   must be confirmed (default: 52)
//! - `MAX_RECURRENCE_COUNT`: Largest series accepted even when confirmed (default: 730)
//! - `DEFAULT_TIMEZONE`: IANA zone used when a request carries none (default: "UTC")

use chrono::Duration;
use chrono_tz::Tz;
use eyre::{eyre, Result, WrapErr};
use fitcoach_core::calendar::duplicates::DEFAULT_DUPLICATE_TOLERANCE_SECONDS;
use std::env;
use tracing::Level;

/// Default occurrence count above which a recurring series needs confirmation.
pub const DEFAULT_RECURRENCE_CONFIRM_THRESHOLD: u32 = 52;

/// Default ceiling on occurrences in one series, two years of daily sessions.
pub const DEFAULT_MAX_RECURRENCE_COUNT: u32 = 730;

/// Tunables for recurring-event creation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchedulingConfig {
    /// Two events with the same title and coach starting closer than this are duplicates
    pub duplicate_tolerance: Duration,

    /// Series longer than this must be created with `confirm: true`
    pub recurrence_confirm_threshold: u32,

    /// Series longer than this are rejected outright
    pub max_recurrence_count: u32,

    /// Zone for day grouping and recurrence when the session names none
    pub default_timezone: Tz,
}

impl Default for SchedulingConfig {
    fn default() -> Self {
        Self {
            duplicate_tolerance: Duration::seconds(DEFAULT_DUPLICATE_TOLERANCE_SECONDS),
            recurrence_confirm_threshold: DEFAULT_RECURRENCE_CONFIRM_THRESHOLD,
            max_recurrence_count: DEFAULT_MAX_RECURRENCE_COUNT,
            default_timezone: chrono_tz::UTC,
        }
    }
}

impl SchedulingConfig {
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let duplicate_tolerance = match env::var("DUPLICATE_TOLERANCE_SECONDS") {
            Ok(raw) => Duration::seconds(
                raw.parse::<i64>()
                    .wrap_err("Invalid DUPLICATE_TOLERANCE_SECONDS value")?,
            ),
            Err(_) => defaults.duplicate_tolerance,
        };

        let recurrence_confirm_threshold = match env::var("RECURRENCE_CONFIRM_THRESHOLD") {
            Ok(raw) => raw
                .parse()
                .wrap_err("Invalid RECURRENCE_CONFIRM_THRESHOLD value")?,
            Err(_) => defaults.recurrence_confirm_threshold,
        };

        let max_recurrence_count = match env::var("MAX_RECURRENCE_COUNT") {
            Ok(raw) => raw.parse().wrap_err("Invalid MAX_RECURRENCE_COUNT value")?,
            Err(_) => defaults.max_recurrence_count,
        };

        let default_timezone = match env::var("DEFAULT_TIMEZONE") {
            Ok(raw) => raw
                .parse::<Tz>()
                .map_err(|e| eyre!("Invalid DEFAULT_TIMEZONE value {}: {}", raw, e))?,
            Err(_) => defaults.default_timezone,
        };

        Ok(Self {
            duplicate_tolerance,
            recurrence_confirm_threshold,
            max_recurrence_count,
            default_timezone,
        })
    }
}

/// Configuration for the FitCoach API server
///
/// # Example
///
/// ```
/// use eyre::Result;
/// use fitcoach_api::config::ApiConfig;
///
/// fn example() -> Result<()> {
///     let config = ApiConfig::from_env()?;
///     println!("Starting server on {}:{}", config.host, config.port);
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Host address for the API server (e.g., "127.0.0.1", "0.0.0.0")
    pub host: String,

    /// Port for the API server to listen on
    pub port: u16,

    /// PostgreSQL database connection string
    pub database_url: Option<String>,

    /// Log level for the application
    pub log_level: Level,

    /// CORS allowed origins (optional)
    pub cors_origins: Option<Vec<String>>,

    /// Request timeout in seconds
    pub request_timeout: u64,

    pub scheduling: SchedulingConfig,
}

impl ApiConfig {
    /// Creates a new ApiConfig from environment variables
    ///
    /// # Errors
    ///
    /// This function will return an error if:
    /// - The API_PORT value cannot be parsed as a u16
    /// - A scheduling variable is set but malformed
    pub fn from_env() -> Result<Self> {
        // Network settings
        let host = env::var("API_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());
        let port = env::var("API_PORT")
            .unwrap_or_else(|_| "3000".to_string())
            .parse()
            .wrap_err("Invalid API_PORT value")?;

        // Database settings
        let database_url = env::var("DATABASE_URL").ok().filter(|url| !url.is_empty());

        // Logging settings
        let log_level = parse_log_level(&env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()));

        // CORS settings
        let cors_origins = env::var("API_CORS_ORIGINS").ok().map(|origins| {
            origins.split(',').map(|s| s.trim().to_string()).collect()
        });

        // Performance settings
        let request_timeout = env::var("API_REQUEST_TIMEOUT_SECONDS")
            .unwrap_or_else(|_| "30".to_string())
            .parse()
            .unwrap_or(30);

        Ok(Self {
            host,
            port,
            database_url,
            log_level,
            cors_origins,
            request_timeout,
            scheduling: SchedulingConfig::from_env()?,
        })
    }

    /// Returns the server address as a string (e.g., "127.0.0.1:8080")
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Maps a level name to a tracing level; unknown names fall back to INFO.
pub fn parse_log_level(raw: &str) -> Level {
    match raw.to_ascii_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    }
}
