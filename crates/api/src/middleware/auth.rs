//! # Session Extraction
//!
//! The hosted auth provider in front of this service resolves the signed-in
//! user and forwards it as request headers. [`Session`] turns those headers
//! into a [`SessionContext`] for each request; handlers receive it as an
//! extractor argument instead of reading a global "current user".

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, HeaderMap},
};
use chrono_tz::Tz;
use fitcoach_core::{
    errors::{CoachError, CoachResult},
    models::session::{SessionContext, UserRole},
};
use uuid::Uuid;

use crate::{middleware::error_handling::AppError, ApiState};

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";
pub const TIMEZONE_HEADER: &str = "x-timezone";

/// Extractor carrying the caller's [`SessionContext`].
#[derive(Debug, Clone)]
pub struct Session(pub SessionContext);

fn header<'a>(headers: &'a HeaderMap, name: &str) -> CoachResult<Option<&'a str>> {
    headers
        .get(name)
        .map(|value| {
            value
                .to_str()
                .map_err(|_| CoachError::Validation(format!("Header {} is not valid text", name)))
        })
        .transpose()
}

/// Builds a session from identity headers.
///
/// A missing or malformed identity is an authentication failure; an unknown
/// time zone is a validation failure.
pub fn session_from_headers(headers: &HeaderMap, default_timezone: Tz) -> CoachResult<SessionContext> {
    let user_id = header(headers, USER_ID_HEADER)?
        .ok_or_else(|| CoachError::Authentication("Missing user identity".to_string()))?;
    let user_id = Uuid::parse_str(user_id)
        .map_err(|_| CoachError::Authentication("Malformed user identity".to_string()))?;

    let role = header(headers, USER_ROLE_HEADER)?
        .ok_or_else(|| CoachError::Authentication("Missing user role".to_string()))?
        .parse::<UserRole>()?;

    let timezone = match header(headers, TIMEZONE_HEADER)? {
        Some(raw) => parse_timezone(raw)?,
        None => default_timezone,
    };

    Ok(SessionContext::new(user_id, role, timezone))
}

pub fn parse_timezone(raw: &str) -> CoachResult<Tz> {
    raw.parse::<Tz>()
        .map_err(|e| CoachError::Validation(format!("Unknown time zone {}: {}", raw, e)))
}

#[async_trait]
impl FromRequestParts<Arc<ApiState>> for Session {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<ApiState>,
    ) -> Result<Self, Self::Rejection> {
        let session = session_from_headers(&parts.headers, state.scheduling.default_timezone)?;
        tracing::debug!(
            "Session resolved: user_id={}, role={}, timezone={}",
            session.user_id, session.role, session.timezone.name()
        );
        Ok(Session(session))
    }
}
