//! # Calendar Handlers
//!
//! Layout view, event CRUD and recurring-event creation.
//!
//! ## Recurring creation
//!
//! 1. Validate the template and the recurrence rule
//! 2. Refuse series above the confirmation threshold unless `confirm` is set
//! 3. Expand the template in the caller's time zone
//! 4. Load the coach's events around the expansion window and drop
//!    candidates that duplicate one of them
//! 5. Store the survivors in one `bulk_create` call
//!
//! Steps 4 and 5 are not atomic; two concurrent submissions of the same
//! series can both get through.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Duration, Utc};
use fitcoach_core::{
    calendar::{duplicates::suppress_duplicates, layout_days, recurrence::expand},
    errors::CoachError,
    models::{
        event::{
            CalendarEvent, CreateEventRequest, CreateEventResponse, DeleteEventResponse,
            NewCalendarEvent, UpdateCalendarEvent,
        },
        layout::LayoutResponse,
        session::{SessionContext, UserRole},
    },
};
use fitcoach_db::EventQuery;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    middleware::{
        auth::{parse_timezone, Session},
        error_handling::AppError,
    },
    ApiState,
};

/// Longest window the layout endpoint will load at once.
const MAX_LAYOUT_WINDOW_DAYS: i64 = 62;

/// Query parameters for the layout endpoint
#[derive(Debug, Deserialize)]
pub struct LayoutQuery {
    /// Inclusive window start
    pub from: DateTime<Utc>,
    /// Exclusive window end
    pub to: DateTime<Utc>,
    /// IANA zone overriding the session zone for day grouping
    pub tz: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub limit: Option<usize>,
}

/// Events the session may see: a coach's own events, or a client's events.
fn visible_events(session: &SessionContext) -> EventQuery {
    match session.role {
        UserRole::Coach => EventQuery::for_coach(session.user_id),
        UserRole::Client => EventQuery::for_client(session.user_id),
    }
}

async fn load_visible_event(
    state: &ApiState,
    session: &SessionContext,
    id: Uuid,
) -> Result<CalendarEvent, AppError> {
    let event = state
        .events
        .get(id)
        .await
        .map_err(CoachError::Database)?
        .ok_or_else(|| CoachError::NotFound(format!("Calendar event with ID {} not found", id)))?;

    if !session.can_view(&event) {
        return Err(AppError(CoachError::Authorization(format!(
            "Calendar event {} is not visible to this user",
            id
        ))));
    }
    Ok(event)
}

/// Lays out the caller's events in `[from, to)` per local day.
///
/// # Endpoint
///
/// ```text
/// GET /api/calendar/layout?from=2024-03-04T00:00:00Z&to=2024-03-11T00:00:00Z&tz=Europe/Berlin
/// ```
#[axum::debug_handler]
pub async fn get_layout(
    State(state): State<Arc<ApiState>>,
    Session(session): Session,
    Query(query): Query<LayoutQuery>,
) -> Result<Json<LayoutResponse>, AppError> {
    if query.to <= query.from {
        return Err(AppError(CoachError::Validation(
            "Layout window end must be after its start".to_string(),
        )));
    }
    if query.to - query.from > Duration::days(MAX_LAYOUT_WINDOW_DAYS) {
        return Err(AppError(CoachError::Validation(format!(
            "Layout window cannot exceed {} days",
            MAX_LAYOUT_WINDOW_DAYS
        ))));
    }

    let timezone = match &query.tz {
        Some(raw) => parse_timezone(raw)?,
        None => session.timezone,
    };

    let events = state
        .events
        .filter(&visible_events(&session).between(query.from, query.to))
        .await
        .map_err(CoachError::Database)?;

    let response = LayoutResponse {
        timezone: timezone.name().to_string(),
        days: layout_days(&events, &timezone),
    };

    Ok(Json(response))
}

#[axum::debug_handler]
pub async fn list_events(
    State(state): State<Arc<ApiState>>,
    Session(session): Session,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<CalendarEvent>>, AppError> {
    let mut filter = visible_events(&session);
    filter.starts_at_or_after = query.from;
    filter.starts_before = query.to;
    filter.limit = query.limit;

    let events = state.events.filter(&filter).await.map_err(CoachError::Database)?;

    Ok(Json(events))
}

/// Creates a single event or a recurring series, skipping duplicates.
#[axum::debug_handler]
pub async fn create_event(
    State(state): State<Arc<ApiState>>,
    Session(session): Session,
    Json(payload): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<CreateEventResponse>), AppError> {
    let coach_id = session.require_coach()?;
    let template = payload.template(coach_id);
    template.validate()?;

    let candidates = match &payload.recurrence {
        Some(rule) => {
            rule.validate()?;
            let ceiling = state.scheduling.max_recurrence_count;
            if rule.count > ceiling {
                return Err(AppError(CoachError::Validation(format!(
                    "A series may have at most {} occurrences, got {}",
                    ceiling, rule.count
                ))));
            }
            let threshold = state.scheduling.recurrence_confirm_threshold;
            if rule.requires_confirmation(threshold) && !payload.confirm {
                return Err(AppError(CoachError::ConfirmationRequired(format!(
                    "Creating {} occurrences exceeds the limit of {}; resend with confirm set",
                    rule.count, threshold
                ))));
            }
            expand(&template, rule, &session.timezone)?
        }
        None => vec![template],
    };

    let existing = load_neighbours(&state, coach_id, &candidates).await?;
    let report = suppress_duplicates(candidates, &existing, state.scheduling.duplicate_tolerance);

    if !report.skipped.is_empty() {
        warn!(
            "Skipping {} duplicate occurrence(s) of '{}' for coach {}",
            report.skipped.len(),
            payload.title,
            coach_id
        );
    }

    let created = if report.accepted.is_empty() {
        Vec::new()
    } else {
        state
            .events
            .bulk_create(report.accepted)
            .await
            .map_err(CoachError::Database)?
    };
    info!("Created {} calendar event(s) for coach {}", created.len(), coach_id);

    let response = CreateEventResponse {
        created,
        skipped_duplicates: report.skipped.len(),
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// Persisted events of `coach_id` that could collide with any candidate.
async fn load_neighbours(
    state: &ApiState,
    coach_id: Uuid,
    candidates: &[NewCalendarEvent],
) -> Result<Vec<CalendarEvent>, AppError> {
    let (Some(first), Some(last)) = (
        candidates.iter().map(|c| c.start_time).min(),
        candidates.iter().map(|c| c.start_time).max(),
    ) else {
        return Ok(Vec::new());
    };

    let tolerance = state.scheduling.duplicate_tolerance;
    let query = EventQuery::for_coach(coach_id).between(
        first - tolerance,
        last + tolerance + Duration::seconds(1),
    );

    Ok(state.events.filter(&query).await.map_err(CoachError::Database)?)
}

#[axum::debug_handler]
pub async fn get_event(
    State(state): State<Arc<ApiState>>,
    Session(session): Session,
    Path(id): Path<Uuid>,
) -> Result<Json<CalendarEvent>, AppError> {
    let event = load_visible_event(&state, &session, id).await?;

    Ok(Json(event))
}

#[axum::debug_handler]
pub async fn update_event(
    State(state): State<Arc<ApiState>>,
    Session(session): Session,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateCalendarEvent>,
) -> Result<Json<CalendarEvent>, AppError> {
    let current = load_visible_event(&state, &session, id).await?;
    session.ensure_owns(&current)?;

    let updated = payload.apply_to(&current)?;
    let stored = state
        .events
        .update(updated)
        .await
        .map_err(CoachError::Database)?;

    Ok(Json(stored))
}

#[axum::debug_handler]
pub async fn delete_event(
    State(state): State<Arc<ApiState>>,
    Session(session): Session,
    Path(id): Path<Uuid>,
) -> Result<Json<DeleteEventResponse>, AppError> {
    let current = load_visible_event(&state, &session, id).await?;
    session.ensure_owns(&current)?;

    let removed = state.events.delete(id).await.map_err(CoachError::Database)?;
    if !removed {
        return Err(AppError(CoachError::NotFound(format!(
            "Calendar event with ID {} not found",
            id
        ))));
    }

    let response = DeleteEventResponse {
        id,
        deleted_at: Utc::now(),
    };

    Ok(Json(response))
}
