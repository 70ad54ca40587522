use std::{fmt, str::FromStr};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    calendar::{
        overlap::overlaps,
        recurrence::{RecurrenceRule, MAX_RECURRENCE_INTERVAL},
    },
    errors::{CoachError, CoachResult},
};

/// Shortest event a coach may schedule.
pub const MIN_EVENT_DURATION_MINUTES: i64 = 15;
/// Longest event a coach may schedule.
pub const MAX_EVENT_DURATION_HOURS: i64 = 24;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EventType {
    Session,
    CheckIn,
    Consultation,
    Personal,
    Review,
}

impl EventType {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventType::Session => "session",
            EventType::CheckIn => "check-in",
            EventType::Consultation => "consultation",
            EventType::Personal => "personal",
            EventType::Review => "review",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EventType {
    type Err = CoachError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "session" => Ok(EventType::Session),
            "check-in" => Ok(EventType::CheckIn),
            "consultation" => Ok(EventType::Consultation),
            "personal" => Ok(EventType::Personal),
            "review" => Ok(EventType::Review),
            other => Err(CoachError::Validation(format!("Unknown event type: {}", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecurrencePattern {
    Daily,
    Weekly,
    Monthly,
}

impl RecurrencePattern {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecurrencePattern::Daily => "daily",
            RecurrencePattern::Weekly => "weekly",
            RecurrencePattern::Monthly => "monthly",
        }
    }
}

impl fmt::Display for RecurrencePattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RecurrencePattern {
    type Err = CoachError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(RecurrencePattern::Daily),
            "weekly" => Ok(RecurrencePattern::Weekly),
            "monthly" => Ok(RecurrencePattern::Monthly),
            other => Err(CoachError::Validation(format!(
                "Unknown recurrence pattern: {}",
                other
            ))),
        }
    }
}

/// A persisted calendar entry owned by exactly one coach.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub coach_id: Uuid,
    pub client_id: Option<Uuid>,
    pub event_type: EventType,
    pub check_in_id: Option<Uuid>,
    pub is_recurring: bool,
    pub recurrence_pattern: Option<RecurrencePattern>,
    pub recurrence_interval: Option<u32>,
    pub created_at: DateTime<Utc>,
}

impl CalendarEvent {
    pub fn duration(&self) -> Duration {
        self.end_time - self.start_time
    }

    /// Half-open overlap with another event; touching endpoints do not count.
    pub fn overlaps(&self, other: &CalendarEvent) -> bool {
        overlaps(self.start_time, self.end_time, other.start_time, other.end_time)
    }
}

/// Event data before the store assigns an id.
///
/// Occurrences produced by recurrence expansion are values of this type too,
/// so each accepted occurrence becomes its own row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewCalendarEvent {
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub coach_id: Uuid,
    pub client_id: Option<Uuid>,
    pub event_type: EventType,
    pub check_in_id: Option<Uuid>,
    #[serde(default)]
    pub is_recurring: bool,
    pub recurrence_pattern: Option<RecurrencePattern>,
    pub recurrence_interval: Option<u32>,
}

impl NewCalendarEvent {
    pub fn validate(&self) -> CoachResult<()> {
        if self.title.trim().is_empty() {
            return Err(CoachError::Validation("Event title must not be empty".to_string()));
        }
        validate_time_range(self.start_time, self.end_time)?;
        if self.is_recurring && self.recurrence_pattern.is_none() {
            return Err(CoachError::Validation(
                "Recurring events require a recurrence pattern".to_string(),
            ));
        }
        match self.recurrence_interval {
            Some(0) => {
                return Err(CoachError::Validation(
                    "Recurrence interval must be at least 1".to_string(),
                ));
            }
            Some(interval) if interval > MAX_RECURRENCE_INTERVAL => {
                return Err(CoachError::Validation(format!(
                    "Recurrence interval must be at most {}",
                    MAX_RECURRENCE_INTERVAL
                )));
            }
            _ => {}
        }
        Ok(())
    }

    pub fn duration(&self) -> Duration {
        self.end_time - self.start_time
    }

    pub fn into_event(self, id: Uuid, created_at: DateTime<Utc>) -> CalendarEvent {
        CalendarEvent {
            id,
            title: self.title,
            description: self.description,
            start_time: self.start_time,
            end_time: self.end_time,
            coach_id: self.coach_id,
            client_id: self.client_id,
            event_type: self.event_type,
            check_in_id: self.check_in_id,
            is_recurring: self.is_recurring,
            recurrence_pattern: self.recurrence_pattern,
            recurrence_interval: self.recurrence_interval,
            created_at,
        }
    }
}

/// Checks `end > start` and the scheduling duration bounds.
pub fn validate_time_range(start: DateTime<Utc>, end: DateTime<Utc>) -> CoachResult<()> {
    if end <= start {
        return Err(CoachError::Validation(
            "Event end time must be after its start time".to_string(),
        ));
    }
    let duration = end - start;
    if duration < Duration::minutes(MIN_EVENT_DURATION_MINUTES) {
        return Err(CoachError::Validation(format!(
            "Events must last at least {} minutes",
            MIN_EVENT_DURATION_MINUTES
        )));
    }
    if duration > Duration::hours(MAX_EVENT_DURATION_HOURS) {
        return Err(CoachError::Validation(format!(
            "Events cannot last longer than {} hours",
            MAX_EVENT_DURATION_HOURS
        )));
    }
    Ok(())
}

/// Partial update; absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateCalendarEvent {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub client_id: Option<Uuid>,
    pub event_type: Option<EventType>,
    pub check_in_id: Option<Uuid>,
}

impl UpdateCalendarEvent {
    /// Merges the update into `current` and validates the result.
    pub fn apply_to(&self, current: &CalendarEvent) -> CoachResult<CalendarEvent> {
        let mut updated = current.clone();
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err(CoachError::Validation("Event title must not be empty".to_string()));
            }
            updated.title = title.clone();
        }
        if let Some(description) = &self.description {
            updated.description = Some(description.clone());
        }
        if let Some(start_time) = self.start_time {
            updated.start_time = start_time;
        }
        if let Some(end_time) = self.end_time {
            updated.end_time = end_time;
        }
        if let Some(client_id) = self.client_id {
            updated.client_id = Some(client_id);
        }
        if let Some(event_type) = self.event_type {
            updated.event_type = event_type;
        }
        if let Some(check_in_id) = self.check_in_id {
            updated.check_in_id = Some(check_in_id);
        }
        validate_time_range(updated.start_time, updated.end_time)?;
        Ok(updated)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEventRequest {
    pub title: String,
    pub description: Option<String>,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub client_id: Option<Uuid>,
    pub event_type: EventType,
    pub check_in_id: Option<Uuid>,
    pub recurrence: Option<RecurrenceRule>,
    /// Acknowledges a recurrence count above the confirmation threshold.
    #[serde(default)]
    pub confirm: bool,
}

impl CreateEventRequest {
    /// Builds the event template owned by `coach_id`.
    pub fn template(&self, coach_id: Uuid) -> NewCalendarEvent {
        NewCalendarEvent {
            title: self.title.clone(),
            description: self.description.clone(),
            start_time: self.start_time,
            end_time: self.end_time,
            coach_id,
            client_id: self.client_id,
            event_type: self.event_type,
            check_in_id: self.check_in_id,
            is_recurring: self.recurrence.is_some(),
            recurrence_pattern: self.recurrence.as_ref().map(|rule| rule.pattern),
            recurrence_interval: self.recurrence.as_ref().map(|rule| rule.interval),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateEventResponse {
    pub created: Vec<CalendarEvent>,
    pub skipped_duplicates: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteEventResponse {
    pub id: Uuid,
    pub deleted_at: DateTime<Utc>,
}
