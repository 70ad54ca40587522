use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::event::CalendarEvent;
use crate::errors::{CoachError, CoachResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    Coach,
    Client,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Coach => f.write_str("coach"),
            UserRole::Client => f.write_str("client"),
        }
    }
}

impl FromStr for UserRole {
    type Err = CoachError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "coach" => Ok(UserRole::Coach),
            "client" => Ok(UserRole::Client),
            other => Err(CoachError::Authentication(format!("Unknown role: {}", other))),
        }
    }
}

/// Identity of the signed-in user for the lifetime of one session.
///
/// Passed explicitly to whatever needs the current user instead of living in
/// a process-wide cache.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionContext {
    pub user_id: Uuid,
    pub role: UserRole,
    pub timezone: Tz,
    pub started_at: DateTime<Utc>,
}

impl SessionContext {
    pub fn new(user_id: Uuid, role: UserRole, timezone: Tz) -> Self {
        Self {
            user_id,
            role,
            timezone,
            started_at: Utc::now(),
        }
    }

    /// Returns the coach id, or an authorization error for clients.
    pub fn require_coach(&self) -> CoachResult<Uuid> {
        match self.role {
            UserRole::Coach => Ok(self.user_id),
            UserRole::Client => Err(CoachError::Authorization(
                "Only coaches can manage calendar events".to_string(),
            )),
        }
    }

    pub fn can_view(&self, event: &CalendarEvent) -> bool {
        match self.role {
            UserRole::Coach => event.coach_id == self.user_id,
            UserRole::Client => event.client_id == Some(self.user_id),
        }
    }

    pub fn ensure_owns(&self, event: &CalendarEvent) -> CoachResult<()> {
        let coach_id = self.require_coach()?;
        if event.coach_id != coach_id {
            return Err(CoachError::Authorization(format!(
                "Event {} belongs to another coach",
                event.id
            )));
        }
        Ok(())
    }
}
