use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::event::CalendarEvent;

/// Render-only column placement for one event within its day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnAssignment {
    pub event_id: Uuid,
    pub column: usize,
    pub total_columns: usize,
}

impl ColumnAssignment {
    pub fn width_percent(&self) -> f64 {
        100.0 / self.total_columns.max(1) as f64
    }

    pub fn left_percent(&self) -> f64 {
        self.column as f64 * self.width_percent()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacedEvent {
    pub event: CalendarEvent,
    pub has_conflict: bool,
    pub column: usize,
    pub total_columns: usize,
}

/// One local calendar day of laid-out events, sorted by start time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayLayout {
    pub date: NaiveDate,
    pub events: Vec<PlacedEvent>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayoutResponse {
    pub timezone: String,
    pub days: Vec<DayLayout>,
}
