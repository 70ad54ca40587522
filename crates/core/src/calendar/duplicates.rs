use chrono::Duration;

use crate::models::event::{CalendarEvent, NewCalendarEvent};

/// Default window within which two same-titled events count as one.
pub const DEFAULT_DUPLICATE_TOLERANCE_SECONDS: i64 = 60;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct DuplicateReport {
    /// Candidates with no persisted counterpart, in input order.
    pub accepted: Vec<NewCalendarEvent>,
    /// Candidates matching an existing event.
    pub skipped: Vec<NewCalendarEvent>,
}

/// Same title, same coach, and starts less than `tolerance` apart.
pub fn is_duplicate(
    candidate: &NewCalendarEvent,
    existing: &CalendarEvent,
    tolerance: Duration,
) -> bool {
    candidate.title == existing.title
        && candidate.coach_id == existing.coach_id
        && (candidate.start_time - existing.start_time).abs() < tolerance
}

/// Splits freshly expanded candidates into those to create and those that
/// already exist.
///
/// This only guards against resubmitting the same series; two concurrent
/// submissions can still both pass.
pub fn suppress_duplicates(
    candidates: Vec<NewCalendarEvent>,
    existing: &[CalendarEvent],
    tolerance: Duration,
) -> DuplicateReport {
    let (skipped, accepted): (Vec<_>, Vec<_>) = candidates.into_iter().partition(|candidate| {
        existing
            .iter()
            .any(|event| is_duplicate(candidate, event, tolerance))
    });
    DuplicateReport { accepted, skipped }
}
