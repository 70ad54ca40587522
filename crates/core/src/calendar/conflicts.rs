use std::collections::HashMap;

use chrono::TimeZone;
use uuid::Uuid;

use super::group_by_day;
use crate::models::event::CalendarEvent;

/// Flags each event of a single day that overlaps at least one sibling.
///
/// The returned flags are index-aligned with `day`. Every pair is compared,
/// so a conflict is always reported on both sides.
pub fn mark_day_conflicts(day: &[CalendarEvent]) -> Vec<bool> {
    let mut flags = vec![false; day.len()];
    for i in 0..day.len() {
        for j in (i + 1)..day.len() {
            if day[i].overlaps(&day[j]) {
                flags[i] = true;
                flags[j] = true;
            }
        }
    }
    flags
}

/// Conflict flags for every event in a view window, keyed by event id.
///
/// Events are grouped by the local date of their start in `tz`; events on
/// different days never conflict with each other.
pub fn mark_conflicts<Z: TimeZone>(events: &[CalendarEvent], tz: &Z) -> HashMap<Uuid, bool> {
    let mut conflicts = HashMap::with_capacity(events.len());
    for day in group_by_day(events, tz).into_values() {
        let flags = mark_day_conflicts(&day);
        for (event, flag) in day.iter().zip(flags) {
            conflicts.insert(event.id, flag);
        }
    }
    conflicts
}
