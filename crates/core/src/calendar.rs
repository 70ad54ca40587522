//! Calendar layout and recurring-event creation logic.
//!
//! Layout: events in a view window are grouped per local day, then each day
//! is run through [`conflicts`] and [`columns`]. Creation: a template is
//! expanded by [`recurrence`] and filtered by [`duplicates`] before being
//! handed to the event store.

pub mod columns;
pub mod conflicts;
pub mod duplicates;
pub mod overlap;
pub mod recurrence;

use std::collections::{BTreeMap, HashMap};

use chrono::{NaiveDate, TimeZone};

use crate::models::{
    event::CalendarEvent,
    layout::{DayLayout, PlacedEvent},
};

/// Groups events by the local date of their start, each day in layout order.
pub fn group_by_day<Z: TimeZone>(
    events: &[CalendarEvent],
    tz: &Z,
) -> BTreeMap<NaiveDate, Vec<CalendarEvent>> {
    let mut days: BTreeMap<NaiveDate, Vec<CalendarEvent>> = BTreeMap::new();
    for event in events {
        let date = event.start_time.with_timezone(tz).date_naive();
        days.entry(date).or_default().push(event.clone());
    }
    for day in days.values_mut() {
        day.sort_by(columns::layout_order);
    }
    days
}

/// Lays out every day touched by `events`, in date order.
pub fn layout_days<Z: TimeZone>(events: &[CalendarEvent], tz: &Z) -> Vec<DayLayout> {
    group_by_day(events, tz)
        .into_iter()
        .map(|(date, day)| {
            let conflicts = conflicts::mark_day_conflicts(&day);
            let assignments: HashMap<_, _> = columns::pack_columns(&day)
                .into_iter()
                .map(|assignment| (assignment.event_id, assignment))
                .collect();

            let events = day
                .into_iter()
                .zip(conflicts)
                .map(|(event, has_conflict)| {
                    let (column, total_columns) = assignments
                        .get(&event.id)
                        .map_or((0, 1), |a| (a.column, a.total_columns));
                    PlacedEvent {
                        event,
                        has_conflict,
                        column,
                        total_columns,
                    }
                })
                .collect();

            DayLayout { date, events }
        })
        .collect()
}
