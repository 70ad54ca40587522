//! Expansion of an event template into concrete occurrences.
//!
//! Occurrence `i` starts `i * interval` pattern units after the template
//! start and keeps the template's exact duration. Offsets are always applied
//! to the original start, never to the previous occurrence, and calendar
//! arithmetic happens in the supplied time zone so wall-clock times survive
//! DST changes.
//!
//! Monthly steps use chrono's `checked_add_months`, which clamps to the last
//! day of a shorter month: a series starting Jan 31 2024 continues Feb 29,
//! Mar 31, Apr 30. An occurrence whose local time falls twice (the autumn
//! DST fall-back) takes the earlier instant; one whose local time does not
//! exist in the target zone is rejected.

use chrono::{DateTime, Days, Months, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::{
    errors::{CoachError, CoachResult},
    models::event::{NewCalendarEvent, RecurrencePattern},
};

/// Largest number of pattern units between two occurrences.
pub const MAX_RECURRENCE_INTERVAL: u32 = 365;

fn default_interval() -> u32 {
    1
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecurrenceRule {
    pub pattern: RecurrencePattern,
    #[serde(default = "default_interval")]
    pub interval: u32,
    pub count: u32,
}

impl RecurrenceRule {
    pub fn new(pattern: RecurrencePattern, interval: u32, count: u32) -> Self {
        Self {
            pattern,
            interval,
            count,
        }
    }

    pub fn validate(&self) -> CoachResult<()> {
        if self.count == 0 {
            return Err(CoachError::Validation(
                "Occurrence count must be a positive number".to_string(),
            ));
        }
        if self.interval == 0 {
            return Err(CoachError::Validation(
                "Recurrence interval must be a positive number".to_string(),
            ));
        }
        if self.interval > MAX_RECURRENCE_INTERVAL {
            return Err(CoachError::Validation(format!(
                "Recurrence interval must be at most {}",
                MAX_RECURRENCE_INTERVAL
            )));
        }
        Ok(())
    }

    /// Whether the series is large enough that the caller should confirm it.
    pub fn requires_confirmation(&self, threshold: u32) -> bool {
        self.count > threshold
    }
}

/// Shifts `start` forward by `steps` units of `pattern`, computed on the
/// wall clock of `tz`.
pub fn shift<Z: TimeZone>(
    start: DateTime<Utc>,
    pattern: RecurrencePattern,
    steps: u32,
    tz: &Z,
) -> CoachResult<DateTime<Utc>> {
    if steps == 0 {
        return Ok(start);
    }

    let local = start.with_timezone(tz).naive_local();
    let shifted = match pattern {
        RecurrencePattern::Daily => local.checked_add_days(Days::new(u64::from(steps))),
        RecurrencePattern::Weekly => local.checked_add_days(Days::new(u64::from(steps) * 7)),
        RecurrencePattern::Monthly => local.checked_add_months(Months::new(steps)),
    }
    .ok_or_else(|| {
        CoachError::Validation(format!(
            "Occurrence {} {} step(s) after {} is out of range",
            steps, pattern, start
        ))
    })?;

    tz.from_local_datetime(&shifted)
        .earliest()
        .map(|datetime| datetime.with_timezone(&Utc))
        .ok_or_else(|| {
            CoachError::Validation(format!(
                "Occurrence {} {} step(s) after {} falls on nonexistent local time {}",
                steps, pattern, start, shifted
            ))
        })
}

/// Produces `rule.count` occurrences of `template`.
pub fn expand<Z: TimeZone>(
    template: &NewCalendarEvent,
    rule: &RecurrenceRule,
    tz: &Z,
) -> CoachResult<Vec<NewCalendarEvent>> {
    rule.validate()?;
    let duration = template.duration();

    (0..rule.count)
        .map(|index| {
            let steps = index.checked_mul(rule.interval).ok_or_else(|| {
                CoachError::Validation("Recurrence series extends too far".to_string())
            })?;
            let start_time = shift(template.start_time, rule.pattern, steps, tz)?;
            Ok(NewCalendarEvent {
                start_time,
                end_time: start_time + duration,
                is_recurring: true,
                recurrence_pattern: Some(rule.pattern),
                recurrence_interval: Some(rule.interval),
                ..template.clone()
            })
        })
        .collect()
}
