//! Side-by-side placement of overlapping events in a time grid.
//!
//! Events are sorted by start time, longer events first on ties, and each one
//! is dropped into the lowest column where it collides with nothing. Every
//! event then takes the column count of its whole overlap cluster (events
//! linked directly or through a shared neighbour) so a cluster renders with a
//! uniform width.

use std::cmp::Ordering;

use crate::models::{event::CalendarEvent, layout::ColumnAssignment};

/// Orders events by start ascending, then by duration descending.
pub fn layout_order(a: &CalendarEvent, b: &CalendarEvent) -> Ordering {
    a.start_time
        .cmp(&b.start_time)
        .then_with(|| b.duration().cmp(&a.duration()))
}

/// Assigns columns to one day's events.
///
/// Assignments come back in layout order (see [`layout_order`]).
pub fn pack_columns(day: &[CalendarEvent]) -> Vec<ColumnAssignment> {
    let mut order: Vec<&CalendarEvent> = day.iter().collect();
    order.sort_by(|a, b| layout_order(a, b));

    let mut columns: Vec<Vec<usize>> = Vec::new();
    let mut column_of = vec![0usize; order.len()];

    for (idx, event) in order.iter().enumerate() {
        let free = columns
            .iter()
            .position(|occupants| occupants.iter().all(|&other| !order[other].overlaps(event)));
        let column = match free {
            Some(column) => column,
            None => {
                columns.push(Vec::new());
                columns.len() - 1
            }
        };
        columns[column].push(idx);
        column_of[idx] = column;
    }

    let clusters = overlap_clusters(&order);
    let cluster_count = clusters.iter().copied().max().map_or(0, |max| max + 1);
    let mut cluster_width = vec![1usize; cluster_count];
    for (idx, &cluster) in clusters.iter().enumerate() {
        cluster_width[cluster] = cluster_width[cluster].max(column_of[idx] + 1);
    }

    order
        .iter()
        .enumerate()
        .map(|(idx, event)| ColumnAssignment {
            event_id: event.id,
            column: column_of[idx],
            total_columns: cluster_width[clusters[idx]],
        })
        .collect()
}

/// Labels each event with the index of its transitive overlap cluster.
fn overlap_clusters(order: &[&CalendarEvent]) -> Vec<usize> {
    let mut cluster = vec![usize::MAX; order.len()];
    let mut next = 0;

    for seed in 0..order.len() {
        if cluster[seed] != usize::MAX {
            continue;
        }
        cluster[seed] = next;
        let mut stack = vec![seed];
        while let Some(current) = stack.pop() {
            for candidate in 0..order.len() {
                if cluster[candidate] == usize::MAX && order[current].overlaps(order[candidate]) {
                    cluster[candidate] = next;
                    stack.push(candidate);
                }
            }
        }
        next += 1;
    }

    cluster
}
