//! Candidate slot search: walk the search window day by day and test fixed-step
//! candidates inside each day's working window.

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;

use crate::calendar::{self, DayWindow};
use crate::config::SchedulerConfig;
use crate::conflict::ConflictSet;
use crate::model::SchedulableItem;

/// `[start, end)` range in which an item may be placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl SearchWindow {
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// A candidate placement. `end - start` is always the item's duration; the
/// buffer is not part of the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSlot {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

/// `[max(now, created_at), deadline or start + horizon)`.
///
/// A horizon past the representable range saturates at the latest instant.
pub fn search_window(item: &SchedulableItem, now: DateTime<Utc>, horizon_days: u32) -> SearchWindow {
    let start = now.max(item.created_at);
    let end = item.deadline.unwrap_or_else(|| {
        start
            .checked_add_signed(Duration::days(i64::from(horizon_days)))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    });
    SearchWindow { start, end }
}

/// Working windows of every local date touched by `window`, clipped to it.
///
/// Days off and days whose clipped range is empty are skipped.
pub fn clipped_days(config: &SchedulerConfig, tz: Tz, window: SearchWindow) -> Vec<DayWindow> {
    if window.is_empty() {
        return Vec::new();
    }

    let first = calendar::local_date(window.start, tz);
    let last = calendar::local_date(window.end, tz);

    first
        .iter_days()
        .take_while(|date| *date <= last)
        .filter_map(|date| calendar::working_window(&config.working_hours, tz, date))
        .filter_map(|day| {
            let start = day.start.max(window.start);
            let end = day.end.min(window.end);
            (start < end).then_some(DayWindow { start, end, ..day })
        })
        .collect()
}

/// Enumerate conflict-free candidates for `item`, earliest first.
///
/// Candidates sit on a grid of `slot_step_minutes` anchored at each day's
/// working start. A candidate is kept when the padded range
/// `[start, start + duration + buffer)` fits the clipped day and overlaps
/// nothing in `conflicts`.
pub fn candidate_slots(
    item: &SchedulableItem,
    window: SearchWindow,
    config: &SchedulerConfig,
    tz: Tz,
    conflicts: &ConflictSet,
) -> Vec<TimeSlot> {
    let duration = item.duration();
    let padded = duration + Duration::minutes(i64::from(config.buffer_minutes));
    let step = Duration::minutes(i64::from(config.slot_step_minutes));

    let mut slots = Vec::new();

    for day in clipped_days(config, tz, window) {
        let Some(anchor) = calendar::working_window(&config.working_hours, tz, day.date) else {
            continue;
        };

        let mut cursor = align_to_grid(anchor.start, day.start, step);
        while cursor + padded <= day.end {
            if !conflicts.conflicts_with(cursor, cursor + padded) {
                slots.push(TimeSlot {
                    start: cursor,
                    end: cursor + duration,
                });
            }
            cursor += step;
        }
    }

    slots
}

/// First grid point `anchor + k * step` at or after `from`.
fn align_to_grid(anchor: DateTime<Utc>, from: DateTime<Utc>, step: Duration) -> DateTime<Utc> {
    if from <= anchor {
        return anchor;
    }
    let step_secs = step.num_seconds();
    let offset_secs = (from - anchor).num_seconds();
    let steps = (offset_secs + step_secs - 1) / step_secs;
    let cursor = anchor + Duration::seconds(steps * step_secs);
    // Whole seconds drop any fraction of `from`.
    if cursor < from {
        cursor + step
    } else {
        cursor
    }
}
