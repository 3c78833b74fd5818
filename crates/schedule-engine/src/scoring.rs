//! Slot scoring, best-slot selection and placement confidence.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;

use crate::calendar;
use crate::conflict::ConflictSet;
use crate::model::{Priority, SchedulableItem};
use crate::slots::TimeSlot;

/// Gap credited when nothing follows a slot.
const DEFAULT_TRAILING_GAP_MINUTES: f64 = 60.0;

/// Relative desirability of `slot` for `item`. Higher is better; there is no
/// fixed upper bound.
pub fn score_slot(item: &SchedulableItem, slot: &TimeSlot, conflicts: &ConflictSet, tz: Tz) -> f64 {
    let mut score = 0.0;

    // Front-load urgent work into the morning.
    if item.priority == Priority::High {
        let hour = calendar::local_hour(slot.start, tz);
        if hour < 12 {
            score += 10.0;
        } else if hour < 15 {
            score += 5.0;
        }
    }

    if let Some(deadline) = item.deadline {
        let hours_until = (deadline - slot.start).num_seconds() as f64 / 3600.0;
        if hours_until >= 0.0 {
            score += (10.0 - hours_until / 24.0).max(0.0);
        }
    }

    let gap_minutes = conflicts
        .next_start_at_or_after(slot.end)
        .map(|next| (next - slot.end).num_seconds() as f64 / 60.0)
        .unwrap_or(DEFAULT_TRAILING_GAP_MINUTES);
    score += 5.0 * gap_minutes.min(DEFAULT_TRAILING_GAP_MINUTES) / DEFAULT_TRAILING_GAP_MINUTES;

    score
}

/// Highest-scoring slot. Ties keep the earliest candidate in `slots`.
pub fn select_best(
    item: &SchedulableItem,
    slots: &[TimeSlot],
    conflicts: &ConflictSet,
    tz: Tz,
) -> Option<(TimeSlot, f64)> {
    let mut best: Option<(TimeSlot, f64)> = None;
    for slot in slots {
        let score = score_slot(item, slot, conflicts, tz);
        match best {
            Some((_, best_score)) if score <= best_score => {}
            _ => best = Some((*slot, score)),
        }
    }
    best
}

/// Descriptive confidence in `[0, 1]`, rounded to two decimals.
///
/// Starts at 0.7: +0.2 for high priority before noon, +0.1 when the deadline
/// is more than 48 hours away, -0.1 for starts before 08:00 or after 18:59.
pub fn confidence(item: &SchedulableItem, start: DateTime<Utc>, tz: Tz) -> f64 {
    let hour = calendar::local_hour(start, tz);
    let mut value: f64 = 0.7;

    if item.priority == Priority::High && hour < 12 {
        value += 0.2;
    }
    if let Some(deadline) = item.deadline {
        if (deadline - start).num_minutes() > 48 * 60 {
            value += 0.1;
        }
    }
    if !(8..=18).contains(&hour) {
        value -= 0.1;
    }

    (value.clamp(0.0, 1.0) * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn monday(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 16, h, m, 0).unwrap()
    }

    fn item(priority: Priority) -> SchedulableItem {
        SchedulableItem::new("t", "Task", priority, 60, monday(0, 0))
    }

    fn slot(h: u32, m: u32) -> TimeSlot {
        TimeSlot {
            start: monday(h, m),
            end: monday(h, m) + Duration::minutes(60),
        }
    }

    #[test]
    fn high_priority_prefers_morning() {
        let empty = ConflictSet::default();
        let high = item(Priority::High);
        assert_eq!(score_slot(&high, &slot(9, 0), &empty, Tz::UTC), 15.0);
        assert_eq!(score_slot(&high, &slot(13, 0), &empty, Tz::UTC), 10.0);
        assert_eq!(score_slot(&high, &slot(15, 0), &empty, Tz::UTC), 5.0);
    }

    #[test]
    fn trailing_gap_is_proportional() {
        let busy = ConflictSet::default().with(crate::conflict::BusyInterval {
            start: monday(10, 30),
            end: monday(11, 0),
            item_id: None,
        });
        let low = item(Priority::Low);
        // Slot ends 10:00, next busy at 10:30 -> half credit.
        assert_eq!(score_slot(&low, &slot(9, 0), &busy, Tz::UTC), 2.5);
        // Slot ends exactly at the next busy start -> no credit.
        assert_eq!(score_slot(&low, &slot(9, 30), &busy, Tz::UTC), 0.0);
    }

    #[test]
    fn ties_keep_first_slot() {
        let empty = ConflictSet::default();
        let low = item(Priority::Low);
        let slots = [slot(9, 0), slot(9, 15), slot(9, 30)];
        let (best, _) = select_best(&low, &slots, &empty, Tz::UTC).unwrap();
        assert_eq!(best.start, monday(9, 0));
    }

    #[test]
    fn confidence_adjustments() {
        let high = item(Priority::High);
        assert_eq!(confidence(&high, monday(9, 0), Tz::UTC), 0.9);
        assert_eq!(confidence(&high, monday(13, 0), Tz::UTC), 0.7);

        let low = item(Priority::Low).with_deadline(monday(9, 0) + Duration::days(3));
        assert_eq!(confidence(&low, monday(9, 0), Tz::UTC), 0.8);
        assert_eq!(confidence(&low, monday(7, 0), Tz::UTC), 0.7);
        assert_eq!(confidence(&item(Priority::Low), monday(19, 0), Tz::UTC), 0.6);
    }
}
