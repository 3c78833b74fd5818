//! Urgency ordering of the flexible items in a batch.
//!
//! `score = 10 * priority_weight + 5 * urgency + 3 * dependents`, sorted
//! descending with a stable sort so equal scores keep input order.

use chrono::{DateTime, Utc};

use crate::model::SchedulableItem;

/// An item paired with its ranking score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RankedItem<'a> {
    pub item: &'a SchedulableItem,
    pub score: u32,
}

/// Deadline urgency on a 0–10 scale.
///
/// 10 when already past, 8 within 24h, 6 within 48h, 4 within 7 days,
/// 2 otherwise, 0 without a deadline.
pub fn urgency(deadline: Option<DateTime<Utc>>, now: DateTime<Utc>) -> u32 {
    let Some(deadline) = deadline else {
        return 0;
    };
    if now > deadline {
        return 10;
    }
    let hours = (deadline - now).num_minutes() as f64 / 60.0;
    if hours <= 24.0 {
        8
    } else if hours <= 48.0 {
        6
    } else if hours <= 24.0 * 7.0 {
        4
    } else {
        2
    }
}

/// Number of items in `batch` (other than `item`) that depend on `item`.
pub fn dependents(item: &SchedulableItem, batch: &[&SchedulableItem]) -> u32 {
    batch
        .iter()
        .filter(|other| other.id != item.id && other.dependencies.iter().any(|d| *d == item.id))
        .count() as u32
}

pub fn rank_score(item: &SchedulableItem, batch: &[&SchedulableItem], now: DateTime<Utc>) -> u32 {
    10 * item.priority.weight() + 5 * urgency(item.deadline, now) + 3 * dependents(item, batch)
}

/// Rank the flexible items of `items`, most urgent first.
pub fn rank_items(items: &[SchedulableItem], now: DateTime<Utc>) -> Vec<RankedItem<'_>> {
    let batch: Vec<&SchedulableItem> = items.iter().filter(|i| i.is_flexible).collect();

    let mut ranked: Vec<RankedItem<'_>> = batch
        .iter()
        .map(|&item| RankedItem {
            item,
            score: rank_score(item, &batch, now),
        })
        .collect();

    // `sort_by` is stable.
    ranked.sort_by(|a, b| b.score.cmp(&a.score));
    ranked
}
