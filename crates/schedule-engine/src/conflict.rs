//! Overlap detection against the growing set of busy intervals.
//!
//! Intervals are half-open: adjacent intervals (one ends exactly when another
//! starts) are NOT conflicts.

use chrono::{DateTime, Utc};

use crate::model::ExistingInterval;

/// An occupied `[start, end)` range, optionally tagged with the item it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BusyInterval {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub item_id: Option<String>,
}

impl From<&ExistingInterval> for BusyInterval {
    fn from(interval: &ExistingInterval) -> Self {
        Self {
            start: interval.start,
            end: interval.end,
            item_id: interval.item_id.clone(),
        }
    }
}

/// Two intervals overlap iff `a.start < b.end` and `b.start < a.end`.
pub fn overlaps(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// Every interval checked for overlap during a pass: pre-existing events plus
/// placements committed so far.
///
/// The set is threaded through the pass by value. [`ConflictSet::with`]
/// consumes it and returns the grown set, so it can only ever grow.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConflictSet {
    busy: Vec<BusyInterval>,
}

impl ConflictSet {
    pub fn from_existing(existing: &[ExistingInterval]) -> Self {
        Self {
            busy: existing.iter().map(BusyInterval::from).collect(),
        }
    }

    /// Append a committed interval.
    #[must_use]
    pub fn with(mut self, interval: BusyInterval) -> Self {
        self.busy.push(interval);
        self
    }

    /// Linear scan: does `[start, end)` overlap anything in the set?
    pub fn conflicts_with(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        self.busy
            .iter()
            .any(|b| overlaps(start, end, b.start, b.end))
    }

    /// Earliest interval start at or after `instant`.
    pub fn next_start_at_or_after(&self, instant: DateTime<Utc>) -> Option<DateTime<Utc>> {
        self.busy
            .iter()
            .map(|b| b.start)
            .filter(|start| *start >= instant)
            .min()
    }

    /// True when some interval in the set was committed for `item_id`.
    pub fn has_item(&self, item_id: &str) -> bool {
        self.busy
            .iter()
            .any(|b| b.item_id.as_deref() == Some(item_id))
    }

    pub fn len(&self) -> usize {
        self.busy.len()
    }

    pub fn is_empty(&self) -> bool {
        self.busy.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BusyInterval> {
        self.busy.iter()
    }
}

/// A detected overlap between two intervals.
#[derive(Debug, Clone, PartialEq)]
pub struct Conflict {
    pub a: BusyInterval,
    pub b: BusyInterval,
    pub overlap_minutes: i64,
}

/// Find all pairwise conflicts between two interval lists.
///
/// The overlap duration is `min(a.end, b.end) - max(a.start, b.start)`.
pub fn find_conflicts(list_a: &[BusyInterval], list_b: &[BusyInterval]) -> Vec<Conflict> {
    let mut conflicts = Vec::new();

    for a in list_a {
        for b in list_b {
            if overlaps(a.start, a.end, b.start, b.end) {
                let overlap_start = a.start.max(b.start);
                let overlap_end = a.end.min(b.end);

                conflicts.push(Conflict {
                    a: a.clone(),
                    b: b.clone(),
                    overlap_minutes: (overlap_end - overlap_start).num_minutes(),
                });
            }
        }
    }

    conflicts
}

/// Pairwise conflicts within a single list, each unordered pair reported once.
pub fn find_self_conflicts(list: &[BusyInterval]) -> Vec<Conflict> {
    let mut conflicts = Vec::new();
    for (i, a) in list.iter().enumerate() {
        conflicts.extend(find_conflicts(std::slice::from_ref(a), &list[i + 1..]));
    }
    conflicts
}
