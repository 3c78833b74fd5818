//! After-the-fact verification of a [`SchedulingOutcome`].
//!
//! Re-checks the placement invariants against the inputs the outcome was
//! computed from: no overlaps (with each other or with existing intervals),
//! exact durations, and working-hours containment.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::calendar;
use crate::config::SchedulerConfig;
use crate::conflict::{self, BusyInterval};
use crate::error::Result;
use crate::model::{ExistingInterval, SchedulableItem, SchedulingOutcome};

/// A broken placement invariant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    UnknownItem {
        item_id: String,
    },
    DurationMismatch {
        item_id: String,
        expected_minutes: i64,
        actual_minutes: i64,
    },
    OutsideWorkingHours {
        item_id: String,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    },
    Overlap {
        first: String,
        second: String,
        overlap_minutes: i64,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::UnknownItem { item_id } => {
                write!(f, "placement for unknown item '{}'", item_id)
            }
            Violation::DurationMismatch {
                item_id,
                expected_minutes,
                actual_minutes,
            } => write!(
                f,
                "'{}' lasts {} minutes, expected {}",
                item_id, actual_minutes, expected_minutes
            ),
            Violation::OutsideWorkingHours { item_id, start, end } => write!(
                f,
                "'{}' ({} - {}) is outside working hours",
                item_id,
                start.to_rfc3339(),
                end.to_rfc3339()
            ),
            Violation::Overlap {
                first,
                second,
                overlap_minutes,
            } => write!(
                f,
                "'{}' overlaps '{}' by {} minutes",
                first, second, overlap_minutes
            ),
        }
    }
}

/// Check `outcome` against the inputs it was produced from.
///
/// An empty result means every invariant holds.
///
/// # Errors
/// Returns the configuration error when `config` does not validate.
pub fn verify_outcome(
    outcome: &SchedulingOutcome,
    items: &[SchedulableItem],
    existing: &[ExistingInterval],
    config: &SchedulerConfig,
) -> Result<Vec<Violation>> {
    let tz = config.validate()?;
    let by_id: HashMap<&str, &SchedulableItem> =
        items.iter().map(|item| (item.id.as_str(), item)).collect();

    let mut violations = Vec::new();

    for placement in &outcome.placements {
        let Some(item) = by_id.get(placement.item_id.as_str()) else {
            violations.push(Violation::UnknownItem {
                item_id: placement.item_id.clone(),
            });
            continue;
        };

        let expected_minutes = i64::from(item.estimated_minutes);
        if placement.duration_minutes() != expected_minutes {
            violations.push(Violation::DurationMismatch {
                item_id: placement.item_id.clone(),
                expected_minutes,
                actual_minutes: placement.duration_minutes(),
            });
        }

        if !calendar::within_working_hours(&config.working_hours, tz, placement.start, placement.end) {
            violations.push(Violation::OutsideWorkingHours {
                item_id: placement.item_id.clone(),
                start: placement.start,
                end: placement.end,
            });
        }
    }

    // `item_id` carries a display label for each side of the comparison.
    let placed: Vec<BusyInterval> = outcome
        .placements
        .iter()
        .map(|p| BusyInterval {
            start: p.start,
            end: p.end,
            item_id: Some(p.item_id.clone()),
        })
        .collect();
    let occupied: Vec<BusyInterval> = existing
        .iter()
        .map(|e| BusyInterval {
            start: e.start,
            end: e.end,
            item_id: Some(format!("existing:{}", e.id)),
        })
        .collect();

    let overlaps = conflict::find_self_conflicts(&placed)
        .into_iter()
        .chain(conflict::find_conflicts(&placed, &occupied));
    for found in overlaps {
        violations.push(Violation::Overlap {
            first: found.a.item_id.unwrap_or_default(),
            second: found.b.item_id.unwrap_or_default(),
            overlap_minutes: found.overlap_minutes,
        });
    }

    Ok(violations)
}
