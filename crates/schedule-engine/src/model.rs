//! Input and output types of a scheduling pass.
//!
//! All instants are UTC. Wall-clock interpretation (working hours, "morning")
//! happens against the configured time zone in [`crate::calendar`].

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Relative importance of a schedulable item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    /// Ranking weight: high=3, medium=2, low=1.
    pub fn weight(self) -> u32 {
        match self {
            Priority::Low => 1,
            Priority::Medium => 2,
            Priority::High => 3,
        }
    }
}

/// A unit of work the caller wants placed on the calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchedulableItem {
    /// Opaque identifier, unique within a batch.
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub priority: Priority,
    /// Requested length of the placement in minutes. Must be positive.
    pub estimated_minutes: u32,
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
    /// Lower bound of the search window.
    pub created_at: DateTime<Utc>,
    /// Ids of items that must already be committed before this one is placed.
    #[serde(default)]
    pub dependencies: Vec<String>,
    /// Rigid items are never placed; they only count towards overdue reporting.
    #[serde(default = "default_flexible")]
    pub is_flexible: bool,
}

fn default_flexible() -> bool {
    true
}

impl SchedulableItem {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        priority: Priority,
        estimated_minutes: u32,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            priority,
            estimated_minutes,
            deadline: None,
            created_at,
            dependencies: Vec::new(),
            is_flexible: true,
        }
    }

    pub fn with_deadline(mut self, deadline: DateTime<Utc>) -> Self {
        self.deadline = Some(deadline);
        self
    }

    pub fn with_dependencies<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }

    /// Mark the item as already placed elsewhere.
    pub fn rigid(mut self) -> Self {
        self.is_flexible = false;
        self
    }

    pub fn duration(&self) -> Duration {
        Duration::minutes(i64::from(self.estimated_minutes))
    }

    /// True when the deadline exists and lies strictly before `now`.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        self.deadline.is_some_and(|deadline| now > deadline)
    }
}

/// An occupied calendar interval the engine must avoid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExistingInterval {
    pub id: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Item this interval was committed for; satisfies dependencies on that item.
    #[serde(default)]
    pub item_id: Option<String>,
}

impl ExistingInterval {
    pub fn new(id: impl Into<String>, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            start,
            end,
            item_id: None,
        }
    }

    pub fn for_item(mut self, item_id: impl Into<String>) -> Self {
        self.item_id = Some(item_id.into());
        self
    }
}

/// A successful placement of one item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub item_id: String,
    pub title: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Descriptive score in `[0, 1]`; never affects acceptance.
    pub confidence: f64,
}

impl Placement {
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }
}

/// Why an item could not be placed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FailureReason {
    DependenciesNotSatisfied { missing: Vec<String> },
    NoAvailableSlot,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureReason::DependenciesNotSatisfied { missing } => {
                write!(f, "dependencies not satisfied: {}", missing.join(", "))
            }
            FailureReason::NoAvailableSlot => f.write_str("no available time slots found"),
        }
    }
}

/// A per-item placement failure with an optional advisory alternative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementFailure {
    pub item_id: String,
    pub reason: FailureReason,
    /// Human-readable rendering of `reason`.
    pub message: String,
    /// Advisory only; not checked against the conflict set.
    pub suggested_time: Option<DateTime<Utc>>,
}

impl PlacementFailure {
    pub fn new(
        item_id: impl Into<String>,
        reason: FailureReason,
        suggested_time: Option<DateTime<Utc>>,
    ) -> Self {
        let message = reason.to_string();
        Self {
            item_id: item_id.into(),
            reason,
            message,
            suggested_time,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuggestionKind {
    /// Some items failed; more hours or less work would help.
    ExtendHours,
    /// Some items are already past their deadline.
    ReviewDeadlines,
}

/// Advisory output produced after the pass. Never alters placements.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Suggestion {
    pub kind: SuggestionKind,
    pub message: String,
    pub data: serde_json::Value,
}

/// Result of one scheduling pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchedulingOutcome {
    /// Committed placements in ranked order.
    pub placements: Vec<Placement>,
    /// Ids of items that could not be placed, in ranked order.
    pub unscheduled: Vec<String>,
    pub failures: Vec<PlacementFailure>,
    pub suggestions: Vec<Suggestion>,
}

impl SchedulingOutcome {
    /// True when every attempted item was placed.
    pub fn is_complete(&self) -> bool {
        self.unscheduled.is_empty()
    }

    pub fn placement_for(&self, item_id: &str) -> Option<&Placement> {
        self.placements.iter().find(|p| p.item_id == item_id)
    }

    pub fn failure_for(&self, item_id: &str) -> Option<&PlacementFailure> {
        self.failures.iter().find(|f| f.item_id == item_id)
    }

    /// Placements as occupied intervals tagged with their item ids, ready to be
    /// fed into a follow-up pass.
    pub fn placements_as_intervals(&self) -> Vec<ExistingInterval> {
        self.placements
            .iter()
            .map(|p| {
                ExistingInterval::new(format!("placed-{}", p.item_id), p.start, p.end)
                    .for_item(p.item_id.clone())
            })
            .collect()
    }
}
