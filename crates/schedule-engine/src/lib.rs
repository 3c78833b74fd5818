//! # schedule-engine
//!
//! Deterministic placement of flexible tasks into a working-hour calendar.
//!
//! Given pending items (priority, duration, optional deadline, dependencies)
//! and the intervals already occupied, the engine ranks the items once, then
//! places them one at a time into the best conflict-free slot. Every commit is
//! visible to the items that follow. Items that cannot be placed are reported
//! with a reason and an advisory alternative time.
//!
//! The engine is a greedy heuristic, not a solver: it never revisits an
//! earlier placement.
//!
//! ## Quick start
//!
//! ```rust
//! use chrono::{TimeZone, Utc};
//! use schedule_engine::{schedule_all, Priority, SchedulableItem, SchedulerConfig};
//!
//! let now = Utc.with_ymd_and_hms(2026, 3, 16, 8, 0, 0).unwrap(); // a Monday
//! let items = vec![SchedulableItem::new("write", "Write report", Priority::High, 60, now)];
//!
//! let outcome = schedule_all(&items, &SchedulerConfig::default(), &[], now).unwrap();
//! assert_eq!(
//!     outcome.placements[0].start,
//!     Utc.with_ymd_and_hms(2026, 3, 16, 9, 0, 0).unwrap()
//! );
//! ```
//!
//! ## Modules
//!
//! - [`scheduler`] — `Scheduler` and the `schedule_all` pass
//! - [`ranking`] — priority / urgency / dependents ordering
//! - [`slots`] — search window and candidate enumeration
//! - [`scoring`] — slot scores, best-slot selection, confidence
//! - [`conflict`] — overlap test and the conflict set
//! - [`suggest`] — fallback times and post-pass suggestions
//! - [`audit`] — verify an outcome against its inputs
//! - [`calendar`] — working windows in the configured time zone
//! - [`config`] — `SchedulerConfig` and validation
//! - [`model`] — input and output types
//! - [`error`] — Error types

pub mod audit;
pub mod calendar;
pub mod config;
pub mod conflict;
pub mod error;
pub mod model;
pub mod ranking;
pub mod scheduler;
pub mod scoring;
pub mod slots;
pub mod suggest;

pub use audit::{verify_outcome, Violation};
pub use config::{SchedulerConfig, WorkWeek, WorkingHours, MAX_SEARCH_HORIZON_DAYS};
pub use conflict::{find_conflicts, ConflictSet};
pub use error::ScheduleError;
pub use model::{
    ExistingInterval, FailureReason, Placement, PlacementFailure, Priority, SchedulableItem,
    SchedulingOutcome, Suggestion, SuggestionKind,
};
pub use scheduler::{schedule_all, Scheduler};
