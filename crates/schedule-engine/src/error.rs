//! Error types for schedule-engine operations.
//!
//! Only setup faults are errors. Items that cannot be placed are reported in
//! the [`SchedulingOutcome`](crate::model::SchedulingOutcome), never here.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid timezone: {0}")]
    InvalidTimezone(String),

    #[error("Invalid item '{id}': {reason}")]
    InvalidItem { id: String, reason: String },

    #[error("Invalid interval '{id}': {reason}")]
    InvalidInterval { id: String, reason: String },
}

pub type Result<T> = std::result::Result<T, ScheduleError>;
