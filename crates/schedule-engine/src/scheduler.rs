//! Orchestration: validate inputs, rank, then place items one at a time.
//!
//! The pass is a fold over the ranked items. Each step receives the conflict
//! set by value and hands back the grown set, so a commit is visible to every
//! later item and the caller's collections are never touched.
//!
//! Placement is greedy and never backtracks: an earlier commit is not
//! reconsidered when a later item fails to place.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;

use crate::config::SchedulerConfig;
use crate::conflict::{BusyInterval, ConflictSet};
use crate::error::{Result, ScheduleError};
use crate::model::{
    ExistingInterval, FailureReason, Placement, PlacementFailure, SchedulableItem,
    SchedulingOutcome,
};
use crate::ranking::{self, RankedItem};
use crate::{scoring, slots, suggest};

/// A validated configuration ready to run scheduling passes.
#[derive(Debug, Clone)]
pub struct Scheduler {
    config: SchedulerConfig,
    tz: Tz,
}

impl Scheduler {
    /// # Errors
    /// Returns the configuration error from [`SchedulerConfig::validate`].
    pub fn new(config: SchedulerConfig) -> Result<Self> {
        let tz = config.validate()?;
        Ok(Self { config, tz })
    }

    pub fn config(&self) -> &SchedulerConfig {
        &self.config
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Place every flexible item of `items` around `existing`.
    ///
    /// `now` is the single time reference for the whole pass. Items that cannot
    /// be placed are reported in the outcome.
    ///
    /// # Errors
    /// Returns `ScheduleError::InvalidItem` or `ScheduleError::InvalidInterval`
    /// for malformed input, before any placement is attempted.
    pub fn schedule_all(
        &self,
        items: &[SchedulableItem],
        existing: &[ExistingInterval],
        now: DateTime<Utc>,
    ) -> Result<SchedulingOutcome> {
        validate_items(items)?;
        validate_intervals(existing)?;

        let ranked = ranking::rank_items(items, now);
        tracing::debug!(
            items = items.len(),
            flexible = ranked.len(),
            existing = existing.len(),
            %now,
            "starting scheduling pass"
        );

        let pass = ranked.iter().fold(
            Pass::new(ConflictSet::from_existing(existing)),
            |pass, ranked| pass.attempt(self, ranked, now),
        );

        let suggestions = suggest::post_pass_suggestions(pass.failures.len(), items, now);

        tracing::debug!(
            placed = pass.placements.len(),
            failed = pass.failures.len(),
            "scheduling pass finished"
        );

        Ok(SchedulingOutcome {
            placements: pass.placements,
            unscheduled: pass.unscheduled,
            failures: pass.failures,
            suggestions,
        })
    }
}

/// One-shot convenience wrapper around [`Scheduler`].
///
/// # Errors
/// Configuration and input errors, as for [`Scheduler::new`] and
/// [`Scheduler::schedule_all`].
pub fn schedule_all(
    items: &[SchedulableItem],
    config: &SchedulerConfig,
    existing: &[ExistingInterval],
    now: DateTime<Utc>,
) -> Result<SchedulingOutcome> {
    Scheduler::new(config.clone())?.schedule_all(items, existing, now)
}

/// Accumulator threaded through the fold.
struct Pass {
    conflicts: ConflictSet,
    placements: Vec<Placement>,
    unscheduled: Vec<String>,
    failures: Vec<PlacementFailure>,
}

impl Pass {
    fn new(conflicts: ConflictSet) -> Self {
        Self {
            conflicts,
            placements: Vec::new(),
            unscheduled: Vec::new(),
            failures: Vec::new(),
        }
    }

    fn attempt(self, scheduler: &Scheduler, ranked: &RankedItem<'_>, now: DateTime<Utc>) -> Self {
        let item = ranked.item;
        let config = &scheduler.config;

        let missing: Vec<String> = item
            .dependencies
            .iter()
            .filter(|dep| !self.conflicts.has_item(dep))
            .cloned()
            .collect();
        if !missing.is_empty() {
            return self.fail(
                item,
                FailureReason::DependenciesNotSatisfied { missing },
                None,
            );
        }

        let window = slots::search_window(item, now, config.search_horizon_days);
        let candidates =
            slots::candidate_slots(item, window, config, scheduler.tz, &self.conflicts);

        let Some((slot, score)) =
            scoring::select_best(item, &candidates, &self.conflicts, scheduler.tz)
        else {
            let suggested = suggest::fallback_time(window.start, config.suggestion_hour, scheduler.tz);
            return self.fail(item, FailureReason::NoAvailableSlot, suggested);
        };

        let confidence = scoring::confidence(item, slot.start, scheduler.tz);
        tracing::debug!(
            item = %item.id,
            rank = ranked.score,
            start = %slot.start,
            score,
            confidence,
            candidates = candidates.len(),
            "committed placement"
        );

        let Pass {
            conflicts,
            mut placements,
            unscheduled,
            failures,
        } = self;

        // The buffer travels with the committed interval so later items keep clear of it.
        let conflicts = conflicts.with(BusyInterval {
            start: slot.start,
            end: slot.end + Duration::minutes(i64::from(config.buffer_minutes)),
            item_id: Some(item.id.clone()),
        });
        placements.push(Placement {
            item_id: item.id.clone(),
            title: item.title.clone(),
            start: slot.start,
            end: slot.end,
            confidence,
        });

        Pass {
            conflicts,
            placements,
            unscheduled,
            failures,
        }
    }

    fn fail(
        mut self,
        item: &SchedulableItem,
        reason: FailureReason,
        suggested_time: Option<DateTime<Utc>>,
    ) -> Self {
        tracing::debug!(item = %item.id, %reason, "placement failed");
        self.unscheduled.push(item.id.clone());
        self.failures
            .push(PlacementFailure::new(item.id.clone(), reason, suggested_time));
        self
    }
}

fn validate_items(items: &[SchedulableItem]) -> Result<()> {
    let mut seen = HashSet::new();
    for item in items {
        if item.id.trim().is_empty() {
            return Err(ScheduleError::InvalidItem {
                id: item.id.clone(),
                reason: "missing id".to_string(),
            });
        }
        if !seen.insert(item.id.as_str()) {
            return Err(ScheduleError::InvalidItem {
                id: item.id.clone(),
                reason: "duplicate id".to_string(),
            });
        }
        if item.estimated_minutes == 0 {
            return Err(ScheduleError::InvalidItem {
                id: item.id.clone(),
                reason: "estimated duration must be positive".to_string(),
            });
        }
        if item.dependencies.iter().any(|dep| *dep == item.id) {
            return Err(ScheduleError::InvalidItem {
                id: item.id.clone(),
                reason: "item depends on itself".to_string(),
            });
        }
    }
    Ok(())
}

fn validate_intervals(existing: &[ExistingInterval]) -> Result<()> {
    for interval in existing {
        if interval.id.trim().is_empty() {
            return Err(ScheduleError::InvalidInterval {
                id: interval.id.clone(),
                reason: "missing id".to_string(),
            });
        }
        if interval.end <= interval.start {
            return Err(ScheduleError::InvalidInterval {
                id: interval.id.clone(),
                reason: format!(
                    "end {} is not after start {}",
                    interval.end.to_rfc3339(),
                    interval.start.to_rfc3339()
                ),
            });
        }
    }
    Ok(())
}
