//! Property-based tests for the placement invariants using proptest.
//!
//! These hold for *any* batch, not just the hand-picked scenarios in
//! `scheduler_tests.rs`: no overlaps, exact durations, working-hours
//! containment, dependency ordering and determinism.

use chrono::{DateTime, Duration, TimeZone, Utc};
use proptest::prelude::*;
use schedule_engine::{
    schedule_all, verify_outcome, ExistingInterval, FailureReason, Priority, SchedulableItem,
    SchedulerConfig,
};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 16, 7, 30, 0).unwrap()
}

fn arb_priority() -> impl Strategy<Value = Priority> {
    prop_oneof![
        Just(Priority::Low),
        Just(Priority::Medium),
        Just(Priority::High),
    ]
}

/// Deadline offset in hours from "now"; negative values are already overdue.
fn arb_deadline() -> impl Strategy<Value = Option<i64>> {
    prop::option::of(-12i64..=24 * 10)
}

/// (priority, minutes, deadline offset, dependency index)
fn arb_item_shape() -> impl Strategy<Value = (Priority, u32, Option<i64>, Option<usize>)> {
    (
        arb_priority(),
        prop_oneof![Just(15u32), Just(30), Just(45), Just(60), Just(90), Just(150)],
        arb_deadline(),
        prop::option::of(0usize..8),
    )
}

fn arb_items() -> impl Strategy<Value = Vec<SchedulableItem>> {
    prop::collection::vec(arb_item_shape(), 0..8).prop_map(|shapes| {
        let count = shapes.len();
        shapes
            .into_iter()
            .enumerate()
            .map(|(i, (priority, minutes, deadline, dep))| {
                let mut item =
                    SchedulableItem::new(format!("item-{}", i), format!("Item {}", i), priority, minutes, now());
                if let Some(hours) = deadline {
                    item = item.with_deadline(now() + Duration::hours(hours));
                }
                if let Some(dep) = dep.filter(|d| *d < count && *d != i) {
                    item = item.with_dependencies([format!("item-{}", dep)]);
                }
                item
            })
            .collect()
    })
}

/// Existing intervals on the first two weeks, 30–240 minutes long.
fn arb_existing() -> impl Strategy<Value = Vec<ExistingInterval>> {
    prop::collection::vec((0i64..14, 6u32..20, 0u32..4, 30i64..=240), 0..10).prop_map(|shapes| {
        shapes
            .into_iter()
            .enumerate()
            .map(|(i, (day, hour, quarter, minutes))| {
                let start = Utc
                    .with_ymd_and_hms(2026, 3, 16, hour, quarter * 15, 0)
                    .unwrap()
                    + Duration::days(day);
                ExistingInterval::new(format!("evt-{}", i), start, start + Duration::minutes(minutes))
            })
            .collect()
    })
}

fn arb_buffer() -> impl Strategy<Value = u32> {
    prop_oneof![Just(0u32), Just(10), Just(15), Just(30)]
}

// ---------------------------------------------------------------------------
// Properties
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// No overlaps, exact durations and working-hours containment.
    #[test]
    fn placements_satisfy_invariants(
        items in arb_items(),
        existing in arb_existing(),
        buffer in arb_buffer(),
    ) {
        let config = SchedulerConfig::default().with_buffer_minutes(buffer);
        let outcome = schedule_all(&items, &config, &existing, now()).unwrap();

        let violations = verify_outcome(&outcome, &items, &existing, &config).unwrap();
        prop_assert!(violations.is_empty(), "violations: {:?}", violations);
    }

    /// Every flexible item ends up either placed or failed, never both.
    #[test]
    fn every_item_is_accounted_for(
        items in arb_items(),
        existing in arb_existing(),
    ) {
        let outcome = schedule_all(&items, &SchedulerConfig::default(), &existing, now()).unwrap();

        prop_assert_eq!(outcome.placements.len() + outcome.failures.len(), items.len());
        prop_assert_eq!(outcome.unscheduled.len(), outcome.failures.len());
        for placement in &outcome.placements {
            prop_assert!(outcome.failure_for(&placement.item_id).is_none());
            prop_assert!((0.0..=1.0).contains(&placement.confidence));
        }
    }

    /// A placed item's dependencies were placed before it.
    #[test]
    fn dependencies_precede_dependents(
        items in arb_items(),
        existing in arb_existing(),
    ) {
        let outcome = schedule_all(&items, &SchedulerConfig::default(), &existing, now()).unwrap();

        for (index, placement) in outcome.placements.iter().enumerate() {
            let item = items.iter().find(|i| i.id == placement.item_id).unwrap();
            for dep in &item.dependencies {
                let earlier = outcome.placements[..index].iter().any(|p| &p.item_id == dep);
                prop_assert!(earlier, "{} placed before its dependency {}", item.id, dep);
            }
        }
        for failure in &outcome.failures {
            if let FailureReason::DependenciesNotSatisfied { missing } = &failure.reason {
                prop_assert!(!missing.is_empty());
                prop_assert!(failure.suggested_time.is_none());
            }
        }
    }

    /// Same inputs, same "now": byte-identical outcome.
    #[test]
    fn scheduling_is_deterministic(
        items in arb_items(),
        existing in arb_existing(),
        buffer in arb_buffer(),
    ) {
        let config = SchedulerConfig::default().with_buffer_minutes(buffer);
        let first = schedule_all(&items, &config, &existing, now()).unwrap();
        let second = schedule_all(&items, &config, &existing, now()).unwrap();

        prop_assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    /// Consecutive placements keep at least the configured buffer between them.
    #[test]
    fn buffer_is_enforced_between_placements(
        items in arb_items(),
        buffer in arb_buffer(),
    ) {
        let config = SchedulerConfig::default().with_buffer_minutes(buffer);
        let outcome = schedule_all(&items, &config, &[], now()).unwrap();

        let mut placed = outcome.placements.clone();
        placed.sort_by_key(|p| p.start);
        for pair in placed.windows(2) {
            let gap = pair[1].start - pair[0].end;
            prop_assert!(gap >= Duration::minutes(i64::from(buffer)));
        }
    }
}
