//! Tests for outcome verification.

use chrono::{DateTime, TimeZone, Utc};
use schedule_engine::{
    verify_outcome, ExistingInterval, Placement, Priority, SchedulableItem, SchedulerConfig,
    SchedulingOutcome, Violation,
};

fn at(hour: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 16, hour, min, 0).unwrap()
}

fn item(id: &str, minutes: u32) -> SchedulableItem {
    SchedulableItem::new(id, id, Priority::Medium, minutes, at(8, 0))
}

fn placement(id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Placement {
    Placement {
        item_id: id.to_string(),
        title: id.to_string(),
        start,
        end,
        confidence: 0.7,
    }
}

fn outcome(placements: Vec<Placement>) -> SchedulingOutcome {
    SchedulingOutcome {
        placements,
        ..SchedulingOutcome::default()
    }
}

#[test]
fn clean_outcome_has_no_violations() {
    let items = vec![item("a", 60), item("b", 30)];
    let result = outcome(vec![
        placement("a", at(9, 0), at(10, 0)),
        placement("b", at(10, 0), at(10, 30)),
    ]);

    let violations = verify_outcome(&result, &items, &[], &SchedulerConfig::default()).unwrap();

    assert!(violations.is_empty());
}

#[test]
fn overlapping_placements_are_reported() {
    let items = vec![item("a", 60), item("b", 60)];
    let result = outcome(vec![
        placement("a", at(9, 0), at(10, 0)),
        placement("b", at(9, 30), at(10, 30)),
    ]);

    let violations = verify_outcome(&result, &items, &[], &SchedulerConfig::default()).unwrap();

    assert_eq!(
        violations,
        vec![Violation::Overlap {
            first: "a".to_string(),
            second: "b".to_string(),
            overlap_minutes: 30,
        }]
    );
}

#[test]
fn overlap_with_existing_interval_is_reported() {
    let items = vec![item("a", 60)];
    let existing = vec![ExistingInterval::new("meeting", at(9, 45), at(11, 0))];
    let result = outcome(vec![placement("a", at(9, 0), at(10, 0))]);

    let violations =
        verify_outcome(&result, &items, &existing, &SchedulerConfig::default()).unwrap();

    assert_eq!(violations.len(), 1);
    assert_eq!(
        violations[0].to_string(),
        "'a' overlaps 'existing:meeting' by 15 minutes"
    );
}

#[test]
fn wrong_duration_and_working_hours_are_reported() {
    let items = vec![item("short", 60), item("late", 60)];
    let result = outcome(vec![
        placement("short", at(9, 0), at(9, 45)),
        placement("late", at(16, 30), at(17, 30)),
    ]);

    let violations = verify_outcome(&result, &items, &[], &SchedulerConfig::default()).unwrap();

    assert!(violations.contains(&Violation::DurationMismatch {
        item_id: "short".to_string(),
        expected_minutes: 60,
        actual_minutes: 45,
    }));
    assert!(violations.contains(&Violation::OutsideWorkingHours {
        item_id: "late".to_string(),
        start: at(16, 30),
        end: at(17, 30),
    }));
    assert_eq!(violations.len(), 2);
}

#[test]
fn unknown_item_is_reported() {
    let result = outcome(vec![placement("ghost", at(9, 0), at(10, 0))]);

    let violations = verify_outcome(&result, &[], &[], &SchedulerConfig::default()).unwrap();

    assert_eq!(
        violations,
        vec![Violation::UnknownItem {
            item_id: "ghost".to_string()
        }]
    );
}
