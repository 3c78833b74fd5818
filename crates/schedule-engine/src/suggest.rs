//! Advisory output: fallback times for failed items and post-pass suggestions.

use chrono::{DateTime, Duration, NaiveTime, Utc};
use chrono_tz::Tz;
use serde_json::json;

use crate::calendar;
use crate::model::{SchedulableItem, Suggestion, SuggestionKind};

/// The day after `from` at `hour:00` local time.
///
/// This is a plain heuristic. It is not checked against working hours or the
/// conflict set.
pub fn fallback_time(from: DateTime<Utc>, hour: u32, tz: Tz) -> Option<DateTime<Utc>> {
    let next_day = calendar::local_date(from, tz) + Duration::days(1);
    let time = NaiveTime::from_hms_opt(hour, 0, 0)?;
    calendar::resolve_local(tz, next_day.and_time(time))
}

/// Suggestions emitted once every item has been attempted.
///
/// `items` is the caller's full list, rigid items included.
pub fn post_pass_suggestions(
    failed_count: usize,
    items: &[SchedulableItem],
    now: DateTime<Utc>,
) -> Vec<Suggestion> {
    let mut suggestions = Vec::new();

    if failed_count > 0 {
        suggestions.push(Suggestion {
            kind: SuggestionKind::ExtendHours,
            message: format!(
                "{} item(s) could not be scheduled; consider extending working hours or reducing the workload",
                failed_count
            ),
            data: json!({ "failed_count": failed_count }),
        });
    }

    let overdue_count = items.iter().filter(|item| item.is_overdue(now)).count();
    if overdue_count > 0 {
        suggestions.push(Suggestion {
            kind: SuggestionKind::ReviewDeadlines,
            message: format!(
                "{} item(s) are past their deadline; review their deadlines or priorities",
                overdue_count
            ),
            data: json!({ "overdue_count": overdue_count }),
        });
    }

    suggestions
}
