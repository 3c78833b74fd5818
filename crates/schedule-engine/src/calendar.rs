//! Wall-clock helpers: map per-weekday working hours onto UTC instants.
//!
//! Local times that fall into a DST gap are shifted forward by one hour;
//! ambiguous local times (DST fall-back) resolve to the earlier instant.

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, TimeZone, Timelike, Utc};
use chrono_tz::Tz;

use crate::config::WorkWeek;

/// A working window on one local date, as UTC instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayWindow {
    pub date: NaiveDate,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DayWindow {
    pub fn contains(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
        start >= self.start && end <= self.end
    }
}

/// Resolve a local wall-clock time in `tz` to a UTC instant.
pub fn resolve_local(tz: Tz, naive: NaiveDateTime) -> Option<DateTime<Utc>> {
    tz.from_local_datetime(&naive)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(naive + Duration::hours(1))).earliest())
        .map(|dt| dt.with_timezone(&Utc))
}

/// The working window for `date`, or `None` on a day off.
pub fn working_window(week: &WorkWeek, tz: Tz, date: NaiveDate) -> Option<DayWindow> {
    let hours = week.hours_for(date.weekday())?;
    let start = resolve_local(tz, date.and_time(hours.start))?;
    let end_date = if hours.ends_at_midnight() {
        date.succ_opt()?
    } else {
        date
    };
    let end = resolve_local(tz, end_date.and_time(hours.end))?;
    if end <= start {
        tracing::trace!(%date, "working window collapsed by DST transition");
        return None;
    }
    Some(DayWindow { date, start, end })
}

pub fn local_date(instant: DateTime<Utc>, tz: Tz) -> NaiveDate {
    instant.with_timezone(&tz).date_naive()
}

pub fn local_hour(instant: DateTime<Utc>, tz: Tz) -> u32 {
    instant.with_timezone(&tz).hour()
}

/// True when `[start, end)` lies inside the working window of `start`'s local date.
pub fn within_working_hours(
    week: &WorkWeek,
    tz: Tz,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> bool {
    working_window(week, tz, local_date(start, tz)).is_some_and(|window| window.contains(start, end))
}
