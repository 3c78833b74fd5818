//! Scheduler configuration: working hours per weekday, buffer, time zone.
//!
//! The struct is plain serde data so callers can load it from TOML, JSON or
//! environment variables. [`SchedulerConfig::validate`] turns it into
//! something the engine can trust.

use chrono::{NaiveTime, Weekday};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScheduleError};

/// A `[start, end)` working window in local wall-clock time.
///
/// An `end` of midnight (written `"24:00"`) closes the window at the end of
/// the day, so `22:00`-`24:00` is a valid late shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkingHours {
    #[serde(with = "hhmm")]
    pub start: NaiveTime,
    #[serde(with = "hhmm::end_of_day")]
    pub end: NaiveTime,
}

impl WorkingHours {
    /// Build from whole hours and minutes. `24:00` is accepted as the end.
    /// Returns `None` for out-of-range values.
    pub fn new(start_hour: u32, start_min: u32, end_hour: u32, end_min: u32) -> Option<Self> {
        let end = if (end_hour, end_min) == (24, 0) {
            NaiveTime::MIN
        } else {
            NaiveTime::from_hms_opt(end_hour, end_min, 0)?
        };
        Some(Self {
            start: NaiveTime::from_hms_opt(start_hour, start_min, 0)?,
            end,
        })
    }

    /// True when the window runs until the following midnight.
    pub fn ends_at_midnight(&self) -> bool {
        self.end == NaiveTime::MIN
    }
}

/// Optional working hours for each day of the week. `None` means a day off.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkWeek {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub monday: Option<WorkingHours>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tuesday: Option<WorkingHours>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wednesday: Option<WorkingHours>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thursday: Option<WorkingHours>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub friday: Option<WorkingHours>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saturday: Option<WorkingHours>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sunday: Option<WorkingHours>,
}

impl WorkWeek {
    /// Same hours Monday through Friday, weekends off.
    pub fn weekdays(hours: WorkingHours) -> Self {
        Self {
            monday: Some(hours),
            tuesday: Some(hours),
            wednesday: Some(hours),
            thursday: Some(hours),
            friday: Some(hours),
            saturday: None,
            sunday: None,
        }
    }

    /// Same hours on all seven days.
    pub fn every_day(hours: WorkingHours) -> Self {
        Self {
            saturday: Some(hours),
            sunday: Some(hours),
            ..Self::weekdays(hours)
        }
    }

    pub fn hours_for(&self, weekday: Weekday) -> Option<&WorkingHours> {
        self.slot(weekday).as_ref()
    }

    pub fn set(&mut self, weekday: Weekday, hours: Option<WorkingHours>) {
        *self.slot_mut(weekday) = hours;
    }

    /// Configured days in Monday-first order.
    pub fn days(&self) -> impl Iterator<Item = (Weekday, &WorkingHours)> {
        ALL_WEEKDAYS
            .iter()
            .filter_map(move |&day| self.hours_for(day).map(|hours| (day, hours)))
    }

    fn slot(&self, weekday: Weekday) -> &Option<WorkingHours> {
        match weekday {
            Weekday::Mon => &self.monday,
            Weekday::Tue => &self.tuesday,
            Weekday::Wed => &self.wednesday,
            Weekday::Thu => &self.thursday,
            Weekday::Fri => &self.friday,
            Weekday::Sat => &self.saturday,
            Weekday::Sun => &self.sunday,
        }
    }

    fn slot_mut(&mut self, weekday: Weekday) -> &mut Option<WorkingHours> {
        match weekday {
            Weekday::Mon => &mut self.monday,
            Weekday::Tue => &mut self.tuesday,
            Weekday::Wed => &mut self.wednesday,
            Weekday::Thu => &mut self.thursday,
            Weekday::Fri => &mut self.friday,
            Weekday::Sat => &mut self.saturday,
            Weekday::Sun => &mut self.sunday,
        }
    }
}

const ALL_WEEKDAYS: [Weekday; 7] = [
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
    Weekday::Sun,
];

/// Upper bound for `search_horizon_days`, roughly ten years.
pub const MAX_SEARCH_HORIZON_DAYS: u32 = 3660;

/// Engine configuration. Missing fields fall back to [`Default`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchedulerConfig {
    pub working_hours: WorkWeek,
    /// Minimum gap after each placement before the next one may start.
    pub buffer_minutes: u32,
    /// IANA time zone the working hours are expressed in.
    pub timezone: String,
    /// Granularity of the candidate walk inside a working window.
    pub slot_step_minutes: u32,
    /// Search window length for items without a deadline.
    pub search_horizon_days: u32,
    /// Local hour used for the advisory time attached to failures.
    pub suggestion_hour: u32,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            working_hours: WorkWeek::weekdays(WorkingHours {
                start: NaiveTime::from_hms_opt(9, 0, 0).unwrap_or_default(),
                end: NaiveTime::from_hms_opt(17, 0, 0).unwrap_or_default(),
            }),
            buffer_minutes: 15,
            timezone: "UTC".to_string(),
            slot_step_minutes: 15,
            search_horizon_days: 14,
            suggestion_hour: 9,
        }
    }
}

impl SchedulerConfig {
    pub fn with_working_hours(mut self, working_hours: WorkWeek) -> Self {
        self.working_hours = working_hours;
        self
    }

    pub fn with_buffer_minutes(mut self, buffer_minutes: u32) -> Self {
        self.buffer_minutes = buffer_minutes;
        self
    }

    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = timezone.into();
        self
    }

    /// Check every field and resolve the time zone.
    ///
    /// # Errors
    /// Returns `ScheduleError::InvalidTimezone` for an unknown IANA name and
    /// `ScheduleError::InvalidConfig` when no weekday has usable working hours,
    /// a window ends before it starts, or a numeric setting is out of range.
    pub fn validate(&self) -> Result<Tz> {
        let tz: Tz = self
            .timezone
            .parse()
            .map_err(|_| ScheduleError::InvalidTimezone(self.timezone.clone()))?;

        for (day, hours) in self.working_hours.days() {
            if hours.end <= hours.start && !hours.ends_at_midnight() {
                return Err(ScheduleError::InvalidConfig(format!(
                    "working hours for {} end ({}) at or before start ({})",
                    day,
                    hours.end.format("%H:%M"),
                    hours.start.format("%H:%M")
                )));
            }
        }

        if self.working_hours.days().next().is_none() {
            return Err(ScheduleError::InvalidConfig(
                "no working hours configured for any weekday".to_string(),
            ));
        }

        if self.slot_step_minutes == 0 || self.slot_step_minutes > 24 * 60 {
            return Err(ScheduleError::InvalidConfig(format!(
                "slot_step_minutes must be between 1 and 1440, got {}",
                self.slot_step_minutes
            )));
        }

        // Shorter horizons could miss every configured weekday.
        if !(7..=MAX_SEARCH_HORIZON_DAYS).contains(&self.search_horizon_days) {
            return Err(ScheduleError::InvalidConfig(format!(
                "search_horizon_days must be between 7 and {}, got {}",
                MAX_SEARCH_HORIZON_DAYS, self.search_horizon_days
            )));
        }

        if self.suggestion_hour >= 24 {
            return Err(ScheduleError::InvalidConfig(format!(
                "suggestion_hour must be below 24, got {}",
                self.suggestion_hour
            )));
        }

        Ok(tz)
    }
}

/// `"HH:MM"` (seconds optional on input) for working-hour boundaries.
mod hhmm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(time: &NaiveTime, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&time.format("%H:%M").to_string())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveTime, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).map_err(serde::de::Error::custom)
    }

    fn parse(raw: &str) -> Result<NaiveTime, String> {
        NaiveTime::parse_from_str(raw, "%H:%M")
            .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
            .map_err(|e| format!("invalid time '{}': {}", raw, e))
    }

    /// Like the parent format, but midnight reads and writes as `"24:00"`.
    pub mod end_of_day {
        use chrono::NaiveTime;
        use serde::{Deserialize, Deserializer, Serializer};

        pub fn serialize<S: Serializer>(
            time: &NaiveTime,
            serializer: S,
        ) -> Result<S::Ok, S::Error> {
            if *time == NaiveTime::MIN {
                serializer.serialize_str("24:00")
            } else {
                super::serialize(time, serializer)
            }
        }

        pub fn deserialize<'de, D: Deserializer<'de>>(
            deserializer: D,
        ) -> Result<NaiveTime, D::Error> {
            let raw = String::deserialize(deserializer)?;
            match raw.as_str() {
                "24:00" | "24:00:00" => Ok(NaiveTime::MIN),
                _ => super::parse(&raw).map_err(serde::de::Error::custom),
            }
        }
    }
}
