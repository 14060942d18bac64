mod consts;
mod form;
mod picker;
mod prelude;
mod types;

pub use consts::*;
pub use form::{
    Accommodation, DateRole, DismissHandle, LogSink, Notice, ReservationDraft, ReservationForm,
    SubmissionSink, ValidationError,
};
pub use picker::{month_grid, sanitize_input, DateField, DayCell, MonthGrid, PointerWatch, WatchId};
pub use types::{days_in_month, is_leap_year, Weekday, YearMonth};

use crate::prelude::*;
use std::str::FromStr;

/// A plain calendar date. No time-of-day component is modeled: comparisons
/// are whole-day comparisons, which is exactly the granularity the picker
/// and the form rules need.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate {
    year: i32,
    month: u8,
    day: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum DateError {
    #[display(fmt = "Invalid date format: {_0}")]
    InvalidFormat(String),
    #[display(fmt = "Invalid year: {} (must be {}-{})", "_0", MIN_YEAR, MAX_YEAR)]
    InvalidYear(i32),
    #[display(fmt = "Invalid month: {} (must be 1-{})", "_0", MAX_MONTH)]
    InvalidMonth(u8),
    #[display(fmt = "Invalid day {day} for month {year}-{month:02}")]
    InvalidDay { year: i32, month: u8, day: u8 },
}

impl std::error::Error for DateError {}

impl CalendarDate {
    /// Creates a date, validating every component against the real calendar.
    ///
    /// # Errors
    /// Returns the matching `DateError` variant if the year is outside
    /// `MIN_YEAR..=MAX_YEAR`, the month is outside `1..=12`, or the day does
    /// not exist in that month.
    pub fn new(year: i32, month: u8, day: u8) -> Result<Self, DateError> {
        if !(MIN_YEAR..=MAX_YEAR).contains(&year) {
            return Err(DateError::InvalidYear(year));
        }
        if !(1..=MAX_MONTH).contains(&month) {
            return Err(DateError::InvalidMonth(month));
        }
        if day < MIN_DAY || day > types::days_in_month(year, month) {
            return Err(DateError::InvalidDay { year, month, day });
        }
        Ok(Self { year, month, day })
    }

    /// Internal constructor. Callers uphold month/day validity; the year is
    /// deliberately unconstrained so grid paging can leave `1..=MAX_YEAR`.
    pub(crate) const fn from_parts(year: i32, month: u8, day: u8) -> Self {
        Self { year, month, day }
    }

    /// Returns the year
    #[inline]
    pub const fn year(self) -> i32 {
        self.year
    }

    /// Returns the month (1..=12)
    #[inline]
    pub const fn month(self) -> u8 {
        self.month
    }

    /// Returns the day of month
    #[inline]
    pub const fn day(self) -> u8 {
        self.day
    }

    /// Resolves possibly out-of-range components into a concrete date the
    /// way ECMAScript `Date` construction does: month 0 is December of the
    /// previous year, day 0 is the last day of the previous month, and
    /// overlarge values roll forward ("31.06." resolves to July 1st).
    ///
    /// Total over its whole input range; years that leave the `i32` domain
    /// are clamped.
    pub fn resolve(year: i64, month: i64, day: i64) -> Self {
        let month0 = i128::from(month) - 1;
        let year = i128::from(year) + month0.div_euclid(12);
        let month = (month0.rem_euclid(12) + 1) as u8;
        let days = days_from_civil(year, month, 1) + i128::from(day) - 1;
        let (year, month, day) = civil_from_days(days);
        Self {
            year: year.clamp(i128::from(i32::MIN), i128::from(i32::MAX)) as i32,
            month,
            day,
        }
    }

    /// Parses the textual field format: day, month and year separated by
    /// dots ("DD.MM.YYYY"). Wrong segment count or a non-numeric segment
    /// yields `None`; out-of-range day and month components are NOT
    /// rejected but resolved via [`Self::resolve`]. The resolved year must
    /// land in `MIN_YEAR..=MAX_YEAR`.
    pub fn parse_text(s: &str) -> Option<Self> {
        let parts: Vec<&str> = s.split(DATE_SEPARATOR).collect();
        if parts.len() != 3 {
            return None;
        }
        let day = parts[0].parse::<i64>().ok()?;
        let month = parts[1].parse::<i64>().ok()?;
        let year = parts[2].parse::<i64>().ok()?;

        let resolved = Self::resolve(year, month, day);
        (MIN_YEAR..=MAX_YEAR)
            .contains(&resolved.year)
            .then_some(resolved)
    }

    /// The following calendar day
    pub fn next_day(self) -> Self {
        let days = days_from_civil(i128::from(self.year), self.month, self.day);
        let (year, month, day) = civil_from_days(days + 1);
        Self {
            year: year as i32,
            month,
            day,
        }
    }

    /// Day of the week this date falls on
    pub fn weekday(self) -> Weekday {
        let days = days_from_civil(i128::from(self.year), self.month, self.day);
        // day 0 of the civil count (1970-01-01) was a Thursday
        Weekday::from_index((days + 4).rem_euclid(7) as u8)
    }

    /// The month this date belongs to
    pub fn year_month(self) -> YearMonth {
        YearMonth::from(self)
    }
}

// --- civil-day arithmetic helpers ---
// Days are counted from 1970-01-01. Math runs in i128 so that resolving
// absurd typed-in components can never overflow.

fn days_from_civil(year: i128, month: u8, day: u8) -> i128 {
    let year = if month <= 2 { year - 1 } else { year };
    let era = year.div_euclid(400);
    let yoe = year - era * 400;
    let mp = (i128::from(month) + 9) % 12;
    let doy = (153 * mp + 2) / 5 + i128::from(day) - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146097 + doe - 719_468
}

fn civil_from_days(days: i128) -> (i128, u8, u8) {
    let z = days + 719_468;
    let era = z.div_euclid(146_097);
    let doe = z - era * 146_097;
    let yoe = (doe - doe / 1460 + doe / 36524 - doe / 146_096) / 365;
    let year = yoe + era * 400;
    let doy = doe - (365 * yoe + yoe / 4 - yoe / 100);
    let mp = (5 * doy + 2) / 153;
    let day = (doy - (153 * mp + 2) / 5 + 1) as u8;
    let month = (if mp < 10 { mp + 3 } else { mp - 9 }) as u8;
    (if month <= 2 { year + 1 } else { year }, month, day)
}

impl std::fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:02}.{:02}.{:04}", self.day, self.month, self.year)
    }
}

impl FromStr for CalendarDate {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_text(s).ok_or_else(|| DateError::InvalidFormat(s.to_owned()))
    }
}

impl serde::Serialize for CalendarDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> serde::Deserialize<'de> for CalendarDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
