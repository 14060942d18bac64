use crate::consts::{
    CENTURY_CYCLE, DAYS_IN_MONTH, DAY_NAMES_SHORT, FEBRUARY, FEBRUARY_DAYS_LEAP, GREGORIAN_CYCLE,
    LEAP_YEAR_CYCLE, MAX_MONTH, MIN_DAY, MONTH_NAMES,
};
use crate::{CalendarDate, DateError};
use std::fmt;

/// Day of the week. Indexed 0=Sunday..6=Saturday, the convention the
/// grid-padding rule is written against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Weekday {
    Sunday,
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
}

impl Weekday {
    /// Creates a weekday from a 0=Sunday..6=Saturday index (taken mod 7)
    pub const fn from_index(index: u8) -> Self {
        match index % 7 {
            0 => Self::Sunday,
            1 => Self::Monday,
            2 => Self::Tuesday,
            3 => Self::Wednesday,
            4 => Self::Thursday,
            5 => Self::Friday,
            _ => Self::Saturday,
        }
    }

    /// Returns the 0=Sunday..6=Saturday index
    #[inline]
    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Distance from Monday in a Monday-first week row.
    /// This is the leading-padding count for a month starting on `self`:
    /// Sunday maps to 6, every other day to `index - 1`.
    pub const fn days_from_monday(self) -> u8 {
        match self {
            Self::Sunday => 6,
            other => other.index() - 1,
        }
    }

    /// Two-letter column header ("Po".."Ne")
    pub const fn short_name(self) -> &'static str {
        DAY_NAMES_SHORT[self.days_from_monday() as usize]
    }
}

/// A calendar month of a specific year: what one picker dropdown displays.
/// Month is guaranteed to be in `1..=12`; the year is unconstrained so the
/// grid can be paged arbitrarily far in either direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u8,
}

impl YearMonth {
    /// Creates a new `YearMonth`, validating the month.
    ///
    /// # Errors
    /// Returns `DateError::InvalidMonth` if the month is 0 or > `MAX_MONTH`.
    pub fn new(year: i32, month: u8) -> Result<Self, DateError> {
        if !(1..=MAX_MONTH).contains(&month) {
            return Err(DateError::InvalidMonth(month));
        }
        Ok(Self { year, month })
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

    /// Shifts by `delta` whole months, wrapping year boundaries naturally:
    /// one month back from January of year Y is December of year Y-1.
    pub fn shift(self, delta: i32) -> Self {
        let total = i64::from(self.year) * 12 + i64::from(self.month) - 1 + i64::from(delta);
        Self {
            year: total.div_euclid(12) as i32,
            month: (total.rem_euclid(12) + 1) as u8,
        }
    }

    /// First day of this month
    pub const fn first_day(self) -> CalendarDate {
        CalendarDate::from_parts(self.year, self.month, MIN_DAY)
    }

    /// Number of days in this month
    pub const fn days(self) -> u8 {
        days_in_month(self.year, self.month)
    }
}

impl From<CalendarDate> for YearMonth {
    fn from(date: CalendarDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", MONTH_NAMES[self.month as usize], self.year)
    }
}

// Helper functions

pub const fn is_leap_year(year: i32) -> bool {
    (year % LEAP_YEAR_CYCLE == 0 && year % CENTURY_CYCLE != 0) || (year % GREGORIAN_CYCLE == 0)
}

pub const fn days_in_month(year: i32, month: u8) -> u8 {
    debug_assert!(month != 0 && month <= MAX_MONTH);

    if month == FEBRUARY && is_leap_year(year) {
        FEBRUARY_DAYS_LEAP
    } else {
        DAYS_IN_MONTH[month as usize]
    }
}
