//! Monday-start week arithmetic for the meal plan.
//!
//! # Responsibility
//! - Map any date to its containing ISO week (Monday..Sunday).
//! - Provide week navigation and the fixed 7-slot day grid.
//!
//! # Invariants
//! - A `Week` always spans exactly seven representable dates.
//! - Navigation is a plain ±7 day shift; month and year boundaries need no
//!   special handling.
//! - Nothing here touches storage; an empty week is still a full grid.

use chrono::{Datelike, Days, NaiveDate, Utc, Weekday};
use serde::Serialize;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Number of day slots in a week view.
pub const DAYS_PER_WEEK: usize = 7;

const DATE_PARAM_FORMAT: &str = "%Y-%m-%d";

/// Week arithmetic left the range chrono can represent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarError {
    OutOfRange { date: NaiveDate },
}

impl Display for CalendarError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::OutOfRange { date } => {
                write!(f, "week around {date} is outside the supported calendar range")
            }
        }
    }
}

impl Error for CalendarError {}

/// Monday-to-Sunday span used as the unit of calendar navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Week {
    start: NaiveDate,
    end: NaiveDate,
}

/// One of the seven fixed slots of a week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DaySlot {
    pub date: NaiveDate,
    pub weekday: Weekday,
}

impl DaySlot {
    /// English weekday name, e.g. `Monday`.
    pub fn day_name(&self) -> &'static str {
        match self.weekday {
            Weekday::Mon => "Monday",
            Weekday::Tue => "Tuesday",
            Weekday::Wed => "Wednesday",
            Weekday::Thu => "Thursday",
            Weekday::Fri => "Friday",
            Weekday::Sat => "Saturday",
            Weekday::Sun => "Sunday",
        }
    }
}

impl Week {
    /// Week containing `date`.
    pub fn containing(date: NaiveDate) -> Result<Self, CalendarError> {
        let offset = u64::from(date.weekday().num_days_from_monday());
        let start = date
            .checked_sub_days(Days::new(offset))
            .ok_or(CalendarError::OutOfRange { date })?;
        Self::from_monday(start)
    }

    fn from_monday(start: NaiveDate) -> Result<Self, CalendarError> {
        let end = start
            .checked_add_days(Days::new(DAYS_PER_WEEK as u64 - 1))
            .ok_or(CalendarError::OutOfRange { date: start })?;
        Ok(Self { start, end })
    }

    /// Monday of this week.
    pub fn start(&self) -> NaiveDate {
        self.start
    }

    /// Sunday of this week.
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// The week starting seven days earlier.
    pub fn previous(&self) -> Result<Self, CalendarError> {
        let start = self
            .start
            .checked_sub_days(Days::new(DAYS_PER_WEEK as u64))
            .ok_or(CalendarError::OutOfRange { date: self.start })?;
        Self::from_monday(start)
    }

    /// The week starting seven days later.
    pub fn next(&self) -> Result<Self, CalendarError> {
        let start = self
            .start
            .checked_add_days(Days::new(DAYS_PER_WEEK as u64))
            .ok_or(CalendarError::OutOfRange { date: self.start })?;
        Self::from_monday(start)
    }

    /// The seven day slots, Monday first.
    pub fn days(&self) -> [DaySlot; DAYS_PER_WEEK] {
        // `end` was checked at construction, so every offset is representable.
        std::array::from_fn(|offset| {
            let date = self.start + Days::new(offset as u64);
            DaySlot {
                date,
                weekday: date.weekday(),
            }
        })
    }
}

/// Current UTC calendar date.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Week containing `date`, or the current week when no date is given.
pub fn week_of(date: Option<NaiveDate>) -> Result<Week, CalendarError> {
    Week::containing(date.unwrap_or_else(today))
}

/// Shifts a week start back by seven days.
pub fn previous_week(week_start: NaiveDate) -> Result<NaiveDate, CalendarError> {
    Week::containing(week_start)?.previous().map(|week| week.start())
}

/// Shifts a week start forward by seven days.
pub fn next_week(week_start: NaiveDate) -> Result<NaiveDate, CalendarError> {
    Week::containing(week_start)?.next().map(|week| week.start())
}

/// Resolves a `YYYY-MM-DD` navigation parameter to a week.
///
/// A missing or unparsable parameter falls back to the week of `today`.
pub fn resolve_week(param: Option<&str>, today: NaiveDate) -> Result<Week, CalendarError> {
    let date = param.and_then(parse_date).unwrap_or(today);
    Week::containing(date)
}

/// Parses a `YYYY-MM-DD` date.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_PARAM_FORMAT).ok()
}

/// Formats a date as `YYYY-MM-DD`.
pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_PARAM_FORMAT).to_string()
}
