//! Calendar dates and day-to-day stepping.
//!
//! Station files are named and organised by calendar day, so the pipeline walks the calendar
//! one day at a time. `CalendarDate` is a small, validated value type for that walk. It uses the
//! general Gregorian leap year rule and only supports years 1900 through 2100.
use crate::error::{ClimoError, Result};
use chrono::{Datelike, NaiveDate};
use std::{convert::TryFrom, fmt, str::FromStr};

pub use self::range::{date_range, truncate_before, year_range};

mod range;

/// Result of comparing two dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Chronology {
    /// The first date is earlier.
    Before,
    /// The first date is later.
    After,
    /// Same calendar day.
    Same,
}

/// A valid Gregorian calendar date.
///
/// Field order matters, the derived ordering is by year, then month, then day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate {
    year: i32,
    month: u32,
    day: u32,
}

impl CalendarDate {
    /// Earliest supported year.
    pub const MIN_YEAR: i32 = 1900;
    /// Latest supported year.
    pub const MAX_YEAR: i32 = 2100;

    /// Create a new date, validating it.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sounding_climatology::CalendarDate;
    ///
    /// assert!(CalendarDate::new(2024, 2, 29).is_ok());
    /// assert!(CalendarDate::new(2023, 2, 29).is_err());
    /// assert!(CalendarDate::new(2024, 4, 31).is_err());
    /// ```
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self> {
        if year < Self::MIN_YEAR || year > Self::MAX_YEAR {
            return Err(ClimoError::InvalidDate(format!(
                "year {} outside {}-{}",
                year,
                Self::MIN_YEAR,
                Self::MAX_YEAR
            )));
        }

        if month < 1 || month > 12 {
            return Err(ClimoError::InvalidDate(format!("month {}", month)));
        }

        if day < 1 || day > days_in_month(year, month) {
            return Err(ClimoError::InvalidDate(format!(
                "{:02}-{:02}-{:04}",
                day, month, year
            )));
        }

        Ok(CalendarDate { year, month, day })
    }

    /// The year.
    #[inline]
    pub fn year(self) -> i32 {
        self.year
    }

    /// The month, 1-12.
    #[inline]
    pub fn month(self) -> u32 {
        self.month
    }

    /// The day of the month, 1-31.
    #[inline]
    pub fn day(self) -> u32 {
        self.day
    }

    /// Is this February 29th?
    #[inline]
    pub fn is_leap_day(self) -> bool {
        self.month == 2 && self.day == 29
    }

    /// Get the previous and next calendar days.
    ///
    /// Fails only when stepping would leave the supported range of years.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sounding_climatology::CalendarDate;
    ///
    /// let leap_day = CalendarDate::new(2024, 2, 29).unwrap();
    /// let (prev, next) = leap_day.adjacent().unwrap();
    /// assert_eq!(prev, CalendarDate::new(2024, 2, 28).unwrap());
    /// assert_eq!(next, CalendarDate::new(2024, 3, 1).unwrap());
    /// ```
    pub fn adjacent(self) -> Result<(CalendarDate, CalendarDate)> {
        Ok((self.previous()?, self.next()?))
    }

    /// The following calendar day.
    pub fn next(self) -> Result<CalendarDate> {
        let CalendarDate { year, month, day } = self;

        if day < days_in_month(year, month) {
            Ok(CalendarDate {
                day: day + 1,
                ..self
            })
        } else if month < 12 {
            Ok(CalendarDate {
                year,
                month: month + 1,
                day: 1,
            })
        } else {
            CalendarDate::new(year + 1, 1, 1)
        }
    }

    /// The preceding calendar day.
    pub fn previous(self) -> Result<CalendarDate> {
        let CalendarDate { year, month, day } = self;

        if day > 1 {
            Ok(CalendarDate {
                day: day - 1,
                ..self
            })
        } else if month > 1 {
            Ok(CalendarDate {
                year,
                month: month - 1,
                day: days_in_month(year, month - 1),
            })
        } else {
            CalendarDate::new(year - 1, 12, 31)
        }
    }

    /// Compare with another date.
    pub fn compare(self, other: CalendarDate) -> Chronology {
        use std::cmp::Ordering::*;

        match self.cmp(&other) {
            Less => Chronology::Before,
            Greater => Chronology::After,
            Equal => Chronology::Same,
        }
    }

    /// The prefix used to name the sounding files of this day, `DDyyyymmdd`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sounding_climatology::CalendarDate;
    ///
    /// let date = CalendarDate::new(2024, 1, 7).unwrap();
    /// assert_eq!(date.file_radical(), "DD20240107");
    /// ```
    pub fn file_radical(self) -> String {
        format!("DD{:04}{:02}{:02}", self.year, self.month, self.day)
    }

    /// Today's date on the local clock.
    pub fn today() -> Result<CalendarDate> {
        CalendarDate::try_from(chrono::Local::now().date_naive())
    }
}

/// Gregorian leap year rule.
#[inline]
pub fn is_leap_year(year: i32) -> bool {
    year % 4 == 0 && (year % 100 != 0 || year % 400 == 0)
}

/// Number of days in a month, `month` is 1-12.
#[inline]
pub fn days_in_month(year: i32, month: u32) -> u32 {
    match month {
        1 | 3 | 5 | 7 | 8 | 10 | 12 => 31,
        4 | 6 | 9 | 11 => 30,
        2 if is_leap_year(year) => 29,
        2 => 28,
        _ => 0,
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{:02}-{:02}-{:04}", self.day, self.month, self.year)
    }
}

impl FromStr for CalendarDate {
    type Err = ClimoError;

    /// Parse the `DD-MM-YYYY` form used throughout the station tools.
    fn from_str(s: &str) -> Result<Self> {
        let bad = || ClimoError::InvalidDate(s.to_owned());

        let s = s.trim();
        let parts: Vec<&str> = s.split('-').collect();
        if parts.len() != 3
            || parts[0].len() != 2
            || parts[1].len() != 2
            || parts[2].len() != 4
            || !parts.iter().all(|p| p.chars().all(|c| c.is_ascii_digit()))
        {
            return Err(bad());
        }

        let day = u32::from_str(parts[0]).map_err(|_| bad())?;
        let month = u32::from_str(parts[1]).map_err(|_| bad())?;
        let year = i32::from_str(parts[2]).map_err(|_| bad())?;

        CalendarDate::new(year, month, day)
    }
}

impl TryFrom<NaiveDate> for CalendarDate {
    type Error = ClimoError;

    fn try_from(date: NaiveDate) -> Result<Self> {
        CalendarDate::new(date.year(), date.month(), date.day())
    }
}

impl From<CalendarDate> for NaiveDate {
    fn from(date: CalendarDate) -> NaiveDate {
        // CalendarDate::new only accepts valid Gregorian dates in 1900-2100, all of which chrono
        // can represent.
        NaiveDate::from_ymd_opt(date.year, date.month, date.day)
            .expect("a CalendarDate is always a valid NaiveDate")
    }
}
