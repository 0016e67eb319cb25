use super::{CalendarDate, Chronology};
use crate::error::{ClimoError, Result};

/// Every date from `start` to `end`, inclusive, in order.
///
/// # Examples
///
/// ```rust
/// use sounding_climatology::{calendar::date_range, CalendarDate};
///
/// let start = CalendarDate::new(2023, 12, 30).unwrap();
/// let end = CalendarDate::new(2024, 1, 2).unwrap();
/// let dates = date_range(start, end).unwrap();
/// assert_eq!(dates.len(), 4);
/// assert_eq!(dates[2], CalendarDate::new(2024, 1, 1).unwrap());
/// ```
pub fn date_range(start: CalendarDate, end: CalendarDate) -> Result<Vec<CalendarDate>> {
    if start.compare(end) == Chronology::After {
        return Err(ClimoError::InvalidDate(format!(
            "range start {} is after end {}",
            start, end
        )));
    }

    let mut dates = vec![start];
    let mut current = start;
    while current != end {
        current = current.next()?;
        dates.push(current);
    }

    Ok(dates)
}

/// All the days of the years `first` through `last`.
pub fn year_range(first: i32, last: i32) -> Result<Vec<CalendarDate>> {
    date_range(CalendarDate::new(first, 1, 1)?, CalendarDate::new(last, 12, 31)?)
}

/// Keep only the dates strictly before `today`.
///
/// The latest launch is not available until the next day, so today is dropped too.
pub fn truncate_before(mut dates: Vec<CalendarDate>, today: CalendarDate) -> Vec<CalendarDate> {
    dates.retain(|&date| date.compare(today) == Chronology::Before);
    dates
}

#[cfg(test)]
mod test {
    use super::*;
    use std::str::FromStr;

    fn d(s: &str) -> CalendarDate {
        CalendarDate::from_str(s).unwrap()
    }

    #[test]
    fn test_date_range() {
        let dates = date_range(d("01-01-2022"), d("03-01-2022")).unwrap();
        assert_eq!(dates, vec![d("01-01-2022"), d("02-01-2022"), d("03-01-2022")]);

        let single = date_range(d("05-05-2022"), d("05-05-2022")).unwrap();
        assert_eq!(single, vec![d("05-05-2022")]);

        assert!(date_range(d("02-01-2022"), d("01-01-2022")).is_err());
    }

    #[test]
    fn test_year_range() {
        assert_eq!(year_range(2023, 2023).unwrap().len(), 365);
        assert_eq!(year_range(2024, 2024).unwrap().len(), 366);
        assert_eq!(year_range(2023, 2024).unwrap().len(), 731);
        assert!(year_range(2024, 2023).is_err());
    }

    #[test]
    fn test_truncate_before() {
        let dates = year_range(2024, 2024).unwrap();
        let kept = truncate_before(dates, d("21-05-2024"));
        assert_eq!(kept.len(), 141);
        assert_eq!(kept.last().cloned(), Some(d("20-05-2024")));

        let dates = year_range(2024, 2024).unwrap();
        assert_eq!(truncate_before(dates.clone(), d("01-01-2030")), dates);
        assert!(truncate_before(dates, d("01-01-2020")).is_empty());
    }
}
