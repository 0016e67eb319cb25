//! Run the whole climatology for a range of years.
//!
//! For every day: find the file, parse it, put it on the grid. Then average the years. One bad
//! day does not stop the run unless asked to.
use crate::{
    calendar::{truncate_before, year_range, CalendarDate},
    climatology::{aggregate, Aggregation, DailyProfile, YearSeries},
    error::{ClimoError, Result},
    grid::{AltitudeGrid, OutOfRange},
    keys::Variable,
    resample::{empty_grid_profile, resample_profile, GridProfile},
    source::{load_profile, RecordSource},
};
use log::{debug, info, warn};

/// What to do when the record of a day exists but cannot be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MalformedPolicy {
    /// Log it, treat the day as missing and keep going.
    Skip,
    /// Stop the run with the error.
    Abort,
}

impl Default for MalformedPolicy {
    fn default() -> Self {
        MalformedPolicy::Skip
    }
}

/// Settings for a climatology run.
#[derive(Debug, Clone, PartialEq)]
pub struct PipelineConfig {
    first_year: i32,
    last_year: i32,
    variable: Variable,
    grid: AltitudeGrid,
    out_of_range: OutOfRange,
    on_malformed: MalformedPolicy,
    skip_leap_day: bool,
    until: Option<CalendarDate>,
}

impl PipelineConfig {
    /// Temperature climatology of `first_year` through `last_year`, the last one being the year
    /// compared against the others.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sounding_climatology::{pipeline::PipelineConfig, Variable};
    ///
    /// let config = PipelineConfig::new(2015, 2024)
    ///     .with_variable(Variable::RelativeHumidity)
    ///     .with_skip_leap_day(false);
    /// assert_eq!(config.variable(), Variable::RelativeHumidity);
    /// ```
    pub fn new(first_year: i32, last_year: i32) -> Self {
        PipelineConfig {
            first_year,
            last_year,
            variable: Variable::Temperature,
            grid: AltitudeGrid::default(),
            out_of_range: OutOfRange::default(),
            on_malformed: MalformedPolicy::default(),
            skip_leap_day: true,
            until: None,
        }
    }

    /// Choose the variable to aggregate.
    pub fn with_variable(mut self, variable: Variable) -> Self {
        self.variable = variable;
        self
    }

    /// Choose the altitude grid.
    pub fn with_grid(mut self, grid: AltitudeGrid) -> Self {
        self.grid = grid;
        self
    }

    /// What to do with samples outside the grid.
    pub fn with_out_of_range(mut self, policy: OutOfRange) -> Self {
        self.out_of_range = policy;
        self
    }

    /// What to do with a day whose record cannot be used.
    pub fn with_on_malformed(mut self, policy: MalformedPolicy) -> Self {
        self.on_malformed = policy;
        self
    }

    /// Drop February 29th so every year has the same days.
    pub fn with_skip_leap_day(mut self, skip: bool) -> Self {
        self.skip_leap_day = skip;
        self
    }

    /// Only process days strictly before this one.
    pub fn with_until(mut self, until: Option<CalendarDate>) -> Self {
        self.until = until;
        self
    }

    /// The variable aggregated.
    pub fn variable(&self) -> Variable {
        self.variable
    }

    /// The altitude grid.
    pub fn grid(&self) -> &AltitudeGrid {
        &self.grid
    }

    /// Every day this configuration will process, in order.
    ///
    /// The last year is the one compared against the others, so a cut-off that leaves none of
    /// its days is `InvalidInput`.
    pub fn dates(&self) -> Result<Vec<CalendarDate>> {
        let mut dates = year_range(self.first_year, self.last_year)?;

        if let Some(until) = self.until {
            dates = truncate_before(dates, until);
        }

        if self.skip_leap_day {
            dates.retain(|date| !date.is_leap_day());
        }

        match dates.last() {
            Some(last) if last.year() == self.last_year => Ok(dates),
            _ => Err(ClimoError::InvalidInput(
                "the cut-off date leaves no day of the last year",
            )),
        }
    }
}

/// A day that could not be used.
#[derive(Debug)]
pub struct DayFailure {
    /// The day.
    pub date: CalendarDate,
    /// Why.
    pub error: ClimoError,
}

/// Bookkeeping of a run.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Days processed.
    pub dates: usize,
    /// Days with a usable record.
    pub present: usize,
    /// Days without a record.
    pub missing: usize,
    /// Days with a record that could not be used.
    pub failures: Vec<DayFailure>,
}

/// Everything produced by a run.
#[derive(Debug)]
pub struct ClimatologyRun {
    /// Variable aggregated.
    pub variable: Variable,
    /// Grid the profiles are on.
    pub grid: AltitudeGrid,
    /// Resampled profiles of every year, in year order.
    pub series: Vec<YearSeries>,
    /// Climatology and anomaly.
    pub aggregation: Aggregation,
    /// Bookkeeping.
    pub report: RunReport,
}

/// Resample every day of the configured years.
///
/// Every year of the range gets a series, the last one ends the day before the cut-off.
pub fn resample_years<S: RecordSource + ?Sized>(
    source: &S,
    config: &PipelineConfig,
) -> Result<(Vec<YearSeries>, RunReport)> {
    let mut series: Vec<YearSeries> = vec![];
    let mut report = RunReport::default();

    for date in config.dates()? {
        report.dates += 1;

        let values = match load_day(source, config, date) {
            Ok((values, present)) => {
                if present {
                    report.present += 1;
                } else {
                    report.missing += 1;
                }
                values
            }
            Err(error) => match config.on_malformed {
                MalformedPolicy::Abort => return Err(error),
                MalformedPolicy::Skip => {
                    warn!("skipping {}: {}", date, error);
                    report.failures.push(DayFailure { date, error });
                    empty_grid_profile(&config.grid)
                }
            },
        };

        match series.last_mut() {
            Some(year) if year.year == date.year() => {}
            _ => series.push(YearSeries::new(date.year())),
        }

        if let Some(year) = series.last_mut() {
            year.days.push(DailyProfile { date, values });
        }
    }

    info!(
        "processed {} days: {} present, {} missing, {} failed",
        report.dates,
        report.present,
        report.missing,
        report.failures.len()
    );

    Ok((series, report))
}

fn load_day<S: RecordSource + ?Sized>(
    source: &S,
    config: &PipelineConfig,
    date: CalendarDate,
) -> Result<(GridProfile, bool)> {
    debug!("loading {}", date);

    let profile = load_profile(source, date)?;
    let values = resample_profile(&profile, config.variable, &config.grid, config.out_of_range)?;

    Ok((values, !profile.is_missing()))
}

/// Run the whole pipeline.
///
/// # Examples
///
/// ```rust
/// use sounding_climatology::{
///     pipeline::{run, PipelineConfig},
///     source::InMemorySource,
///     CalendarDate,
/// };
///
/// let text = "V 14\n0;100;0;0;0;0;5;3;90;0;-1.0;80;990\n";
/// let source = InMemorySource::new()
///     .with_record(CalendarDate::new(2022, 1, 1).unwrap(), "a.cor", text)
///     .with_record(CalendarDate::new(2023, 1, 1).unwrap(), "b.cor", text);
///
/// let config = PipelineConfig::new(2022, 2023);
/// let result = run(&source, &config).unwrap();
///
/// assert_eq!(result.series.len(), 2);
/// assert_eq!(result.report.present, 2);
/// assert_eq!(result.aggregation.anomaly.days[0].values[0].unpack(), 0.0);
/// ```
pub fn run<S: RecordSource + ?Sized>(source: &S, config: &PipelineConfig) -> Result<ClimatologyRun> {
    let (series, report) = resample_years(source, config)?;
    let aggregation = aggregate(&series)?;

    Ok(ClimatologyRun {
        variable: config.variable,
        grid: config.grid,
        series,
        aggregation,
        report,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::source::InMemorySource;
    use std::str::FromStr;

    const GOOD: &str = "V 14\n0;100;0;0;0;0;5;3;90;0;-1.0;80;990\n";
    const BAD: &str = "V 14\n0;100;0;0;0;0;5;3;90;0;oops;80;990\n";

    fn d(s: &str) -> CalendarDate {
        CalendarDate::from_str(s).unwrap()
    }

    #[test]
    fn test_dates() {
        let config = PipelineConfig::new(2023, 2024);
        assert_eq!(config.dates().unwrap().len(), 730);

        let config = config.with_skip_leap_day(false);
        assert_eq!(config.dates().unwrap().len(), 731);

        let config = config.with_until(Some(d("03-01-2024")));
        let dates = config.dates().unwrap();
        assert_eq!(dates.len(), 367);
        assert_eq!(dates.last().cloned(), Some(d("02-01-2024")));

        assert!(PipelineConfig::new(2024, 2023).dates().is_err());
    }

    #[test]
    fn test_cut_off_before_last_year() {
        let source = InMemorySource::new()
            .with_record(d("01-01-2021"), "a.cor", GOOD)
            .with_record(d("01-01-2022"), "b.cor", GOOD)
            .with_record(d("01-01-2023"), "c.cor", GOOD);

        // Nothing of 2023 precedes the cut-off, 2022 must not become the compared year.
        for until in &["01-01-2023", "15-06-2022"] {
            let config = PipelineConfig::new(2021, 2023).with_until(Some(d(until)));
            assert!(matches!(config.dates(), Err(ClimoError::InvalidInput(_))));
            assert!(matches!(
                run(&source, &config),
                Err(ClimoError::InvalidInput(_))
            ));
        }

        let config = PipelineConfig::new(2021, 2023).with_until(Some(d("02-01-2023")));
        let result = run(&source, &config).unwrap();
        assert_eq!(result.aggregation.anomaly.year, 2023);
        assert_eq!(result.series.len(), 3);
        assert_eq!(result.series[2].days.len(), 1);
    }

    #[test]
    fn test_malformed_policies() {
        let source = InMemorySource::new()
            .with_record(d("01-01-2022"), "a.cor", GOOD)
            .with_record(d("02-01-2022"), "b.cor", BAD)
            .with_record(d("01-01-2023"), "c.cor", GOOD);

        let config = PipelineConfig::new(2022, 2023).with_until(Some(d("03-01-2023")));

        let (series, report) = resample_years(&source, &config).unwrap();
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].days.len(), 365);
        assert_eq!(series[1].days.len(), 2);
        assert_eq!(report.present, 2);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].date, d("02-01-2022"));
        assert_eq!(report.missing, 365 + 2 - 3);
        assert!(series[0].days[1].values.iter().all(|v| v.is_none()));

        let config = config.with_on_malformed(MalformedPolicy::Abort);
        assert!(matches!(
            resample_years(&source, &config),
            Err(ClimoError::MalformedRecord { .. })
        ));
    }

    #[test]
    fn test_reject_out_of_range_is_per_day() {
        let high = "V 14\n0;36000;0;0;0;0;5;3;90;0;-1.0;80;990\n";
        let source = InMemorySource::new()
            .with_record(d("01-01-2022"), "a.cor", high)
            .with_record(d("01-01-2023"), "b.cor", GOOD);

        let config = PipelineConfig::new(2022, 2023)
            .with_until(Some(d("02-01-2023")))
            .with_out_of_range(OutOfRange::Reject);

        let result = run(&source, &config).unwrap();
        assert_eq!(result.report.failures.len(), 1);
        assert!(matches!(
            result.report.failures[0].error,
            ClimoError::GridAssignmentOutOfRange { .. }
        ));
    }

    #[test]
    fn test_no_data() {
        let source = InMemorySource::new();
        let config = PipelineConfig::new(2022, 2023);
        assert!(matches!(run(&source, &config), Err(ClimoError::NoData)));
    }
}
