//! Error types for the sounding-climatology crate.
use crate::calendar::CalendarDate;
use thiserror::Error;

/// Error type for the crate.
#[derive(Debug, Error)]
pub enum ClimoError {
    /// A date that cannot be parsed, does not exist, or falls outside the supported years.
    #[error("invalid date: {0}")]
    InvalidDate(String),
    /// No record was found for a date.
    #[error("no sounding record found for {0}")]
    SourceNotFound(CalendarDate),
    /// A field in a record could not be parsed.
    #[error("malformed record in {source_name}, line {line}, column {column}: {value:?}")]
    MalformedRecord {
        /// Name of the file or blob the record came from.
        source_name: String,
        /// 1-based line number in the source.
        line: usize,
        /// 0-based column index, or the key name for key=value files.
        column: String,
        /// The offending text.
        value: String,
    },
    /// An altitude sample fell outside the grid and the policy is to reject it.
    #[error("altitude {altitude} km is outside the altitude grid")]
    GridAssignmentOutOfRange {
        /// Offending altitude in km.
        altitude: f64,
    },
    /// The altitude grid definition is unusable.
    #[error("invalid altitude grid: {0}")]
    InvalidGrid(String),
    /// None of the input years contained a single valid value.
    #[error("no valid data in any year")]
    NoData,
    /// Climatology needs at least one reference year plus the latest year.
    #[error("need at least 2 years to build a climatology, got {0}")]
    NotEnoughYears(usize),
    /// Not enough data available for analysis.
    #[error("not enough data available for analysis")]
    NotEnoughData,
    /// Bad or invalid input.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),

    /// Forward an error from std
    #[error("std lib io error: {0}")]
    Io(#[from] std::io::Error),
    /// Forward an error from the csv crate
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
}

/// Shorthand for results.
pub type Result<T> = ::std::result::Result<T, ClimoError>;
