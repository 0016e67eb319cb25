#![warn(missing_docs)]
//! Daily climatology of radiosonde ascents.
//!
//! Corrected sounding files (`.cor`) from a station archive are parsed, trimmed to the ascent,
//! averaged onto a regular altitude grid from the ground to 35 km and aggregated by calendar day
//! over a range of years. The last year of the range is compared against the climatology of the
//! others to produce an anomaly.
//!
//! The `station` module extracts windows of the surface station minute and hourly exports.
//!
//! ```rust
//! use sounding_climatology::{
//!     export::write_series,
//!     pipeline::{run, PipelineConfig},
//!     source::InMemorySource,
//!     CalendarDate, Variable,
//! };
//!
//! let text = "V 14\n0;100;0;0;0;0;5;3;90;0;-1.0;80;990\n";
//! let source = InMemorySource::new()
//!     .with_record(CalendarDate::new(2022, 1, 1).unwrap(), "a.cor", text)
//!     .with_record(CalendarDate::new(2023, 1, 1).unwrap(), "b.cor", text);
//!
//! let config = PipelineConfig::new(2022, 2023)
//!     .with_variable(Variable::RelativeHumidity)
//!     .with_until(CalendarDate::new(2023, 1, 2).ok());
//! let result = run(&source, &config).unwrap();
//!
//! let mut csv = vec![];
//! write_series(&mut csv, &result.grid, &result.series).unwrap();
//! ```

//
// API
//
pub use crate::{
    calendar::{CalendarDate, Chronology},
    error::{ClimoError, Result},
    grid::{AltitudeGrid, OutOfRange},
    keys::{Cadence, StationField, Variable},
    pipeline::{ClimatologyRun, MalformedPolicy, PipelineConfig, RunReport},
    report::LaunchReport,
    sounding::{Level, Profile, SoundingRecord},
    summary::{SoundingSummary, StationLocation},
};

pub mod calendar;
pub mod climatology;
pub mod export;
pub mod grid;
pub mod parse;
pub mod pipeline;
pub mod resample;
pub mod source;
pub mod station;

//
// Internal use only
//

// Modules
mod error;
mod keys;
mod report;
mod sounding;
mod summary;
mod utility;
