//! Data types to store a single radiosonde ascent.

use crate::{
    calendar::CalendarDate,
    error::{ClimoError, Result},
    keys::Variable,
};
use metfor::{Celsius, HectoPascal, Kelvin, Km, MetersPSec, Quantity, WindSpdDir};

pub use self::level::Level;

mod level;

/// All the variables stored for one ascent.
///
/// The profile variables are stored in parallel vectors ordered bottom up. Altitude is strictly
/// increasing, samples from the descent of the balloon are never stored.
#[derive(Clone, Debug, PartialEq)]
pub struct SoundingRecord {
    // Launch day
    date: CalendarDate,
    // Name of the file (or blob) this came from.
    source: String,

    // Profiles
    altitude: Vec<Km>,
    pressure: Vec<HectoPascal>,
    temperature: Vec<Celsius>,
    relative_humidity: Vec<f64>,
    wind: Vec<WindSpdDir<MetersPSec>>,
    ascent_rate: Vec<MetersPSec>,
    lat_offset: Vec<f64>,
    lon_offset: Vec<f64>,
}

impl SoundingRecord {
    /// Create an empty record for a launch day.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sounding_climatology::{CalendarDate, SoundingRecord};
    ///
    /// let date = CalendarDate::new(2024, 1, 1).unwrap();
    /// let rec = SoundingRecord::new(date, "DD2024010100.cor");
    /// assert!(rec.is_empty());
    /// assert_eq!(rec.source_name(), "DD2024010100.cor");
    /// ```
    pub fn new<S: Into<String>>(date: CalendarDate, source: S) -> Self {
        SoundingRecord {
            date,
            source: source.into(),
            altitude: vec![],
            pressure: vec![],
            temperature: vec![],
            relative_humidity: vec![],
            wind: vec![],
            ascent_rate: vec![],
            lat_offset: vec![],
            lon_offset: vec![],
        }
    }

    /// Build a record from levels ordered bottom up.
    ///
    /// Fails with `InvalidInput` if the altitudes are not strictly increasing.
    pub fn from_levels<S, I>(date: CalendarDate, source: S, levels: I) -> Result<Self>
    where
        S: Into<String>,
        I: IntoIterator<Item = Level>,
    {
        let mut rec = SoundingRecord::new(date, source);
        for level in levels {
            rec.push(level)?;
        }
        Ok(rec)
    }

    /// Append a level to the top of the profile.
    pub fn push(&mut self, level: Level) -> Result<()> {
        if let Some(&top) = self.altitude.last() {
            if level.altitude <= top {
                return Err(ClimoError::InvalidInput(
                    "sounding altitude must be strictly increasing",
                ));
            }
        }

        self.altitude.push(level.altitude);
        self.pressure.push(level.pressure);
        self.temperature.push(level.temperature);
        self.relative_humidity.push(level.relative_humidity);
        self.wind.push(level.wind);
        self.ascent_rate.push(level.ascent_rate);
        self.lat_offset.push(level.lat_offset);
        self.lon_offset.push(level.lon_offset);

        Ok(())
    }

    /// The launch day.
    #[inline]
    pub fn date(&self) -> CalendarDate {
        self.date
    }

    /// Name of the source this record was parsed from.
    #[inline]
    pub fn source_name(&self) -> &str {
        &self.source
    }

    /// Number of levels.
    #[inline]
    pub fn len(&self) -> usize {
        self.altitude.len()
    }

    /// True if no levels were retained.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.altitude.is_empty()
    }

    /// Altitude profile.
    #[inline]
    pub fn altitude_profile(&self) -> &[Km] {
        &self.altitude
    }

    /// Pressure profile.
    #[inline]
    pub fn pressure_profile(&self) -> &[HectoPascal] {
        &self.pressure
    }

    /// Temperature profile.
    #[inline]
    pub fn temperature_profile(&self) -> &[Celsius] {
        &self.temperature
    }

    /// Relative humidity profile in percent.
    #[inline]
    pub fn relative_humidity_profile(&self) -> &[f64] {
        &self.relative_humidity
    }

    /// Wind profile.
    #[inline]
    pub fn wind_profile(&self) -> &[WindSpdDir<MetersPSec>] {
        &self.wind
    }

    /// Ascent rate profile.
    #[inline]
    pub fn ascent_rate_profile(&self) -> &[MetersPSec] {
        &self.ascent_rate
    }

    /// Latitude offsets from the launch site in degrees.
    #[inline]
    pub fn lat_offset_profile(&self) -> &[f64] {
        &self.lat_offset
    }

    /// Longitude offsets from the launch site in degrees.
    #[inline]
    pub fn lon_offset_profile(&self) -> &[f64] {
        &self.lon_offset
    }

    /// Get a copy of one level.
    pub fn level(&self, idx: usize) -> Option<Level> {
        if idx >= self.len() {
            return None;
        }

        Some(Level {
            altitude: self.altitude[idx],
            pressure: self.pressure[idx],
            temperature: self.temperature[idx],
            relative_humidity: self.relative_humidity[idx],
            wind: self.wind[idx],
            ascent_rate: self.ascent_rate[idx],
            lat_offset: self.lat_offset[idx],
            lon_offset: self.lon_offset[idx],
        })
    }

    /// Iterate over the levels from the ground up.
    pub fn levels<'a>(&'a self) -> impl Iterator<Item = Level> + 'a {
        (0..self.len()).filter_map(move |i| self.level(i))
    }

    /// Values of one variable in the units documented on `Variable`.
    ///
    /// This is the single place where temperature is converted to Kelvin.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use metfor::{Celsius, HectoPascal, Km, MetersPSec, WindSpdDir};
    /// use sounding_climatology::{CalendarDate, Level, SoundingRecord, Variable};
    ///
    /// let date = CalendarDate::new(2024, 1, 1).unwrap();
    /// let level = Level {
    ///     altitude: Km(0.1),
    ///     pressure: HectoPascal(985.0),
    ///     temperature: Celsius(-5.0),
    ///     relative_humidity: 70.0,
    ///     wind: WindSpdDir { speed: MetersPSec(8.0), direction: 120.0 },
    ///     ascent_rate: MetersPSec(5.0),
    ///     lat_offset: 0.0,
    ///     lon_offset: 0.0,
    /// };
    /// let rec = SoundingRecord::from_levels(date, "test", vec![level]).unwrap();
    ///
    /// let t = rec.values(Variable::Temperature);
    /// assert!((t[0] - 268.15).abs() < 1.0e-9);
    /// ```
    pub fn values(&self, var: Variable) -> Vec<f64> {
        match var {
            Variable::Temperature => self
                .temperature
                .iter()
                .map(|&t| Kelvin::from(t).unpack())
                .collect(),
            Variable::Pressure => self.pressure.iter().map(|p| p.unpack()).collect(),
            Variable::RelativeHumidity => self.relative_humidity.clone(),
            Variable::WindSpeed => self.wind.iter().map(|w| w.speed.unpack()).collect(),
            Variable::WindDirection => self.wind.iter().map(|w| w.direction).collect(),
            Variable::AscentRate => self.ascent_rate.iter().map(|a| a.unpack()).collect(),
        }
    }
}

/// The outcome of looking up the ascent for one day.
#[derive(Clone, Debug, PartialEq)]
pub enum Profile {
    /// A record was found and parsed.
    Present(SoundingRecord),
    /// No record exists for this day.
    ///
    /// It resamples to an all-missing profile as long as the grid, not to a fixed length.
    Missing,
}

impl Profile {
    /// Get the record, if there is one.
    #[inline]
    pub fn record(&self) -> Option<&SoundingRecord> {
        match self {
            Profile::Present(rec) => Some(rec),
            Profile::Missing => None,
        }
    }

    /// True for `Profile::Missing`.
    #[inline]
    pub fn is_missing(&self) -> bool {
        matches!(self, Profile::Missing)
    }
}

impl From<SoundingRecord> for Profile {
    fn from(rec: SoundingRecord) -> Self {
        Profile::Present(rec)
    }
}

impl From<Option<SoundingRecord>> for Profile {
    fn from(rec: Option<SoundingRecord>) -> Self {
        rec.map(Profile::Present).unwrap_or(Profile::Missing)
    }
}
