//! Parse corrected sounding (`.cor`) files.
//!
//! The files are delimited text. The first line is a header with a format version, every other
//! line is one sample of the ascent. Older files use semicolons and newer ones use tabs, so both
//! are accepted. After the balloon bursts the sonde keeps reporting on the way down, those
//! samples are dropped here so that the altitude of a record is always strictly increasing.
use crate::{
    calendar::CalendarDate,
    error::{ClimoError, Result},
    sounding::{Level, SoundingRecord},
};
use metfor::{Celsius, HectoPascal, Km, Meters, MetersPSec, WindSpdDir};
use std::str::FromStr;

/// Column offsets in a data line.
pub mod columns {
    /// Altitude (m)
    pub const ALTITUDE: usize = 1;
    /// Latitude offset from the launch site (degrees)
    pub const LAT: usize = 2;
    /// Longitude offset from the launch site (degrees)
    pub const LON: usize = 3;
    /// Ascent rate (m/s)
    pub const ASCENT: usize = 6;
    /// Wind speed (m/s)
    pub const WIND_SPEED: usize = 7;
    /// Wind direction (degrees)
    pub const WIND_DIR: usize = 8;
    /// Temperature (C)
    pub const TEMPERATURE: usize = 10;
    /// Relative humidity (%)
    pub const HUMIDITY: usize = 11;
    /// Pressure (hPa)
    pub const PRESSURE: usize = 12;
}

/// Parse the text of one sounding file into a record of the ascent.
///
/// Any field that cannot be parsed fails the whole record.
///
/// # Examples
///
/// ```rust
/// use sounding_climatology::{parse::parse_record, CalendarDate};
///
/// let text = "V 14\n\
///             0;100;0;0;0;0;5;3;90;0;-1.0;80;990\n\
///             1;5000;0;0;0;0;5;12;95;0;-30.0;40;540\n\
///             2;4900;0;0;0;0;-9;12;95;0;-29.0;40;545\n";
/// let date = CalendarDate::new(2024, 1, 1).unwrap();
/// let rec = parse_record(date, "DD2024010100.cor", text).unwrap();
///
/// // The last line is on the way down.
/// assert_eq!(rec.len(), 2);
/// ```
pub fn parse_record(date: CalendarDate, source_name: &str, text: &str) -> Result<SoundingRecord> {
    let mut record = SoundingRecord::new(date, source_name);

    // Highest altitude seen so far in this record, never carried between records.
    let mut high_water = Meters(0.0);

    for (line_idx, line) in text.lines().enumerate().skip(1) {
        let line = line.replace('\r', "").replace(';', "\t");
        let tokens: Vec<&str> = line.split('\t').map(str::trim).collect();

        if tokens.len() <= 1 || tokens.iter().all(|tok| tok.is_empty()) {
            continue;
        }

        let parse_col = |col: usize| -> Result<f64> {
            let malformed = |value: &str| ClimoError::MalformedRecord {
                source_name: source_name.to_owned(),
                line: line_idx + 1,
                column: col.to_string(),
                value: value.to_owned(),
            };

            let tok = tokens.get(col).ok_or_else(|| malformed(""))?;
            f64::from_str(tok)
                .ok()
                .filter(|val| val.is_finite())
                .ok_or_else(|| malformed(tok))
        };

        let altitude = Meters(parse_col(columns::ALTITUDE)?);
        let level = Level {
            altitude: Km::from(altitude),
            pressure: HectoPascal(parse_col(columns::PRESSURE)?),
            temperature: Celsius(parse_col(columns::TEMPERATURE)?),
            relative_humidity: parse_col(columns::HUMIDITY)?,
            wind: WindSpdDir {
                speed: MetersPSec(parse_col(columns::WIND_SPEED)?),
                direction: parse_col(columns::WIND_DIR)?,
            },
            ascent_rate: MetersPSec(parse_col(columns::ASCENT)?),
            lat_offset: parse_col(columns::LAT)?,
            lon_offset: parse_col(columns::LON)?,
        };

        if altitude > high_water {
            high_water = altitude;
            record.push(level)?;
        }
    }

    Ok(record)
}
