//! Launch reports (`.ref` files).
//!
//! The ground station writes a `key=value` summary of every launch: the sonde serial number, the
//! ground observation at launch time and a few values computed from the flight. Numeric values
//! carry their units as a suffix, e.g. `GroundP=987.3hPa`.
use crate::error::{ClimoError, Result};
use metfor::{Celsius, HectoPascal, Meters, MetersPSec};
use optional::Optioned;

/// Metadata of one launch.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LaunchReport {
    /// Sonde serial number.
    pub sonde_id: Option<String>,
    /// Launch time as written by the ground station.
    pub sonde_start: Option<String>,
    /// Ground pressure at launch.
    pub ground_pressure: Optioned<HectoPascal>,
    /// Ground temperature at launch.
    pub ground_temperature: Optioned<Celsius>,
    /// Ground relative humidity at launch (%).
    pub ground_humidity: Optioned<f64>,
    /// Ground wind speed at launch.
    pub ground_wind_speed: Optioned<MetersPSec>,
    /// Ground wind direction at launch (degrees).
    pub ground_wind_direction: Optioned<f64>,
    /// Cloud observation at launch, free text.
    pub ground_clouds: Option<String>,
    /// Tropopause altitude.
    pub tropopause: Optioned<Meters>,
    /// Highest altitude with pressure, temperature and humidity data.
    pub end_of_ptu: Optioned<Meters>,
    /// Pressure at the end of the PTU data.
    pub end_of_ptu_pressure: Optioned<HectoPascal>,
    /// Mean ascent rate.
    pub ascent_rate: Optioned<MetersPSec>,
}

impl LaunchReport {
    /// Parse the text of a report, `source_name` is only used in error messages.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use metfor::Quantity;
    /// use sounding_climatology::LaunchReport;
    ///
    /// let text = "SondeID=N1234567\nGroundP=987.3hPa\nTropo=9120m 228.5K\n";
    /// let report = LaunchReport::parse("DD2024010100_1.ref", text).unwrap();
    ///
    /// assert_eq!(report.sonde_id.as_deref(), Some("N1234567"));
    /// assert_eq!(report.ground_pressure.unpack().unpack(), 987.3);
    /// assert_eq!(report.tropopause.unpack().unpack(), 9120.0);
    /// assert!(report.ground_temperature.is_none());
    /// ```
    pub fn parse(source_name: &str, text: &str) -> Result<LaunchReport> {
        let mut report = LaunchReport::default();

        for (line_idx, line) in text.lines().enumerate() {
            let line = line.trim();
            let (key, value) = match line.find('=') {
                Some(pos) => (line[..pos].trim(), line[pos + 1..].trim()),
                None => continue,
            };

            let number = || -> Result<f64> {
                leading_number(value).ok_or_else(|| ClimoError::MalformedRecord {
                    source_name: source_name.to_owned(),
                    line: line_idx + 1,
                    column: key.to_owned(),
                    value: value.to_owned(),
                })
            };

            match key {
                "SondeID" => report.sonde_id = Some(value.to_owned()),
                "SondeStart" => report.sonde_start = Some(value.to_owned()),
                "GroundClouds" => report.ground_clouds = Some(value.to_owned()),
                "GroundP" => report.ground_pressure = HectoPascal(number()?).into(),
                "GroundT" => report.ground_temperature = Celsius(number()?).into(),
                "GroundU" => report.ground_humidity = number()?.into(),
                "GroundWindSpeed" => report.ground_wind_speed = MetersPSec(number()?).into(),
                "GroundWindDir" => report.ground_wind_direction = number()?.into(),
                "Tropo" => report.tropopause = Meters(number()?).into(),
                "AltMax" => report.end_of_ptu = Meters(number()?).into(),
                "Pressure" => report.end_of_ptu_pressure = HectoPascal(number()?).into(),
                "Ascent" => report.ascent_rate = MetersPSec(number()?).into(),
                _ => {}
            }
        }

        Ok(report)
    }
}

/// Parse the number at the start of a value, ignoring a trailing unit and anything after the
/// first space.
fn leading_number(value: &str) -> Option<f64> {
    let first = value.split_whitespace().next()?;
    let end = first
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || ((c == '-' || c == '+') && i == 0)))
        .map(|(i, _)| i)
        .unwrap_or_else(|| first.len());

    first[..end].parse::<f64>().ok()
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::utility::test_tools::*;
    use metfor::Quantity;

    const REPORT: &str = "\
[Sounding]
SondeID=N3350127
SondeStart=23:12UTC
GroundP=982.4hPa
GroundT=-12.3°C
GroundU=71%
GroundWindSpeed=6.2m/s
GroundWindDir=135°
GroundClouds=3/8 Ac
Tropo=8950m 219.4K
AltMax=25410m
Pressure=23.6hPa
Ascent=5.3m/s
Operator=XX
";

    #[test]
    fn test_parse_full_report() {
        let report = LaunchReport::parse("test.ref", REPORT).unwrap();

        assert_eq!(report.sonde_id.as_deref(), Some("N3350127"));
        assert_eq!(report.sonde_start.as_deref(), Some("23:12UTC"));
        assert_eq!(report.ground_clouds.as_deref(), Some("3/8 Ac"));
        assert!(approx_equal(report.ground_pressure.unpack().unpack(), 982.4, 1.0e-9));
        assert!(approx_equal(report.ground_temperature.unpack().unpack(), -12.3, 1.0e-9));
        assert!(approx_equal(report.ground_humidity.unpack(), 71.0, 1.0e-9));
        assert!(approx_equal(report.ground_wind_speed.unpack().unpack(), 6.2, 1.0e-9));
        assert!(approx_equal(report.ground_wind_direction.unpack(), 135.0, 1.0e-9));
        assert!(approx_equal(report.tropopause.unpack().unpack(), 8950.0, 1.0e-9));
        assert!(approx_equal(report.end_of_ptu.unpack().unpack(), 25410.0, 1.0e-9));
        assert!(approx_equal(report.end_of_ptu_pressure.unpack().unpack(), 23.6, 1.0e-9));
        assert!(approx_equal(report.ascent_rate.unpack().unpack(), 5.3, 1.0e-9));
    }

    #[test]
    fn test_bad_number() {
        let err = LaunchReport::parse("bad.ref", "SondeID=A\nGroundP=n/a\n").unwrap_err();
        match err {
            ClimoError::MalformedRecord { line, column, .. } => {
                assert_eq!(line, 2);
                assert_eq!(column, "GroundP");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_leading_number() {
        assert_eq!(leading_number("987.3hPa"), Some(987.3));
        assert_eq!(leading_number("-12.3°C"), Some(-12.3));
        assert_eq!(leading_number("8950m 219.4K"), Some(8950.0));
        assert_eq!(leading_number("hPa"), None);
        assert_eq!(leading_number(""), None);
    }
}
