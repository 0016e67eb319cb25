use metfor::{Celsius, HectoPascal, Km, MetersPSec, WindSpdDir};

/// A copy of one level of an ascent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Level {
    /// Altitude above sea level
    pub altitude: Km,
    /// Pressure in hPa
    pub pressure: HectoPascal,
    /// Temperature in C
    pub temperature: Celsius,
    /// Relative humidity in percent
    pub relative_humidity: f64,
    /// Wind
    pub wind: WindSpdDir<MetersPSec>,
    /// Balloon ascent rate
    pub ascent_rate: MetersPSec,
    /// Latitude offset from the launch site in degrees
    pub lat_offset: f64,
    /// Longitude offset from the launch site in degrees
    pub lon_offset: f64,
}
