//! Per-launch statistics for the station log book.
use crate::{
    error::{ClimoError, Result},
    sounding::SoundingRecord,
};
use haversine::{distance, Location as HaversineLocation, Units};
use itertools::izip;
use metfor::{Celsius, HectoPascal, Km, Knots, MetersPSec, Quantity};

/// Where the balloons are launched from.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StationLocation {
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl StationLocation {
    /// Dumont d'Urville station, Adélie Land.
    pub const DUMONT_DURVILLE: StationLocation = StationLocation {
        latitude: -66.65,
        longitude: 140.00,
    };
}

impl Default for StationLocation {
    fn default() -> Self {
        Self::DUMONT_DURVILLE
    }
}

/// The strongest wind of an ascent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MaxWind {
    /// Speed.
    pub speed: MetersPSec,
    /// Direction in degrees.
    pub direction: f64,
    /// Where it was measured.
    pub altitude: Km,
}

impl MaxWind {
    /// Speed in knots, as reported in the log book.
    pub fn speed_knots(&self) -> Knots {
        Knots::from(self.speed)
    }
}

/// Summary statistics of one ascent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SoundingSummary {
    /// Highest altitude reached.
    pub apogee: Km,
    /// Pressure at the highest altitude.
    pub apogee_pressure: HectoPascal,
    /// Coldest temperature of the ascent.
    pub min_temperature: Celsius,
    /// Temperature of the level closest to the tropopause, when its altitude is known.
    pub tropopause_temperature: Option<Celsius>,
    /// Strongest wind.
    pub max_wind: MaxWind,
    /// Great circle distance from the station to the balloon at apogee.
    pub drift_distance: Km,
}

impl SoundingSummary {
    /// Compute the summary of an ascent.
    ///
    /// The record only holds the ascent, so the apogee is its last level.
    pub fn from_record(
        rec: &SoundingRecord,
        tropopause: Option<Km>,
        station: StationLocation,
    ) -> Result<Self> {
        let top = rec.len().checked_sub(1).ok_or(ClimoError::NotEnoughData)?;
        let apogee_level = rec.level(top).ok_or(ClimoError::NotEnoughData)?;

        let min_temperature = rec
            .temperature_profile()
            .iter()
            .cloned()
            .fold(None, |acc: Option<Celsius>, t| match acc {
                Some(min) if min <= t => Some(min),
                _ => Some(t),
            })
            .ok_or(ClimoError::NotEnoughData)?;

        let tropopause_temperature = tropopause.and_then(|tropo| {
            izip!(rec.altitude_profile(), rec.temperature_profile())
                .map(|(alt, &t)| ((alt.unpack() - tropo.unpack()).abs(), t))
                .fold(None, |acc: Option<(f64, Celsius)>, (dz, t)| match acc {
                    Some((best, _)) if best <= dz => acc,
                    _ => Some((dz, t)),
                })
                .map(|(_, t)| t)
        });

        let max_wind = izip!(rec.altitude_profile(), rec.wind_profile())
            .fold(None, |acc: Option<MaxWind>, (&alt, wind)| match acc {
                Some(max) if max.speed >= wind.speed => acc,
                _ => Some(MaxWind {
                    speed: wind.speed,
                    direction: wind.direction,
                    altitude: alt,
                }),
            })
            .ok_or(ClimoError::NotEnoughData)?;

        let drift_distance = Km(distance(
            HaversineLocation {
                latitude: station.latitude,
                longitude: station.longitude,
            },
            HaversineLocation {
                latitude: station.latitude + apogee_level.lat_offset,
                longitude: station.longitude + apogee_level.lon_offset,
            },
            Units::Kilometers,
        ));

        Ok(SoundingSummary {
            apogee: apogee_level.altitude,
            apogee_pressure: apogee_level.pressure,
            min_temperature,
            tropopause_temperature,
            max_wind,
            drift_distance,
        })
    }
}
