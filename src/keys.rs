//! Enums used as keys for selecting what to aggregate or extract.
use std::fmt;
use strum_macros::{EnumIter, EnumString, IntoStaticStr};

/// Profile variables that can be resampled onto the altitude grid.
///
/// Values are always reported in the units noted on each variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, IntoStaticStr, EnumIter)]
pub enum Variable {
    /// Air temperature (K)
    #[strum(to_string = "temperature", serialize = "t")]
    Temperature,
    /// Pressure (hPa)
    #[strum(to_string = "pressure", serialize = "p")]
    Pressure,
    /// Relative humidity (%)
    #[strum(to_string = "relative_humidity", serialize = "rh", serialize = "u")]
    RelativeHumidity,
    /// Wind speed (m/s)
    #[strum(to_string = "wind_speed", serialize = "ff")]
    WindSpeed,
    /// Wind direction (degrees)
    #[strum(to_string = "wind_direction", serialize = "dd")]
    WindDirection,
    /// Balloon ascent rate (m/s)
    #[strum(to_string = "ascent_rate")]
    AscentRate,
}

impl Variable {
    /// Units label for output headers.
    pub fn units(self) -> &'static str {
        match self {
            Variable::Temperature => "K",
            Variable::Pressure => "hPa",
            Variable::RelativeHumidity => "%",
            Variable::WindSpeed | Variable::AscentRate => "m/s",
            Variable::WindDirection => "deg",
        }
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name: &'static str = self.into();
        write!(f, "{}", name)
    }
}

/// Cadence of the surface station exports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, IntoStaticStr, EnumIter)]
pub enum Cadence {
    /// One line per minute, `DON_Minute_UTC_*` files.
    #[strum(to_string = "minute")]
    Minute,
    /// One line per hour, `DON_Horaire_UTC_*` files.
    #[strum(to_string = "hourly")]
    Hourly,
}

/// Surface station parameters that can be extracted from the minute and hourly exports.
///
/// The names are the ones used in the output files, the source column differs with the cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, IntoStaticStr, EnumIter)]
#[allow(clippy::upper_case_acronyms)]
pub enum StationField {
    /// Temperature (C)
    T,
    /// Dew point (C), hourly only
    TD,
    /// Relative humidity (%)
    U,
    /// Station level pressure (hPa)
    P,
    /// Mean wind speed (m/s)
    FF,
    /// Mean wind direction (degrees)
    DD,
    /// Maximum instantaneous wind speed (m/s)
    FXI,
    /// Global radiation
    RG,
    /// Sunshine duration
    DI,
    /// Visibility, minute only
    VIS,
}

impl StationField {
    /// Header of the source column holding this parameter, `None` if the cadence lacks it.
    pub fn source_column(self, cadence: Cadence) -> Option<&'static str> {
        use self::{Cadence::*, StationField::*};

        match (cadence, self) {
            (Minute, T) => Some("T"),
            (Minute, TD) => None,
            (Minute, U) => Some("U"),
            (Minute, P) => Some("PSTA"),
            (Minute, FF) => Some("FF"),
            (Minute, DD) => Some("DD"),
            (Minute, FXI) => Some("FM1"),
            (Minute, RG) => Some("RG"),
            (Minute, DI) => Some("DI"),
            (Minute, VIS) => Some("VVSYNTH"),
            (Hourly, T) => Some("TSYN"),
            (Hourly, TD) => Some("TDSYN"),
            (Hourly, U) => Some("USYN"),
            (Hourly, P) => Some("PSTASYN"),
            (Hourly, FF) => Some("FXY"),
            (Hourly, DD) => Some("DXY"),
            (Hourly, FXI) => Some("FXI"),
            (Hourly, RG) => Some("RGH"),
            (Hourly, DI) => Some("DINSH"),
            (Hourly, VIS) => None,
        }
    }
}

impl fmt::Display for Cadence {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name: &'static str = self.into();
        write!(f, "{}", name)
    }
}

impl fmt::Display for StationField {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name: &'static str = self.into();
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_from_string_for_variable() {
        assert_eq!(Variable::from_str("t").unwrap(), Variable::Temperature);
        assert_eq!(Variable::from_str("rh").unwrap(), Variable::RelativeHumidity);
        assert!(Variable::from_str("cape").is_err());
    }

    #[test]
    fn round_trip_strings_for_variable() {
        for var in Variable::iter() {
            assert_eq!(Variable::from_str(&var.to_string()).unwrap(), var);
        }
    }

    #[test]
    fn test_station_fields() {
        assert_eq!(StationField::from_str("FXI").unwrap(), StationField::FXI);
        assert!(StationField::from_str("fxi").is_err());
        assert_eq!(StationField::DD.to_string(), "DD");
        assert_eq!(StationField::P.source_column(Cadence::Minute), Some("PSTA"));
        assert_eq!(StationField::P.source_column(Cadence::Hourly), Some("PSTASYN"));
        assert_eq!(StationField::VIS.source_column(Cadence::Hourly), None);
        assert_eq!(StationField::TD.source_column(Cadence::Minute), None);
        assert_eq!(Cadence::from_str("hourly").unwrap(), Cadence::Hourly);
        assert_eq!(Cadence::Minute.to_string(), "minute");
    }
}
