//! Put an irregularly sampled ascent onto the common altitude grid.
//!
//! Every sample is assigned to the grid bin that contains its altitude and the samples in a bin
//! are averaged. This is a pure function of the record and the grid, nothing is shared between
//! calls.
use crate::{
    error::Result,
    grid::{AltitudeGrid, OutOfRange},
    keys::Variable,
    sounding::{Profile, SoundingRecord},
    utility::MeanAccumulator,
};
use itertools::izip;
use optional::Optioned;

/// One value per grid bin, none where no sample landed.
pub type GridProfile = Vec<Optioned<f64>>;

/// A grid profile with every bin missing.
pub fn empty_grid_profile(grid: &AltitudeGrid) -> GridProfile {
    vec![optional::none(); grid.len()]
}

/// Average the samples of one variable in each bin of the grid.
///
/// # Examples
///
/// ```rust
/// use sounding_climatology::{
///     grid::OutOfRange, parse::parse_record, resample::resample, AltitudeGrid, CalendarDate,
///     Variable,
/// };
///
/// let text = "V 14\n\
///             0;50;0;0;0;0;5;3;90;0;-1.0;80;990\n\
///             1;320;0;0;0;0;5;12;95;0;-3.0;40;960\n";
/// let date = CalendarDate::new(2024, 1, 1).unwrap();
/// let rec = parse_record(date, "test", text).unwrap();
///
/// let grid = AltitudeGrid::default();
/// let rh = resample(&rec, Variable::RelativeHumidity, &grid, OutOfRange::Drop).unwrap();
/// assert_eq!(rh[0].unpack(), 80.0);
/// assert_eq!(rh[1].unpack(), 40.0);
/// assert!(rh[2].is_none());
/// ```
pub fn resample(
    record: &SoundingRecord,
    var: Variable,
    grid: &AltitudeGrid,
    policy: OutOfRange,
) -> Result<GridProfile> {
    let mut buckets = vec![MeanAccumulator::default(); grid.len()];

    let values = record.values(var);
    for (&alt, val) in izip!(record.altitude_profile(), values) {
        if let Some(idx) = grid.bin_index(alt, policy)? {
            buckets[idx].add(val);
        }
    }

    Ok(buckets.iter().map(MeanAccumulator::mean).collect())
}

/// Resample a profile, a missing day gives a profile with every bin missing.
pub fn resample_profile(
    profile: &Profile,
    var: Variable,
    grid: &AltitudeGrid,
    policy: OutOfRange,
) -> Result<GridProfile> {
    match profile {
        Profile::Present(rec) => resample(rec, var, grid, policy),
        Profile::Missing => Ok(empty_grid_profile(grid)),
    }
}
