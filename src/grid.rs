//! The common altitude grid every ascent is resampled onto.
use crate::error::{ClimoError, Result};
use metfor::{Km, Quantity};

/// What to do with a sample that falls outside the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutOfRange {
    /// Ignore the sample.
    Drop,
    /// Put the sample in the first or last bin, whichever is closer.
    Clamp,
    /// Fail with `GridAssignmentOutOfRange`.
    Reject,
}

impl Default for OutOfRange {
    fn default() -> Self {
        OutOfRange::Drop
    }
}

/// A fixed set of equally spaced altitude bins starting at the ground.
///
/// Bin `i` covers `[bottom + i * step, bottom + (i + 1) * step)`, and the whole grid covers
/// `[bottom, top)` with the top at `CEILING`. When `step` does not divide the ceiling evenly the
/// last bin is shallower than the others.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AltitudeGrid {
    bottom: Km,
    step: Km,
    bins: usize,
}

impl AltitudeGrid {
    /// Top of the grid.
    pub const CEILING: Km = Km(35.0);
    /// Default bin depth.
    pub const DEFAULT_STEP: Km = Km(0.3);
    /// Thinnest bin allowed, 35 000 bins.
    pub const MIN_STEP: Km = Km(0.001);

    // Absorbs rounding when an altitude sits exactly on a bin edge, e.g. 0.6 / 0.3.
    const EDGE_TOLERANCE: f64 = 1.0e-9;

    /// Create a grid from the ground to `CEILING` with bins `step` deep.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use metfor::Km;
    /// use sounding_climatology::AltitudeGrid;
    ///
    /// let grid = AltitudeGrid::new(Km(0.3)).unwrap();
    /// assert_eq!(grid.len(), 117);
    /// assert!(AltitudeGrid::new(Km(0.0)).is_err());
    /// ```
    pub fn new(step: Km) -> Result<Self> {
        let step_val = step.unpack();
        let ceiling = Self::CEILING.unpack();
        let min_step = Self::MIN_STEP.unpack();

        if !step_val.is_finite() || step_val < min_step || step_val > ceiling {
            return Err(ClimoError::InvalidGrid(format!(
                "step must be in [{}, {}] km, got {}",
                min_step, ceiling, step_val
            )));
        }

        let bins = (ceiling / step_val - Self::EDGE_TOLERANCE).ceil() as usize;

        Ok(AltitudeGrid {
            bottom: Km(0.0),
            step,
            bins,
        })
    }

    /// Number of bins.
    #[inline]
    pub fn len(&self) -> usize {
        self.bins
    }

    /// Always false, a valid grid has at least one bin.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bins == 0
    }

    /// Bin depth.
    #[inline]
    pub fn step(&self) -> Km {
        self.step
    }

    /// Bottom of the lowest bin.
    #[inline]
    pub fn bottom(&self) -> Km {
        self.bottom
    }

    /// Top of the highest bin, samples here and above are out of range.
    #[inline]
    pub fn top(&self) -> Km {
        Km(self.bottom.unpack() + Self::CEILING.unpack())
    }

    /// Lower edge of every bin.
    pub fn lower_edges(&self) -> Vec<Km> {
        (0..self.bins)
            .map(|i| Km(self.bottom.unpack() + self.step.unpack() * i as f64))
            .collect()
    }

    /// Find the bin an altitude belongs to.
    ///
    /// Returns `Ok(None)` when the sample is out of range and the policy is `Drop`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use metfor::Km;
    /// use sounding_climatology::{grid::OutOfRange, AltitudeGrid};
    ///
    /// let grid = AltitudeGrid::default();
    /// assert_eq!(grid.bin_index(Km(0.05), OutOfRange::Drop).unwrap(), Some(0));
    /// assert_eq!(grid.bin_index(Km(0.32), OutOfRange::Drop).unwrap(), Some(1));
    /// assert_eq!(grid.bin_index(Km(40.0), OutOfRange::Drop).unwrap(), None);
    /// assert_eq!(grid.bin_index(Km(40.0), OutOfRange::Clamp).unwrap(), Some(116));
    /// assert!(grid.bin_index(Km(40.0), OutOfRange::Reject).is_err());
    /// ```
    pub fn bin_index(&self, altitude: Km, policy: OutOfRange) -> Result<Option<usize>> {
        let alt = altitude.unpack();
        let bottom = self.bottom.unpack();

        if alt >= bottom && alt < self.top().unpack() {
            let pos = (alt - bottom) / self.step.unpack() + Self::EDGE_TOLERANCE;
            let idx = (pos.floor() as usize).min(self.bins - 1);
            return Ok(Some(idx));
        }

        match policy {
            OutOfRange::Drop => Ok(None),
            OutOfRange::Reject => Err(ClimoError::GridAssignmentOutOfRange { altitude: alt }),
            OutOfRange::Clamp if alt.is_nan() => Ok(None),
            OutOfRange::Clamp if alt < bottom => Ok(Some(0)),
            OutOfRange::Clamp => Ok(Some(self.bins - 1)),
        }
    }
}

impl Default for AltitudeGrid {
    fn default() -> Self {
        AltitudeGrid {
            bottom: Km(0.0),
            step: Self::DEFAULT_STEP,
            bins: 117,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::utility::test_tools::*;

    #[test]
    fn test_default_matches_new() {
        assert_eq!(
            AltitudeGrid::default(),
            AltitudeGrid::new(AltitudeGrid::DEFAULT_STEP).unwrap()
        );
    }

    #[test]
    fn test_bin_counts() {
        assert_eq!(AltitudeGrid::new(Km(0.5)).unwrap().len(), 70);
        assert_eq!(AltitudeGrid::new(Km(1.0)).unwrap().len(), 35);
        assert_eq!(AltitudeGrid::new(Km(35.0)).unwrap().len(), 1);
        assert_eq!(AltitudeGrid::new(Km(0.1)).unwrap().len(), 350);
        assert!(AltitudeGrid::new(Km(-0.3)).is_err());
        assert!(AltitudeGrid::new(Km(36.0)).is_err());
        assert!(AltitudeGrid::new(Km(std::f64::NAN)).is_err());
    }

    #[test]
    fn test_tiny_steps() {
        assert_eq!(AltitudeGrid::new(AltitudeGrid::MIN_STEP).unwrap().len(), 35_000);

        for &step in &[1.0e-300, 1.0e-9, 0.000_999, std::f64::MIN_POSITIVE] {
            match AltitudeGrid::new(Km(step)) {
                Err(ClimoError::InvalidGrid(_)) => {}
                other => panic!("step {} gave {:?}", step, other),
            }
        }
    }

    #[test]
    fn test_edges() {
        let grid = AltitudeGrid::default();
        let edges = grid.lower_edges();
        assert_eq!(edges.len(), grid.len());
        assert!(approx_equal(edges[0].unpack(), 0.0, 1.0e-12));
        assert!(approx_equal(edges[116].unpack(), 34.8, 1.0e-9));
        assert!(approx_equal(grid.top().unpack(), 35.0, 1.0e-12));
    }

    #[test]
    fn test_adjacent_samples_distinct_bins() {
        let grid = AltitudeGrid::default();
        let low = grid.bin_index(Km(0.05), OutOfRange::Reject).unwrap();
        let high = grid.bin_index(Km(0.32), OutOfRange::Reject).unwrap();
        assert_eq!(low, Some(0));
        assert_eq!(high, Some(1));
    }

    #[test]
    fn test_exact_edges() {
        let grid = AltitudeGrid::default();
        for i in 0..grid.len() {
            let alt = Km(0.3 * i as f64);
            assert_eq!(grid.bin_index(alt, OutOfRange::Reject).unwrap(), Some(i));
        }
    }

    #[test]
    fn test_out_of_range_policies() {
        let grid = AltitudeGrid::default();

        assert_eq!(grid.bin_index(Km(-0.01), OutOfRange::Drop).unwrap(), None);
        assert_eq!(grid.bin_index(Km(-0.01), OutOfRange::Clamp).unwrap(), Some(0));
        assert!(matches!(
            grid.bin_index(Km(-0.01), OutOfRange::Reject),
            Err(ClimoError::GridAssignmentOutOfRange { .. })
        ));

        assert_eq!(grid.bin_index(Km(34.95), OutOfRange::Drop).unwrap(), Some(116));
        assert_eq!(grid.bin_index(Km(35.0), OutOfRange::Drop).unwrap(), None);
        assert_eq!(grid.bin_index(Km(35.0), OutOfRange::Clamp).unwrap(), Some(116));

        assert_eq!(
            grid.bin_index(Km(std::f64::NAN), OutOfRange::Clamp).unwrap(),
            None
        );
        assert!(grid
            .bin_index(Km(std::f64::INFINITY), OutOfRange::Reject)
            .is_err());
    }
}
