use optional::Optioned;

/// Running sum and count for averaging while skipping missing values.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct MeanAccumulator {
    sum: f64,
    count: usize,
}

impl MeanAccumulator {
    /// Add a value, NaN and infinities are ignored.
    #[inline]
    pub(crate) fn add(&mut self, val: f64) {
        if val.is_finite() {
            self.sum += val;
            self.count += 1;
        }
    }

    /// Add a value if it is present.
    #[inline]
    pub(crate) fn add_opt(&mut self, val: Optioned<f64>) {
        if let Some(val) = val.into_option() {
            self.add(val);
        }
    }

    /// Number of values that went into the mean.
    #[inline]
    pub(crate) fn count(&self) -> usize {
        self.count
    }

    /// The mean, or none if nothing was added.
    #[inline]
    pub(crate) fn mean(&self) -> Optioned<f64> {
        if self.count > 0 {
            optional::some(self.sum / self.count as f64)
        } else {
            optional::none()
        }
    }
}

#[cfg(test)]
pub mod test_tools {
    pub fn approx_equal(val1: f64, val2: f64, eps: f64) -> bool {
        assert!(eps > 0.0);

        (val1 - val2).abs() < eps
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::utility::test_tools::*;

    #[test]
    fn test_mean_accumulator() {
        let mut acc = MeanAccumulator::default();
        assert!(acc.mean().is_none());

        acc.add(10.0);
        acc.add(std::f64::NAN);
        acc.add_opt(optional::none());
        acc.add_opt(optional::some(20.0));

        assert_eq!(acc.count(), 2);
        assert!(approx_equal(acc.mean().unpack(), 15.0, 1.0e-12));
    }
}
