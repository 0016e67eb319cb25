//! Daily climatology and anomaly of resampled profiles.
//!
//! Years are aligned by calendar day (month and day), so a year with a missing day or an extra
//! February 29th does not shift the rest of the year. The last year handed in is the one being
//! compared against the climatology of all the others.
use crate::{
    calendar::CalendarDate,
    error::{ClimoError, Result},
    resample::GridProfile,
    utility::MeanAccumulator,
};
use itertools::izip;
use optional::Optioned;
use std::collections::BTreeMap;

/// A resampled profile for one day.
#[derive(Clone, Debug, PartialEq)]
pub struct DailyProfile {
    /// The launch day.
    pub date: CalendarDate,
    /// One value per grid bin.
    pub values: GridProfile,
}

/// All the resampled profiles of one year, in date order.
#[derive(Clone, Debug, PartialEq)]
pub struct YearSeries {
    /// The year.
    pub year: i32,
    /// One entry per processed day.
    pub days: Vec<DailyProfile>,
}

impl YearSeries {
    /// Create an empty series.
    pub fn new(year: i32) -> Self {
        YearSeries { year, days: vec![] }
    }

    /// Does any day have at least one value?
    pub fn has_data(&self) -> bool {
        self.days
            .iter()
            .any(|day| day.values.iter().any(|v| v.is_some()))
    }
}

/// Climatological profile of one calendar day.
#[derive(Clone, Debug, PartialEq)]
pub struct ClimoDay {
    /// Month, 1-12.
    pub month: u32,
    /// Day of the month.
    pub day: u32,
    /// Mean over the reference years per bin.
    pub values: GridProfile,
    /// Number of reference years that had a value per bin.
    pub samples: Vec<usize>,
}

/// Climatology of every calendar day seen in the reference years.
#[derive(Clone, Debug, PartialEq)]
pub struct Climatology {
    /// Years averaged into this climatology.
    pub years: Vec<i32>,
    /// Calendar days in calendar order.
    pub days: Vec<ClimoDay>,
}

impl Climatology {
    /// Look up a calendar day.
    pub fn get(&self, month: u32, day: u32) -> Option<&ClimoDay> {
        self.days
            .binary_search_by_key(&(month, day), |cd| (cd.month, cd.day))
            .ok()
            .map(|idx| &self.days[idx])
    }
}

/// Output of `aggregate`.
#[derive(Clone, Debug, PartialEq)]
pub struct Aggregation {
    /// Climatology of all years but the last.
    pub climatology: Climatology,
    /// The last year minus the climatology.
    pub anomaly: YearSeries,
}

/// Build the climatology of all but the last series and the anomaly of the last one.
///
/// # Examples
///
/// ```rust
/// use optional::{none, some};
/// use sounding_climatology::{
///     climatology::{aggregate, DailyProfile, YearSeries},
///     CalendarDate,
/// };
///
/// let series: Vec<YearSeries> = [(2021, some(10.0)), (2022, some(20.0)), (2023, none())]
///     .iter()
///     .map(|&(year, val)| YearSeries {
///         year,
///         days: vec![DailyProfile {
///             date: CalendarDate::new(year, 1, 1).unwrap(),
///             values: vec![val],
///         }],
///     })
///     .collect();
///
/// let agg = aggregate(&series).unwrap();
/// assert_eq!(agg.climatology.days[0].values[0].unpack(), 15.0);
/// assert!(agg.anomaly.days[0].values[0].is_none());
/// ```
pub fn aggregate(series: &[YearSeries]) -> Result<Aggregation> {
    let (latest, reference) = match series.split_last() {
        Some((latest, reference)) if !reference.is_empty() => (latest, reference),
        _ => return Err(ClimoError::NotEnoughYears(series.len())),
    };

    if !series.iter().any(YearSeries::has_data) {
        return Err(ClimoError::NoData);
    }

    let bins = series
        .iter()
        .flat_map(|s| s.days.iter())
        .map(|d| d.values.len())
        .next()
        .unwrap_or(0);
    if series
        .iter()
        .flat_map(|s| s.days.iter())
        .any(|d| d.values.len() != bins)
    {
        return Err(ClimoError::InvalidInput(
            "all profiles must be on the same grid",
        ));
    }

    let climatology = climatology(reference, bins);
    let anomaly = anomaly(latest, &climatology);

    Ok(Aggregation {
        climatology,
        anomaly,
    })
}

fn climatology(reference: &[YearSeries], bins: usize) -> Climatology {
    let mut accumulators: BTreeMap<(u32, u32), Vec<MeanAccumulator>> = BTreeMap::new();

    for day in reference.iter().flat_map(|s| s.days.iter()) {
        let key = (day.date.month(), day.date.day());
        let accs = accumulators
            .entry(key)
            .or_insert_with(|| vec![MeanAccumulator::default(); bins]);

        for (acc, &val) in izip!(accs.iter_mut(), &day.values) {
            acc.add_opt(val);
        }
    }

    let days = accumulators
        .into_iter()
        .map(|((month, day), accs)| ClimoDay {
            month,
            day,
            values: accs.iter().map(MeanAccumulator::mean).collect(),
            samples: accs.iter().map(MeanAccumulator::count).collect(),
        })
        .collect();

    Climatology {
        years: reference.iter().map(|s| s.year).collect(),
        days,
    }
}

fn anomaly(latest: &YearSeries, climo: &Climatology) -> YearSeries {
    let days = latest
        .days
        .iter()
        .map(|day| {
            let values = match climo.get(day.date.month(), day.date.day()) {
                Some(climo_day) => izip!(&day.values, &climo_day.values)
                    .map(|(&val, &clim)| difference(val, clim))
                    .collect(),
                None => vec![optional::none(); day.values.len()],
            };

            DailyProfile {
                date: day.date,
                values,
            }
        })
        .collect();

    YearSeries {
        year: latest.year,
        days,
    }
}

#[inline]
fn difference(val: Optioned<f64>, clim: Optioned<f64>) -> Optioned<f64> {
    match (val.into_option(), clim.into_option()) {
        (Some(val), Some(clim)) => optional::some(val - clim),
        _ => optional::none(),
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::utility::test_tools::*;
    use optional::{none, some};

    fn series(year: i32, days: &[(u32, u32, Vec<Optioned<f64>>)]) -> YearSeries {
        YearSeries {
            year,
            days: days
                .iter()
                .map(|(m, d, vals)| DailyProfile {
                    date: CalendarDate::new(year, *m, *d).unwrap(),
                    values: vals.clone(),
                })
                .collect(),
        }
    }

    #[test]
    fn test_climatology_ignores_missing_and_latest() {
        let input = vec![
            series(2020, &[(1, 1, vec![some(10.0), none()])]),
            series(2021, &[(1, 1, vec![some(20.0), none()])]),
            series(2022, &[(1, 1, vec![none(), some(5.0)])]),
        ];

        let agg = aggregate(&input).unwrap();
        let day = agg.climatology.get(1, 1).unwrap();
        assert!(approx_equal(day.values[0].unpack(), 15.0, 1.0e-12));
        assert!(day.values[1].is_none());
        assert_eq!(day.samples, vec![2, 0]);
        assert_eq!(agg.climatology.years, vec![2020, 2021]);

        assert_eq!(agg.anomaly.year, 2022);
        assert!(agg.anomaly.days[0].values[0].is_none());
        assert!(agg.anomaly.days[0].values[1].is_none());
    }

    #[test]
    fn test_anomaly_values() {
        let input = vec![
            series(2020, &[(3, 1, vec![some(250.0)]), (3, 2, vec![some(251.0)])]),
            series(2021, &[(3, 1, vec![some(252.0)]), (3, 2, vec![none()])]),
            series(2022, &[(3, 1, vec![some(253.0)]), (3, 2, vec![some(250.0)])]),
        ];

        let agg = aggregate(&input).unwrap();
        let anom = &agg.anomaly.days;
        assert!(approx_equal(anom[0].values[0].unpack(), 2.0, 1.0e-12));
        assert!(approx_equal(anom[1].values[0].unpack(), -1.0, 1.0e-12));
    }

    #[test]
    fn test_alignment_by_calendar_day() {
        // 2020 is a leap year, the latest year must still line up on March 1st.
        let input = vec![
            series(
                2020,
                &[(2, 28, vec![some(1.0)]), (2, 29, vec![some(2.0)]), (3, 1, vec![some(3.0)])],
            ),
            series(2021, &[(2, 28, vec![some(1.0)]), (3, 1, vec![some(5.0)])]),
        ];

        let agg = aggregate(&input).unwrap();
        assert_eq!(agg.climatology.days.len(), 3);
        let anom = &agg.anomaly.days;
        assert_eq!(anom.len(), 2);
        assert!(approx_equal(anom[0].values[0].unpack(), 0.0, 1.0e-12));
        assert!(approx_equal(anom[1].values[0].unpack(), 2.0, 1.0e-12));
    }

    #[test]
    fn test_day_without_climatology() {
        let input = vec![
            series(2020, &[(1, 1, vec![some(1.0)])]),
            series(2021, &[(1, 2, vec![some(1.0)])]),
        ];

        let agg = aggregate(&input).unwrap();
        assert!(agg.anomaly.days[0].values[0].is_none());
    }

    #[test]
    fn test_errors() {
        assert!(matches!(
            aggregate(&[]),
            Err(ClimoError::NotEnoughYears(0))
        ));

        let one = vec![series(2020, &[(1, 1, vec![some(1.0)])])];
        assert!(matches!(aggregate(&one), Err(ClimoError::NotEnoughYears(1))));

        let empty = vec![
            series(2020, &[(1, 1, vec![none()])]),
            series(2021, &[(1, 1, vec![none()])]),
        ];
        assert!(matches!(aggregate(&empty), Err(ClimoError::NoData)));

        let ragged = vec![
            series(2020, &[(1, 1, vec![some(1.0)])]),
            series(2021, &[(1, 1, vec![some(1.0), none()])]),
        ];
        assert!(matches!(
            aggregate(&ragged),
            Err(ClimoError::InvalidInput(_))
        ));
    }
}
