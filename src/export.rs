//! Write results as CSV files.
//!
//! Every row is one day, every column after the date is one grid bin labelled by its lower edge in
//! km. Missing values are written as `NaN`.
use crate::{
    climatology::{Climatology, YearSeries},
    error::Result,
    grid::AltitudeGrid,
    pipeline::ClimatologyRun,
    resample::GridProfile,
};
use log::info;
use metfor::Quantity;
use std::{fs::File, io::Write, path::Path};

fn bin_headers(grid: &AltitudeGrid) -> Vec<String> {
    grid.lower_edges()
        .iter()
        .map(|edge| format!("{:.1}", edge.unpack()))
        .collect()
}

fn value_strings(values: &GridProfile) -> impl Iterator<Item = String> + '_ {
    values.iter().map(|val| match val.into_option() {
        Some(val) => val.to_string(),
        None => "NaN".to_owned(),
    })
}

/// Write the resampled profiles of every year, one row per day.
pub fn write_series<W: Write>(out: W, grid: &AltitudeGrid, series: &[YearSeries]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);

    let mut headers = vec!["year".to_owned(), "date".to_owned()];
    headers.extend(bin_headers(grid));
    wtr.write_record(&headers)?;

    for year in series {
        for day in &year.days {
            let mut record = vec![year.year.to_string(), day.date.to_string()];
            record.extend(value_strings(&day.values));
            wtr.write_record(&record)?;
        }
    }
    wtr.flush()?;

    Ok(())
}

/// Write the anomaly of a year, same layout as `write_series`.
pub fn write_anomaly<W: Write>(out: W, grid: &AltitudeGrid, anomaly: &YearSeries) -> Result<()> {
    write_series(out, grid, std::slice::from_ref(anomaly))
}

/// Write the climatology, one row per calendar day.
///
/// The last column is the largest number of years that contributed to any bin of the day.
///
/// # Examples
///
/// ```rust
/// use optional::{none, some};
/// use sounding_climatology::{
///     climatology::{ClimoDay, Climatology},
///     export::write_climatology,
///     AltitudeGrid,
/// };
/// use metfor::Km;
///
/// let grid = AltitudeGrid::new(Km(17.5)).unwrap();
/// let climo = Climatology {
///     years: vec![2022, 2023],
///     days: vec![ClimoDay {
///         month: 2,
///         day: 28,
///         values: vec![some(251.5), none()],
///         samples: vec![2, 0],
///     }],
/// };
///
/// let mut out = vec![];
/// write_climatology(&mut out, &grid, &climo).unwrap();
/// assert_eq!(
///     String::from_utf8(out).unwrap(),
///     "month,day,0.0,17.5,samples\n2,28,251.5,NaN,2\n"
/// );
/// ```
pub fn write_climatology<W: Write>(out: W, grid: &AltitudeGrid, climo: &Climatology) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(out);

    let mut headers = vec!["month".to_owned(), "day".to_owned()];
    headers.extend(bin_headers(grid));
    headers.push("samples".to_owned());
    wtr.write_record(&headers)?;

    for day in &climo.days {
        let mut record = vec![day.month.to_string(), day.day.to_string()];
        record.extend(value_strings(&day.values));
        record.push(day.samples.iter().max().cloned().unwrap_or(0).to_string());
        wtr.write_record(&record)?;
    }
    wtr.flush()?;

    Ok(())
}

/// Write the series, climatology and anomaly of a run into `dir`.
///
/// Returns the names of the files written.
pub fn export_run(dir: &Path, run: &ClimatologyRun) -> Result<Vec<String>> {
    std::fs::create_dir_all(dir)?;

    let series_name = format!("{}_series.csv", run.variable);
    let climo_name = format!("{}_climatology.csv", run.variable);
    let anomaly_name = format!(
        "{}_anomaly_{}.csv",
        run.variable, run.aggregation.anomaly.year
    );

    write_series(File::create(dir.join(&series_name))?, &run.grid, &run.series)?;
    write_climatology(
        File::create(dir.join(&climo_name))?,
        &run.grid,
        &run.aggregation.climatology,
    )?;
    write_anomaly(
        File::create(dir.join(&anomaly_name))?,
        &run.grid,
        &run.aggregation.anomaly,
    )?;

    info!(
        "wrote {}, {} and {} to {}",
        series_name,
        climo_name,
        anomaly_name,
        dir.display()
    );

    Ok(vec![series_name, climo_name, anomaly_name])
}
