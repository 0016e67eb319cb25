//! Surface station time series.
//!
//! The automatic weather station exports one `;` separated file per month, either one line per
//! minute or one line per hour. Numbers use a decimal comma and the first column is a
//! `ddmmyyyyhhmm` UTC time stamp that sometimes lost its leading zero. This module reads those
//! files, keeps a window of time and writes the chosen parameters back out as CSV.
use crate::{
    error::{ClimoError, Result},
    keys::{Cadence, StationField},
    source::read_latin1,
};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Utc};
use log::{debug, info};
use optional::Optioned;
use std::{
    io::Write,
    path::{Path, PathBuf},
    str::FromStr,
};
use strum::IntoEnumIterator;

/// Header of the time stamp column.
pub const TIMESTAMP_COLUMN: &str = "ddmmyyyyhhmm";

/// Dumont d'Urville local time is UTC+10.
pub const DDU_UTC_OFFSET_HOURS: i64 = 10;

const FIELD_COUNT: usize = 10;

/// Convert Dumont d'Urville local time to UTC.
pub fn local_to_utc(local: NaiveDateTime) -> NaiveDateTime {
    local - Duration::hours(DDU_UTC_OFFSET_HOURS)
}

/// Parse a `ddmmyyyyhhmm` time stamp, restoring a dropped leading zero.
///
/// # Examples
///
/// ```rust
/// use sounding_climatology::station::parse_timestamp;
///
/// let full = parse_timestamp("010720240930").unwrap();
/// assert_eq!(parse_timestamp("10720240930"), Some(full));
/// assert_eq!(full.to_string(), "2024-07-01 09:30:00");
/// assert!(parse_timestamp("320720240930").is_none());
/// ```
pub fn parse_timestamp(stamp: &str) -> Option<NaiveDateTime> {
    let stamp = stamp.trim();
    if !stamp.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let stamp = match stamp.len() {
        11 => format!("0{}", stamp),
        12 => stamp.to_owned(),
        _ => return None,
    };

    let num = |range: std::ops::Range<usize>| u32::from_str(&stamp[range]).ok();

    NaiveDate::from_ymd_opt(num(4..8)? as i32, num(2..4)?, num(0..2)?)?
        .and_hms_opt(num(8..10)?, num(10..12)?, 0)
}

/// One line of a station export.
#[derive(Clone, Debug, PartialEq)]
pub struct StationObservation {
    /// UTC time of the observation.
    pub time: NaiveDateTime,
    values: [Optioned<f64>; FIELD_COUNT],
}

impl StationObservation {
    /// An observation with every parameter missing.
    pub fn new(time: NaiveDateTime) -> Self {
        StationObservation {
            time,
            values: [optional::none(); FIELD_COUNT],
        }
    }

    /// Get a parameter.
    #[inline]
    pub fn get(&self, field: StationField) -> Optioned<f64> {
        self.values[field as usize]
    }

    /// Set a parameter.
    #[inline]
    pub fn set(&mut self, field: StationField, value: Optioned<f64>) {
        self.values[field as usize] = value;
    }
}

/// Parse a whole station export, sorted by time.
///
/// Lines whose time stamp cannot be read are skipped. Empty values are missing, any other value
/// that is not a number fails the file.
pub fn parse_station_file(
    source_name: &str,
    text: &str,
    cadence: Cadence,
) -> Result<Vec<StationObservation>> {
    let mut lines = text.lines().enumerate();

    let names: Vec<&str> = match lines.next() {
        Some((_, header)) => header.split(';').map(str::trim).collect(),
        None => return Ok(vec![]),
    };

    let time_col = names
        .iter()
        .position(|&name| name == TIMESTAMP_COLUMN)
        .ok_or(ClimoError::InvalidInput("station file without a ddmmyyyyhhmm column"))?;

    // Repeated headers exist, the first one wins.
    let columns: Vec<(StationField, usize)> = StationField::iter()
        .filter_map(|field| {
            let header = field.source_column(cadence)?;
            names
                .iter()
                .position(|&name| name == header)
                .map(|idx| (field, idx))
        })
        .collect();

    let mut observations = vec![];
    for (line_idx, line) in lines {
        if line.trim().is_empty() {
            continue;
        }

        let tokens: Vec<&str> = line.split(';').map(str::trim).collect();

        let time = match tokens.get(time_col).and_then(|tok| parse_timestamp(tok)) {
            Some(time) => time,
            None => {
                debug!("{}, line {}: no valid time stamp", source_name, line_idx + 1);
                continue;
            }
        };

        let mut obs = StationObservation::new(time);
        for &(field, col) in &columns {
            let tok = tokens.get(col).cloned().unwrap_or("");
            if tok.is_empty() {
                continue;
            }

            let val = f64::from_str(&tok.replace(',', "."))
                .ok()
                .filter(|val| val.is_finite())
                .ok_or_else(|| ClimoError::MalformedRecord {
                    source_name: source_name.to_owned(),
                    line: line_idx + 1,
                    column: names[col].to_owned(),
                    value: tok.to_owned(),
                })?;
            obs.set(field, optional::some(val));
        }

        observations.push(obs);
    }

    observations.sort_by_key(|obs| obs.time);
    Ok(observations)
}

/// Keep the observations from `start` to `end`, both included.
pub fn select_window(
    observations: Vec<StationObservation>,
    start: NaiveDateTime,
    end: NaiveDateTime,
) -> Vec<StationObservation> {
    observations
        .into_iter()
        .filter(|obs| obs.time >= start && obs.time <= end)
        .collect()
}

/// A directory of monthly station exports.
#[derive(Clone, Debug)]
pub struct StationArchive {
    root: PathBuf,
    cadence: Cadence,
    current_month: (i32, u32),
}

impl StationArchive {
    /// Exports of the given cadence in `root`.
    pub fn new<P: AsRef<Path>>(root: P, cadence: Cadence) -> Self {
        let now = Utc::now();

        StationArchive {
            root: root.as_ref().to_path_buf(),
            cadence,
            current_month: (now.year(), now.month()),
        }
    }

    /// The month still being written, its file has a different name.
    pub fn with_current_month(mut self, year: i32, month: u32) -> Self {
        self.current_month = (year, month);
        self
    }

    /// Cadence of the files.
    pub fn cadence(&self) -> Cadence {
        self.cadence
    }

    /// Name of the file holding a month.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use sounding_climatology::{station::StationArchive, Cadence};
    ///
    /// let archive = StationArchive::new("/data", Cadence::Hourly).with_current_month(2024, 7);
    /// assert_eq!(archive.file_name(2024, 6), "DON_Horaire_UTC_202406.txt");
    /// assert_eq!(archive.file_name(2024, 7), "DON_Horaire_UTC_moisencours.csv");
    /// ```
    pub fn file_name(&self, year: i32, month: u32) -> String {
        let prefix = match self.cadence {
            Cadence::Minute => "DON_Minute_UTC_",
            Cadence::Hourly => "DON_Horaire_UTC_",
        };

        if (year, month) == self.current_month {
            format!("{}moisencours.csv", prefix)
        } else {
            format!("{}{:04}{:02}.txt", prefix, year, month)
        }
    }

    /// Read every month overlapping `start..=end` (UTC) and keep that window.
    ///
    /// Every month file must exist. An empty window is `NotEnoughData`.
    pub fn load_window(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Result<Vec<StationObservation>> {
        if start >= end {
            return Err(ClimoError::InvalidInput(
                "the start of the window must be before its end",
            ));
        }

        let mut observations = vec![];
        let last = (end.year(), end.month());
        let mut month = (start.year(), start.month());
        while month <= last {
            let name = self.file_name(month.0, month.1);
            let path = self.root.join(&name);
            info!("reading {}", path.display());

            let text = read_latin1(&path)?;
            let selected = select_window(parse_station_file(&name, &text, self.cadence)?, start, end);
            debug!("{} lines kept from {}", selected.len(), name);
            observations.extend(selected);

            month = match month {
                (year, 12) => (year + 1, 1),
                (year, m) => (year, m + 1),
            };
        }

        if observations.is_empty() {
            return Err(ClimoError::NotEnoughData);
        }

        Ok(observations)
    }
}

/// Parameters written when none are asked for.
pub const DEFAULT_FIELDS: [StationField; 6] = [
    StationField::T,
    StationField::U,
    StationField::P,
    StationField::FF,
    StationField::DD,
    StationField::FXI,
];

/// Name of the export of a window given in local time.
pub fn export_file_name(cadence: Cadence, start: NaiveDateTime, end: NaiveDateTime) -> String {
    let kind = match cadence {
        Cadence::Minute => "DATA_METEO",
        Cadence::Hourly => "DATA_METEO_HORAIRE",
    };

    format!(
        "{}_{}-{}.csv",
        kind,
        start.format("%Y%m%d%H%M"),
        end.format("%Y%m%d%H%M")
    )
}

/// Write the chosen parameters, `;` separated, one line per observation.
///
/// Missing values are left empty.
pub fn write_station_csv<W: Write>(
    out: W,
    observations: &[StationObservation],
    fields: &[StationField],
) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new().delimiter(b';').from_writer(out);

    let mut headers = vec!["DATE".to_owned()];
    headers.extend(fields.iter().map(|field| field.to_string()));
    wtr.write_record(&headers)?;

    for obs in observations {
        let mut record = vec![obs.time.format("%Y-%m-%d %H:%M:%S").to_string()];
        record.extend(fields.iter().map(|&field| match obs.get(field).into_option() {
            Some(val) => val.to_string(),
            None => String::new(),
        }));
        wtr.write_record(&record)?;
    }
    wtr.flush()?;

    Ok(())
}
