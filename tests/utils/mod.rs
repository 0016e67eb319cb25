#![allow(dead_code)]
use chrono::NaiveDateTime;
use sounding_climatology::{
    parse::parse_record,
    source::ArchiveDir,
    station::{parse_timestamp, StationArchive},
    Cadence, CalendarDate, SoundingRecord,
};
use std::{fs::File, io::Read, path::PathBuf, str::FromStr};

pub fn archive_path() -> PathBuf {
    let mut path = PathBuf::new();
    path.push("test_data");
    path.push("archive");
    path
}

pub fn archive() -> ArchiveDir {
    ArchiveDir::new(archive_path())
}

/// Minute exports of May and June 2024, with June as a finished month.
pub fn station_archive() -> StationArchive {
    let mut path = PathBuf::new();
    path.push("test_data");
    path.push("station");
    StationArchive::new(path, Cadence::Minute).with_current_month(2024, 7)
}

pub fn time(s: &str) -> NaiveDateTime {
    parse_timestamp(s).unwrap_or_else(|| panic!("Bad test time: {}", s))
}

pub fn date(s: &str) -> CalendarDate {
    CalendarDate::from_str(s).unwrap_or_else(|_| panic!("Bad test date: {}", s))
}

/// Load one file from the test archive, bypassing the archive lookup.
pub fn load_test_file(fname: &str, launch_day: &str) -> SoundingRecord {
    let path = archive_path().join(fname);
    let mut f = File::open(&path).expect(&format!("Error opening file: {:#?}", path));

    let mut bytes = vec![];
    f.read_to_end(&mut bytes)
        .expect(&format!("Error reading file: {:#?}", path));
    let contents: String = bytes.into_iter().map(char::from).collect();

    parse_record(date(launch_day), fname, &contents)
        .expect(&format!("Error parsing file: {:#?}", path))
}

#[allow(unused_macros)] // False alarm
macro_rules! check_ascent_only {
    ($test_name:ident, $fname:expr, $day:expr, $levels:expr) => {
        #[test]
        fn $test_name() {
            let rec = utils::load_test_file($fname, $day);

            assert_eq!(rec.len(), $levels);
            assert!(rec
                .altitude_profile()
                .windows(2)
                .all(|pair| pair[0] < pair[1]));
        }
    };
}
