mod utils;

use sounding_climatology::{
    station::{local_to_utc, write_station_csv, DEFAULT_FIELDS},
    ClimoError, StationField,
};

#[test]
fn test_window_across_months() {
    let obs = utils::station_archive()
        .load_window(utils::time("310520242358"), utils::time("010620240001"))
        .unwrap();

    let times: Vec<String> = obs.iter().map(|o| o.time.to_string()).collect();
    assert_eq!(
        times,
        vec![
            "2024-05-31 23:58:00",
            "2024-05-31 23:59:00",
            "2024-06-01 00:00:00",
            "2024-06-01 00:01:00",
        ]
    );

    assert!((obs[2].get(StationField::T).unpack() + 12.6).abs() < 1.0e-9);
    assert!(obs[3].get(StationField::T).is_none());
    assert!((obs[0].get(StationField::VIS).unpack() - 20000.0).abs() < 1.0e-9);
    assert!(obs[1].get(StationField::VIS).is_none());
}

#[test]
fn test_local_window_export() {
    let start = local_to_utc(utils::time("010620240959"));
    let end = local_to_utc(utils::time("010620241002"));
    let obs = utils::station_archive().load_window(start, end).unwrap();
    assert_eq!(obs.len(), 4);

    let mut out = vec![];
    write_station_csv(&mut out, &obs, &DEFAULT_FIELDS).unwrap();
    let text = String::from_utf8(out).unwrap();
    let lines: Vec<&str> = text.lines().collect();

    assert_eq!(lines[0], "DATE;T;U;P;FF;DD;FXI");
    assert_eq!(lines[1], "2024-05-31 23:59:00;-12.5;72;985.3;5.8;145;8.1");
    assert_eq!(lines[3], "2024-06-01 00:01:00;;72;985.4;5.1;150;7.2");
    assert_eq!(lines.len(), 5);
}

#[test]
fn test_missing_month() {
    assert!(matches!(
        utils::station_archive()
            .load_window(utils::time("300420242300"), utils::time("010520240000")),
        Err(ClimoError::Io(_))
    ));
}

#[test]
fn test_empty_window() {
    assert!(matches!(
        utils::station_archive()
            .load_window(utils::time("010620241200"), utils::time("010620241300")),
        Err(ClimoError::NotEnoughData)
    ));
}
