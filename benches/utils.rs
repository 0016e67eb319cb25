use sounding_climatology::{parse::parse_record, CalendarDate, SoundingRecord};
use std::{fs::File, io::Read, path::PathBuf};

pub fn load_all_test_files() -> [(String, SoundingRecord); 2] {
    let snd1 = load_test_file("DD2022011500.cor", CalendarDate::new(2022, 1, 15).unwrap());
    let snd2 = load_test_file("DD2023011512.cor", CalendarDate::new(2023, 1, 15).unwrap());

    [snd1, snd2]
}

fn load_test_file(fname: &str, date: CalendarDate) -> (String, SoundingRecord) {
    let mut test_path = PathBuf::new();
    test_path.push("test_data");
    test_path.push("archive");
    test_path.push(fname);

    let mut f = File::open(&test_path).expect(&format!("Error opening file: {:#?}", test_path));

    let mut bytes = vec![];
    f.read_to_end(&mut bytes)
        .expect(&format!("Error reading file: {:#?}", test_path));
    let contents: String = bytes.into_iter().map(char::from).collect();

    let rec = parse_record(date, fname, &contents).expect("oops");
    (contents, rec)
}
