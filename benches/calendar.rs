//! Run these benches with `cargo bench --bench calendar -- --verbose`
use criterion::{criterion_group, criterion_main, Criterion};
use sounding_climatology::{
    calendar::{date_range, year_range},
    CalendarDate,
};

fn build_tester() -> Criterion {
    Criterion::default()
        .sample_size(200)
        .measurement_time(std::time::Duration::from_secs(10))
        .noise_threshold(0.03)
        .significance_level(0.01)
}

criterion_main!(calendar_benches);

criterion_group!(
    name = calendar_benches;
    config = build_tester();
    targets = year_range_bench, adjacent_bench
);

fn year_range_bench(c: &mut Criterion) {
    c.bench_function("year_range_decade", |b| {
        b.iter(|| {
            let _x = year_range(2014, 2024);
        });
    });
}

fn adjacent_bench(c: &mut Criterion) {
    let dates = date_range(
        CalendarDate::new(2023, 1, 1).expect("oops"),
        CalendarDate::new(2024, 12, 31).expect("oops"),
    )
    .expect("oops");

    c.bench_function("adjacent", |b| {
        b.iter(|| {
            for date in &dates {
                let _x = date.adjacent();
            }
        });
    });
}
