use std::hint::black_box;

use chrono::NaiveDate;
use criterion::{criterion_group, criterion_main, Criterion};
use miqat_astronomy::{compute_bearing, compute_daily_schedule};
use miqat_types::{CalculationMethod, CalculationParameters, GeoCoordinate};

fn bench_schedule(c: &mut Criterion) {
    let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
    let jakarta = GeoCoordinate::new(-6.2088, 106.8456).unwrap();
    let oslo = GeoCoordinate::new(59.9139, 10.7522).unwrap();
    let moonsighting = CalculationParameters::default();
    let mwl = CalculationMethod::MuslimWorldLeague.parameters();

    c.bench_function("schedule_jakarta_moonsighting", |b| {
        b.iter(|| compute_daily_schedule(black_box(jakarta), black_box(date), &moonsighting, chrono_tz::Asia::Jakarta))
    });
    c.bench_function("schedule_oslo_mwl", |b| {
        b.iter(|| compute_daily_schedule(black_box(oslo), black_box(date), &mwl, chrono_tz::Europe::Oslo))
    });
    c.bench_function("qibla_bearing", |b| b.iter(|| compute_bearing(black_box(jakarta))));
}

criterion_group!(benches, bench_schedule);
criterion_main!(benches);
