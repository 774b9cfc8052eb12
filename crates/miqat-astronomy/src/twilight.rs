//! Moonsighting Committee season-adjusted twilight.
//!
//! Instead of a fixed depression angle, Fajr and Isha are placed a number
//! of minutes before sunrise / after sunset. The number is interpolated
//! piecewise-linearly across the year between four latitude-dependent
//! anchors (a, b, c, d), counted from the winter solstice.

use chrono::{DateTime, Datelike, NaiveDate, TimeDelta, Utc};
use miqat_types::Shafaq;

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

/// Days elapsed since the winter solstice of the observer's hemisphere.
pub fn days_since_solstice(date: NaiveDate, latitude: f64) -> i64 {
    let day_of_year = date.ordinal() as i64;
    let leap = is_leap_year(date.year());
    let days_in_year = if leap { 366 } else { 365 };
    let northern_offset = 10;
    let southern_offset = if leap { 173 } else { 172 };

    if latitude >= 0.0 {
        let days = day_of_year + northern_offset;
        if days >= days_in_year { days - days_in_year } else { days }
    } else {
        let days = day_of_year - southern_offset;
        if days < 0 { days + days_in_year } else { days }
    }
}

/// Piecewise interpolation through the four seasonal anchors.
fn seasonal_minutes(a: f64, b: f64, c: f64, d: f64, dyy: i64) -> f64 {
    let dyy = dyy as f64;
    if dyy < 91.0 {
        a + (b - a) / 91.0 * dyy
    } else if dyy < 137.0 {
        b + (c - b) / 46.0 * (dyy - 91.0)
    } else if dyy < 183.0 {
        c + (d - c) / 46.0 * (dyy - 137.0)
    } else if dyy < 229.0 {
        d + (c - d) / 46.0 * (dyy - 183.0)
    } else if dyy < 275.0 {
        c + (b - c) / 46.0 * (dyy - 229.0)
    } else {
        b + (a - b) / 91.0 * (dyy - 275.0)
    }
}

fn minutes_to_delta(minutes: f64) -> TimeDelta {
    TimeDelta::seconds((minutes * 60.0).round() as i64)
}

/// Minutes between Fajr and sunrise for this latitude and date.
pub fn morning_twilight_minutes(latitude: f64, date: NaiveDate) -> f64 {
    let lat = latitude.abs();
    let a = 75.0 + 28.65 / 55.0 * lat;
    let b = 75.0 + 19.44 / 55.0 * lat;
    let c = 75.0 + 32.74 / 55.0 * lat;
    let d = 75.0 + 48.10 / 55.0 * lat;
    seasonal_minutes(a, b, c, d, days_since_solstice(date, latitude))
}

/// Minutes between sunset and Isha for this latitude, date and shafaq.
pub fn evening_twilight_minutes(latitude: f64, date: NaiveDate, shafaq: Shafaq) -> f64 {
    let lat = latitude.abs();
    let (a, b, c, d) = match shafaq {
        Shafaq::General => (
            75.0 + 25.60 / 55.0 * lat,
            75.0 + 2.050 / 55.0 * lat,
            75.0 - 9.21 / 55.0 * lat,
            75.0 + 6.14 / 55.0 * lat,
        ),
        Shafaq::Ahmer => (
            62.0 + 17.40 / 55.0 * lat,
            62.0 - 7.16 / 55.0 * lat,
            62.0 + 5.12 / 55.0 * lat,
            62.0 + 19.44 / 55.0 * lat,
        ),
        Shafaq::Abyad => (
            75.0 + 25.60 / 55.0 * lat,
            75.0 + 7.16 / 55.0 * lat,
            75.0 + 36.84 / 55.0 * lat,
            75.0 + 81.84 / 55.0 * lat,
        ),
    };
    seasonal_minutes(a, b, c, d, days_since_solstice(date, latitude))
}

/// Season-adjusted Fajr.
pub fn season_adjusted_morning_twilight(
    latitude: f64,
    date: NaiveDate,
    sunrise: DateTime<Utc>,
) -> DateTime<Utc> {
    sunrise - minutes_to_delta(morning_twilight_minutes(latitude, date))
}

/// Season-adjusted Isha.
pub fn season_adjusted_evening_twilight(
    latitude: f64,
    date: NaiveDate,
    sunset: DateTime<Utc>,
    shafaq: Shafaq,
) -> DateTime<Utc> {
    sunset + minutes_to_delta(evening_twilight_minutes(latitude, date, shafaq))
}
