//! Prayer Times Calculation Module.
//!
//! Calculates the six daily instants (Fajr, Sunrise, Dhuhr, Asr, Maghrib,
//! Isha) from the solar model in [`crate::solar_time`], applies the
//! configured high-latitude policy, method adjustments and rounding, and
//! guarantees a strictly increasing, fully defined schedule.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, TimeDelta, TimeZone, Timelike, Utc};
use chrono_tz::Tz;
use miqat_types::{
    CalculationParameters, DailySchedule, Fallback, GeoCoordinate, MiqatError, Prayer,
    PrayerInstant, Rounding,
};
use smallvec::SmallVec;
use tracing::{debug, instrument};

use crate::solar_time::{instant_from_hours, SolarTime};
use crate::twilight::{season_adjusted_evening_twilight, season_adjusted_morning_twilight};

/// Offset of the polar sunrise/sunset fallback from solar transit.
pub const POLAR_HALF_DAY_HOURS: i64 = 6;

/// Above this latitude the Moonsighting Committee uses a seventh of the night.
const MOONSIGHTING_SEVENTH_LATITUDE: f64 = 55.0;

/// Unrounded UTC instants, before adjustments.
#[derive(Debug, Clone, Copy)]
struct RawTimes {
    fajr: DateTime<Utc>,
    sunrise: DateTime<Utc>,
    dhuhr: DateTime<Utc>,
    asr: DateTime<Utc>,
    maghrib: DateTime<Utc>,
    isha: DateTime<Utc>,
}

/// Rough solar noon for when the interpolated transit is unusable.
fn noon_estimate(date: NaiveDate, longitude: f64) -> DateTime<Utc> {
    let midnight = date.and_time(chrono::NaiveTime::default()).and_utc();
    midnight + TimeDelta::hours(12) - TimeDelta::seconds((longitude * 240.0) as i64)
}

fn fraction_of(span: TimeDelta, fraction: f64) -> TimeDelta {
    TimeDelta::seconds((span.num_seconds() as f64 * fraction) as i64)
}

/// Transit, sunrise and sunset for one day, with the polar fallback applied.
fn horizon_events(
    date: NaiveDate,
    coords: GeoCoordinate,
    solar_time: &SolarTime,
    fallbacks: Option<&mut SmallVec<[Fallback; 4]>>,
) -> (DateTime<Utc>, DateTime<Utc>, DateTime<Utc>) {
    let transit = instant_from_hours(date, solar_time.transit)
        .unwrap_or_else(|| noon_estimate(date, coords.lng));
    let half_day = TimeDelta::hours(POLAR_HALF_DAY_HOURS);

    let sunrise = instant_from_hours(date, solar_time.sunrise).filter(|t| *t < transit);
    let sunset = instant_from_hours(date, solar_time.sunset).filter(|t| *t > transit);

    let mut applied: SmallVec<[Fallback; 4]> = SmallVec::new();
    let sunrise = sunrise.unwrap_or_else(|| {
        applied.push(Fallback::PolarSunrise);
        transit - half_day
    });
    let sunset = sunset.unwrap_or_else(|| {
        applied.push(Fallback::PolarSunset);
        transit + half_day
    });
    if let Some(fallbacks) = fallbacks {
        fallbacks.extend(applied);
    }
    (transit, sunrise, sunset)
}

fn compute_raw_times(
    date: NaiveDate,
    tomorrow: NaiveDate,
    coords: GeoCoordinate,
    params: &CalculationParameters,
    fallbacks: &mut SmallVec<[Fallback; 4]>,
) -> RawTimes {
    let solar_time = SolarTime::new(date, coords);
    let tomorrow_solar_time = SolarTime::new(tomorrow, coords);

    let (transit, sunrise, sunset) = horizon_events(date, coords, &solar_time, Some(&mut *fallbacks));
    let (_, tomorrow_sunrise, _) = horizon_events(tomorrow, coords, &tomorrow_solar_time, None);
    let night = (tomorrow_sunrise - sunset).max(TimeDelta::zero());

    let asr = instant_from_hours(date, solar_time.afternoon(params.madhab.shadow_length()))
        .filter(|t| *t > transit && *t < sunset)
        .unwrap_or_else(|| {
            fallbacks.push(Fallback::MidAfternoonAsr);
            transit + (sunset - transit) / 2
        });

    let moonsighting = params.is_moonsighting_committee();
    let seventh_of_night = moonsighting && coords.lat >= MOONSIGHTING_SEVENTH_LATITUDE;
    let (fajr_portion, isha_portion) = params.night_portions();

    // Fajr
    let mut fajr = instant_from_hours(date, solar_time.hour_angle(-params.fajr_angle, false));
    if seventh_of_night {
        fajr = Some(sunrise - night / 7);
    }
    let safe_fajr = if moonsighting {
        season_adjusted_morning_twilight(coords.lat, date, sunrise)
    } else {
        sunrise - fraction_of(night, fajr_portion)
    };
    let fajr = match fajr {
        Some(t) if t >= safe_fajr && t < sunrise => t,
        _ => {
            fallbacks.push(Fallback::SafeFajr);
            safe_fajr
        }
    };

    // Isha
    let isha = match params.isha_interval {
        Some(minutes) => sunset + TimeDelta::minutes(minutes as i64),
        None => {
            let mut isha = instant_from_hours(date, solar_time.hour_angle(-params.isha_angle, true));
            if seventh_of_night {
                isha = Some(sunset + night / 7);
            }
            let safe_isha = if moonsighting {
                season_adjusted_evening_twilight(coords.lat, date, sunset, params.shafaq)
            } else {
                sunset + fraction_of(night, isha_portion)
            };
            match isha {
                Some(t) if t <= safe_isha && t > sunset => t,
                _ => {
                    fallbacks.push(Fallback::SafeIsha);
                    safe_isha
                }
            }
        }
    };

    // Maghrib
    let maghrib = params
        .maghrib_angle
        .and_then(|angle| instant_from_hours(date, solar_time.hour_angle(-angle, true)))
        .filter(|t| *t > sunset && *t < isha)
        .unwrap_or(sunset);

    RawTimes {
        fajr,
        sunrise,
        dhuhr: transit,
        asr,
        maghrib,
        isha,
    }
}

/// UT day whose solar transit falls on the civil `date` in `zone`.
///
/// Starts from the UT date of local noon, then steps one day when the
/// transit still lands on a neighbouring local day. Clocks far ahead of or
/// behind solar time (Kiribati, Samoa) need this.
fn solar_date_for(date: NaiveDate, coords: GeoCoordinate, zone: Tz) -> Option<NaiveDate> {
    let guess = date
        .and_hms_opt(12, 0, 0)
        .and_then(|noon| zone.from_local_datetime(&noon).earliest())
        .map(|noon| noon.naive_utc().date())
        .unwrap_or(date);

    let transit = instant_from_hours(guess, SolarTime::new(guess, coords).transit)
        .unwrap_or_else(|| noon_estimate(guess, coords.lng));
    match transit.with_timezone(&zone).date_naive().cmp(&date) {
        Ordering::Less => guess.succ_opt(),
        Ordering::Greater => guess.pred_opt(),
        Ordering::Equal => Some(guess),
    }
}

/// Rounds to a whole minute per `rounding`.
fn round_instant(time: DateTime<Utc>, rounding: Rounding) -> DateTime<Utc> {
    let time = time.with_nanosecond(0).unwrap_or(time);
    let seconds = time.second() as i64;
    match rounding {
        Rounding::Nearest if seconds >= 30 => time + TimeDelta::seconds(60 - seconds),
        Rounding::Nearest => time - TimeDelta::seconds(seconds),
        Rounding::Up if seconds > 0 => time + TimeDelta::seconds(60 - seconds),
        Rounding::Up | Rounding::None => time,
    }
}

/// Calculates the daily prayer schedule for a given date and location.
///
/// # Arguments
/// * `coords` - Observer's geographic coordinates
/// * `date` - The civil calendar date
/// * `params` - Calculation parameters (method angles, madhab, high-latitude rule)
/// * `zone` - Time zone the instants are expressed in
///
/// # Returns
/// `DailySchedule` with six strictly increasing instants. Degenerate
/// geometry (polar day/night, unreachable twilight angles) is resolved by
/// the documented fallbacks and recorded in `DailySchedule::fallbacks`.
///
/// # Errors
/// `InvalidCoordinate` for out-of-range input, `InvalidConfiguration` for
/// invalid parameters, `InvalidDate` at the end of the calendar range.
///
/// # Example
/// ```rust
/// use chrono::NaiveDate;
/// use miqat_astronomy::prayer::compute_daily_schedule;
/// use miqat_types::{CalculationParameters, GeoCoordinate, Prayer};
///
/// let date = NaiveDate::from_ymd_opt(2024, 3, 21).unwrap();
/// let jakarta = GeoCoordinate::new(-6.2088, 106.8456).unwrap();
/// let params = CalculationParameters::default(); // Moonsighting Committee
///
/// let schedule = compute_daily_schedule(jakarta, date, &params, chrono_tz::Asia::Jakarta).unwrap();
/// println!("Dhuhr: {}", schedule.time_of(Prayer::Dhuhr));
/// ```
#[instrument(level = "debug", skip(params, zone), fields(lat = coords.lat, lng = coords.lng))]
pub fn compute_daily_schedule(
    coords: GeoCoordinate,
    date: NaiveDate,
    params: &CalculationParameters,
    zone: Tz,
) -> Result<DailySchedule, MiqatError> {
    coords.validate()?;
    params.validate()?;
    let solar_date = solar_date_for(date, coords, zone).ok_or(MiqatError::InvalidDate(date))?;
    let tomorrow = solar_date.succ_opt().ok_or(MiqatError::InvalidDate(date))?;

    let mut fallbacks: SmallVec<[Fallback; 4]> = SmallVec::new();
    let raw = compute_raw_times(solar_date, tomorrow, coords, params, &mut fallbacks);

    let raw_times = [raw.fajr, raw.sunrise, raw.dhuhr, raw.asr, raw.maghrib, raw.isha];
    let mut times = [DateTime::<Utc>::MIN_UTC; 6];
    for (i, prayer) in Prayer::ALL.iter().enumerate() {
        let adjusted = raw_times[i] + TimeDelta::minutes(params.total_adjustment(*prayer));
        times[i] = round_instant(adjusted, params.rounding);
    }

    for i in 1..times.len() {
        if times[i] <= times[i - 1] {
            times[i] = times[i - 1] + TimeDelta::minutes(1);
            fallbacks.push(Fallback::OrderingNudge(Prayer::ALL[i]));
        }
    }

    if !fallbacks.is_empty() {
        debug!(?fallbacks, %date, "extreme-latitude fallbacks applied");
    }

    let instants = Prayer::ALL.map(|prayer| {
        PrayerInstant::new(
            prayer,
            prayer.display_name(params.locale),
            times[prayer.index()].with_timezone(&zone),
        )
    });

    Ok(DailySchedule::new(date, coords, zone, instants, fallbacks))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use miqat_types::{CalculationMethod, HighLatitudeRule, Madhab};

    fn assert_strictly_increasing(schedule: &DailySchedule) {
        for w in schedule.instants().windows(2) {
            assert!(
                w[0].time < w[1].time,
                "{:?} ({}) not before {:?} ({})",
                w[0].prayer, w[0].time, w[1].prayer, w[1].time
            );
        }
    }

    #[test]
    fn test_prayer_times_jakarta_equinox() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 21).unwrap();
        let jakarta = GeoCoordinate::new(-6.2, 106.8).unwrap();
        let params = CalculationParameters::default();

        let schedule = compute_daily_schedule(jakarta, date, &params, chrono_tz::Asia::Jakarta).unwrap();

        assert_strictly_increasing(&schedule);
        let dhuhr = schedule.time_of(Prayer::Dhuhr);
        let minutes = dhuhr.hour() * 60 + dhuhr.minute();
        // Solar noon ~12:00 WIB, plus the committee's 5 minute dhuhr offset
        assert!((11 * 60 + 55..=12 * 60 + 15).contains(&minutes), "dhuhr at {}", dhuhr);
        assert!(schedule.fallbacks.is_empty());
    }

    #[test]
    fn test_prayer_times_mecca() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let mecca = GeoCoordinate::new(21.4225, 39.8262).unwrap();
        let params = CalculationMethod::UmmAlQura.parameters();

        let schedule = compute_daily_schedule(mecca, date, &params, chrono_tz::Asia::Riyadh).unwrap();

        assert_strictly_increasing(&schedule);
        let gap = schedule.time_of(Prayer::Isha) - schedule.time_of(Prayer::Maghrib);
        assert_eq!(gap.num_minutes(), 90);
    }

    #[test]
    fn test_dhuhr_adjustment_shifts_by_minutes() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let coords = GeoCoordinate::new(0.0, 106.0).unwrap();

        let base = CalculationParameters::custom(18.0, 17.0);
        let shifted = base.clone().adjustments(miqat_types::PrayerAdjustments::new().dhuhr(10));

        let a = compute_daily_schedule(coords, date, &base, Tz::UTC).unwrap();
        let b = compute_daily_schedule(coords, date, &shifted, Tz::UTC).unwrap();

        let diff = b.time_of(Prayer::Dhuhr) - a.time_of(Prayer::Dhuhr);
        assert_eq!(diff.num_minutes(), 10);
        assert_eq!(a.time_of(Prayer::Fajr), b.time_of(Prayer::Fajr));
    }

    #[test]
    fn test_hanafi_asr_is_later() {
        let date = NaiveDate::from_ymd_opt(2024, 9, 1).unwrap();
        let cairo = GeoCoordinate::new(30.0444, 31.2357).unwrap();
        let shafi = CalculationMethod::Egyptian.parameters();
        let hanafi = shafi.clone().madhab(Madhab::Hanafi);

        let a = compute_daily_schedule(cairo, date, &shafi, chrono_tz::Africa::Cairo).unwrap();
        let b = compute_daily_schedule(cairo, date, &hanafi, chrono_tz::Africa::Cairo).unwrap();

        assert!(b.time_of(Prayer::Asr) > a.time_of(Prayer::Asr));
        assert_eq!(a.time_of(Prayer::Maghrib), b.time_of(Prayer::Maghrib));
    }

    #[test]
    fn test_high_latitude_summer_uses_safe_bounds() {
        // Oslo in June: the sun never reaches -18°, so Fajr/Isha fall back
        let date = NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();
        let oslo = GeoCoordinate::new(59.9139, 10.7522).unwrap();
        let params = CalculationMethod::MuslimWorldLeague
            .parameters()
            .high_latitude_rule(HighLatitudeRule::SeventhOfTheNight);

        let schedule = compute_daily_schedule(oslo, date, &params, chrono_tz::Europe::Oslo).unwrap();

        assert_strictly_increasing(&schedule);
        assert!(schedule.fallbacks.contains(&Fallback::SafeFajr));
        assert!(schedule.fallbacks.contains(&Fallback::SafeIsha));
    }

    #[test]
    fn test_moonsighting_above_55_uses_seventh() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();
        let coords = GeoCoordinate::new(57.0, 10.0).unwrap();
        let schedule = compute_daily_schedule(coords, date, &CalculationParameters::default(), Tz::UTC).unwrap();
        assert_strictly_increasing(&schedule);
    }

    #[test]
    fn test_polar_night_fallback() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 21).unwrap();
        let svalbard = GeoCoordinate::new(78.2232, 15.6267).unwrap();
        let schedule = compute_daily_schedule(svalbard, date, &CalculationParameters::default(), chrono_tz::Europe::Oslo).unwrap();

        assert_strictly_increasing(&schedule);
        assert!(schedule.fallbacks.contains(&Fallback::PolarSunrise));
        assert!(schedule.fallbacks.contains(&Fallback::PolarSunset));
        let day = schedule.time_of(Prayer::Maghrib) - schedule.time_of(Prayer::Sunrise);
        // 12h window around transit, plus the 3 minute maghrib offset
        assert!((day.num_minutes() - 12 * 60 - 3).abs() <= 1);
    }

    #[test]
    fn test_poles_are_defined() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();
        for lat in [90.0, -90.0] {
            let pole = GeoCoordinate::new(lat, 0.0).unwrap();
            let schedule = compute_daily_schedule(pole, date, &CalculationParameters::default(), Tz::UTC).unwrap();
            assert_eq!(schedule.instants().len(), 6);
            assert_strictly_increasing(&schedule);
        }
    }

    #[test]
    fn test_invalid_coordinate_is_rejected() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 21).unwrap();
        let bad = GeoCoordinate::new_unchecked(95.0, 0.0);
        let res = compute_daily_schedule(bad, date, &CalculationParameters::default(), Tz::UTC);
        assert!(matches!(res, Err(MiqatError::InvalidCoordinate { .. })));
    }

    #[test]
    fn test_deterministic() {
        let date = NaiveDate::from_ymd_opt(2025, 2, 10).unwrap();
        let coords = GeoCoordinate::new(-7.8195, 110.3610).unwrap();
        let params = CalculationParameters::default();
        let a = compute_daily_schedule(coords, date, &params, chrono_tz::Asia::Jakarta).unwrap();
        let b = compute_daily_schedule(coords, date, &params, chrono_tz::Asia::Jakarta).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_rounding() {
        let t = DateTime::parse_from_rfc3339("2024-01-01T05:10:31Z").unwrap().with_timezone(&Utc);
        assert_eq!(round_instant(t, Rounding::Nearest).minute(), 11);
        assert_eq!(round_instant(t, Rounding::Up).minute(), 11);
        assert_eq!(round_instant(t, Rounding::None).second(), 31);
        let t = DateTime::parse_from_rfc3339("2024-01-01T05:10:29Z").unwrap().with_timezone(&Utc);
        assert_eq!(round_instant(t, Rounding::Nearest).minute(), 10);
        assert_eq!(round_instant(t, Rounding::Nearest).second(), 0);
    }

    #[test]
    fn test_instants_fall_on_requested_local_day() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 21).unwrap();
        let places = [
            (1.8721, -157.4278, chrono_tz::Pacific::Kiritimati),
            (-13.8333, -171.7667, chrono_tz::Pacific::Apia),
            (-36.8485, 174.7633, chrono_tz::Pacific::Auckland),
            (-6.2088, 106.8456, chrono_tz::Asia::Jakarta),
            (21.3069, -157.8583, chrono_tz::Pacific::Honolulu),
        ];
        for (lat, lng, zone) in places {
            let coords = GeoCoordinate::new(lat, lng).unwrap();
            let schedule = compute_daily_schedule(coords, date, &CalculationParameters::default(), zone).unwrap();
            assert_strictly_increasing(&schedule);
            for instant in schedule.instants() {
                assert_eq!(instant.time.date_naive(), date, "{} {:?} at {}", zone, instant.prayer, instant.time);
            }
            let dhuhr = schedule.time_of(Prayer::Dhuhr);
            assert!((11..=13).contains(&dhuhr.hour()), "{} dhuhr at {}", zone, dhuhr);
        }
    }

    #[test]
    fn test_solar_date_follows_zone() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 21).unwrap();
        let kiritimati = GeoCoordinate::new(1.8721, -157.4278).unwrap();
        assert_eq!(
            solar_date_for(date, kiritimati, chrono_tz::Pacific::Kiritimati),
            NaiveDate::from_ymd_opt(2024, 3, 20)
        );
        assert_eq!(solar_date_for(date, kiritimati, Tz::UTC), Some(date));
        let jakarta = GeoCoordinate::new(-6.2088, 106.8456).unwrap();
        assert_eq!(solar_date_for(date, jakarta, chrono_tz::Asia::Jakarta), Some(date));
    }

    #[test]
    fn test_display_names_follow_locale() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 21).unwrap();
        let coords = GeoCoordinate::new(-6.2, 106.8).unwrap();
        let params = CalculationParameters::default();
        let schedule = compute_daily_schedule(coords, date, &params, Tz::UTC).unwrap();
        assert_eq!(schedule.get(Prayer::Fajr).display_name, "Subuh");

        let params = params.locale(miqat_types::DisplayLocale::English);
        let schedule = compute_daily_schedule(coords, date, &params, Tz::UTC).unwrap();
        assert_eq!(schedule.get(Prayer::Fajr).display_name, "Fajr");
    }
}
