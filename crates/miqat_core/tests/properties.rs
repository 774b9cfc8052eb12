use chrono::{NaiveDate, TimeDelta};
use chrono_tz::Tz;
use miqat_core::prelude::*;
use miqat_core::{HighLatitudeRule, Madhab};
use proptest::prelude::*;

fn date_from(days: i64) -> NaiveDate {
    let base = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
    base.checked_add_signed(TimeDelta::days(days)).unwrap()
}

fn any_method() -> impl Strategy<Value = CalculationMethod> {
    prop::sample::select(CalculationMethod::ALL.to_vec())
}

fn any_rule() -> impl Strategy<Value = HighLatitudeRule> {
    prop::sample::select(vec![
        HighLatitudeRule::MiddleOfTheNight,
        HighLatitudeRule::SeventhOfTheNight,
        HighLatitudeRule::TwilightAngle,
    ])
}

proptest! {
    /// Invariant: six strictly increasing instants for every valid input.
    #[test]
    fn schedule_is_strictly_ordered(
        lat in -90.0f64..=90.0,
        lng in -180.0f64..=180.0,
        days in 0i64..18262,
        method in any_method(),
        rule in any_rule(),
        hanafi in any::<bool>(),
    ) {
        let coords = GeoCoordinate::new(lat, lng).unwrap();
        let madhab = if hanafi { Madhab::Hanafi } else { Madhab::Shafi };
        let params = method.parameters().high_latitude_rule(rule).madhab(madhab);
        let schedule = compute_daily_schedule(coords, date_from(days), &params, Tz::UTC).unwrap();

        prop_assert_eq!(schedule.instants().len(), 6);
        for w in schedule.instants().windows(2) {
            prop_assert!(w[0].time < w[1].time, "{:?} not before {:?} at ({}, {})", w[0], w[1], lat, lng);
        }
    }

    /// Invariant: the next instant is strictly after now and within a day and a half.
    #[test]
    fn next_is_after_now(
        lat in -60.0f64..=60.0,
        lng in -180.0f64..=180.0,
        days in 0i64..3650,
        offset_minutes in 0i64..(36 * 60),
    ) {
        let coords = GeoCoordinate::new(lat, lng).unwrap();
        let date = date_from(days);
        let schedule = compute_daily_schedule(coords, date, &CalculationParameters::default(), Tz::UTC).unwrap();
        let now = schedule.time_of(Prayer::Fajr) - TimeDelta::hours(12) + TimeDelta::minutes(offset_minutes);

        let next = schedule.next_after(&now);
        prop_assert!(next.time > now);
        prop_assert!(next.time - now <= TimeDelta::hours(36));
        let selected = select_next(schedule.instants(), &now).unwrap();
        prop_assert_eq!(selected, next);
    }
}
