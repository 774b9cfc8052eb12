//! Transit and hour-angle events for one observer and one day.
//!
//! All results are hours after 00:00 UT of the requested date. They are
//! NaN when the sun never reaches the requested altitude that day.

use chrono::{DateTime, Datelike, NaiveDate, NaiveTime, TimeDelta, Utc};
use miqat_types::GeoCoordinate;

use crate::solar::{
    altitude_of_celestial_body, approximate_transit, interpolate, interpolate_angles,
    julian_day, quadrant_shift_angle, sidereal_after, unwind_angle, SolarCoordinates,
    SOLAR_ALTITUDE_AT_HORIZON,
};

/// Events further than this from 00:00 UT are treated as undefined.
const MAX_EVENT_OFFSET_HOURS: f64 = 48.0;

#[derive(Debug, Clone, Copy)]
pub struct SolarTime {
    observer: GeoCoordinate,
    solar: SolarCoordinates,
    prev_solar: SolarCoordinates,
    next_solar: SolarCoordinates,
    approx_transit: f64,
    /// Solar noon.
    pub transit: f64,
    pub sunrise: f64,
    pub sunset: f64,
}

impl SolarTime {
    pub fn new(date: NaiveDate, observer: GeoCoordinate) -> Self {
        let jd = julian_day(date.year(), date.month(), date.day(), 0.0);
        let prev_solar = SolarCoordinates::new(jd - 1.0);
        let solar = SolarCoordinates::new(jd);
        let next_solar = SolarCoordinates::new(jd + 1.0);
        let approx_transit = approximate_transit(
            observer.lng,
            solar.apparent_sidereal_time,
            solar.right_ascension,
        );

        let mut solar_time = Self {
            observer,
            solar,
            prev_solar,
            next_solar,
            approx_transit,
            transit: f64::NAN,
            sunrise: f64::NAN,
            sunset: f64::NAN,
        };
        solar_time.transit = solar_time.corrected_transit();
        solar_time.sunrise = solar_time.hour_angle(SOLAR_ALTITUDE_AT_HORIZON, false);
        solar_time.sunset = solar_time.hour_angle(SOLAR_ALTITUDE_AT_HORIZON, true);
        solar_time
    }

    /// Declination of the sun at 0h UT, degrees.
    pub fn declination(&self) -> f64 {
        self.solar.declination
    }

    /// Transit corrected by interpolated right ascension (Meeus 15.2).
    fn corrected_transit(&self) -> f64 {
        let m0 = self.approx_transit;
        let lw = -self.observer.lng;
        let theta = sidereal_after(self.solar.apparent_sidereal_time, m0);
        let alpha = unwind_angle(interpolate_angles(
            self.solar.right_ascension,
            self.prev_solar.right_ascension,
            self.next_solar.right_ascension,
            m0,
        ));
        let h = quadrant_shift_angle(theta - lw - alpha);
        let dm = h / -360.0;
        (m0 + dm) * 24.0
    }

    /// Time at which the sun is at `angle` degrees of altitude, before
    /// (`after_transit == false`) or after transit.
    pub fn hour_angle(&self, angle: f64, after_transit: bool) -> f64 {
        let m0 = self.approx_transit;
        let phi = self.observer.lat;
        let lw = -self.observer.lng;
        let delta2 = self.solar.declination;

        let term1 = angle.to_radians().sin() - phi.to_radians().sin() * delta2.to_radians().sin();
        let term2 = phi.to_radians().cos() * delta2.to_radians().cos();
        // NaN when |term1 / term2| > 1: the sun never reaches `angle`
        let big_h0 = (term1 / term2).acos().to_degrees();
        let m = if after_transit {
            m0 + big_h0 / 360.0
        } else {
            m0 - big_h0 / 360.0
        };

        let theta = sidereal_after(self.solar.apparent_sidereal_time, m);
        let alpha = unwind_angle(interpolate_angles(
            self.solar.right_ascension,
            self.prev_solar.right_ascension,
            self.next_solar.right_ascension,
            m,
        ));
        let delta = interpolate(
            self.solar.declination,
            self.prev_solar.declination,
            self.next_solar.declination,
            m,
        );
        let h = theta - lw - alpha;
        let altitude = altitude_of_celestial_body(phi, delta, h);
        let term3 = altitude - angle;
        let term4 = 360.0 * delta.to_radians().cos() * phi.to_radians().cos() * h.to_radians().sin();
        let dm = term3 / term4;
        (m + dm) * 24.0
    }

    /// Afternoon time at which an object's shadow equals
    /// `shadow_length` times its height plus its noon shadow.
    pub fn afternoon(&self, shadow_length: f64) -> f64 {
        let tangent = (self.observer.lat - self.solar.declination).abs();
        let inverse = shadow_length + tangent.to_radians().tan();
        let angle = (1.0 / inverse).atan().to_degrees();
        self.hour_angle(angle, true)
    }
}

/// Converts hours after 00:00 UT of `date` into an instant, truncated to
/// the second. `None` for non-finite or implausible values.
pub fn instant_from_hours(date: NaiveDate, hours: f64) -> Option<DateTime<Utc>> {
    if !hours.is_finite() || hours.abs() > MAX_EVENT_OFFSET_HOURS {
        return None;
    }
    let midnight = date.and_time(NaiveTime::default()).and_utc();
    let seconds = (hours * 3600.0).floor() as i64;
    midnight.checked_add_signed(TimeDelta::try_seconds(seconds)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn test_transit_near_equation_of_time() {
        // Greenwich, 2024-11-03: equation of time is about +16.4 min, transit ~11:43:35 UT
        let date = NaiveDate::from_ymd_opt(2024, 11, 3).unwrap();
        let st = SolarTime::new(date, GeoCoordinate::new_unchecked(51.4769, 0.0));
        let transit = instant_from_hours(date, st.transit).unwrap();
        assert_eq!(transit.hour(), 11);
        assert!((42..=45).contains(&transit.minute()), "transit at {}", transit);
    }

    #[test]
    fn test_sunrise_before_transit_before_sunset() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 21).unwrap();
        let st = SolarTime::new(date, GeoCoordinate::new_unchecked(-6.2, 106.8));
        assert!(st.sunrise < st.transit);
        assert!(st.transit < st.sunset);
        // Day length near the equator at the equinox is ~12h07m
        let day_length = st.sunset - st.sunrise;
        assert!((12.0..12.3).contains(&day_length), "day length {}", day_length);
    }

    #[test]
    fn test_polar_night_is_nan() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 21).unwrap();
        let st = SolarTime::new(date, GeoCoordinate::new_unchecked(80.0, 15.0));
        assert!(st.sunrise.is_nan());
        assert!(st.sunset.is_nan());
        assert!(st.transit.is_finite());
        assert!(instant_from_hours(date, st.sunrise).is_none());
    }

    #[test]
    fn test_afternoon_after_transit() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        let st = SolarTime::new(date, GeoCoordinate::new_unchecked(21.4225, 39.8262));
        let asr_standard = st.afternoon(1.0);
        let asr_hanafi = st.afternoon(2.0);
        assert!(st.transit < asr_standard);
        assert!(asr_standard < asr_hanafi);
        assert!(asr_hanafi < st.sunset);
    }

    #[test]
    fn test_instant_from_hours() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let t = instant_from_hours(date, 1.5).unwrap();
        assert_eq!((t.hour(), t.minute(), t.second()), (1, 30, 0));
        let t = instant_from_hours(date, -0.5).unwrap();
        assert_eq!(t.date_naive(), NaiveDate::from_ymd_opt(2023, 12, 31).unwrap());
        assert!(instant_from_hours(date, f64::INFINITY).is_none());
        assert!(instant_from_hours(date, 1e12).is_none());
    }
}
