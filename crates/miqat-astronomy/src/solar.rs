//! Low-precision solar coordinates.
//!
//! Formulas follow Meeus, *Astronomical Algorithms* (2nd ed.), chapters 7,
//! 12, 13, 15, 22 and 25. Accuracy is about 0.01° in longitude, well below
//! the one-minute resolution of prayer times.

/// Sun altitude at sunrise/sunset: 34' refraction plus 16' semidiameter.
pub const SOLAR_ALTITUDE_AT_HORIZON: f64 = -50.0 / 60.0;

/// Mean sidereal rotation per day, degrees.
const SIDEREAL_DEGREES_PER_DAY: f64 = 360.985647;

/// Normalizes an angle to [0, 360).
pub fn unwind_angle(angle: f64) -> f64 {
    angle.rem_euclid(360.0)
}

/// Shifts an angle into [-180, 180].
pub fn quadrant_shift_angle(angle: f64) -> f64 {
    if (-180.0..=180.0).contains(&angle) {
        angle
    } else {
        angle - 360.0 * (angle / 360.0).round()
    }
}

/// Julian day for a Gregorian date plus fractional hours (Meeus 7.1).
pub fn julian_day(year: i32, month: u32, day: u32, hours: f64) -> f64 {
    let (y, m) = if month > 2 { (year, month) } else { (year - 1, month + 12) };
    let d = day as f64 + hours / 24.0;
    let a = (y as f64 / 100.0).trunc();
    let b = 2.0 - a + (a / 4.0).trunc();
    let i0 = (365.25 * (y as f64 + 4716.0)).trunc();
    let i1 = (30.6001 * (m as f64 + 1.0)).trunc();
    i0 + i1 + d + b - 1524.5
}

/// Julian centuries since J2000.0.
pub fn julian_century(julian_day: f64) -> f64 {
    (julian_day - 2451545.0) / 36525.0
}

/// Geometric mean longitude of the sun (Meeus 25.2).
fn mean_solar_longitude(t: f64) -> f64 {
    unwind_angle(280.4664567 + 36000.76983 * t + 0.0003032 * t * t)
}

/// Mean longitude of the moon (Meeus p.144).
fn mean_lunar_longitude(t: f64) -> f64 {
    unwind_angle(218.3165 + 481267.8813 * t)
}

/// Longitude of the moon's ascending node (Meeus p.144).
fn ascending_lunar_node_longitude(t: f64) -> f64 {
    unwind_angle(125.04452 - 1934.136261 * t + 0.0020708 * t * t + t * t * t / 450000.0)
}

/// Mean anomaly of the sun (Meeus 25.3).
fn mean_solar_anomaly(t: f64) -> f64 {
    unwind_angle(357.52911 + 35999.05029 * t - 0.0001537 * t * t)
}

/// Sun's equation of the center (Meeus p.164).
fn solar_equation_of_the_center(t: f64, mean_anomaly: f64) -> f64 {
    let m = mean_anomaly.to_radians();
    let term1 = (1.914602 - 0.004817 * t - 0.000014 * t * t) * m.sin();
    let term2 = (0.019993 - 0.000101 * t) * (2.0 * m).sin();
    let term3 = 0.000289 * (3.0 * m).sin();
    term1 + term2 + term3
}

/// Apparent longitude of the sun, corrected for nutation and aberration (Meeus p.164).
fn apparent_solar_longitude(t: f64, mean_longitude: f64) -> f64 {
    let longitude = mean_longitude + solar_equation_of_the_center(t, mean_solar_anomaly(t));
    let omega = 125.04 - 1934.136 * t;
    unwind_angle(longitude - 0.00569 - 0.00478 * omega.to_radians().sin())
}

/// Mean obliquity of the ecliptic (Meeus 22.2).
fn mean_obliquity_of_the_ecliptic(t: f64) -> f64 {
    23.439291 - 0.013004167 * t - 0.0000001639 * t * t + 0.0000005036 * t * t * t
}

/// Apparent obliquity of the ecliptic (Meeus p.165).
fn apparent_obliquity_of_the_ecliptic(t: f64, mean_obliquity: f64) -> f64 {
    let omega = 125.04 - 1934.136 * t;
    mean_obliquity + 0.00256 * omega.to_radians().cos()
}

/// Mean sidereal time at Greenwich (Meeus 12.4).
fn mean_sidereal_time(t: f64) -> f64 {
    let jd = t * 36525.0 + 2451545.0;
    let theta = 280.46061837 + 360.98564736629 * (jd - 2451545.0) + 0.000387933 * t * t
        - t * t * t / 38710000.0;
    unwind_angle(theta)
}

/// Nutation in longitude, degrees (Meeus p.144).
fn nutation_in_longitude(solar_longitude: f64, lunar_longitude: f64, ascending_node: f64) -> f64 {
    let l0 = solar_longitude.to_radians();
    let lp = lunar_longitude.to_radians();
    let omega = ascending_node.to_radians();
    (-17.2 / 3600.0) * omega.sin() - (1.32 / 3600.0) * (2.0 * l0).sin()
        - (0.23 / 3600.0) * (2.0 * lp).sin()
        + (0.21 / 3600.0) * (2.0 * omega).sin()
}

/// Nutation in obliquity, degrees (Meeus p.144).
fn nutation_in_obliquity(solar_longitude: f64, lunar_longitude: f64, ascending_node: f64) -> f64 {
    let l0 = solar_longitude.to_radians();
    let lp = lunar_longitude.to_radians();
    let omega = ascending_node.to_radians();
    (9.2 / 3600.0) * omega.cos() + (0.57 / 3600.0) * (2.0 * l0).cos()
        + (0.1 / 3600.0) * (2.0 * lp).cos()
        - (0.09 / 3600.0) * (2.0 * omega).cos()
}

/// Altitude of a body with declination `delta` at local hour angle `hour_angle`
/// seen from latitude `phi` (Meeus 13.6). All degrees.
pub fn altitude_of_celestial_body(phi: f64, delta: f64, hour_angle: f64) -> f64 {
    let (phi, delta, h) = (phi.to_radians(), delta.to_radians(), hour_angle.to_radians());
    (phi.sin() * delta.sin() + phi.cos() * delta.cos() * h.cos()).asin().to_degrees()
}

/// Three-point interpolation (Meeus 3.3).
pub fn interpolate(y2: f64, y1: f64, y3: f64, n: f64) -> f64 {
    let a = y2 - y1;
    let b = y3 - y2;
    let c = b - a;
    y2 + (n / 2.0) * (a + b + n * c)
}

/// Three-point interpolation for angles, unwinding the differences.
pub fn interpolate_angles(y2: f64, y1: f64, y3: f64, n: f64) -> f64 {
    let a = unwind_angle(y2 - y1);
    let b = unwind_angle(y3 - y2);
    let c = b - a;
    y2 + (n / 2.0) * (a + b + n * c)
}

/// Approximate transit as a fraction of the day (Meeus 15.1).
pub fn approximate_transit(longitude: f64, sidereal_time: f64, right_ascension: f64) -> f64 {
    let lw = -longitude;
    ((right_ascension + lw - sidereal_time) / 360.0).rem_euclid(1.0)
}

/// Rotation of the sky after `fraction` of a day, from sidereal time `theta0`.
pub(crate) fn sidereal_after(theta0: f64, fraction: f64) -> f64 {
    unwind_angle(theta0 + SIDEREAL_DEGREES_PER_DAY * fraction)
}

/// Position of the sun for one Julian day (0h UT).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarCoordinates {
    /// Degrees.
    pub declination: f64,
    /// Degrees, [0, 360).
    pub right_ascension: f64,
    /// Apparent sidereal time at Greenwich, degrees.
    pub apparent_sidereal_time: f64,
}

impl SolarCoordinates {
    pub fn new(julian_day: f64) -> Self {
        let t = julian_century(julian_day);
        let l0 = mean_solar_longitude(t);
        let lp = mean_lunar_longitude(t);
        let omega = ascending_lunar_node_longitude(t);
        let lambda = apparent_solar_longitude(t, l0).to_radians();
        let theta0 = mean_sidereal_time(t);
        let delta_psi = nutation_in_longitude(l0, lp, omega);
        let delta_epsilon = nutation_in_obliquity(l0, lp, omega);
        let epsilon0 = mean_obliquity_of_the_ecliptic(t);
        let epsilon_apparent = apparent_obliquity_of_the_ecliptic(t, epsilon0).to_radians();

        // Meeus 25.6 and 25.7
        let declination = (epsilon_apparent.sin() * lambda.sin()).asin().to_degrees();
        let right_ascension = unwind_angle(
            (epsilon_apparent.cos() * lambda.sin())
                .atan2(lambda.cos())
                .to_degrees(),
        );
        // Meeus p.88
        let apparent_sidereal_time =
            theta0 + (delta_psi * 3600.0 * (epsilon0 + delta_epsilon).to_radians().cos()) / 3600.0;

        Self {
            declination,
            right_ascension,
            apparent_sidereal_time,
        }
    }
}
