//! Qibla direction.
//!
//! Initial great-circle bearing from the observer to the Kaaba, plus the
//! helpers a compass display needs to turn that bearing into a rotation.

use miqat_types::{normalize_degrees, GeoCoordinate, MiqatError, QiblaBearing};
use tracing::instrument;

/// The Kaaba, Masjid al-Haram, Mecca.
pub const KAABA: GeoCoordinate = GeoCoordinate::new_unchecked(21.4225, 39.8262);

/// Mean Earth radius (IUGG), kilometres.
const EARTH_RADIUS_KM: f64 = 6371.0088;

const DEGENERATE_EPSILON: f64 = 1e-9;

/// Absolute longitude separation folded into [0, 180].
fn longitude_gap(a: f64, b: f64) -> f64 {
    let gap = (a - b).rem_euclid(360.0);
    if gap > 180.0 { 360.0 - gap } else { gap }
}

/// Computes the Qibla bearing (degrees clockwise from true north) for `coords`.
///
/// At the Kaaba itself and at its antipode every direction is equally valid,
/// so `QiblaBearing::UNDEFINED` is returned instead of an arbitrary number.
///
/// # Errors
/// `InvalidCoordinate` when the latitude or longitude is out of range.
///
/// # Example
/// ```rust
/// use miqat_astronomy::qibla::compute_bearing;
/// use miqat_types::GeoCoordinate;
///
/// let jakarta = GeoCoordinate::new(-6.2088, 106.8456).unwrap();
/// let bearing = compute_bearing(jakarta).unwrap();
/// assert!((bearing.degrees() - 295.1).abs() < 0.5);
/// ```
#[instrument(level = "trace", fields(lat = coords.lat, lng = coords.lng))]
pub fn compute_bearing(coords: GeoCoordinate) -> Result<QiblaBearing, MiqatError> {
    coords.validate()?;

    let gap = longitude_gap(coords.lng, KAABA.lng);
    let coincident = (coords.lat - KAABA.lat).abs() < DEGENERATE_EPSILON && gap < DEGENERATE_EPSILON;
    let antipodal =
        (coords.lat + KAABA.lat).abs() < DEGENERATE_EPSILON && (180.0 - gap).abs() < DEGENERATE_EPSILON;
    if coincident || antipodal {
        return Ok(QiblaBearing::UNDEFINED);
    }

    let phi = coords.lat.to_radians();
    let phi_k = KAABA.lat.to_radians();
    let delta_lambda = (KAABA.lng - coords.lng).to_radians();

    let y = delta_lambda.sin();
    let x = phi.cos() * phi_k.tan() - phi.sin() * delta_lambda.cos();
    Ok(QiblaBearing::new(y.atan2(x).to_degrees()))
}

/// Rotation to apply to a Qibla pointer given the device heading.
///
/// Both arguments are degrees clockwise from north; the result is in [0, 360).
pub fn relative_rotation(bearing: f64, heading: f64) -> f64 {
    normalize_degrees(bearing - heading)
}

/// Great-circle distance to the Kaaba in kilometres (haversine).
pub fn distance_km(coords: GeoCoordinate) -> Result<f64, MiqatError> {
    coords.validate()?;
    let phi1 = coords.lat.to_radians();
    let phi2 = KAABA.lat.to_radians();
    let d_phi = phi2 - phi1;
    let d_lambda = (KAABA.lng - coords.lng).to_radians();

    let a = (d_phi / 2.0).sin().powi(2) + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
    Ok(EARTH_RADIUS_KM * c)
}

/// One reading from a device orientation sensor.
///
/// Platforms report heading two ways: an absolute compass heading
/// (clockwise from north) or a W3C `alpha` angle (counter-clockwise).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OrientationReading {
    pub compass_heading: Option<f64>,
    pub alpha: Option<f64>,
}

impl OrientationReading {
    /// Heading in degrees clockwise from north, if the reading carries one.
    pub fn heading(&self) -> Option<f64> {
        match (self.compass_heading, self.alpha) {
            (Some(h), _) if h.is_finite() => Some(normalize_degrees(h)),
            (_, Some(alpha)) if alpha.is_finite() => Some(normalize_degrees(360.0 - alpha)),
            _ => None,
        }
    }

    /// Pointer rotation for `bearing`, or `None` without a usable heading
    /// or with a degenerate bearing.
    pub fn rotation_for(&self, bearing: QiblaBearing) -> Option<f64> {
        if bearing.is_degenerate() {
            return None;
        }
        self.heading().map(|h| relative_rotation(bearing.degrees(), h))
    }
}
