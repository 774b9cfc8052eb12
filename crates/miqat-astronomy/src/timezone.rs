//! Time zone lookup from coordinates.

use std::sync::OnceLock;

use chrono_tz::Tz;
use miqat_types::GeoCoordinate;
use tracing::warn;
use tzf_rs::DefaultFinder;

static FINDER: OnceLock<DefaultFinder> = OnceLock::new();

/// Resolves the IANA zone containing `coords` from bundled boundary data.
///
/// Open ocean and unknown names resolve to UTC.
pub fn zone_for(coords: GeoCoordinate) -> Tz {
    let finder = FINDER.get_or_init(DefaultFinder::new);
    // tzf-rs takes (longitude, latitude)
    let name = finder.get_tz_name(coords.lng, coords.lat);
    match name.parse::<Tz>() {
        Ok(zone) => zone,
        Err(_) => {
            warn!(name = %name, lat = coords.lat, lng = coords.lng, "unrecognized zone name, using UTC");
            Tz::UTC
        }
    }
}
