use chrono::{DateTime, NaiveDate};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

use crate::error::MiqatError;
use crate::params::DisplayLocale;

/// Geographic coordinate in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    /// Latitude, north positive. Range: [-90, 90].
    pub lat: f64,
    /// Longitude, east positive. Range: [-180, 180].
    pub lng: f64,
}

impl GeoCoordinate {
    /// Creates a validated coordinate.
    ///
    /// # Errors
    /// Returns `InvalidCoordinate` when either component is out of range or NaN.
    /// Values are never clamped.
    pub fn new(lat: f64, lng: f64) -> Result<Self, MiqatError> {
        let coord = Self { lat, lng };
        coord.validate()?;
        Ok(coord)
    }

    /// Creates a coordinate without range checks.
    pub const fn new_unchecked(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Checks the latitude/longitude ranges.
    pub fn validate(&self) -> Result<(), MiqatError> {
        if (-90.0..=90.0).contains(&self.lat) && (-180.0..=180.0).contains(&self.lng) {
            Ok(())
        } else {
            Err(MiqatError::invalid_coordinate(self.lat, self.lng))
        }
    }
}

impl fmt::Display for GeoCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.4}°, {:.4}°", self.lat, self.lng)
    }
}

/// The six daily reference instants, in chronological order.
///
/// `Sunrise` is tracked for display and as the end of the Fajr window,
/// though it is not itself a prayer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Prayer {
    Fajr,
    Sunrise,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
}

impl Prayer {
    /// All instants in chronological order.
    pub const ALL: [Prayer; 6] = [
        Prayer::Fajr,
        Prayer::Sunrise,
        Prayer::Dhuhr,
        Prayer::Asr,
        Prayer::Maghrib,
        Prayer::Isha,
    ];

    /// Stable lowercase identifier.
    pub fn id(&self) -> &'static str {
        match self {
            Prayer::Fajr => "fajr",
            Prayer::Sunrise => "sunrise",
            Prayer::Dhuhr => "dhuhr",
            Prayer::Asr => "asr",
            Prayer::Maghrib => "maghrib",
            Prayer::Isha => "isha",
        }
    }

    /// Position within a daily schedule.
    pub fn index(&self) -> usize {
        *self as usize
    }

    /// Display label for the given locale.
    pub fn display_name(&self, locale: DisplayLocale) -> &'static str {
        match locale {
            DisplayLocale::Indonesian => match self {
                Prayer::Fajr => "Subuh",
                Prayer::Sunrise => "Terbit",
                Prayer::Dhuhr => "Dzuhur",
                Prayer::Asr => "Ashar",
                Prayer::Maghrib => "Maghrib",
                Prayer::Isha => "Isya",
            },
            DisplayLocale::English => match self {
                Prayer::Fajr => "Fajr",
                Prayer::Sunrise => "Sunrise",
                Prayer::Dhuhr => "Dhuhr",
                Prayer::Asr => "Asr",
                Prayer::Maghrib => "Maghrib",
                Prayer::Isha => "Isha",
            },
        }
    }

    /// False for `Sunrise`.
    pub fn is_prayer(&self) -> bool {
        !matches!(self, Prayer::Sunrise)
    }

    /// Parses a lowercase identifier (`"fajr"`, `"isha"`, ...).
    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.id().eq_ignore_ascii_case(id.trim()))
    }
}

impl fmt::Display for Prayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name(DisplayLocale::English))
    }
}

/// One named, timestamped event of a daily schedule.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrayerInstant {
    pub prayer: Prayer,
    pub display_name: String,
    /// Absolute instant, expressed in the schedule's zone.
    pub time: DateTime<Tz>,
}

impl PrayerInstant {
    pub fn new(prayer: Prayer, display_name: impl Into<String>, time: DateTime<Tz>) -> Self {
        Self {
            prayer,
            display_name: display_name.into(),
            time,
        }
    }

    /// Identifier of the underlying prayer.
    pub fn id(&self) -> &'static str {
        self.prayer.id()
    }
}

/// Degenerate-geometry fallback applied while building a schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Fallback {
    /// Sun never crosses the horizon in the morning; sunrise placed 6 h before transit.
    PolarSunrise,
    /// Sun never crosses the horizon in the evening; sunset placed 6 h after transit.
    PolarSunset,
    /// Fajr angle unreachable or earlier than the high-latitude bound.
    SafeFajr,
    /// Isha angle unreachable or later than the high-latitude bound.
    SafeIsha,
    /// Asr shadow length never reached; placed halfway between transit and sunset.
    MidAfternoonAsr,
    /// Instant moved one minute past its predecessor to keep strict ordering.
    OrderingNudge(Prayer),
}

/// Six instants for one coordinate and civil date, strictly increasing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySchedule {
    pub date: NaiveDate,
    pub coordinate: GeoCoordinate,
    pub zone: Tz,
    instants: [PrayerInstant; 6],
    /// Fallbacks that shaped this schedule; empty for ordinary latitudes.
    pub fallbacks: SmallVec<[Fallback; 4]>,
}

impl DailySchedule {
    /// Assembles a schedule. Instants must be given in `Prayer::ALL` order.
    pub fn new(
        date: NaiveDate,
        coordinate: GeoCoordinate,
        zone: Tz,
        instants: [PrayerInstant; 6],
        fallbacks: SmallVec<[Fallback; 4]>,
    ) -> Self {
        debug_assert!(instants.windows(2).all(|w| w[0].time < w[1].time));
        Self {
            date,
            coordinate,
            zone,
            instants,
            fallbacks,
        }
    }

    /// All instants, chronologically.
    pub fn instants(&self) -> &[PrayerInstant] {
        &self.instants
    }

    pub fn get(&self, prayer: Prayer) -> &PrayerInstant {
        &self.instants[prayer.index()]
    }

    /// Shorthand for `get(prayer).time`.
    pub fn time_of(&self, prayer: Prayer) -> DateTime<Tz> {
        self.instants[prayer.index()].time.clone()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PrayerInstant> {
        self.instants.iter()
    }

    pub fn used_fallback(&self) -> bool {
        !self.fallbacks.is_empty()
    }
}

impl<'a> IntoIterator for &'a DailySchedule {
    type Item = &'a PrayerInstant;
    type IntoIter = std::slice::Iter<'a, PrayerInstant>;

    fn into_iter(self) -> Self::IntoIter {
        self.instants.iter()
    }
}

/// Normalizes an angle to [0, 360).
pub fn normalize_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Direction toward the Kaaba, degrees clockwise from true north.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QiblaBearing {
    degrees: f64,
    degenerate: bool,
}

impl QiblaBearing {
    /// Sentinel for points where the direction is undefined
    /// (the Kaaba itself and its antipode).
    pub const UNDEFINED: QiblaBearing = QiblaBearing {
        degrees: 0.0,
        degenerate: true,
    };

    /// Wraps a bearing, normalizing it to [0, 360).
    pub fn new(degrees: f64) -> Self {
        Self {
            degrees: normalize_degrees(degrees),
            degenerate: false,
        }
    }

    pub fn degrees(&self) -> f64 {
        self.degrees
    }

    /// True for the `UNDEFINED` sentinel.
    pub fn is_degenerate(&self) -> bool {
        self.degenerate
    }
}

impl fmt::Display for QiblaBearing {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.degenerate {
            write!(f, "undefined")
        } else {
            write!(f, "{:.1}°", self.degrees)
        }
    }
}
