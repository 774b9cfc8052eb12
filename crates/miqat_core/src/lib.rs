//! # Miqat Core
//!
//! Prayer times, Qibla direction and next-prayer selection.
//!
//! ## Quick Start
//!
//! ```rust
//! use chrono::NaiveDate;
//! use miqat_core::prelude::*;
//!
//! let jakarta = GeoCoordinate::new(-6.2088, 106.8456).unwrap();
//! let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
//!
//! let schedule = miqat_core::prayer_times(jakarta, date).unwrap();
//! for instant in &schedule {
//!     println!("{:<8} {}", instant.display_name, instant.time.format("%H:%M"));
//! }
//!
//! let qibla = miqat_core::qibla(jakarta).unwrap();
//! println!("Qibla: {}", qibla);
//! ```

pub mod config;
pub mod extension;

pub use miqat_astronomy as astronomy;
pub use miqat_schedule as schedule;
pub use miqat_types as types;
#[cfg(feature = "async")]
pub use miqat_network as network;

pub use config::MiqatConfig;
pub use extension::MiqatDateExt;
pub use miqat_astronomy::{
    compute_bearing, compute_daily_schedule, distance_km, relative_rotation, zone_for,
    OrientationReading, KAABA,
};
pub use miqat_schedule::{select_next, BoardState, Clock, FixedClock, PrayerBoard, ScheduleExt, SystemClock, ZoneStrategy};
#[cfg(feature = "async")]
pub use miqat_schedule::{Ticker, DEFAULT_TICK};
pub use miqat_types::{
    CalculationMethod, CalculationParameters, DailySchedule, DisplayLocale, Fallback, GeoCoordinate,
    HighLatitudeRule, Madhab, MiqatError, Prayer, PrayerAdjustments, PrayerInstant, QiblaBearing,
    Rounding, Shafaq,
};

use chrono::NaiveDate;

/// Schedule for `date` at `coords` with the default method
/// (Moonsighting Committee), in the zone containing `coords`.
pub fn prayer_times(coords: GeoCoordinate, date: NaiveDate) -> Result<DailySchedule, MiqatError> {
    compute_daily_schedule(coords, date, &CalculationParameters::default(), zone_for(coords))
}

/// Qibla bearing from `coords`.
pub fn qibla(coords: GeoCoordinate) -> Result<QiblaBearing, MiqatError> {
    compute_bearing(coords)
}

pub mod prelude {
    pub use crate::types::*;
    pub use crate::{prayer_times, qibla, MiqatConfig, MiqatDateExt, PrayerBoard, BoardState, ScheduleExt};
    pub use crate::{compute_bearing, compute_daily_schedule, select_next};
}
