//! Core types for miqat: coordinates, prayer identifiers, daily schedules,
//! Qibla bearings, calculation parameters and errors.

pub mod error;
pub mod params;
pub mod types;

pub use error::MiqatError;
pub use params::{
    CalculationMethod, CalculationParameters, CalculationParametersBuilder, DisplayLocale,
    HighLatitudeRule, Madhab, PrayerAdjustments, Rounding, Shafaq,
};
pub use types::{
    normalize_degrees, DailySchedule, Fallback, GeoCoordinate, Prayer, PrayerInstant,
    QiblaBearing,
};
