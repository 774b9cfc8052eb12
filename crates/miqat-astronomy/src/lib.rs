//! Astronomical engine for miqat.
//!
//! - `solar` / `solar_time`: sun position and event times (Meeus)
//! - `twilight`: Moonsighting Committee seasonal twilight
//! - `prayer`: the daily schedule
//! - `qibla`: bearing and distance to the Kaaba
//! - `timezone`: IANA zone lookup from coordinates

pub mod prayer;
pub mod qibla;
pub mod solar;
pub mod solar_time;
pub mod timezone;
pub mod twilight;

pub use prayer::compute_daily_schedule;
pub use qibla::{compute_bearing, distance_km, relative_rotation, OrientationReading, KAABA};
pub use timezone::zone_for;
