//! # Miqat
//!
//! Islamic prayer times, Qibla direction and next-prayer countdown, built on
//! a self-contained low-precision solar model (Meeus).
//!
//! This crate is a facade that re-exports functionality from the `miqat` ecosystem.
//!
//! ## Modules
//!
//! - `types`: Core types (GeoCoordinate, Prayer, CalculationParameters, etc.)
//! - `astronomy`: Solar model, prayer engine, Qibla, time zone lookup
//! - `schedule`: Next-prayer selection and the live prayer board
//! - `config`: JSON/environment configuration
//! - `network`: Quran text provider (optional, `async` feature)
//!
//! ## Usage
//!
//! ```rust
//! use miqat::prelude::*;
//! use chrono::NaiveDate;
//!
//! let coords = GeoCoordinate::new(-7.8195, 110.3610).unwrap();
//! let date = NaiveDate::from_ymd_opt(2025, 6, 5).unwrap();
//! let schedule = miqat::prayer_times(coords, date).unwrap(); // Result<DailySchedule, MiqatError>
//! let bearing = miqat::qibla(coords).unwrap();
//! ```

pub use miqat_core::*;
