use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from miqat operations.
#[derive(Debug, Error, Clone, PartialEq, Serialize, Deserialize)]
pub enum MiqatError {
    /// Latitude outside [-90, 90] or longitude outside [-180, 180].
    #[error("Invalid coordinate ({lat}, {lng}): latitude must be in [-90, 90] and longitude in [-180, 180]")]
    InvalidCoordinate { lat: f64, lng: f64 },

    /// Date cannot be represented (calendar overflow).
    #[error("Date {0} is outside the representable range")]
    InvalidDate(NaiveDate),

    /// Invalid configuration.
    #[error("Invalid configuration: {reason}")]
    InvalidConfiguration { reason: String },

    /// Remote provider failure.
    #[error("Network error: {0}")]
    NetworkError(String),

    /// Quran chapter number that the provider does not know.
    #[error("Chapter {0} not found")]
    ChapterNotFound(u16),
}

impl MiqatError {
    /// Creates an `InvalidCoordinate` error.
    pub fn invalid_coordinate(lat: f64, lng: f64) -> Self {
        Self::InvalidCoordinate { lat, lng }
    }

    /// Creates an `InvalidConfiguration` error.
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfiguration { reason: reason.into() }
    }

    /// Creates a `NetworkError`.
    pub fn network(reason: impl std::fmt::Display) -> Self {
        Self::NetworkError(reason.to_string())
    }
}
