//! Runtime Configuration Module.
//!
//! `MiqatConfig` collects the user-facing knobs (method, madhab,
//! high-latitude rule, zone, refresh period) from JSON files and
//! environment variables, and turns them into `CalculationParameters`.

use std::env;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use chrono_tz::Tz;
use miqat_schedule::PrayerBoard;
use miqat_types::{
    CalculationMethod, CalculationParameters, DisplayLocale, HighLatitudeRule, Madhab, MiqatError,
    PrayerAdjustments, Rounding,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

pub const ENV_METHOD: &str = "MIQAT_METHOD";
pub const ENV_MADHAB: &str = "MIQAT_MADHAB";
pub const ENV_HIGH_LATITUDE_RULE: &str = "MIQAT_HIGH_LATITUDE_RULE";
pub const ENV_TIMEZONE: &str = "MIQAT_TIMEZONE";
pub const ENV_TICK_SECONDS: &str = "MIQAT_TICK_SECONDS";

/// Default countdown refresh period, seconds.
pub const DEFAULT_TICK_SECONDS: u64 = 1;
/// Longest accepted refresh period, seconds.
pub const MAX_TICK_SECONDS: u64 = 3600;

/// User configuration. Unset fields fall back to the method preset.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MiqatConfig {
    pub method: Option<CalculationMethod>,
    pub madhab: Option<Madhab>,
    pub high_latitude_rule: Option<HighLatitudeRule>,
    pub rounding: Option<Rounding>,
    pub locale: Option<DisplayLocale>,
    /// IANA zone name. When unset the zone is looked up from the coordinate.
    pub timezone: Option<String>,
    pub tick_seconds: Option<u64>,
    pub adjustments: Option<PrayerAdjustments>,
}

impl FromStr for MiqatConfig {
    type Err = MiqatError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_json_str(s)
    }
}

fn parse_env<T: FromStr>(name: &str, value: &str) -> Result<T, MiqatError> {
    value
        .trim()
        .parse()
        .map_err(|_| MiqatError::invalid_config(format!("{} has invalid value {:?}", name, value)))
}

impl MiqatConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from `MIQAT_*` environment variables.
    /// Missing variables stay unset.
    #[instrument]
    pub fn from_env() -> Result<Self, MiqatError> {
        debug!("Loading configuration from environment variables");
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`MiqatConfig::from_env`] with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, MiqatError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(v) = lookup(ENV_METHOD) {
            config.method = Some(parse_env(ENV_METHOD, &v)?);
        }
        if let Some(v) = lookup(ENV_MADHAB) {
            config.madhab = Some(parse_env(ENV_MADHAB, &v)?);
        }
        if let Some(v) = lookup(ENV_HIGH_LATITUDE_RULE) {
            config.high_latitude_rule = Some(parse_env(ENV_HIGH_LATITUDE_RULE, &v)?);
        }
        if let Some(v) = lookup(ENV_TIMEZONE) {
            config.timezone = Some(v.trim().to_string());
        }
        if let Some(v) = lookup(ENV_TICK_SECONDS) {
            config.tick_seconds = Some(parse_env(ENV_TICK_SECONDS, &v)?);
        }
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a JSON configuration file.
    pub fn try_from_json(path: impl AsRef<Path>) -> Result<Self, MiqatError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| {
            MiqatError::invalid_config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json_str(&content)
    }

    /// Parses and validates a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, MiqatError> {
        let config: MiqatConfig = serde_json::from_str(json)
            .map_err(|e| MiqatError::invalid_config(format!("Invalid JSON configuration: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Fills fields unset in `self` from `other`. Values in `self` win.
    pub fn merge(mut self, other: MiqatConfig) -> Self {
        self.method = self.method.or(other.method);
        self.madhab = self.madhab.or(other.madhab);
        self.high_latitude_rule = self.high_latitude_rule.or(other.high_latitude_rule);
        self.rounding = self.rounding.or(other.rounding);
        self.locale = self.locale.or(other.locale);
        self.timezone = self.timezone.or(other.timezone);
        self.tick_seconds = self.tick_seconds.or(other.tick_seconds);
        self.adjustments = self.adjustments.or(other.adjustments);
        self
    }

    /// Finishes a fluent chain with validation.
    pub fn build(self) -> Result<Self, MiqatError> {
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), MiqatError> {
        self.zone()?;
        if let Some(secs) = self.tick_seconds {
            if secs == 0 || secs > MAX_TICK_SECONDS {
                return Err(MiqatError::invalid_config(format!(
                    "Tick interval {}s outside [1, {}]", secs, MAX_TICK_SECONDS
                )));
            }
        }
        self.parameters().map(|_| ())
    }

    /// The configured fixed zone, if any.
    pub fn zone(&self) -> Result<Option<Tz>, MiqatError> {
        self.timezone
            .as_deref()
            .map(|name| {
                name.parse::<Tz>()
                    .map_err(|_| MiqatError::invalid_config(format!("Unknown time zone {:?}", name)))
            })
            .transpose()
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(self.tick_seconds.unwrap_or(DEFAULT_TICK_SECONDS))
    }

    /// Calculation parameters: the method preset with the overrides applied.
    pub fn parameters(&self) -> Result<CalculationParameters, MiqatError> {
        let mut params = self.method.unwrap_or_default().parameters();
        if let Some(madhab) = self.madhab {
            params = params.madhab(madhab);
        }
        if let Some(rule) = self.high_latitude_rule {
            params = params.high_latitude_rule(rule);
        }
        if let Some(rounding) = self.rounding {
            params = params.rounding(rounding);
        }
        if let Some(locale) = self.locale {
            params = params.locale(locale);
        }
        if let Some(adjustments) = self.adjustments {
            params = params.adjustments(adjustments);
        }
        params.validate()?;
        Ok(params)
    }

    /// A prayer board wired with this configuration.
    pub fn board(&self) -> Result<PrayerBoard, MiqatError> {
        let board = PrayerBoard::new(self.parameters()?);
        Ok(match self.zone()? {
            Some(zone) => board.with_zone(zone),
            None => board,
        })
    }

    pub fn with_method(mut self, method: CalculationMethod) -> Self {
        self.method = Some(method);
        self
    }

    pub fn with_madhab(mut self, madhab: Madhab) -> Self {
        self.madhab = Some(madhab);
        self
    }

    pub fn with_high_latitude_rule(mut self, rule: HighLatitudeRule) -> Self {
        self.high_latitude_rule = Some(rule);
        self
    }

    pub fn with_timezone(mut self, timezone: impl Into<String>) -> Self {
        self.timezone = Some(timezone.into());
        self
    }

    pub fn with_tick_seconds(mut self, seconds: u64) -> Self {
        self.tick_seconds = Some(seconds);
        self
    }
}
