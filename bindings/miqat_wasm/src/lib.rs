//! WASM bindings for Miqat - prayer times and Qibla direction
//!
//! Provides WebAssembly bindings for the mobile/web front-end: daily
//! schedules, Qibla bearing and a stateful prayer board for the countdown.

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;
use miqat_core::{
    compute_bearing, distance_km, relative_rotation, zone_for, BoardState, DailySchedule, GeoCoordinate,
    MiqatConfig, MiqatError, PrayerBoard, PrayerInstant,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn js_err(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn parse_date(date_str: &str) -> Result<NaiveDate, JsValue> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .map_err(|e| JsValue::from_str(&format!("Invalid date format: {}", e)))
}

fn parse_zone(tz: Option<String>, coords: GeoCoordinate) -> Result<Tz, JsValue> {
    match tz {
        Some(name) => name
            .parse::<Tz>()
            .map_err(|_| JsValue::from_str(&format!("Unknown time zone: {}", name))),
        None => Ok(zone_for(coords)),
    }
}

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(js_err)
}

/// Computes the schedule for a date (YYYY-MM-DD) with default parameters.
///
/// `tz` is an IANA zone name; when omitted the zone is looked up from the
/// coordinate.
///
/// # Example (JavaScript)
/// ```js
/// const schedule = prayerTimes(-6.2088, 106.8456, "2026-03-01");
/// console.log(schedule.instants[0].name); // "Subuh"
/// ```
#[wasm_bindgen(js_name = prayerTimes)]
pub fn prayer_times(lat: f64, lng: f64, date_str: &str, tz: Option<String>) -> Result<JsValue, JsValue> {
    let coords = GeoCoordinate::new(lat, lng).map_err(js_err)?;
    let date = parse_date(date_str)?;
    let zone = parse_zone(tz, coords)?;
    let params = miqat_core::CalculationParameters::default();
    let schedule = miqat_core::compute_daily_schedule(coords, date, &params, zone).map_err(js_err)?;
    to_js(&WasmSchedule::from(&schedule))
}

/// Qibla bearing and distance for a coordinate.
#[wasm_bindgen]
pub fn qibla(lat: f64, lng: f64) -> Result<JsValue, JsValue> {
    let coords = GeoCoordinate::new(lat, lng).map_err(js_err)?;
    let bearing = compute_bearing(coords).map_err(js_err)?;
    let result = WasmQibla {
        degrees: (!bearing.is_degenerate()).then(|| bearing.degrees()),
        distance_km: distance_km(coords).map_err(js_err)?,
    };
    to_js(&result)
}

/// Pointer rotation for a Qibla bearing and a device heading, degrees.
#[wasm_bindgen(js_name = relativeRotation)]
pub fn relative_rotation_js(bearing: f64, heading: f64) -> f64 {
    relative_rotation(bearing, heading)
}

/// Class-based API holding the live prayer board.
///
/// # Example (JavaScript)
/// ```js
/// const miqat = new Miqat();
/// miqat.setLocation(-6.2088, 106.8456);
/// const state = miqat.tick(Date.now());
/// if (state.ready) console.log(state.next.name, state.next.time);
/// ```
#[wasm_bindgen]
pub struct Miqat {
    board: PrayerBoard,
}

#[wasm_bindgen]
impl Miqat {
    /// Creates a board, optionally from a JSON configuration.
    #[wasm_bindgen(constructor)]
    pub fn new(config_json: Option<String>) -> Result<Miqat, JsValue> {
        console_error_panic_hook::set_once();
        let config = match config_json {
            Some(json) => MiqatConfig::from_json_str(&json).map_err(js_err)?,
            None => MiqatConfig::default(),
        };
        Ok(Miqat { board: config.board().map_err(js_err)? })
    }

    /// Records a location reading. The latest reading wins.
    #[wasm_bindgen(js_name = setLocation)]
    pub fn set_location(&mut self, lat: f64, lng: f64) -> Result<(), JsValue> {
        let coords = GeoCoordinate::new(lat, lng).map_err(js_err)?;
        self.board.update_location(coords).map_err(js_err)
    }

    /// Board state at `now_ms` (milliseconds since the Unix epoch).
    pub fn tick(&mut self, now_ms: f64) -> Result<JsValue, JsValue> {
        let now = DateTime::<Utc>::from_timestamp_millis(now_ms as i64)
            .ok_or_else(|| js_err(MiqatError::invalid_config(format!("Invalid timestamp {}", now_ms))))?;
        let state = self.board.tick(now).map_err(js_err)?;
        to_js(&WasmBoardState::from(&state))
    }
}

/// WASM-friendly representation of a prayer instant for TypeScript generation.
#[derive(Serialize, tsify::Tsify)]
#[tsify(into_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct WasmPrayerInstant {
    pub id: String,
    pub name: String,
    /// RFC 3339 with the zone offset.
    pub time: String,
    pub epoch_ms: i64,
}

impl From<&PrayerInstant> for WasmPrayerInstant {
    fn from(instant: &PrayerInstant) -> Self {
        Self {
            id: instant.id().to_string(),
            name: instant.display_name.clone(),
            time: instant.time.to_rfc3339(),
            epoch_ms: instant.time.timestamp_millis(),
        }
    }
}

#[derive(Serialize, tsify::Tsify)]
#[tsify(into_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct WasmSchedule {
    pub date: String,
    pub timezone: String,
    pub instants: Vec<WasmPrayerInstant>,
    pub fallbacks: Vec<String>,
}

impl From<&DailySchedule> for WasmSchedule {
    fn from(schedule: &DailySchedule) -> Self {
        Self {
            date: schedule.date.format("%Y-%m-%d").to_string(),
            timezone: schedule.zone.to_string(),
            instants: schedule.iter().map(WasmPrayerInstant::from).collect(),
            fallbacks: schedule.fallbacks.iter().map(|f| format!("{:?}", f)).collect(),
        }
    }
}

#[derive(Serialize, tsify::Tsify)]
#[tsify(into_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct WasmQibla {
    /// `None` at the Kaaba and its antipode.
    pub degrees: Option<f64>,
    pub distance_km: f64,
}

#[derive(Serialize, tsify::Tsify)]
#[tsify(into_wasm_abi)]
#[serde(rename_all = "camelCase")]
pub struct WasmBoardState {
    pub ready: bool,
    pub schedule: Option<WasmSchedule>,
    pub next: Option<WasmPrayerInstant>,
}

impl From<&BoardState> for WasmBoardState {
    fn from(state: &BoardState) -> Self {
        match state {
            BoardState::Pending => Self { ready: false, schedule: None, next: None },
            BoardState::Ready { schedule, next } => Self {
                ready: true,
                schedule: Some(WasmSchedule::from(schedule)),
                next: Some(WasmPrayerInstant::from(next)),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_schedule_dto() {
        let coords = GeoCoordinate::new(-6.2088, 106.8456).unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 3, 21).unwrap();
        let schedule = miqat_core::compute_daily_schedule(
            coords,
            date,
            &miqat_core::CalculationParameters::default(),
            chrono_tz::Asia::Jakarta,
        )
        .unwrap();

        let dto = WasmSchedule::from(&schedule);
        assert_eq!(dto.date, "2024-03-21");
        assert_eq!(dto.timezone, "Asia/Jakarta");
        assert_eq!(dto.instants.len(), 6);
        assert_eq!(dto.instants[0].id, "fajr");
        assert_eq!(dto.instants[0].name, "Subuh");
        assert!(dto.instants[0].time.ends_with("+07:00"));
        assert!(dto.fallbacks.is_empty());
    }

    #[test]
    fn test_board_state_dto() {
        let mut board = PrayerBoard::new(Default::default()).with_zone(chrono_tz::Asia::Jakarta);
        let now = Utc.with_ymd_and_hms(2024, 3, 21, 1, 0, 0).unwrap();
        let pending = WasmBoardState::from(&board.tick(now).unwrap());
        assert!(!pending.ready);
        assert!(pending.next.is_none());

        board.update_location(GeoCoordinate::new(-6.2088, 106.8456).unwrap()).unwrap();
        let ready = WasmBoardState::from(&board.tick(now).unwrap());
        assert!(ready.ready);
        assert_eq!(ready.next.map(|n| n.id), Some("dhuhr".to_string()));
    }
}
