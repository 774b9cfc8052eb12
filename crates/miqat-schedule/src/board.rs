//! Live prayer board.
//!
//! Holds the consumer-side state: the most recent location reading, the
//! calculation parameters and the schedule for the current civil day. The
//! schedule is recomputed lazily on `tick` when the day or the location
//! changes.

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use miqat_astronomy::{compute_daily_schedule, zone_for};
use miqat_types::{CalculationParameters, DailySchedule, GeoCoordinate, MiqatError, PrayerInstant};
use tracing::{debug, instrument};

use crate::next::ScheduleExt;

/// How the board decides which zone a day belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ZoneStrategy {
    /// Always use this zone (typically the device zone).
    Fixed(Tz),
    /// Look the zone up from the current coordinate.
    FromCoordinate,
}

/// What the board shows at one instant.
#[derive(Debug, Clone, PartialEq)]
pub enum BoardState {
    /// No location reading yet.
    Pending,
    Ready {
        schedule: DailySchedule,
        next: PrayerInstant,
    },
}

impl BoardState {
    pub fn is_ready(&self) -> bool {
        matches!(self, BoardState::Ready { .. })
    }

    pub fn next(&self) -> Option<&PrayerInstant> {
        match self {
            BoardState::Ready { next, .. } => Some(next),
            BoardState::Pending => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PrayerBoard {
    params: CalculationParameters,
    zone: ZoneStrategy,
    coordinate: Option<GeoCoordinate>,
    resolved_zone: Option<Tz>,
    schedule: Option<DailySchedule>,
}

impl PrayerBoard {
    /// A board with no location, resolving zones from the coordinate.
    pub fn new(params: CalculationParameters) -> Self {
        Self {
            params,
            zone: ZoneStrategy::FromCoordinate,
            coordinate: None,
            resolved_zone: None,
            schedule: None,
        }
    }

    /// Pins every schedule to `zone`.
    pub fn with_zone(mut self, zone: Tz) -> Self {
        self.zone = ZoneStrategy::Fixed(zone);
        self
    }

    pub fn zone_strategy(&self) -> ZoneStrategy {
        self.zone
    }

    pub fn parameters(&self) -> &CalculationParameters {
        &self.params
    }

    /// Replaces the parameters; the next tick recomputes.
    pub fn set_parameters(&mut self, params: CalculationParameters) -> Result<(), MiqatError> {
        params.validate()?;
        self.params = params;
        self.schedule = None;
        Ok(())
    }

    /// Records a location reading. The latest reading wins.
    pub fn update_location(&mut self, coords: GeoCoordinate) -> Result<(), MiqatError> {
        coords.validate()?;
        if self.coordinate != Some(coords) {
            debug!(lat = coords.lat, lng = coords.lng, "location updated");
            self.coordinate = Some(coords);
            self.resolved_zone = None;
            self.schedule = None;
        }
        Ok(())
    }

    pub fn coordinate(&self) -> Option<GeoCoordinate> {
        self.coordinate
    }

    /// The last computed schedule, if any.
    pub fn schedule(&self) -> Option<&DailySchedule> {
        self.schedule.as_ref()
    }

    fn zone_for_tick(&mut self, coords: GeoCoordinate) -> Tz {
        match self.zone {
            ZoneStrategy::Fixed(zone) => zone,
            ZoneStrategy::FromCoordinate => *self.resolved_zone.get_or_insert_with(|| zone_for(coords)),
        }
    }

    /// Brings the board up to date with `now`.
    #[instrument(level = "trace", skip(self))]
    pub fn tick(&mut self, now: DateTime<Utc>) -> Result<BoardState, MiqatError> {
        let Some(coords) = self.coordinate else {
            return Ok(BoardState::Pending);
        };
        let zone = self.zone_for_tick(coords);
        let today = now.with_timezone(&zone).date_naive();

        let schedule = match self.schedule.take() {
            Some(schedule) if schedule.date == today && schedule.coordinate == coords => schedule,
            _ => {
                let schedule = compute_daily_schedule(coords, today, &self.params, zone)?;
                debug!(%today, %zone, "schedule recomputed");
                schedule
            }
        };
        let next = schedule.next_after(&now);
        self.schedule = Some(schedule.clone());
        Ok(BoardState::Ready { schedule, next })
    }
}
