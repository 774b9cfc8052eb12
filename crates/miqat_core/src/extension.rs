//! Extension trait for `NaiveDate`.

use chrono::NaiveDate;
use chrono_tz::Tz;
use miqat_astronomy::{compute_daily_schedule, zone_for};
use miqat_types::{CalculationParameters, DailySchedule, GeoCoordinate, MiqatError};

/// Extends `NaiveDate` with prayer schedule methods.
pub trait MiqatDateExt {
    /// Schedule at `coords` with default parameters, in the zone
    /// containing `coords`.
    fn prayer_schedule(&self, coords: GeoCoordinate) -> Result<DailySchedule, MiqatError>;

    /// Schedule with explicit parameters and zone.
    fn prayer_schedule_with(
        &self,
        coords: GeoCoordinate,
        params: &CalculationParameters,
        zone: Tz,
    ) -> Result<DailySchedule, MiqatError>;

    /// Schedules for this date and the following `days - 1` dates.
    fn prayer_schedules(
        &self,
        coords: GeoCoordinate,
        params: &CalculationParameters,
        zone: Tz,
        days: u32,
    ) -> Result<Vec<DailySchedule>, MiqatError>;
}

impl MiqatDateExt for NaiveDate {
    fn prayer_schedule(&self, coords: GeoCoordinate) -> Result<DailySchedule, MiqatError> {
        compute_daily_schedule(coords, *self, &CalculationParameters::default(), zone_for(coords))
    }

    fn prayer_schedule_with(
        &self,
        coords: GeoCoordinate,
        params: &CalculationParameters,
        zone: Tz,
    ) -> Result<DailySchedule, MiqatError> {
        compute_daily_schedule(coords, *self, params, zone)
    }

    fn prayer_schedules(
        &self,
        coords: GeoCoordinate,
        params: &CalculationParameters,
        zone: Tz,
        days: u32,
    ) -> Result<Vec<DailySchedule>, MiqatError> {
        self.iter_days()
            .take(days as usize)
            .map(|date| compute_daily_schedule(coords, date, params, zone))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use miqat_types::Prayer;

    #[test]
    fn test_prayer_schedule_resolves_zone() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 21).unwrap();
        let jakarta = GeoCoordinate::new(-6.2088, 106.8456).unwrap();
        let schedule = date.prayer_schedule(jakarta).unwrap();
        assert_eq!(schedule.zone, chrono_tz::Asia::Jakarta);
        assert_eq!(schedule.get(Prayer::Maghrib).display_name, "Maghrib");
    }

    #[test]
    fn test_prayer_schedules_week() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 29).unwrap();
        let coords = GeoCoordinate::new(51.5074, -0.1278).unwrap();
        let week = date
            .prayer_schedules(coords, &CalculationParameters::default(), chrono_tz::Europe::London, 7)
            .unwrap();
        assert_eq!(week.len(), 7);
        assert_eq!(week[6].date, NaiveDate::from_ymd_opt(2025, 1, 4).unwrap());
    }
}
