//! Next-prayer selection.

use chrono::{DateTime, Days, TimeDelta, TimeZone};
use chrono_tz::Tz;
use miqat_types::{DailySchedule, Prayer, PrayerInstant};

/// The same instant one civil day later in its own zone.
///
/// Falls back to +24h when the shifted local time does not exist.
fn one_day_later(instant: &PrayerInstant) -> PrayerInstant {
    let time: DateTime<Tz> = instant
        .time
        .checked_add_days(Days::new(1))
        .unwrap_or_else(|| instant.time + TimeDelta::hours(24));
    PrayerInstant { time, ..instant.clone() }
}

/// Returns the first instant strictly after `now`.
///
/// `instants` must be chronological. When every instant has passed
/// (equality counts as passed) the first one is returned moved to the next
/// day. An empty slice yields `None`. Comparison is on absolute time, so
/// `now` may be in any zone.
pub fn select_next<Z: TimeZone>(instants: &[PrayerInstant], now: &DateTime<Z>) -> Option<PrayerInstant> {
    let now = now.naive_utc();
    match instants.iter().find(|i| i.time.naive_utc() > now) {
        Some(upcoming) => Some(upcoming.clone()),
        None => instants.first().map(one_day_later),
    }
}

/// Countdown helpers on a computed schedule.
pub trait ScheduleExt {
    /// The upcoming instant, wrapping to tomorrow's fajr after isha.
    fn next_after<Z: TimeZone>(&self, now: &DateTime<Z>) -> PrayerInstant;

    /// The latest instant at or before `now`, if any has started today.
    fn current_at<Z: TimeZone>(&self, now: &DateTime<Z>) -> Option<&PrayerInstant>;

    /// Time remaining until [`ScheduleExt::next_after`].
    fn time_until<Z: TimeZone>(&self, now: &DateTime<Z>) -> TimeDelta {
        let next = self.next_after(now);
        next.time.naive_utc() - now.naive_utc()
    }
}

impl ScheduleExt for DailySchedule {
    fn next_after<Z: TimeZone>(&self, now: &DateTime<Z>) -> PrayerInstant {
        select_next(self.instants(), now).unwrap_or_else(|| one_day_later(self.get(Prayer::Fajr)))
    }

    fn current_at<Z: TimeZone>(&self, now: &DateTime<Z>) -> Option<&PrayerInstant> {
        let now = now.naive_utc();
        self.iter().rev().find(|i| i.time.naive_utc() <= now)
    }
}
