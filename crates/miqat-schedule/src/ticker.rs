//! Periodic board driver.
//!
//! Runs a [`PrayerBoard`] on a tokio interval and publishes every state on a
//! `watch` channel, so a front-end always reads the latest countdown.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use miqat_types::{GeoCoordinate, MiqatError};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{info, warn};

use crate::board::{BoardState, PrayerBoard};
use crate::clock::Clock;

/// Default refresh period of the countdown.
pub const DEFAULT_TICK: Duration = Duration::from_secs(1);

type SharedBoard = Arc<Mutex<PrayerBoard>>;

fn lock(board: &SharedBoard) -> MutexGuard<'_, PrayerBoard> {
    board.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Handle to a running board task. Dropping it stops the task.
pub struct Ticker {
    board: SharedBoard,
    clock: Arc<dyn Clock>,
    tx: Arc<watch::Sender<BoardState>>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    /// Spawns the driver on the current tokio runtime.
    ///
    /// The first tick fires immediately. A zero `period` is raised to one
    /// millisecond.
    pub fn start(board: PrayerBoard, clock: Arc<dyn Clock>, period: Duration) -> Self {
        let period = period.max(Duration::from_millis(1));
        let board = Arc::new(Mutex::new(board));
        let (tx, _) = watch::channel(BoardState::Pending);
        let tx = Arc::new(tx);

        let handle = tokio::spawn(run(board.clone(), clock.clone(), tx.clone(), period));
        info!(?period, "prayer board ticker started");

        Self {
            board,
            clock,
            tx,
            handle: Some(handle),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<BoardState> {
        self.tx.subscribe()
    }

    /// The most recently published state.
    pub fn current(&self) -> BoardState {
        self.tx.borrow().clone()
    }

    /// Feeds a location reading and publishes the refreshed state at once.
    pub fn update_location(&self, coords: GeoCoordinate) -> Result<(), MiqatError> {
        let state = {
            let mut board = lock(&self.board);
            board.update_location(coords)?;
            board.tick(self.clock.now())?
        };
        self.tx.send_replace(state);
        Ok(())
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Cancels the driver. Subscribers keep the last published state.
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
            info!("prayer board ticker stopped");
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.stop();
    }
}

async fn run(
    board: SharedBoard,
    clock: Arc<dyn Clock>,
    tx: Arc<watch::Sender<BoardState>>,
    period: Duration,
) {
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    loop {
        interval.tick().await;
        let state = lock(&board).tick(clock.now());
        match state {
            Ok(state) => {
                tx.send_replace(state);
            }
            Err(e) => warn!(error = %e, "board tick failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use chrono::{NaiveDate, TimeDelta, TimeZone, Utc};
    use chrono_tz::Asia::Jakarta;
    use miqat_types::{CalculationParameters, Prayer};

    fn jakarta() -> GeoCoordinate {
        GeoCoordinate::new(-6.2088, 106.8456).unwrap()
    }

    fn board() -> PrayerBoard {
        PrayerBoard::new(CalculationParameters::default()).with_zone(Jakarta)
    }

    #[tokio::test(start_paused = true)]
    async fn test_pending_until_location() {
        let start = Jakarta.with_ymd_and_hms(2024, 3, 21, 13, 0, 0).unwrap().with_timezone(&Utc);
        let clock = Arc::new(FixedClock::new(start));
        let mut ticker = Ticker::start(board(), clock, DEFAULT_TICK);
        let mut rx = ticker.subscribe();

        rx.changed().await.unwrap();
        assert_eq!(*rx.borrow_and_update(), BoardState::Pending);

        ticker.update_location(jakarta()).unwrap();
        rx.changed().await.unwrap();
        let next = rx.borrow_and_update().next().map(|n| n.prayer);
        assert_eq!(next, Some(Prayer::Asr));

        ticker.stop();
        assert!(!ticker.is_running());
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticks_follow_clock_across_midnight() {
        let start = Jakarta.with_ymd_and_hms(2024, 3, 21, 23, 59, 58).unwrap().with_timezone(&Utc);
        let clock = Arc::new(FixedClock::new(start));
        let ticker = Ticker::start(board(), clock.clone(), DEFAULT_TICK);
        let mut rx = ticker.subscribe();
        ticker.update_location(jakarta()).unwrap();
        rx.borrow_and_update();

        let date_of = |state: &BoardState| match state {
            BoardState::Ready { schedule, .. } => Some(schedule.date),
            BoardState::Pending => None,
        };
        assert_eq!(date_of(&ticker.current()), NaiveDate::from_ymd_opt(2024, 3, 21));

        clock.advance(TimeDelta::seconds(5));
        rx.changed().await.unwrap();
        assert_eq!(date_of(&rx.borrow_and_update()), NaiveDate::from_ymd_opt(2024, 3, 22));
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_stops_task() {
        let clock = Arc::new(FixedClock::new(Utc::now()));
        let ticker = Ticker::start(board(), clock, Duration::from_secs(60));
        let mut rx = ticker.subscribe();
        drop(ticker);
        tokio::task::yield_now().await;
        assert!(rx.changed().await.is_err());
    }
}
