//! Schedule consumers: picking the next prayer, and keeping a board of
//! today's schedule current as the clock and the location move.
//!
//! ## Features
//!
//! - `async`: the tokio-driven `Ticker` that refreshes a board on an
//!   interval and publishes it on a `watch` channel. Its tests only build
//!   with the feature on, so run the suite with
//!   `cargo test -p miqat-schedule --all-features`.

pub mod board;
pub mod clock;
pub mod next;
#[cfg(feature = "async")]
pub mod ticker;

pub use board::{BoardState, PrayerBoard, ZoneStrategy};
pub use clock::{Clock, FixedClock, SystemClock};
pub use next::{select_next, ScheduleExt};
#[cfg(feature = "async")]
pub use ticker::{Ticker, DEFAULT_TICK};
