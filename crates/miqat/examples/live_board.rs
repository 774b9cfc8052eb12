//! Live countdown driven by the ticker.
//!
//! Run with: cargo run --example live_board --features async

use std::sync::Arc;
use std::time::Duration;

use miqat::prelude::*;
use miqat::{SystemClock, Ticker};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let config = MiqatConfig::from_env()?;
    let mut ticker = Ticker::start(config.board()?, Arc::new(SystemClock), config.tick_interval());
    let mut rx = ticker.subscribe();

    // The location arrives a moment later, as from a GPS fix
    tokio::time::sleep(Duration::from_secs(2)).await;
    ticker.update_location(GeoCoordinate::new(-6.2088, 106.8456)?)?;

    for _ in 0..10 {
        rx.changed().await?;
        let line = match &*rx.borrow_and_update() {
            BoardState::Pending => "waiting for location...".to_string(),
            BoardState::Ready { schedule, next } => {
                let remaining = schedule.time_until(&chrono::Utc::now());
                format!(
                    "next {} at {} (in {}m {:02}s)",
                    next.display_name,
                    next.time.format("%H:%M"),
                    remaining.num_minutes(),
                    remaining.num_seconds() % 60
                )
            }
        };
        println!("{}", line);
    }

    ticker.stop();
    Ok(())
}
