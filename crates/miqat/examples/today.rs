//! Today's schedule and Qibla for a location.
//!
//! Run with: cargo run --example today -- -6.2088 106.8456

use chrono::{Local, Utc};
use miqat::prelude::*;
use miqat::{distance_km, MiqatConfig};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let mut args = std::env::args().skip(1);
    let lat: f64 = args.next().map(|s| s.parse()).transpose()?.unwrap_or(-6.2088);
    let lng: f64 = args.next().map(|s| s.parse()).transpose()?.unwrap_or(106.8456);
    let coords = GeoCoordinate::new(lat, lng)?;

    let config = MiqatConfig::from_env()?;
    let params = config.parameters()?;
    let zone = config.zone()?.unwrap_or_else(|| miqat::zone_for(coords));
    let today = Utc::now().with_timezone(&zone).date_naive();

    let schedule = today.prayer_schedule_with(coords, &params, zone)?;
    let now = Local::now();
    let next = schedule.next_after(&now);

    println!("=====================================");
    println!("  {} ({})", coords, zone);
    println!("  {}", today.format("%A, %d %B %Y"));
    println!("=====================================");
    for instant in &schedule {
        let marker = if instant.prayer == next.prayer && instant.time == next.time { "  <- next" } else { "" };
        println!("  {:<8} {}{}", instant.display_name, instant.time.format("%H:%M"), marker);
    }
    if schedule.used_fallback() {
        println!("  (high-latitude fallbacks: {:?})", schedule.fallbacks);
    }

    let remaining = schedule.time_until(&now);
    println!();
    println!(
        "  Next: {} in {}h {:02}m",
        next.display_name,
        remaining.num_hours(),
        remaining.num_minutes() % 60
    );
    println!("  Qibla: {}  ({:.0} km to the Kaaba)", qibla(coords)?, distance_km(coords)?);
    Ok(())
}
