//! Qibla pointer rotation for a few simulated compass readings.

use miqat::prelude::*;
use miqat::OrientationReading;

fn main() -> anyhow::Result<()> {
    let yogyakarta = GeoCoordinate::new(-7.8195, 110.3610)?;
    let bearing = qibla(yogyakarta)?;
    println!("Qibla from {}: {}", yogyakarta, bearing);

    let readings = [
        OrientationReading { compass_heading: Some(0.0), alpha: None },
        OrientationReading { compass_heading: Some(270.0), alpha: None },
        OrientationReading { compass_heading: None, alpha: Some(45.0) },
        OrientationReading::default(),
    ];
    for reading in readings {
        match (reading.heading(), reading.rotation_for(bearing)) {
            (Some(heading), Some(rotation)) => {
                println!("  heading {:>5.1}° -> rotate pointer {:>5.1}°", heading, rotation)
            }
            _ => println!("  no heading available, waiting for the compass"),
        }
    }
    Ok(())
}
