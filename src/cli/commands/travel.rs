//! Travel command implementation.

use crate::cli::Output;
use crate::config::Settings;
use crate::travel::{estimate_travel_hours, GeoCoordinate};
use anyhow::{Context, Result};

/// Estimate cargo flight time between two "lat,lon" points.
pub fn run_travel(from: &str, to: &str, speed: Option<f64>, settings: &Settings) -> Result<()> {
    let origin: GeoCoordinate = from.parse().context("Invalid --from coordinate")?;
    let destination: GeoCoordinate = to.parse().context("Invalid --to coordinate")?;
    let speed = speed.unwrap_or(settings.travel.default_cruising_speed_kmh);

    let hours = estimate_travel_hours(origin, destination, speed)?;

    Output::kv("From", &origin.to_string());
    Output::kv("To", &destination.to_string());
    Output::kv("Distance", &format!("{:.0} km", origin.distance_km(&destination)));
    Output::kv("Speed", &format!("{} km/h", speed));
    Output::success(&format!("Estimated travel time: {:.2} hours", hours));

    Ok(())
}
