//! Great-circle travel time estimation for cargo flights.
//!
//! Distances come from the haversine formula on a spherical Earth. The
//! estimate adds a fixed routing markup and a takeoff/landing overhead.

use crate::error::{AlfredError, Result};
use haversine::{Location, Units};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Default cruising speed for cargo aircraft, in km/h.
pub const DEFAULT_CRUISING_SPEED_KMH: f64 = 750.0;

/// Extra distance flown over the great-circle path (10%).
const ROUTING_FACTOR: f64 = 1.1;

/// Fixed takeoff and landing overhead, in hours.
const GROUND_OVERHEAD_HOURS: f64 = 1.0;

/// A point on the globe in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "(f64, f64)", into = "(f64, f64)")]
pub struct GeoCoordinate {
    latitude: f64,
    longitude: f64,
}

impl GeoCoordinate {
    /// Create a coordinate, rejecting non-finite or out-of-range values.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(AlfredError::InvalidInput(format!(
                "latitude must be within [-90, 90], got {}",
                latitude
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(AlfredError::InvalidInput(format!(
                "longitude must be within [-180, 180], got {}",
                longitude
            )));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Great-circle distance to another point, in kilometres (mean radius 6371 km).
    pub fn distance_km(&self, other: &GeoCoordinate) -> f64 {
        haversine::distance(self.location(), other.location(), Units::Kilometers)
    }

    fn location(&self) -> Location {
        Location {
            latitude: self.latitude,
            longitude: self.longitude,
        }
    }
}

impl TryFrom<(f64, f64)> for GeoCoordinate {
    type Error = AlfredError;

    fn try_from((latitude, longitude): (f64, f64)) -> Result<Self> {
        Self::new(latitude, longitude)
    }
}

impl From<GeoCoordinate> for (f64, f64) {
    fn from(coord: GeoCoordinate) -> Self {
        (coord.latitude, coord.longitude)
    }
}

impl std::str::FromStr for GeoCoordinate {
    type Err = AlfredError;

    /// Parse `"lat,lon"`.
    fn from_str(s: &str) -> Result<Self> {
        let (lat, lon) = s.split_once(',').ok_or_else(|| {
            AlfredError::InvalidInput(format!("expected 'lat,lon', got '{}'", s))
        })?;
        let parse = |v: &str| {
            v.trim()
                .parse::<f64>()
                .map_err(|e| AlfredError::InvalidInput(format!("invalid coordinate '{}': {}", v, e)))
        };
        Self::new(parse(lat)?, parse(lon)?)
    }
}

impl std::fmt::Display for GeoCoordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.4}, {:.4})", self.latitude, self.longitude)
    }
}

/// Estimate cargo flight time in hours between two points.
///
/// The result is rounded to two decimal places.
pub fn estimate_travel_hours(
    origin: GeoCoordinate,
    destination: GeoCoordinate,
    cruising_speed_kmh: f64,
) -> Result<f64> {
    if !cruising_speed_kmh.is_finite() || cruising_speed_kmh <= 0.0 {
        return Err(AlfredError::InvalidInput(format!(
            "cruising speed must be a positive number of km/h, got {}",
            cruising_speed_kmh
        )));
    }

    let distance = origin.distance_km(&destination);
    let flown = distance * ROUTING_FACTOR;
    let hours = flown / cruising_speed_kmh + GROUND_OVERHEAD_HOURS;

    debug!(
        "Travel estimate {} -> {}: {:.1} km great-circle, {:.2} h",
        origin, destination, distance, hours
    );

    Ok(round2(hours))
}

/// Round to two decimals on the exact decimal value, so 2.675 becomes 2.67.
fn round2(value: f64) -> f64 {
    format!("{:.2}", value).parse().unwrap_or(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coord(lat: f64, lon: f64) -> GeoCoordinate {
        GeoCoordinate::new(lat, lon).unwrap()
    }

    #[test]
    fn test_chicago_to_sydney() {
        let chicago = coord(41.878, -87.629);
        let sydney = coord(-33.868, 151.209);

        let distance = chicago.distance_km(&sydney);
        assert!((distance - 14875.93).abs() < 0.1);

        let hours = estimate_travel_hours(chicago, sydney, DEFAULT_CRUISING_SPEED_KMH).unwrap();
        assert_eq!(hours, 22.82);
    }

    #[test]
    fn test_london_to_new_york() {
        let hours = estimate_travel_hours(
            coord(51.5074, -0.1278),
            coord(40.7128, -74.0060),
            DEFAULT_CRUISING_SPEED_KMH,
        )
        .unwrap();
        assert_eq!(hours, 9.17);
    }

    #[test]
    fn test_same_point_is_overhead_only() {
        let paris = coord(48.8566, 2.3522);
        for speed in [1.0, 750.0, 12_000.0] {
            assert_eq!(estimate_travel_hours(paris, paris, speed).unwrap(), 1.0);
        }
    }

    #[test]
    fn test_symmetric() {
        let pairs = [
            (coord(41.878, -87.629), coord(-33.868, 151.209)),
            (coord(0.0, 0.0), coord(0.0, 180.0)),
            (coord(-90.0, 0.0), coord(90.0, 0.0)),
            (coord(35.6762, 139.6503), coord(-22.9068, -43.1729)),
        ];
        for (a, b) in pairs {
            assert_eq!(
                estimate_travel_hours(a, b, 640.0).unwrap(),
                estimate_travel_hours(b, a, 640.0).unwrap()
            );
        }
    }

    #[test]
    fn test_round2_uses_exact_value() {
        assert_eq!(round2(0.125), 0.12);
        assert_eq!(round2(1.115), 1.11);
        assert_eq!(round2(2.675), 2.67);
        assert_eq!(round2(22.8153), 22.82);
        assert_eq!(round2(1.0), 1.0);
    }

    #[test]
    fn test_antipodal_points() {
        let hours = estimate_travel_hours(coord(0.0, 0.0), coord(0.0, 180.0), 750.0).unwrap();
        assert_eq!(hours, 30.36);
    }

    #[test]
    fn test_rejects_non_positive_speed() {
        let a = coord(10.0, 10.0);
        let b = coord(20.0, 20.0);
        for speed in [0.0, -750.0, f64::NAN, f64::INFINITY] {
            let err = estimate_travel_hours(a, b, speed).unwrap_err();
            assert!(matches!(err, AlfredError::InvalidInput(_)));
        }
    }

    #[test]
    fn test_rejects_out_of_range_coordinates() {
        assert!(GeoCoordinate::new(90.5, 0.0).is_err());
        assert!(GeoCoordinate::new(0.0, -180.1).is_err());
        assert!(GeoCoordinate::new(f64::NAN, 0.0).is_err());
        assert!(GeoCoordinate::new(-90.0, 180.0).is_ok());
    }

    #[test]
    fn test_parse_coordinate() {
        let c: GeoCoordinate = "41.878, -87.629".parse().unwrap();
        assert_eq!(c.latitude(), 41.878);
        assert_eq!(c.longitude(), -87.629);
        assert!("41.878".parse::<GeoCoordinate>().is_err());
        assert!("north,west".parse::<GeoCoordinate>().is_err());
    }

    #[test]
    fn test_deserialize_from_pair() {
        let c: GeoCoordinate = serde_json::from_str("[41.878, -87.629]").unwrap();
        assert_eq!(c, coord(41.878, -87.629));
        assert!(serde_json::from_str::<GeoCoordinate>("[120.0, 0.0]").is_err());
    }
}
