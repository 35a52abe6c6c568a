use serde::{Deserialize, Serialize};
use chrono::{DateTime, Utc};

/// A position in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// A single recorded vehicle fix
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RoutePoint {
    /// Latitude in decimal degrees
    pub lat: f64,

    /// Longitude in decimal degrees
    pub lng: f64,

    /// Absolute instant in milliseconds since the Unix epoch
    pub timestamp_ms: i64,
}

impl RoutePoint {
    pub fn new(lat: f64, lng: f64, timestamp_ms: i64) -> Self {
        Self { lat, lng, timestamp_ms }
    }

    pub fn coordinate(&self) -> Coordinate {
        Coordinate::new(self.lat, self.lng)
    }

    /// Get the fix time as a UTC instant, if it is representable
    pub fn timestamp(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.timestamp_ms)
    }

    /// Format the coordinate the way the status panel shows it
    pub fn format_coordinate(&self) -> String {
        format!("{:.6}, {:.6}", self.lat, self.lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_coordinate() {
        let point = RoutePoint::new(17.385544, 78.487471, 0);
        assert_eq!(point.format_coordinate(), "17.385544, 78.487471");
    }

    #[test]
    fn test_timestamp_conversion() {
        let point = RoutePoint::new(0.0, 0.0, 1_700_000_000_000);
        let ts = point.timestamp().unwrap();
        assert_eq!(ts.timestamp_millis(), 1_700_000_000_000);
    }
}
