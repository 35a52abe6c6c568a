use serde::Deserialize;

use crate::core::{Route, RoutePoint};
use crate::error::DataLoadError;
use crate::input::timestamp::parse_timestamp;

/// One record of the route file
#[derive(Debug, Deserialize)]
struct RawPoint {
    #[serde(alias = "lat")]
    latitude: f64,
    #[serde(alias = "lng", alias = "lon")]
    longitude: f64,
    timestamp: RawTimestamp,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Millis(i64),
    Fractional(f64),
    Text(String),
}

impl RawTimestamp {
    fn to_millis(&self) -> Option<i64> {
        match self {
            RawTimestamp::Millis(ms) => Some(*ms),
            RawTimestamp::Fractional(ms) if ms.is_finite() => Some(ms.trunc() as i64),
            RawTimestamp::Fractional(_) => None,
            RawTimestamp::Text(text) => parse_timestamp(text),
        }
    }

    fn describe(&self) -> String {
        match self {
            RawTimestamp::Millis(ms) => ms.to_string(),
            RawTimestamp::Fractional(ms) => ms.to_string(),
            RawTimestamp::Text(text) => text.clone(),
        }
    }
}

/// Parse a JSON array of `{ latitude, longitude, timestamp }` records
pub fn parse_json(data: &[u8]) -> Result<Route, DataLoadError> {
    let raw: Vec<RawPoint> = serde_json::from_slice(data)?;

    raw.into_iter()
        .enumerate()
        .map(|(index, point)| {
            let timestamp_ms = point.timestamp.to_millis().ok_or_else(|| {
                DataLoadError::InvalidTimestamp {
                    index,
                    value: point.timestamp.describe(),
                }
            })?;
            Ok(RoutePoint::new(point.latitude, point.longitude, timestamp_ms))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Route::new)
}
