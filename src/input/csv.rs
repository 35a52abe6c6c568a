use crate::core::{Route, RoutePoint};
use crate::error::DataLoadError;
use crate::input::timestamp::parse_timestamp;

const LAT_COLUMNS: &[&str] = &["lat", "latitude"];
const LNG_COLUMNS: &[&str] = &["lng", "lon", "long", "longitude"];
const TIME_COLUMNS: &[&str] = &["timestamp", "time", "ts", "t"];

/// Load route points from CSV data
///
/// Supports flexible column names:
/// - latitude,longitude,timestamp
/// - lat,lng,time
/// - ts,lat,lon
///
/// Timestamps may be epoch milliseconds or ISO 8601 text.
pub fn parse_csv(data: &[u8]) -> Result<Route, DataLoadError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(data);

    let headers = rdr.headers()?;
    let lat_idx = find_column(headers, LAT_COLUMNS)?;
    let lng_idx = find_column(headers, LNG_COLUMNS)?;
    let time_idx = find_column(headers, TIME_COLUMNS)?;

    let mut points = Vec::new();

    for (index, result) in rdr.records().enumerate() {
        let record = result?;

        let lat = parse_coordinate(record.get(lat_idx), index, "latitude")?;
        let lng = parse_coordinate(record.get(lng_idx), index, "longitude")?;

        let raw_time = record.get(time_idx).unwrap_or_default();
        let timestamp_ms = parse_timestamp(raw_time).ok_or_else(|| DataLoadError::InvalidTimestamp {
            index,
            value: raw_time.to_string(),
        })?;

        points.push(RoutePoint::new(lat, lng, timestamp_ms));
    }

    Ok(Route::new(points))
}

fn parse_coordinate(field: Option<&str>, index: usize, name: &'static str) -> Result<f64, DataLoadError> {
    let raw = field.unwrap_or_default();
    raw.parse::<f64>().map_err(|_| DataLoadError::InvalidField {
        index,
        field: name,
        value: raw.to_string(),
    })
}

/// Find a column by checking possible names
fn find_column(headers: &csv::StringRecord, names: &'static [&'static str]) -> Result<usize, DataLoadError> {
    headers
        .iter()
        .position(|header| {
            let header_lower = header.to_lowercase();
            names.iter().any(|&name| header_lower == name)
        })
        .ok_or(DataLoadError::MissingColumn(names))
}
