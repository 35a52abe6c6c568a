pub mod csv;
pub mod json;
pub mod loader;
pub mod timestamp;

pub use self::csv::parse_csv;
pub use self::json::parse_json;
pub use self::loader::{FileRouteLoader, RouteLoader};

use std::path::Path;

use crate::core::Route;
use crate::error::DataLoadError;

/// Input format detection result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteFormat {
    Json,
    Csv,
    Unknown,
}

/// Detect the format of a route file from its extension, falling back to
/// the content
pub fn detect_format(path: &Path, data: &[u8]) -> RouteFormat {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("json") => return RouteFormat::Json,
        Some("csv") => return RouteFormat::Csv,
        _ => {}
    }

    if is_json(data) {
        RouteFormat::Json
    } else if is_csv(data) {
        RouteFormat::Csv
    } else {
        RouteFormat::Unknown
    }
}

fn is_json(data: &[u8]) -> bool {
    data.iter()
        .find(|b| !b.is_ascii_whitespace())
        .is_some_and(|&b| b == b'[')
}

fn is_csv(data: &[u8]) -> bool {
    // Look for a header line with at least three fields in the first 500 bytes
    let sample = &data[..data.len().min(500)];
    let text = match std::str::from_utf8(sample) {
        Ok(text) => text,
        // The window may end inside a multi-byte character
        Err(e) if e.error_len().is_none() => {
            std::str::from_utf8(&sample[..e.valid_up_to()]).unwrap_or_default()
        }
        Err(_) => return false,
    };

    text.lines()
        .next()
        .is_some_and(|line| line.chars().filter(|&c| c == ',').count() >= 2)
}

/// Parse route data in the given format
pub fn parse_route(data: &[u8], format: RouteFormat, path: &Path) -> Result<Route, DataLoadError> {
    match format {
        RouteFormat::Json => parse_json(data),
        RouteFormat::Csv => parse_csv(data),
        RouteFormat::Unknown => Err(DataLoadError::UnknownFormat(path.to_path_buf())),
    }
}
