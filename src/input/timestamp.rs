use chrono::{DateTime, NaiveDate, NaiveDateTime};

const NAIVE_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
];

/// Parse a textual timestamp into epoch milliseconds
///
/// Accepts RFC 3339, naive ISO date-times and plain dates (both taken as
/// UTC), and integer epoch milliseconds.
pub fn parse_timestamp(text: &str) -> Option<i64> {
    let text = text.trim();

    if let Ok(ms) = text.parse::<i64>() {
        return Some(ms);
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.timestamp_millis());
    }

    for format in NAIVE_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, format) {
            return Some(dt.and_utc().timestamp_millis());
        }
    }

    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rfc3339() {
        assert_eq!(parse_timestamp("1970-01-01T00:01:00Z"), Some(60_000));
        assert_eq!(parse_timestamp("1970-01-01T05:31:00+05:30"), Some(60_000));
        assert_eq!(parse_timestamp("2024-03-01T10:00:00.250Z"), Some(1_709_287_200_250));
    }

    #[test]
    fn test_naive_is_utc() {
        assert_eq!(parse_timestamp("1970-01-01T00:00:01"), Some(1_000));
        assert_eq!(parse_timestamp("1970-01-01 00:00:01.5"), Some(1_500));
        assert_eq!(parse_timestamp("1970-01-02"), Some(86_400_000));
    }

    #[test]
    fn test_epoch_millis() {
        assert_eq!(parse_timestamp(" 1700000000000 "), Some(1_700_000_000_000));
    }

    #[test]
    fn test_garbage() {
        assert_eq!(parse_timestamp("yesterday"), None);
        assert_eq!(parse_timestamp(""), None);
    }
}
