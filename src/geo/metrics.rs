use std::fmt;

use crate::core::Route;
use crate::geo::distance_km;

const MS_PER_MINUTE: i128 = 60 * 1000;
const MS_PER_HOUR: f64 = 60.0 * 60.0 * 1000.0;

/// Instantaneous speed at a cursor position
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SpeedResult {
    /// Speed in km/h, rounded to two decimals
    Value(f64),
    /// Elapsed time between the two fixes was zero or negative
    Unavailable,
}

impl SpeedResult {
    pub fn value(&self) -> Option<f64> {
        match self {
            SpeedResult::Value(v) => Some(*v),
            SpeedResult::Unavailable => None,
        }
    }
}

impl fmt::Display for SpeedResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SpeedResult::Value(v) => write!(f, "{:.2}", v),
            SpeedResult::Unavailable => f.write_str("N/A"),
        }
    }
}

/// Remaining time until the last point of the route
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EtaResult {
    Arrived,
    LessThanOneMinute,
    Minutes(i64),
    HoursMinutes { hours: i64, minutes: i64 },
}

impl fmt::Display for EtaResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EtaResult::Arrived => f.write_str("Arrived"),
            EtaResult::LessThanOneMinute => f.write_str("Less than 1 min"),
            EtaResult::Minutes(m) => write!(f, "{} min", m),
            EtaResult::HoursMinutes { hours, minutes } => write!(f, "{}h {}m", hours, minutes),
        }
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

/// Speed between `route[cursor - 1]` and `route[cursor]` in km/h
pub fn speed_kmh(route: &Route, cursor: usize) -> SpeedResult {
    if cursor == 0 || route.len() <= 1 {
        return SpeedResult::Value(0.0);
    }

    let (prev, curr) = match (route.get(cursor - 1), route.get(cursor)) {
        (Some(prev), Some(curr)) => (prev, curr),
        _ => return SpeedResult::Value(0.0),
    };

    let elapsed_hours = (curr.timestamp_ms as f64 - prev.timestamp_ms as f64) / MS_PER_HOUR;
    if elapsed_hours <= 0.0 {
        return SpeedResult::Unavailable;
    }

    let distance = distance_km(prev.coordinate(), curr.coordinate());
    SpeedResult::Value(round2(distance / elapsed_hours))
}

/// Time remaining from `route[cursor]` to the final point
///
/// Remaining time is floored to whole minutes. Out-of-order timestamps give a
/// negative remainder, which is reported as less than a minute.
pub fn eta(route: &Route, cursor: usize) -> EtaResult {
    let last = match route.last() {
        Some(last) if cursor < route.len() - 1 => last,
        _ => return EtaResult::Arrived,
    };
    let current = &route[cursor];

    // Widened so extreme timestamps cannot overflow; the minute count always fits i64
    let remaining_ms = last.timestamp_ms as i128 - current.timestamp_ms as i128;
    let remaining_minutes = remaining_ms.div_euclid(MS_PER_MINUTE) as i64;

    if remaining_minutes < 1 {
        EtaResult::LessThanOneMinute
    } else if remaining_minutes < 60 {
        EtaResult::Minutes(remaining_minutes)
    } else {
        EtaResult::HoursMinutes {
            hours: remaining_minutes.div_euclid(60),
            minutes: remaining_minutes.rem_euclid(60),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RoutePoint;
    use approx::assert_relative_eq;

    const MIN: i64 = 60_000;

    fn route(points: &[(f64, f64, i64)]) -> Route {
        Route::new(points.iter().map(|&(lat, lng, ts)| RoutePoint::new(lat, lng, ts)).collect())
    }

    #[test]
    fn test_speed_at_start_is_zero() {
        let r = route(&[(17.0, 78.0, 0), (17.001, 78.001, MIN)]);
        assert_eq!(speed_kmh(&r, 0), SpeedResult::Value(0.0));
        assert_eq!(speed_kmh(&r, 0).to_string(), "0.00");
    }

    #[test]
    fn test_speed_single_point() {
        let r = route(&[(0.0, 0.0, 0)]);
        assert_eq!(speed_kmh(&r, 0).to_string(), "0.00");
        assert_eq!(speed_kmh(&Route::default(), 0).to_string(), "0.00");
    }

    #[test]
    fn test_speed_between_fixes() {
        let r = route(&[(17.0, 78.0, 0), (17.001, 78.001, MIN)]);
        let speed = speed_kmh(&r, 1).value().unwrap();
        assert_relative_eq!(speed, 9.23);
        assert_eq!(speed_kmh(&r, 1).to_string(), "9.23");
    }

    #[test]
    fn test_speed_matches_distance_over_time() {
        let r = route(&[
            (17.0, 78.0, 0),
            (17.01, 78.0, 2 * MIN),
            (17.02, 78.02, 5 * MIN),
            (17.03, 78.02, 6 * MIN),
        ]);
        for cursor in 1..r.len() {
            let prev = r[cursor - 1];
            let curr = r[cursor];
            let hours = (curr.timestamp_ms - prev.timestamp_ms) as f64 / 3_600_000.0;
            let expected = distance_km(prev.coordinate(), curr.coordinate()) / hours;
            let speed = speed_kmh(&r, cursor).value().unwrap();
            assert!(speed >= 0.0 && speed.is_finite());
            assert_relative_eq!(speed, expected, epsilon = 0.005);
        }
    }

    #[test]
    fn test_speed_equal_timestamps_unavailable() {
        let r = route(&[(17.0, 78.0, 1_000), (17.001, 78.001, 1_000)]);
        assert_eq!(speed_kmh(&r, 1), SpeedResult::Unavailable);
        assert_eq!(speed_kmh(&r, 1).to_string(), "N/A");
    }

    #[test]
    fn test_speed_backwards_timestamps_unavailable() {
        let r = route(&[(17.0, 78.0, 5 * MIN), (17.001, 78.001, MIN)]);
        assert_eq!(speed_kmh(&r, 1), SpeedResult::Unavailable);
    }

    #[test]
    fn test_speed_cursor_out_of_range() {
        let r = route(&[(17.0, 78.0, 0), (17.001, 78.001, MIN)]);
        assert_eq!(speed_kmh(&r, 7), SpeedResult::Value(0.0));
    }

    #[test]
    fn test_eta_arrived() {
        let r = route(&[(0.0, 0.0, 0), (0.1, 0.1, 10 * MIN)]);
        assert_eq!(eta(&r, 1), EtaResult::Arrived);
        assert_eq!(eta(&r, 5), EtaResult::Arrived);
        assert_eq!(eta(&Route::default(), 0), EtaResult::Arrived);
        assert_eq!(eta(&route(&[(0.0, 0.0, 0)]), 0).to_string(), "Arrived");
    }

    #[test]
    fn test_eta_less_than_minute() {
        let r = route(&[(0.0, 0.0, 0), (0.1, 0.1, 59_999)]);
        assert_eq!(eta(&r, 0), EtaResult::LessThanOneMinute);
        assert_eq!(eta(&r, 0).to_string(), "Less than 1 min");
    }

    #[test]
    fn test_eta_minutes() {
        let r = route(&[(0.0, 0.0, 0), (0.1, 0.1, 45 * MIN + 30_000)]);
        assert_eq!(eta(&r, 0), EtaResult::Minutes(45));
        assert_eq!(eta(&r, 0).to_string(), "45 min");
    }

    #[test]
    fn test_eta_hours_and_minutes() {
        let r = route(&[(0.0, 0.0, 0), (0.1, 0.1, MIN), (0.2, 0.2, 125 * MIN)]);
        assert_eq!(eta(&r, 0), EtaResult::HoursMinutes { hours: 2, minutes: 5 });
        assert_eq!(eta(&r, 0).to_string(), "2h 5m");
        assert_eq!(eta(&r, 1).to_string(), "2h 4m");
    }

    #[test]
    fn test_extreme_timestamps_do_not_overflow() {
        let r = route(&[(17.0, 78.0, i64::MIN), (17.001, 78.001, i64::MAX)]);
        let speed = speed_kmh(&r, 1).value().unwrap();
        assert!(speed >= 0.0 && speed.is_finite());
        assert!(matches!(eta(&r, 0), EtaResult::HoursMinutes { hours, .. } if hours > 0));

        let r = route(&[(17.0, 78.0, i64::MAX), (17.001, 78.001, i64::MIN)]);
        assert_eq!(speed_kmh(&r, 1), SpeedResult::Unavailable);
        assert_eq!(eta(&r, 0), EtaResult::LessThanOneMinute);
    }

    #[test]
    fn test_eta_out_of_order_timestamps() {
        // Last fix is earlier than the current one: floor of a negative remainder
        let r = route(&[(0.0, 0.0, 10 * MIN), (0.1, 0.1, 0)]);
        assert_eq!(eta(&r, 0), EtaResult::LessThanOneMinute);
    }
}
