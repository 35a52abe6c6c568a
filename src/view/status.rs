use serde::Serialize;

use crate::core::{Bounds, Coordinate, Route, RoutePoint};
use crate::geo::{self, EtaResult, SpeedResult};
use crate::playback::{PlaybackSnapshot, DEFAULT_INTERVAL_MS};

/// What a map marker stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MarkerKind {
    Start,
    End,
    Vehicle,
}

/// A point the map collaborator should pin
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Marker {
    pub kind: MarkerKind,
    pub position: Coordinate,
    pub timestamp_ms: i64,
}

impl Marker {
    fn at(kind: MarkerKind, point: &RoutePoint) -> Self {
        Self {
            kind,
            position: point.coordinate(),
            timestamp_ms: point.timestamp_ms,
        }
    }
}

/// Everything a map renderer draws for the current frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapLayers {
    pub bounds: Option<Bounds>,
    pub center: Option<Coordinate>,
    pub full_path: Vec<Coordinate>,
    pub traveled_path: Vec<Coordinate>,
    pub markers: Vec<Marker>,
}

/// Read-only view of the route and playback state for rendering
///
/// Renderers only ever see this projection; they send commands back through
/// [`crate::playback::PlayerHandle`].
#[derive(Debug, Clone, Copy)]
pub struct VehicleStatus<'a> {
    route: &'a Route,
    snapshot: PlaybackSnapshot,
}

impl<'a> VehicleStatus<'a> {
    pub fn new(route: &'a Route, snapshot: PlaybackSnapshot) -> Self {
        Self { route, snapshot }
    }

    pub fn route(&self) -> &'a Route {
        self.route
    }

    pub fn current_index(&self) -> usize {
        self.snapshot.cursor
    }

    pub fn is_playing(&self) -> bool {
        self.snapshot.is_playing
    }

    pub fn interval_ms(&self) -> u64 {
        self.snapshot.interval_ms
    }

    /// Point under the cursor; absent for an empty route
    pub fn current_point(&self) -> Option<&'a RoutePoint> {
        self.route.get(self.snapshot.cursor)
    }

    /// Progress through the route in percent, one decimal
    pub fn progress_percent(&self) -> f64 {
        let denominator = match self.route.last_index() {
            Some(last) if last > 0 => last as f64,
            _ => return 0.0,
        };
        let percent = self.snapshot.cursor as f64 / denominator * 100.0;
        (percent * 10.0).round() / 10.0
    }

    pub fn formatted_progress(&self) -> String {
        format!("{:.1}%", self.progress_percent())
    }

    pub fn speed(&self) -> SpeedResult {
        geo::speed_kmh(self.route, self.snapshot.cursor)
    }

    pub fn eta(&self) -> EtaResult {
        geo::eta(self.route, self.snapshot.cursor)
    }

    pub fn formatted_speed(&self) -> String {
        self.speed()
            .value()
            .map(|v| format!("{:.2} km/h", v))
            .unwrap_or_else(|| "N/A".to_string())
    }

    pub fn formatted_eta(&self) -> String {
        self.eta().to_string()
    }

    pub fn formatted_coordinates(&self) -> String {
        self.current_point()
            .map(RoutePoint::format_coordinate)
            .unwrap_or_else(|| "N/A".to_string())
    }

    /// Time of the current fix as `HH:MM:SS` (UTC)
    pub fn formatted_timestamp(&self) -> String {
        self.current_point()
            .and_then(RoutePoint::timestamp)
            .map(|ts| ts.format("%H:%M:%S").to_string())
            .unwrap_or_else(|| "N/A".to_string())
    }

    /// Playback rate relative to the default interval, e.g. "2.0x"
    pub fn speed_multiplier_label(&self) -> String {
        format!("{:.1}x", DEFAULT_INTERVAL_MS as f64 / self.snapshot.interval_ms as f64)
    }

    pub fn total_points(&self) -> usize {
        self.route().len()
    }

    /// One-based index of the current point
    pub fn current_point_number(&self) -> usize {
        self.current_index() + 1
    }

    pub fn full_path(&self) -> Vec<Coordinate> {
        self.route.path()
    }

    pub fn traveled_path(&self) -> Vec<Coordinate> {
        self.route.traveled_path(self.snapshot.cursor)
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.route.bounds()
    }

    /// Start, end and vehicle markers
    ///
    /// The end marker is only present once the route has more than one point.
    pub fn markers(&self) -> Vec<Marker> {
        let mut markers = Vec::with_capacity(3);
        if let Some(first) = self.route.first() {
            markers.push(Marker::at(MarkerKind::Start, first));
        }
        if self.route.len() > 1 {
            if let Some(last) = self.route.last() {
                markers.push(Marker::at(MarkerKind::End, last));
            }
        }
        if let Some(current) = self.current_point() {
            markers.push(Marker::at(MarkerKind::Vehicle, current));
        }
        markers
    }

    pub fn map_layers(&self) -> MapLayers {
        let bounds = self.bounds();
        MapLayers {
            bounds,
            center: bounds.map(|b| b.center()),
            full_path: self.full_path(),
            traveled_path: self.traveled_path(),
            markers: self.markers(),
        }
    }
}
