use std::ops::Deref;
use std::sync::Arc;

use serde::Serialize;

use crate::core::{Coordinate, RoutePoint};

/// An ordered, immutable list of route points
///
/// Insertion order is chronological order is traversal order. Timestamps are
/// expected to be non-decreasing but this is not enforced; the derived metrics
/// degrade to sentinels when it does not hold. Cloning is cheap, the points
/// are shared between the playback task and the view layer.
#[derive(Debug, Clone, PartialEq)]
pub struct Route {
    points: Arc<[RoutePoint]>,
}

impl Route {
    pub fn new(points: Vec<RoutePoint>) -> Self {
        Self { points: points.into() }
    }

    /// Index of the final point, or `None` for an empty route
    pub fn last_index(&self) -> Option<usize> {
        self.points.len().checked_sub(1)
    }

    /// Coordinates of the whole route, in traversal order
    pub fn path(&self) -> Vec<Coordinate> {
        self.points.iter().map(RoutePoint::coordinate).collect()
    }

    /// Coordinates from the start up to and including `cursor`
    pub fn traveled_path(&self, cursor: usize) -> Vec<Coordinate> {
        let end = (cursor + 1).min(self.points.len());
        self.points[..end].iter().map(RoutePoint::coordinate).collect()
    }

    /// Bounding box of all points, used to fit the map view
    pub fn bounds(&self) -> Option<Bounds> {
        let first = self.points.first()?;
        let init = Bounds {
            min: first.coordinate(),
            max: first.coordinate(),
        };
        Some(self.points[1..].iter().fold(init, |mut b, p| {
            b.min.lat = b.min.lat.min(p.lat);
            b.min.lng = b.min.lng.min(p.lng);
            b.max.lat = b.max.lat.max(p.lat);
            b.max.lng = b.max.lng.max(p.lng);
            b
        }))
    }
}

impl Default for Route {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

impl Deref for Route {
    type Target = [RoutePoint];

    fn deref(&self) -> &[RoutePoint] {
        &self.points
    }
}

/// South-west / north-east corners of a route
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bounds {
    pub min: Coordinate,
    pub max: Coordinate,
}

impl Bounds {
    pub fn center(&self) -> Coordinate {
        Coordinate::new(
            (self.min.lat + self.max.lat) / 2.0,
            (self.min.lng + self.max.lng) / 2.0,
        )
    }
}
