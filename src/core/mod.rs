pub mod point;
pub mod route;

pub use point::{Coordinate, RoutePoint};
pub use route::{Bounds, Route};
