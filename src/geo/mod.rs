pub mod distance;
pub mod metrics;

pub use distance::distance_km;
pub use metrics::{eta, speed_kmh, EtaResult, SpeedResult};
