pub mod panel;
pub mod status;

pub use panel::StatusPanel;
pub use status::{MapLayers, Marker, MarkerKind, VehicleStatus};
