use std::fmt;

use crate::view::VehicleStatus;

const BAR_WIDTH: usize = 30;

/// Plain-text rendering of the vehicle status panel
pub struct StatusPanel<'a>(pub VehicleStatus<'a>);

impl StatusPanel<'_> {
    fn progress_bar(&self) -> String {
        let filled = ((self.0.progress_percent() / 100.0) * BAR_WIDTH as f64).round() as usize;
        let filled = filled.min(BAR_WIDTH);
        format!("[{}{}]", "#".repeat(filled), "-".repeat(BAR_WIDTH - filled))
    }
}

impl fmt::Display for StatusPanel<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = &self.0;
        let state = if status.is_playing() { "playing" } else { "paused" };

        writeln!(f, "Vehicle Status ({})", state)?;
        writeln!(f, "  Coordinates: {}", status.formatted_coordinates())?;
        writeln!(f, "  Timestamp:   {}", status.formatted_timestamp())?;
        writeln!(f, "  Speed:       {}", status.formatted_speed())?;
        writeln!(f, "  ETA:         {}", status.formatted_eta())?;
        writeln!(f, "  Progress:    {}", status.formatted_progress())?;
        writeln!(f, "  {}", self.progress_bar())?;
        writeln!(
            f,
            "  Simulation Speed: {} ({} ms/point)",
            status.speed_multiplier_label(),
            status.interval_ms()
        )?;
        write!(
            f,
            "  Point {} of {}",
            status.current_point_number(),
            status.total_points()
        )
    }
}
