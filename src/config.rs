use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::playback::{clamp_interval, PlaybackConfig, DEFAULT_INTERVAL_MS};

/// Route file used when nothing else is configured
pub const DEFAULT_ROUTE_FILE: &str = "dummy-route.json";

/// Persistent application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Advance interval of the playback timer
    pub interval_ms: u64,
    /// Route opened in the previous run
    pub last_route: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_INTERVAL_MS,
            last_route: None,
        }
    }
}

impl Settings {
    pub fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("vehicle-replay").join("settings.json"))
    }

    /// Load settings from the user config directory, falling back to defaults
    pub fn load() -> Self {
        Self::config_path()
            .map(|path| Self::load_from(&path))
            .unwrap_or_default()
    }

    pub fn load_from(path: &Path) -> Self {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                debug!(path = %path.display(), "no settings loaded: {}", e);
                return Self::default();
            }
        };

        match serde_json::from_str::<Settings>(&contents) {
            Ok(mut settings) => {
                settings.interval_ms = clamp_interval(settings.interval_ms);
                settings
            }
            Err(e) => {
                warn!(path = %path.display(), "ignoring malformed settings: {}", e);
                Self::default()
            }
        }
    }

    pub fn save(&self) {
        if let Some(path) = Self::config_path() {
            self.save_to(&path);
        }
    }

    pub fn save_to(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            if let Err(e) = fs::create_dir_all(parent) {
                warn!(path = %parent.display(), "failed to create settings directory: {}", e);
                return;
            }
        }
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = fs::write(path, json) {
                    warn!(path = %path.display(), "failed to save settings: {}", e);
                }
            }
            Err(e) => warn!("failed to serialize settings: {}", e),
        }
    }

    pub fn playback_config(&self) -> PlaybackConfig {
        PlaybackConfig {
            interval_ms: clamp_interval(self.interval_ms),
        }
    }

    /// Pick the route to open: explicit argument, then last route, then the default file
    pub fn resolve_route(&self, arg: Option<PathBuf>) -> PathBuf {
        arg.or_else(|| self.last_route.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_ROUTE_FILE))
    }
}
