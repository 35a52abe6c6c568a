pub mod engine;
pub mod player;

pub use engine::PlaybackEngine;
pub use player::{spawn_player, PlayerHandle};

/// Fastest allowed advance interval
pub const MIN_INTERVAL_MS: u64 = 500;
/// Slowest allowed advance interval
pub const MAX_INTERVAL_MS: u64 = 3000;
/// Granularity of the speed control
pub const INTERVAL_STEP_MS: u64 = 100;
/// Interval a fresh controller starts with
pub const DEFAULT_INTERVAL_MS: u64 = 2000;

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Running,
}

/// Playback configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackConfig {
    /// Time between cursor advances
    pub interval_ms: u64,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            interval_ms: DEFAULT_INTERVAL_MS,
        }
    }
}

/// Clamp an interval into the supported range
pub fn clamp_interval(interval_ms: u64) -> u64 {
    interval_ms.clamp(MIN_INTERVAL_MS, MAX_INTERVAL_MS)
}

/// Observable playback state, published after every mutation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackSnapshot {
    pub cursor: usize,
    pub is_playing: bool,
    pub interval_ms: u64,
}

impl Default for PlaybackSnapshot {
    fn default() -> Self {
        Self {
            cursor: 0,
            is_playing: false,
            interval_ms: DEFAULT_INTERVAL_MS,
        }
    }
}
