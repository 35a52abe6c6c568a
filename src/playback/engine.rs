use crate::core::{Route, RoutePoint};
use crate::geo::{self, EtaResult, SpeedResult};
use crate::playback::{clamp_interval, PlaybackConfig, PlaybackSnapshot, PlaybackState};
use std::time::Duration;
use tracing::debug;

/// Cursor state machine for route playback
///
/// The engine has no notion of time; whoever owns it calls [`tick`] on a
/// schedule. See [`crate::playback::player`] for the timer side.
///
/// [`tick`]: PlaybackEngine::tick
pub struct PlaybackEngine {
    route: Route,
    config: PlaybackConfig,
    state: PlaybackState,
    cursor: usize,
}

impl PlaybackEngine {
    pub fn new(route: Route, config: PlaybackConfig) -> Self {
        Self {
            route,
            config: PlaybackConfig {
                interval_ms: clamp_interval(config.interval_ms),
            },
            state: PlaybackState::Idle,
            cursor: 0,
        }
    }

    /// Get current playback position (index into the route)
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Get current playback state
    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Running
    }

    pub fn interval_ms(&self) -> u64 {
        self.config.interval_ms
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.config.interval_ms)
    }

    /// Point under the cursor, `None` for an empty route
    pub fn current_point(&self) -> Option<&RoutePoint> {
        self.route.get(self.cursor)
    }

    fn at_end(&self) -> bool {
        self.route.last_index() == Some(self.cursor)
    }

    /// Whether a tick would move the cursor
    pub fn can_advance(&self) -> bool {
        self.route.len() >= 2 && !self.at_end()
    }

    /// Start playback, rewinding first when parked on the final point
    ///
    /// Returns `true` when the cursor was rewound.
    pub fn play(&mut self) -> bool {
        let rewound = self.at_end() && self.cursor != 0;
        if self.at_end() {
            self.cursor = 0;
        }
        if self.state != PlaybackState::Running {
            debug!(cursor = self.cursor, rewound, "playback started");
        }
        self.state = PlaybackState::Running;
        rewound
    }

    /// Pause playback, keeping the cursor where it is
    pub fn pause(&mut self) {
        if self.state == PlaybackState::Running {
            debug!(cursor = self.cursor, "playback paused");
        }
        self.state = PlaybackState::Idle;
    }

    /// Stop playback and rewind to the first point
    pub fn reset(&mut self) {
        self.state = PlaybackState::Idle;
        self.cursor = 0;
        debug!("playback reset");
    }

    /// Set the advance interval, clamped to the supported range
    pub fn set_speed(&mut self, interval_ms: u64) {
        self.config.interval_ms = clamp_interval(interval_ms);
        debug!(interval_ms = self.config.interval_ms, "playback interval changed");
    }

    /// Advance the cursor by one point
    ///
    /// No-op unless running and not yet on the final point. The tick that
    /// lands on the final point still moves the cursor, then drops back to
    /// idle. Returns `true` if the cursor moved.
    pub fn tick(&mut self) -> bool {
        if self.state != PlaybackState::Running || !self.can_advance() {
            return false;
        }

        self.cursor += 1;
        if self.at_end() {
            self.state = PlaybackState::Idle;
            debug!(cursor = self.cursor, point = ?self.current_point(), "reached end of route");
        }
        true
    }

    pub fn speed(&self) -> SpeedResult {
        geo::speed_kmh(&self.route, self.cursor)
    }

    pub fn eta(&self) -> EtaResult {
        geo::eta(&self.route, self.cursor)
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        PlaybackSnapshot {
            cursor: self.cursor,
            is_playing: self.is_playing(),
            interval_ms: self.config.interval_ms,
        }
    }
}
