use tracing::{debug, error, info, warn};

use crate::error::DataLoadError;
use crate::input::RouteLoader;
use crate::playback::{spawn_player, PlaybackConfig, PlayerHandle};

/// Where the session is in its load lifecycle
pub enum LoadStatus {
    NotLoaded,
    Ready(PlayerHandle),
    Failed(DataLoadError),
}

impl LoadStatus {
    pub fn is_ready(&self) -> bool {
        matches!(self, LoadStatus::Ready(_))
    }
}

/// Ties a route loader to the playback task it feeds
///
/// The player only exists once a load attempt has succeeded. A failed
/// attempt is kept until [`retry`](RouteSession::retry) is called.
pub struct RouteSession<L> {
    loader: L,
    config: PlaybackConfig,
    status: LoadStatus,
    attempts: u32,
}

impl<L: RouteLoader> RouteSession<L> {
    pub fn new(loader: L, config: PlaybackConfig) -> Self {
        Self {
            loader,
            config,
            status: LoadStatus::NotLoaded,
            attempts: 0,
        }
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    pub fn player(&self) -> Option<&PlayerHandle> {
        match &self.status {
            LoadStatus::Ready(player) => Some(player),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&DataLoadError> {
        match &self.status {
            LoadStatus::Failed(e) => Some(e),
            _ => None,
        }
    }

    /// Number of load attempts made so far
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Run one load attempt unless a route is already playing
    pub async fn load(&mut self) -> &LoadStatus {
        if self.status.is_ready() {
            debug!("route already loaded");
            return &self.status;
        }

        self.attempts += 1;
        info!(source = %self.loader.describe(), attempt = self.attempts, "loading route");

        self.status = match self.loader.load().await {
            Ok(route) => {
                if route.is_empty() {
                    warn!("route has no points");
                }
                LoadStatus::Ready(spawn_player(route, self.config))
            }
            Err(e) => {
                error!("Error loading route data: {}", e);
                LoadStatus::Failed(e)
            }
        };
        &self.status
    }

    /// Re-invoke the loader after a failure
    pub async fn retry(&mut self) -> &LoadStatus {
        if self.error().is_some() {
            info!("retrying route load");
        }
        self.load().await
    }

    /// Stop the playback task, if any
    pub async fn shutdown(self) {
        if let LoadStatus::Ready(player) = self.status {
            player.shutdown().await;
        }
    }
}
