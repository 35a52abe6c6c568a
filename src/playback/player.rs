//! Timer-driven playback task.
//!
//! A single tokio task owns the [`PlaybackEngine`] and at most one pending
//! tick deadline. Commands and ticks are handled one at a time inside the
//! same `select!` loop, so two ticks never interleave and changing the
//! interval replaces the deadline instead of adding a second timer.

use crate::core::Route;
use crate::playback::{PlaybackConfig, PlaybackEngine, PlaybackSnapshot};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::{debug, info, trace, warn};

/// Commands accepted by the playback task
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerCommand {
    Play,
    Pause,
    Reset,
    SetSpeed(u64),
    Shutdown,
}

/// Command surface and state feed of a running playback task
pub struct PlayerHandle {
    route: Route,
    commands: mpsc::UnboundedSender<PlayerCommand>,
    snapshots: watch::Receiver<PlaybackSnapshot>,
    task: JoinHandle<()>,
}

/// Spawn the playback task for `route` on the current tokio runtime
pub fn spawn_player(route: Route, config: PlaybackConfig) -> PlayerHandle {
    let engine = PlaybackEngine::new(route.clone(), config);
    let (tx, rx) = mpsc::unbounded_channel();
    let (snapshot_tx, snapshot_rx) = watch::channel(engine.snapshot());

    info!(points = route.len(), interval_ms = engine.interval_ms(), "playback task started");
    let task = tokio::spawn(run(engine, rx, snapshot_tx));

    PlayerHandle {
        route,
        commands: tx,
        snapshots: snapshot_rx,
        task,
    }
}

impl PlayerHandle {
    pub fn route(&self) -> &Route {
        &self.route
    }

    pub fn play(&self) {
        self.send(PlayerCommand::Play);
    }

    pub fn pause(&self) {
        self.send(PlayerCommand::Pause);
    }

    pub fn reset(&self) {
        self.send(PlayerCommand::Reset);
    }

    /// Change the advance interval; the next tick fires after the new interval
    pub fn set_speed(&self, interval_ms: u64) {
        self.send(PlayerCommand::SetSpeed(interval_ms));
    }

    /// Latest published playback state
    pub fn snapshot(&self) -> PlaybackSnapshot {
        *self.snapshots.borrow()
    }

    /// Receiver that is notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<PlaybackSnapshot> {
        self.snapshots.clone()
    }

    /// Stop the task and wait for it to exit
    pub async fn shutdown(self) {
        self.send(PlayerCommand::Shutdown);
        if let Err(e) = self.task.await {
            warn!("playback task ended abnormally: {}", e);
        }
    }

    fn send(&self, command: PlayerCommand) {
        if self.commands.send(command).is_err() {
            warn!(?command, "playback task is gone, command dropped");
        }
    }
}

async fn run(
    mut engine: PlaybackEngine,
    mut commands: mpsc::UnboundedReceiver<PlayerCommand>,
    snapshots: watch::Sender<PlaybackSnapshot>,
) {
    let mut deadline: Option<Instant> = None;

    loop {
        let pending = deadline;
        let timer = async move {
            match pending {
                Some(at) => time::sleep_until(at).await,
                None => std::future::pending().await,
            }
        };

        tokio::select! {
            command = commands.recv() => {
                let command = match command {
                    Some(PlayerCommand::Shutdown) | None => break,
                    Some(command) => command,
                };
                let restart = apply(&mut engine, command);
                deadline = next_deadline(&engine, deadline, restart);
            }
            _ = timer => {
                if engine.tick() {
                    trace!(
                        cursor = engine.cursor(),
                        state = ?engine.state(),
                        speed = %engine.speed(),
                        eta = %engine.eta(),
                        "tick"
                    );
                }
                deadline = next_deadline(&engine, None, true);
            }
        }

        snapshots.send_replace(engine.snapshot());
    }

    debug!("playback task stopped");
}

/// Apply a command; returns whether a pending deadline must be restarted
fn apply(engine: &mut PlaybackEngine, command: PlayerCommand) -> bool {
    match command {
        PlayerCommand::Play => {
            let was_playing = engine.is_playing();
            let rewound = engine.play();
            rewound || !was_playing
        }
        PlayerCommand::Pause => {
            engine.pause();
            false
        }
        PlayerCommand::Reset => {
            engine.reset();
            false
        }
        PlayerCommand::SetSpeed(interval_ms) => {
            engine.set_speed(interval_ms);
            true
        }
        PlayerCommand::Shutdown => false,
    }
}

fn next_deadline(engine: &PlaybackEngine, current: Option<Instant>, restart: bool) -> Option<Instant> {
    if !engine.is_playing() || !engine.can_advance() {
        return None;
    }
    match current {
        Some(at) if !restart => Some(at),
        _ => {
            let at = Instant::now() + engine.interval();
            trace!(interval_ms = engine.interval_ms(), "tick scheduled");
            Some(at)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RoutePoint;
    use std::time::Duration;

    fn route(len: usize) -> Route {
        Route::new(
            (0..len)
                .map(|i| RoutePoint::new(17.0 + i as f64 * 0.001, 78.0, i as i64 * 60_000))
                .collect(),
        )
    }

    fn config(interval_ms: u64) -> PlaybackConfig {
        PlaybackConfig { interval_ms }
    }

    #[tokio::test(start_paused = true)]
    async fn test_plays_to_end_and_stops() {
        let player = spawn_player(route(4), config(500));
        let mut rx = player.subscribe();
        let start = Instant::now();

        player.play();
        let snap = *rx.wait_for(|s| s.cursor == 3 && !s.is_playing).await.unwrap();

        assert_eq!(snap.cursor, 3);
        let elapsed = start.elapsed();
        assert!(elapsed >= Duration::from_millis(1500), "{:?}", elapsed);
        assert!(elapsed < Duration::from_millis(2000), "{:?}", elapsed);

        // Nothing else happens once parked at the end
        time::sleep(Duration::from_secs(10)).await;
        assert_eq!(player.snapshot(), snap);

        player.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_pause_stops_ticks() {
        let player = spawn_player(route(5), config(500));
        let mut rx = player.subscribe();

        player.play();
        rx.wait_for(|s| s.cursor == 1).await.unwrap();
        player.pause();
        rx.wait_for(|s| !s.is_playing).await.unwrap();

        time::sleep(Duration::from_secs(5)).await;
        let snap = player.snapshot();
        assert_eq!(snap.cursor, 1);
        assert!(!snap.is_playing);

        player.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_replay_from_end_rewinds() {
        let player = spawn_player(route(3), config(500));
        let mut rx = player.subscribe();

        player.play();
        rx.wait_for(|s| s.cursor == 2 && !s.is_playing).await.unwrap();

        player.play();
        let snap = *rx.wait_for(|s| s.is_playing).await.unwrap();
        assert_eq!(snap.cursor, 0);

        rx.wait_for(|s| s.cursor == 2 && !s.is_playing).await.unwrap();
        player.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_reset_rewinds_and_idles() {
        let player = spawn_player(route(5), config(500));
        let mut rx = player.subscribe();

        player.play();
        rx.wait_for(|s| s.cursor == 2).await.unwrap();
        player.reset();
        let snap = *rx.wait_for(|s| s.cursor == 0 && !s.is_playing).await.unwrap();
        assert_eq!(snap.interval_ms, 500);

        time::sleep(Duration::from_secs(5)).await;
        assert_eq!(player.snapshot().cursor, 0);
        player.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_speed_change_applies_to_next_tick() {
        let player = spawn_player(route(5), config(2000));
        let mut rx = player.subscribe();

        player.play();
        rx.wait_for(|s| s.cursor == 1).await.unwrap();

        let changed = Instant::now();
        player.set_speed(500);
        rx.wait_for(|s| s.cursor == 2).await.unwrap();
        let elapsed = changed.elapsed();
        assert!(elapsed >= Duration::from_millis(500), "{:?}", elapsed);
        assert!(elapsed < Duration::from_millis(1000), "{:?}", elapsed);

        // Exactly one timer: the next advance also takes the new interval
        let before = Instant::now();
        rx.wait_for(|s| s.cursor == 3).await.unwrap();
        assert!(before.elapsed() < Duration::from_millis(1000));

        player.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_set_speed_is_clamped() {
        let player = spawn_player(route(2), config(2000));
        let mut rx = player.subscribe();

        player.set_speed(50);
        let snap = *rx.wait_for(|s| s.interval_ms != 2000).await.unwrap();
        assert_eq!(snap.interval_ms, 500);
        player.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_empty_and_single_point_routes() {
        for len in [0, 1] {
            let player = spawn_player(route(len), config(500));
            let mut rx = player.subscribe();

            player.play();
            rx.wait_for(|s| s.is_playing).await.unwrap();
            time::sleep(Duration::from_secs(5)).await;
            assert_eq!(player.snapshot().cursor, 0);

            player.shutdown().await;
        }
    }
}
