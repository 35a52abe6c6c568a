mod commands;
mod config;
mod core;
mod error;
mod geo;
mod input;
mod playback;
mod session;
mod view;

use anyhow::{Context, Result};
use commands::{adjusted_interval, help_text, CommandAction};
use config::Settings;
use crate::core::Route;
use input::FileRouteLoader;
use playback::PlaybackSnapshot;
use session::{LoadStatus, RouteSession};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::info;
use tracing_subscriber::EnvFilter;
use view::{StatusPanel, VehicleStatus};

type CommandLines = Lines<BufReader<Stdin>>;

fn render(route: &Route, snapshot: PlaybackSnapshot) {
    println!("{}\n", StatusPanel(VehicleStatus::new(route, snapshot)));
}

/// Read the next terminal command, skipping lines that do not parse
async fn next_command(lines: &mut CommandLines) -> Result<Option<CommandAction>> {
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        match line.parse::<CommandAction>() {
            Ok(action) => return Ok(Some(action)),
            Err(e) => println!("{}", e),
        }
    }
    Ok(None)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging; stdout belongs to the status panel
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let mut settings = Settings::load();
    let route_path = settings.resolve_route(std::env::args_os().nth(1).map(PathBuf::from));

    let mut session = RouteSession::new(FileRouteLoader::new(&route_path), settings.playback_config());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    // Loading failures are shown once; the user decides whether to retry
    session.load().await;
    while let LoadStatus::Failed(e) = session.status() {
        println!("Error Loading Data (attempt {}): {}", session.attempts(), e);
        println!("Type 'retry' to try again or 'quit' to exit.");
        match next_command(&mut lines).await? {
            Some(CommandAction::Retry) => {
                session.retry().await;
            }
            Some(CommandAction::Quit) | None => return Ok(()),
            Some(_) => {}
        }
    }

    let Some(player) = session.player() else {
        return Ok(());
    };

    if player.route().is_empty() {
        println!("No route data available");
        session.shutdown().await;
        return Ok(());
    }

    settings.last_route = Some(route_path.clone());
    settings.save();

    let route = player.route().clone();
    let mut updates = player.subscribe();

    println!("Loaded {} points from {}", route.len(), route_path.display());
    println!("{}\n", help_text());
    render(&route, player.snapshot());

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = *updates.borrow_and_update();
                render(&route, snapshot);
            }
            command = next_command(&mut lines) => {
                let Some(action) = command? else { break };
                match action {
                    CommandAction::Play => player.play(),
                    CommandAction::Pause => player.pause(),
                    CommandAction::Reset => player.reset(),
                    CommandAction::Speed(_) | CommandAction::SpeedUp | CommandAction::SpeedDown => {
                        // Step from the locally tracked interval; the snapshot may lag behind
                        if let Some(interval_ms) = adjusted_interval(action, settings.interval_ms) {
                            player.set_speed(interval_ms);
                            settings.interval_ms = interval_ms;
                            settings.save();
                        }
                    }
                    CommandAction::Retry => println!("Route already loaded"),
                    CommandAction::Status => render(&route, player.snapshot()),
                    CommandAction::Map => {
                        let layers = VehicleStatus::new(&route, player.snapshot()).map_layers();
                        println!("{}", serde_json::to_string_pretty(&layers)?);
                    }
                    CommandAction::Help => println!("{}", help_text()),
                    CommandAction::Quit => break,
                }
            }
            _ = tokio::signal::ctrl_c() => break,
        }
    }

    info!("shutting down");
    session.shutdown().await;
    Ok(())
}
