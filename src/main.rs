//! slirc-todo - chat-driven task list host.
//!
//! Connects to the configured channel, keeps an in-memory board, and reloads
//! its configuration on SIGHUP.

use anyhow::Context;
use slirc_todo::board::{Board, SharedBoard};
use slirc_todo::config::{self, Config};
use slirc_todo::network::{ConnectionManager, SessionConfig};
use slirc_todo::telemetry;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init();

    // Load configuration
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = load_config(&config_path)?;
    let session = config.chat.session()?;

    info!(
        channel = %session.channel(),
        owner = %session.auth().owner(),
        moderators = session.auth().moderators().count(),
        endpoint = %session.endpoint(),
        "Starting slirc-todo"
    );

    let board = SharedBoard::new(Board::from_config(&config.board));
    let manager = ConnectionManager::start(session, board.clone());

    run_until_shutdown(&manager, &board, &config_path).await;

    info!("Shutting down");
    manager.stop().await;

    let board = board.lock();
    info!(
        tasks = board.tasks().len(),
        completed = board.tasks().iter().filter(|t| t.completed).count(),
        "Final board"
    );
    Ok(())
}

fn load_config(path: &str) -> anyhow::Result<Config> {
    let config = Config::load(path).map_err(|e| {
        error!(path = %path, error = %e, "Failed to load config");
        e
    })?;

    if let Err(errors) = config::validate(&config) {
        for e in &errors {
            error!(path = %path, error = %e, "Invalid config");
        }
        anyhow::bail!("{} configuration error(s) in {}", errors.len(), path);
    }

    Ok(config)
}

/// Reload the config, apply the board settings and hand the new session to
/// the manager. A config that fails to load or validate is rejected and the
/// link and board keep running unchanged.
fn rehash(manager: &ConnectionManager, board: &SharedBoard, path: &str) -> anyhow::Result<()> {
    let config = load_config(path)?;
    let session: SessionConfig = config.chat.session().context("invalid endpoint")?;
    board.lock().apply_config(&config.board);
    manager.reconfigure(session)?;
    info!(path = %path, "Configuration reloaded");
    Ok(())
}

#[cfg(unix)]
async fn run_until_shutdown(manager: &ConnectionManager, board: &SharedBoard, path: &str) {
    use tokio::signal::unix::{SignalKind, signal};

    let mut hangup = match signal(SignalKind::hangup()) {
        Ok(s) => Some(s),
        Err(e) => {
            warn!(error = %e, "SIGHUP handler unavailable, rehash disabled");
            None
        }
    };

    loop {
        tokio::select! {
            result = tokio::signal::ctrl_c() => {
                if let Err(e) = result {
                    error!(error = %e, "Failed to listen for ctrl-c");
                }
                return;
            }
            Some(()) = async {
                match hangup.as_mut() {
                    Some(h) => h.recv().await,
                    None => std::future::pending().await,
                }
            } => {
                info!("SIGHUP received, reloading configuration");
                if let Err(e) = rehash(manager, board, path) {
                    warn!(error = %e, "Rehash rejected");
                }
            }
        }
    }
}

#[cfg(not(unix))]
async fn run_until_shutdown(_manager: &ConnectionManager, _board: &SharedBoard, _path: &str) {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for ctrl-c");
    }
}
