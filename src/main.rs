//! Gridlock - WebSocket tic-tac-toe match server binary.

use anyhow::Result;
use clap::Parser;
use gridlock::AppState;
use std::time::Duration;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod cli;

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            host,
            port,
            max_connections,
            idle_timeout_secs,
        } => run_server(host, port, max_connections, idle_timeout_secs).await,
    }
}

/// Run the WebSocket match server
async fn run_server(
    host: String,
    port: u16,
    max_connections: usize,
    idle_timeout_secs: u64,
) -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!(%host, port, max_connections, "starting gridlock match server");

    let state = AppState::new(max_connections);

    // Idle-match reaper: an external collaborator of the core, driven
    // by a plain interval timer.
    if idle_timeout_secs > 0 {
        let reaper = state.clone();
        let max_idle = Duration::from_secs(idle_timeout_secs);
        tokio::spawn(async move {
            let mut tick = tokio::time::interval(Duration::from_secs(30).min(max_idle));
            loop {
                tick.tick().await;
                reaper.reap_idle(max_idle);
            }
        });
        info!(idle_timeout_secs, "idle-match reaper enabled");
    }

    let app = gridlock::router(state);
    let listener = tokio::net::TcpListener::bind((host.as_str(), port)).await?;
    info!("server ready at ws://{}:{}/ws", host, port);
    axum::serve(listener, app).await?;

    Ok(())
}
