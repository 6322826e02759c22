//! Command-line interface for gridlock.

use clap::{Parser, Subcommand};

/// Gridlock - WebSocket tic-tac-toe match server
#[derive(Parser, Debug)]
#[command(name = "gridlock")]
#[command(about = "WebSocket tic-tac-toe match server", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the WebSocket match server
    Serve {
        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Port to bind to
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Maximum simultaneous client connections
        #[arg(long, default_value = "1024")]
        max_connections: usize,

        /// Abandon matches idle for this many seconds (0 disables the reaper)
        #[arg(long, default_value = "300")]
        idle_timeout_secs: u64,
    },
}
