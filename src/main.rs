//! Taskroom terminal client
//!
//! Joins shared to-do rooms on a room server and keeps a live view of the
//! tasks in the current room.
//!
//! ## Usage
//!
//! ```bash
//! # Connect as ada with access to two rooms, joining "work" right away
//! taskroom --user ada --room work --room home --join work
//!
//! # Point at another server
//! TASKROOM_SERVER=10.0.0.5:7878 taskroom -u ada -r work
//! ```

mod app;
mod commands;
mod render;
mod transport;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use taskroom_core::logging::LoggingBuilder;
use taskroom_core::{RoomName, ViewConfig};

use crate::app::ClientOptions;

/// Taskroom - shared to-do lists in real time
#[derive(Parser, Debug)]
#[command(name = "taskroom")]
#[command(version)]
#[command(about = "Taskroom - shared to-do lists in real time")]
struct Args {
    /// Room server address (host:port)
    #[arg(short, long, env = "TASKROOM_SERVER", default_value = "127.0.0.1:7878")]
    server: String,

    /// Username stamped on every request
    #[arg(short, long, env = "TASKROOM_USER")]
    user: String,

    /// Room you may join (repeat for several)
    #[arg(short, long = "room", required = true)]
    rooms: Vec<String>,

    /// Room to join on startup
    #[arg(short, long)]
    join: Option<String>,

    /// Directory for JSONL session logs (default: <data dir>/taskroom/logs)
    #[arg(long)]
    log_dir: Option<PathBuf>,

    /// Quiet period before "stop typing" is sent, in milliseconds
    #[arg(long, default_value_t = 1500)]
    typing_idle_ms: u64,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn log_filter(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "taskroom=info,taskroom_core=info",
        1 => "taskroom=debug,taskroom_core=debug",
        _ => "trace",
    }
}

/// Get the default log directory (<data dir>/taskroom/logs)
fn default_log_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("taskroom")
        .join("logs")
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let log_dir = args.log_dir.unwrap_or_else(default_log_dir);
    let log_path = LoggingBuilder::new(&log_dir, &args.user)
        .with_filter(log_filter(args.verbose))
        .init()
        .with_context(|| format!("Failed to set up logging in {}", log_dir.display()))?;
    tracing::info!(log = %log_path.display(), "Taskroom client starting");

    let config = ViewConfig::new(args.user, args.rooms)
        .with_typing_idle(Duration::from_millis(args.typing_idle_ms));

    app::run(ClientOptions {
        server: args.server,
        config,
        join: args.join.map(RoomName::new),
    })
    .await
}
