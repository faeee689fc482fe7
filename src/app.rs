//! Terminal client wiring
//!
//! Connects to the room server and runs four cooperating tasks:
//!
//! - the session driver owning the [`RoomView`]
//! - the line transport relaying events and requests
//! - a renderer printing every new snapshot
//! - the stdin command loop (on this task)

use anyhow::{Context, Result};
use taskroom_core::session::{self, Intent, ViewSnapshot};
use taskroom_core::{RoomName, RoomView, ViewConfig};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, watch};
use tokio::time::Instant;
use tracing::{debug, info, warn};

use crate::commands::{self, Command, USAGE};
use crate::render::render;
use crate::transport;

/// Everything the client needs to start a session
#[derive(Debug, Clone)]
pub struct ClientOptions {
    pub server: String,
    pub config: ViewConfig,
    pub join: Option<RoomName>,
}

enum Exit {
    Quit,
    Disconnected,
}

/// Run an interactive session until the user quits or the server disconnects
pub async fn run(options: ClientOptions) -> Result<()> {
    let ClientOptions {
        server,
        config,
        join,
    } = options;

    let stream = TcpStream::connect(&server)
        .await
        .with_context(|| format!("Failed to connect to room server at {}", server))?;
    info!(server = %server, user = %config.username, "Connected to room server");
    println!("Connected to {} as {}", server, config.username);

    let (outbound_tx, outbound_rx) = mpsc::unbounded_channel();
    let view = RoomView::new(config.clone(), outbound_tx);
    let (updates_tx, updates_rx) = watch::channel(view.snapshot(Instant::now()));
    let (intents_tx, intents_rx) = mpsc::channel(64);
    let (events_tx, events_rx) = mpsc::channel(64);

    let driver = tokio::spawn(session::run(view, intents_rx, events_rx, updates_tx));
    let mut transport = tokio::spawn(transport::pump(stream, events_tx, outbound_rx));
    let renderer = tokio::spawn(render_loop(updates_rx));

    if let Some(room) = join {
        if !warn_unknown_room(&config, &room) {
            intents_tx
                .send(Intent::Join(room))
                .await
                .context("Session driver stopped")?;
        }
    }
    println!("Type 'help' for commands.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdin_open = true;

    let exit = loop {
        tokio::select! {
            result = &mut transport => {
                match result {
                    Ok(Ok(())) => println!("Disconnected from server"),
                    Ok(Err(e)) => {
                        warn!(error = %e, "Transport failed");
                        eprintln!("Connection lost: {}", e);
                    }
                    Err(e) => warn!(error = %e, "Transport task panicked"),
                }
                break Exit::Disconnected;
            }
            line = lines.next_line(), if stdin_open => match line {
                Ok(Some(line)) => match commands::parse(&line) {
                    Ok(Some(Command::Quit)) => break Exit::Quit,
                    Ok(Some(Command::Help)) => println!("{}", USAGE),
                    Ok(Some(Command::Rooms)) => print_rooms(&config),
                    Ok(Some(command)) => {
                        if let Command::Join(room) = &command {
                            if warn_unknown_room(&config, room) {
                                continue;
                            }
                        }
                        for intent in command.into_intents() {
                            if intents_tx.send(intent).await.is_err() {
                                warn!("Session driver stopped accepting intents");
                                break;
                            }
                        }
                    }
                    Ok(None) => {}
                    Err(e) => eprintln!("{}", e),
                },
                Ok(None) => {
                    debug!("stdin closed, waiting for the server");
                    stdin_open = false;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to read stdin");
                    stdin_open = false;
                }
            },
        }
    };

    if let Exit::Quit = exit {
        info!("Leaving on user request");
        transport.abort();
    }

    // Closing both driver inputs lets it finish and drop the snapshot sender
    drop(intents_tx);
    let view = driver.await.context("Session driver panicked")?;
    renderer.await.context("Renderer panicked")?;

    debug!(
        room = ?view.current_room().map(|r| r.as_str()),
        rows = view.rows().len(),
        "Session finished"
    );
    Ok(())
}

/// Print each new snapshot until the driver stops publishing
async fn render_loop(mut updates: watch::Receiver<ViewSnapshot>) {
    while updates.changed().await.is_ok() {
        let text = render(&updates.borrow_and_update());
        println!("{}", text);
    }
}

/// Returns `true` (and tells the user) when the room is not one of theirs
fn warn_unknown_room(config: &ViewConfig, room: &RoomName) -> bool {
    if config.allows(room) {
        return false;
    }
    eprintln!(
        "Unknown room '{}'. Your rooms: {}",
        room,
        room_list(config)
    );
    true
}

fn print_rooms(config: &ViewConfig) {
    println!("Your rooms: {}", room_list(config));
}

fn room_list(config: &ViewConfig) -> String {
    if config.rooms.is_empty() {
        return "(any)".to_string();
    }
    config
        .rooms
        .iter()
        .map(|r| r.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}
