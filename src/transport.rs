//! Newline-delimited JSON transport to the room server
//!
//! One JSON object per line in each direction. Inbound lines decode to
//! [`ServerEvent`]s for the session driver; outbound [`ClientRequest`]s from
//! the view are encoded and written as they arrive.

use futures::{SinkExt, StreamExt};
use taskroom_core::{ClientRequest, RoomError, RoomResult, ServerEvent};
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::sync::mpsc;
use tokio_util::codec::{Framed, LinesCodec};
use tracing::{debug, warn};

/// Longest line accepted from the server
pub const MAX_LINE_LENGTH: usize = 1024 * 1024;

/// Pump events in and requests out until either side closes
///
/// Returns `Ok(())` when the server ends the stream or the event receiver
/// goes away. Undecodable lines are logged and skipped.
pub async fn pump<T>(
    io: T,
    events: mpsc::Sender<ServerEvent>,
    mut outbound: mpsc::UnboundedReceiver<ClientRequest>,
) -> RoomResult<()>
where
    T: AsyncRead + AsyncWrite + Unpin,
{
    let framed = Framed::new(io, LinesCodec::new_with_max_length(MAX_LINE_LENGTH));
    let (mut sink, mut stream) = framed.split();
    let mut outbound_open = true;

    loop {
        tokio::select! {
            line = stream.next() => match line {
                Some(Ok(line)) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    match ServerEvent::decode(&line) {
                        Ok(event) => {
                            debug!(event = event.name(), "Received event");
                            if events.send(event).await.is_err() {
                                debug!("Event receiver dropped, closing transport");
                                return Ok(());
                            }
                        }
                        Err(e) => warn!(error = %e, "Skipping undecodable server line"),
                    }
                }
                Some(Err(e)) => return Err(RoomError::Transport(e.to_string())),
                None => {
                    debug!("Server closed the connection");
                    return Ok(());
                }
            },
            request = outbound.recv(), if outbound_open => match request {
                Some(request) => {
                    debug!(request = request.name(), "Sending request");
                    let line = request.encode()?;
                    sink.send(line)
                        .await
                        .map_err(|e| RoomError::Transport(e.to_string()))?;
                }
                None => outbound_open = false,
            },
        }
    }
}
