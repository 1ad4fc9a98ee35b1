//! Per-connection handler: binding, message routing, and cleanup.
//!
//! Each accepted connection gets one handler task. The flow is:
//!   1. Register the connection with the arena → get a player id
//!   2. Spawn a writer task that drains the arena's outbound queue
//!   3. Loop: receive frames → decode → forward to the arena
//!   4. On close (or error), the drop guard reports the disconnect
//!
//! The arena never sees a socket; the handler translates both ways.

use std::sync::Arc;

use frontline_arena::{ArenaHandle, Outbound};
use frontline_protocol::{JsonCodec, PlayerId};
use frontline_transport::{Connection, Inbound, WebSocketConnection};
use tokio::sync::mpsc;

use crate::FrontlineError;

/// Drop guard that reports the disconnect when the handler exits.
///
/// This ensures cleanup happens even if the handler panics. Since `Drop`
/// is synchronous, it spawns a fire-and-forget task for the async send.
struct ConnectionGuard {
    player_id: PlayerId,
    arena: ArenaHandle,
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        let player_id = self.player_id.clone();
        let arena = self.arena.clone();
        tokio::spawn(async move {
            let _ = arena.closed(player_id).await;
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection(
    conn: WebSocketConnection,
    arena: ArenaHandle,
) -> Result<(), FrontlineError> {
    let conn_id = conn.id();

    let (tx, mut rx) = mpsc::unbounded_channel();
    let player_id = arena.open(tx).await?;
    tracing::debug!(%conn_id, player = %player_id, "connection bound");

    let _guard = ConnectionGuard {
        player_id: player_id.clone(),
        arena: arena.clone(),
    };

    // Writer task: drains the arena's outbound queue onto the socket.
    // It ends when the arena drops the sender (disconnect or eviction)
    // or the socket stops accepting writes.
    let conn = Arc::new(conn);
    let writer_conn = Arc::clone(&conn);
    let writer_player = player_id.clone();
    tokio::spawn(async move {
        while let Some(item) = rx.recv().await {
            let result = match item {
                Outbound::Frame(text) => writer_conn.send_text(&text).await,
                Outbound::Probe => writer_conn.ping().await,
                Outbound::Close => {
                    let _ = writer_conn.close().await;
                    break;
                }
            };
            if let Err(e) = result {
                tracing::debug!(player = %writer_player, error = %e, "write failed");
                break;
            }
        }
    });

    // Reader loop: every decoded message goes to the arena; malformed or
    // unrecognized frames are logged and skipped, never fatal.
    let codec = JsonCodec;
    loop {
        match conn.recv().await {
            Ok(Some(Inbound::Text(text))) => match codec.decode_client(&text) {
                Ok(Some(msg)) => {
                    arena.message(player_id.clone(), msg).await?;
                }
                Ok(None) => {
                    tracing::debug!(player = %player_id, "unrecognized message type, ignoring");
                }
                Err(e) => {
                    tracing::debug!(player = %player_id, error = %e, "malformed frame, ignoring");
                }
            },
            Ok(Some(Inbound::Pong)) => {
                arena.pong(player_id.clone()).await?;
            }
            Ok(None) => {
                tracing::debug!(player = %player_id, "connection closed");
                break;
            }
            Err(e) => {
                tracing::debug!(player = %player_id, error = %e, "recv error");
                break;
            }
        }
    }

    // _guard drops here → the arena hears about the disconnect.
    Ok(())
}
