//! Integration tests for the Frontline server over real WebSocket
//! connections.
//!
//! Clients send raw JSON text frames, exactly like the browser client,
//! so these tests also pin the wire format end to end.

use std::time::Duration;

use frontline::prelude::*;
use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;

// =========================================================================
// Helpers
// =========================================================================

type ClientWs = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

/// Starts a server on a random port and returns the address.
async fn start_server(config: ArenaConfig) -> String {
    let server = FrontlineServerBuilder::new()
        .bind("127.0.0.1:0")
        .arena_config(config)
        .build()
        .await
        .expect("server should build");

    let addr = server
        .local_addr()
        .expect("should have local addr")
        .to_string();

    tokio::spawn(async move {
        let _ = server.run().await;
    });

    // Give the accept loop a moment to start.
    tokio::time::sleep(Duration::from_millis(10)).await;
    addr
}

async fn connect(addr: &str) -> ClientWs {
    let (ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
        .await
        .expect("should connect");
    ws
}

async fn send_json(ws: &mut ClientWs, json: &str) {
    ws.send(Message::Text(json.into())).await.expect("send");
}

/// Receives the next protocol message, skipping control frames.
async fn recv_msg(ws: &mut ClientWs) -> ServerMessage {
    loop {
        let msg = tokio::time::timeout(Duration::from_secs(2), ws.next())
            .await
            .expect("timed out waiting for a frame")
            .expect("stream ended")
            .expect("ws error");
        match msg {
            Message::Text(text) => {
                return serde_json::from_str(text.as_str()).expect("valid server JSON");
            }
            Message::Ping(_) | Message::Pong(_) => continue,
            other => panic!("unexpected frame: {other:?}"),
        }
    }
}

/// Receives messages until one matches, panicking after a few misses.
async fn recv_until(
    ws: &mut ClientWs,
    mut pred: impl FnMut(&ServerMessage) -> bool,
) -> ServerMessage {
    for _ in 0..20 {
        let msg = recv_msg(ws).await;
        if pred(&msg) {
            return msg;
        }
    }
    panic!("expected message never arrived");
}

/// Connects and joins, returning the socket and assigned id.
async fn join(addr: &str, name: &str) -> (ClientWs, PlayerId) {
    let mut ws = connect(addr).await;
    send_json(&mut ws, &format!(r#"{{"type":"join","name":"{name}"}}"#)).await;
    let msg = recv_until(&mut ws, |m| matches!(m, ServerMessage::Welcome { .. })).await;
    let ServerMessage::Welcome { id, .. } = msg else { unreachable!() };
    (ws, id)
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_join_receives_welcome_with_empty_roster() {
    let addr = start_server(ArenaConfig::default()).await;
    let mut ws = connect(&addr).await;

    send_json(&mut ws, r#"{"type":"join","name":"Alice"}"#).await;

    match recv_msg(&mut ws).await {
        ServerMessage::Welcome { id, players } => {
            assert!(id.as_str().starts_with("p_"));
            assert!(players.is_empty());
        }
        other => panic!("expected welcome, got {other:?}"),
    }
}

#[tokio::test]
async fn test_join_without_name_defaults_to_player() {
    let addr = start_server(ArenaConfig::default()).await;

    let mut nameless = connect(&addr).await;
    send_json(&mut nameless, r#"{"type":"join"}"#).await;
    let msg =
        recv_until(&mut nameless, |m| matches!(m, ServerMessage::Welcome { .. })).await;
    assert!(matches!(msg, ServerMessage::Welcome { .. }));

    // The default name shows up in the roster the next joiner sees.
    let mut ws = connect(&addr).await;
    send_json(&mut ws, r#"{"type":"join","name":"Dave"}"#).await;
    let msg = recv_until(&mut ws, |m| matches!(m, ServerMessage::Welcome { .. })).await;
    let ServerMessage::Welcome { players, .. } = msg else { unreachable!() };
    assert_eq!(players.len(), 1);
    assert_eq!(players[0].name, "Player");
}

#[tokio::test]
async fn test_second_join_visible_to_both_sides() {
    let addr = start_server(ArenaConfig::default()).await;
    let (mut alice, alice_id) = join(&addr, "Alice").await;

    let mut bob = connect(&addr).await;
    send_json(&mut bob, r#"{"type":"join","name":"Bob"}"#).await;

    match recv_msg(&mut bob).await {
        ServerMessage::Welcome { players, .. } => {
            assert_eq!(players.len(), 1);
            assert_eq!(players[0].id, alice_id);
            assert_eq!(players[0].name, "Alice");
            assert_eq!(players[0].health, 100);
        }
        other => panic!("expected welcome, got {other:?}"),
    }

    match recv_msg(&mut alice).await {
        ServerMessage::PlayerJoin { name, x, y, z, .. } => {
            assert_eq!(name, "Bob");
            assert!((-25.0..=25.0).contains(&x));
            assert_eq!(y, 2.0);
            assert!((-25.0..=25.0).contains(&z));
        }
        other => panic!("expected playerJoin, got {other:?}"),
    }
}

#[tokio::test]
async fn test_position_relayed_with_sender_id() {
    let addr = start_server(ArenaConfig::default()).await;
    let (mut alice, alice_id) = join(&addr, "Alice").await;
    let (mut bob, _) = join(&addr, "Bob").await;
    // Alice still has Bob's playerJoin queued.
    recv_until(&mut alice, |m| matches!(m, ServerMessage::PlayerJoin { .. })).await;

    send_json(
        &mut alice,
        r#"{"type":"position","x":5.0,"y":2.0,"z":-3.5,"rotY":1.25}"#,
    )
    .await;

    match recv_msg(&mut bob).await {
        ServerMessage::Position { id, x, y, z, rot_y } => {
            assert_eq!(id, alice_id);
            assert_eq!((x, y, z, rot_y), (5.0, 2.0, -3.5, 1.25));
        }
        other => panic!("expected position, got {other:?}"),
    }
}

#[tokio::test]
async fn test_chat_relayed_to_other_players() {
    let addr = start_server(ArenaConfig::default()).await;
    let (mut alice, _) = join(&addr, "Alice").await;
    let (mut bob, _) = join(&addr, "Bob").await;

    send_json(&mut alice, r#"{"type":"chat","message":"gg"}"#).await;

    let msg = recv_until(&mut bob, |m| matches!(m, ServerMessage::Chat { .. })).await;
    assert_eq!(
        msg,
        ServerMessage::Chat { name: "Alice".into(), message: "gg".into() }
    );
}

#[tokio::test]
async fn test_ping_answered_without_join() {
    let addr = start_server(ArenaConfig::default()).await;
    let mut ws = connect(&addr).await;

    send_json(&mut ws, r#"{"type":"ping","time":1723456789}"#).await;

    assert_eq!(recv_msg(&mut ws).await, ServerMessage::Pong { time: 1_723_456_789 });
}

#[tokio::test]
async fn test_malformed_and_unknown_frames_are_skipped() {
    let addr = start_server(ArenaConfig::default()).await;
    let mut ws = connect(&addr).await;

    send_json(&mut ws, "{not json at all").await;
    send_json(&mut ws, r#"{"type":"teleport","x":0}"#).await;
    send_json(&mut ws, r#"{"type":"ping","time":7}"#).await;

    // The bad frames were dropped and the connection still works.
    assert_eq!(recv_msg(&mut ws).await, ServerMessage::Pong { time: 7 });
}

#[tokio::test]
async fn test_hit_and_kill_flow() {
    let addr = start_server(ArenaConfig::default()).await;
    let (mut alice, alice_id) = join(&addr, "Alice").await;
    let (mut bob, bob_id) = join(&addr, "Bob").await;

    send_json(
        &mut alice,
        &format!(r#"{{"type":"hit","target":"{bob_id}","damage":150,"weapon":"awp"}}"#),
    )
    .await;

    let hit = recv_until(&mut bob, |m| matches!(m, ServerMessage::Hit { .. })).await;
    assert_eq!(
        hit,
        ServerMessage::Hit {
            target: "local".into(),
            damage: 100,
            attacker: "Alice".into(),
        }
    );

    let expected_kill = ServerMessage::Kill {
        killer: "Alice".into(),
        killer_id: alice_id,
        victim: "Bob".into(),
        victim_id: bob_id,
        weapon: "awp".into(),
    };
    let kill_a = recv_until(&mut alice, |m| matches!(m, ServerMessage::Kill { .. })).await;
    let kill_b = recv_until(&mut bob, |m| matches!(m, ServerMessage::Kill { .. })).await;
    assert_eq!(kill_a, expected_kill);
    assert_eq!(kill_b, expected_kill);
}

#[tokio::test]
async fn test_victim_respawns_after_configured_delay() {
    // Short respawn so the test doesn't sit on a 3s wall-clock wait.
    let config = ArenaConfig {
        respawn_delay: Duration::from_millis(100),
        ..ArenaConfig::default()
    };
    let addr = start_server(config).await;
    let (mut alice, _) = join(&addr, "Alice").await;
    let (mut bob, bob_id) = join(&addr, "Bob").await;

    send_json(
        &mut alice,
        &format!(r#"{{"type":"hit","target":"{bob_id}","damage":100}}"#),
    )
    .await;

    let msg = recv_until(&mut bob, |m| matches!(m, ServerMessage::Respawn { .. })).await;
    let ServerMessage::Respawn { x, y, z } = msg else { unreachable!() };
    assert!((-25.0..=25.0).contains(&x));
    assert_eq!(y, 2.0);
    assert!((-25.0..=25.0).contains(&z));
}

#[tokio::test]
async fn test_disconnect_broadcasts_player_leave() {
    let addr = start_server(ArenaConfig::default()).await;
    let (mut alice, _) = join(&addr, "Alice").await;
    let (mut bob, bob_id) = join(&addr, "Bob").await;

    bob.close(None).await.expect("close");

    let msg =
        recv_until(&mut alice, |m| matches!(m, ServerMessage::PlayerLeave { .. })).await;
    assert_eq!(msg, ServerMessage::PlayerLeave { id: bob_id, name: "Bob".into() });
}

#[tokio::test]
async fn test_sync_broadcast_carries_full_roster() {
    let config = ArenaConfig {
        sync_period: Duration::from_millis(100),
        ..ArenaConfig::default()
    };
    let addr = start_server(config).await;
    let (mut alice, alice_id) = join(&addr, "Alice").await;
    let (_bob, bob_id) = join(&addr, "Bob").await;

    let msg = recv_until(&mut alice, |m| matches!(m, ServerMessage::Sync { .. })).await;
    let ServerMessage::Sync { players } = msg else { unreachable!() };
    assert_eq!(players.len(), 2);
    assert!(players.iter().any(|p| p.id == alice_id));
    assert!(players.iter().any(|p| p.id == bob_id));
}
