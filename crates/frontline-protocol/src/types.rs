//! Core protocol types for Frontline's wire format.
//!
//! Every type here is serialized with serde and travels on the wire as
//! JSON. The two big enums mirror the two directions of traffic:
//! [`ClientMessage`] (client → server) and [`ServerMessage`]
//! (server → client). Both use internally tagged serialization
//! (`#[serde(tag = "type")]`) with camelCase tags, so a position update
//! looks like:
//!
//! ```json
//! {"type":"position","id":"p_1abcd","x":1.0,"y":2.0,"z":3.0,"rotY":0.5}
//! ```

use serde::{Deserialize, Serialize};

use std::fmt;

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// A unique identifier for a player.
///
/// Newtype over an opaque string (e.g. `"p_1x4fq"`). The string is
/// generated by the connection registry at accept time and is stable for
/// the connection's lifetime. `#[serde(transparent)]` serializes it as a
/// plain JSON string, which is what clients expect in `id` fields.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub String);

impl PlayerId {
    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PlayerId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// Geometry
// ---------------------------------------------------------------------------

/// A world-space vector, used for bullet origins and directions.
///
/// Serialized as `{"x":..,"y":..,"z":..}`. The server never does math on
/// these — they are relayed between clients verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

// ---------------------------------------------------------------------------
// Player snapshot
// ---------------------------------------------------------------------------

/// One player's full visible state, as sent in `welcome` rosters and
/// periodic `sync` broadcasts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerSnapshot {
    pub id: PlayerId,
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    #[serde(rename = "rotY")]
    pub rot_y: f32,
    pub health: i32,
    pub kills: u32,
    pub deaths: u32,
}

// ---------------------------------------------------------------------------
// ClientMessage — client → server
// ---------------------------------------------------------------------------

/// Messages a client can send to the server.
///
/// Fields the original clients sometimes omit (`name`, `weapon`,
/// `damage`) are `Option` with `#[serde(default)]`; the arena supplies
/// the documented fallbacks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ClientMessage {
    /// Enter the game with a display name.
    Join {
        #[serde(default)]
        name: Option<String>,
    },

    /// Client-authoritative pose update.
    Position {
        x: f32,
        y: f32,
        z: f32,
        #[serde(rename = "rotY")]
        rot_y: f32,
    },

    /// A shot was fired. Relayed to other clients after fire-rate
    /// validation.
    Bullet {
        origin: Vec3,
        direction: Vec3,
        #[serde(default)]
        weapon: Option<String>,
    },

    /// The sender claims to have hit `target` for `damage`.
    Hit {
        target: PlayerId,
        #[serde(default)]
        damage: Option<i32>,
        #[serde(default)]
        weapon: Option<String>,
    },

    /// A chat line.
    Chat { message: String },

    /// Round-trip latency probe. Answered with a `pong` echoing `time`.
    Ping { time: u64 },
}

// ---------------------------------------------------------------------------
// ServerMessage — server → client
// ---------------------------------------------------------------------------

/// Messages the server sends to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ServerMessage {
    /// Sent to a player right after their `join`: their assigned id and
    /// the current roster (never includes the joining player itself).
    Welcome {
        id: PlayerId,
        players: Vec<PlayerSnapshot>,
    },

    /// Broadcast to everyone else when a player joins.
    PlayerJoin {
        id: PlayerId,
        name: String,
        x: f32,
        y: f32,
        z: f32,
    },

    /// Relayed pose update from another player.
    Position {
        id: PlayerId,
        x: f32,
        y: f32,
        z: f32,
        #[serde(rename = "rotY")]
        rot_y: f32,
    },

    /// Relayed shot from another player.
    Bullet {
        owner: PlayerId,
        origin: Vec3,
        direction: Vec3,
        weapon: String,
    },

    /// Unicast to the victim of a hit. `target` is always the literal
    /// string `"local"` — the receiving client applies the damage to its
    /// own player.
    Hit {
        target: String,
        damage: i32,
        attacker: String,
    },

    /// Broadcast to ALL connections when a player dies.
    Kill {
        killer: String,
        #[serde(rename = "killerId")]
        killer_id: PlayerId,
        victim: String,
        #[serde(rename = "victimId")]
        victim_id: PlayerId,
        weapon: String,
    },

    /// Relayed chat line.
    Chat { name: String, message: String },

    /// Echo of a client `ping`.
    Pong { time: u64 },

    /// Broadcast when a player disconnects.
    PlayerLeave { id: PlayerId, name: String },

    /// Unicast to a player when they respawn after death.
    Respawn { x: f32, y: f32, z: f32 },

    /// Periodic full-roster reconciliation broadcast.
    Sync { players: Vec<PlayerSnapshot> },
}

// =========================================================================
// Tests
// =========================================================================
