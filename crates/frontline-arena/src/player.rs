//! Player state: the authoritative server-side record of one combatant.

use frontline_protocol::{PlayerId, PlayerSnapshot};
use rand::Rng;
use tokio::time::Instant;

use crate::ArenaConfig;

/// One connected combatant's authoritative state.
///
/// Owned exclusively by the arena's player store. `health` may go
/// transiently negative on a killing blow; `<= 0` means dead until the
/// scheduled respawn resets it.
#[derive(Debug, Clone)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub rot_y: f32,
    pub health: i32,
    pub kills: u32,
    pub deaths: u32,
    /// When the last accepted shot was fired. `None` until the first
    /// shot, which is therefore never rate-limited.
    pub last_shot: Option<Instant>,
}

impl Player {
    /// Creates a freshly spawned player at a random position.
    pub fn spawn(id: PlayerId, name: Option<String>, config: &ArenaConfig) -> Self {
        let (x, y, z) = spawn_point(config);
        Self {
            id,
            name: sanitize_name(name, config.max_name_len),
            x,
            y,
            z,
            rot_y: 0.0,
            health: config.full_health,
            kills: 0,
            deaths: 0,
            last_shot: None,
        }
    }

    /// Whether this player is currently dead (awaiting respawn).
    pub fn is_dead(&self) -> bool {
        self.health <= 0
    }

    /// Resets health and rolls a new spawn position.
    pub fn respawn(&mut self, config: &ArenaConfig) {
        let (x, y, z) = spawn_point(config);
        self.health = config.full_health;
        self.x = x;
        self.y = y;
        self.z = z;
    }

    /// The player's state as sent in `welcome` and `sync` payloads.
    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            id: self.id.clone(),
            name: self.name.clone(),
            x: self.x,
            y: self.y,
            z: self.z,
            rot_y: self.rot_y,
            health: self.health,
            kills: self.kills,
            deaths: self.deaths,
        }
    }
}

/// Rolls a spawn point: uniform on x/z within the configured extent,
/// fixed height on y.
pub(crate) fn spawn_point(config: &ArenaConfig) -> (f32, f32, f32) {
    let mut rng = rand::rng();
    let e = config.spawn_half_extent;
    (
        rng.random_range(-e..=e),
        config.spawn_height,
        rng.random_range(-e..=e),
    )
}

/// Applies the display-name rules: absent or empty becomes `"Player"`,
/// everything is truncated to `max_len` characters.
fn sanitize_name(name: Option<String>, max_len: usize) -> String {
    match name {
        Some(n) if !n.is_empty() => truncate_chars(&n, max_len),
        _ => "Player".to_string(),
    }
}

/// Truncates to at most `max` characters (not bytes — `String::truncate`
/// panics on a non-char boundary).
pub(crate) fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}
