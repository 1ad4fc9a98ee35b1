//! Arena configuration.

use std::time::Duration;

/// Configuration for an arena instance.
///
/// Defaults match the deployed game. Tests shrink or stretch the timer
/// periods; everything else rarely changes.
#[derive(Debug, Clone)]
pub struct ArenaConfig {
    /// Period of the connection-liveness sweep. A connection that fails
    /// to answer a probe within one full period is evicted on the next,
    /// so a half-open socket survives at most two periods.
    pub heartbeat_period: Duration,

    /// Period of the full-roster `sync` broadcast.
    pub sync_period: Duration,

    /// Delay between a death and the victim's respawn.
    pub respawn_delay: Duration,

    /// Spawn positions are rolled uniformly in
    /// `[-spawn_half_extent, spawn_half_extent]` on x and z.
    pub spawn_half_extent: f32,

    /// Fixed spawn height (y).
    pub spawn_height: f32,

    /// Health assigned on join and respawn.
    pub full_health: i32,

    /// Upper clamp on any single hit's damage.
    pub max_damage: i32,

    /// Display names are truncated to this many characters.
    pub max_name_len: usize,

    /// Chat messages are truncated to this many characters.
    pub max_chat_len: usize,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            heartbeat_period: Duration::from_millis(30_000),
            sync_period: Duration::from_millis(5_000),
            respawn_delay: Duration::from_millis(3_000),
            spawn_half_extent: 25.0,
            spawn_height: 2.0,
            full_health: 100,
            max_damage: 100,
            max_name_len: 20,
            max_chat_len: 200,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timer_periods() {
        let config = ArenaConfig::default();
        assert_eq!(config.heartbeat_period, Duration::from_secs(30));
        assert_eq!(config.sync_period, Duration::from_secs(5));
        assert_eq!(config.respawn_delay, Duration::from_secs(3));
    }

    #[test]
    fn test_default_world_and_limits() {
        let config = ArenaConfig::default();
        assert_eq!(config.spawn_half_extent, 25.0);
        assert_eq!(config.spawn_height, 2.0);
        assert_eq!(config.full_health, 100);
        assert_eq!(config.max_damage, 100);
        assert_eq!(config.max_name_len, 20);
        assert_eq!(config.max_chat_len, 200);
    }
}
