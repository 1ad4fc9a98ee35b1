//! The Frontline arena: the session/state synchronization engine.
//!
//! The arena runs as an isolated Tokio task (actor model) that owns the
//! player store and the connection registry. Everything that mutates
//! shared gameplay state flows through its command channel, so handlers
//! execute one at a time — no locks, no data races, and the only deferred
//! action (a respawn timer) re-validates the world before touching it.
//!
//! # Key types
//!
//! - [`spawn_arena`] / [`ArenaHandle`] — start an arena and talk to it
//! - [`Command`] — what the outside world can ask the arena to do
//! - [`ConnectionRegistry`] — live connections, liveness flags, delivery
//! - [`Player`] — one combatant's authoritative state
//! - [`ArenaConfig`] — timers, world bounds, and protocol limits

mod arena;
mod config;
mod error;
mod player;
mod registry;
mod weapons;

pub use arena::{ArenaHandle, ArenaStats, Command, spawn_arena};
pub use config::ArenaConfig;
pub use error::ArenaError;
pub use player::Player;
pub use registry::{ConnPhase, ConnectionRegistry, Outbound, OutboundSender};
pub use weapons::{Weapon, lookup_weapon};
