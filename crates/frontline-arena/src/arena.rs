//! Arena actor: an isolated Tokio task that owns the combat state.
//!
//! The arena runs in its own task, communicating with the outside world
//! through an mpsc channel. This is the "actor model" — no shared
//! mutable state, just message passing. Connection handlers translate
//! socket events into [`Command`]s; the actor applies them one at a
//! time, so every gameplay rule reads and writes the player store
//! without locks.
//!
//! Two timers live inside the actor's select loop: the heartbeat sweep
//! (probe-then-evict liveness) and the full-roster sync broadcast.
//! Respawns are the one deferred action — a small spawned task sleeps
//! out the delay and posts a [`Command::Respawn`] back, and the handler
//! re-validates that the player is still present and still dead before
//! touching anything.

use std::collections::HashMap;

use frontline_protocol::{ClientMessage, PlayerId, PlayerSnapshot, ServerMessage};
use tokio::sync::{mpsc, oneshot};
use tokio::time::{Instant, interval_at};

use crate::player::truncate_chars;
use crate::{ArenaConfig, ArenaError, ConnectionRegistry, OutboundSender, Player, lookup_weapon};

/// Fraction of a weapon's fire interval a shot may arrive early and
/// still be accepted. Absorbs client-side timer jitter without letting
/// a modified client meaningfully exceed the fire rate.
const FIRE_GRACE: f64 = 0.8;

/// Commands sent to an arena actor through its channel.
///
/// Each variant represents an operation the outside world can request.
/// The `oneshot::Sender` in some variants is a reply channel — the
/// caller sends a command and waits for the response on it.
pub enum Command {
    /// A new connection was accepted. Replies with the player id bound
    /// to it.
    Open {
        sender: OutboundSender,
        reply: oneshot::Sender<PlayerId>,
    },

    /// A decoded protocol message arrived from a connection.
    Message {
        player: PlayerId,
        msg: ClientMessage,
    },

    /// The connection answered a liveness probe.
    Pong { player: PlayerId },

    /// The connection's socket closed (or its reader failed).
    Closed { player: PlayerId },

    /// A respawn timer elapsed for a previously killed player.
    Respawn { player: PlayerId },

    /// Request the current arena counters.
    Stats {
        reply: oneshot::Sender<ArenaStats>,
    },

    /// Shut down the arena.
    Shutdown,
}

/// A snapshot of arena counters (not the game state itself).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArenaStats {
    /// Number of live connections, joined or not.
    pub connections: usize,
    /// Number of joined players.
    pub players: usize,
}

/// Handle to a running arena actor. Used to send commands to it.
///
/// Cheap to clone — it's just an `mpsc::Sender` wrapper. The server
/// holds one and hands a clone to every connection handler.
#[derive(Clone)]
pub struct ArenaHandle {
    sender: mpsc::Sender<Command>,
}

impl ArenaHandle {
    /// Registers a new connection and returns the player id bound to it.
    pub async fn open(&self, sender: OutboundSender) -> Result<PlayerId, ArenaError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(Command::Open { sender, reply: reply_tx })
            .await
            .map_err(|_| ArenaError::Unavailable)?;
        reply_rx.await.map_err(|_| ArenaError::Unavailable)
    }

    /// Delivers a protocol message from a connection (fire-and-forget).
    pub async fn message(&self, player: PlayerId, msg: ClientMessage) -> Result<(), ArenaError> {
        self.sender
            .send(Command::Message { player, msg })
            .await
            .map_err(|_| ArenaError::Unavailable)
    }

    /// Reports that a connection answered a liveness probe.
    pub async fn pong(&self, player: PlayerId) -> Result<(), ArenaError> {
        self.sender
            .send(Command::Pong { player })
            .await
            .map_err(|_| ArenaError::Unavailable)
    }

    /// Reports that a connection's socket closed.
    pub async fn closed(&self, player: PlayerId) -> Result<(), ArenaError> {
        self.sender
            .send(Command::Closed { player })
            .await
            .map_err(|_| ArenaError::Unavailable)
    }

    /// Requests the current arena counters.
    pub async fn stats(&self) -> Result<ArenaStats, ArenaError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(Command::Stats { reply: reply_tx })
            .await
            .map_err(|_| ArenaError::Unavailable)?;
        reply_rx.await.map_err(|_| ArenaError::Unavailable)
    }

    /// Tells the arena to shut down.
    pub async fn shutdown(&self) -> Result<(), ArenaError> {
        self.sender
            .send(Command::Shutdown)
            .await
            .map_err(|_| ArenaError::Unavailable)
    }
}

/// The internal arena actor state. Runs inside a Tokio task.
struct Arena {
    config: ArenaConfig,
    registry: ConnectionRegistry,
    players: HashMap<PlayerId, Player>,
    receiver: mpsc::Receiver<Command>,
    /// Clone handed to respawn timer tasks so they can post back.
    commands: mpsc::Sender<Command>,
}

impl Arena {
    /// Runs the actor loop, processing commands until shutdown.
    async fn run(mut self) {
        tracing::info!("arena started");

        // `interval` would fire immediately; both timers must wait a full
        // period before their first tick.
        let start = Instant::now();
        let mut heartbeat = interval_at(
            start + self.config.heartbeat_period,
            self.config.heartbeat_period,
        );
        let mut sync = interval_at(start + self.config.sync_period, self.config.sync_period);

        loop {
            tokio::select! {
                cmd = self.receiver.recv() => {
                    let Some(cmd) = cmd else { break };
                    match cmd {
                        Command::Open { sender, reply } => {
                            let id = self.registry.register(sender);
                            tracing::info!(%id, connections = self.registry.len(), "connection opened");
                            let _ = reply.send(id);
                        }
                        Command::Message { player, msg } => {
                            self.handle_message(player, msg);
                        }
                        Command::Pong { player } => {
                            self.registry.mark_alive(&player);
                        }
                        Command::Closed { player } => {
                            self.handle_closed(player);
                        }
                        Command::Respawn { player } => {
                            self.handle_respawn(player);
                        }
                        Command::Stats { reply } => {
                            let _ = reply.send(ArenaStats {
                                connections: self.registry.len(),
                                players: self.players.len(),
                            });
                        }
                        Command::Shutdown => {
                            tracing::info!("arena shutting down");
                            break;
                        }
                    }
                }
                _ = heartbeat.tick() => self.sweep_connections(),
                _ = sync.tick() => self.broadcast_sync(),
            }
        }

        tracing::info!("arena stopped");
    }

    fn handle_message(&mut self, player: PlayerId, msg: ClientMessage) {
        match msg {
            ClientMessage::Join { name } => self.handle_join(player, name),
            ClientMessage::Ping { time } => {
                // Latency probes are answered even before a join.
                self.registry.unicast(&player, &ServerMessage::Pong { time });
            }
            gameplay => {
                if !self.registry.is_joined(&player) {
                    tracing::debug!(%player, "gameplay message before join, ignoring");
                    return;
                }
                match gameplay {
                    ClientMessage::Position { x, y, z, rot_y } => {
                        self.handle_position(player, x, y, z, rot_y);
                    }
                    ClientMessage::Bullet { origin, direction, weapon } => {
                        self.handle_bullet(player, origin, direction, weapon);
                    }
                    ClientMessage::Hit { target, damage, weapon } => {
                        self.handle_hit(player, target, damage, weapon);
                    }
                    ClientMessage::Chat { message } => {
                        self.handle_chat(player, message);
                    }
                    ClientMessage::Join { .. } | ClientMessage::Ping { .. } => {}
                }
            }
        }
    }

    fn handle_join(&mut self, id: PlayerId, name: Option<String>) {
        if self.registry.is_joined(&id) {
            tracing::debug!(%id, "join from already-joined connection, ignoring");
            return;
        }

        // Roster before insertion: the welcome never lists the joiner.
        let roster: Vec<PlayerSnapshot> =
            self.players.values().map(Player::snapshot).collect();

        let player = Player::spawn(id.clone(), name, &self.config);
        let (name, x, y, z) = (player.name.clone(), player.x, player.y, player.z);
        self.players.insert(id.clone(), player);
        self.registry.set_joined(&id);

        tracing::info!(%id, %name, players = self.players.len(), "player joined");

        self.registry
            .unicast(&id, &ServerMessage::Welcome { id: id.clone(), players: roster });
        self.registry.broadcast(
            &ServerMessage::PlayerJoin { id: id.clone(), name, x, y, z },
            Some(&id),
        );
    }

    fn handle_position(&mut self, id: PlayerId, x: f32, y: f32, z: f32, rot_y: f32) {
        let Some(player) = self.players.get_mut(&id) else { return };
        player.x = x;
        player.y = y;
        player.z = z;
        player.rot_y = rot_y;

        self.registry.broadcast(
            &ServerMessage::Position { id: id.clone(), x, y, z, rot_y },
            Some(&id),
        );
    }

    fn handle_bullet(
        &mut self,
        id: PlayerId,
        origin: frontline_protocol::Vec3,
        direction: frontline_protocol::Vec3,
        weapon: Option<String>,
    ) {
        let Some(player) = self.players.get_mut(&id) else { return };
        let stats = lookup_weapon(weapon.as_deref());

        let now = Instant::now();
        if let Some(last) = player.last_shot {
            let min_gap = stats.fire_interval.mul_f64(FIRE_GRACE);
            if now.duration_since(last) < min_gap {
                tracing::debug!(%id, weapon = stats.name, "shot exceeds fire rate, dropping");
                return;
            }
        }
        player.last_shot = Some(now);

        self.registry.broadcast(
            &ServerMessage::Bullet {
                owner: id.clone(),
                origin,
                direction,
                weapon: stats.name.to_string(),
            },
            Some(&id),
        );
    }

    fn handle_hit(
        &mut self,
        attacker: PlayerId,
        target: PlayerId,
        damage: Option<i32>,
        weapon: Option<String>,
    ) {
        let Some(attacker_name) = self.players.get(&attacker).map(|p| p.name.clone()) else {
            return;
        };

        // Hits on the dead are dropped, so a player dies at most once per
        // life and at most one respawn timer is ever pending for them.
        let Some(victim) = self.players.get_mut(&target) else {
            tracing::debug!(%attacker, %target, "hit on unknown target, ignoring");
            return;
        };
        if victim.is_dead() {
            return;
        }

        let damage = damage.unwrap_or(25).clamp(0, self.config.max_damage);
        victim.health -= damage;
        let died = victim.is_dead();
        if died {
            victim.deaths += 1;
        }
        let victim_name = victim.name.clone();

        self.registry.unicast(
            &target,
            &ServerMessage::Hit {
                target: "local".to_string(),
                damage,
                attacker: attacker_name.clone(),
            },
        );

        if !died {
            return;
        }

        // Separate lookup: attacker and target may be the same player.
        if let Some(shooter) = self.players.get_mut(&attacker) {
            shooter.kills += 1;
        }

        let weapon = weapon.unwrap_or_else(|| "ak47".to_string());
        tracing::info!(
            killer = %attacker_name,
            victim = %victim_name,
            %weapon,
            "player killed"
        );

        self.registry.broadcast_all(&ServerMessage::Kill {
            killer: attacker_name,
            killer_id: attacker,
            victim: victim_name,
            victim_id: target.clone(),
            weapon,
        });

        let commands = self.commands.clone();
        let delay = self.config.respawn_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            // Arena gone means nothing left to respawn into.
            let _ = commands.send(Command::Respawn { player: target }).await;
        });
    }

    fn handle_chat(&mut self, id: PlayerId, message: String) {
        if message.is_empty() {
            return;
        }
        let Some(player) = self.players.get(&id) else { return };

        // The sender's client echoes locally, so they are excluded here.
        self.registry.broadcast(
            &ServerMessage::Chat {
                name: player.name.clone(),
                message: truncate_chars(&message, self.config.max_chat_len),
            },
            Some(&id),
        );
    }

    /// The timer may fire after the player disconnected (or the arena
    /// restarted them some other way), so presence and death are both
    /// re-checked here.
    fn handle_respawn(&mut self, id: PlayerId) {
        let Some(player) = self.players.get_mut(&id) else { return };
        if !player.is_dead() {
            return;
        }

        player.respawn(&self.config);
        let (x, y, z) = (player.x, player.y, player.z);

        tracing::debug!(%id, "player respawned");
        self.registry.unicast(&id, &ServerMessage::Respawn { x, y, z });
    }

    fn handle_closed(&mut self, id: PlayerId) {
        // Both the reader task and the eviction sweep can report the same
        // connection; only the first removal does any work.
        if !self.registry.remove(&id) {
            return;
        }

        if let Some(player) = self.players.remove(&id) {
            tracing::info!(%id, name = %player.name, players = self.players.len(), "player left");
            self.registry.broadcast_all(&ServerMessage::PlayerLeave {
                id,
                name: player.name,
            });
        }
    }

    /// Probe-then-evict liveness sweep. A connection that answered since
    /// the last sweep is probed again; one that didn't is evicted.
    fn sweep_connections(&mut self) {
        for id in self.registry.ids() {
            if self.registry.is_alive(&id) {
                self.registry.mark_dead(&id);
                self.registry.probe(&id);
            } else {
                tracing::warn!(%id, "connection missed heartbeat, evicting");
                self.registry.evict(&id);
                if let Some(player) = self.players.remove(&id) {
                    self.registry.broadcast_all(&ServerMessage::PlayerLeave {
                        id,
                        name: player.name,
                    });
                }
            }
        }
    }

    /// Full-roster reconciliation broadcast. Skipped while the arena is
    /// empty — there is nobody to reconcile.
    fn broadcast_sync(&self) {
        if self.players.is_empty() {
            return;
        }
        let players: Vec<PlayerSnapshot> =
            self.players.values().map(Player::snapshot).collect();
        self.registry.broadcast_all(&ServerMessage::Sync { players });
    }
}

/// Spawns a new arena actor task and returns a handle to communicate
/// with it.
pub fn spawn_arena(config: ArenaConfig) -> ArenaHandle {
    let (tx, rx) = mpsc::channel(256);

    let arena = Arena {
        config,
        registry: ConnectionRegistry::new(),
        players: HashMap::new(),
        receiver: rx,
        commands: tx.clone(),
    };

    tokio::spawn(arena.run());

    ArenaHandle { sender: tx }
}
