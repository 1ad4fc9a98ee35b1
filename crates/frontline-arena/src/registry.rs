//! The connection registry: live connections, their player bindings,
//! liveness flags, and the unicast/broadcast delivery primitives.
//!
//! Delivery is an enqueue onto a per-connection unbounded channel; a
//! writer task owned by the server drains it onto the socket. Peers can
//! disconnect between iteration and send, so every send failure here is
//! deliberately swallowed — the periodic sync broadcast repairs anything
//! a lost frame left stale.

use std::collections::HashMap;

use frontline_protocol::{Codec, JsonCodec, PlayerId, ServerMessage};
use rand::Rng;
use rand::distr::Alphanumeric;
use tokio::sync::mpsc;

/// An item queued for a connection's writer task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outbound {
    /// A serialized protocol message to deliver as a text frame.
    Frame(String),
    /// A liveness probe (WebSocket ping).
    Probe,
    /// Close the socket.
    Close,
}

/// Channel sender for delivering outbound items to one connection.
pub type OutboundSender = mpsc::UnboundedSender<Outbound>;

/// Lifecycle phase of a connection's player binding.
///
/// `Unjoined` connections receive broadcasts and may `ping`, but no
/// gameplay message is accepted from them and no player record exists.
/// The terminal `Disconnected` state is represented by removal from the
/// registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnPhase {
    Unjoined,
    Joined,
}

struct Entry {
    sender: OutboundSender,
    alive: bool,
    phase: ConnPhase,
}

/// Tracks every live connection, keyed by the player identifier bound to
/// it at registration.
pub struct ConnectionRegistry {
    entries: HashMap<PlayerId, Entry>,
    codec: JsonCodec,
    next_seq: u64,
}

impl ConnectionRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            codec: JsonCodec,
            next_seq: 1,
        }
    }

    /// Binds a new connection and returns its freshly allocated player
    /// identifier.
    ///
    /// Identifiers carry a monotonic sequence number, so they cannot
    /// collide within one arena; the random suffix only keeps them
    /// opaque across restarts.
    pub fn register(&mut self, sender: OutboundSender) -> PlayerId {
        let seq = self.next_seq;
        self.next_seq += 1;
        let suffix: String = rand::rng()
            .sample_iter(Alphanumeric)
            .take(4)
            .map(char::from)
            .collect();
        let id = PlayerId(format!("p_{seq:x}{suffix}"));

        self.entries.insert(
            id.clone(),
            Entry { sender, alive: true, phase: ConnPhase::Unjoined },
        );
        id
    }

    /// Marks a connection's binding as joined.
    pub fn set_joined(&mut self, id: &PlayerId) {
        if let Some(entry) = self.entries.get_mut(id) {
            entry.phase = ConnPhase::Joined;
        }
    }

    /// Whether the connection exists and has completed a join.
    pub fn is_joined(&self, id: &PlayerId) -> bool {
        matches!(
            self.entries.get(id),
            Some(Entry { phase: ConnPhase::Joined, .. })
        )
    }

    /// Delivers a message to the single connection bound to `id`.
    /// Silent no-op if the connection is gone.
    pub fn unicast(&self, id: &PlayerId, msg: &ServerMessage) {
        let Some(entry) = self.entries.get(id) else { return };
        match self.codec.encode(msg) {
            Ok(text) => {
                let _ = entry.sender.send(Outbound::Frame(text));
            }
            Err(e) => tracing::error!(%id, error = %e, "failed to encode unicast"),
        }
    }

    /// Delivers a message to every connection except `exclude`.
    /// Returns the number of successful deliveries.
    pub fn broadcast(
        &self,
        msg: &ServerMessage,
        exclude: Option<&PlayerId>,
    ) -> usize {
        let text = match self.codec.encode(msg) {
            Ok(text) => text,
            Err(e) => {
                tracing::error!(error = %e, "failed to encode broadcast");
                return 0;
            }
        };

        let mut sent = 0;
        for (id, entry) in &self.entries {
            if exclude.is_some_and(|ex| ex == id) {
                continue;
            }
            if entry.sender.send(Outbound::Frame(text.clone())).is_ok() {
                sent += 1;
            }
        }
        sent
    }

    /// Delivers a message to every connection.
    pub fn broadcast_all(&self, msg: &ServerMessage) -> usize {
        self.broadcast(msg, None)
    }

    /// Raises a connection's liveness flag (a probe was answered).
    pub fn mark_alive(&mut self, id: &PlayerId) {
        if let Some(entry) = self.entries.get_mut(id) {
            entry.alive = true;
        }
    }

    /// Lowers a connection's liveness flag ahead of a probe.
    pub fn mark_dead(&mut self, id: &PlayerId) {
        if let Some(entry) = self.entries.get_mut(id) {
            entry.alive = false;
        }
    }

    /// Whether the connection's liveness flag is currently raised.
    pub fn is_alive(&self, id: &PlayerId) -> bool {
        self.entries.get(id).is_some_and(|e| e.alive)
    }

    /// Enqueues a liveness probe for the connection.
    pub fn probe(&self, id: &PlayerId) {
        if let Some(entry) = self.entries.get(id) {
            let _ = entry.sender.send(Outbound::Probe);
        }
    }

    /// Forcibly closes and unbinds a connection. Returns `false` if it
    /// was already gone.
    pub fn evict(&mut self, id: &PlayerId) -> bool {
        match self.entries.remove(id) {
            Some(entry) => {
                let _ = entry.sender.send(Outbound::Close);
                true
            }
            None => false,
        }
    }

    /// Unbinds a connection without sending anything (the socket is
    /// already closed). Returns `false` if it was already gone.
    pub fn remove(&mut self, id: &PlayerId) -> bool {
        self.entries.remove(id).is_some()
    }

    /// Whether a binding exists for `id`.
    pub fn contains(&self, id: &PlayerId) -> bool {
        self.entries.contains_key(id)
    }

    /// Number of live connections.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry has no connections.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// A snapshot of all bound player identifiers.
    pub fn ids(&self) -> Vec<PlayerId> {
        self.entries.keys().cloned().collect()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
