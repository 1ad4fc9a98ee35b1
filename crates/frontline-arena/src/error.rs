//! Error types for the arena layer.

/// Errors that can occur when talking to an arena.
#[derive(Debug, thiserror::Error)]
pub enum ArenaError {
    /// The arena's command channel is closed — the actor has stopped.
    #[error("arena is unavailable")]
    Unavailable,
}
