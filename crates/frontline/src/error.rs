//! Unified error type for the Frontline server.

use frontline_arena::ArenaError;
use frontline_protocol::ProtocolError;
use frontline_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// When using the `frontline` meta-crate, you deal with this single
/// error type instead of importing errors from each sub-crate.
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum FrontlineError {
    /// A transport-level error (bind, accept, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, invalid message).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// An arena-level error (the actor is gone).
    #[error(transparent)]
    Arena(#[from] ArenaError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_transport_error() {
        let err = TransportError::ConnectionClosed("gone".into());
        let top: FrontlineError = err.into();
        assert!(matches!(top, FrontlineError::Transport(_)));
        assert!(top.to_string().contains("gone"));
    }

    #[test]
    fn test_from_protocol_error() {
        let err = ProtocolError::InvalidMessage("bad".into());
        let top: FrontlineError = err.into();
        assert!(matches!(top, FrontlineError::Protocol(_)));
    }

    #[test]
    fn test_from_arena_error() {
        let top: FrontlineError = ArenaError::Unavailable.into();
        assert!(matches!(top, FrontlineError::Arena(_)));
    }
}
