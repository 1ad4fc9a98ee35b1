//! # Frontline
//!
//! Real-time WebSocket combat server: message relay, authoritative
//! player state, and connection liveness for browser FPS clients.
//!
//! The server is server-authoritative where it matters (health, kills,
//! respawns, fire rate) and a plain relay where it doesn't (positions,
//! bullet tracers, chat). All gameplay state lives in a single arena
//! actor; connection handlers only translate between sockets and the
//! arena's command channel.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use frontline::prelude::*;
//!
//! # async fn run() -> Result<(), FrontlineError> {
//! let server = FrontlineServer::builder()
//!     .bind("0.0.0.0:8080")
//!     .build()
//!     .await?;
//! server.run().await
//! # }
//! ```

mod error;
mod handler;
mod server;

pub use error::FrontlineError;
pub use server::{FrontlineServer, FrontlineServerBuilder};

/// Commonly used types, re-exported for convenience.
pub mod prelude {
    pub use crate::{FrontlineError, FrontlineServer, FrontlineServerBuilder};
    pub use frontline_arena::{ArenaConfig, ArenaHandle, ArenaStats};
    pub use frontline_protocol::{
        ClientMessage, PlayerId, PlayerSnapshot, ServerMessage, Vec3,
    };
}
