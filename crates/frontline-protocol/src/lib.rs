//! Wire protocol for Frontline.
//!
//! This crate defines the "language" that game clients and the server
//! speak:
//!
//! - **Types** ([`ClientMessage`], [`ServerMessage`], [`PlayerSnapshot`],
//!   [`PlayerId`], [`Vec3`]) — the structures that travel on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]) — how those messages are
//!   converted to/from text frames.
//! - **Errors** ([`ProtocolError`]) — what can go wrong during
//!   encoding/decoding.
//!
//! # Architecture
//!
//! The protocol layer sits between transport (raw frames) and the arena
//! (game state). It doesn't know about connections or players — it only
//! knows how to serialize and deserialize messages.
//!
//! ```text
//! Transport (text frames) → Protocol (ClientMessage) → Arena (game state)
//! ```
//!
//! # Wire format
//!
//! Every message is a flat JSON object with a `"type"` tag and camelCase
//! field names, e.g. `{"type":"position","x":1.0,"y":2.0,"z":3.0,"rotY":0.5}`.
//! This is the format browser clients produce with a bare
//! `JSON.stringify`, so there is no envelope layer.

mod codec;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use error::ProtocolError;
pub use types::{
    ClientMessage, PlayerId, PlayerSnapshot, ServerMessage, Vec3,
};
