//! Codec trait and implementations for serializing/deserializing messages.
//!
//! A codec converts between Rust types and the text frames the transport
//! carries. The rest of the stack only depends on the [`Codec`] trait, so
//! a binary codec could be swapped in later without touching the arena.

use serde::{Serialize, de::DeserializeOwned};

use crate::ProtocolError;

/// Encodes Rust types to text frames and decodes frames back.
pub trait Codec: Send + Sync + 'static {
    /// Serializes a value into a text frame.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Encode`] if serialization fails.
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, ProtocolError>;

    /// Deserializes a text frame back into a value.
    ///
    /// # Errors
    /// Returns [`ProtocolError::Decode`] if the frame is malformed or
    /// doesn't match the expected type.
    fn decode<T: DeserializeOwned>(
        &self,
        text: &str,
    ) -> Result<T, ProtocolError>;
}

// ---------------------------------------------------------------------------
// JsonCodec
// ---------------------------------------------------------------------------

/// A [`Codec`] that uses JSON (via `serde_json`).
///
/// JSON is what the browser clients speak, and it keeps every frame
/// inspectable in DevTools. Behind the `json` feature flag (enabled by
/// default).
#[cfg(feature = "json")]
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

#[cfg(feature = "json")]
impl Codec for JsonCodec {
    fn encode<T: Serialize>(&self, value: &T) -> Result<String, ProtocolError> {
        serde_json::to_string(value).map_err(ProtocolError::Encode)
    }

    fn decode<T: DeserializeOwned>(
        &self,
        text: &str,
    ) -> Result<T, ProtocolError> {
        serde_json::from_str(text).map_err(ProtocolError::Decode)
    }
}

#[cfg(feature = "json")]
impl JsonCodec {
    /// Decodes an inbound client frame, separating the two failure modes
    /// the protocol treats differently:
    ///
    /// - `Err(..)` — the frame isn't valid JSON at all (malformed payload,
    ///   logged by the caller);
    /// - `Ok(None)` — valid JSON, but not a message this server
    ///   understands (unknown `type` tag or wrong fields — silently
    ///   ignored per protocol);
    /// - `Ok(Some(msg))` — a recognized client message.
    pub fn decode_client(
        &self,
        text: &str,
    ) -> Result<Option<crate::ClientMessage>, ProtocolError> {
        let value: serde_json::Value =
            serde_json::from_str(text).map_err(ProtocolError::Decode)?;
        Ok(serde_json::from_value(value).ok())
    }
}

#[cfg(all(test, feature = "json"))]
mod tests {
    use super::*;
    use crate::{ClientMessage, ServerMessage};

    #[test]
    fn test_encode_decode_round_trip() {
        let codec = JsonCodec;
        let msg = ServerMessage::Pong { time: 99 };
        let text = codec.encode(&msg).unwrap();
        let decoded: ServerMessage = codec.decode(&text).unwrap();
        assert_eq!(msg, decoded);
    }

    #[test]
    fn test_decode_client_recognized_message() {
        let out = JsonCodec
            .decode_client(r#"{"type":"chat","message":"hi"}"#)
            .unwrap();
        assert_eq!(out, Some(ClientMessage::Chat { message: "hi".into() }));
    }

    #[test]
    fn test_decode_client_unknown_type_is_ignored_not_an_error() {
        let out = JsonCodec
            .decode_client(r#"{"type":"dance","style":"robot"}"#)
            .unwrap();
        assert_eq!(out, None);
    }

    #[test]
    fn test_decode_client_malformed_json_is_an_error() {
        assert!(JsonCodec.decode_client("{{{nope").is_err());
    }
}
