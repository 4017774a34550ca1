//! OKX JSON Codec
//!
//! Decodes inbound text frames into [`OkxMessage`] and encodes outbound
//! requests. Frames that carry no `data` (or an empty `data` array) decode
//! to [`OkxMessage::Ignored`] rather than an error.

use serde::Serialize;

use super::messages::{EventMessage, OkxMessage, TickerEnvelope};

/// Codec errors.
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// JSON encoding/decoding failed.
    #[error("JSON codec error: {0}")]
    Json(#[from] serde_json::Error),

    /// Frame is neither JSON nor a keepalive reply.
    #[error("invalid message format: {0}")]
    InvalidFormat(String),
}

/// JSON codec for the OKX public stream.
#[derive(Debug, Default, Clone)]
pub struct JsonCodec;

impl JsonCodec {
    /// Create a new JSON codec.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Decode one text frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame is not valid JSON, or if an event or
    /// ticker frame does not match its schema.
    pub fn decode(&self, text: &str) -> Result<OkxMessage, CodecError> {
        let trimmed = text.trim();

        if trimmed == "pong" {
            return Ok(OkxMessage::Pong);
        }

        if !trimmed.starts_with('{') {
            return Err(CodecError::InvalidFormat(format!(
                "expected JSON object, got: {}...",
                trimmed.chars().take(50).collect::<String>()
            )));
        }

        let value: serde_json::Value = serde_json::from_str(trimmed)?;

        if value.get("event").is_some() {
            let event: EventMessage = serde_json::from_value(value)?;
            return Ok(OkxMessage::Event(event));
        }

        if value.get("data").is_none() {
            return Ok(OkxMessage::Ignored);
        }

        let envelope: TickerEnvelope = serde_json::from_value(value)?;
        Ok(envelope
            .data
            .into_iter()
            .next()
            .map_or(OkxMessage::Ignored, OkxMessage::Ticker))
    }

    /// Encode a value to a JSON string.
    ///
    /// # Errors
    ///
    /// Returns an error if JSON serialization fails.
    pub fn encode<T: Serialize>(&self, value: &T) -> Result<String, CodecError> {
        Ok(serde_json::to_string(value)?)
    }
}
