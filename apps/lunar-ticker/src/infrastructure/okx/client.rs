//! OKX WebSocket Client
//!
//! Connects to the OKX public stream and delivers connection events to a
//! [`FeedHandlers`] implementation, one at a time, in arrival order.
//!
//! # Stream URL
//!
//! - Production: `wss://ws.okx.com:8443/ws/v5/public`
//!
//! # Lifecycle
//!
//! The client connects once. When the connection closes or fails the
//! handlers are told and [`OkxClient::run`] returns; it never reconnects.

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio_tungstenite::tungstenite::Message;
use tokio_util::sync::CancellationToken;

use super::codec::{CodecError, JsonCodec};
use super::keepalive::{Keepalive, KeepaliveConfig};
use super::messages::{OkxMessage, SubscribeRequest};
use super::state::FeedState;
use crate::application::ports::{FeedHandlers, FeedSender};
use crate::domain::feed::{ConnectionStatus, Subscription};
use crate::infrastructure::metrics::{self, FrameKind, IgnoreReason};

/// OKX v5 public WebSocket endpoint.
pub const OKX_PUBLIC_URL: &str = "wss://ws.okx.com:8443/ws/v5/public";

// =============================================================================
// Error Type
// =============================================================================

/// Errors that end a feed connection.
#[derive(Debug, thiserror::Error)]
pub enum OkxClientError {
    /// WebSocket error.
    #[error("WebSocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// An outbound request could not be encoded.
    #[error("codec error: {0}")]
    Codec(#[from] CodecError),
}

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for the OKX client.
#[derive(Debug, Clone)]
pub struct OkxClientConfig {
    /// WebSocket URL.
    pub url: String,
    /// Keepalive configuration.
    pub keepalive: KeepaliveConfig,
}

impl OkxClientConfig {
    /// Create a new configuration.
    #[must_use]
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            keepalive: KeepaliveConfig::default(),
        }
    }
}

// =============================================================================
// Outbound Queue
// =============================================================================

/// Collects requests issued by `on_open` until they can be written.
#[derive(Debug, Default)]
struct Outbox {
    codec: JsonCodec,
    frames: Vec<String>,
    error: Option<CodecError>,
}

impl FeedSender for Outbox {
    fn subscribe(&mut self, subscription: &Subscription) {
        let request = SubscribeRequest::from_subscription(subscription);
        match self.codec.encode(&request) {
            Ok(json) => self.frames.push(json),
            Err(e) => self.error = Some(e),
        }
    }
}

// =============================================================================
// Client
// =============================================================================

enum Ended {
    Closed,
    Cancelled,
}

/// OKX WebSocket client driving a set of feed handlers.
pub struct OkxClient<H> {
    config: OkxClientConfig,
    codec: JsonCodec,
    handlers: H,
    state: Arc<FeedState>,
    cancel: CancellationToken,
}

impl<H: FeedHandlers> OkxClient<H> {
    /// Create a new client.
    #[must_use]
    pub fn new(
        config: OkxClientConfig,
        handlers: H,
        state: Arc<FeedState>,
        cancel: CancellationToken,
    ) -> Self {
        Self {
            config,
            codec: JsonCodec::new(),
            handlers,
            state,
            cancel,
        }
    }

    /// The registered handlers.
    #[must_use]
    pub const fn handlers(&self) -> &H {
        &self.handlers
    }

    /// Shared connection state.
    #[must_use]
    pub fn state(&self) -> Arc<FeedState> {
        Arc::clone(&self.state)
    }

    /// Connect and process frames until the connection ends or the client
    /// is cancelled.
    ///
    /// # Errors
    ///
    /// Returns the error that ended the connection. The handlers have
    /// already been told through `on_error`.
    pub async fn run(&mut self) -> Result<(), OkxClientError> {
        if self.cancel.is_cancelled() {
            tracing::info!("OKX client cancelled before connecting");
            return Ok(());
        }

        match self.connect_and_run().await {
            Ok(Ended::Closed) => {
                tracing::info!("OKX connection closed");
                self.state.set_status(ConnectionStatus::Closed);
                metrics::set_connection_status(ConnectionStatus::Closed);
                self.handlers.on_close();
                Ok(())
            }
            Ok(Ended::Cancelled) => {
                tracing::info!("OKX client cancelled");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "OKX connection error");
                self.state.set_error(e.to_string());
                metrics::set_connection_status(ConnectionStatus::Errored);
                self.handlers.on_error(&e.to_string());
                Err(e)
            }
        }
    }

    async fn connect_and_run(&mut self) -> Result<Ended, OkxClientError> {
        tracing::info!(url = %self.config.url, "Connecting to OKX stream");

        let cancel = self.cancel.clone();
        let (ws_stream, _response) = tokio::select! {
            () = cancel.cancelled() => return Ok(Ended::Cancelled),
            result = tokio_tungstenite::connect_async(self.config.url.as_str()) => result?,
        };

        let (mut write, mut read) = ws_stream.split();

        self.state.set_status(ConnectionStatus::Online);
        metrics::set_connection_status(ConnectionStatus::Online);

        let mut outbox = Outbox {
            codec: self.codec.clone(),
            ..Outbox::default()
        };
        self.handlers.on_open(&mut outbox);
        if let Some(e) = outbox.error {
            return Err(e.into());
        }
        for frame in outbox.frames {
            tracing::debug!(frame = %frame, "Sending request");
            write.send(Message::Text(frame.into())).await?;
        }

        let mut keepalive = Keepalive::start(&self.config.keepalive);

        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    return Ok(Ended::Cancelled);
                }
                () = keepalive.tick() => {
                    tracing::trace!("Sending keepalive ping");
                    write.send(Message::Text("ping".into())).await?;
                }
                msg = read.next() => {
                    match msg {
                        Some(Ok(Message::Text(text))) => {
                            self.handle_text_message(&text);
                        }
                        Some(Ok(Message::Ping(data))) => {
                            write.send(Message::Pong(data)).await?;
                        }
                        Some(Ok(Message::Pong(_))) => {}
                        Some(Ok(Message::Close(frame))) => {
                            tracing::info!(?frame, "Server sent close frame");
                            return Ok(Ended::Closed);
                        }
                        Some(Ok(_)) => {
                            self.state.increment_ignored();
                            metrics::record_message_ignored(IgnoreReason::NonText);
                        }
                        Some(Err(e)) => {
                            return Err(e.into());
                        }
                        None => {
                            tracing::info!("WebSocket stream ended");
                            return Ok(Ended::Closed);
                        }
                    }
                }
            }
        }
    }

    /// Decode a text frame and hand ticker data to the handlers.
    fn handle_text_message(&mut self, text: &str) {
        match self.codec.decode(text) {
            Ok(OkxMessage::Ticker(data)) => {
                metrics::record_message_received(FrameKind::Ticker);
                self.state.increment_received();
                self.handlers.on_message(data.into());
            }
            Ok(OkxMessage::Event(event)) => {
                metrics::record_message_received(FrameKind::Event);
                if event.is_error() {
                    tracing::warn!(
                        code = ?event.code,
                        msg = ?event.msg,
                        "OKX rejected request"
                    );
                } else {
                    tracing::debug!(event = %event.event, arg = ?event.arg, "OKX event");
                }
            }
            Ok(OkxMessage::Pong) => {
                metrics::record_message_received(FrameKind::Pong);
            }
            Ok(OkxMessage::Ignored) => {
                self.state.increment_ignored();
                metrics::record_message_ignored(IgnoreReason::NoData);
                tracing::trace!("Ignoring frame without data");
            }
            Err(e) => {
                self.state.increment_ignored();
                metrics::record_message_ignored(IgnoreReason::Malformed);
                tracing::debug!(error = %e, "Ignoring malformed frame");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_config_keeps_default_keepalive() {
        let config = OkxClientConfig::new(OKX_PUBLIC_URL);
        assert_eq!(config.url, "wss://ws.okx.com:8443/ws/v5/public");
        assert!(config.keepalive.is_enabled());
    }

    #[test]
    fn outbox_encodes_subscribe_request() {
        let mut outbox = Outbox::default();
        outbox.subscribe(&Subscription::default_watchlist());

        assert!(outbox.error.is_none());
        assert_eq!(outbox.frames.len(), 1);
        let value: serde_json::Value = serde_json::from_str(&outbox.frames[0]).unwrap();
        assert_eq!(value["op"], "subscribe");
        assert_eq!(value["args"].as_array().unwrap().len(), 3);
        assert_eq!(value["args"][2]["instId"], "CELO-USDT-SWAP");
    }
}
