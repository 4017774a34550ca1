//! OKX WebSocket Adapter
//!
//! Public ticker stream client (JSON codec) with an optional text
//! keepalive. One connection per run; no reconnect.

pub mod client;
pub mod codec;
pub mod keepalive;
pub mod messages;
pub mod state;

pub use client::{OKX_PUBLIC_URL, OkxClient, OkxClientConfig, OkxClientError};
pub use codec::{CodecError, JsonCodec};
pub use keepalive::{Keepalive, KeepaliveConfig};
pub use messages::*;
pub use state::FeedState;
