//! OKX WebSocket Message Types
//!
//! Wire format types for the OKX v5 public WebSocket.
//!
//! # Outbound
//! - `SubscribeRequest`: `{"op":"subscribe","args":[{"channel":…,"instId":…}]}`
//!
//! # Inbound
//! - `EventMessage`: subscribe acknowledgements and errors
//! - `TickerEnvelope`: `{"arg":{…},"data":[{…ticker…}]}`
//! - literal `pong` keepalive replies (not JSON)
//!
//! # References
//!
//! - [OKX WebSocket API](https://www.okx.com/docs-v5/en/#overview-websocket)

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::domain::feed::{Instrument, Subscription, TickerUpdate};

// =============================================================================
// Outbound
// =============================================================================

/// Channel argument used by requests and echoed in pushes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelArg {
    /// Channel name, e.g. `tickers`.
    pub channel: String,

    /// Instrument id.
    #[serde(rename = "instId", default, skip_serializing_if = "Option::is_none")]
    pub inst_id: Option<String>,
}

/// Subscribe / unsubscribe request.
///
/// # Wire Format (JSON)
/// ```json
/// {"op":"subscribe","args":[{"channel":"tickers","instId":"BTC-USDT-SWAP"}]}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubscribeRequest {
    /// Operation, `subscribe`.
    pub op: String,
    /// One argument per instrument.
    pub args: Vec<ChannelArg>,
}

impl SubscribeRequest {
    /// Build a subscribe request for every instrument of `subscription`.
    #[must_use]
    pub fn from_subscription(subscription: &Subscription) -> Self {
        Self {
            op: "subscribe".to_string(),
            args: subscription
                .instruments
                .iter()
                .map(|instrument| ChannelArg {
                    channel: subscription.channel.clone(),
                    inst_id: Some(instrument.as_str().to_string()),
                })
                .collect(),
        }
    }
}

// =============================================================================
// Inbound
// =============================================================================

/// Event frame: subscribe acknowledgement or error.
///
/// # Wire Format (JSON)
/// ```json
/// {"event":"subscribe","arg":{"channel":"tickers","instId":"BTC-USDT-SWAP"},"connId":"a4d3ae55"}
/// {"event":"error","code":"60012","msg":"Invalid request","connId":"a4d3ae55"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EventMessage {
    /// Event name.
    pub event: String,
    /// Channel argument for subscribe acknowledgements.
    #[serde(default)]
    pub arg: Option<ChannelArg>,
    /// Error code, string encoded.
    #[serde(default)]
    pub code: Option<String>,
    /// Error message.
    #[serde(default)]
    pub msg: Option<String>,
    /// Connection id assigned by the server.
    #[serde(rename = "connId", default)]
    pub conn_id: Option<String>,
}

impl EventMessage {
    /// Whether this is an error event.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.event == "error"
    }
}

/// One ticker snapshot. Only the fields the dashboard uses are decoded.
///
/// # Wire Format (JSON)
/// ```json
/// {"instType":"SWAP","instId":"BTC-USDT-SWAP","last":"97250.5","ts":"1714000000000"}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TickerData {
    /// Instrument id.
    #[serde(rename = "instId")]
    pub inst_id: String,

    /// Last traded price. `None` when OKX sends it empty or unparsable.
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub last: Option<Decimal>,
}

/// Decimal from a string or number; anything else decodes to `None`.
fn lenient_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = match Option::<serde_json::Value>::deserialize(deserializer)? {
        Some(serde_json::Value::String(text)) => text,
        Some(serde_json::Value::Number(number)) => number.to_string(),
        _ => return Ok(None),
    };
    let text = text.trim();
    Ok(Decimal::from_str(text)
        .or_else(|_| Decimal::from_scientific(text))
        .ok())
}

impl From<TickerData> for TickerUpdate {
    fn from(data: TickerData) -> Self {
        Self {
            instrument: Instrument::new(data.inst_id),
            last: data.last,
        }
    }
}

/// Push envelope carrying channel data.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TickerEnvelope {
    /// Channel the push belongs to.
    #[serde(default)]
    pub arg: Option<ChannelArg>,
    /// Ticker snapshots.
    pub data: Vec<TickerData>,
}

/// Decoded inbound frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OkxMessage {
    /// Keepalive reply.
    Pong,
    /// Subscribe acknowledgement or error.
    Event(EventMessage),
    /// Ticker push; only the first entry of `data` is used.
    Ticker(TickerData),
    /// Frame without usable data.
    Ignored,
}
