//! Ticker Feed Types
//!
//! Instruments, ticker updates, the subscription the dashboard asks for,
//! and the connection session state machine.
//!
//! # Session Lifecycle
//!
//! ```text
//! Connecting ──open──► Online ──close──► Closed
//!     │                   └────error───► Errored
//!     └──close/error──► Closed / Errored
//! ```
//!
//! `Closed` and `Errored` are terminal. There is no transition back to
//! `Online`; the feed is not reconnected.

use rust_decimal::Decimal;
use serde::Serialize;

// =============================================================================
// Instruments
// =============================================================================

/// OKX instrument identifier, e.g. `BTC-USDT-SWAP`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Instrument(String);

impl Instrument {
    /// Wrap an instrument id.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Full instrument id.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Base currency: the text before the first `-`.
    #[must_use]
    pub fn base(&self) -> &str {
        self.0.split('-').next().unwrap_or(&self.0)
    }
}

impl std::fmt::Display for Instrument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Last trade price for one instrument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickerUpdate {
    /// Instrument the price belongs to.
    pub instrument: Instrument,
    /// Last traded price, if the feed sent a usable one.
    pub last: Option<Decimal>,
}

/// Channel and instruments requested when the feed opens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subscription {
    /// Feed channel name.
    pub channel: String,
    /// Instruments of interest.
    pub instruments: Vec<Instrument>,
}

impl Subscription {
    /// Create a subscription.
    #[must_use]
    pub fn new(channel: impl Into<String>, instruments: Vec<Instrument>) -> Self {
        Self {
            channel: channel.into(),
            instruments,
        }
    }

    /// Default dashboard watchlist on the `tickers` channel.
    #[must_use]
    pub fn default_watchlist() -> Self {
        Self::new(
            "tickers",
            ["BTC-USDT-SWAP", "XRP-USDT-SWAP", "CELO-USDT-SWAP"]
                .into_iter()
                .map(Instrument::new)
                .collect(),
        )
    }

    /// Whether `instrument` is watched.
    #[must_use]
    pub fn contains(&self, instrument: &Instrument) -> bool {
        self.instruments.contains(instrument)
    }
}

// =============================================================================
// Connection Status
// =============================================================================

/// Connection status as shown in the footer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    /// Waiting for the feed to open.
    #[default]
    Connecting,
    /// Feed open, updates flowing.
    Online,
    /// Feed closed by the peer or the network.
    Closed,
    /// Feed failed.
    Errored,
}

impl ConnectionStatus {
    /// Whether no further transitions are possible.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Closed | Self::Errored)
    }

    /// Lowercase name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Connecting => "connecting",
            Self::Online => "online",
            Self::Closed => "closed",
            Self::Errored => "errored",
        }
    }

    /// CSS class of the status dot.
    #[must_use]
    pub const fn dot_class(self) -> &'static str {
        match self {
            Self::Connecting => "dot connecting",
            Self::Online => "dot online",
            Self::Closed | Self::Errored => "dot offline",
        }
    }

    /// Status text.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Connecting => "Connecting...",
            Self::Online => "OKX Live",
            Self::Closed => "Disconnected",
            Self::Errored => "Connection Error",
        }
    }
}

// =============================================================================
// Session State Machine
// =============================================================================

/// Connection lifecycle event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Connection established.
    Opened,
    /// Connection closed.
    Closed,
    /// Connection failed.
    Failed,
}

/// A status change produced by [`FeedSession::apply`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Status before the event.
    pub from: ConnectionStatus,
    /// Status after the event.
    pub to: ConnectionStatus,
}

/// Feed session owned by the display adapter, one per process.
#[derive(Debug, Default)]
pub struct FeedSession {
    status: ConnectionStatus,
}

impl FeedSession {
    /// New session in `Connecting`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            status: ConnectionStatus::Connecting,
        }
    }

    /// Current status.
    #[must_use]
    pub const fn status(&self) -> ConnectionStatus {
        self.status
    }

    /// Whether ticker messages should be processed.
    #[must_use]
    pub const fn accepts_messages(&self) -> bool {
        matches!(self.status, ConnectionStatus::Online)
    }

    /// Apply an event. Returns `None` when the event causes no change.
    pub fn apply(&mut self, event: SessionEvent) -> Option<Transition> {
        let next = match (self.status, event) {
            (ConnectionStatus::Connecting, SessionEvent::Opened) => ConnectionStatus::Online,
            (ConnectionStatus::Connecting | ConnectionStatus::Online, SessionEvent::Closed) => {
                ConnectionStatus::Closed
            }
            (ConnectionStatus::Connecting | ConnectionStatus::Online, SessionEvent::Failed) => {
                ConnectionStatus::Errored
            }
            _ => return None,
        };

        let transition = Transition {
            from: self.status,
            to: next,
        };
        self.status = next;
        Some(transition)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn instrument_base_is_prefix() {
        assert_eq!(Instrument::new("BTC-USDT-SWAP").base(), "BTC");
        assert_eq!(Instrument::new("CELO-USDT-SWAP").base(), "CELO");
        assert_eq!(Instrument::new("PLAIN").base(), "PLAIN");
    }

    #[test]
    fn default_watchlist_has_three_swaps() {
        let sub = Subscription::default_watchlist();
        assert_eq!(sub.channel, "tickers");
        assert_eq!(sub.instruments.len(), 3);
        assert!(sub.contains(&Instrument::new("XRP-USDT-SWAP")));
        assert!(!sub.contains(&Instrument::new("ETH-USDT-SWAP")));
    }

    #[test]
    fn open_then_close() {
        let mut session = FeedSession::new();
        assert!(!session.accepts_messages());

        let t = session.apply(SessionEvent::Opened).unwrap();
        assert_eq!(t.from, ConnectionStatus::Connecting);
        assert_eq!(t.to, ConnectionStatus::Online);
        assert!(session.accepts_messages());

        let t = session.apply(SessionEvent::Closed).unwrap();
        assert_eq!(t.to, ConnectionStatus::Closed);
        assert!(session.status().is_terminal());
        assert!(!session.accepts_messages());
    }

    #[test]
    fn terminal_states_ignore_further_events() {
        let mut session = FeedSession::new();
        session.apply(SessionEvent::Opened);
        session.apply(SessionEvent::Failed);
        assert_eq!(session.status(), ConnectionStatus::Errored);

        assert!(session.apply(SessionEvent::Closed).is_none());
        assert!(session.apply(SessionEvent::Opened).is_none());
        assert_eq!(session.status(), ConnectionStatus::Errored);
    }

    #[test]
    fn connect_failure_skips_online() {
        let mut session = FeedSession::new();
        let t = session.apply(SessionEvent::Failed).unwrap();
        assert_eq!(t.from, ConnectionStatus::Connecting);
        assert_eq!(t.to, ConnectionStatus::Errored);
    }

    #[test]
    fn duplicate_open_is_ignored() {
        let mut session = FeedSession::new();
        session.apply(SessionEvent::Opened);
        assert!(session.apply(SessionEvent::Opened).is_none());
    }

    #[test]
    fn status_labels() {
        assert_eq!(ConnectionStatus::Online.dot_class(), "dot online");
        assert_eq!(ConnectionStatus::Online.label(), "OKX Live");
        assert_eq!(ConnectionStatus::Closed.dot_class(), "dot offline");
        assert_eq!(ConnectionStatus::Closed.label(), "Disconnected");
        assert_eq!(ConnectionStatus::Errored.dot_class(), "dot offline");
        assert_eq!(ConnectionStatus::Errored.label(), "Connection Error");
    }
}
