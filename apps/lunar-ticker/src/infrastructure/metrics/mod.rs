//! Prometheus Metrics Module
//!
//! Exposes feed and rendering counters in Prometheus format at `/metrics`
//! on the dashboard server.

use std::sync::OnceLock;

use metrics::{counter, describe_counter, describe_gauge, gauge};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use crate::domain::feed::ConnectionStatus;

// =============================================================================
// Global Metrics Handle
// =============================================================================

static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Initialize the Prometheus metrics recorder.
///
/// # Panics
///
/// Panics if the recorder cannot be installed.
#[allow(clippy::expect_used)]
pub fn init_metrics() -> PrometheusHandle {
    PROMETHEUS_HANDLE
        .get_or_init(|| {
            let handle = PrometheusBuilder::new()
                .install_recorder()
                .expect("failed to install Prometheus recorder");

            register_metrics();
            handle
        })
        .clone()
}

/// Get the Prometheus handle for rendering metrics.
///
/// Returns `None` if metrics have not been initialized.
#[must_use]
pub fn get_metrics_handle() -> Option<PrometheusHandle> {
    PROMETHEUS_HANDLE.get().cloned()
}

fn register_metrics() {
    describe_counter!(
        "lunar_ticker_messages_received_total",
        "Frames received from the ticker feed"
    );
    describe_counter!(
        "lunar_ticker_messages_ignored_total",
        "Frames dropped as malformed or without data"
    );
    describe_counter!(
        "lunar_ticker_slot_writes_skipped_total",
        "Display writes dropped because the slot does not exist"
    );
    describe_gauge!(
        "lunar_ticker_connection_status",
        "Feed status: 0 connecting, 1 online, 2 closed, 3 errored"
    );
}

// =============================================================================
// Metric Recording Functions
// =============================================================================

/// Kind of frame received.
#[derive(Debug, Clone, Copy)]
pub enum FrameKind {
    /// Ticker push.
    Ticker,
    /// Subscribe acknowledgement or error event.
    Event,
    /// Keepalive reply.
    Pong,
}

impl FrameKind {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Ticker => "ticker",
            Self::Event => "event",
            Self::Pong => "pong",
        }
    }
}

/// Why a frame was dropped.
#[derive(Debug, Clone, Copy)]
pub enum IgnoreReason {
    /// Frame could not be decoded.
    Malformed,
    /// Frame carried no data.
    NoData,
    /// Binary or other non-text frame.
    NonText,
}

impl IgnoreReason {
    const fn as_str(self) -> &'static str {
        match self {
            Self::Malformed => "malformed",
            Self::NoData => "no_data",
            Self::NonText => "non_text",
        }
    }
}

/// Record a frame received from the feed.
pub fn record_message_received(kind: FrameKind) {
    counter!(
        "lunar_ticker_messages_received_total",
        "kind" => kind.as_str()
    )
    .increment(1);
}

/// Record a dropped frame.
pub fn record_message_ignored(reason: IgnoreReason) {
    counter!(
        "lunar_ticker_messages_ignored_total",
        "reason" => reason.as_str()
    )
    .increment(1);
}

/// Record display writes that hit a missing slot.
pub fn record_slot_writes_skipped(count: u64) {
    counter!("lunar_ticker_slot_writes_skipped_total").increment(count);
}

/// Update the connection status gauge.
pub fn set_connection_status(status: ConnectionStatus) {
    gauge!("lunar_ticker_connection_status").set(status_value(status));
}

const fn status_value(status: ConnectionStatus) -> f64 {
    match status {
        ConnectionStatus::Connecting => 0.0,
        ConnectionStatus::Online => 1.0,
        ConnectionStatus::Closed => 2.0,
        ConnectionStatus::Errored => 3.0,
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_kind_as_str() {
        assert_eq!(FrameKind::Ticker.as_str(), "ticker");
        assert_eq!(FrameKind::Event.as_str(), "event");
        assert_eq!(FrameKind::Pong.as_str(), "pong");
    }

    #[test]
    fn ignore_reason_as_str() {
        assert_eq!(IgnoreReason::Malformed.as_str(), "malformed");
        assert_eq!(IgnoreReason::NoData.as_str(), "no_data");
        assert_eq!(IgnoreReason::NonText.as_str(), "non_text");
    }

    #[test]
    fn status_gauge_values() {
        assert!((status_value(ConnectionStatus::Online) - 1.0).abs() < f64::EPSILON);
        assert!((status_value(ConnectionStatus::Errored) - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn recording_without_recorder_is_noop() {
        record_message_received(FrameKind::Ticker);
        record_message_ignored(IgnoreReason::Malformed);
        record_slot_writes_skipped(2);
        set_connection_status(ConnectionStatus::Online);
    }
}
