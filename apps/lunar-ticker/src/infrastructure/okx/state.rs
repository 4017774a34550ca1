//! Feed connection state shared with the dashboard server.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};

use crate::domain::feed::ConnectionStatus;

/// Connection bookkeeping readable from other tasks.
#[derive(Debug, Default)]
pub struct FeedState {
    status: parking_lot::RwLock<ConnectionStatus>,
    connected_at: parking_lot::RwLock<Option<DateTime<Utc>>>,
    error_message: parking_lot::RwLock<Option<String>>,
    messages_received: AtomicU64,
    messages_ignored: AtomicU64,
}

impl FeedState {
    /// New state in `Connecting`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the connection status.
    pub fn set_status(&self, status: ConnectionStatus) {
        *self.status.write() = status;
        if status == ConnectionStatus::Online {
            *self.connected_at.write() = Some(Utc::now());
        }
    }

    /// Mark the connection errored with `message`.
    pub fn set_error(&self, message: String) {
        *self.status.write() = ConnectionStatus::Errored;
        *self.error_message.write() = Some(message);
    }

    /// Count a ticker message handed to the dashboard.
    pub fn increment_received(&self) {
        self.messages_received.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a frame that was dropped.
    pub fn increment_ignored(&self) {
        self.messages_ignored.fetch_add(1, Ordering::Relaxed);
    }

    /// Current status.
    #[must_use]
    pub fn status(&self) -> ConnectionStatus {
        *self.status.read()
    }

    /// When the feed opened, if it did.
    #[must_use]
    pub fn connected_at(&self) -> Option<DateTime<Utc>> {
        *self.connected_at.read()
    }

    /// Last error message.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        self.error_message.read().clone()
    }

    /// Ticker messages handed to the dashboard.
    #[must_use]
    pub fn messages_received(&self) -> u64 {
        self.messages_received.load(Ordering::Relaxed)
    }

    /// Frames dropped as malformed or irrelevant.
    #[must_use]
    pub fn messages_ignored(&self) -> u64 {
        self.messages_ignored.load(Ordering::Relaxed)
    }
}
