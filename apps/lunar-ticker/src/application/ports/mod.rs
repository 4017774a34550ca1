//! Port Interfaces
//!
//! Contracts between the dashboard logic and its collaborators.
//!
//! ## Driven Ports (Outbound)
//!
//! - `DisplaySurface`: named slots the dashboard writes into
//! - `FeedSender`: outbound requests on the open feed connection
//! - `Clock`: source of "now"
//!
//! ## Driver Ports (Inbound)
//!
//! - `FeedHandlers`: open / message / close / error callbacks registered on
//!   a feed connection

use chrono::{DateTime, Utc};

use crate::domain::feed::{Subscription, TickerUpdate};

// =============================================================================
// Display
// =============================================================================

/// A single write into a display slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotWrite {
    /// Replace the slot text.
    Text(String),
    /// Replace the slot CSS class list.
    Class(String),
    /// Set one inline style property.
    Style {
        /// CSS property name.
        property: &'static str,
        /// CSS value.
        value: String,
    },
}

/// Write-only view of the display.
pub trait DisplaySurface {
    /// Apply `write` to `slot`.
    ///
    /// Returns `false` and leaves the surface untouched when the slot does
    /// not exist. Implementations must never fail on a missing slot.
    fn write(&mut self, slot: &str, write: SlotWrite) -> bool;

    /// Run `apply` as one update. Readers of a shared surface see either
    /// none or all of its writes.
    fn batch(&mut self, apply: &mut dyn FnMut(&mut dyn DisplaySurface));
}

impl<T: DisplaySurface + ?Sized> DisplaySurface for &mut T {
    fn write(&mut self, slot: &str, write: SlotWrite) -> bool {
        (**self).write(slot, write)
    }

    fn batch(&mut self, apply: &mut dyn FnMut(&mut dyn DisplaySurface)) {
        (**self).batch(apply);
    }
}

// =============================================================================
// Feed
// =============================================================================

/// Outbound side of an open feed connection.
#[cfg_attr(test, mockall::automock)]
pub trait FeedSender {
    /// Queue a subscribe request.
    fn subscribe(&mut self, subscription: &Subscription);
}

/// Callbacks a feed connection invokes, one at a time, in arrival order.
pub trait FeedHandlers {
    /// Connection established.
    fn on_open(&mut self, sender: &mut dyn FeedSender);

    /// Ticker update received.
    fn on_message(&mut self, update: TickerUpdate);

    /// Connection closed.
    fn on_close(&mut self);

    /// Connection failed.
    fn on_error(&mut self, reason: &str);
}

// =============================================================================
// Clock
// =============================================================================

/// Source of the current moment.
pub trait Clock {
    /// Current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Clock pinned to one moment.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
