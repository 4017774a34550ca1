//! Feed Display Adapter
//!
//! Feed handlers that keep the dashboard in sync with the ticker feed:
//!
//! - **open**: status online, subscribe to the watchlist
//! - **message**: recompute the lunar phase, re-render it, write the price
//!   and the lunar bias label for watched instruments
//! - **close / error**: status offline; terminal, no reconnection
//!
//! The lunar phase is recomputed inline on every ticker message. There is
//! no timer and no memoization. Each event lands in the display as one
//! batch.

use rust_decimal::{Decimal, RoundingStrategy};

use crate::application::ports::{Clock, DisplaySurface, FeedHandlers, FeedSender, SlotWrite};
use crate::domain::feed::{ConnectionStatus, FeedSession, SessionEvent, Subscription, TickerUpdate};
use crate::domain::lunar::{self, LunarPhase};

use super::lunar_render::{RenderReport, render};
use super::slots;

/// Dashboard state driven by feed events.
pub struct FeedDisplayAdapter<D, C> {
    display: D,
    clock: C,
    session: FeedSession,
    subscription: Subscription,
}

impl<D, C> FeedDisplayAdapter<D, C>
where
    D: DisplaySurface,
    C: Clock,
{
    /// Create an adapter in the `Connecting` state.
    #[must_use]
    pub const fn new(display: D, clock: C, subscription: Subscription) -> Self {
        Self {
            display,
            clock,
            session: FeedSession::new(),
            subscription,
        }
    }

    /// Current connection status.
    #[must_use]
    pub const fn status(&self) -> ConnectionStatus {
        self.session.status()
    }

    /// Watched instruments.
    #[must_use]
    pub const fn subscription(&self) -> &Subscription {
        &self.subscription
    }

    /// The display being written.
    #[must_use]
    pub const fn display(&self) -> &D {
        &self.display
    }

    /// Initial page render: connection status and the lunar dashboard.
    pub fn render_initial(&mut self) -> LunarPhase {
        self.write_status();
        self.refresh_lunar()
    }

    fn refresh_lunar(&mut self) -> LunarPhase {
        let phase = lunar::compute(self.clock.now());
        self.display.batch(&mut |display: &mut dyn DisplaySurface| {
            render(&phase, display);
        });
        phase
    }

    fn write_status(&mut self) {
        let status = self.session.status();
        let mut report = RenderReport::default();
        self.display.batch(&mut |display: &mut dyn DisplaySurface| {
            let dot = SlotWrite::Class(status.dot_class().to_string());
            let text = SlotWrite::Text(status.label().to_string());
            report.record(display.write(slots::STATUS_DOT, dot));
            report.record(display.write(slots::STATUS_TEXT, text));
        });
        if report.skipped > 0 {
            tracing::debug!(skipped = report.skipped, "Status slots missing from display");
        }
    }

    fn transition(&mut self, event: SessionEvent) -> bool {
        let Some(transition) = self.session.apply(event) else {
            tracing::debug!(
                ?event,
                status = self.session.status().as_str(),
                "Feed event ignored in current state"
            );
            return false;
        };

        tracing::info!(
            from = transition.from.as_str(),
            to = transition.to.as_str(),
            "Feed status changed"
        );
        self.write_status();
        true
    }
}

impl<D, C> FeedHandlers for FeedDisplayAdapter<D, C>
where
    D: DisplaySurface,
    C: Clock,
{
    fn on_open(&mut self, sender: &mut dyn FeedSender) {
        if !self.transition(SessionEvent::Opened) {
            return;
        }

        tracing::info!(
            channel = %self.subscription.channel,
            instruments = self.subscription.instruments.len(),
            "Subscribing to ticker feed"
        );
        sender.subscribe(&self.subscription);
    }

    fn on_message(&mut self, update: TickerUpdate) {
        if !self.session.accepts_messages() {
            tracing::trace!(instrument = %update.instrument, "Ticker outside online state");
            return;
        }

        let phase = lunar::compute(self.clock.now());
        let watched = self.subscription.contains(&update.instrument);

        self.display.batch(&mut |display: &mut dyn DisplaySurface| {
            render(&phase, display);
            if watched {
                write_ticker(display, &update, &phase);
            }
        });

        if !watched {
            tracing::debug!(instrument = %update.instrument, "Ticker for unwatched instrument");
            return;
        }

        tracing::trace!(
            instrument = %update.instrument,
            last = ?update.last,
            bias = phase.ticker_bias().label(),
            "Ticker rendered"
        );
    }

    fn on_close(&mut self) {
        if self.transition(SessionEvent::Closed) {
            tracing::warn!("Ticker feed disconnected");
        }
    }

    fn on_error(&mut self, reason: &str) {
        if self.transition(SessionEvent::Failed) {
            tracing::error!(error = %reason, "Ticker feed error");
        }
    }
}

/// Write the price and lunar bias slots for a watched instrument. A ticker
/// without a usable price still refreshes the bias.
fn write_ticker(display: &mut dyn DisplaySurface, update: &TickerUpdate, phase: &LunarPhase) {
    if let Some(last) = update.last {
        let price_slot = slots::price(&update.instrument);
        display.write(&price_slot, SlotWrite::Text(format_price(last)));
    }

    let bias = phase.ticker_bias();
    let bias_slot = slots::bias(&update.instrument);
    display.write(&bias_slot, SlotWrite::Text(bias.label().to_string()));
    display.write(
        &bias_slot,
        SlotWrite::Style {
            property: "background-color",
            value: bias.color().to_string(),
        },
    );
}

/// Format a price with thousands separators and at most three decimals.
///
/// `97250.5` renders as `97,250.5`, `0.523456` as `0.523`.
#[must_use]
pub fn format_price(price: Decimal) -> String {
    let rounded = price
        .round_dp_with_strategy(3, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    let text = rounded.abs().to_string();
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), ""));

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3 + 1);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    if frac_part.is_empty() {
        format!("{sign}{grouped}")
    } else {
        format!("{sign}{grouped}.{frac_part}")
    }
}

// =============================================================================
// Tests
// =============================================================================
