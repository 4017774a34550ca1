//! Keepalive Timer
//!
//! OKX drops idle public connections after 30 seconds without traffic.
//! The client sends a literal `ping` text frame on every tick; the server
//! answers `pong`. No pong timeout is tracked and a missed pong never
//! triggers a reconnect.

use std::time::Duration;

use tokio::time::{Instant, Interval, MissedTickBehavior};

/// Keepalive configuration.
#[derive(Debug, Clone)]
pub struct KeepaliveConfig {
    /// Interval between pings. Zero disables keepalive.
    pub interval: Duration,
}

impl Default for KeepaliveConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(25),
        }
    }
}

impl KeepaliveConfig {
    /// Configuration with keepalive disabled.
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            interval: Duration::ZERO,
        }
    }

    /// Whether pings are sent.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        !self.interval.is_zero()
    }
}

/// Ping timer for one connection.
#[derive(Debug)]
pub struct Keepalive {
    interval: Option<Interval>,
}

impl Keepalive {
    /// Start the timer. The first tick fires one full interval from now.
    #[must_use]
    pub fn start(config: &KeepaliveConfig) -> Self {
        let interval = config.is_enabled().then(|| {
            let mut interval =
                tokio::time::interval_at(Instant::now() + config.interval, config.interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            interval
        });
        Self { interval }
    }

    /// Wait for the next ping. Never completes when disabled.
    pub async fn tick(&mut self) {
        match self.interval.as_mut() {
            Some(interval) => {
                interval.tick().await;
            }
            None => std::future::pending::<()>().await,
        }
    }
}
