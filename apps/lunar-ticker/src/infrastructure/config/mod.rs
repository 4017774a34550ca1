//! Configuration Module
//!
//! Environment-driven settings for the feed connection and the dashboard
//! server.

mod settings;

pub use settings::{ConfigError, FeedSettings, ServerSettings, TickerConfig};
