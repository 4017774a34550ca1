#![cfg_attr(
    test,
    allow(
        clippy::unwrap_used,
        clippy::expect_used,
        clippy::float_cmp,
        clippy::significant_drop_tightening,
        clippy::too_many_lines,
        clippy::needless_pass_by_value,
        clippy::items_after_statements
    )
)]

//! Lunar Ticker - Moon Phase Dashboard with Live Crypto Prices
//!
//! Computes the current lunar phase and shows it next to live OKX ticker
//! prices, each price tagged with a cosmetic "lunar bias".
//!
//! # Layers (inside → outside)
//!
//! - **Domain**: Pure calculation and state
//!   - `lunar`: phase fraction, illumination, names, zodiac, countdown
//!   - `feed`: instruments, ticker updates, connection session
//!
//! - **Application**: Use cases and port definitions
//!   - `ports`: display surface, feed sender and handlers, clock
//!   - `services`: lunar rendering and the feed display adapter
//!
//! - **Infrastructure**: Adapters and external integrations
//!   - `okx`: WebSocket client for the public ticker stream
//!   - `display`: in-memory slot board
//!   - `web`: dashboard HTTP server
//!   - `config`, `metrics`, `telemetry`
//!
//! # Data Flow
//!
//! ```text
//! OKX public WS ──► OkxClient ──► FeedDisplayAdapter ──► SlotBoard ◄── WebServer ◄── browser
//!                    (serial)        (lunar compute)      (RwLock)
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::pedantic)]

// =============================================================================
// Module Declarations
// =============================================================================

/// Domain layer - Lunar calculation and feed types with no I/O.
pub mod domain;

/// Application layer - Use cases and port definitions.
pub mod application;

/// Infrastructure layer - Adapters and external integrations.
pub mod infrastructure;

// =============================================================================
// Re-exports
// =============================================================================

// Domain types
pub use domain::feed::{ConnectionStatus, FeedSession, Instrument, Subscription, TickerUpdate};
pub use domain::lunar::{LunarPhase, PhaseName, compute as compute_lunar_phase};

// Application
pub use application::ports::{
    Clock, DisplaySurface, FeedHandlers, FeedSender, FixedClock, SlotWrite, SystemClock,
};
pub use application::services::{FeedDisplayAdapter, format_price, slots};

// Infrastructure config
pub use infrastructure::config::{ConfigError, FeedSettings, ServerSettings, TickerConfig};

// Display and web server
pub use infrastructure::display::{BoardSnapshot, SlotBoard, SlotBoardHandle};
pub use infrastructure::web::{DashboardState, WebServer, WebServerError};

// Feed client
pub use infrastructure::okx::{FeedState, OkxClient, OkxClientConfig, OkxClientError};

// Metrics
pub use infrastructure::metrics::init_metrics;

// Telemetry
pub use infrastructure::telemetry::{TelemetryConfig, TelemetryGuard, init as init_telemetry};
