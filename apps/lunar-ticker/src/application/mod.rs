//! Application Layer - Use cases and port definitions.
//!
//! Ports describe the display and the feed connection; services compose
//! the lunar calculation with those ports.

/// Port interfaces for the display, the feed connection and the clock.
pub mod ports;

/// Dashboard rendering and feed handling.
pub mod services;
