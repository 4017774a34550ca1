//! Domain Layer - Lunar calculation and feed session types.
//!
//! Pure types and functions with no I/O. Everything here can be unit
//! tested without a display or a network connection.

/// Lunar phase calculation and classification tables.
pub mod lunar;

/// Ticker feed types and the connection session state machine.
pub mod feed;
