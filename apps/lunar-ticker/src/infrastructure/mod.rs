//! Infrastructure Layer - Adapters and external integrations.
//!
//! Concrete implementations of the application ports plus the process
//! plumbing around them.

/// OKX WebSocket client adapter.
pub mod okx;

/// In-memory slot board implementing the display port.
pub mod display;

/// Dashboard HTTP server.
pub mod web;

/// Configuration loading.
pub mod config;

/// Prometheus metrics instrumentation.
pub mod metrics;

/// Logging and OpenTelemetry tracing integration.
pub mod telemetry;
