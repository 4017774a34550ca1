//! Application Services
//!
//! - `slots`: names of the display slots
//! - `lunar_render`: writes a computed phase into the display
//! - `feed_display`: feed handlers updating prices, bias and status

pub mod feed_display;
pub mod lunar_render;
pub mod slots;

pub use feed_display::{FeedDisplayAdapter, format_price};
pub use lunar_render::{RenderReport, render};
