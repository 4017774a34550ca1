//! Lunar Phase Calculation
//!
//! Maps a moment in time to phase metadata: fraction of the synodic cycle,
//! an illumination approximation, the six-way phase name, the coarse
//! sentiment key, an approximate zodiac sign, the countdown to the next
//! quarter and the bounds of the current cycle.
//!
//! The calculation is closed form and has no error conditions. Nothing here
//! touches the display; see `application::services::lunar_render` for the
//! write-out.
//!
//! # Reference Moments
//!
//! - New moon epoch: 2000-01-06 18:14 UTC, used for the phase fraction.
//! - Zodiac epoch: 2000-01-06 00:00 UTC, used only for the zodiac index.

mod classification;
mod sentiment;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Serialize;

pub use classification::{CoarsePhase, PhaseName, ZodiacSign};
pub use sentiment::{LunarIntuition, MarketBias, TickerBias};

// =============================================================================
// Constants
// =============================================================================

/// Mean synodic month (new moon to new moon) in days.
pub const SYNODIC_MONTH_DAYS: f64 = 29.530_588_853;

/// Rounded synodic month used for the countdown and cycle bounds.
pub const CYCLE_APPROX_DAYS: f64 = 29.53;

/// Sidereal month in days, used for the zodiac approximation.
pub const SIDEREAL_MONTH_DAYS: f64 = 27.321;

/// Known new moon, 2000-01-06 18:14:00 UTC, in Unix milliseconds.
pub const NEW_MOON_EPOCH_MS: i64 = 947_182_440_000;

/// 2000-01-06 00:00:00 UTC in Unix milliseconds.
pub const ZODIAC_EPOCH_MS: i64 = 947_116_800_000;

const MILLIS_PER_DAY: f64 = 86_400_000.0;

// =============================================================================
// Types
// =============================================================================

/// Time left until the next quarter boundary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Countdown {
    /// Whole days remaining.
    pub days: u32,
    /// Whole hours remaining after `days`.
    pub hours: u32,
}

impl std::fmt::Display for Countdown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}d {}h", self.days, self.hours)
    }
}

/// Approximate bounds of the current synodic cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CycleBounds {
    /// Previous new moon.
    pub last_new_moon: DateTime<Utc>,
    /// Next new moon.
    pub next_new_moon: DateTime<Utc>,
}

impl std::fmt::Display for CycleBounds {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} - {}",
            self.last_new_moon.format("%d/%m/%Y"),
            self.next_new_moon.format("%d/%m/%Y")
        )
    }
}

/// Phase metadata for one moment. Computed fresh on every call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LunarPhase {
    /// Moment the phase was computed for.
    pub computed_at: DateTime<Utc>,
    /// Position in the synodic cycle, in [0, 1).
    pub fraction: f64,
    /// Approximate lit percentage, in [0, 100].
    pub illumination_percent: f64,
    /// Six-way phase name.
    pub name: PhaseName,
    /// Coarse sentiment key.
    pub coarse: CoarsePhase,
    /// Approximate zodiac sign.
    pub zodiac: ZodiacSign,
    /// Badge bias derived from the coarse key.
    pub bias: MarketBias,
    /// Time until the next quarter boundary.
    pub countdown: Countdown,
    /// Current cycle bounds.
    pub cycle: CycleBounds,
}

impl LunarPhase {
    /// Sentiment copy for the coarse key.
    #[must_use]
    pub const fn intuition(&self) -> LunarIntuition {
        self.coarse.intuition()
    }

    /// Ticker bias for the six-way name.
    #[must_use]
    pub const fn ticker_bias(&self) -> TickerBias {
        TickerBias::for_phase(self.name)
    }

    /// Badge CSS class, e.g. `bias-badge full-moon`.
    #[must_use]
    pub fn badge_class(&self) -> String {
        format!("bias-badge {}", self.coarse.css_key())
    }
}

// =============================================================================
// Calculation
// =============================================================================

/// Compute the lunar phase for `now`.
#[must_use]
pub fn compute(now: DateTime<Utc>) -> LunarPhase {
    let fraction = phase_fraction(now);
    let coarse = CoarsePhase::from_fraction(fraction);

    LunarPhase {
        computed_at: now,
        fraction,
        illumination_percent: illumination_percent(fraction),
        name: PhaseName::from_fraction(fraction),
        coarse,
        zodiac: zodiac_sign(now),
        bias: coarse.intuition().bias,
        countdown: countdown(fraction),
        cycle: cycle_bounds(now, fraction),
    }
}

/// Position of `now` within the synodic cycle, normalized to [0, 1).
#[must_use]
pub fn phase_fraction(now: DateTime<Utc>) -> f64 {
    unit_fraction(days_since(now, NEW_MOON_EPOCH_MS) / SYNODIC_MONTH_DAYS)
}

/// `|sin(fraction * π)| * 100`.
#[must_use]
pub fn illumination_percent(fraction: f64) -> f64 {
    (fraction * std::f64::consts::PI).sin().abs() * 100.0
}

/// Zodiac sign from the sidereal month, counted from the zodiac epoch.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn zodiac_sign(now: DateTime<Utc>) -> ZodiacSign {
    let position = unit_fraction(days_since(now, ZODIAC_EPOCH_MS) / SIDEREAL_MONTH_DAYS);
    ZodiacSign::from_index((position * 12.0).floor() as usize)
}

/// Countdown to the next quarter boundary.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn countdown(fraction: f64) -> Countdown {
    let days_remaining = (0.25 - fraction % 0.25) * CYCLE_APPROX_DAYS;
    let hours_remaining = (days_remaining % 1.0) * 24.0;

    Countdown {
        days: days_remaining.floor() as u32,
        hours: hours_remaining.floor() as u32,
    }
}

/// Previous and next new moon around `now`.
#[must_use]
pub fn cycle_bounds(now: DateTime<Utc>, fraction: f64) -> CycleBounds {
    let elapsed = days_to_delta(fraction * CYCLE_APPROX_DAYS);
    let remaining = days_to_delta((1.0 - fraction) * CYCLE_APPROX_DAYS);

    CycleBounds {
        last_new_moon: now.checked_sub_signed(elapsed).unwrap_or(now),
        next_new_moon: now.checked_add_signed(remaining).unwrap_or(now),
    }
}

#[allow(clippy::cast_precision_loss)]
fn days_since(now: DateTime<Utc>, epoch_ms: i64) -> f64 {
    (now.timestamp_millis() - epoch_ms) as f64 / MILLIS_PER_DAY
}

#[allow(clippy::cast_possible_truncation)]
fn days_to_delta(days: f64) -> TimeDelta {
    TimeDelta::milliseconds((days * MILLIS_PER_DAY).round() as i64)
}

/// `value mod 1`, non-negative even for negative input.
fn unit_fraction(value: f64) -> f64 {
    let wrapped = value.rem_euclid(1.0);
    // rem_euclid can round up to exactly 1.0 for tiny negative inputs
    if wrapped >= 1.0 { 0.0 } else { wrapped }
}

// =============================================================================
// Tests
// =============================================================================
