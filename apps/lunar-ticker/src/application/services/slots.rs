//! Display slot names.

use crate::domain::feed::{Instrument, Subscription};

/// Moon glyph.
pub const MOON_ICON: &str = "moon-icon";
/// Six-way phase name.
pub const PHASE_NAME: &str = "phase-name";
/// Psychology headline for the six-way name.
pub const MARKET_SENTIMENT: &str = "market-sentiment";
/// Illumination percentage, one decimal.
pub const ILLUMINATION_VALUE: &str = "illumination-val";
/// Illumination progress bar.
pub const ILLUMINATION_PROGRESS: &str = "illumination-progress";
/// Trader psychology paragraph.
pub const PSYCH_DETAIL: &str = "psych-detail";
/// Crowd behaviour paragraph.
pub const CROWD_DETAIL: &str = "crowd-detail";
/// Sentiment badge.
pub const SENTIMENT_BADGE: &str = "market-sentiment-badge";
/// Zodiac sign.
pub const ZODIAC: &str = "m-zodiac";
/// Countdown to the next quarter.
pub const COUNTDOWN: &str = "m-countdown";
/// Cycle date range.
pub const CYCLE_RANGE: &str = "m-cycle-range";
/// Connection status dot.
pub const STATUS_DOT: &str = "status-dot";
/// Connection status text.
pub const STATUS_TEXT: &str = "status-text";

/// Every fixed slot, in page order.
pub const FIXED: [&str; 13] = [
    MOON_ICON,
    PHASE_NAME,
    MARKET_SENTIMENT,
    ILLUMINATION_VALUE,
    ILLUMINATION_PROGRESS,
    PSYCH_DETAIL,
    CROWD_DETAIL,
    SENTIMENT_BADGE,
    ZODIAC,
    COUNTDOWN,
    CYCLE_RANGE,
    STATUS_DOT,
    STATUS_TEXT,
];

/// Price slot, e.g. `BTC-USDT-SWAP-price`.
#[must_use]
pub fn price(instrument: &Instrument) -> String {
    format!("{}-price", instrument.as_str())
}

/// Bias slot, keyed by base currency, e.g. `BTC-bias`.
#[must_use]
pub fn bias(instrument: &Instrument) -> String {
    format!("{}-bias", instrument.base())
}

/// All slots of a page showing `subscription`.
#[must_use]
pub fn layout(subscription: &Subscription) -> Vec<String> {
    let mut names: Vec<String> = FIXED.iter().map(|s| (*s).to_string()).collect();
    for instrument in &subscription.instruments {
        names.push(price(instrument));
        names.push(bias(instrument));
    }
    names
}
