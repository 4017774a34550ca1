//! Sentiment Lookups
//!
//! Static copy keyed by phase: the badge bias and crowd psychology text
//! (coarse key) and the per-instrument ticker bias (six-way name).

use serde::Serialize;

use super::classification::{CoarsePhase, PhaseName};

/// Market bias shown on the sentiment badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketBias {
    /// New moon.
    Accumulation,
    /// Waxing.
    BullishMomentum,
    /// Full moon.
    VolatilityAlert,
    /// Waning.
    DistributionRiskOff,
}

impl MarketBias {
    /// Badge label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Accumulation => "ACCUMULATION",
            Self::BullishMomentum => "BULLISH MOMENTUM",
            Self::VolatilityAlert => "VOLATILITY ALERT",
            Self::DistributionRiskOff => "DISTRIBUTION / RISK-OFF",
        }
    }
}

/// Psychology and crowd copy for one coarse phase key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LunarIntuition {
    /// Trader psychology paragraph.
    pub psych: &'static str,
    /// Crowd behaviour paragraph.
    pub crowd: &'static str,
    /// Badge bias.
    pub bias: MarketBias,
}

impl CoarsePhase {
    /// Static sentiment copy for this key.
    #[must_use]
    pub const fn intuition(self) -> LunarIntuition {
        match self {
            Self::NewMoon => LunarIntuition {
                psych: "Traders feel a sense of 'reset'. Optimism is quiet but building.",
                crowd: "Low emotional exhaustion. Ideal for spotting fresh trend reversals.",
                bias: MarketBias::Accumulation,
            },
            Self::Waxing => LunarIntuition {
                psych: "Confidence is growing. 'Fear of Missing Out' (FOMO) begins to itch.",
                crowd: "Retail starts chasing green candles. Greed is increasing.",
                bias: MarketBias::BullishMomentum,
            },
            Self::FullMoon => LunarIntuition {
                psych: "Peak emotional tension. 'Lunacy' leads to erratic, impulsive exits.",
                crowd: "Extreme volatility. High probability of 'Blow-off Tops'.",
                bias: MarketBias::VolatilityAlert,
            },
            Self::Waning => LunarIntuition {
                psych: "Sobriety returns. Rational profit-taking replaces euphoria.",
                crowd: "Smart money exits while retail holds the bag. Fading energy.",
                bias: MarketBias::DistributionRiskOff,
            },
        }
    }
}

/// Bias label written next to each instrument price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TickerBias {
    /// New moon.
    LunarBuy,
    /// Full moon.
    LunarCaution,
    /// Any other phase.
    Neutral,
}

impl TickerBias {
    /// Keyed off the six-way name, not the coarse key.
    #[must_use]
    pub const fn for_phase(name: PhaseName) -> Self {
        match name {
            PhaseName::NewMoon => Self::LunarBuy,
            PhaseName::FullMoon => Self::LunarCaution,
            _ => Self::Neutral,
        }
    }

    /// Label text.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::LunarBuy => "LUNAR BUY",
            Self::LunarCaution => "LUNAR CAUTION",
            Self::Neutral => "NEUTRAL",
        }
    }

    /// CSS background colour.
    #[must_use]
    pub const fn color(self) -> &'static str {
        match self {
            Self::LunarBuy => "var(--up-green)",
            Self::LunarCaution => "var(--down-red)",
            Self::Neutral => "gray",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ticker_bias_follows_six_way_name() {
        assert_eq!(TickerBias::for_phase(PhaseName::NewMoon), TickerBias::LunarBuy);
        assert_eq!(
            TickerBias::for_phase(PhaseName::FullMoon),
            TickerBias::LunarCaution
        );
        for name in [
            PhaseName::WaxingCrescent,
            PhaseName::FirstQuarter,
            PhaseName::WaxingGibbous,
            PhaseName::Waning,
        ] {
            assert_eq!(TickerBias::for_phase(name), TickerBias::Neutral);
        }
    }

    #[test]
    fn ticker_bias_labels_and_colors() {
        assert_eq!(TickerBias::LunarBuy.label(), "LUNAR BUY");
        assert_eq!(TickerBias::LunarBuy.color(), "var(--up-green)");
        assert_eq!(TickerBias::LunarCaution.label(), "LUNAR CAUTION");
        assert_eq!(TickerBias::LunarCaution.color(), "var(--down-red)");
        assert_eq!(TickerBias::Neutral.label(), "NEUTRAL");
        assert_eq!(TickerBias::Neutral.color(), "gray");
    }

    #[test]
    fn intuition_bias_per_key() {
        assert_eq!(CoarsePhase::NewMoon.intuition().bias, MarketBias::Accumulation);
        assert_eq!(CoarsePhase::Waxing.intuition().bias, MarketBias::BullishMomentum);
        assert_eq!(CoarsePhase::FullMoon.intuition().bias, MarketBias::VolatilityAlert);
        assert_eq!(
            CoarsePhase::Waning.intuition().bias.label(),
            "DISTRIBUTION / RISK-OFF"
        );
    }
}
