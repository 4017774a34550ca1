//! Phase Classification Tables
//!
//! Two independent threshold tables map a phase fraction to a label:
//!
//! - [`PhaseName`]: six-way table driving the moon icon, phase name and
//!   per-instrument ticker bias.
//! - [`CoarsePhase`]: four-way table driving the sentiment badge and the
//!   psychology copy.
//!
//! The boundaries of the two tables differ (`0.06` vs `0.05` for the new
//! moon window, `0.50..0.56` vs `0.45..=0.55` for the full moon window) and
//! are kept separate on purpose; callers must not derive one from the other.

use serde::Serialize;

// =============================================================================
// Six-way Phase Name
// =============================================================================

/// Six-way lunar phase name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PhaseName {
    /// Fraction below 0.06 or above 0.94.
    #[serde(rename = "New Moon")]
    NewMoon,
    /// Fraction in [0.06, 0.25).
    #[serde(rename = "Waxing Crescent")]
    WaxingCrescent,
    /// Fraction in [0.25, 0.31).
    #[serde(rename = "First Quarter")]
    FirstQuarter,
    /// Fraction in [0.31, 0.50).
    #[serde(rename = "Waxing Gibbous")]
    WaxingGibbous,
    /// Fraction in [0.50, 0.56).
    #[serde(rename = "Full Moon")]
    FullMoon,
    /// Everything else up to 0.94.
    Waning,
}

impl PhaseName {
    /// Classify a phase fraction. First matching row wins.
    #[must_use]
    pub fn from_fraction(fraction: f64) -> Self {
        if fraction < 0.06 || fraction > 0.94 {
            Self::NewMoon
        } else if fraction < 0.25 {
            Self::WaxingCrescent
        } else if fraction < 0.31 {
            Self::FirstQuarter
        } else if fraction < 0.50 {
            Self::WaxingGibbous
        } else if fraction < 0.56 {
            Self::FullMoon
        } else {
            Self::Waning
        }
    }

    /// Display name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NewMoon => "New Moon",
            Self::WaxingCrescent => "Waxing Crescent",
            Self::FirstQuarter => "First Quarter",
            Self::WaxingGibbous => "Waxing Gibbous",
            Self::FullMoon => "Full Moon",
            Self::Waning => "Waning",
        }
    }

    /// Moon glyph shown in the header icon slot.
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::NewMoon => "🌑",
            Self::WaxingCrescent => "🌒",
            Self::FirstQuarter => "🌓",
            Self::WaxingGibbous => "🌔",
            Self::FullMoon => "🌕",
            Self::Waning => "🌘",
        }
    }

    /// One-line market psychology headline.
    #[must_use]
    pub const fn psychology(self) -> &'static str {
        match self {
            Self::NewMoon => "Risk-On: New Beginnings",
            Self::WaxingCrescent => "Building Momentum",
            Self::FirstQuarter => "Decision Point",
            Self::WaxingGibbous => "Greed Rising",
            Self::FullMoon => "High Volatility / Reversal",
            Self::Waning => "Profit Taking / Caution",
        }
    }
}

impl std::fmt::Display for PhaseName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Coarse Phase Key
// =============================================================================

/// Coarse four-way phase key used for the sentiment badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum CoarsePhase {
    /// Fraction below 0.05 or above 0.95.
    #[serde(rename = "New Moon")]
    NewMoon,
    /// Fraction in [0.05, 0.45).
    Waxing,
    /// Fraction in [0.45, 0.55].
    #[serde(rename = "Full Moon")]
    FullMoon,
    /// Everything else.
    Waning,
}

impl CoarsePhase {
    /// Classify a phase fraction.
    #[must_use]
    pub fn from_fraction(fraction: f64) -> Self {
        if fraction < 0.05 || fraction > 0.95 {
            Self::NewMoon
        } else if (0.05..0.45).contains(&fraction) {
            Self::Waxing
        } else if (0.45..=0.55).contains(&fraction) {
            Self::FullMoon
        } else {
            Self::Waning
        }
    }

    /// Lookup key as shown to the user.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::NewMoon => "New Moon",
            Self::Waxing => "Waxing",
            Self::FullMoon => "Full Moon",
            Self::Waning => "Waning",
        }
    }

    /// Kebab-case key used as a CSS modifier class.
    #[must_use]
    pub const fn css_key(self) -> &'static str {
        match self {
            Self::NewMoon => "new-moon",
            Self::Waxing => "waxing",
            Self::FullMoon => "full-moon",
            Self::Waning => "waning",
        }
    }
}

impl std::fmt::Display for CoarsePhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// =============================================================================
// Zodiac
// =============================================================================

/// Zodiac sign the moon is approximately passing through.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[allow(missing_docs)]
pub enum ZodiacSign {
    Aries,
    Taurus,
    Gemini,
    Cancer,
    Leo,
    Virgo,
    Libra,
    Scorpio,
    Sagittarius,
    Capricorn,
    Aquarius,
    Pisces,
}

impl ZodiacSign {
    /// All signs in index order.
    pub const ALL: [Self; 12] = [
        Self::Aries,
        Self::Taurus,
        Self::Gemini,
        Self::Cancer,
        Self::Leo,
        Self::Virgo,
        Self::Libra,
        Self::Scorpio,
        Self::Sagittarius,
        Self::Capricorn,
        Self::Aquarius,
        Self::Pisces,
    ];

    /// Sign at `index`, clamped to the last sign.
    #[must_use]
    pub const fn from_index(index: usize) -> Self {
        if index < Self::ALL.len() {
            Self::ALL[index]
        } else {
            Self::Pisces
        }
    }

    /// Position in [`Self::ALL`].
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Sign name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Aries => "Aries",
            Self::Taurus => "Taurus",
            Self::Gemini => "Gemini",
            Self::Cancer => "Cancer",
            Self::Leo => "Leo",
            Self::Virgo => "Virgo",
            Self::Libra => "Libra",
            Self::Scorpio => "Scorpio",
            Self::Sagittarius => "Sagittarius",
            Self::Capricorn => "Capricorn",
            Self::Aquarius => "Aquarius",
            Self::Pisces => "Pisces",
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
