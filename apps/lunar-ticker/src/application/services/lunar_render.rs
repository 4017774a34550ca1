//! Lunar Dashboard Rendering
//!
//! Writes a computed [`LunarPhase`] into the display. Missing slots are
//! skipped and counted; rendering never fails.

use crate::application::ports::{DisplaySurface, SlotWrite};
use crate::domain::lunar::LunarPhase;

use super::slots;

/// Outcome of a render pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderReport {
    /// Writes that landed in an existing slot.
    pub written: usize,
    /// Writes dropped because the slot does not exist.
    pub skipped: usize,
}

impl RenderReport {
    pub(crate) fn record(&mut self, landed: bool) {
        if landed {
            self.written += 1;
        } else {
            self.skipped += 1;
        }
    }
}

/// Write every lunar slot for `phase`.
pub fn render<D>(phase: &LunarPhase, display: &mut D) -> RenderReport
where
    D: DisplaySurface + ?Sized,
{
    let intuition = phase.intuition();
    let mut report = RenderReport::default();

    let writes = [
        (slots::MOON_ICON, SlotWrite::Text(phase.name.icon().to_string())),
        (slots::PHASE_NAME, SlotWrite::Text(phase.name.as_str().to_string())),
        (
            slots::MARKET_SENTIMENT,
            SlotWrite::Text(phase.name.psychology().to_string()),
        ),
        (
            slots::ILLUMINATION_VALUE,
            SlotWrite::Text(format!("{:.1}", phase.illumination_percent)),
        ),
        (
            slots::ILLUMINATION_PROGRESS,
            SlotWrite::Style {
                property: "width",
                value: format!("{:.2}%", phase.illumination_percent),
            },
        ),
        (slots::PSYCH_DETAIL, SlotWrite::Text(intuition.psych.to_string())),
        (slots::CROWD_DETAIL, SlotWrite::Text(intuition.crowd.to_string())),
        (
            slots::SENTIMENT_BADGE,
            SlotWrite::Text(intuition.bias.label().to_string()),
        ),
        (slots::SENTIMENT_BADGE, SlotWrite::Class(phase.badge_class())),
        (slots::ZODIAC, SlotWrite::Text(phase.zodiac.as_str().to_string())),
        (slots::COUNTDOWN, SlotWrite::Text(phase.countdown.to_string())),
        (slots::CYCLE_RANGE, SlotWrite::Text(phase.cycle.to_string())),
    ];

    for (slot, write) in writes {
        report.record(display.write(slot, write));
    }

    if report.skipped > 0 {
        tracing::debug!(skipped = report.skipped, "Lunar slots missing from display");
    }

    report
}
