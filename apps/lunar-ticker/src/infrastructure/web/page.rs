//! Dashboard HTML page.
//!
//! Every slot becomes an element whose `id` is the slot name, so the page
//! mirrors the board one to one. Markup lives in `templates/dashboard.html`.

use askama::Template;

use crate::application::services::slots;
use crate::domain::feed::Instrument;
use crate::infrastructure::display::{BoardSnapshot, SlotState};

/// One slot as rendered into the template.
struct SlotView {
    id: String,
    class: String,
    style: String,
    text: String,
}

impl SlotView {
    /// View of `slot`. A class written to the slot replaces `default_class`;
    /// a slot missing from the board renders empty.
    fn new(snapshot: &BoardSnapshot, slot: &str, default_class: &str) -> Self {
        let state = snapshot.get(slot);
        Self {
            id: slot.to_string(),
            class: state
                .and_then(|s| s.class.clone())
                .unwrap_or_else(|| default_class.to_string()),
            style: state.map(SlotState::style_attr).unwrap_or_default(),
            text: state.map(|s| s.text.clone()).unwrap_or_default(),
        }
    }
}

/// Labelled row of the lunar details table.
struct DetailRow {
    label: &'static str,
    value: SlotView,
}

/// Price and bias row for one instrument.
struct TickerRow {
    instrument: String,
    price: SlotView,
    bias: SlotView,
}

/// The dashboard page.
#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardPage {
    refresh_secs: u64,
    moon_icon: SlotView,
    phase_name: SlotView,
    market_sentiment: SlotView,
    illumination_value: SlotView,
    illumination_progress: SlotView,
    sentiment_badge: SlotView,
    psych_detail: SlotView,
    crowd_detail: SlotView,
    details: Vec<DetailRow>,
    tickers: Vec<TickerRow>,
    status_dot: SlotView,
    status_text: SlotView,
}

impl DashboardPage {
    /// Page for `snapshot`, one ticker row per instrument.
    #[must_use]
    pub fn new(snapshot: &BoardSnapshot, instruments: &[Instrument], refresh_secs: u64) -> Self {
        let view = |slot: &str, class: &str| SlotView::new(snapshot, slot, class);

        Self {
            refresh_secs,
            moon_icon: view(slots::MOON_ICON, "moon"),
            phase_name: view(slots::PHASE_NAME, ""),
            market_sentiment: view(slots::MARKET_SENTIMENT, "muted"),
            illumination_value: view(slots::ILLUMINATION_VALUE, ""),
            illumination_progress: view(slots::ILLUMINATION_PROGRESS, ""),
            sentiment_badge: view(slots::SENTIMENT_BADGE, "bias-badge"),
            psych_detail: view(slots::PSYCH_DETAIL, ""),
            crowd_detail: view(slots::CROWD_DETAIL, "muted"),
            details: [
                ("Zodiac", slots::ZODIAC),
                ("Next quarter", slots::COUNTDOWN),
                ("Cycle", slots::CYCLE_RANGE),
            ]
            .into_iter()
            .map(|(label, slot)| DetailRow {
                label,
                value: view(slot, ""),
            })
            .collect(),
            tickers: instruments
                .iter()
                .map(|instrument| TickerRow {
                    instrument: instrument.as_str().to_string(),
                    price: view(&slots::price(instrument), ""),
                    bias: view(&slots::bias(instrument), "bias"),
                })
                .collect(),
            status_dot: view(slots::STATUS_DOT, "dot"),
            status_text: view(slots::STATUS_TEXT, ""),
        }
    }
}

/// Render the full dashboard page.
///
/// # Errors
///
/// Returns an error if the template fails to render.
pub fn render_page(
    snapshot: &BoardSnapshot,
    instruments: &[Instrument],
    refresh_secs: u64,
) -> Result<String, askama::Error> {
    DashboardPage::new(snapshot, instruments, refresh_secs).render()
}
