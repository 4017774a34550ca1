//! In-Memory Display
//!
//! `SlotBoard` holds the page's named slots. The feed task writes into it
//! through [`SlotBoardHandle`]; the dashboard server reads snapshots.
//!
//! Only slots registered up front exist. Writes to any other name are
//! dropped and counted in `lunar_ticker_slot_writes_skipped_total`.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;

use crate::application::ports::{DisplaySurface, SlotWrite};
use crate::infrastructure::metrics;

// =============================================================================
// Slot State
// =============================================================================

/// Current contents of one slot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SlotState {
    /// Text content.
    pub text: String,
    /// CSS class list, if one was set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    /// Inline style properties.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub style: BTreeMap<String, String>,
}

impl SlotState {
    fn apply(&mut self, write: SlotWrite) {
        match write {
            SlotWrite::Text(text) => self.text = text,
            SlotWrite::Class(class) => self.class = Some(class),
            SlotWrite::Style { property, value } => {
                self.style.insert(property.to_string(), value);
            }
        }
    }

    /// Inline `style` attribute value, e.g. `width: 50.00%`.
    #[must_use]
    pub fn style_attr(&self) -> String {
        self.style
            .iter()
            .map(|(property, value)| format!("{property}: {value}"))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

// =============================================================================
// Slot Board
// =============================================================================

/// Fixed set of named slots.
#[derive(Debug, Clone, Default)]
pub struct SlotBoard {
    slots: BTreeMap<String, SlotState>,
}

impl SlotBoard {
    /// Board with the given slots, all empty.
    pub fn with_layout<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            slots: names
                .into_iter()
                .map(|name| (name.into(), SlotState::default()))
                .collect(),
        }
    }

    /// Contents of `slot`, if it exists.
    #[must_use]
    pub fn get(&self, slot: &str) -> Option<&SlotState> {
        self.slots.get(slot)
    }

    /// Number of registered slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether no slots are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Serializable copy of every slot.
    #[must_use]
    pub fn snapshot(&self) -> BoardSnapshot {
        BoardSnapshot {
            slots: self.slots.clone(),
        }
    }
}

impl DisplaySurface for SlotBoard {
    fn write(&mut self, slot: &str, write: SlotWrite) -> bool {
        if let Some(state) = self.slots.get_mut(slot) {
            state.apply(write);
            true
        } else {
            tracing::trace!(slot, "Write to unknown slot skipped");
            metrics::record_slot_writes_skipped(1);
            false
        }
    }

    fn batch(&mut self, apply: &mut dyn FnMut(&mut dyn DisplaySurface)) {
        apply(self);
    }
}

/// Point-in-time copy of a board.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BoardSnapshot {
    /// Slots by name.
    pub slots: BTreeMap<String, SlotState>,
}

impl BoardSnapshot {
    /// Text of `slot`, empty when the slot does not exist.
    #[must_use]
    pub fn text(&self, slot: &str) -> &str {
        self.slots.get(slot).map_or("", |state| state.text.as_str())
    }

    /// Contents of `slot`.
    #[must_use]
    pub fn get(&self, slot: &str) -> Option<&SlotState> {
        self.slots.get(slot)
    }
}

// =============================================================================
// Shared Handle
// =============================================================================

/// Cloneable handle to a board shared between the feed task and the
/// dashboard server.
#[derive(Debug, Clone, Default)]
pub struct SlotBoardHandle {
    inner: Arc<RwLock<SlotBoard>>,
}

impl SlotBoardHandle {
    /// Share `board`.
    #[must_use]
    pub fn new(board: SlotBoard) -> Self {
        Self {
            inner: Arc::new(RwLock::new(board)),
        }
    }

    /// Copy of the current contents.
    #[must_use]
    pub fn snapshot(&self) -> BoardSnapshot {
        self.inner.read().snapshot()
    }
}

impl DisplaySurface for SlotBoardHandle {
    fn write(&mut self, slot: &str, write: SlotWrite) -> bool {
        self.inner.write().write(slot, write)
    }

    fn batch(&mut self, apply: &mut dyn FnMut(&mut dyn DisplaySurface)) {
        let mut board = self.inner.write();
        apply(&mut *board);
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> SlotBoard {
        SlotBoard::with_layout(["phase-name", "illumination-progress", "BTC-bias"])
    }

    #[test]
    fn writes_text_into_registered_slot() {
        let mut board = board();
        assert!(board.write("phase-name", SlotWrite::Text("Full Moon".into())));
        assert_eq!(board.get("phase-name").unwrap().text, "Full Moon");
    }

    #[test]
    fn unknown_slot_is_skipped() {
        let mut board = board();
        assert!(!board.write("nope", SlotWrite::Text("x".into())));
        assert!(board.get("nope").is_none());
        assert_eq!(board.len(), 3);
    }

    #[test]
    fn class_and_style_accumulate_separately() {
        let mut board = board();
        board.write("BTC-bias", SlotWrite::Text("LUNAR BUY".into()));
        board.write(
            "BTC-bias",
            SlotWrite::Style {
                property: "background-color",
                value: "var(--up-green)".into(),
            },
        );
        board.write("BTC-bias", SlotWrite::Class("bias".into()));

        let state = board.get("BTC-bias").unwrap();
        assert_eq!(state.text, "LUNAR BUY");
        assert_eq!(state.class.as_deref(), Some("bias"));
        assert_eq!(state.style_attr(), "background-color: var(--up-green)");
    }

    #[test]
    fn style_attr_joins_properties() {
        let mut state = SlotState::default();
        state.apply(SlotWrite::Style {
            property: "width",
            value: "50.00%".into(),
        });
        state.apply(SlotWrite::Style {
            property: "color",
            value: "red".into(),
        });
        assert_eq!(state.style_attr(), "color: red; width: 50.00%");
    }

    #[test]
    fn handle_clones_share_one_board() {
        let handle = SlotBoardHandle::new(board());
        let mut writer = handle.clone();
        writer.write("phase-name", SlotWrite::Text("New Moon".into()));

        let snapshot = handle.snapshot();
        assert_eq!(snapshot.text("phase-name"), "New Moon");
        assert_eq!(snapshot.text("missing"), "");
    }

    #[test]
    fn batch_is_applied_under_one_lock() {
        let handle = SlotBoardHandle::new(board());
        let reader = handle.clone();
        let mut writer = handle.clone();

        writer.batch(&mut |display: &mut dyn DisplaySurface| {
            display.write("phase-name", SlotWrite::Text("Full Moon".into()));
            // Readers wait until the whole batch has landed
            assert!(reader.inner.try_read().is_none());
            display.write("BTC-bias", SlotWrite::Text("LUNAR CAUTION".into()));
        });

        let snapshot = reader.snapshot();
        assert_eq!(snapshot.text("phase-name"), "Full Moon");
        assert_eq!(snapshot.text("BTC-bias"), "LUNAR CAUTION");
    }

    #[test]
    fn snapshot_serializes_only_set_fields() {
        let mut board = SlotBoard::with_layout(["status-text"]);
        board.write("status-text", SlotWrite::Text("Online".into()));

        let json = serde_json::to_value(board.snapshot()).unwrap();
        assert_eq!(json["slots"]["status-text"]["text"], "Online");
        assert!(json["slots"]["status-text"].get("class").is_none());
        assert!(json["slots"]["status-text"].get("style").is_none());
    }
}
