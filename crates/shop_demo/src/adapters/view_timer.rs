// Rust guideline compliant 2026-10-16

//! Detail-view timer: the UI-side half of view-duration tracking.
//!
//! Opening a product detail view emits a plain `view` event immediately.
//! Closing it (explicitly, or by opening another product) collapses the
//! start/end pair into a single `viewWithDuration` event. The engine only
//! ever sees the collapsed events.

use domain::{ItemId, KIND_VIEW, RawEvent, Timestamp, ViewSpan};

/// Tracks the single product detail view a shopper can have open.
#[derive(Debug, Default)]
pub struct ViewTimer {
    open: Option<ViewSpan>,
}

impl ViewTimer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Open `item_id` at `now`.
    ///
    /// Returns the duration event of any view this replaces, followed by the
    /// `view` event for the newly opened item.
    pub fn open(&mut self, item_id: ItemId, now: Timestamp) -> Vec<RawEvent> {
        let mut events: Vec<RawEvent> = self.close(now).into_iter().collect();
        events.push(RawEvent::new(item_id, KIND_VIEW, now));
        self.open = Some(ViewSpan::start(item_id, now));
        events
    }

    /// Close the open view, if any, as a `viewWithDuration` event.
    pub fn close(&mut self, now: Timestamp) -> Option<RawEvent> {
        self.open.take().map(|span| span.finish(now))
    }

    /// Item currently on screen.
    ///
    /// Used in tests to assert timer state.
    #[cfg(test)]
    #[must_use]
    pub fn current(&self) -> Option<ItemId> {
        self.open.map(|span| span.item_id)
    }
}
