//! Measured event heights.

use std::collections::HashMap;

use crate::model::EventId;

/// Heights of events as last measured by the renderer.
///
/// A measurement that differs from the cached one means row offsets after
/// that event are stale and must be recomputed.
#[derive(Debug, Clone, Default)]
pub struct EventHeightsCache {
    heights: HashMap<EventId, usize>,
}

impl EventHeightsCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a measurement. Returns `true` when the cached height changed.
    pub fn set_event_height(&mut self, event: EventId, height: usize) -> bool {
        self.heights.insert(event, height) != Some(height)
    }

    /// Last measured height of `event`.
    pub fn event_height(&self, event: EventId) -> Option<usize> {
        self.heights.get(&event).copied()
    }

    /// Drops measurements of events no longer present.
    pub fn retain(&mut self, mut keep: impl FnMut(EventId) -> bool) {
        self.heights.retain(|event, _| keep(*event));
    }

    /// Number of measured events.
    pub fn len(&self) -> usize {
        self.heights.len()
    }

    /// Whether nothing was measured yet.
    pub fn is_empty(&self) -> bool {
        self.heights.is_empty()
    }

    /// Forgets every measurement.
    pub fn clear(&mut self) {
        self.heights.clear();
    }
}
