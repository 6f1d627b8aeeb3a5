use tracing::debug;

use crate::frame::Frame;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum EventKind {
    FilterChanged,
    DisplayToggled,
    SelectionChanged,
    TimeRangeChanged,
    Recomputed,
    AssetReady,
    AssetFailed,
    Exported,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::FilterChanged => "filter_changed",
            EventKind::DisplayToggled => "display_toggled",
            EventKind::SelectionChanged => "selection_changed",
            EventKind::TimeRangeChanged => "time_range_changed",
            EventKind::Recomputed => "recomputed",
            EventKind::AssetReady => "asset_ready",
            EventKind::AssetFailed => "asset_failed",
            EventKind::Exported => "exported",
        }
    }
}

/// One state transition, stamped with the frame it happened in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    pub frame_index: u64,
    pub kind: EventKind,
    pub message: String,
}

/// Events kept before the oldest are discarded.
pub const EVENT_LOG_CAPACITY: usize = 1024;

/// Bounded log of view-state transitions.
///
/// This is a record, not a dispatcher: nothing subscribes to it. The host
/// drains it; an undrained log keeps only the newest `capacity` events.
#[derive(Debug)]
pub struct EventBus {
    events: Vec<Event>,
    capacity: usize,
    dropped: u64,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::with_capacity(EVENT_LOG_CAPACITY)
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: Vec::new(),
            capacity: capacity.max(1),
            dropped: 0,
        }
    }

    pub fn emit(&mut self, frame: Frame, kind: EventKind, message: impl Into<String>) {
        let message = message.into();
        debug!(frame = frame.index, kind = kind.as_str(), "{message}");
        if self.events.len() == self.capacity {
            self.events.remove(0);
            self.dropped += 1;
        }
        self.events.push(Event {
            frame_index: frame.index,
            kind,
            message,
        });
    }

    /// Events discarded because the log was full.
    pub fn dropped(&self) -> u64 {
        self.dropped
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn count(&self, kind: EventKind) -> usize {
        self.events.iter().filter(|e| e.kind == kind).count()
    }

    pub fn drain(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }
}
