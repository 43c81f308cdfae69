//! System lifecycle events.
//!
//! Events are emitted while the manager is mid-operation and delivered in a
//! batch once the operation finishes, so listeners always observe a
//! consistent manager state. Delivered events are kept in a bounded history
//! ring for inspection.

use std::collections::VecDeque;

// ---------------------------------------------------------------------------
// Event types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SystemEvent {
    /// A change from one system to another was accepted.
    SystemChanged { from: String, to: String },
    /// Every body of the system has been driven through the builder.
    SystemLoaded { system: String },
    /// The readiness gate opened.
    SystemReady { system: String },
    BodyLoaded { system: String, body: String },
    BodyFailed {
        system: String,
        body: String,
        reason: String,
    },
}

/// Discriminant tag for event types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    SystemChanged,
    SystemLoaded,
    SystemReady,
    BodyLoaded,
    BodyFailed,
}

const EVENT_KIND_COUNT: usize = 5;

impl SystemEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            SystemEvent::SystemChanged { .. } => EventKind::SystemChanged,
            SystemEvent::SystemLoaded { .. } => EventKind::SystemLoaded,
            SystemEvent::SystemReady { .. } => EventKind::SystemReady,
            SystemEvent::BodyLoaded { .. } => EventKind::BodyLoaded,
            SystemEvent::BodyFailed { .. } => EventKind::BodyFailed,
        }
    }
}

impl EventKind {
    fn index(self) -> usize {
        self as usize
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// A listener receives events read-only.
pub type Listener = Box<dyn FnMut(&SystemEvent)>;

/// Default number of delivered events kept in the history.
pub const DEFAULT_HISTORY: usize = 64;

pub struct EventBus {
    listeners: [Vec<Listener>; EVENT_KIND_COUNT],
    /// Emitted but not yet delivered.
    pending: Vec<SystemEvent>,
    history: VecDeque<SystemEvent>,
    history_capacity: usize,
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("pending", &self.pending)
            .field("history", &self.history.len())
            .finish_non_exhaustive()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY)
    }
}

impl EventBus {
    /// Create a bus that keeps the last `history_capacity` delivered events.
    /// A capacity of 0 is clamped to 1.
    pub fn new(history_capacity: usize) -> Self {
        let history_capacity = history_capacity.max(1);
        Self {
            listeners: Default::default(),
            pending: Vec::new(),
            history: VecDeque::with_capacity(history_capacity),
            history_capacity,
        }
    }

    /// Register a listener. Listeners run in registration order.
    pub fn on(&mut self, kind: EventKind, listener: Listener) {
        self.listeners[kind.index()].push(listener);
    }

    /// Buffer an event for the next [`EventBus::deliver`].
    pub fn emit(&mut self, event: SystemEvent) {
        self.pending.push(event);
    }

    /// Deliver every buffered event in emission order. Returns the count.
    pub fn deliver(&mut self) -> usize {
        let events = std::mem::take(&mut self.pending);
        let count = events.len();
        for event in events {
            for listener in &mut self.listeners[event.kind().index()] {
                listener(&event);
            }
            if self.history.len() == self.history_capacity {
                self.history.pop_front();
            }
            self.history.push_back(event);
        }
        count
    }

    pub fn pending(&self) -> &[SystemEvent] {
        &self.pending
    }

    /// Delivered events, oldest first.
    pub fn history(&self) -> impl Iterator<Item = &SystemEvent> {
        self.history.iter()
    }

    pub fn clear_history(&mut self) {
        self.history.clear();
    }
}
