//! Observable session state store
//!
//! Holds the single shared `SessionState` snapshot and fans every
//! mutation out to registered observers, synchronously and in
//! registration order.

use std::sync::Mutex;

use crate::domain::state::{SessionState, StatePatch};

type Observer = Box<dyn Fn(&SessionState) + Send>;

/// Handle returned by `subscribe`, used to unregister later
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObserverId(u64);

struct Store {
    state: SessionState,
    observers: Vec<(u64, Observer)>,
    next_id: u64,
}

/// Single source of truth for "is something recording right now".
pub struct RecordingStateStore {
    inner: Mutex<Store>,
}

impl RecordingStateStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Store {
                state: SessionState::idle(),
                observers: Vec::new(),
                next_id: 0,
            }),
        }
    }

    /// Current snapshot
    pub fn snapshot(&self) -> SessionState {
        self.inner.lock().unwrap().state
    }

    /// Merge a partial update and notify every observer with the new
    /// snapshot. Observers run before `update` returns, so a caller
    /// observing its own update sees fully consistent state.
    pub fn update(&self, patch: StatePatch) -> SessionState {
        let store = &mut *self.inner.lock().unwrap();
        store.state.apply(&patch);
        for (_, observer) in &store.observers {
            observer(&store.state);
        }
        store.state
    }

    /// Register an observer; it is NOT called with the current state,
    /// only with future updates.
    pub fn subscribe(&self, observer: impl Fn(&SessionState) + Send + 'static) -> ObserverId {
        let store = &mut *self.inner.lock().unwrap();
        let id = store.next_id;
        store.next_id += 1;
        store.observers.push((id, Box::new(observer)));
        ObserverId(id)
    }

    /// Unregister an observer. Unknown ids are ignored.
    pub fn unsubscribe(&self, id: ObserverId) {
        self.inner
            .lock()
            .unwrap()
            .observers
            .retain(|(observer_id, _)| *observer_id != id.0);
    }
}

impl Default for RecordingStateStore {
    fn default() -> Self {
        Self::new()
    }
}
