//! The state container. Events are the only way in; snapshots and the event
//! stream are the only ways out.

use parking_lot::RwLock;
use shared::{event::Event, state::AppState};
use tokio::sync::broadcast;
use tracing::debug;

const EVENT_BUFFER: usize = 1024;

pub struct Store {
    state: RwLock<AppState>,
    events: broadcast::Sender<Event>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new(AppState::default())
    }
}

impl Store {
    pub fn new(initial: AppState) -> Self {
        let (events, _) = broadcast::channel(EVENT_BUFFER);
        Self {
            state: RwLock::new(initial),
            events,
        }
    }

    /// Applies `event` and publishes it. Subscribers see events in the same
    /// order the reducer applied them.
    pub fn dispatch(&self, event: Event) {
        let mut state = self.state.write();
        state.apply(&event);
        debug!(event = event.name(), "dispatched event");
        // No subscribers is fine; the state already reflects the event.
        let _ = self.events.send(event);
    }

    pub fn snapshot(&self) -> AppState {
        self.state.read().clone()
    }

    pub fn read<R>(&self, f: impl FnOnce(&AppState) -> R) -> R {
        f(&self.state.read())
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }
}

#[cfg(test)]
#[path = "tests/store_tests.rs"]
mod tests;
