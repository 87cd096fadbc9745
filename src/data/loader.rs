use crate::data::{demo::demo_events, event::Event, store::EventStore};
use std::sync::Arc;

/// Where the currently loaded events came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventSource {
    Store,
    Demo,
    /// A refresh failed and the earlier events were kept
    Previous,
}

#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub events: Vec<Event>,
    pub source: EventSource,
}

/// Fetches events and decides what to show when the store lets us down
pub struct EventLoader {
    store: Arc<dyn EventStore>,
}

impl EventLoader {
    pub fn new(store: Arc<dyn EventStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn EventStore> {
        &self.store
    }

    /// Loads events, keeping only those with usable coordinates.
    ///
    /// `previous` is what is on screen right now; it survives a failed refresh.
    /// With nothing located to show, the demo events are used instead.
    pub async fn load(&self, previous: &[Event]) -> LoadOutcome {
        match self.store.fetch_events().await {
            Ok(events) => {
                let total = events.len();
                let located: Vec<Event> = events.into_iter().filter(Event::has_position).collect();
                log::info!("{} of {} events have coordinates", located.len(), total);

                if located.is_empty() {
                    log::info!("no located events in the store, showing demo events");
                    return Self::demo();
                }
                LoadOutcome {
                    events: located,
                    source: EventSource::Store,
                }
            }
            Err(e) if !previous.is_empty() => {
                log::warn!("refreshing events failed, keeping {} loaded: {}", previous.len(), e);
                LoadOutcome {
                    events: previous.to_vec(),
                    source: EventSource::Previous,
                }
            }
            Err(e) => {
                log::error!("loading events failed: {}", e);
                Self::demo()
            }
        }
    }

    fn demo() -> LoadOutcome {
        LoadOutcome {
            events: demo_events(),
            source: EventSource::Demo,
        }
    }
}
