use crate::{data::event::Event, EventMapError, Result};
use async_trait::async_trait;
use std::sync::Mutex;
use std::time::Duration;

/// Read access to the event collection
#[async_trait]
pub trait EventStore: Send + Sync {
    /// All events, oldest first
    async fn fetch_events(&self) -> Result<Vec<Event>>;

    async fn fetch_event(&self, id: &str) -> Result<Option<Event>> {
        Ok(self
            .fetch_events()
            .await?
            .into_iter()
            .find(|event| event.id == id))
    }
}

/// Orders events by start time, undated ones last
pub fn sort_chronologically(events: &mut [Event]) {
    events.sort_by(|a, b| match (&a.datetime, &b.datetime) {
        (Some(a), Some(b)) => a.cmp(b),
        (Some(_), None) => std::cmp::Ordering::Less,
        (None, Some(_)) => std::cmp::Ordering::Greater,
        (None, None) => std::cmp::Ordering::Equal,
    });
}

/// Decodes each record on its own so a malformed one is dropped instead of
/// failing the whole collection. Records without an id are dropped as well.
pub fn decode_events(records: Vec<serde_json::Value>) -> Vec<Event> {
    records
        .into_iter()
        .filter_map(|record| match serde_json::from_value::<Event>(record) {
            Ok(event) if event.id.is_empty() => {
                log::warn!("dropping event without id: {:?}", event.title);
                None
            }
            Ok(event) => Some(event),
            Err(e) => {
                log::debug!("dropping malformed event record: {}", e);
                None
            }
        })
        .collect()
}

/// Fetches the collection as a JSON array over HTTP
#[derive(Debug, Clone)]
pub struct HttpEventStore {
    client: reqwest::Client,
    url: String,
}

impl HttpEventStore {
    pub fn new(url: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("eventmap/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self::with_client(client, url))
    }

    pub fn with_client(client: reqwest::Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl EventStore for HttpEventStore {
    async fn fetch_events(&self) -> Result<Vec<Event>> {
        log::debug!("fetching events from {}", self.url);
        let response = self.client.get(&self.url).send().await?.error_for_status()?;
        let records: Vec<serde_json::Value> = response.json().await?;
        let total = records.len();
        let mut events = decode_events(records);
        if events.len() < total {
            log::warn!("skipped {} unreadable events", total - events.len());
        }
        sort_chronologically(&mut events);
        log::info!("fetched {} events from {}", events.len(), self.url);
        Ok(events)
    }
}

/// In-process store, handy for tests and offline demos
#[derive(Debug, Default)]
pub struct MemoryEventStore {
    events: Mutex<Vec<Event>>,
    failure: Mutex<Option<String>>,
}

impl MemoryEventStore {
    pub fn new(events: Vec<Event>) -> Self {
        Self {
            events: Mutex::new(events),
            failure: Mutex::new(None),
        }
    }

    /// A store whose every fetch fails with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        let store = Self::default();
        store.set_failure(Some(message.into()));
        store
    }

    pub fn set_events(&self, events: Vec<Event>) {
        *self.events.lock().unwrap_or_else(|e| e.into_inner()) = events;
    }

    /// Makes subsequent fetches fail, or succeed again with `None`
    pub fn set_failure(&self, message: Option<String>) {
        *self.failure.lock().unwrap_or_else(|e| e.into_inner()) = message;
    }
}

#[async_trait]
impl EventStore for MemoryEventStore {
    async fn fetch_events(&self) -> Result<Vec<Event>> {
        if let Some(message) = self
            .failure
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
        {
            return Err(EventMapError::Store(message));
        }
        let mut events = self
            .events
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone();
        sort_chronologically(&mut events);
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn dated(id: &str, day: u32) -> Event {
        Event::new(id, id).with_datetime(Utc.with_ymd_and_hms(2025, 7, day, 18, 0, 0).unwrap())
    }

    #[test]
    fn test_sort_chronologically() {
        let mut events = vec![dated("late", 25), Event::new("undated", "u"), dated("early", 15)];
        sort_chronologically(&mut events);
        let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["early", "late", "undated"]);
    }

    #[tokio::test]
    async fn test_memory_store() {
        let store = MemoryEventStore::new(vec![dated("b", 20), dated("a", 10)]);
        let events = store.fetch_events().await.unwrap();
        assert_eq!(events[0].id, "a");
        assert_eq!(store.fetch_event("b").await.unwrap().map(|e| e.id), Some("b".into()));
        assert!(store.fetch_event("zzz").await.unwrap().is_none());

        store.set_failure(Some("offline".into()));
        assert!(matches!(store.fetch_events().await, Err(EventMapError::Store(_))));
        store.set_failure(None);
        assert!(store.fetch_events().await.is_ok());
    }

    #[test]
    fn test_malformed_record_is_dropped() {
        let records: Vec<serde_json::Value> = serde_json::from_str(
            r#"[
                { "id": "ok1", "title": "Fado", "latitude": 38.71, "longitude": -9.13 },
                { "id": "bad", "title": "Broken", "latitude": "38.72", "longitude": -9.14 },
                { "id": "ok2", "title": "Feira", "latitude": 38.73, "longitude": -9.15 },
                { "title": "No id", "latitude": 38.74, "longitude": -9.16 }
            ]"#,
        )
        .unwrap();
        let events = decode_events(records);
        let ids: Vec<&str> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["ok1", "ok2"]);
    }

    #[test]
    fn test_http_store_builds() {
        let store = HttpEventStore::new("http://localhost:9/events").unwrap();
        assert_eq!(store.url(), "http://localhost:9/events");
    }
}
