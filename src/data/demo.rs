//! Sample events shown when the store has nothing located to offer.

use crate::data::event::{Event, Price};
use chrono::{TimeZone, Utc};
use once_cell::sync::Lazy;

pub static DEMO_EVENTS: Lazy<Vec<Event>> = Lazy::new(|| {
    vec![
        Event {
            id: "test1".into(),
            title: "Festival de Música de Verão".into(),
            description: "Um incrível festival de música ao ar livre com artistas nacionais e internacionais.".into(),
            category: "música".into(),
            event_type: "cultural".into(),
            latitude: Some(38.7589),
            longitude: Some(-9.1507),
            datetime: Utc.with_ymd_and_hms(2025, 7, 15, 18, 0, 0).single(),
            location: "Parque da Cidade, Lisboa".into(),
            organizer: "Câmara Municipal de Lisboa".into(),
            participants: Vec::new(),
            price: Some(Price::Text("Gratuito".into())),
            image_url: Some("https://images.unsplash.com/photo-1470229722913-7c0e2dbbafd3?w=800".into()),
        },
        Event {
            id: "test2".into(),
            title: "Workshop de Programação React Native".into(),
            description: "Aprenda a desenvolver aplicações móveis com React Native neste workshop prático.".into(),
            category: "tecnologia".into(),
            event_type: "workshop".into(),
            latitude: Some(41.1579),
            longitude: Some(-8.6291),
            datetime: Utc.with_ymd_and_hms(2025, 8, 10, 9, 0, 0).single(),
            location: "Centro de Inovação, Porto".into(),
            organizer: "TechHub Porto".into(),
            participants: Vec::new(),
            price: Some(Price::Text("€50".into())),
            image_url: Some("https://images.unsplash.com/photo-1517077304055-6e89abbf09b0?w=800".into()),
        },
        Event {
            id: "test3".into(),
            title: "Feira Gastronômica Internacional".into(),
            description: "Experimente sabores de todo o mundo nesta feira gastronômica especial.".into(),
            category: "gastronomia".into(),
            event_type: "cultural".into(),
            latitude: Some(38.7071),
            longitude: Some(-9.1364),
            datetime: Utc.with_ymd_and_hms(2025, 7, 25, 11, 0, 0).single(),
            location: "Praça do Comércio, Lisboa".into(),
            organizer: "Turismo de Lisboa".into(),
            participants: Vec::new(),
            price: Some(Price::Text("Gratuito".into())),
            image_url: Some("https://images.unsplash.com/photo-1414235077428-338989a2e8c0?w=800".into()),
        },
    ]
});

/// Owned copy of the demo events
pub fn demo_events() -> Vec<Event> {
    DEMO_EVENTS.clone()
}
