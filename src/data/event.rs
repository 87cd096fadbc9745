use crate::{core::geo::LatLng, spatial::index::SpatialItem};
use chrono::{DateTime, Local, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// An event as stored in the document database
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Event {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: String,
    #[serde(rename = "type")]
    pub event_type: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub datetime: Option<DateTime<Utc>>,
    /// Address text
    pub location: String,
    pub organizer: String,
    /// User ids of everyone taking part
    pub participants: Vec<String>,
    pub price: Option<Price>,
    pub image_url: Option<String>,
}

impl Event {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            ..Default::default()
        }
    }

    pub fn at(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    pub fn with_datetime(mut self, datetime: DateTime<Utc>) -> Self {
        self.datetime = Some(datetime);
        self
    }

    pub fn with_price(mut self, price: Price) -> Self {
        self.price = Some(price);
        self
    }

    /// Coordinates, if both are present and on the globe
    pub fn position(&self) -> Option<LatLng> {
        let position = LatLng::new(self.latitude?, self.longitude?);
        position.is_valid().then_some(position)
    }

    pub fn has_position(&self) -> bool {
        self.position().is_some()
    }

    /// Start day as `dd/mm/yyyy` in the device timezone
    pub fn formatted_date(&self) -> Option<String> {
        self.formatted_date_in(&Local)
    }

    pub fn formatted_date_in<Tz: TimeZone>(&self, tz: &Tz) -> Option<String>
    where
        Tz::Offset: fmt::Display,
    {
        let local = self.datetime?.with_timezone(tz);
        Some(local.format("%d/%m/%Y").to_string())
    }

    /// Start time as `HH:MM` in the device timezone
    pub fn formatted_time(&self) -> Option<String> {
        self.formatted_time_in(&Local)
    }

    pub fn formatted_time_in<Tz: TimeZone>(&self, tz: &Tz) -> Option<String>
    where
        Tz::Offset: fmt::Display,
    {
        let local = self.datetime?.with_timezone(tz);
        Some(local.format("%H:%M").to_string())
    }

    pub fn participant_count(&self) -> usize {
        self.participants.len()
    }

    pub fn formatted_price(&self) -> String {
        format_price(self.price.as_ref())
    }

    pub fn is_free(&self) -> bool {
        self.price.as_ref().and_then(Price::amount).is_none()
    }

    pub fn to_spatial_item(&self) -> Option<SpatialItem<Event>> {
        let position = self.position()?;
        Some(SpatialItem::new(self.id.clone(), position, self.clone()))
    }

    /// Case-insensitive substring match on title, description, address and organizer
    pub fn matches_query(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }
        [
            &self.title,
            &self.description,
            &self.location,
            &self.organizer,
        ]
        .iter()
        .any(|field| field.to_lowercase().contains(&query))
    }
}

/// Price as entered by organizers: a number or free text such as "€50"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Price {
    Amount(f64),
    Text(String),
}

impl Price {
    /// Positive amount to pay, `None` when the event is free
    pub fn amount(&self) -> Option<f64> {
        let amount = match self {
            Price::Amount(amount) => *amount,
            Price::Text(text) => {
                let lower = text.to_lowercase();
                if lower.contains("gratuito") || lower.contains("free") {
                    return None;
                }
                leading_number(text.trim().trim_start_matches('€').trim())?
            }
        };
        (amount.is_finite() && amount > 0.0).then_some(amount)
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_price(Some(self)))
    }
}

/// "Free", or the amount in euros with a trailing ".00" dropped
pub fn format_price(price: Option<&Price>) -> String {
    match price.and_then(Price::amount) {
        Some(amount) => format!("€{}", format!("{:.2}", amount).replace(".00", "")),
        None => "Free".to_string(),
    }
}

/// Parses the longest numeric prefix, so "12.5 euros" reads as 12.5
fn leading_number(text: &str) -> Option<f64> {
    let text = text.replace(',', ".");
    let end = text
        .char_indices()
        .find(|&(i, c)| !(c.is_ascii_digit() || c == '.' || (i == 0 && (c == '-' || c == '+'))))
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    let mut prefix = &text[..end];
    while !prefix.is_empty() {
        if let Ok(value) = prefix.parse::<f64>() {
            return Some(value);
        }
        prefix = &prefix[..prefix.len() - 1];
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    #[test]
    fn test_deserialize_wire_format() {
        let json = r#"{
            "id": "abc",
            "title": "Jazz no Parque",
            "category": "música",
            "type": "cultural",
            "latitude": 38.7589,
            "longitude": -9.1507,
            "datetime": "2025-07-15T18:00:00Z",
            "participants": ["u1", "u2"],
            "price": "€50",
            "imageUrl": "https://example.com/a.jpg",
            "unknownField": 1
        }"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event.event_type, "cultural");
        assert_eq!(event.participant_count(), 2);
        assert_eq!(event.image_url.as_deref(), Some("https://example.com/a.jpg"));
        assert_eq!(event.position(), Some(LatLng::new(38.7589, -9.1507)));
        assert_eq!(event.formatted_price(), "€50");
        assert!(event.datetime.is_some());
    }

    #[test]
    fn test_missing_or_invalid_coordinates() {
        let event: Event = serde_json::from_str(r#"{ "id": "x", "latitude": null }"#).unwrap();
        assert!(event.position().is_none());
        assert!(event.to_spatial_item().is_none());

        assert!(Event::new("a", "A").at(95.0, 0.0).position().is_none());
        assert!(Event::new("a", "A").at(f64::NAN, 0.0).position().is_none());
        // Zero is a real coordinate
        assert!(Event::new("a", "A").at(0.0, 0.0).position().is_some());
    }

    #[test]
    fn test_price_formatting() {
        assert_eq!(format_price(None), "Free");
        assert_eq!(format_price(Some(&Price::Amount(0.0))), "Free");
        assert_eq!(format_price(Some(&Price::Amount(-3.0))), "Free");
        assert_eq!(format_price(Some(&Price::Text("Gratuito".into()))), "Free");
        assert_eq!(format_price(Some(&Price::Text("abc".into()))), "Free");
        assert_eq!(format_price(Some(&Price::Amount(25.0))), "€25");
        assert_eq!(format_price(Some(&Price::Amount(12.5))), "€12.50");
        assert_eq!(format_price(Some(&Price::Text("€50".into()))), "€50");
        assert_eq!(format_price(Some(&Price::Text("7,5 euros".into()))), "€7.50");
    }

    #[test]
    fn test_date_and_time_formatting() {
        let event = Event::new("1", "Santos Populares")
            .with_datetime(Utc.with_ymd_and_hms(2025, 6, 12, 23, 30, 0).unwrap());
        assert_eq!(event.formatted_date_in(&Utc).as_deref(), Some("12/06/2025"));
        assert_eq!(event.formatted_time_in(&Utc).as_deref(), Some("23:30"));

        // Summer time in Lisbon pushes it past midnight
        let lisbon = FixedOffset::east_opt(3600).unwrap();
        assert_eq!(event.formatted_date_in(&lisbon).as_deref(), Some("13/06/2025"));
        assert_eq!(event.formatted_time_in(&lisbon).as_deref(), Some("00:30"));

        let undated = Event::new("2", "TBA");
        assert!(undated.formatted_date().is_none());
        assert!(undated.formatted_time().is_none());
    }

    #[test]
    fn test_matches_query() {
        let mut event = Event::new("1", "Feira Gastronômica");
        event.organizer = "Turismo de Lisboa".into();
        assert!(event.matches_query("feira"));
        assert!(event.matches_query("LISBOA"));
        assert!(event.matches_query("  "));
        assert!(!event.matches_query("porto"));
    }
}
