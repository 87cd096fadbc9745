use crate::data::event::Event;
use serde::{Deserialize, Serialize};

/// Category and free-text criteria applied before clustering
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EventFilter {
    /// Lowercase category ids; empty means every category
    pub categories: Vec<String>,
    pub query: String,
}

impl EventFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.toggle_category(category);
        self
    }

    /// Adds the category if absent, removes it otherwise
    pub fn toggle_category(&mut self, category: &str) {
        let category = category.trim().to_lowercase();
        if let Some(pos) = self.categories.iter().position(|c| *c == category) {
            self.categories.remove(pos);
        } else {
            self.categories.push(category);
        }
    }

    pub fn clear(&mut self) {
        self.categories.clear();
        self.query.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.active_count() == 0
    }

    /// Number of criteria in use: categories and query count once each
    pub fn active_count(&self) -> usize {
        usize::from(!self.categories.is_empty()) + usize::from(!self.query.trim().is_empty())
    }

    pub fn matches(&self, event: &Event) -> bool {
        let category_ok = self.categories.is_empty()
            || self
                .categories
                .iter()
                .any(|c| *c == event.category.to_lowercase());
        category_ok && event.matches_query(&self.query)
    }

    pub fn apply(&self, events: &[Event]) -> Vec<Event> {
        events
            .iter()
            .filter(|event| self.matches(event))
            .cloned()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events() -> Vec<Event> {
        vec![
            Event::new("1", "Festival de Verão").with_category("Música"),
            Event::new("2", "Workshop React Native").with_category("tecnologia"),
            Event::new("3", "Feira Gastronômica").with_category("gastronomia"),
        ]
    }

    #[test]
    fn test_empty_filter_keeps_everything() {
        let filter = EventFilter::new();
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&events()).len(), 3);
    }

    #[test]
    fn test_category_filter_ignores_case() {
        let filter = EventFilter::new().with_category("MÚSICA");
        let kept = filter.apply(&events());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "1");
    }

    #[test]
    fn test_query_and_category_combine() {
        let filter = EventFilter::new()
            .with_category("tecnologia")
            .with_category("gastronomia")
            .with_query("feira");
        assert_eq!(filter.active_count(), 2);
        let kept = filter.apply(&events());
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].id, "3");
    }

    #[test]
    fn test_toggle_and_clear() {
        let mut filter = EventFilter::new();
        filter.toggle_category("arte");
        assert_eq!(filter.categories, vec!["arte".to_string()]);
        filter.toggle_category("Arte");
        assert!(filter.categories.is_empty());

        filter.query = "x".into();
        filter.clear();
        assert_eq!(filter.active_count(), 0);
    }
}
