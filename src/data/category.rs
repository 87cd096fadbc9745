use crate::core::constants::DEFAULT_MARKER_COLOR;

/// An event category the map can filter on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    pub id: &'static str,
    pub name: &'static str,
    /// Marker color as a hex string
    pub color: &'static str,
}

pub const CATEGORIES: [Category; 8] = [
    Category { id: "música", name: "Música", color: "#ef4444" },
    Category { id: "tecnologia", name: "Tecnologia", color: "#3b82f6" },
    Category { id: "esportes", name: "Esportes", color: "#10b981" },
    Category { id: "arte", name: "Arte", color: "#f59e0b" },
    Category { id: "gastronomia", name: "Gastronomia", color: "#8b5cf6" },
    Category { id: "educação", name: "Educação", color: "#06b6d4" },
    Category { id: "negócios", name: "Negócios", color: "#6366f1" },
    Category { id: "saúde", name: "Saúde", color: "#84cc16" },
];

/// Looks a category up by id, ignoring case
pub fn find_category(id: &str) -> Option<&'static Category> {
    let id = id.trim().to_lowercase();
    CATEGORIES.iter().find(|category| category.id == id)
}

/// Marker color for an event category, falling back to the default color
pub fn marker_color(category: &str) -> &'static str {
    find_category(category)
        .map(|category| category.color)
        .unwrap_or(DEFAULT_MARKER_COLOR)
}
