use crate::{core::camera::CameraCommand, data::event::Event};

/// A UI effect produced by the map; the rendering surface carries it out
#[derive(Debug, Clone, PartialEq)]
pub enum MapAction {
    AnimateCamera(CameraCommand),
    SelectEvent(Event),
    ShowClusterList(ClusterListing),
    ShowAlert(MapAlert),
    /// Transient hint such as "tap again to see the events"
    ShowHint(String),
}

impl MapAction {
    pub fn camera(&self) -> Option<&CameraCommand> {
        match self {
            MapAction::AnimateCamera(command) => Some(command),
            _ => None,
        }
    }

    pub fn listing(&self) -> Option<&ClusterListing> {
        match self {
            MapAction::ShowClusterList(listing) => Some(listing),
            _ => None,
        }
    }

    pub fn selected(&self) -> Option<&Event> {
        match self {
            MapAction::SelectEvent(event) => Some(event),
            _ => None,
        }
    }
}

/// One tappable row of a cluster listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingEntry {
    pub event_id: String,
    /// Title, cut to fit
    pub label: String,
}

/// "View all" row: opens the full member list elsewhere in the app
#[derive(Debug, Clone, PartialEq)]
pub struct ViewAll {
    pub label: String,
    /// Title for the screen that lists every member
    pub title: String,
    pub events: Vec<Event>,
}

/// Popup listing the members of a cluster
#[derive(Debug, Clone, PartialEq)]
pub struct ClusterListing {
    pub title: String,
    pub message: String,
    pub entries: Vec<ListingEntry>,
    pub view_all: Option<ViewAll>,
}

impl ClusterListing {
    /// Lists the first `limit` members; a "view all" row covers the rest
    pub fn new(members: &[Event], limit: usize, title_limit: usize) -> Self {
        let count = members.len();
        let entries = members
            .iter()
            .take(limit)
            .map(|event| ListingEntry {
                event_id: event.id.clone(),
                label: truncate_title(&event.title, title_limit),
            })
            .collect();

        let view_all = (count > limit).then(|| ViewAll {
            label: format!("View all {} events", count),
            title: format!("{} events in this area", count),
            events: members.to_vec(),
        });

        let message = match members {
            [only] => only.title.clone(),
            _ => format!("{} events found", count),
        };

        Self {
            title: "Events in this area".to_string(),
            message,
            entries,
            view_all,
        }
    }

    pub fn labels(&self) -> Vec<&str> {
        self.entries.iter().map(|entry| entry.label.as_str()).collect()
    }
}

/// Cuts `title` to `limit` characters and appends "..." when it was longer
pub fn truncate_title(title: &str, limit: usize) -> String {
    if title.chars().count() <= limit {
        return title.to_string();
    }
    let mut cut: String = title.chars().take(limit).collect();
    cut.push_str("...");
    cut
}

/// Informational alerts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapAlert {
    /// Location permission was refused when first asked
    LocationPermission,
    /// Centering on the user is impossible without permission
    LocationUnavailable,
    /// Directions were requested with nothing selected
    NoEventSelected,
    /// The selected event has no coordinates to navigate to
    NoDestination,
}

impl MapAlert {
    pub fn title(&self) -> &'static str {
        match self {
            MapAlert::LocationPermission => "Location permission",
            MapAlert::LocationUnavailable => "Location unavailable",
            MapAlert::NoEventSelected | MapAlert::NoDestination => "Error",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            MapAlert::LocationPermission => {
                "For a better experience, allow access to your location to see events nearby."
            }
            MapAlert::LocationUnavailable => "Allow location access to use this feature.",
            MapAlert::NoEventSelected => "No event selected",
            MapAlert::NoDestination => "Location not available",
        }
    }
}
