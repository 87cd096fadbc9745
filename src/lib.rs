//! # eventmap
//!
//! Map-discovery core for an events app: loads events, filters them,
//! clusters them for the visible region and turns marker and cluster taps
//! into camera moves, selections and member listings.
//!
//! Rendering is left to the host, which implements [`ui::MapSurface`] and
//! forwards viewport changes and taps to [`EventMap`].

pub mod core;
pub mod data;
pub mod directions;
pub mod input;
pub mod location;
pub mod prelude;
#[cfg(feature = "tokio-runtime")]
pub mod runtime;
pub mod spatial;
pub mod ui;
pub use crate::core::constants;

// Re-export public API
pub use core::{
    builder::EventMapBuilder,
    camera::{CameraCommand, CameraController},
    clock::{Clock, ManualClock, SystemClock},
    config::EventMapConfig,
    geo::{LatLng, LatLngBounds},
    map::EventMap,
    region::Region,
};

pub use data::{
    event::{Event, Price},
    filter::EventFilter,
    loader::EventSource,
    store::{EventStore, HttpEventStore, MemoryEventStore},
};

pub use input::{MapAction, MapAlert};

pub use spatial::clustering::{ClusterFeature, ClusterId, Clustering};

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, EventMapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum EventMapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Location unavailable: {0}")]
    LocationUnavailable(String),

    #[error("Event store error: {0}")]
    Store(String),

    #[error("Config error: {0}")]
    Config(String),
}

/// Error type alias for convenience
pub type Error = EventMapError;
