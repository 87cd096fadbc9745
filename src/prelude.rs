//! Prelude module for common eventmap types and traits
//!
//! Re-exports what a host needs to drive the map, for importing with
//! `use eventmap::prelude::*;`

pub use crate::core::{
    builder::EventMapBuilder,
    camera::{zoom_factor, CameraCommand, CameraController},
    clock::{Clock, ManualClock, SystemClock},
    config::{CameraConfig, EventMapConfig, InteractionConfig},
    geo::{LatLng, LatLngBounds, Point},
    map::EventMap,
    region::Region,
};

pub use crate::data::{
    category::{marker_color, Category, CATEGORIES},
    demo::DEMO_EVENTS,
    event::{format_price, Event, Price},
    filter::EventFilter,
    loader::{EventLoader, EventSource, LoadOutcome},
    store::{EventStore, HttpEventStore, MemoryEventStore},
};

pub use crate::directions::{directions_links, web_directions_url, DirectionsLink, MapsApp, Platform};

pub use crate::input::{
    events::{ClusterListing, ListingEntry, MapAction, MapAlert, ViewAll},
    handler::{ClusterTap, InteractionController, TapState},
};

pub use crate::location::{FixedLocationProvider, LocationProvider, PermissionStatus};

pub use crate::spatial::{
    clustering::{ClusterFeature, ClusterId, Clustering, ClusteringConfig},
    index::SpatialItem,
};

pub use crate::ui::surface::{dispatch, MapSurface};

#[cfg(feature = "tokio-runtime")]
pub use crate::runtime::{drain_deadlines, fire_next_deadline};

pub use crate::{EventMapError, Result};

pub use std::{sync::Arc, time::Duration};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet, FxHasher};
