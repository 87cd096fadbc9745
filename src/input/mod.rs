pub mod events;
pub mod handler;

// Re-export the essential types
pub use events::{ClusterListing, ListingEntry, MapAction, MapAlert, ViewAll};
pub use handler::{ClusterTap, InteractionController, PendingTap, TapState};
