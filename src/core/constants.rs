//! Core constants for clustering, tap handling and camera movement.
//! Keeping them in a single place makes it easier to tweak engine-wide magic numbers.

/// Cluster merge radius, in pixels at the current zoom.
pub const CLUSTER_RADIUS_PX: f64 = 60.0;

/// Tile extent the cluster radius is measured against.
pub const CLUSTER_EXTENT_PX: f64 = 512.0;

/// Below this zoom the clusters of `MIN_CLUSTER_ZOOM` are reused.
pub const MIN_CLUSTER_ZOOM: u8 = 3;

/// Above this zoom every point is rendered on its own.
pub const MAX_CLUSTER_ZOOM: u8 = 15;

/// Smallest number of points that forms a cluster.
pub const MIN_CLUSTER_POINTS: usize = 2;

/// A cluster tap at or beyond this zoom reveals the member list straight away.
pub const REVEAL_ZOOM: f64 = 15.0;

/// Second tap on the same cluster within this window counts as a double tap.
pub const DOUBLE_TAP_WINDOW_MS: u64 = 500;

/// Member list is revealed automatically this long after a first cluster tap.
pub const AUTO_REVEAL_DELAY_MS: u64 = 1500;

/// Reveals closer together than this are collapsed into one.
pub const REVEAL_GUARD_MS: u64 = 500;

/// Number of members listed before a "view all" entry is added.
pub const CLUSTER_LIST_LIMIT: usize = 5;

/// Listed titles longer than this are cut and suffixed with "...".
pub const LIST_TITLE_LIMIT: usize = 30;

/// Camera animation length for region moves.
pub const REGION_ANIMATION_MS: u64 = 1000;

/// Camera animation length for the zoom into a tapped cluster.
pub const CLUSTER_ANIMATION_MS: u64 = 500;

/// Default latitude span of the map region.
pub const DEFAULT_LATITUDE_DELTA: f64 = 0.0922;

/// Default screen aspect ratio (width / height) used to derive the longitude span.
pub const DEFAULT_ASPECT_RATIO: f64 = 390.0 / 844.0;

/// Default map center: Lisbon.
pub const DEFAULT_CENTER: (f64, f64) = (38.7223, -9.1393);

/// Span used when the map is asked to focus a single event.
pub const FOCUS_DELTA: f64 = 0.01;

/// Marker taps zoom to this fraction of the default span.
pub const MARKER_DELTA_FACTOR: f64 = 0.5;

/// Padding added around all events when fitting them into view.
pub const FIT_PADDING_FACTOR: f64 = 0.2;

/// Fitting never zooms closer than this span.
pub const MIN_FIT_DELTA: f64 = 0.02;

/// Marker color for events without a known category.
pub const DEFAULT_MARKER_COLOR: &str = "#6366f1";
