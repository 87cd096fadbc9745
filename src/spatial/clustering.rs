use crate::prelude::HashMap;
use crate::{
    core::{
        constants::{
            CLUSTER_EXTENT_PX, CLUSTER_RADIUS_PX, MAX_CLUSTER_ZOOM, MIN_CLUSTER_POINTS,
            MIN_CLUSTER_ZOOM,
        },
        geo::{LatLng, LatLngBounds, Point},
    },
    spatial::index::{PointIndex, SpatialItem},
    EventMapError, Result,
};
use fxhash::FxHasher;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identifier of a cluster, derived from the ids of its leaves.
///
/// The same set of leaves always yields the same id, whatever the zoom level,
/// viewport or insertion order that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ClusterId(pub u64);

impl ClusterId {
    pub fn from_leaf_ids<'a>(ids: impl IntoIterator<Item = &'a str>) -> Self {
        let mut ids: Vec<&str> = ids.into_iter().collect();
        ids.sort_unstable();

        let mut hasher = FxHasher::default();
        for id in ids {
            id.hash(&mut hasher);
        }
        Self(hasher.finish())
    }
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cluster_{:016x}", self.0)
    }
}

/// Configuration for clustering
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusteringConfig {
    /// Merge radius in pixels at the queried zoom
    pub radius: f64,
    /// Tile extent the radius is relative to
    pub extent: f64,
    /// Lowest zoom with its own clusters
    pub min_zoom: u8,
    /// Highest zoom with clusters; above it every point stands alone
    pub max_zoom: u8,
    /// Minimum number of points to form a cluster
    pub min_points: usize,
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            radius: CLUSTER_RADIUS_PX,
            extent: CLUSTER_EXTENT_PX,
            min_zoom: MIN_CLUSTER_ZOOM,
            max_zoom: MAX_CLUSTER_ZOOM,
            min_points: MIN_CLUSTER_POINTS,
        }
    }
}

impl ClusteringConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.radius > 0.0 && self.radius.is_finite()) {
            return Err(EventMapError::Config(format!(
                "cluster radius must be positive, got {}",
                self.radius
            )));
        }
        if !(self.extent > 0.0 && self.extent.is_finite()) {
            return Err(EventMapError::Config(format!(
                "cluster extent must be positive, got {}",
                self.extent
            )));
        }
        if self.min_zoom > self.max_zoom || self.max_zoom >= 30 {
            return Err(EventMapError::Config(format!(
                "invalid cluster zoom range {}..={}",
                self.min_zoom, self.max_zoom
            )));
        }
        if self.min_points < 2 {
            return Err(EventMapError::Config(
                "a cluster needs at least 2 points".to_string(),
            ));
        }
        Ok(())
    }
}

/// One renderable feature: either an aggregate marker or a single item
#[derive(Debug, Clone)]
pub enum ClusterFeature<T> {
    Cluster {
        id: ClusterId,
        coordinates: LatLng,
        point_count: usize,
    },
    Point {
        coordinates: LatLng,
        item: SpatialItem<T>,
    },
}

impl<T> ClusterFeature<T> {
    pub fn is_cluster(&self) -> bool {
        matches!(self, ClusterFeature::Cluster { .. })
    }

    pub fn coordinates(&self) -> LatLng {
        match self {
            ClusterFeature::Cluster { coordinates, .. } => *coordinates,
            ClusterFeature::Point { coordinates, .. } => *coordinates,
        }
    }

    /// Number of items behind the feature (1 for a single point)
    pub fn point_count(&self) -> usize {
        match self {
            ClusterFeature::Cluster { point_count, .. } => *point_count,
            ClusterFeature::Point { .. } => 1,
        }
    }

    pub fn cluster_id(&self) -> Option<ClusterId> {
        match self {
            ClusterFeature::Cluster { id, .. } => Some(*id),
            ClusterFeature::Point { .. } => None,
        }
    }

    pub fn item(&self) -> Option<&SpatialItem<T>> {
        match self {
            ClusterFeature::Point { item, .. } => Some(item),
            ClusterFeature::Cluster { .. } => None,
        }
    }
}

#[derive(Debug, Clone)]
enum NodeKind {
    Leaf(usize),
    Cluster {
        id: ClusterId,
        /// Slots in the level one zoom above the one that formed this cluster
        children: Vec<usize>,
        /// Item indices, ascending
        leaves: Vec<usize>,
    },
}

#[derive(Debug, Clone)]
struct Node {
    point: Point,
    count: usize,
    kind: NodeKind,
}

impl Node {
    fn leaf_indices(&self) -> Vec<usize> {
        match &self.kind {
            NodeKind::Leaf(index) => vec![*index],
            NodeKind::Cluster { leaves, .. } => leaves.clone(),
        }
    }
}

struct Level {
    nodes: Vec<Node>,
    index: PointIndex,
}

impl Level {
    fn new(nodes: Vec<Node>) -> Self {
        let index = PointIndex::build(nodes.iter().map(|node| node.point));
        Self { nodes, index }
    }
}

/// Hierarchical greedy marker clustering.
///
/// Items are projected once into unit Web Mercator space. One level is built per
/// zoom from `max_zoom + 1` (raw points) down to `min_zoom`, each level merging
/// the one above it within `radius / (extent * 2^zoom)`.
pub struct Clustering<T> {
    config: ClusteringConfig,
    items: Vec<SpatialItem<T>>,
    /// `levels[0]` is `min_zoom`, the last one is `max_zoom + 1`
    levels: Vec<Level>,
    /// Zoom and slot where each cluster was first formed
    origins: HashMap<ClusterId, (u8, usize)>,
    /// Result of the last viewport query
    last_query: Option<(LatLngBounds, u8, Vec<ClusterFeature<T>>)>,
}

impl<T: Clone> Clustering<T> {
    /// Create a new, empty clustering instance
    pub fn new(config: ClusteringConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::empty(config))
    }

    fn empty(config: ClusteringConfig) -> Self {
        Self {
            config,
            items: Vec::new(),
            levels: Vec::new(),
            origins: HashMap::default(),
            last_query: None,
        }
    }

    /// Replace the indexed items and rebuild every zoom level.
    ///
    /// Items with missing or out-of-range coordinates are dropped.
    pub fn load(&mut self, items: impl IntoIterator<Item = SpatialItem<T>>) {
        self.items = items
            .into_iter()
            .filter(|item| {
                let valid = item.position.is_valid();
                if !valid {
                    log::debug!(
                        "skipping {} with invalid position {:?}",
                        item.id,
                        item.position
                    );
                }
                valid
            })
            .collect();
        self.rebuild();
    }

    /// Clear all items
    pub fn clear(&mut self) {
        self.items.clear();
        self.rebuild();
    }

    fn rebuild(&mut self) {
        self.last_query = None;
        self.origins = HashMap::default();
        self.levels = Vec::new();

        if self.items.is_empty() {
            return;
        }

        let leaves: Vec<Node> = self
            .items
            .iter()
            .enumerate()
            .map(|(index, item)| Node {
                point: item.position.to_unit_mercator(),
                count: 1,
                kind: NodeKind::Leaf(index),
            })
            .collect();

        let mut origins = HashMap::default();
        let mut levels = vec![Level::new(leaves)];
        for zoom in (self.config.min_zoom..=self.config.max_zoom).rev() {
            let next = match levels.last() {
                Some(prev) => self.cluster_level(prev, zoom, &mut origins),
                None => break,
            };
            levels.push(next);
        }
        levels.reverse();

        log::debug!(
            "clustered {} items into {} clusters across zooms {}..={}",
            self.items.len(),
            origins.len(),
            self.config.min_zoom,
            self.config.max_zoom
        );

        self.levels = levels;
        self.origins = origins;
    }

    /// Merge the level above `zoom` into the level at `zoom`
    fn cluster_level(
        &self,
        prev: &Level,
        zoom: u8,
        origins: &mut HashMap<ClusterId, (u8, usize)>,
    ) -> Level {
        let radius = self.config.radius / (self.config.extent * 2_f64.powi(zoom as i32));
        let mut visited = vec![false; prev.nodes.len()];
        let mut nodes = Vec::with_capacity(prev.nodes.len());

        for i in 0..prev.nodes.len() {
            if visited[i] {
                continue;
            }
            visited[i] = true;

            let node = &prev.nodes[i];
            let neighbors: Vec<usize> = prev
                .index
                .within(&node.point, radius)
                .into_iter()
                .filter(|&j| !visited[j])
                .collect();
            let count = node.count
                + neighbors
                    .iter()
                    .map(|&j| prev.nodes[j].count)
                    .sum::<usize>();

            if !neighbors.is_empty() && count >= self.config.min_points {
                let mut wx = node.point.x * node.count as f64;
                let mut wy = node.point.y * node.count as f64;
                let mut children = Vec::with_capacity(neighbors.len() + 1);
                children.push(i);
                let mut leaves = node.leaf_indices();

                for &j in &neighbors {
                    visited[j] = true;
                    let neighbor = &prev.nodes[j];
                    wx += neighbor.point.x * neighbor.count as f64;
                    wy += neighbor.point.y * neighbor.count as f64;
                    children.push(j);
                    leaves.extend(neighbor.leaf_indices());
                }
                leaves.sort_unstable();

                let id =
                    ClusterId::from_leaf_ids(leaves.iter().map(|&l| self.items[l].id.as_str()));
                origins.entry(id).or_insert((zoom, nodes.len()));

                nodes.push(Node {
                    point: Point::new(wx / count as f64, wy / count as f64),
                    count,
                    kind: NodeKind::Cluster {
                        id,
                        children,
                        leaves,
                    },
                });
            } else {
                nodes.push(node.clone());
                if count > 1 {
                    for &j in &neighbors {
                        visited[j] = true;
                        nodes.push(prev.nodes[j].clone());
                    }
                }
            }
        }

        Level::new(nodes)
    }

    /// Rounds and clamps a continuous zoom onto a built level
    pub fn limit_zoom(&self, zoom: f64) -> u8 {
        let min = self.config.min_zoom as f64;
        let max = self.config.max_zoom as f64 + 1.0;
        if zoom.is_nan() {
            return self.config.min_zoom;
        }
        zoom.round().max(min).min(max) as u8
    }

    fn level(&self, zoom: u8) -> Option<&Level> {
        let top = self.config.max_zoom.saturating_add(1);
        let zoom = zoom.max(self.config.min_zoom).min(top);
        self.levels.get(zoom.checked_sub(self.config.min_zoom)? as usize)
    }

    /// Clusters and single points visible in `bounds` at `zoom`.
    ///
    /// Repeating the last query returns the cached result.
    pub fn get_clusters(&mut self, bounds: &LatLngBounds, zoom: f64) -> Vec<ClusterFeature<T>> {
        let zoom = self.limit_zoom(zoom);

        if let Some((last_bounds, last_zoom, features)) = &self.last_query {
            if last_bounds == bounds && *last_zoom == zoom {
                return features.clone();
            }
        }

        let features = self.query(bounds, zoom);
        self.last_query = Some((*bounds, zoom, features.clone()));
        features
    }

    fn query(&self, bounds: &LatLngBounds, zoom: u8) -> Vec<ClusterFeature<T>> {
        let south = bounds.south().clamp(-90.0, 90.0);
        let north = bounds.north().clamp(-90.0, 90.0);

        if bounds.east() - bounds.west() >= 360.0 {
            return self.query_range(-180.0, south, 180.0, north, zoom);
        }

        let west = LatLng::wrap_lng(bounds.west());
        let east = if bounds.east() == 180.0 {
            180.0
        } else {
            LatLng::wrap_lng(bounds.east())
        };

        if west > east {
            // Crosses the antimeridian
            let mut features = self.query_range(west, south, 180.0, north, zoom);
            features.extend(self.query_range(-180.0, south, east, north, zoom));
            return features;
        }

        self.query_range(west, south, east, north, zoom)
    }

    fn query_range(
        &self,
        west: f64,
        south: f64,
        east: f64,
        north: f64,
        zoom: u8,
    ) -> Vec<ClusterFeature<T>> {
        let Some(level) = self.level(zoom) else {
            return Vec::new();
        };

        let top_left = LatLng::new(north, west).to_unit_mercator();
        let bottom_right = LatLng::new(south, east).to_unit_mercator();
        level
            .index
            .query(top_left, bottom_right)
            .into_iter()
            .map(|slot| self.feature(&level.nodes[slot]))
            .collect()
    }

    fn feature(&self, node: &Node) -> ClusterFeature<T> {
        match &node.kind {
            NodeKind::Leaf(index) => {
                let item = &self.items[*index];
                ClusterFeature::Point {
                    coordinates: item.position,
                    item: item.clone(),
                }
            }
            NodeKind::Cluster { id, .. } => ClusterFeature::Cluster {
                id: *id,
                coordinates: LatLng::from_unit_mercator(node.point),
                point_count: node.count,
            },
        }
    }

    fn origin_node(&self, id: ClusterId) -> Option<(u8, &Node)> {
        let (zoom, slot) = *self.origins.get(&id)?;
        let node = self.level(zoom)?.nodes.get(slot)?;
        Some((zoom, node))
    }

    /// The cluster feature for an id, as it was first formed
    pub fn cluster(&self, id: ClusterId) -> Option<ClusterFeature<T>> {
        self.origin_node(id).map(|(_, node)| self.feature(node))
    }

    /// Every item of a cluster, in load order
    pub fn leaves(&self, id: ClusterId) -> Option<Vec<&SpatialItem<T>>> {
        let (_, node) = self.origin_node(id)?;
        Some(
            node.leaf_indices()
                .into_iter()
                .map(|index| &self.items[index])
                .collect(),
        )
    }

    /// Features the cluster splits into one zoom level further in
    pub fn children(&self, id: ClusterId) -> Option<Vec<ClusterFeature<T>>> {
        let (zoom, node) = self.origin_node(id)?;
        let NodeKind::Cluster { children, .. } = &node.kind else {
            return None;
        };
        let level = self.level(zoom.checked_add(1)?)?;
        Some(
            children
                .iter()
                .map(|&slot| self.feature(&level.nodes[slot]))
                .collect(),
        )
    }

    /// Zoom level at which the cluster breaks apart
    pub fn expansion_zoom(&self, id: ClusterId) -> Option<u8> {
        let (zoom, _) = self.origin_node(id)?;
        zoom.checked_add(1)
    }

    /// All indexed items
    pub fn items(&self) -> &[SpatialItem<T>] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Update the clustering configuration and rebuild.
    ///
    /// An invalid configuration is rejected and the current one kept.
    pub fn set_config(&mut self, config: ClusteringConfig) -> Result<()> {
        config.validate()?;
        self.config = config;
        self.rebuild();
        Ok(())
    }

    /// Get the current configuration
    pub fn config(&self) -> &ClusteringConfig {
        &self.config
    }
}

impl<T: Clone> Default for Clustering<T> {
    fn default() -> Self {
        Self::empty(ClusteringConfig::default())
    }
}
