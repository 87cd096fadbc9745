use crate::core::geo::{LatLng, Point};

use rstar::{PointDistance, RTree, RTreeObject, AABB};

/// A located item handed to the clustering engine
#[derive(Debug, Clone)]
pub struct SpatialItem<T> {
    pub id: String,
    pub position: LatLng,
    pub data: T,
}

impl<T> SpatialItem<T> {
    pub fn new(id: String, position: LatLng, data: T) -> Self {
        Self { id, position, data }
    }
}

impl<T> PartialEq for SpatialItem<T> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<T> Eq for SpatialItem<T> {}

/// A projected point tagged with its slot in the owning level
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct IndexedPoint {
    pub index: usize,
    pub point: Point,
}

// --- rstar integration -------------------------------------------------------------------------

impl RTreeObject for IndexedPoint {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.point.x, self.point.y])
    }
}

impl PointDistance for IndexedPoint {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        self.point.distance_squared_to(&Point::new(point[0], point[1]))
    }
}

/// R-tree over projected points. Every query returns slot indices in ascending
/// order so callers walk results deterministically.
pub(crate) struct PointIndex {
    rtree: RTree<IndexedPoint>,
}

impl PointIndex {
    /// Bulk-loads the points; slot `i` is `points[i]`
    pub fn build(points: impl IntoIterator<Item = Point>) -> Self {
        let entries: Vec<IndexedPoint> = points
            .into_iter()
            .enumerate()
            .map(|(index, point)| IndexedPoint { index, point })
            .collect();
        Self {
            rtree: RTree::bulk_load(entries),
        }
    }

    /// Slots whose point lies in the box spanned by two opposite corners
    pub fn query(&self, corner: Point, opposite: Point) -> Vec<usize> {
        let envelope = AABB::from_corners([corner.x, corner.y], [opposite.x, opposite.y]);
        let mut hits: Vec<usize> = self
            .rtree
            .locate_in_envelope(&envelope)
            .map(|entry| entry.index)
            .collect();
        hits.sort_unstable();
        hits
    }

    /// Slots within `radius` of `center`, inclusive
    pub fn within(&self, center: &Point, radius: f64) -> Vec<usize> {
        let mut hits: Vec<usize> = self
            .rtree
            .locate_within_distance([center.x, center.y], radius * radius)
            .map(|entry| entry.index)
            .collect();
        hits.sort_unstable();
        hits
    }

    pub fn len(&self) -> usize {
        self.rtree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.rtree.size() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_index() -> PointIndex {
        PointIndex::build(vec![
            Point::new(0.10, 0.10),
            Point::new(0.11, 0.10),
            Point::new(0.50, 0.50),
            Point::new(0.90, 0.90),
        ])
    }

    #[test]
    fn test_query_bounds() {
        let index = sample_index();
        assert_eq!(index.len(), 4);

        let hits = index.query(Point::new(0.0, 0.0), Point::new(0.2, 0.2));
        assert_eq!(hits, vec![0, 1]);

        let hits = index.query(Point::new(0.0, 0.0), Point::new(1.0, 1.0));
        assert_eq!(hits, vec![0, 1, 2, 3]);

        // Corner order does not matter
        let hits = index.query(Point::new(0.6, 0.4), Point::new(0.4, 0.6));
        assert_eq!(hits, vec![2]);
    }

    #[test]
    fn test_within_radius() {
        let index = sample_index();
        let hits = index.within(&Point::new(0.10, 0.10), 0.02);
        assert_eq!(hits, vec![0, 1]);

        let hits = index.within(&Point::new(0.50, 0.50), 0.001);
        assert_eq!(hits, vec![2]);
    }

    #[test]
    fn test_empty_index() {
        let index = PointIndex::build(Vec::new());
        assert!(index.is_empty());
        assert!(index.query(Point::new(0.0, 0.0), Point::new(1.0, 1.0)).is_empty());
    }
}
