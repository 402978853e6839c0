//! R-tree based point index using the rstar crate.
//!
//! Provides O(log n) spatial queries for:
//! - Nearest neighbor
//! - Point-in-radius
//!
//! The index is keyed by an arbitrary copyable ID so the same structure
//! serves node positions and link midpoints.

use rstar::{AABB, PointDistance, RTree, RTreeObject};

/// Relative slack applied to radius queries before the exact distance check.
///
/// rstar compares squared distances; the slack keeps borderline points that
/// `hypot` would accept from being dropped by rounding in the square.
const RADIUS_SLACK: f32 = 1e-4;

/// A point in the spatial index with its associated ID.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IndexedPoint<T> {
    /// The payload identifier.
    pub id: T,
    /// X coordinate.
    pub x: f32,
    /// Y coordinate.
    pub y: f32,
}

impl<T> IndexedPoint<T> {
    /// Create a new IndexedPoint.
    pub fn new(id: T, x: f32, y: f32) -> Self {
        Self { id, x, y }
    }

    /// Euclidean distance to a point.
    #[inline]
    pub fn distance_to(&self, x: f32, y: f32) -> f32 {
        (self.x - x).hypot(self.y - y)
    }
}

impl<T> RTreeObject for IndexedPoint<T> {
    type Envelope = AABB<[f32; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point([self.x, self.y])
    }
}

impl<T> PointDistance for IndexedPoint<T> {
    fn distance_2(&self, point: &[f32; 2]) -> f32 {
        let dx = self.x - point[0];
        let dy = self.y - point[1];
        dx * dx + dy * dy
    }

    fn contains_point(&self, point: &[f32; 2]) -> bool {
        (self.x - point[0]).abs() < f32::EPSILON && (self.y - point[1]).abs() < f32::EPSILON
    }
}

/// Spatial index over 2D points.
///
/// Uses an R*-tree, bulk loaded from a snapshot of positions. Positions in
/// the mesh move every frame, so callers rebuild rather than update.
pub struct SpatialIndex<T> {
    tree: RTree<IndexedPoint<T>>,
}

impl<T: Copy> SpatialIndex<T> {
    /// Create a new empty spatial index.
    pub fn new() -> Self {
        Self { tree: RTree::new() }
    }

    /// Build an index from (id, x, y) tuples.
    pub fn from_points(points: impl IntoIterator<Item = (T, f32, f32)>) -> Self {
        let mut index = Self::new();
        index.rebuild(points);
        index
    }

    /// Find the nearest point to (x, y).
    pub fn nearest(&self, x: f32, y: f32) -> Option<T> {
        self.tree.nearest_neighbor(&[x, y]).map(|point| point.id)
    }

    /// Find the nearest point within a maximum distance.
    pub fn nearest_within(&self, x: f32, y: f32, max_distance: f32) -> Option<T> {
        self.tree
            .nearest_neighbor(&[x, y])
            .filter(|point| point.distance_to(x, y) <= max_distance)
            .map(|point| point.id)
    }

    /// Find all points whose Euclidean distance to (x, y) is at most `radius`.
    ///
    /// Order is unspecified.
    pub fn in_radius(&self, x: f32, y: f32, radius: f32) -> Vec<T> {
        if radius < 0.0 {
            return Vec::new();
        }
        let padded = radius * (1.0 + RADIUS_SLACK) + f32::EPSILON;
        self.tree
            .locate_within_distance([x, y], padded * padded)
            .filter(|point| point.distance_to(x, y) <= radius)
            .map(|point| point.id)
            .collect()
    }

    /// Replace the contents with (id, x, y) tuples.
    ///
    /// This is more efficient than incremental inserts for bulk updates.
    pub fn rebuild(&mut self, points: impl IntoIterator<Item = (T, f32, f32)>) {
        let points: Vec<_> = points
            .into_iter()
            .map(|(id, x, y)| IndexedPoint::new(id, x, y))
            .collect();

        self.tree = RTree::bulk_load(points);
    }

    /// Get the number of points in the index.
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    /// Check if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

impl<T: Copy> Default for SpatialIndex<T> {
    fn default() -> Self {
        Self::new()
    }
}
