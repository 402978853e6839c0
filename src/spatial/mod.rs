//! Spatial indexing for O(log n) proximity queries.
//!
//! This module provides an R-tree based spatial index used for neighbor
//! search during mesh construction, knife hit testing against link
//! midpoints, and nearest-node lookup for the host.

mod rtree;

pub use rtree::{IndexedPoint, SpatialIndex};
