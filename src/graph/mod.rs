//! Mesh data structures and operations.
//!
//! Nodes live in a Structure of Arrays store indexed by stable `NodeId`.
//! Links live in an arena indexed by stable `LinkId`, with the active
//! subset mirrored into petgraph's StableGraph for adjacency queries.

mod link;
mod mesh;
mod node;

pub use link::{Link, LinkId, LinkSet};
pub use mesh::Mesh;
pub use node::{NodeId, NodeState, NodeStore};
pub(crate) use node::Kinematics;
