//! Link type and the active link set.
//!
//! Every link ever built lives in an arena indexed by [`LinkId`]. Which
//! of them are currently active is tracked by an undirected petgraph
//! `StableGraph` whose nodes mirror the node store one-to-one, so
//! incident-link queries are adjacency walks rather than scans.
//!
//! Active links are also kept in activation order: construction order at
//! first, with a restored link moving to the end.

use std::fmt;

use petgraph::Undirected;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableGraph};
use petgraph::visit::NodeIndexable;

use super::node::{NodeId, NodeStore};

/// Stable link identifier.
///
/// Assigned once at mesh construction and kept across cut and restore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LinkId(pub u32);

impl LinkId {
    /// Create a new LinkId from a raw u32.
    #[inline]
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw u32 value.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Link({})", self.0)
    }
}

impl From<u32> for LinkId {
    #[inline]
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<LinkId> for u32 {
    #[inline]
    fn from(id: LinkId) -> Self {
        id.0
    }
}

/// A massless constraint between two distinct nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Link {
    /// First endpoint (earlier in construction order).
    pub a: NodeId,
    /// Second endpoint.
    pub b: NodeId,
}

impl Link {
    /// Midpoint of the two endpoints' current positions.
    pub fn midpoint(&self, nodes: &NodeStore) -> Option<(f32, f32)> {
        let (ax, ay) = nodes.position(self.a)?;
        let (bx, by) = nodes.position(self.b)?;
        Some(((ax + bx) / 2.0, (ay + by) / 2.0))
    }

    /// Check if the link touches the given node.
    #[inline]
    pub fn touches(&self, node: NodeId) -> bool {
        self.a == node || self.b == node
    }
}

/// The set of active links, plus every link that was ever active.
pub struct LinkSet {
    /// Arena of all links, indexed by LinkId.
    links: Vec<Link>,

    /// Active links as graph edges. Node weights are the mirrored NodeIds,
    /// edge weights are LinkIds.
    graph: StableGraph<NodeId, LinkId, Undirected>,

    /// LinkId -> edge index while the link is active.
    edge_of: Vec<Option<EdgeIndex>>,

    /// Active links, oldest activation first.
    order: Vec<LinkId>,
}

impl LinkSet {
    /// Create an empty link set over `node_count` nodes.
    pub fn new(node_count: usize) -> Self {
        let mut graph = StableGraph::with_capacity(node_count, node_count * 2);
        for i in 0..node_count {
            graph.add_node(NodeId(i as u32));
        }
        Self {
            links: Vec::new(),
            graph,
            edge_of: Vec::new(),
            order: Vec::new(),
        }
    }

    fn node_index(&self, id: NodeId) -> Option<NodeIndex> {
        (id.index() < self.graph.node_bound()).then(|| NodeIndex::new(id.index()))
    }

    /// Build a new active link.
    ///
    /// Returns None if the endpoints are equal or unknown.
    pub fn insert(&mut self, a: NodeId, b: NodeId) -> Option<LinkId> {
        if a == b {
            return None;
        }
        let a_index = self.node_index(a)?;
        let b_index = self.node_index(b)?;

        let id = LinkId(self.links.len() as u32);
        let edge = self.graph.add_edge(a_index, b_index, id);
        self.links.push(Link { a, b });
        self.edge_of.push(Some(edge));
        self.order.push(id);
        Some(id)
    }

    /// Deactivate a link.
    ///
    /// Returns true if the link was active.
    pub fn remove(&mut self, id: LinkId) -> bool {
        let Some(slot) = self.edge_of.get_mut(id.0 as usize) else {
            return false;
        };
        match slot.take() {
            Some(edge) => {
                self.graph.remove_edge(edge);
                self.order.retain(|&active| active != id);
                true
            }
            None => false,
        }
    }

    /// Reactivate a previously removed link.
    ///
    /// Returns true if the link existed and was inactive.
    pub fn restore(&mut self, id: LinkId) -> bool {
        let Some(link) = self.links.get(id.0 as usize).copied() else {
            return false;
        };
        if self.edge_of[id.0 as usize].is_some() {
            return false;
        }
        let edge = self.graph.add_edge(
            NodeIndex::new(link.a.index()),
            NodeIndex::new(link.b.index()),
            id,
        );
        self.edge_of[id.0 as usize] = Some(edge);
        self.order.push(id);
        true
    }

    /// Check if a link is currently active.
    pub fn is_active(&self, id: LinkId) -> bool {
        self.edge_of
            .get(id.0 as usize)
            .is_some_and(Option::is_some)
    }

    /// Look up a link's endpoints, active or not.
    pub fn get(&self, id: LinkId) -> Option<Link> {
        self.links.get(id.0 as usize).copied()
    }

    /// Number of active links.
    pub fn active_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Number of links ever built.
    pub fn total_count(&self) -> usize {
        self.links.len()
    }

    /// Iterate over active links in activation order.
    pub fn active(&self) -> impl Iterator<Item = (LinkId, Link)> + '_ {
        self.order.iter().map(|&id| (id, self.links[id.0 as usize]))
    }

    /// Number of active links touching a node.
    pub fn degree(&self, node: NodeId) -> usize {
        self.node_index(node)
            .map(|index| self.graph.edges(index).count())
            .unwrap_or(0)
    }

    /// Check if any active link touches a node.
    pub fn has_incident(&self, node: NodeId) -> bool {
        self.node_index(node)
            .is_some_and(|index| self.graph.edges(index).next().is_some())
    }

    /// Active links touching a node.
    pub fn incident(&self, node: NodeId) -> Vec<LinkId> {
        self.node_index(node)
            .map(|index| self.graph.edges(index).map(|e| *e.weight()).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> LinkSet {
        let mut links = LinkSet::new(3);
        links.insert(NodeId(0), NodeId(1));
        links.insert(NodeId(1), NodeId(2));
        links.insert(NodeId(0), NodeId(2));
        links
    }

    #[test]
    fn test_link_id() {
        let id = LinkId::new(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(format!("{}", id), "Link(42)");
    }

    #[test]
    fn test_insert_rejects_self_and_unknown() {
        let mut links = LinkSet::new(2);
        assert_eq!(links.insert(NodeId(0), NodeId(0)), None);
        assert_eq!(links.insert(NodeId(0), NodeId(5)), None);
        assert_eq!(links.insert(NodeId(0), NodeId(1)), Some(LinkId(0)));
        assert_eq!(links.total_count(), 1);
    }

    #[test]
    fn test_remove_and_restore() {
        let mut links = triangle();
        assert_eq!(links.active_count(), 3);

        assert!(links.remove(LinkId(1)));
        assert!(!links.remove(LinkId(1)));
        assert!(!links.is_active(LinkId(1)));
        assert_eq!(links.active_count(), 2);
        assert_eq!(links.total_count(), 3);

        assert!(links.restore(LinkId(1)));
        assert!(!links.restore(LinkId(1)));
        assert!(links.is_active(LinkId(1)));
        assert_eq!(links.get(LinkId(1)), Some(Link { a: NodeId(1), b: NodeId(2) }));
    }

    #[test]
    fn test_restore_unknown_link() {
        let mut links = triangle();
        assert!(!links.restore(LinkId(99)));
        assert!(!links.remove(LinkId(99)));
    }

    #[test]
    fn test_incidence_follows_removal() {
        let mut links = triangle();
        assert_eq!(links.degree(NodeId(0)), 2);

        links.remove(LinkId(0));
        links.remove(LinkId(2));
        assert!(!links.has_incident(NodeId(0)));
        assert!(links.incident(NodeId(0)).is_empty());
        assert_eq!(links.incident(NodeId(1)), vec![LinkId(1)]);

        links.restore(LinkId(2));
        assert!(links.has_incident(NodeId(0)));
    }

    #[test]
    fn test_active_yields_only_live_links() {
        let mut links = triangle();
        links.remove(LinkId(0));

        let mut ids: Vec<_> = links.active().map(|(id, _)| id).collect();
        ids.sort();
        assert_eq!(ids, vec![LinkId(1), LinkId(2)]);
    }

    #[test]
    fn test_restored_links_move_to_the_end() {
        let mut links = triangle();
        links.remove(LinkId(0));
        links.remove(LinkId(1));
        links.restore(LinkId(1));
        links.restore(LinkId(0));

        let ids: Vec<_> = links.active().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![LinkId(2), LinkId(1), LinkId(0)]);
    }

    #[test]
    fn test_midpoint() {
        let mut nodes = NodeStore::new();
        let a = nodes.push(0.0, 0.0, false);
        let b = nodes.push(4.0, 2.0, false);
        let link = Link { a, b };
        assert_eq!(link.midpoint(&nodes), Some((2.0, 1.0)));
        assert!(link.touches(a));
        assert!(!link.touches(NodeId(9)));
    }
}
