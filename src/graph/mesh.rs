//! Mesh - nodes and links built from a grid.
//!
//! The Mesh owns the node store and the link set. Topology only changes
//! through [`Mesh::cut`] and [`Mesh::restore`]; both finish by recomputing
//! node visibility, so a caller never observes stale visible flags.

use tracing::{debug, info};

use super::link::{Link, LinkId, LinkSet};
use super::node::{NodeId, NodeStore};
use crate::config::MeshConfig;
use crate::error::ConfigError;
use crate::spatial::SpatialIndex;

/// The mass-spring mesh.
pub struct Mesh {
    /// Point masses in SoA layout.
    nodes: NodeStore,

    /// Active and cut links.
    links: LinkSet,

    /// Subdivisions per axis.
    grid_count: u32,

    /// Node positions for hover queries, rebuilt lazily
    spatial: SpatialIndex<NodeId>,

    /// Whether positions moved since the spatial index was built
    spatial_dirty: bool,
}

impl Mesh {
    /// Build the grid described by `config`.
    ///
    /// Node (i, j) sits at `(i * (W - 1) / G, j * (H - 1) / G)`, row-major.
    /// The border ring is pinned. Every pair of nodes no farther apart than
    /// `W / G` is linked, except pairs of pinned nodes.
    pub fn build(config: &MeshConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let g = config.grid_count as u32;
        let side = g as usize + 1;
        let step_x = (config.width - 1.0) / g as f32;
        let step_y = (config.height - 1.0) / g as f32;

        let mut nodes = NodeStore::with_capacity(side * side);
        for j in 0..=g {
            for i in 0..=g {
                let pinned = i == 0 || j == 0 || i == g || j == g;
                nodes.push(i as f32 * step_x, j as f32 * step_y, pinned);
            }
        }

        let spatial = SpatialIndex::from_points(nodes.ids().filter_map(|id| {
            let (x, y) = nodes.position(id)?;
            Some((id, x, y))
        }));

        let threshold = config.link_threshold();
        let mut links = LinkSet::new(nodes.len());
        for a in nodes.ids() {
            let Some((x, y)) = nodes.position(a) else {
                continue;
            };
            let mut later: Vec<NodeId> = spatial
                .in_radius(x, y, threshold)
                .into_iter()
                .filter(|&b| b > a)
                .collect();
            later.sort_unstable();

            for b in later {
                if nodes.is_pinned(a) && nodes.is_pinned(b) {
                    continue;
                }
                links.insert(a, b);
            }
        }

        let mut mesh = Self {
            nodes,
            links,
            grid_count: g,
            spatial,
            spatial_dirty: false,
        };
        mesh.refresh_visibility();

        info!(
            grid_count = g,
            nodes = mesh.nodes.len(),
            pinned = mesh.nodes.pinned_count(),
            links = mesh.links.total_count(),
            "built mesh"
        );
        Ok(mesh)
    }

    /// Node at grid coordinate (i, j), if inside the grid.
    pub fn node_at(&self, i: u32, j: u32) -> Option<NodeId> {
        let g = self.grid_count;
        (i <= g && j <= g).then(|| NodeId(j * (g + 1) + i))
    }

    /// The node store.
    pub fn nodes(&self) -> &NodeStore {
        &self.nodes
    }

    /// The link set.
    pub fn links(&self) -> &LinkSet {
        &self.links
    }

    /// Split borrow for the integrator: nodes mutable, links shared.
    pub(crate) fn parts_mut(&mut self) -> (&mut NodeStore, &LinkSet) {
        self.spatial_dirty = true;
        (&mut self.nodes, &self.links)
    }

    // =========================================================================
    // Topology
    // =========================================================================

    /// Remove every active link whose midpoint is within `radius` of (x, y).
    ///
    /// Links are tested and removed in activation order, and returned in
    /// that order.
    pub fn cut(&mut self, x: f32, y: f32, radius: f32) -> Vec<LinkId> {
        let nodes = &self.nodes;
        let severed: Vec<LinkId> = self
            .links
            .active()
            .filter(|(_, link)| {
                link.midpoint(nodes)
                    .is_some_and(|(mx, my)| (mx - x).hypot(my - y) <= radius)
            })
            .map(|(id, _)| id)
            .collect();
        if severed.is_empty() {
            return severed;
        }

        for &id in &severed {
            self.links.remove(id);
        }
        self.refresh_visibility();

        debug!(
            x,
            y,
            severed = severed.len(),
            remaining = self.links.active_count(),
            "cut links"
        );
        severed
    }

    /// Put a cut link back.
    ///
    /// Returns false if the link is unknown or already active.
    pub fn restore(&mut self, id: LinkId) -> bool {
        if !self.links.restore(id) {
            return false;
        }
        self.refresh_visibility();
        true
    }

    /// Recompute every node's visible flag from its incident links.
    pub fn refresh_visibility(&mut self) {
        for i in 0..self.nodes.len() as u32 {
            let id = NodeId(i);
            let visible = self.links.has_incident(id);
            self.nodes.set_visible(id, visible);
        }
    }

    // =========================================================================
    // Render Buffers
    // =========================================================================

    /// Visible node positions as [x0, y0, x1, y1, ...] in node order.
    pub fn visible_positions(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.nodes.len() * 2);
        for id in self.nodes.ids().filter(|&id| self.nodes.is_visible(id)) {
            if let Some((x, y)) = self.nodes.position(id) {
                out.push(x);
                out.push(y);
            }
        }
        out
    }

    /// Active link segments as [ax, ay, bx, by, ...] in link set order.
    pub fn link_segments(&self) -> Vec<f32> {
        let mut out = Vec::with_capacity(self.links.active_count() * 4);
        for (_, Link { a, b }) in self.links.active() {
            if let (Some((ax, ay)), Some((bx, by))) =
                (self.nodes.position(a), self.nodes.position(b))
            {
                out.extend_from_slice(&[ax, ay, bx, by]);
            }
        }
        out
    }

    // =========================================================================
    // Spatial Queries
    // =========================================================================

    /// Rebuild the node spatial index from current positions.
    pub fn rebuild_spatial_index(&mut self) {
        let nodes = &self.nodes;
        self.spatial.rebuild(nodes.ids().filter_map(|id| {
            let (x, y) = nodes.position(id)?;
            Some((id, x, y))
        }));
        self.spatial_dirty = false;
    }

    /// Find the nearest node to a point.
    pub fn find_nearest_node(&mut self, x: f32, y: f32) -> Option<NodeId> {
        self.ensure_spatial_index_up_to_date();
        self.spatial.nearest(x, y)
    }

    /// Find the nearest node within a maximum distance.
    pub fn find_nearest_node_within(
        &mut self,
        x: f32,
        y: f32,
        max_distance: f32,
    ) -> Option<NodeId> {
        self.ensure_spatial_index_up_to_date();
        self.spatial.nearest_within(x, y, max_distance)
    }

    fn ensure_spatial_index_up_to_date(&mut self) {
        if self.spatial_dirty {
            self.rebuild_spatial_index();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mesh(g: i32, w: f32, h: f32) -> Mesh {
        Mesh::build(&MeshConfig::with_grid(g, w, h)).unwrap()
    }

    fn pairs(mesh: &Mesh) -> Vec<(u32, u32)> {
        let mut pairs: Vec<_> = mesh
            .links()
            .active()
            .map(|(_, link)| (link.a.raw(), link.b.raw()))
            .collect();
        pairs.sort_unstable();
        pairs
    }

    #[test]
    fn test_node_and_pin_counts() {
        for g in 1..=6 {
            let mesh = mesh(g, 61.0, 61.0);
            let side = (g + 1) as usize;
            assert_eq!(mesh.nodes().len(), side * side);
            assert_eq!(mesh.nodes().pinned_count(), 4 * g as usize);
        }
    }

    #[test]
    fn test_positions_are_row_major() {
        let mesh = mesh(2, 3.0, 5.0);
        let id = mesh.node_at(1, 2).unwrap();
        assert_eq!(id, NodeId(7));
        assert_eq!(mesh.nodes().position(id), Some((1.0, 4.0)));
        assert_eq!(mesh.node_at(3, 0), None);
    }

    #[test]
    fn test_three_by_three_scenario() {
        let mesh = mesh(2, 3.0, 3.0);
        let center = mesh.node_at(1, 1).unwrap();

        assert_eq!(mesh.nodes().len(), 9);
        assert_eq!(mesh.nodes().pinned_count(), 8);
        assert!(!mesh.nodes().is_pinned(center));

        // Threshold 1.5 reaches the 4-neighbors and the diagonals (~1.414),
        // and every border pair is pinned-pinned, so only the center links.
        let expected: Vec<(u32, u32)> = vec![
            (0, 4),
            (1, 4),
            (2, 4),
            (3, 4),
            (4, 5),
            (4, 6),
            (4, 7),
            (4, 8),
        ];
        assert_eq!(pairs(&mesh), expected);
        assert_eq!(mesh.links().degree(center), 8);
    }

    #[test]
    fn test_link_ids_follow_construction_order() {
        let mesh = mesh(3, 31.0, 31.0);
        let mut previous: Option<(NodeId, NodeId)> = None;
        for raw in 0..mesh.links().total_count() as u32 {
            let link = mesh.links().get(LinkId(raw)).unwrap();
            assert!(link.a < link.b);
            if let Some(prev) = previous {
                assert!(prev < (link.a, link.b));
            }
            previous = Some((link.a, link.b));
        }
    }

    #[test]
    fn test_construction_is_deterministic() {
        let first = mesh(8, 200.0, 150.0);
        let second = mesh(8, 200.0, 150.0);
        assert_eq!(pairs(&first), pairs(&second));
        assert!(!pairs(&first).is_empty());
    }

    #[test]
    fn test_no_pinned_pairs() {
        let mesh = mesh(7, 120.0, 90.0);
        for (_, link) in mesh.links().active() {
            assert!(!(mesh.nodes().is_pinned(link.a) && mesh.nodes().is_pinned(link.b)));
            assert_ne!(link.a, link.b);
        }
    }

    #[test]
    fn test_links_respect_threshold() {
        let config = MeshConfig::with_grid(5, 50.0, 50.0);
        let mesh = Mesh::build(&config).unwrap();
        for (_, link) in mesh.links().active() {
            let length = mesh.nodes().distance(link.a, link.b).unwrap();
            assert!(length <= config.link_threshold());
        }
    }

    #[test]
    fn test_build_rejects_bad_config() {
        let result = Mesh::build(&MeshConfig::with_grid(0, 10.0, 10.0));
        assert!(matches!(result, Err(ConfigError::InvalidGridCount(0))));

        let result = Mesh::build(&MeshConfig::with_grid(4, -10.0, 10.0));
        assert!(matches!(result, Err(ConfigError::InvalidExtent { .. })));
    }

    #[test]
    fn test_cut_is_inclusive_at_radius() {
        let mut mesh = mesh(2, 3.0, 3.0);
        // Link 0-4 runs (0,0)-(1,1), midpoint (0.5, 0.5).
        let severed = mesh.cut(0.5, 3.5, 3.0);
        assert!(severed.contains(&LinkId(0)));

        let mut mesh = self::mesh(2, 3.0, 3.0);
        let severed = mesh.cut(0.5, 3.5, 2.99);
        assert!(!severed.contains(&LinkId(0)));
    }

    #[test]
    fn test_recut_walks_restored_links_newest_first() {
        let mut mesh = mesh(2, 3.0, 3.0);
        // Midpoints (0.5, 0.5), (1, 0.5) and (0.5, 1) are within 0.6.
        let first = mesh.cut(0.5, 0.5, 0.6);
        assert_eq!(first, vec![LinkId(0), LinkId(1), LinkId(3)]);

        for &id in first.iter().rev() {
            assert!(mesh.restore(id));
        }
        let second = mesh.cut(0.5, 0.5, 0.6);
        assert_eq!(second, vec![LinkId(3), LinkId(1), LinkId(0)]);
    }

    #[test]
    fn test_cut_with_no_hits_changes_nothing() {
        let mut mesh = mesh(2, 3.0, 3.0);
        assert!(mesh.cut(100.0, 100.0, 1.0).is_empty());
        assert_eq!(mesh.links().active_count(), 8);
    }

    #[test]
    fn test_visibility_tracks_incident_links() {
        let mut mesh = mesh(2, 3.0, 3.0);
        let corner = mesh.node_at(0, 0).unwrap();
        assert!(mesh.nodes().is_visible(corner));

        let severed = mesh.cut(0.5, 0.5, 0.1);
        assert_eq!(severed, vec![LinkId(0)]);
        assert!(!mesh.nodes().is_visible(corner));

        assert!(mesh.restore(LinkId(0)));
        assert!(mesh.nodes().is_visible(corner));
        assert!(!mesh.restore(LinkId(0)));
    }

    #[test]
    fn test_isolated_corners_start_hidden() {
        // Diagonal spacing exceeds W / G here, so corners have no links.
        let mesh = mesh(4, 40.0, 40.0);
        let corner = mesh.node_at(0, 0).unwrap();
        assert_eq!(mesh.links().degree(corner), 0);
        assert!(!mesh.nodes().is_visible(corner));
    }

    #[test]
    fn test_render_buffers() {
        let mut mesh = mesh(2, 3.0, 3.0);
        assert_eq!(mesh.visible_positions().len(), 9 * 2);
        assert_eq!(mesh.link_segments().len(), 8 * 4);

        mesh.cut(0.5, 0.5, 0.1);
        assert_eq!(mesh.visible_positions().len(), 8 * 2);
        assert_eq!(mesh.link_segments().len(), 7 * 4);
    }

    #[test]
    fn test_find_nearest_node() {
        let mut mesh = mesh(2, 3.0, 3.0);
        assert_eq!(mesh.find_nearest_node(0.9, 1.2), mesh.node_at(1, 1));
        assert_eq!(mesh.find_nearest_node_within(10.0, 10.0, 1.0), None);
    }
}
