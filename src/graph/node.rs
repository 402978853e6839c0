//! Node type and the node store.
//!
//! Nodes are the point masses of the mesh. Each node has:
//! - A stable index (its position in construction order)
//! - Position (x, y), velocity (vx, vy) and a force accumulator (fx, fy)
//! - Pinned state, fixed at construction
//! - Visibility, derived from whether any active link touches the node

use std::fmt;

/// Stable node identifier.
///
/// Nodes are never removed, so the ID doubles as the index into the
/// store's SoA buffers. It wraps a u32 for efficient storage and
/// WebAssembly interop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Create a new NodeId from a raw u32.
    #[inline]
    pub fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw u32 value.
    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    /// Index into the SoA buffers.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

impl From<u32> for NodeId {
    #[inline]
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl From<NodeId> for u32 {
    #[inline]
    fn from(id: NodeId) -> Self {
        id.0
    }
}

/// Node state flags packed into a single byte.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeState {
    flags: u8,
}

impl NodeState {
    const PINNED: u8 = 0b0000_0001;
    const HIDDEN: u8 = 0b0000_0010;

    /// A free, visible node.
    #[inline]
    pub fn new() -> Self {
        Self { flags: 0 }
    }

    /// A pinned, visible node.
    #[inline]
    pub fn pinned() -> Self {
        Self { flags: Self::PINNED }
    }

    /// Check if the node is pinned (never moves).
    #[inline]
    pub fn is_pinned(self) -> bool {
        self.flags & Self::PINNED != 0
    }

    /// Check if the node should be drawn.
    #[inline]
    pub fn is_visible(self) -> bool {
        self.flags & Self::HIDDEN == 0
    }

    /// Set the visible state.
    #[inline]
    pub fn set_visible(&mut self, visible: bool) {
        if visible {
            self.flags &= !Self::HIDDEN;
        } else {
            self.flags |= Self::HIDDEN;
        }
    }
}

/// Point masses in Structure of Arrays layout.
///
/// Positions and velocities live in separate x/y buffers so the host can
/// read them as flat arrays without per-node conversion.
#[derive(Debug, Clone, Default)]
pub struct NodeStore {
    pos_x: Vec<f32>,
    pos_y: Vec<f32>,
    vel_x: Vec<f32>,
    vel_y: Vec<f32>,
    force_x: Vec<f32>,
    force_y: Vec<f32>,
    states: Vec<NodeState>,
}

impl NodeStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with pre-allocated capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            pos_x: Vec::with_capacity(capacity),
            pos_y: Vec::with_capacity(capacity),
            vel_x: Vec::with_capacity(capacity),
            vel_y: Vec::with_capacity(capacity),
            force_x: Vec::with_capacity(capacity),
            force_y: Vec::with_capacity(capacity),
            states: Vec::with_capacity(capacity),
        }
    }

    /// Append a node at rest.
    pub fn push(&mut self, x: f32, y: f32, pinned: bool) -> NodeId {
        let id = NodeId(self.states.len() as u32);
        self.pos_x.push(x);
        self.pos_y.push(y);
        self.vel_x.push(0.0);
        self.vel_y.push(0.0);
        self.force_x.push(0.0);
        self.force_y.push(0.0);
        self.states.push(if pinned {
            NodeState::pinned()
        } else {
            NodeState::new()
        });
        id
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Check if the store holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Check if the ID refers to a node in this store.
    #[inline]
    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.states.len()
    }

    /// Iterate over all node IDs in construction order.
    pub fn ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        (0..self.states.len() as u32).map(NodeId)
    }

    /// Get a node's position.
    pub fn position(&self, id: NodeId) -> Option<(f32, f32)> {
        let i = id.index();
        self.contains(id).then(|| (self.pos_x[i], self.pos_y[i]))
    }

    /// Get a node's velocity.
    pub fn velocity(&self, id: NodeId) -> Option<(f32, f32)> {
        let i = id.index();
        self.contains(id).then(|| (self.vel_x[i], self.vel_y[i]))
    }

    /// Get a node's pending force.
    pub fn force(&self, id: NodeId) -> Option<(f32, f32)> {
        let i = id.index();
        self.contains(id).then(|| (self.force_x[i], self.force_y[i]))
    }

    /// Get a node's state flags.
    pub fn state(&self, id: NodeId) -> Option<NodeState> {
        self.states.get(id.index()).copied()
    }

    /// Check if a node is pinned. Unknown IDs report false.
    pub fn is_pinned(&self, id: NodeId) -> bool {
        self.state(id).is_some_and(NodeState::is_pinned)
    }

    /// Check if a node is visible. Unknown IDs report false.
    pub fn is_visible(&self, id: NodeId) -> bool {
        self.state(id).is_some_and(NodeState::is_visible)
    }

    /// Set a node's visible flag.
    pub fn set_visible(&mut self, id: NodeId, visible: bool) {
        if let Some(state) = self.states.get_mut(id.index()) {
            state.set_visible(visible);
        }
    }

    /// Number of pinned nodes.
    pub fn pinned_count(&self) -> usize {
        self.states.iter().filter(|s| s.is_pinned()).count()
    }

    /// Add to a node's force accumulator. Pinned and unknown nodes ignore it.
    #[inline]
    pub fn accumulate_force(&mut self, id: NodeId, fx: f32, fy: f32) {
        if !self.contains(id) || self.is_pinned(id) {
            return;
        }
        let i = id.index();
        self.force_x[i] += fx;
        self.force_y[i] += fy;
    }

    /// Distance between two nodes, if both exist.
    pub fn distance(&self, a: NodeId, b: NodeId) -> Option<f32> {
        let (ax, ay) = self.position(a)?;
        let (bx, by) = self.position(b)?;
        Some((bx - ax).hypot(by - ay))
    }

    /// Mutable access to every kinematic buffer at once, for the integrator.
    pub(crate) fn kinematics_mut(&mut self) -> Kinematics<'_> {
        Kinematics {
            pos_x: &mut self.pos_x,
            pos_y: &mut self.pos_y,
            vel_x: &mut self.vel_x,
            vel_y: &mut self.vel_y,
            force_x: &mut self.force_x,
            force_y: &mut self.force_y,
            states: &self.states,
        }
    }
}

/// Borrowed view of the kinematic buffers.
pub(crate) struct Kinematics<'a> {
    pub pos_x: &'a mut [f32],
    pub pos_y: &'a mut [f32],
    pub vel_x: &'a mut [f32],
    pub vel_y: &'a mut [f32],
    pub force_x: &'a mut [f32],
    pub force_y: &'a mut [f32],
    pub states: &'a [NodeState],
}
