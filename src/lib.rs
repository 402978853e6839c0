//! Cut Mesh - WASM Module
//!
//! This module provides an interactive 2D mass-spring mesh that can be cut
//! with a pointer drag and heals itself when left alone. It is compiled to
//! WebAssembly and exposes a JavaScript-friendly API via wasm-bindgen; the
//! host owns the canvas, the frame clock and the raw input events.
//!
//! # Architecture
//!
//! - `graph`: Node store, link set and the grid-built mesh
//! - `physics`: Link forces and per-node integration
//! - `interaction`: Cut history and the idle clock
//! - `spatial`: R-tree spatial indexing for neighbor search and hit testing
//! - `simulation`: The per-frame driver tying the pieces together

use js_sys::Float32Array;
use wasm_bindgen::prelude::*;

pub mod config;
pub mod error;
pub mod graph;
pub mod interaction;
pub mod physics;
pub mod simulation;
pub mod spatial;

pub use config::MeshConfig;
pub use error::ConfigError;
pub use graph::{Link, LinkId, Mesh, NodeId};
pub use simulation::{FrameReport, Revert, RevertCause, Simulation};

/// Initialize the WASM module.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Main entry point for the mesh simulation.
///
/// This struct wraps the internal Simulation and provides the public API
/// exposed to JavaScript.
#[wasm_bindgen]
pub struct CutMeshWasm {
    sim: Simulation,
}

#[wasm_bindgen]
impl CutMeshWasm {
    /// Create a simulation from a partial config object.
    ///
    /// Missing fields take their defaults; `undefined` or `null` means all
    /// defaults. Throws if any setting is invalid.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<CutMeshWasm, JsError> {
        let config: MeshConfig = if config.is_undefined() || config.is_null() {
            MeshConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config).map_err(|err| JsError::new(&err.to_string()))?
        };

        let sim = Simulation::new(config).map_err(|err| {
            web_sys::console::warn_1(&format!("cut-mesh: {err}").into());
            JsError::from(err)
        })?;
        Ok(Self { sim })
    }

    /// Create a simulation for a `grid_count` mesh over `width` x `height`.
    #[wasm_bindgen(js_name = withGrid)]
    pub fn with_grid(grid_count: i32, width: f32, height: f32) -> Result<CutMeshWasm, JsError> {
        let sim = Simulation::new(MeshConfig::with_grid(grid_count, width, height))?;
        Ok(Self { sim })
    }

    // =========================================================================
    // Frame Loop
    // =========================================================================

    /// Run one full frame.
    ///
    /// Returns the ID of the link restored this frame, if any.
    pub fn tick(&mut self, now_ms: f64, undo_held: bool) -> Option<u32> {
        self.sim.tick(now_ms, undo_held).revert.map(|r| r.link.0)
    }

    /// Apply forces and integrate, without evaluating input.
    pub fn advance(&mut self) {
        self.sim.advance();
    }

    /// Evaluate the undo input and the idle timer.
    ///
    /// Returns the ID of the restored link, if any.
    #[wasm_bindgen(js_name = updateInteraction)]
    pub fn update_interaction(&mut self, now_ms: f64, undo_held: bool) -> Option<u32> {
        self.sim.update_interaction(now_ms, undo_held).map(|r| r.link.0)
    }

    /// Number of frames advanced.
    pub fn frame(&self) -> f64 {
        self.sim.frame() as f64
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Cut at a pointer sample during a drag.
    ///
    /// Returns the number of links removed.
    #[wasm_bindgen(js_name = cutAt)]
    pub fn cut_at(&mut self, x: f32, y: f32, now_ms: f64) -> u32 {
        self.sim.cut_at(x, y, now_ms) as u32
    }

    /// Restore the most recently cut link without touching the idle clock.
    pub fn undo(&mut self) -> Option<u32> {
        self.sim.undo().map(|id| id.0)
    }

    /// Restore the most recently cut link as a user interaction.
    #[wasm_bindgen(js_name = requestUndo)]
    pub fn request_undo(&mut self, now_ms: f64) -> Option<u32> {
        self.sim.request_undo(now_ms).map(|id| id.0)
    }

    /// Check if a `KeyboardEvent.key` value is a configured undo key.
    #[wasm_bindgen(js_name = isUndoKey)]
    pub fn is_undo_key(&self, key: &str) -> bool {
        self.sim.is_undo_key(key)
    }

    /// Milliseconds since the last interaction.
    #[wasm_bindgen(js_name = idleElapsed)]
    pub fn idle_elapsed(&self, now_ms: f64) -> f64 {
        self.sim.clock().elapsed(now_ms)
    }

    // =========================================================================
    // Render Buffers
    // =========================================================================

    /// Visible node positions as [x0, y0, x1, y1, ...].
    #[wasm_bindgen(js_name = visiblePoints)]
    pub fn visible_points(&self) -> Float32Array {
        Float32Array::from(&self.sim.mesh().visible_positions()[..])
    }

    /// Active link segments as [ax, ay, bx, by, ...].
    #[wasm_bindgen(js_name = linkSegments)]
    pub fn link_segments(&self) -> Float32Array {
        Float32Array::from(&self.sim.mesh().link_segments()[..])
    }

    /// Side length of the square drawn per visible node.
    #[wasm_bindgen(js_name = nodeSize)]
    pub fn node_size(&self) -> f32 {
        self.sim.config().node_size
    }

    /// Mesh extent along X.
    pub fn width(&self) -> f32 {
        self.sim.config().width
    }

    /// Mesh extent along Y.
    pub fn height(&self) -> f32 {
        self.sim.config().height
    }

    // =========================================================================
    // Introspection
    // =========================================================================

    /// Get the number of nodes.
    #[wasm_bindgen(js_name = nodeCount)]
    pub fn node_count(&self) -> u32 {
        self.sim.mesh().nodes().len() as u32
    }

    /// Get the number of pinned nodes.
    #[wasm_bindgen(js_name = pinnedCount)]
    pub fn pinned_count(&self) -> u32 {
        self.sim.mesh().nodes().pinned_count() as u32
    }

    /// Get the number of active links.
    #[wasm_bindgen(js_name = linkCount)]
    pub fn link_count(&self) -> u32 {
        self.sim.mesh().links().active_count() as u32
    }

    /// Get the number of links built at construction.
    #[wasm_bindgen(js_name = totalLinkCount)]
    pub fn total_link_count(&self) -> u32 {
        self.sim.mesh().links().total_count() as u32
    }

    /// Get the number of cuts waiting to be undone.
    #[wasm_bindgen(js_name = historyLen)]
    pub fn history_len(&self) -> u32 {
        self.sim.history().len() as u32
    }

    /// Get a node's X position.
    #[wasm_bindgen(js_name = getNodeX)]
    pub fn get_node_x(&self, node_id: u32) -> Option<f32> {
        self.sim.mesh().nodes().position(NodeId(node_id)).map(|(x, _)| x)
    }

    /// Get a node's Y position.
    #[wasm_bindgen(js_name = getNodeY)]
    pub fn get_node_y(&self, node_id: u32) -> Option<f32> {
        self.sim.mesh().nodes().position(NodeId(node_id)).map(|(_, y)| y)
    }

    /// Check if a node is pinned.
    #[wasm_bindgen(js_name = isNodePinned)]
    pub fn is_node_pinned(&self, node_id: u32) -> bool {
        self.sim.mesh().nodes().is_pinned(NodeId(node_id))
    }

    /// Check if a node is drawn.
    #[wasm_bindgen(js_name = isNodeVisible)]
    pub fn is_node_visible(&self, node_id: u32) -> bool {
        self.sim.mesh().nodes().is_visible(NodeId(node_id))
    }

    /// Get a link's endpoints as [a, b], active or not.
    #[wasm_bindgen(js_name = getLinkEndpoints)]
    pub fn get_link_endpoints(&self, link_id: u32) -> Option<Vec<u32>> {
        self.sim
            .mesh()
            .links()
            .get(LinkId(link_id))
            .map(|link| vec![link.a.0, link.b.0])
    }

    /// Check if a link is currently active.
    #[wasm_bindgen(js_name = isLinkActive)]
    pub fn is_link_active(&self, link_id: u32) -> bool {
        self.sim.mesh().links().is_active(LinkId(link_id))
    }

    // =========================================================================
    // Spatial Queries
    // =========================================================================

    /// Find the nearest node to a point.
    ///
    /// Returns the node ID, or None if the mesh is empty.
    #[wasm_bindgen(js_name = findNearestNode)]
    pub fn find_nearest_node(&mut self, x: f32, y: f32) -> Option<u32> {
        self.sim.mesh_mut().find_nearest_node(x, y).map(|id| id.0)
    }

    /// Find the nearest node within a maximum distance.
    #[wasm_bindgen(js_name = findNearestNodeWithin)]
    pub fn find_nearest_node_within(&mut self, x: f32, y: f32, max_distance: f32) -> Option<u32> {
        self.sim
            .mesh_mut()
            .find_nearest_node_within(x, y, max_distance)
            .map(|id| id.0)
    }
}
