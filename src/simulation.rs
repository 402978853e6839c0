//! Simulation - the per-frame driver.
//!
//! Owns the mesh, the integrator, the cut history and the interaction
//! clock. A host drives it with three calls:
//! - [`Simulation::advance`] once per frame, before drawing
//! - [`Simulation::cut_at`] for every pointer sample during a drag
//! - [`Simulation::update_interaction`] once per frame, after input
//!
//! [`Simulation::tick`] runs `advance` and `update_interaction` back to back
//! for hosts that draw after the whole frame.

use tracing::{debug, warn};

use crate::config::MeshConfig;
use crate::error::ConfigError;
use crate::graph::{LinkId, Mesh};
use crate::interaction::{HistoryStack, InteractionClock};
use crate::physics::ForceIntegrator;

/// Why a cut link came back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevertCause {
    /// The undo input was held this frame.
    Manual,
    /// Nothing happened for longer than the idle threshold.
    Idle,
}

/// A link restored during a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Revert {
    pub link: LinkId,
    pub cause: RevertCause,
}

/// What a frame did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// Frames completed, including this one.
    pub frame: u64,
    /// The link restored this frame, if any.
    pub revert: Option<Revert>,
}

/// A running mesh simulation.
pub struct Simulation {
    config: MeshConfig,
    mesh: Mesh,
    integrator: ForceIntegrator,
    history: HistoryStack,
    clock: InteractionClock,
    frame: u64,
}

impl Simulation {
    /// Validate `config` and build the mesh.
    pub fn new(config: MeshConfig) -> Result<Self, ConfigError> {
        let mesh = Mesh::build(&config).inspect_err(|err| warn!(%err, "rejected mesh config"))?;
        Ok(Self {
            integrator: ForceIntegrator::from_config(&config),
            clock: InteractionClock::new(config.idle_threshold_ms),
            history: HistoryStack::new(),
            frame: 0,
            mesh,
            config,
        })
    }

    // =========================================================================
    // Frame Loop
    // =========================================================================

    /// Apply link forces and integrate every node.
    pub fn advance(&mut self) {
        self.integrator.step(&mut self.mesh);
        self.frame += 1;
    }

    /// Evaluate the undo input and the idle timer for this frame.
    ///
    /// A held undo input counts as an interaction and restores one link.
    /// Otherwise, once the clock is idle, one link is restored on every
    /// call until the history runs out or the user interacts again.
    pub fn update_interaction(&mut self, now_ms: f64, undo_requested: bool) -> Option<Revert> {
        if undo_requested {
            self.clock.touch(now_ms);
            if let Some(link) = self.undo() {
                return Some(Revert {
                    link,
                    cause: RevertCause::Manual,
                });
            }
        }

        // TODO: confirm whether idle revert should stop after one link instead
        // of draining the history.
        if self.clock.is_idle(now_ms) {
            return self.undo().map(|link| Revert {
                link,
                cause: RevertCause::Idle,
            });
        }
        None
    }

    /// One full frame: `advance` then `update_interaction`.
    pub fn tick(&mut self, now_ms: f64, undo_requested: bool) -> FrameReport {
        self.advance();
        let revert = self.update_interaction(now_ms, undo_requested);
        FrameReport {
            frame: self.frame,
            revert,
        }
    }

    // =========================================================================
    // Topology
    // =========================================================================

    /// Cut every link whose midpoint is within the knife range of (x, y).
    ///
    /// Counts as an interaction even when nothing is cut. Returns the number
    /// of links removed.
    pub fn cut_at(&mut self, x: f32, y: f32, now_ms: f64) -> usize {
        self.clock.touch(now_ms);
        let severed = self.mesh.cut(x, y, self.config.knife_range);
        let count = severed.len();
        self.history.extend(severed);
        count
    }

    /// Restore the most recently cut link.
    ///
    /// Does not touch the interaction clock. No-op on an empty history.
    pub fn undo(&mut self) -> Option<LinkId> {
        let link = self.history.pop()?;
        if !self.mesh.restore(link) {
            warn!(%link, "history held a link that was already active");
            return None;
        }
        debug!(%link, depth = self.history.len(), "restored link");
        Some(link)
    }

    /// Manual undo outside the frame loop; counts as an interaction.
    pub fn request_undo(&mut self, now_ms: f64) -> Option<LinkId> {
        self.clock.touch(now_ms);
        self.undo()
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn config(&self) -> &MeshConfig {
        &self.config
    }

    pub fn mesh(&self) -> &Mesh {
        &self.mesh
    }

    /// Mutable mesh access for spatial queries.
    pub fn mesh_mut(&mut self) -> &mut Mesh {
        &mut self.mesh
    }

    pub fn history(&self) -> &HistoryStack {
        &self.history
    }

    pub fn clock(&self) -> &InteractionClock {
        &self.clock
    }

    /// Frames advanced so far.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Check if a key value is one of the configured undo keys.
    pub fn is_undo_key(&self, key: &str) -> bool {
        self.config.is_undo_key(key)
    }
}
