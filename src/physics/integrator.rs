//! Per-frame force application and explicit integration.
//!
//! Each active link pulls its unpinned endpoints toward each other by the
//! full displacement vector. There is no rest length: the mesh settles only
//! because friction bleeds off velocity every frame.
//!
//! Per unpinned node the step is:
//!
//! ```text
//! vel += force * force_multiplier
//! vel  = clamp(vel, speed_limit)
//! pos += vel
//! force = 0
//! vel *= friction
//! ```

use crate::config::MeshConfig;
use crate::graph::{Kinematics, LinkSet, Mesh, NodeStore};

/// Dynamics constants for one simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForceIntegrator {
    /// Force-to-acceleration scale.
    pub force_multiplier: f32,
    /// Maximum velocity magnitude.
    pub speed_limit: f32,
    /// Velocity kept after each step.
    pub friction: f32,
}

impl ForceIntegrator {
    /// Take the dynamics constants from a config.
    pub fn from_config(config: &MeshConfig) -> Self {
        Self {
            force_multiplier: config.force_multiplier,
            speed_limit: config.speed_limit,
            friction: config.friction,
        }
    }

    /// Run one full frame: all link forces first, then every node.
    pub fn step(&self, mesh: &mut Mesh) {
        let (nodes, links) = mesh.parts_mut();
        self.apply_link_forces(nodes, links);
        self.integrate(nodes);
    }

    /// Accumulate every active link's pull on its endpoints.
    pub fn apply_link_forces(&self, nodes: &mut NodeStore, links: &LinkSet) {
        for (_, link) in links.active() {
            let (Some((ax, ay)), Some((bx, by))) = (nodes.position(link.a), nodes.position(link.b))
            else {
                continue;
            };
            let (dx, dy) = (bx - ax, by - ay);
            nodes.accumulate_force(link.a, dx, dy);
            nodes.accumulate_force(link.b, -dx, -dy);
        }
    }

    /// Advance every unpinned node by one frame and clear its force.
    pub fn integrate(&self, nodes: &mut NodeStore) {
        let Kinematics {
            pos_x,
            pos_y,
            vel_x,
            vel_y,
            force_x,
            force_y,
            states,
        } = nodes.kinematics_mut();

        for (i, state) in states.iter().enumerate() {
            if state.is_pinned() {
                continue;
            }

            let mut vx = vel_x[i] + force_x[i] * self.force_multiplier;
            let mut vy = vel_y[i] + force_y[i] * self.force_multiplier;
            (vx, vy) = clamp_magnitude(vx, vy, self.speed_limit);

            pos_x[i] += vx;
            pos_y[i] += vy;

            force_x[i] = 0.0;
            force_y[i] = 0.0;

            vel_x[i] = vx * self.friction;
            vel_y[i] = vy * self.friction;
        }
    }
}

/// Scale (x, y) down to length `max` if it is longer.
#[inline]
pub fn clamp_magnitude(x: f32, y: f32, max: f32) -> (f32, f32) {
    let len = x.hypot(y);
    if len <= max {
        return (x, y);
    }
    let scale = max / len;
    (x * scale, y * scale)
}
