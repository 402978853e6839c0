//! Mesh dynamics.
//!
//! CPU-side force accumulation and integration, run once per frame over
//! the whole mesh.

mod integrator;

pub use integrator::{ForceIntegrator, clamp_magnitude};
