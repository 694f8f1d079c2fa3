//! Procedural spiral-galaxy point clouds.
//!
//! Particles are spread along `branches` evenly spaced arms. Each
//! particle's distance from the center is uniform in `[0, radius)`, the arm
//! twists by `radius * spin`, and a per-axis jitter of
//! `random()^power * ±1 * randomness * radius` thickens the arms. Jitter
//! concentrates near zero for large powers, leaving dense arm centers and
//! sparse edges. Colors blend from the inside color at the core to the
//! outside color at the rim.

mod generator;
mod params;

pub use generator::{
    branch_angle, generate, generate_seeded, GalaxyParticle, GalaxySampler,
};
pub use params::{GalaxyError, GalaxyParameters};
