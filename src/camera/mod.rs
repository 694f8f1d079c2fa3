//! Camera system: perspective projection, damped orbit controls, and the
//! GPU uniform that feeds the point shader.

/// Orbit controls plus the GPU uniform buffer and bind group.
pub mod controller;
/// Core camera struct and GPU uniform type.
pub mod core;
/// CPU-only orbit controls with inertial damping.
pub mod orbit;
