//! Rendering passes.
//!
//! There is a single pass: camera-facing point sprites with additive
//! blending and no depth buffer.

pub mod points;

pub use points::{PointInstance, PointsPass};
