//! Shared utilities: colors, frame clock, and frame-rate limiting.

pub mod clock;
pub mod color;
pub mod frame_timing;
