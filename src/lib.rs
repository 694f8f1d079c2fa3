// -- Lint policy ---------------------------------------------------------
// Crate-wide clippy policy. Rustc lints live in Cargo.toml.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Function signature hygiene
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::str_to_string)]

//! Procedural galaxy point clouds rendered in real time with wgpu.
//!
//! Nebula generates spiral-galaxy point clouds from a small parameter set
//! (particle count, radius, branch count, spin, jitter, two colors) and
//! draws them as additive point sprites under a damped orbit camera.
//!
//! # Key entry points
//!
//! - [`galaxy::generate`] - the point cloud generator (pure, seedable)
//! - [`scene::GalaxyScene`] - owns the current cloud and the regeneration
//!   policy
//! - [`engine::NebulaEngine`] - GPU context, camera, renderer, frame loop
//! - [`options::Options`] - runtime configuration with TOML presets
//!
//! # Generating without a GPU
//!
//! ```
//! use nebula::galaxy::{generate_seeded, GalaxyParameters};
//!
//! let params = GalaxyParameters { count: 1_000, ..Default::default() };
//! let cloud = generate_seeded(&params, 7).unwrap();
//! assert_eq!(cloud.positions().len(), 3_000);
//! assert_eq!(cloud.colors().len(), 3_000);
//! ```

pub mod camera;
pub mod engine;
pub mod error;
pub mod galaxy;
pub mod gpu;
pub mod input;
pub mod options;
pub mod point_cloud;
pub mod renderer;
pub mod scene;
pub mod util;
#[cfg(feature = "viewer")]
pub mod viewer;

pub use engine::{NebulaEngine, WindowRequest};
pub use error::NebulaError;
pub use input::{InputEvent, KeyAction, MouseButton};
#[cfg(feature = "viewer")]
pub use viewer::Viewer;
