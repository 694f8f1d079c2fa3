use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Camera", inline)]
#[serde(default)]
/// Camera projection and orbit-control parameters.
pub struct CameraOptions {
    /// Vertical field of view in degrees.
    #[schemars(title = "Field of View", range(min = 20.0, max = 120.0), extend("step" = 1.0))]
    pub fovy: f32,
    /// Near clipping plane distance.
    #[schemars(skip)]
    pub znear: f32,
    /// Far clipping plane distance.
    #[schemars(skip)]
    pub zfar: f32,
    /// Rotation sensitivity multiplier.
    #[schemars(title = "Rotate Speed", range(min = 0.1, max = 3.0), extend("step" = 0.05))]
    pub rotate_speed: f32,
    /// Pan sensitivity multiplier.
    #[schemars(title = "Pan Speed", range(min = 0.1, max = 3.0), extend("step" = 0.05))]
    pub pan_speed: f32,
    /// Zoom sensitivity multiplier.
    #[schemars(title = "Zoom Speed", range(min = 0.01, max = 0.5), extend("step" = 0.01))]
    pub zoom_speed: f32,
    /// Keep orbiting after the mouse is released, decaying each frame.
    #[schemars(title = "Damping")]
    pub enable_damping: bool,
    /// Share of the pending motion applied per frame when damping.
    #[schemars(title = "Damping Factor", range(min = 0.01, max = 0.5), extend("step" = 0.01))]
    pub damping_factor: f32,
    /// Closest allowed orbit distance.
    #[schemars(skip)]
    pub min_distance: f32,
    /// Farthest allowed orbit distance.
    #[schemars(skip)]
    pub max_distance: f32,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            fovy: 75.0,
            znear: 0.1,
            zfar: 100.0,
            rotate_speed: 1.0,
            pan_speed: 1.0,
            zoom_speed: 0.1,
            enable_damping: true,
            damping_factor: 0.05,
            min_distance: 0.2,
            max_distance: 60.0,
        }
    }
}
