use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::util::color::Color;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Display", inline)]
#[serde(default)]
/// Framebuffer and point-material settings.
pub struct DisplayOptions {
    /// Background color.
    #[schemars(title = "Background", with = "String", extend("format" = "color"))]
    pub clear_color: Color,
    /// Upper bound on the device pixel ratio used for rendering.
    #[schemars(title = "Max Pixel Ratio", range(min = 1.0, max = 4.0), extend("step" = 0.5))]
    pub max_pixel_ratio: f32,
    /// Shrink point sprites with distance from the camera.
    #[schemars(title = "Size Attenuation")]
    pub size_attenuation: bool,
    /// Frame rate cap (0 = unlimited, presentation is still vsynced).
    #[schemars(skip)]
    pub target_fps: u32,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            clear_color: Color::BLACK,
            max_pixel_ratio: 2.0,
            size_attenuation: true,
            target_fps: 0,
        }
    }
}

impl DisplayOptions {
    /// Render pixel ratio for a device reporting `scale_factor`.
    #[must_use]
    pub fn pixel_ratio(&self, scale_factor: f64) -> f32 {
        (scale_factor as f32).min(self.max_pixel_ratio).max(0.5)
    }
}
