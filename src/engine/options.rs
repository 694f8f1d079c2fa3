//! Options methods for [`NebulaEngine`].

use super::scene_management::initial_eye;
use super::NebulaEngine;
use crate::options::Options;

impl NebulaEngine {
    /// Replace the options and apply every change.
    ///
    /// Changed galaxy parameters regenerate the galaxy from scratch.
    /// Parameters that fail validation are logged and dropped: the
    /// previous galaxy and its parameters stay in place. Camera and display
    /// settings apply without touching the scene.
    pub fn set_options(&mut self, new: Options) {
        let applied = self.slot.apply_options(&self.options, new);
        if applied.rebuilt {
            self.camera_controller
                .look_from(initial_eye(applied.options.scene));
        }

        let options = applied.options;
        self.camera_controller
            .set_options(&options.camera, &options.display);
        self.frame_timing.set_target_fps(options.display.target_fps);
        self.options = options;

        if applied.pixel_ratio_changed {
            self.set_scale_factor(self.scale_factor);
        }
    }

    /// Load a TOML preset from `path` and apply it.
    ///
    /// # Errors
    ///
    /// Returns the load error; the current options stay in effect.
    pub fn load_preset(
        &mut self,
        path: &std::path::Path,
    ) -> Result<(), crate::NebulaError> {
        let options = Options::load(path)?;
        log::info!("loaded preset {}", path.display());
        self.set_options(options);
        Ok(())
    }
}
