//! Which scene is live, and what the GPU must do to catch up with it.
//!
//! Everything here is CPU-side so the regeneration policy can be tested
//! without a device.

use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::galaxy::{GalaxyError, GalaxyParameters};
use crate::options::Options;
use crate::scene::{
    DemoScene, GalaxyScene, ParticleField, ParticleFieldParameters, SceneKind,
    SeedMode,
};

/// GPU work owed after a CPU-side change. Ordered by cost so pending work
/// can be merged with `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum Upload {
    /// GPU buffer is current.
    None,
    /// Same point count, overwrite in place.
    Write,
    /// New cloud, release the old buffer and allocate a fresh one.
    Replace,
}

/// Starting eye position for each scene.
pub(crate) fn initial_eye(kind: SceneKind) -> Vec3 {
    match kind {
        SceneKind::Galaxy => Vec3::new(3.0, 3.0, 3.0),
        SceneKind::ParticleField => Vec3::new(0.0, 0.0, 3.0),
    }
}

/// Framebuffer size for a window of `physical` pixels when the device
/// reports `scale_factor` but rendering is capped at `pixel_ratio`.
pub(crate) fn render_size(
    physical: (u32, u32),
    scale_factor: f64,
    pixel_ratio: f32,
) -> (u32, u32) {
    let ratio = f64::from(pixel_ratio) / scale_factor.max(f64::EPSILON);
    if ratio >= 1.0 {
        return physical;
    }
    let scale = |v: u32| ((f64::from(v) * ratio).round() as u32).max(1);
    (scale(physical.0), scale(physical.1))
}

/// What [`SceneSlot::apply_options`] settled on.
#[derive(Debug)]
pub(crate) struct AppliedOptions {
    /// Options now in effect, with rejected galaxy parameters rolled back.
    pub(crate) options: Options,
    /// The scene was rebuilt from scratch (new seed or new scene kind).
    pub(crate) rebuilt: bool,
    /// The pixel-ratio cap moved, so the surface must be resized.
    pub(crate) pixel_ratio_changed: bool,
}

fn particle_rng(seed: SeedMode) -> StdRng {
    match seed {
        SeedMode::Fixed(seed) => StdRng::seed_from_u64(seed),
        SeedMode::Random => StdRng::seed_from_u64(rand::random()),
    }
}

/// The live scene plus the upload it still owes the GPU.
#[derive(Debug)]
pub(crate) struct SceneSlot {
    scene: DemoScene,
    pending: Upload,
}

impl SceneSlot {
    /// Build `kind` from `options`.
    pub(crate) fn new(
        kind: SceneKind,
        options: &Options,
    ) -> Result<Self, GalaxyError> {
        Ok(Self {
            scene: Self::build(kind, options)?,
            pending: Upload::Replace,
        })
    }

    fn build(
        kind: SceneKind,
        options: &Options,
    ) -> Result<DemoScene, GalaxyError> {
        Ok(match kind {
            SceneKind::Galaxy => DemoScene::Galaxy(GalaxyScene::new(
                options.galaxy.clone(),
                options.seed,
            )?),
            SceneKind::ParticleField => {
                DemoScene::ParticleField(ParticleField::generate(
                    options.particles.clone(),
                    &mut particle_rng(options.seed),
                ))
            }
        })
    }

    /// Tear down the current scene and build `kind`. The old scene is kept
    /// if the new one cannot be built.
    pub(crate) fn switch(
        &mut self,
        kind: SceneKind,
        options: &Options,
    ) -> Result<(), GalaxyError> {
        let scene = Self::build(kind, options)?;
        self.scene = scene;
        self.pending = Upload::Replace;
        log::info!("switched to {kind} ({} points)", self.scene.cloud().len());
        Ok(())
    }

    /// Regenerate with a fresh seed.
    pub(crate) fn reseed(&mut self) -> Result<(), GalaxyError> {
        match &mut self.scene {
            DemoScene::Galaxy(galaxy) => {
                let _ = galaxy.reseed()?;
            }
            DemoScene::ParticleField(field) => {
                *field = ParticleField::generate(
                    field.params().clone(),
                    &mut particle_rng(SeedMode::Random),
                );
            }
        }
        self.pending = Upload::Replace;
        Ok(())
    }

    /// Flip the particle wobble. Returns the new state, or `None` when the
    /// galaxy is showing.
    pub(crate) fn toggle_wobble(&mut self) -> Option<bool> {
        match &mut self.scene {
            DemoScene::ParticleField(field) => {
                let enabled = !field.params().wobble;
                field.set_wobble(enabled);
                Some(enabled)
            }
            DemoScene::Galaxy(_) => None,
        }
    }

    /// Advance animation to `elapsed` seconds.
    pub(crate) fn update(&mut self, elapsed: f32) {
        if self.scene.update(elapsed) {
            self.pending = self.pending.max(Upload::Write);
        }
    }

    /// Rebuild the galaxy if `params` differ from the current ones.
    /// A no-op while the particle field is showing.
    pub(crate) fn apply_galaxy(
        &mut self,
        params: &GalaxyParameters,
    ) -> Result<(), GalaxyError> {
        if let DemoScene::Galaxy(galaxy) = &mut self.scene {
            if galaxy.apply(params)? {
                self.pending = Upload::Replace;
            }
        }
        Ok(())
    }

    /// Move from `current` options to `new`.
    ///
    /// Galaxy parameters that fail validation are logged and replaced by
    /// the current ones, so the previous galaxy stays on screen. A new seed
    /// or scene kind rebuilds the scene; otherwise only the changed
    /// parameters are applied.
    pub(crate) fn apply_options(
        &mut self,
        current: &Options,
        mut new: Options,
    ) -> AppliedOptions {
        if let Err(e) = new.galaxy.validate() {
            log::warn!("rejected galaxy parameters: {e}");
            new.galaxy = current.galaxy.clone();
        }

        let mut rebuilt = false;
        if new.seed != current.seed || new.scene != current.scene {
            match self.switch(new.scene, &new) {
                Ok(()) => rebuilt = true,
                Err(e) => log::warn!("cannot switch to {}: {e}", new.scene),
            }
        } else {
            if let Err(e) = self.apply_galaxy(&new.galaxy) {
                log::warn!("galaxy regeneration failed: {e}");
                new.galaxy = current.galaxy.clone();
            }
            self.apply_particles(&new.particles, new.seed);
        }

        new.scene = self.kind();
        let pixel_ratio_changed =
            new.display.max_pixel_ratio != current.display.max_pixel_ratio;
        AppliedOptions {
            options: new,
            rebuilt,
            pixel_ratio_changed,
        }
    }

    /// Bring the particle field in line with `params`: new count or extent
    /// regenerates, new size re-uploads, wobble toggles in place.
    pub(crate) fn apply_particles(
        &mut self,
        params: &ParticleFieldParameters,
        seed: SeedMode,
    ) {
        let DemoScene::ParticleField(field) = &mut self.scene else {
            return;
        };
        let current = field.params();
        if current.count != params.count || current.extent != params.extent {
            *field =
                ParticleField::generate(params.clone(), &mut particle_rng(seed));
            self.pending = Upload::Replace;
            return;
        }
        if current.size != params.size {
            field.set_size(params.size);
            self.pending = self.pending.max(Upload::Write);
        }
        field.set_wobble(params.wobble);
    }

    /// Hand over the owed upload, leaving the slot clean.
    pub(crate) fn take_pending(&mut self) -> Upload {
        std::mem::replace(&mut self.pending, Upload::None)
    }

    pub(crate) fn scene(&self) -> &DemoScene {
        &self.scene
    }

    pub(crate) fn kind(&self) -> SceneKind {
        self.scene.kind()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> Options {
        let mut options = Options::default();
        options.seed = SeedMode::Fixed(8);
        options.galaxy.count = 300;
        options.particles.count = 200;
        options
    }

    #[test]
    fn new_slot_owes_a_full_upload() {
        let mut slot = SceneSlot::new(SceneKind::Galaxy, &options()).unwrap();
        assert_eq!(slot.take_pending(), Upload::Replace);
        assert_eq!(slot.take_pending(), Upload::None);
        assert_eq!(slot.scene().cloud().len(), 300);
    }

    #[test]
    fn galaxy_never_asks_for_per_frame_writes() {
        let mut slot = SceneSlot::new(SceneKind::Galaxy, &options()).unwrap();
        let _ = slot.take_pending();
        slot.update(1.0);
        slot.update(2.0);
        assert_eq!(slot.take_pending(), Upload::None);
        assert_eq!(slot.toggle_wobble(), None);
    }

    #[test]
    fn wobbling_field_writes_every_frame() {
        let mut slot =
            SceneSlot::new(SceneKind::ParticleField, &options()).unwrap();
        let _ = slot.take_pending();
        slot.update(0.1);
        assert_eq!(slot.take_pending(), Upload::Write);

        assert_eq!(slot.toggle_wobble(), Some(false));
        slot.update(0.2);
        assert_eq!(slot.take_pending(), Upload::None);
    }

    #[test]
    fn replace_is_not_downgraded_by_animation() {
        let mut slot =
            SceneSlot::new(SceneKind::ParticleField, &options()).unwrap();
        slot.update(0.1);
        assert_eq!(slot.take_pending(), Upload::Replace);
    }

    #[test]
    fn galaxy_parameter_change_replaces() {
        let opts = options();
        let mut slot = SceneSlot::new(SceneKind::Galaxy, &opts).unwrap();
        let _ = slot.take_pending();

        slot.apply_galaxy(&opts.galaxy).unwrap();
        assert_eq!(slot.take_pending(), Upload::None);

        let mut params = opts.galaxy.clone();
        params.count = 50;
        slot.apply_galaxy(&params).unwrap();
        assert_eq!(slot.take_pending(), Upload::Replace);
        assert_eq!(slot.scene().cloud().len(), 50);
    }

    #[test]
    fn rejected_galaxy_parameters_keep_the_cloud() {
        let opts = options();
        let mut slot = SceneSlot::new(SceneKind::Galaxy, &opts).unwrap();
        let _ = slot.take_pending();
        let before = slot.scene().cloud().clone();

        let mut params = opts.galaxy.clone();
        params.branches = 1;
        assert!(slot.apply_galaxy(&params).is_err());
        assert_eq!(slot.scene().cloud(), &before);
        assert_eq!(slot.take_pending(), Upload::None);
    }

    #[test]
    fn particle_changes_pick_the_cheapest_upload() {
        let opts = options();
        let mut slot = SceneSlot::new(SceneKind::ParticleField, &opts).unwrap();
        let _ = slot.take_pending();

        let mut params = opts.particles.clone();
        params.size = 0.3;
        slot.apply_particles(&params, opts.seed);
        assert_eq!(slot.take_pending(), Upload::Write);
        assert_eq!(slot.scene().point_size(), 0.3);

        params.count = 20;
        slot.apply_particles(&params, opts.seed);
        assert_eq!(slot.take_pending(), Upload::Replace);
        assert_eq!(slot.scene().cloud().len(), 20);
    }

    #[test]
    fn size_and_wobble_change_together() {
        let opts = options();
        let mut slot = SceneSlot::new(SceneKind::ParticleField, &opts).unwrap();
        let _ = slot.take_pending();

        let mut params = opts.particles.clone();
        params.size = 0.3;
        params.wobble = false;
        slot.apply_particles(&params, opts.seed);

        assert!(matches!(
            slot.scene(),
            DemoScene::ParticleField(field) if field.params() == &params
        ));
        assert_eq!(slot.take_pending(), Upload::Write);
        slot.update(1.0);
        assert_eq!(slot.take_pending(), Upload::None);
    }

    #[test]
    fn invalid_galaxy_options_roll_back() {
        let current = options();
        let mut slot = SceneSlot::new(SceneKind::Galaxy, &current).unwrap();
        let _ = slot.take_pending();
        let before = slot.scene().cloud().clone();

        let mut new = current.clone();
        new.galaxy.randomness_power = -60.0;
        new.camera.fovy = 60.0;
        let applied = slot.apply_options(&current, new);

        assert_eq!(applied.options.galaxy, current.galaxy);
        assert_eq!(applied.options.camera.fovy, 60.0);
        assert!(!applied.rebuilt);
        assert!(!applied.pixel_ratio_changed);
        assert_eq!(slot.scene().cloud(), &before);
        assert_eq!(slot.take_pending(), Upload::None);
    }

    #[test]
    fn changed_galaxy_options_regenerate_in_place() {
        let current = options();
        let mut slot = SceneSlot::new(SceneKind::Galaxy, &current).unwrap();
        let _ = slot.take_pending();

        let mut new = current.clone();
        new.galaxy.count = 120;
        new.display.max_pixel_ratio = 1.0;
        let applied = slot.apply_options(&current, new.clone());

        assert_eq!(applied.options, new);
        assert!(!applied.rebuilt);
        assert!(applied.pixel_ratio_changed);
        assert_eq!(slot.scene().cloud().len(), 120);
        assert_eq!(slot.take_pending(), Upload::Replace);
    }

    #[test]
    fn new_seed_or_scene_rebuilds() {
        let current = options();
        let mut slot = SceneSlot::new(SceneKind::Galaxy, &current).unwrap();
        let _ = slot.take_pending();

        let mut new = current.clone();
        new.seed = SeedMode::Fixed(9);
        let applied = slot.apply_options(&current, new);
        assert!(applied.rebuilt);
        assert_eq!(slot.take_pending(), Upload::Replace);

        let current = applied.options;
        let mut new = current.clone();
        new.scene = SceneKind::ParticleField;
        let applied = slot.apply_options(&current, new);
        assert!(applied.rebuilt);
        assert_eq!(applied.options.scene, SceneKind::ParticleField);
        assert_eq!(slot.kind(), SceneKind::ParticleField);
        assert_eq!(slot.scene().cloud().len(), 200);
    }

    #[test]
    fn switching_scenes_replaces_the_cloud() {
        let opts = options();
        let mut slot = SceneSlot::new(SceneKind::Galaxy, &opts).unwrap();
        let _ = slot.take_pending();
        slot.switch(SceneKind::ParticleField, &opts).unwrap();
        assert_eq!(slot.kind(), SceneKind::ParticleField);
        assert_eq!(slot.take_pending(), Upload::Replace);
        assert_eq!(slot.scene().cloud().len(), 200);
    }

    #[test]
    fn failed_switch_keeps_current_scene() {
        let mut opts = options();
        let mut slot =
            SceneSlot::new(SceneKind::ParticleField, &opts).unwrap();
        opts.galaxy.radius = 0.0;
        assert!(slot.switch(SceneKind::Galaxy, &opts).is_err());
        assert_eq!(slot.kind(), SceneKind::ParticleField);
    }

    #[test]
    fn reseed_regenerates_either_scene() {
        let opts = options();
        for kind in [SceneKind::Galaxy, SceneKind::ParticleField] {
            let mut slot = SceneSlot::new(kind, &opts).unwrap();
            let _ = slot.take_pending();
            let before = slot.scene().cloud().clone();
            slot.reseed().unwrap();
            assert_eq!(slot.take_pending(), Upload::Replace);
            assert_eq!(slot.scene().cloud().len(), before.len());
            assert_ne!(slot.scene().cloud(), &before);
        }
    }

    #[test]
    fn render_size_caps_pixel_ratio() {
        // Scale factor within the cap renders at full resolution.
        assert_eq!(render_size((1600, 1200), 2.0, 2.0), (1600, 1200));
        // A 3x display capped at 2x renders two thirds of the pixels.
        assert_eq!(render_size((3000, 1500), 3.0, 2.0), (2000, 1000));
        assert_eq!(render_size((1, 1), 3.0, 0.5), (1, 1));
    }

    #[test]
    fn scenes_start_from_their_own_viewpoints() {
        assert_eq!(initial_eye(SceneKind::Galaxy), Vec3::splat(3.0));
        assert_eq!(initial_eye(SceneKind::ParticleField), Vec3::new(0.0, 0.0, 3.0));
    }
}
