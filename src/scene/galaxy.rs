use serde::{Deserialize, Serialize};

use crate::galaxy::{generate_seeded, GalaxyError, GalaxyParameters};
use crate::point_cloud::PointCloud;

/// How the random source is seeded on each regeneration.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SeedMode {
    /// Same seed every time: identical parameters give identical buffers.
    Fixed(u64),
    /// Fresh seed on every regeneration.
    #[default]
    Random,
}

/// Owns the current galaxy cloud and rebuilds it from scratch whenever the
/// parameters change.
///
/// There is no incremental update: every successful
/// [`regenerate`](Self::regenerate) releases the previous buffers before the
/// new ones are allocated.
#[derive(Debug)]
pub struct GalaxyScene {
    params: GalaxyParameters,
    cloud: PointCloud,
    seed_mode: SeedMode,
    seed: u64,
    generation: u64,
}

impl GalaxyScene {
    /// Generate the initial cloud.
    ///
    /// # Errors
    ///
    /// Returns [`GalaxyError`] if `params` fails validation.
    pub fn new(
        params: GalaxyParameters,
        seed_mode: SeedMode,
    ) -> Result<Self, GalaxyError> {
        let mut scene = Self {
            params,
            cloud: PointCloud::new(),
            seed_mode,
            seed: 0,
            generation: 0,
        };
        let params = scene.params.clone();
        let _ = scene.regenerate(params)?;
        Ok(scene)
    }

    /// Tear down the current cloud and build a new one from `params`.
    ///
    /// On a validation error the previous cloud and parameters are kept
    /// untouched.
    ///
    /// # Errors
    ///
    /// Returns [`GalaxyError`] if `params` fails validation.
    pub fn regenerate(
        &mut self,
        params: GalaxyParameters,
    ) -> Result<&PointCloud, GalaxyError> {
        params.validate()?;

        drop(std::mem::take(&mut self.cloud));

        let seed = match self.seed_mode {
            SeedMode::Fixed(seed) => seed,
            SeedMode::Random => rand::random(),
        };
        let start = web_time::Instant::now();
        self.cloud = generate_seeded(&params, seed)?;
        self.params = params;
        self.seed = seed;
        self.generation += 1;

        log::info!(
            "galaxy #{}: {} particles, {} arms, seed {seed} in {:.1} ms",
            self.generation,
            self.cloud.len(),
            self.params.branches,
            start.elapsed().as_secs_f64() * 1000.0,
        );
        Ok(&self.cloud)
    }

    /// Rebuild only if `params` differs from the current set. Returns
    /// `true` when a new cloud was generated.
    ///
    /// # Errors
    ///
    /// Returns [`GalaxyError`] if a rebuild was needed and `params` fails
    /// validation.
    pub fn apply(
        &mut self,
        params: &GalaxyParameters,
    ) -> Result<bool, GalaxyError> {
        if !self.params.needs_rebuild(params) {
            return Ok(false);
        }
        let _ = self.regenerate(params.clone())?;
        Ok(true)
    }

    /// Pick a new random seed and rebuild with the current parameters.
    ///
    /// # Errors
    ///
    /// Never fails in practice: the current parameters already passed
    /// validation.
    pub fn reseed(&mut self) -> Result<&PointCloud, GalaxyError> {
        if let SeedMode::Fixed(_) = self.seed_mode {
            self.seed_mode = SeedMode::Fixed(rand::random());
        }
        let params = self.params.clone();
        self.regenerate(params)
    }

    /// Current parameters.
    #[must_use]
    pub fn params(&self) -> &GalaxyParameters {
        &self.params
    }

    /// Current cloud.
    #[must_use]
    pub fn cloud(&self) -> &PointCloud {
        &self.cloud
    }

    /// Seed used for the current cloud.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Seed policy.
    #[must_use]
    pub fn seed_mode(&self) -> SeedMode {
        self.seed_mode
    }

    /// Number of clouds built so far, starting at 1 for the initial one.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }
}
