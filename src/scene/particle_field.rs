use rand::Rng;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::point_cloud::PointCloud;
use crate::util::color::Color;

/// Parameters of the random particle cube.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Particles", inline)]
#[serde(default)]
pub struct ParticleFieldParameters {
    /// Number of particles.
    #[schemars(title = "Count", range(min = 100, max = 200_000), extend("step" = 100))]
    pub count: u32,
    /// Edge length of the cube, centered on the origin.
    #[schemars(title = "Extent", range(min = 1.0, max = 40.0), extend("step" = 0.5))]
    pub extent: f32,
    /// Point sprite size in world units.
    #[schemars(title = "Size", range(min = 0.01, max = 0.5), extend("step" = 0.01))]
    pub size: f32,
    /// Animate `y = sin(t + x)` every frame.
    #[schemars(title = "Wobble")]
    pub wobble: bool,
}

impl Default for ParticleFieldParameters {
    fn default() -> Self {
        Self {
            count: 20_000,
            extent: 10.0,
            size: 0.1,
            wobble: true,
        }
    }
}

/// A cube of randomly placed, randomly colored points.
///
/// Unlike the galaxy, the field is animated in place: [`wobble`] rewrites
/// the y coordinate of every point each frame without reallocating.
///
/// [`wobble`]: ParticleField::wobble
#[derive(Debug, Clone)]
pub struct ParticleField {
    params: ParticleFieldParameters,
    cloud: PointCloud,
}

impl ParticleField {
    /// Scatter `params.count` points uniformly in the cube.
    pub fn generate<R: Rng + ?Sized>(
        params: ParticleFieldParameters,
        rng: &mut R,
    ) -> Self {
        let mut cloud = PointCloud::with_capacity(params.count as usize);
        for _ in 0..params.count {
            let position = (glam::Vec3::new(
                rng.random(),
                rng.random(),
                rng.random(),
            ) - 0.5)
                * params.extent;
            let color = Color::new(rng.random(), rng.random(), rng.random());
            cloud.push(position, color);
        }
        Self { params, cloud }
    }

    /// Set every point's height to `sin(elapsed + x)`.
    pub fn wobble(&mut self, elapsed: f32) {
        for p in self.cloud.positions_mut().chunks_exact_mut(3) {
            p[1] = (elapsed + p[0]).sin();
        }
    }

    /// Advance the animation to `elapsed` seconds. Returns `true` if
    /// positions changed.
    pub fn update(&mut self, elapsed: f32) -> bool {
        if self.params.wobble {
            self.wobble(elapsed);
            true
        } else {
            false
        }
    }

    /// Toggle the wobble animation.
    pub fn set_wobble(&mut self, enabled: bool) {
        self.params.wobble = enabled;
    }

    /// Change the sprite size. Positions are untouched.
    pub fn set_size(&mut self, size: f32) {
        self.params.size = size;
    }

    /// Current parameters.
    #[must_use]
    pub fn params(&self) -> &ParticleFieldParameters {
        &self.params
    }

    /// Current cloud.
    #[must_use]
    pub fn cloud(&self) -> &PointCloud {
        &self.cloud
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;

    fn field(count: u32) -> ParticleField {
        let params = ParticleFieldParameters {
            count,
            ..Default::default()
        };
        ParticleField::generate(params, &mut StdRng::seed_from_u64(17))
    }

    #[test]
    fn points_fill_the_cube() {
        let field = field(2_000);
        assert_eq!(field.cloud().len(), 2_000);
        let half = field.params().extent / 2.0;
        for (p, c) in field.cloud().iter() {
            assert!(p.abs().max_element() <= half);
            for v in c.to_array() {
                assert!((0.0..1.0).contains(&v));
            }
        }
    }

    #[test]
    fn wobble_rewrites_heights_only() {
        let mut field = field(500);
        let before = field.cloud().clone();
        field.wobble(1.5);

        for ((old, _), (new, _)) in before.iter().zip(field.cloud().iter()) {
            assert_eq!(new.x, old.x);
            assert_eq!(new.z, old.z);
            assert!((new.y - (1.5 + old.x).sin()).abs() < 1e-6);
        }
        assert_eq!(field.cloud().len(), 500);
    }

    #[test]
    fn disabled_wobble_leaves_positions_alone() {
        let mut field = field(50);
        field.set_wobble(false);
        let before = field.cloud().clone();
        assert!(!field.update(3.0));
        assert_eq!(field.cloud(), &before);

        field.set_wobble(true);
        assert!(field.update(3.0));
        assert_ne!(field.cloud(), &before);
    }
}
