use std::f32::consts::TAU;

use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::params::{GalaxyError, GalaxyParameters};
use crate::point_cloud::PointCloud;
use crate::util::color::Color;

/// One generated particle, with the intermediate values that placed it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GalaxyParticle {
    /// Particle index in `[0, count)`.
    pub index: u32,
    /// Unjittered distance from the center, in `[0, radius)`.
    pub radius: f32,
    /// Angle of the arm this particle belongs to.
    pub branch_angle: f32,
    /// Extra twist, `radius * spin`.
    pub spin_angle: f32,
    /// Final position including jitter.
    pub position: Vec3,
    /// Inside/outside blend at this radius, in linear light.
    pub color: Color,
}

/// Angle of arm `index mod branches`, evenly spaced over a full turn.
///
/// `branches` must be non-zero; [`GalaxyParameters::validate`] guarantees
/// at least two.
#[must_use]
pub fn branch_angle(index: u32, branches: u32) -> f32 {
    (index % branches) as f32 / branches as f32 * TAU
}

/// Streams galaxy particles one at a time from a random source.
///
/// Each particle consumes seven draws in a fixed order: the radius, then
/// a magnitude and a sign for each of the x, y and z jitters.
pub struct GalaxySampler<'a, R> {
    params: &'a GalaxyParameters,
    rng: R,
    inside: Color,
    outside: Color,
    next: u32,
}

impl<'a, R: Rng> GalaxySampler<'a, R> {
    /// Sampler over `params.count` particles.
    ///
    /// # Errors
    ///
    /// Returns [`GalaxyError`] if `params` fails validation.
    pub fn new(params: &'a GalaxyParameters, rng: R) -> Result<Self, GalaxyError> {
        params.validate()?;
        Ok(Self {
            params,
            rng,
            inside: params.inside_color.to_linear(),
            outside: params.outside_color.to_linear(),
            next: 0,
        })
    }

    fn jitter(&mut self, radius: f32) -> f32 {
        let magnitude = self
            .rng
            .random::<f32>()
            .powf(self.params.randomness_power);
        let sign = if self.rng.random::<f32>() < 0.5 { 1.0 } else { -1.0 };
        magnitude * sign * self.params.randomness * radius
    }

    fn sample(&mut self, index: u32) -> GalaxyParticle {
        let p = self.params;
        let radius = below(self.rng.random::<f32>() * p.radius, p.radius);
        let spin_angle = radius * p.spin;
        let branch_angle = branch_angle(index, p.branches);

        let jitter = Vec3::new(
            self.jitter(radius),
            self.jitter(radius),
            self.jitter(radius),
        );

        let angle = branch_angle + spin_angle;
        let position =
            Vec3::new(angle.cos() * radius, 0.0, angle.sin() * radius) + jitter;
        let color = self.inside.lerp(self.outside, radius / p.radius);

        GalaxyParticle {
            index,
            radius,
            branch_angle,
            spin_angle,
            position,
            color,
        }
    }
}

impl<R: Rng> Iterator for GalaxySampler<'_, R> {
    type Item = GalaxyParticle;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.params.count {
            return None;
        }
        let index = self.next;
        self.next += 1;
        Some(self.sample(index))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = (self.params.count - self.next) as usize;
        (remaining, Some(remaining))
    }
}

impl<R: Rng> ExactSizeIterator for GalaxySampler<'_, R> {}

/// Keep `value` strictly below a positive `limit`. `random() * limit` can
/// round up to `limit` itself in `f32`.
fn below(value: f32, limit: f32) -> f32 {
    if value < limit {
        value
    } else {
        f32::from_bits(limit.to_bits() - 1)
    }
}

/// Generate a full galaxy point cloud from `rng`.
///
/// # Errors
///
/// Returns [`GalaxyError`] if `params` fails validation; nothing is
/// allocated in that case.
pub fn generate<R: Rng + ?Sized>(
    params: &GalaxyParameters,
    rng: &mut R,
) -> Result<PointCloud, GalaxyError> {
    let sampler = GalaxySampler::new(params, rng)?;
    let mut cloud = PointCloud::with_capacity(sampler.len());
    for particle in sampler {
        cloud.push(particle.position, particle.color);
    }
    Ok(cloud)
}

/// Generate from a deterministic source seeded with `seed`.
///
/// # Errors
///
/// Returns [`GalaxyError`] if `params` fails validation.
pub fn generate_seeded(
    params: &GalaxyParameters,
    seed: u64,
) -> Result<PointCloud, GalaxyError> {
    generate(params, &mut StdRng::seed_from_u64(seed))
}
