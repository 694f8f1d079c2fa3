//! Demo scenes: what gets drawn and how it changes over time.
//!
//! A scene owns its point cloud and decides when the renderer must take a
//! fresh copy. The galaxy is rebuilt from scratch on parameter changes; the
//! particle field is rewritten in place every frame.

mod galaxy;
mod particle_field;

use std::fmt;
use std::str::FromStr;

pub use galaxy::{GalaxyScene, SeedMode};
pub use particle_field::{ParticleField, ParticleFieldParameters};
use serde::{Deserialize, Serialize};

use crate::point_cloud::PointCloud;

/// Which demo is on screen.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SceneKind {
    /// Spiral galaxy.
    #[default]
    Galaxy,
    /// Wobbling particle cube.
    ParticleField,
}

impl SceneKind {
    /// The other scene.
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Galaxy => Self::ParticleField,
            Self::ParticleField => Self::Galaxy,
        }
    }
}

impl fmt::Display for SceneKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Galaxy => "galaxy",
            Self::ParticleField => "particles",
        })
    }
}

impl FromStr for SceneKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "galaxy" => Ok(Self::Galaxy),
            "particles" | "particle_field" => Ok(Self::ParticleField),
            other => Err(format!(
                "unknown scene '{other}' (expected galaxy or particles)"
            )),
        }
    }
}

/// The active demo and its data.
#[derive(Debug)]
pub enum DemoScene {
    /// Spiral galaxy.
    Galaxy(GalaxyScene),
    /// Wobbling particle cube.
    ParticleField(ParticleField),
}

impl DemoScene {
    /// Which demo this is.
    #[must_use]
    pub fn kind(&self) -> SceneKind {
        match self {
            Self::Galaxy(_) => SceneKind::Galaxy,
            Self::ParticleField(_) => SceneKind::ParticleField,
        }
    }

    /// Points to draw.
    #[must_use]
    pub fn cloud(&self) -> &PointCloud {
        match self {
            Self::Galaxy(g) => g.cloud(),
            Self::ParticleField(p) => p.cloud(),
        }
    }

    /// Sprite size in world units.
    #[must_use]
    pub fn point_size(&self) -> f32 {
        match self {
            Self::Galaxy(g) => g.params().size,
            Self::ParticleField(p) => p.params().size,
        }
    }

    /// Advance time-driven animation. Returns `true` if the cloud changed
    /// in place and must be re-uploaded.
    pub fn update(&mut self, elapsed: f32) -> bool {
        match self {
            Self::Galaxy(_) => false,
            Self::ParticleField(p) => p.update(elapsed),
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use super::*;
    use crate::galaxy::GalaxyParameters;

    #[test]
    fn scene_kind_parses_and_cycles() {
        assert_eq!("galaxy".parse::<SceneKind>(), Ok(SceneKind::Galaxy));
        assert_eq!("particles".parse::<SceneKind>(), Ok(SceneKind::ParticleField));
        assert!("house".parse::<SceneKind>().is_err());
        assert_eq!(SceneKind::Galaxy.next(), SceneKind::ParticleField);
        assert_eq!(SceneKind::ParticleField.next(), SceneKind::Galaxy);
        assert_eq!(SceneKind::ParticleField.to_string(), "particles");
    }

    #[test]
    fn galaxy_scene_is_static_between_regenerations() {
        let params = GalaxyParameters {
            count: 50,
            ..Default::default()
        };
        let mut scene = DemoScene::Galaxy(
            GalaxyScene::new(params, SeedMode::Fixed(1)).unwrap(),
        );
        let before = scene.cloud().clone();
        assert!(!scene.update(10.0));
        assert_eq!(scene.cloud(), &before);
        assert_eq!(scene.point_size(), 0.01);
        assert_eq!(scene.kind(), SceneKind::Galaxy);
    }

    #[test]
    fn particle_scene_animates() {
        let field = ParticleField::generate(
            ParticleFieldParameters {
                count: 10,
                ..Default::default()
            },
            &mut StdRng::seed_from_u64(3),
        );
        let mut scene = DemoScene::ParticleField(field);
        assert!(scene.update(0.5));
        assert_eq!(scene.kind(), SceneKind::ParticleField);
        assert_eq!(scene.point_size(), 0.1);
    }
}
