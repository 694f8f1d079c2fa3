use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::util::color::Color;

/// Reasons a parameter set is rejected before generation.
#[derive(Debug, Clone, PartialEq)]
pub enum GalaxyError {
    /// Fewer than two arms. Zero would divide by zero when assigning
    /// branch angles.
    TooFewBranches(u32),
    /// Radius must be finite and positive.
    InvalidRadius(f32),
    /// Point size must be finite and positive.
    InvalidSize(f32),
    /// Jitter magnitude must not be negative.
    NegativeRandomness(f32),
    /// Jitter exponent must be positive. Zero or below makes
    /// `random()^power` blow up near zero draws.
    InvalidRandomnessPower(f32),
    /// A field that must be finite was NaN or infinite.
    NonFinite(&'static str),
}

impl fmt::Display for GalaxyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewBranches(n) => {
                write!(f, "galaxy needs at least 2 branches, got {n}")
            }
            Self::InvalidRadius(r) => {
                write!(f, "galaxy radius must be positive, got {r}")
            }
            Self::InvalidSize(s) => {
                write!(f, "point size must be positive, got {s}")
            }
            Self::NegativeRandomness(r) => {
                write!(f, "randomness must not be negative, got {r}")
            }
            Self::InvalidRandomnessPower(p) => {
                write!(f, "randomness power must be positive, got {p}")
            }
            Self::NonFinite(field) => write!(f, "{field} must be finite"),
        }
    }
}

impl std::error::Error for GalaxyError {}

/// Shape and color parameters of a spiral galaxy.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Galaxy", inline)]
#[serde(default)]
pub struct GalaxyParameters {
    /// Number of particles.
    #[schemars(title = "Count", range(min = 100, max = 1_000_000), extend("step" = 100))]
    pub count: u32,
    /// Point sprite size in world units (with size attenuation).
    #[schemars(title = "Size", range(min = 0.001, max = 0.1), extend("step" = 0.001))]
    pub size: f32,
    /// Outer radius of the disc.
    #[schemars(title = "Radius", range(min = 0.01, max = 20.0), extend("step" = 0.01))]
    pub radius: f32,
    /// Number of spiral arms.
    #[schemars(title = "Branches", range(min = 2, max = 20), extend("step" = 1))]
    pub branches: u32,
    /// Angular twist per unit of radius.
    #[schemars(title = "Spin", range(min = -5.0, max = 5.0), extend("step" = 0.001))]
    pub spin: f32,
    /// Jitter magnitude as a fraction of the particle's radius.
    #[schemars(title = "Randomness", range(min = 0.0, max = 2.0), extend("step" = 0.001))]
    pub randomness: f32,
    /// Exponent concentrating jitter toward zero.
    #[schemars(title = "Randomness Power", range(min = 1.0, max = 10.0), extend("step" = 0.001))]
    pub randomness_power: f32,
    /// Color at the core.
    #[schemars(title = "Inside Color", with = "String", extend("format" = "color"))]
    pub inside_color: Color,
    /// Color at the rim.
    #[schemars(title = "Outside Color", with = "String", extend("format" = "color"))]
    pub outside_color: Color,
}

impl Default for GalaxyParameters {
    fn default() -> Self {
        Self {
            count: 100_000,
            size: 0.01,
            radius: 5.0,
            branches: 3,
            spin: 1.0,
            randomness: 0.2,
            randomness_power: 3.0,
            inside_color: Color::from_rgb_u32(0x00ff_6030),
            outside_color: Color::from_rgb_u32(0x001b_3984),
        }
    }
}

impl GalaxyParameters {
    /// Check every field the generator relies on.
    ///
    /// # Errors
    ///
    /// Returns the first [`GalaxyError`] found. A zero `count` is valid and
    /// produces an empty cloud.
    pub fn validate(&self) -> Result<(), GalaxyError> {
        if self.branches < 2 {
            return Err(GalaxyError::TooFewBranches(self.branches));
        }
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(GalaxyError::InvalidRadius(self.radius));
        }
        if !self.size.is_finite() || self.size <= 0.0 {
            return Err(GalaxyError::InvalidSize(self.size));
        }
        if !self.spin.is_finite() {
            return Err(GalaxyError::NonFinite("spin"));
        }
        if !self.randomness.is_finite() {
            return Err(GalaxyError::NonFinite("randomness"));
        }
        if self.randomness < 0.0 {
            return Err(GalaxyError::NegativeRandomness(self.randomness));
        }
        if !self.randomness_power.is_finite() {
            return Err(GalaxyError::NonFinite("randomness_power"));
        }
        if self.randomness_power <= 0.0 {
            return Err(GalaxyError::InvalidRandomnessPower(
                self.randomness_power,
            ));
        }
        Ok(())
    }

    /// Whether a change from `self` to `other` requires a new cloud.
    ///
    /// Every field feeds either the buffers or the material, so any
    /// difference triggers a full rebuild.
    #[must_use]
    pub fn needs_rebuild(&self, other: &Self) -> bool {
        self != other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let params = GalaxyParameters::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.inside_color.to_hex(), "#ff6030");
        assert_eq!(params.outside_color.to_hex(), "#1b3984");
    }

    #[test]
    fn rejects_zero_and_one_branch() {
        for branches in [0, 1] {
            let params = GalaxyParameters {
                branches,
                ..Default::default()
            };
            assert_eq!(
                params.validate(),
                Err(GalaxyError::TooFewBranches(branches))
            );
        }
    }

    #[test]
    fn rejects_degenerate_radius_and_size() {
        let params = GalaxyParameters {
            radius: 0.0,
            ..Default::default()
        };
        assert_eq!(params.validate(), Err(GalaxyError::InvalidRadius(0.0)));

        let params = GalaxyParameters {
            radius: f32::INFINITY,
            ..Default::default()
        };
        assert!(matches!(
            params.validate(),
            Err(GalaxyError::InvalidRadius(_))
        ));

        let params = GalaxyParameters {
            size: -0.5,
            ..Default::default()
        };
        assert_eq!(params.validate(), Err(GalaxyError::InvalidSize(-0.5)));
    }

    #[test]
    fn rejects_non_finite_and_negative_jitter() {
        let params = GalaxyParameters {
            spin: f32::NAN,
            ..Default::default()
        };
        assert_eq!(params.validate(), Err(GalaxyError::NonFinite("spin")));

        let params = GalaxyParameters {
            randomness: -0.1,
            ..Default::default()
        };
        assert_eq!(
            params.validate(),
            Err(GalaxyError::NegativeRandomness(-0.1))
        );
    }

    #[test]
    fn rejects_non_positive_randomness_power() {
        for power in [-60.0, -1.0, 0.0] {
            let params = GalaxyParameters {
                count: 1_000,
                randomness_power: power,
                ..Default::default()
            };
            assert_eq!(
                params.validate(),
                Err(GalaxyError::InvalidRandomnessPower(power))
            );
        }

        let params = GalaxyParameters {
            randomness_power: 0.5,
            ..Default::default()
        };
        assert!(params.validate().is_ok());
    }

    #[test]
    fn zero_count_is_valid() {
        let params = GalaxyParameters {
            count: 0,
            ..Default::default()
        };
        assert!(params.validate().is_ok());
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let params: GalaxyParameters = toml::from_str(
            r##"
branches = 5
inside_color = "#ffffff"
"##,
        )
        .unwrap();
        assert_eq!(params.branches, 5);
        assert_eq!(params.inside_color, Color::WHITE);
        assert_eq!(params.count, 100_000);
        assert_eq!(params.randomness_power, 3.0);
    }
}
