//! Centralized runtime options with TOML preset support.
//!
//! All tweakable settings (galaxy shape, particle field, camera, display,
//! keybindings) are consolidated here. Options serialize to/from TOML for
//! presets stored in `assets/presets/`, and export a JSON schema so an
//! external panel can render sliders with the right ranges.

mod camera;
mod display;
mod keybindings;

use std::path::Path;

pub use camera::CameraOptions;
pub use display::DisplayOptions;
pub use keybindings::KeybindingOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::NebulaError;
use crate::galaxy::GalaxyParameters;
use crate::scene::{ParticleFieldParameters, SceneKind, SeedMode};

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[galaxy]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Scene shown at startup.
    #[schemars(skip)]
    pub scene: SceneKind,
    /// Seeding policy for galaxy regeneration.
    #[schemars(skip)]
    pub seed: SeedMode,
    /// Galaxy shape and colors.
    pub galaxy: GalaxyParameters,
    /// Particle field settings.
    pub particles: ParticleFieldParameters,
    /// Camera projection and control parameters.
    pub camera: CameraOptions,
    /// Framebuffer and material settings.
    pub display: DisplayOptions,
    /// Keyboard binding options.
    #[schemars(skip)]
    pub keybindings: KeybindingOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`NebulaError::Io`] if the file cannot be read and
    /// [`NebulaError::OptionsParse`] if it is not valid options TOML.
    pub fn load(path: &Path) -> Result<Self, NebulaError> {
        let content = std::fs::read_to_string(path).map_err(NebulaError::Io)?;
        Self::from_toml(&content)
    }

    /// Parse options from a TOML string. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`NebulaError::OptionsParse`] on malformed input.
    pub fn from_toml(content: &str) -> Result<Self, NebulaError> {
        toml::from_str(content)
            .map_err(|e| NebulaError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`NebulaError`] if serialization or the write fails.
    pub fn save(&self, path: &Path) -> Result<(), NebulaError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| NebulaError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(NebulaError::Io)?;
        }
        std::fs::write(path, content).map_err(NebulaError::Io)
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyAction;
    use crate::util::color::Color;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r##"
scene = "particle_field"
seed = { fixed = 42 }

[galaxy]
branches = 7
outside_color = "#ffffff"
"##;
        let opts = Options::from_toml(toml_str).unwrap();
        assert_eq!(opts.scene, SceneKind::ParticleField);
        assert_eq!(opts.seed, SeedMode::Fixed(42));
        assert_eq!(opts.galaxy.branches, 7);
        assert_eq!(opts.galaxy.outside_color, Color::WHITE);
        // Everything else should be default
        assert_eq!(opts.galaxy.count, 100_000);
        assert_eq!(opts.camera.fovy, 75.0);
        assert!(opts.display.size_attenuation);
        assert_eq!(opts.keybindings.lookup("KeyQ"), Some(KeyAction::ResetCamera));
    }

    #[test]
    fn malformed_toml_is_an_options_error() {
        let err = Options::from_toml("[galaxy]\ninside_color = \"nope\"")
            .unwrap_err();
        assert!(matches!(err, NebulaError::OptionsParse(_)));
    }

    #[test]
    fn pixel_ratio_is_capped() {
        let display = DisplayOptions::default();
        assert_eq!(display.pixel_ratio(1.0), 1.0);
        assert_eq!(display.pixel_ratio(1.5), 1.5);
        assert_eq!(display.pixel_ratio(3.0), 2.0);
    }

    #[test]
    fn save_then_load_and_list_presets() {
        let dir = std::env::temp_dir()
            .join(format!("nebula-presets-{}", std::process::id()));
        let mut opts = Options::default();
        opts.galaxy.spin = -1.5;
        opts.save(&dir.join("twisted.toml")).unwrap();
        std::fs::write(dir.join("notes.txt"), "ignored").unwrap();

        let loaded = Options::load(&dir.join("twisted.toml")).unwrap();
        assert_eq!(loaded.galaxy.spin, -1.5);
        assert_eq!(Options::list_presets(&dir), vec!["twisted".to_owned()]);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn shipped_presets_load_and_validate() {
        let dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/presets");
        let names = Options::list_presets(&dir);
        assert_eq!(names, vec!["default", "particles", "tight_spiral"]);

        for name in &names {
            let opts = Options::load(&dir.join(format!("{name}.toml"))).unwrap();
            opts.galaxy.validate().unwrap();
        }

        let particles = Options::load(&dir.join("particles.toml")).unwrap();
        assert_eq!(particles.scene, SceneKind::ParticleField);
        assert_eq!(
            particles.keybindings.lookup("Space"),
            Some(KeyAction::ToggleWobble)
        );
        assert_eq!(particles.keybindings.lookup("KeyW"), None);

        let spiral = Options::load(&dir.join("tight_spiral.toml")).unwrap();
        assert_eq!(spiral.seed, SeedMode::Fixed(1234));
        assert_eq!(spiral.galaxy.branches, 5);
        assert_eq!(spiral, Options::from_toml(&toml::to_string(&spiral).unwrap()).unwrap());
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        // UI-exposed sections should be present
        assert!(props.contains_key("galaxy"));
        assert!(props.contains_key("particles"));
        assert!(props.contains_key("camera"));
        assert!(props.contains_key("display"));

        // Skipped sections should be absent
        assert!(!props.contains_key("keybindings"));
        assert!(!props.contains_key("scene"));
        assert!(!props.contains_key("seed"));

        let galaxy = &props["galaxy"]["properties"];
        assert_eq!(galaxy["branches"]["minimum"], 2);
        assert_eq!(galaxy["branches"]["maximum"], 20);
        assert_eq!(galaxy["inside_color"]["type"], "string");
        assert!(props["camera"]["properties"].get("znear").is_none());
    }
}
