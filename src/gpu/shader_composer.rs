use std::borrow::Cow;

use naga_oil::compose::{
    ComposableModuleDescriptor, Composer, ComposerError, NagaModuleDescriptor,
    ShaderLanguage, ShaderType,
};

/// Boxed so `Result`s carrying it stay small.
pub type ShaderError = Box<ComposerError>;

/// Shared WGSL module: source and the path reported in diagnostics.
struct ModuleDef {
    source: &'static str,
    file_path: &'static str,
}

/// Modules in dependency order.
const MODULES: &[ModuleDef] = &[ModuleDef {
    source: include_str!("../../assets/shaders/modules/camera.wgsl"),
    file_path: "modules/camera.wgsl",
}];

/// Wraps `naga_oil::compose::Composer` so shaders can
/// `#import nebula::camera` instead of repeating the camera uniform.
///
/// Produces `naga::Module` IR directly, skipping a WGSL re-parse when the
/// pipeline is created.
pub struct ShaderComposer {
    composer: Composer,
}

impl ShaderComposer {
    /// Register every shared module.
    ///
    /// # Errors
    ///
    /// Returns the composer error if a shared module fails to parse.
    pub fn new() -> Result<Self, ShaderError> {
        let mut composer = Composer::default();
        for m in MODULES {
            let _ = composer
                .add_composable_module(ComposableModuleDescriptor {
                    source: m.source,
                    file_path: m.file_path,
                    language: ShaderLanguage::Wgsl,
                    ..Default::default()
                })
                .map_err(Box::new)?;
        }
        Ok(Self { composer })
    }

    /// Compose `source` (which may contain `#import` directives) into a
    /// shader module.
    ///
    /// # Errors
    ///
    /// Returns the composer error if an import is missing or the WGSL is
    /// invalid.
    pub fn compose(
        &mut self,
        device: &wgpu::Device,
        label: &str,
        source: &str,
        file_path: &str,
    ) -> Result<wgpu::ShaderModule, ShaderError> {
        let naga_module = self.compose_naga(source, file_path)?;
        Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Naga(Cow::Owned(naga_module)),
        }))
    }

    /// Compose into naga IR without a device.
    ///
    /// # Errors
    ///
    /// Same as [`compose`](Self::compose).
    pub fn compose_naga(
        &mut self,
        source: &str,
        file_path: &str,
    ) -> Result<naga::Module, ShaderError> {
        self.composer
            .make_naga_module(NagaModuleDescriptor {
                source,
                file_path,
                shader_type: ShaderType::Wgsl,
                ..Default::default()
            })
            .map_err(Box::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const POINTS: &str = include_str!("../../assets/shaders/points.wgsl");

    #[test]
    fn points_shader_composes_with_both_entry_points() {
        let mut composer = ShaderComposer::new().unwrap();
        let module = composer.compose_naga(POINTS, "points.wgsl").unwrap();

        let names: Vec<&str> =
            module.entry_points.iter().map(|e| e.name.as_str()).collect();
        assert!(names.contains(&"vs_main"));
        assert!(names.contains(&"fs_main"));
    }

    #[test]
    fn composed_points_shader_validates() {
        let mut composer = ShaderComposer::new().unwrap();
        let module = composer.compose_naga(POINTS, "points.wgsl").unwrap();
        let mut validator = naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::default(),
        );
        let _info = validator.validate(&module).unwrap();
    }

    #[test]
    fn missing_import_is_an_error() {
        let mut composer = ShaderComposer::new().unwrap();
        let src = "#import nebula::nowhere\n@fragment fn fs_main() {}";
        assert!(composer.compose_naga(src, "broken.wgsl").is_err());
    }
}
