//! Crate-level error types.

use std::fmt;

use crate::galaxy::GalaxyError;
use crate::gpu::render_context::RenderContextError;
use crate::gpu::shader_composer::ShaderError;

/// Errors produced by the nebula crate.
#[derive(Debug)]
pub enum NebulaError {
    /// GPU context initialization failure.
    Gpu(RenderContextError),
    /// WGSL composition failure.
    Shader(String),
    /// Galaxy parameters rejected before generation.
    Galaxy(GalaxyError),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// TOML options parsing/serialization failure.
    OptionsParse(String),
    /// Viewer event-loop failure.
    Viewer(String),
}

impl fmt::Display for NebulaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
            Self::Shader(msg) => write!(f, "shader error: {msg}"),
            Self::Galaxy(e) => write!(f, "invalid galaxy parameters: {e}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::OptionsParse(msg) => {
                write!(f, "options parse error: {msg}")
            }
            Self::Viewer(msg) => write!(f, "viewer error: {msg}"),
        }
    }
}

impl std::error::Error for NebulaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gpu(e) => Some(e),
            Self::Galaxy(e) => Some(e),
            Self::Io(e) => Some(e),
            Self::Shader(_) | Self::OptionsParse(_) | Self::Viewer(_) => None,
        }
    }
}

impl From<RenderContextError> for NebulaError {
    fn from(e: RenderContextError) -> Self {
        Self::Gpu(e)
    }
}

impl From<ShaderError> for NebulaError {
    fn from(e: ShaderError) -> Self {
        Self::Shader(e.to_string())
    }
}

impl From<GalaxyError> for NebulaError {
    fn from(e: GalaxyError) -> Self {
        Self::Galaxy(e)
    }
}

impl From<std::io::Error> for NebulaError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use super::*;

    #[test]
    fn galaxy_errors_convert_and_chain() {
        let err: NebulaError = GalaxyError::TooFewBranches(0).into();
        assert_eq!(
            err.to_string(),
            "invalid galaxy parameters: galaxy needs at least 2 branches, got 0"
        );
        assert!(err.source().is_some());
        assert!(NebulaError::Viewer("closed".into()).source().is_none());
    }
}
