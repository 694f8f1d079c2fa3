use std::fmt;

/// Errors raised while bringing up the GPU.
#[derive(Debug)]
pub enum RenderContextError {
    /// The window handle could not back a surface.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No adapter can present to the surface.
    AdapterRequest(wgpu::RequestAdapterError),
    /// The adapter refused the requested limits or features.
    DeviceRequest(wgpu::RequestDeviceError),
    /// The adapter reports no usable configuration for the surface.
    UnsupportedSurface,
}

impl fmt::Display for RenderContextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SurfaceCreation(e) => {
                write!(f, "surface creation failed: {e}")
            }
            Self::AdapterRequest(e) => {
                write!(f, "no compatible GPU adapter found: {e}")
            }
            Self::DeviceRequest(e) => write!(f, "device request failed: {e}"),
            Self::UnsupportedSurface => {
                write!(f, "surface configuration not supported by adapter")
            }
        }
    }
}

impl std::error::Error for RenderContextError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::SurfaceCreation(e) => Some(e),
            Self::AdapterRequest(e) => Some(e),
            Self::DeviceRequest(e) => Some(e),
            Self::UnsupportedSurface => None,
        }
    }
}

/// Pick the swapchain format: the sRGB twin of `preferred` if the surface
/// offers it, otherwise any sRGB format, otherwise `preferred`.
///
/// Point colors are kept in linear light, so an sRGB target lets the
/// hardware do the encode.
fn pick_format(
    preferred: wgpu::TextureFormat,
    available: &[wgpu::TextureFormat],
) -> wgpu::TextureFormat {
    let twin = preferred.add_srgb_suffix();
    if available.contains(&twin) {
        return twin;
    }
    available
        .iter()
        .copied()
        .find(wgpu::TextureFormat::is_srgb)
        .unwrap_or(preferred)
}

/// Device, queue and the window surface the viewer presents to.
pub struct RenderContext {
    /// Logical device.
    pub device: wgpu::Device,
    /// Command queue.
    pub queue: wgpu::Queue,
    surface: wgpu::Surface<'static>,
    /// Current surface configuration.
    pub config: wgpu::SurfaceConfiguration,
}

impl RenderContext {
    /// Create a surface for `window` and configure it at `initial_size`
    /// pixels, vsynced, in an sRGB format when one is available.
    ///
    /// # Errors
    ///
    /// Returns [`RenderContextError`] naming the step that failed.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        initial_size: (u32, u32),
    ) -> Result<Self, RenderContextError> {
        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(window)
            .map_err(RenderContextError::SurfaceCreation)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                compatible_surface: Some(&surface),
                power_preference: wgpu::PowerPreference::HighPerformance,
                ..Default::default()
            })
            .await
            .map_err(RenderContextError::AdapterRequest)?;
        log::info!("using adapter {}", adapter.get_info().name);

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Nebula Device"),
                ..Default::default()
            })
            .await
            .map_err(RenderContextError::DeviceRequest)?;

        let (width, height) = (initial_size.0.max(1), initial_size.1.max(1));
        let mut config = surface
            .get_default_config(&adapter, width, height)
            .ok_or(RenderContextError::UnsupportedSurface)?;
        config.format = pick_format(
            config.format,
            &surface.get_capabilities(&adapter).formats,
        );
        config.present_mode = wgpu::PresentMode::AutoVsync;
        surface.configure(&device, &config);
        log::debug!("surface configured: {:?} {width}x{height}", config.format);

        Ok(Self {
            device,
            queue,
            surface,
            config,
        })
    }

    /// Surface texture format.
    pub fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Whether the surface encodes to sRGB on write.
    pub fn is_srgb(&self) -> bool {
        self.config.format.is_srgb()
    }

    /// Current surface size in pixels.
    pub fn size(&self) -> (u32, u32) {
        (self.config.width, self.config.height)
    }

    /// Reconfigure the surface. Zero sizes are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.config.width = width;
            self.config.height = height;
            self.surface.configure(&self.device, &self.config);
        }
    }

    /// Acquire the next swapchain texture.
    ///
    /// # Errors
    ///
    /// Returns [`wgpu::SurfaceError`] if the surface is lost, outdated or
    /// timed out.
    pub fn next_frame(
        &self,
    ) -> Result<wgpu::SurfaceTexture, wgpu::SurfaceError> {
        self.surface.get_current_texture()
    }
}

#[cfg(test)]
mod tests {
    use wgpu::TextureFormat;

    use super::*;

    #[test]
    fn prefers_srgb_twin_of_default() {
        let available = [
            TextureFormat::Rgba8UnormSrgb,
            TextureFormat::Bgra8Unorm,
            TextureFormat::Bgra8UnormSrgb,
        ];
        assert_eq!(
            pick_format(TextureFormat::Bgra8Unorm, &available),
            TextureFormat::Bgra8UnormSrgb
        );
    }

    #[test]
    fn falls_back_to_any_srgb_then_default() {
        assert_eq!(
            pick_format(
                TextureFormat::Rgb10a2Unorm,
                &[TextureFormat::Rgb10a2Unorm, TextureFormat::Rgba8UnormSrgb]
            ),
            TextureFormat::Rgba8UnormSrgb
        );
        assert_eq!(
            pick_format(
                TextureFormat::Bgra8Unorm,
                &[TextureFormat::Bgra8Unorm]
            ),
            TextureFormat::Bgra8Unorm
        );
    }
}
