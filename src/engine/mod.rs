//! The frame-driven engine: owns the GPU context, camera, point pass and
//! the live scene, and does one frame of work per host callback.

mod input;
mod options;
mod scene_management;

use self::scene_management::{initial_eye, render_size, SceneSlot, Upload};
use crate::camera::controller::CameraController;
use crate::error::NebulaError;
use crate::gpu::render_context::RenderContext;
use crate::gpu::shader_composer::ShaderComposer;
use crate::input::PointerState;
use crate::options::Options;
use crate::renderer::PointsPass;
use crate::scene::{DemoScene, SceneKind};
use crate::util::clock::Clock;
use crate::util::color::Color;
use crate::util::frame_timing::FrameTiming;

/// Something only the window owner can do, requested by the engine in
/// response to input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WindowRequest {
    /// Enter or leave borderless fullscreen.
    ToggleFullscreen,
}

/// Real-time point-cloud viewer engine.
///
/// The host calls [`update`](Self::update) and [`render`](Self::render)
/// once per frame, forwards window events through
/// [`handle_input`](Self::handle_input), and reports size changes through
/// [`resize`](Self::resize).
pub struct NebulaEngine {
    /// Device, queue and surface.
    pub context: RenderContext,
    /// Orbit camera and its GPU uniform.
    pub camera_controller: CameraController,
    /// Frame-rate gate and FPS readout.
    pub frame_timing: FrameTiming,
    points: PointsPass,
    slot: SceneSlot,
    options: Options,
    clock: Clock,
    pointer: PointerState,
    physical_size: (u32, u32),
    scale_factor: f64,
}

impl NebulaEngine {
    /// Create a surface for `window` and build the scene chosen in
    /// `options`.
    ///
    /// # Errors
    ///
    /// Returns [`NebulaError::Gpu`] if GPU initialization fails,
    /// [`NebulaError::Shader`] if the point shader does not compose, and
    /// [`NebulaError::Galaxy`] if the galaxy parameters are invalid.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        size: (u32, u32),
        scale_factor: f64,
        options: Options,
    ) -> Result<Self, NebulaError> {
        let pixel_ratio = options.display.pixel_ratio(scale_factor);
        let context =
            RenderContext::new(window, render_size(size, scale_factor, pixel_ratio))
                .await?;
        let mut engine = Self::new_from_context(context, scale_factor, options)?;
        engine.physical_size = size;
        Ok(engine)
    }

    /// Build the engine on a context the caller already created.
    ///
    /// # Errors
    ///
    /// Same as [`new`](Self::new), minus GPU initialization.
    pub fn new_from_context(
        context: RenderContext,
        scale_factor: f64,
        options: Options,
    ) -> Result<Self, NebulaError> {
        let slot = SceneSlot::new(options.scene, &options)?;
        let pixel_ratio = options.display.pixel_ratio(scale_factor);

        let camera_controller = CameraController::new(
            &context,
            initial_eye(options.scene),
            &options.camera,
            &options.display,
            pixel_ratio,
        );
        let mut composer = ShaderComposer::new()?;
        let points =
            PointsPass::new(&context, &camera_controller.layout, &mut composer)?;

        log::info!(
            "engine ready: {} scene, {}x{} at pixel ratio {pixel_ratio}",
            options.scene,
            context.config.width,
            context.config.height,
        );

        Ok(Self {
            physical_size: context.size(),
            frame_timing: FrameTiming::new(options.display.target_fps),
            context,
            camera_controller,
            points,
            slot,
            options,
            clock: Clock::new(),
            pointer: PointerState::new(),
            scale_factor,
        })
    }

    /// Advance time by `dt` seconds: animate the scene and step the orbit
    /// controls.
    pub fn update(&mut self, dt: f32) {
        self.clock.advance(dt);
        self.slot.update(self.clock.elapsed());
        let _ = self.camera_controller.update();
    }

    /// Draw a frame to the window surface and present it. Returns
    /// immediately when the frame-rate cap says it is too early.
    ///
    /// # Errors
    ///
    /// Returns [`wgpu::SurfaceError`] when the swapchain texture cannot be
    /// acquired. `Lost` and `Outdated` are fixed by calling
    /// [`resize`](Self::resize).
    pub fn render(&mut self) -> Result<(), wgpu::SurfaceError> {
        if !self.frame_timing.should_render() {
            return Ok(());
        }
        let frame = self.context.next_frame()?;
        let view = frame
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        self.draw(&view);
        frame.present();
        self.frame_timing.end_frame();
        Ok(())
    }

    fn draw(&mut self, view: &wgpu::TextureView) {
        self.flush_upload();
        self.camera_controller.update_gpu(&self.context.queue);

        let mut encoder = self.context.device.create_command_encoder(
            &wgpu::CommandEncoderDescriptor {
                label: Some("Nebula Encoder"),
            },
        );
        {
            let mut pass =
                encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                    label: Some("Points Pass"),
                    color_attachments: &[Some(
                        wgpu::RenderPassColorAttachment {
                            view,
                            resolve_target: None,
                            ops: wgpu::Operations {
                                load: wgpu::LoadOp::Clear(self.clear_color()),
                                store: wgpu::StoreOp::Store,
                            },
                            depth_slice: None,
                        },
                    )],
                    depth_stencil_attachment: None,
                    timestamp_writes: None,
                    occlusion_query_set: None,
                });
            self.points
                .draw(&mut pass, &self.camera_controller.bind_group);
        }
        let _ = self.context.queue.submit(std::iter::once(encoder.finish()));
    }

    fn flush_upload(&mut self) {
        let upload = self.slot.take_pending();
        let scene = self.slot.scene();
        let (cloud, size) = (scene.cloud(), scene.point_size());
        match upload {
            Upload::None => {}
            Upload::Write => self.points.write(&self.context, cloud, size),
            Upload::Replace => self.points.replace(&self.context, cloud, size),
        }
    }

    fn clear_color(&self) -> wgpu::Color {
        let mut color: Color = self.options.display.clear_color;
        if self.context.is_srgb() {
            color = color.to_linear();
        }
        wgpu::Color {
            r: f64::from(color.r),
            g: f64::from(color.g),
            b: f64::from(color.b),
            a: 1.0,
        }
    }

    /// Follow a window resize given in physical pixels. Zero sizes
    /// (minimized) are ignored.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.physical_size = (width, height);
        let (w, h) =
            render_size((width, height), self.scale_factor, self.pixel_ratio());
        self.context.resize(w, h);
        self.camera_controller.resize(w, h);
    }

    /// The window moved to a display with a different DPI.
    pub fn set_scale_factor(&mut self, scale_factor: f64) {
        self.scale_factor = scale_factor;
        self.camera_controller.set_pixel_ratio(self.pixel_ratio());
        let (w, h) = self.physical_size;
        self.resize(w, h);
    }

    /// Device scale factor capped by the display options.
    pub fn pixel_ratio(&self) -> f32 {
        self.options.display.pixel_ratio(self.scale_factor)
    }

    /// Current options.
    pub fn options(&self) -> &Options {
        &self.options
    }

    /// Scene on screen.
    pub fn scene(&self) -> &DemoScene {
        self.slot.scene()
    }

    /// Which scene is on screen.
    pub fn scene_kind(&self) -> SceneKind {
        self.slot.kind()
    }

    /// Points drawn per frame.
    pub fn point_count(&self) -> u32 {
        self.points.instance_count()
    }

    /// Seconds of animation time.
    pub fn elapsed(&self) -> f32 {
        self.clock.elapsed()
    }

    /// Smoothed frames per second.
    pub fn fps(&self) -> f32 {
        self.frame_timing.fps()
    }
}
