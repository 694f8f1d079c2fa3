use glam::{Vec2, Vec3};
use wgpu::util::DeviceExt;

use crate::camera::core::{Camera, CameraUniform};
use crate::camera::orbit::OrbitControls;
use crate::gpu::pipeline_helpers;
use crate::gpu::render_context::RenderContext;
use crate::options::{CameraOptions, DisplayOptions};

/// Couples [`OrbitControls`] to a [`Camera`] and keeps the GPU uniform in
/// sync with both.
pub struct CameraController {
    /// Projection and current pose.
    pub camera: Camera,
    /// Mouse-driven orbit state.
    pub controls: OrbitControls,
    /// CPU copy of the uniform.
    pub uniform: CameraUniform,
    /// Uniform buffer (group 0, binding 0).
    pub buffer: wgpu::Buffer,
    /// Layout shared by every pipeline that reads the camera.
    pub layout: wgpu::BindGroupLayout,
    /// Bind group for `buffer`.
    pub bind_group: wgpu::BindGroup,
}

impl CameraController {
    /// Camera at `eye` looking at the origin.
    pub fn new(
        context: &RenderContext,
        eye: Vec3,
        options: &CameraOptions,
        display: &DisplayOptions,
        pixel_ratio: f32,
    ) -> Self {
        let (width, height) = context.size();
        let camera = Camera::new(eye, width as f32 / height as f32, options);
        let mut controls = OrbitControls::new(eye, camera.target, options);
        controls.set_viewport_height(height as f32);

        let mut uniform = CameraUniform::new();
        uniform.update_view_proj(&camera);
        uniform.viewport = [width as f32, height as f32];
        uniform.pixel_ratio = pixel_ratio;
        uniform.size_attenuation = u32::from(display.size_attenuation);

        let buffer = context.device.create_buffer_init(
            &wgpu::util::BufferInitDescriptor {
                label: Some("Camera Buffer"),
                contents: bytemuck::cast_slice(&[uniform]),
                usage: wgpu::BufferUsages::UNIFORM
                    | wgpu::BufferUsages::COPY_DST,
            },
        );

        let layout = context.device.create_bind_group_layout(
            &wgpu::BindGroupLayoutDescriptor {
                label: Some("Camera Bind Group Layout"),
                entries: &[pipeline_helpers::uniform_buffer(0)],
            },
        );

        let bind_group =
            context.device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("Camera Bind Group"),
                layout: &layout,
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: buffer.as_entire_binding(),
                }],
            });

        Self {
            camera,
            controls,
            uniform,
            buffer,
            layout,
            bind_group,
        }
    }

    /// Step the controls and mirror the pose onto the camera. Returns
    /// `true` if the view changed.
    pub fn update(&mut self) -> bool {
        let moved = self.controls.update();
        if moved {
            self.camera.eye = self.controls.eye();
            self.camera.target = self.controls.target();
        }
        moved
    }

    /// Upload the uniform.
    pub fn update_gpu(&mut self, queue: &wgpu::Queue) {
        self.uniform.update_view_proj(&self.camera);
        queue.write_buffer(&self.buffer, 0, bytemuck::cast_slice(&[self.uniform]));
    }

    /// Follow a framebuffer resize (physical pixels).
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.camera.set_viewport(width, height);
        self.controls.set_viewport_height(height as f32);
        self.uniform.viewport = [width as f32, height as f32];
        log::debug!("camera viewport {width}x{height}, aspect {:.3}", self.camera.aspect);
    }

    /// Render pixel ratio used for unattenuated sprites.
    pub fn set_pixel_ratio(&mut self, pixel_ratio: f32) {
        self.uniform.pixel_ratio = pixel_ratio;
    }

    /// Apply projection and control settings in place.
    pub fn set_options(
        &mut self,
        options: &CameraOptions,
        display: &DisplayOptions,
    ) {
        self.camera.fovy = options.fovy;
        self.camera.znear = options.znear;
        self.camera.zfar = options.zfar;
        self.controls.set_options(options);
        self.uniform.size_attenuation = u32::from(display.size_attenuation);
    }

    /// Queue an orbit rotation for a drag of `delta` pixels.
    pub fn rotate(&mut self, delta: Vec2) {
        self.controls.rotate(delta);
    }

    /// Queue a pan for a drag of `delta` pixels.
    pub fn pan(&mut self, delta: Vec2) {
        self.controls.pan(delta);
    }

    /// Queue a dolly of `delta` scroll lines.
    pub fn zoom(&mut self, delta: f32) {
        self.controls.zoom(delta);
    }

    /// Back to the starting pose.
    pub fn reset(&mut self) {
        self.controls.reset();
        self.sync_pose();
    }

    /// Jump to `eye` looking at the origin; this becomes the reset pose.
    pub fn look_from(&mut self, eye: Vec3) {
        self.controls.look_from(eye, Vec3::ZERO);
        self.sync_pose();
    }

    fn sync_pose(&mut self) {
        self.camera.eye = self.controls.eye();
        self.camera.target = self.controls.target();
    }
}
