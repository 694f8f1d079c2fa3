use glam::{Mat4, Vec3};

use crate::options::CameraOptions;

/// Perspective camera defined by eye position, target, and projection
/// parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Eye position in world space.
    pub eye: Vec3,
    /// Look-at target.
    pub target: Vec3,
    /// Up direction.
    pub up: Vec3,
    /// Viewport aspect ratio (width / height).
    pub aspect: f32,
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
}

impl Camera {
    /// Camera at `eye` looking at the origin, projection from `options`.
    #[must_use]
    pub fn new(eye: Vec3, aspect: f32, options: &CameraOptions) -> Self {
        Self {
            eye,
            target: Vec3::ZERO,
            up: Vec3::Y,
            aspect,
            fovy: options.fovy,
            znear: options.znear,
            zfar: options.zfar,
        }
    }

    /// Combined view-projection matrix.
    #[must_use]
    pub fn build_matrix(&self) -> Mat4 {
        self.build_projection() * self.build_view()
    }

    /// World-to-view matrix.
    #[must_use]
    pub fn build_view(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, self.up)
    }

    /// Projection matrix; `perspective_rh` already maps depth to [0, 1].
    #[must_use]
    pub fn build_projection(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fovy.to_radians(),
            self.aspect,
            self.znear,
            self.zfar,
        )
    }

    /// Follow a window resize. Zero heights are ignored.
    pub fn set_viewport(&mut self, width: u32, height: u32) {
        if height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }
}

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
/// GPU uniform: view-projection plus what the sprite shader needs to size
/// points in pixels. Layout matches `CameraUniform` in `camera.wgsl`.
pub struct CameraUniform {
    /// Combined view-projection matrix.
    pub view_proj: [[f32; 4]; 4],
    /// Eye position.
    pub position: [f32; 3],
    /// Render pixel ratio (device scale capped by the display options).
    pub pixel_ratio: f32,
    /// Framebuffer size in physical pixels.
    pub viewport: [f32; 2],
    /// Non-zero to shrink sprites with view depth.
    pub size_attenuation: u32,
    pub(crate) _pad: f32,
}

impl Default for CameraUniform {
    fn default() -> Self {
        Self::new()
    }
}

impl CameraUniform {
    /// Identity view-projection, 1x1 viewport, attenuation on.
    #[must_use]
    pub fn new() -> Self {
        Self {
            view_proj: Mat4::IDENTITY.to_cols_array_2d(),
            position: [0.0; 3],
            pixel_ratio: 1.0,
            viewport: [1.0, 1.0],
            size_attenuation: 1,
            _pad: 0.0,
        }
    }

    /// Copy the camera's current matrices and position.
    pub fn update_view_proj(&mut self, camera: &Camera) {
        self.view_proj = camera.build_matrix().to_cols_array_2d();
        self.position = camera.eye.to_array();
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec4Swizzles;

    use super::*;

    #[test]
    fn target_projects_to_screen_center() {
        let camera =
            Camera::new(Vec3::splat(3.0), 16.0 / 9.0, &CameraOptions::default());
        let clip = camera.build_matrix() * Vec3::ZERO.extend(1.0);
        let ndc = clip.xyz() / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!((0.0..=1.0).contains(&ndc.z));
    }

    #[test]
    fn clip_w_is_view_depth() {
        let camera =
            Camera::new(Vec3::new(0.0, 0.0, 3.0), 1.0, &CameraOptions::default());
        let clip = camera.build_matrix() * Vec3::new(0.5, 0.0, -2.0).extend(1.0);
        assert!((clip.w - 5.0).abs() < 1e-4);
    }

    #[test]
    fn resize_updates_aspect() {
        let mut camera = Camera::new(Vec3::Z, 1.0, &CameraOptions::default());
        camera.set_viewport(1920, 1080);
        assert!((camera.aspect - 16.0 / 9.0).abs() < 1e-6);
        camera.set_viewport(100, 0);
        assert!((camera.aspect - 16.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn uniform_matches_wgsl_layout() {
        assert_eq!(std::mem::size_of::<CameraUniform>(), 96);
        assert_eq!(std::mem::size_of::<CameraUniform>() % 16, 0);
    }
}
