//! Orbit controls with inertial damping.
//!
//! The eye sits on a sphere around `target`. Input accumulates pending
//! deltas; [`OrbitControls::update`] applies them once per frame. With
//! damping on, each update applies `damping_factor` of what is pending and
//! keeps the rest, so motion eases out over the following frames.

use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};

use crate::options::CameraOptions;

/// Keeps `phi` off the poles where the view direction is parallel to up.
const POLE_EPSILON: f32 = 1e-6;

/// Pending motion below this is snapped to zero.
const REST_EPSILON: f32 = 1e-6;

/// Spherical pose around a target point.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Pose {
    target: Vec3,
    radius: f32,
    /// Azimuth around +Y, measured from +Z toward +X.
    theta: f32,
    /// Polar angle from +Y.
    phi: f32,
}

impl Pose {
    fn from_eye(eye: Vec3, target: Vec3) -> Self {
        let offset = eye - target;
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return Self {
                target,
                radius: 0.0,
                theta: 0.0,
                phi: PI / 2.0,
            };
        }
        Self {
            target,
            radius,
            theta: offset.x.atan2(offset.z),
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    fn eye(&self) -> Vec3 {
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        self.target
            + Vec3::new(sin_phi * sin_theta, cos_phi, sin_phi * cos_theta)
                * self.radius
    }
}

/// Mouse-driven orbit camera controls.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    pose: Pose,
    home: Pose,
    pending_theta: f32,
    pending_phi: f32,
    pending_pan: Vec3,
    pending_scale: f32,
    viewport_height: f32,
    fovy: f32,
    rotate_speed: f32,
    pan_speed: f32,
    zoom_speed: f32,
    enable_damping: bool,
    damping_factor: f32,
    min_distance: f32,
    max_distance: f32,
}

impl OrbitControls {
    /// Controls orbiting `target` from `eye`. The starting pose is kept for
    /// [`reset`](Self::reset).
    #[must_use]
    pub fn new(eye: Vec3, target: Vec3, options: &CameraOptions) -> Self {
        let pose = Pose::from_eye(eye, target);
        let mut controls = Self {
            pose,
            home: pose,
            pending_theta: 0.0,
            pending_phi: 0.0,
            pending_pan: Vec3::ZERO,
            pending_scale: 1.0,
            viewport_height: 1.0,
            fovy: options.fovy,
            rotate_speed: 1.0,
            pan_speed: 1.0,
            zoom_speed: 0.1,
            enable_damping: true,
            damping_factor: 0.05,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
        };
        controls.set_options(options);
        controls.pose.radius = controls.clamp_radius(controls.pose.radius);
        controls.home = controls.pose;
        controls
    }

    /// Apply speed, damping and distance settings. The current pose is
    /// kept.
    pub fn set_options(&mut self, options: &CameraOptions) {
        self.fovy = options.fovy;
        self.rotate_speed = options.rotate_speed;
        self.pan_speed = options.pan_speed;
        self.zoom_speed = options.zoom_speed.clamp(0.0, 0.95);
        self.enable_damping = options.enable_damping;
        self.damping_factor = options.damping_factor.clamp(0.0, 1.0);
        self.min_distance = options.min_distance.max(0.0);
        self.max_distance = options.max_distance.max(self.min_distance);
    }

    /// Height of the viewport in pixels; converts pixel drags to angles.
    pub fn set_viewport_height(&mut self, height: f32) {
        self.viewport_height = height.max(1.0);
    }

    /// Queue a rotation for a drag of `delta` pixels. A drag the full
    /// viewport height turns the camera once around.
    pub fn rotate(&mut self, delta: Vec2) {
        let scale = TAU * self.rotate_speed / self.viewport_height;
        self.pending_theta -= delta.x * scale;
        self.pending_phi -= delta.y * scale;
    }

    /// Queue a pan for a drag of `delta` pixels. The point under the cursor
    /// at target depth follows the cursor.
    pub fn pan(&mut self, delta: Vec2) {
        let eye = self.pose.eye();
        let forward = (self.pose.target - eye).normalize_or(Vec3::NEG_Z);
        let right = forward.cross(Vec3::Y).normalize_or(Vec3::X);
        let up = right.cross(forward);

        let visible_height =
            2.0 * self.pose.radius * (self.fovy.to_radians() / 2.0).tan();
        let scale = visible_height / self.viewport_height * self.pan_speed;
        self.pending_pan += (-right * delta.x + up * delta.y) * scale;
    }

    /// Queue a dolly. Positive `delta` (scroll lines) moves closer.
    pub fn zoom(&mut self, delta: f32) {
        self.pending_scale *= (1.0 - self.zoom_speed).powf(delta);
    }

    /// Apply pending motion. Returns `true` if the eye or target moved.
    pub fn update(&mut self) -> bool {
        let before = self.pose;
        let factor = if self.enable_damping {
            self.damping_factor
        } else {
            1.0
        };

        self.pose.theta += self.pending_theta * factor;
        self.pose.phi = (self.pose.phi + self.pending_phi * factor)
            .clamp(POLE_EPSILON, PI - POLE_EPSILON);
        self.pose.target += self.pending_pan * factor;
        self.pose.radius = self.clamp_radius(self.pose.radius * self.pending_scale);
        self.pending_scale = 1.0;

        if self.enable_damping {
            let keep = 1.0 - factor;
            self.pending_theta = settle(self.pending_theta * keep);
            self.pending_phi = settle(self.pending_phi * keep);
            self.pending_pan *= keep;
            if self.pending_pan.length_squared() < REST_EPSILON * REST_EPSILON {
                self.pending_pan = Vec3::ZERO;
            }
        } else {
            self.pending_theta = 0.0;
            self.pending_phi = 0.0;
            self.pending_pan = Vec3::ZERO;
        }

        self.pose != before
    }

    /// Whether any motion is still queued.
    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.pending_theta != 0.0
            || self.pending_phi != 0.0
            || self.pending_pan != Vec3::ZERO
            || self.pending_scale != 1.0
    }

    /// Return to the starting pose and drop pending motion.
    pub fn reset(&mut self) {
        self.pose = self.home;
        self.stop();
    }

    /// Jump to a new pose, which also becomes the reset pose.
    pub fn look_from(&mut self, eye: Vec3, target: Vec3) {
        self.pose = Pose::from_eye(eye, target);
        self.pose.radius = self.clamp_radius(self.pose.radius);
        self.home = self.pose;
        self.stop();
    }

    fn stop(&mut self) {
        self.pending_theta = 0.0;
        self.pending_phi = 0.0;
        self.pending_pan = Vec3::ZERO;
        self.pending_scale = 1.0;
    }

    fn clamp_radius(&self, radius: f32) -> f32 {
        radius.clamp(self.min_distance, self.max_distance)
    }

    /// Current eye position.
    #[must_use]
    pub fn eye(&self) -> Vec3 {
        self.pose.eye()
    }

    /// Current orbit center.
    #[must_use]
    pub fn target(&self) -> Vec3 {
        self.pose.target
    }

    /// Current distance from eye to target.
    #[must_use]
    pub fn distance(&self) -> f32 {
        self.pose.radius
    }
}

fn settle(value: f32) -> f32 {
    if value.abs() < REST_EPSILON {
        0.0
    } else {
        value
    }
}
