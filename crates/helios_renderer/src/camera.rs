//! Free-flying pinhole camera.

use helios_math::{EulerRot, Mat3, Mat4, Mat4Ext, Vec3};

/// Camera pose and derived view basis.
///
/// Movement and rotation mark the pose dirty; [`Camera::update`] (called
/// once per frame, after input) recomputes the basis vectors and the
/// cached camera-to-world matrix only when something changed.
#[derive(Debug, Clone)]
pub struct Camera {
    pub origin: Vec3,
    fov_angle: f32,

    total_yaw: f32,
    total_pitch: f32,

    pub forward: Vec3,
    pub right: Vec3,
    pub up: Vec3,

    camera_to_world: Mat4,
    moved: bool,
}

impl Camera {
    /// Field-of-view clamp range in degrees.
    pub const FOV_RANGE: (f32, f32) = (1.0, 179.0);

    pub fn new(origin: Vec3, fov_angle: f32) -> Self {
        let mut camera = Self {
            origin,
            fov_angle: fov_angle.clamp(Self::FOV_RANGE.0, Self::FOV_RANGE.1),
            total_yaw: 0.0,
            total_pitch: 0.0,
            forward: Vec3::Z,
            right: Vec3::X,
            up: Vec3::Y,
            camera_to_world: Mat4::IDENTITY,
            moved: true,
        };
        camera.update();
        camera
    }

    pub fn fov_angle(&self) -> f32 {
        self.fov_angle
    }

    /// Change the field of view, clamped to `[1, 179]` degrees.
    pub fn add_fov(&mut self, delta: f32) {
        self.fov_angle = (self.fov_angle + delta).clamp(Self::FOV_RANGE.0, Self::FOV_RANGE.1);
    }

    /// Move the camera by a world-space offset.
    pub fn translate(&mut self, offset: Vec3) {
        self.origin += offset;
        self.moved = true;
    }

    pub fn add_yaw(&mut self, delta: f32) {
        self.total_yaw += delta;
        self.moved = true;
    }

    pub fn add_pitch(&mut self, delta: f32) {
        self.total_pitch += delta;
        self.moved = true;
    }

    /// Recompute the view basis and camera-to-world matrix if the pose
    /// changed since the last update.
    pub fn update(&mut self) {
        if !self.moved {
            return;
        }
        self.moved = false;

        let rotation = Mat3::from_euler(EulerRot::YXZ, self.total_yaw, self.total_pitch, 0.0);
        self.forward = (rotation * Vec3::Z).normalize();
        self.right = Vec3::Y.cross(self.forward).normalize();
        self.up = self.forward.cross(self.right).normalize();

        self.camera_to_world = Mat4::from_cols(
            self.right.extend(0.0),
            self.up.extend(0.0),
            self.forward.extend(0.0),
            self.origin.extend(1.0),
        );
    }

    /// The cached camera-to-world matrix (valid after [`Camera::update`]).
    pub fn camera_to_world(&self) -> Mat4 {
        self.camera_to_world
    }
}
