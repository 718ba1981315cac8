// Perspective camera shared by the renderer, the orbit controls and the
// label overlay.
//
// The camera is right-handed with +Y up. Projection uses the wgpu depth
// range, which leaves the x/y normalized device coordinates unchanged.

use glam::{Mat4, Vec3};

use crate::core::constants::{CAMERA_FAR, CAMERA_FOV_Y_DEGREES, CAMERA_NEAR, CAMERA_START};

#[derive(Clone, Debug, PartialEq)]
pub struct PerspectiveCamera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov_y_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl PerspectiveCamera {
    pub fn new(fov_y_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            target: Vec3::ZERO,
            up: Vec3::Y,
            fov_y_degrees,
            aspect,
            near,
            far,
        }
    }

    /// The lab camera: 30° vertical field of view at (3, 2, -5), looking at the origin.
    pub fn lab_default(aspect: f32) -> Self {
        let mut camera = Self::new(CAMERA_FOV_Y_DEGREES, aspect, CAMERA_NEAR, CAMERA_FAR);
        camera.position = Vec3::from(CAMERA_START);
        camera
    }

    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    /// Recompute the aspect ratio from a viewport size. A zero height leaves it unchanged.
    pub fn set_aspect(&mut self, width: f32, height: f32) {
        if height > 0.0 && width > 0.0 {
            self.aspect = width / height;
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fov_y_degrees.to_radians(),
            self.aspect,
            self.near,
            self.far,
        )
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}
