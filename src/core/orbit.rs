// Orbit camera controls: drag to rotate about a target, wheel or pinch to zoom.
//
// Input handlers only accumulate deltas; `update` folds them into the camera
// once per frame, applying damping and the angle/distance limits.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use crate::core::camera::PerspectiveCamera;
use crate::core::constants::*;

const POLAR_EPS: f32 = 1e-6;

/// Spherical coordinates around the target: `theta` is the azimuth from +Z
/// towards +X, `phi` is the polar angle from +Y.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Spherical {
    pub radius: f32,
    pub phi: f32,
    pub theta: f32,
}

impl Spherical {
    pub fn from_offset(v: Vec3) -> Self {
        let radius = v.length();
        if radius == 0.0 {
            return Self::default();
        }
        Self {
            radius,
            theta: v.x.atan2(v.z),
            phi: (v.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    pub fn to_offset(self) -> Vec3 {
        let sin_phi_radius = self.phi.sin() * self.radius;
        Vec3::new(
            sin_phi_radius * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_radius * self.theta.cos(),
        )
    }

    fn make_safe(&mut self) {
        self.phi = self.phi.clamp(POLAR_EPS, PI - POLAR_EPS);
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct OrbitSettings {
    pub target: Vec3,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    pub min_azimuth_angle: f32,
    pub max_azimuth_angle: f32,
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self {
            target: Vec3::from(ORBIT_TARGET),
            enable_damping: true,
            damping_factor: ORBIT_DAMPING_FACTOR,
            rotate_speed: ORBIT_ROTATE_SPEED,
            zoom_speed: ORBIT_ZOOM_SPEED,
            min_distance: ORBIT_MIN_DISTANCE,
            max_distance: ORBIT_MAX_DISTANCE,
            min_polar_angle: ORBIT_MIN_POLAR,
            max_polar_angle: ORBIT_MAX_POLAR,
            min_azimuth_angle: ORBIT_MIN_AZIMUTH,
            max_azimuth_angle: ORBIT_MAX_AZIMUTH,
        }
    }
}

#[derive(Clone, Debug)]
pub struct OrbitControls {
    pub settings: OrbitSettings,
    delta: Spherical,
    scale: f32,
    pinch_distance: Option<f32>,
}

impl OrbitControls {
    pub fn new(settings: OrbitSettings) -> Self {
        Self {
            settings,
            delta: Spherical::default(),
            scale: 1.0,
            pinch_distance: None,
        }
    }

    #[inline]
    fn zoom_scale(&self) -> f32 {
        0.95_f32.powf(self.settings.zoom_speed)
    }

    pub fn rotate_left(&mut self, angle: f32) {
        self.delta.theta -= angle;
    }

    pub fn rotate_up(&mut self, angle: f32) {
        self.delta.phi -= angle;
    }

    /// Pointer drag by `(dx, dy)` pixels on an element `element_height` pixels tall.
    /// A full element height of horizontal travel turns the camera once around at speed 1.
    pub fn rotate_by_pixels(&mut self, dx: f32, dy: f32, element_height: f32) {
        if element_height <= 0.0 {
            return;
        }
        let speed = self.settings.rotate_speed;
        self.rotate_left(TAU * dx * speed / element_height);
        self.rotate_up(TAU * dy * speed / element_height);
    }

    pub fn dolly_in(&mut self, factor: f32) {
        if factor > 0.0 {
            self.scale *= factor;
        }
    }

    pub fn dolly_out(&mut self, factor: f32) {
        if factor > 0.0 {
            self.scale /= factor;
        }
    }

    /// Wheel input; negative `delta_y` (scrolling up) moves the camera closer.
    pub fn dolly_wheel(&mut self, delta_y: f32) {
        let zoom = self.zoom_scale();
        if delta_y < 0.0 {
            self.dolly_in(zoom);
        } else if delta_y > 0.0 {
            self.dolly_out(zoom);
        }
    }

    pub fn pinch_start(&mut self, distance: f32) {
        self.pinch_distance = (distance > 0.0).then_some(distance);
    }

    /// Spreading two fingers apart moves the camera closer.
    pub fn pinch_move(&mut self, distance: f32) {
        let Some(start) = self.pinch_distance else {
            self.pinch_start(distance);
            return;
        };
        if distance <= 0.0 {
            return;
        }
        let ratio = (distance / start).powf(self.settings.zoom_speed);
        self.dolly_out(ratio);
        self.pinch_distance = Some(distance);
    }

    pub fn pinch_end(&mut self) {
        self.pinch_distance = None;
    }

    /// Fold pending input into the camera. Returns true when the camera moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        let s = &self.settings;
        let target = s.target;
        let mut spherical = Spherical::from_offset(camera.position - target);

        if s.enable_damping {
            spherical.theta += self.delta.theta * s.damping_factor;
            spherical.phi += self.delta.phi * s.damping_factor;
        } else {
            spherical.theta += self.delta.theta;
            spherical.phi += self.delta.phi;
        }

        spherical.theta = clamp_azimuth(spherical.theta, s.min_azimuth_angle, s.max_azimuth_angle);
        spherical.phi = spherical.phi.max(s.min_polar_angle).min(s.max_polar_angle);
        spherical.make_safe();
        spherical.radius = (spherical.radius * self.scale).clamp(s.min_distance, s.max_distance);

        let previous = camera.position;
        camera.position = target + spherical.to_offset();
        camera.look_at(target);

        if s.enable_damping {
            self.delta.theta *= 1.0 - s.damping_factor;
            self.delta.phi *= 1.0 - s.damping_factor;
        } else {
            self.delta = Spherical::default();
        }
        self.scale = 1.0;

        previous.distance_squared(camera.position) > f32::EPSILON
    }
}

/// Clamp an azimuth to `[min, max]` where either bound may lie outside
/// `[-pi, pi]`; the allowed arc may wrap through ±pi.
pub fn clamp_azimuth(theta: f32, min: f32, max: f32) -> f32 {
    if !(min.is_finite() && max.is_finite()) {
        return theta;
    }
    let wrap = |a: f32| {
        if a < -PI {
            a + TAU
        } else if a > PI {
            a - TAU
        } else {
            a
        }
    };
    let (min, max) = (wrap(min), wrap(max));
    let theta = if (-PI..=PI).contains(&theta) {
        theta
    } else {
        (theta + PI).rem_euclid(TAU) - PI
    };
    if min <= max {
        theta.max(min).min(max)
    } else if theta > (min + max) / 2.0 {
        theta.max(min)
    } else {
        theta.min(max)
    }
}
