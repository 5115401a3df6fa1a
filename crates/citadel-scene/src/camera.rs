use std::f32::consts::{FRAC_PI_4, PI};

use glam::{Mat4, Vec3};

/// Orbit camera around the origin in spherical coordinates.
///
/// `theta` is the azimuth in the XZ plane, `phi` the polar angle from +Y.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OrbitCamera {
    pub theta: f32,
    pub phi: f32,
    pub radius: f32,
}

impl OrbitCamera {
    /// Radians of rotation per pixel of drag (a quarter degree).
    pub const ORBIT_PER_PIXEL: f32 = 0.25 * PI / 180.0;
    /// Radius change per pixel of drag.
    pub const ZOOM_PER_PIXEL: f32 = 0.05;

    pub const MIN_PHI: f32 = 0.1;
    pub const MAX_PHI: f32 = PI - 0.1;
    pub const MIN_RADIUS: f32 = 5.0;
    pub const MAX_RADIUS: f32 = 150.0;

    /// Rotates around the target by a drag of `(dx, dy)` pixels.
    pub fn orbit(&mut self, dx: f32, dy: f32) {
        self.theta += dx * Self::ORBIT_PER_PIXEL;
        self.phi = (self.phi + dy * Self::ORBIT_PER_PIXEL).clamp(Self::MIN_PHI, Self::MAX_PHI);
    }

    /// Moves toward or away from the target. Dragging right or up moves away.
    pub fn zoom(&mut self, dx: f32, dy: f32) {
        let delta = (dx - dy) * Self::ZOOM_PER_PIXEL;
        self.radius = (self.radius + delta).clamp(Self::MIN_RADIUS, Self::MAX_RADIUS);
    }

    pub fn eye(&self) -> Vec3 {
        let (sin_phi, cos_phi) = self.phi.sin_cos();
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        Vec3::new(
            self.radius * sin_phi * cos_theta,
            self.radius * cos_phi,
            self.radius * sin_phi * sin_theta,
        )
    }

    /// Left-handed look-at toward the origin with +Y up.
    pub fn view(&self) -> Mat4 {
        Mat4::look_at_lh(self.eye(), Vec3::ZERO, Vec3::Y)
    }
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            theta: 1.5 * PI,
            phi: 0.2 * PI,
            radius: 65.0,
        }
    }
}

/// Left-handed perspective projection with a `[0, 1]` depth range.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Projection {
    pub fov_y: f32,
    pub near: f32,
    pub far: f32,
}

impl Projection {
    pub fn matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_lh(self.fov_y, aspect.max(f32::EPSILON), self.near, self.far)
    }
}

impl Default for Projection {
    fn default() -> Self {
        Self {
            fov_y: FRAC_PI_4,
            near: 1.0,
            far: 1000.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn in_bounds(cam: &OrbitCamera) -> bool {
        (OrbitCamera::MIN_PHI..=OrbitCamera::MAX_PHI).contains(&cam.phi)
            && (OrbitCamera::MIN_RADIUS..=OrbitCamera::MAX_RADIUS).contains(&cam.radius)
    }

    #[test]
    fn drags_never_leave_the_clamped_range() {
        let mut cam = OrbitCamera::default();
        let drags = [
            (0.0, 5000.0),
            (120.0, -9000.0),
            (-3.0, 4.0),
            (10_000.0, 0.0),
            (0.0, -10_000.0),
        ];
        for (dx, dy) in drags {
            cam.orbit(dx, dy);
            assert!(in_bounds(&cam));
            cam.zoom(dx, dy);
            assert!(in_bounds(&cam));
        }
    }

    #[test]
    fn zoom_uses_difference_of_axes() {
        let mut cam = OrbitCamera::default();
        cam.zoom(20.0, 0.0);
        assert!((cam.radius - 66.0).abs() < 1e-4);
        cam.zoom(0.0, 20.0);
        assert!((cam.radius - 65.0).abs() < 1e-4);
    }

    #[test]
    fn default_eye_sits_in_front_of_the_castle() {
        let eye = OrbitCamera::default().eye();
        assert!((eye.length() - 65.0).abs() < 1e-3);
        assert!(eye.z < 0.0 && eye.y > 0.0);
        assert!(eye.x.abs() < 1e-3);
    }

    #[test]
    fn view_maps_origin_onto_the_forward_axis() {
        let cam = OrbitCamera::default();
        let p = cam.view().transform_point3(Vec3::ZERO);
        assert!(p.x.abs() < 1e-3 && p.y.abs() < 1e-3);
        assert!((p.z - cam.radius).abs() < 1e-3);
    }

    #[test]
    fn projection_maps_near_and_far_to_unit_depth() {
        let proj = Projection::default().matrix(16.0 / 9.0);
        let near = proj.project_point3(Vec3::new(0.0, 0.0, 1.0));
        let far = proj.project_point3(Vec3::new(0.0, 0.0, 1000.0));
        assert!(near.z.abs() < 1e-5);
        assert!((far.z - 1.0).abs() < 1e-5);
    }
}
