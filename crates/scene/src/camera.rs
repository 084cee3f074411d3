use glam::{Mat4, Vec3};
use gridscene_common::{CameraConfig, wrap_degrees};

/// First-person camera with spherical orientation coordinates.
///
/// `phi` is the polar angle measured from the +Y axis and `theta` the
/// azimuth about Y, both in degrees. `theta` wraps (a full rotation is
/// valid); `phi` clamps strictly inside (0, 180) so `forward` never
/// becomes collinear with world-up.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    phi: f32,
    theta: f32,
    rotation_speed: f32,
    phi_min: f32,
    phi_max: f32,
    forward: Vec3,
    right: Vec3,
    up: Vec3,
    view: Mat4,
}

impl Camera {
    /// Build a camera from validated configuration and compute its
    /// initial basis and view matrix.
    pub fn new(config: &CameraConfig) -> Self {
        let mut camera = Self {
            position: Vec3::from_array(config.position),
            phi: config.phi_degrees,
            theta: wrap_degrees(config.theta_degrees),
            rotation_speed: config.rotation_speed,
            phi_min: config.phi_min,
            phi_max: config.phi_max,
            forward: Vec3::ZERO,
            right: Vec3::ZERO,
            up: Vec3::ZERO,
            view: Mat4::IDENTITY,
        };
        camera.update();
        camera
    }

    pub fn phi(&self) -> f32 {
        self.phi
    }

    pub fn theta(&self) -> f32 {
        self.theta
    }

    pub fn forward(&self) -> Vec3 {
        self.forward
    }

    pub fn right(&self) -> Vec3 {
        self.right
    }

    pub fn up(&self) -> Vec3 {
        self.up
    }

    pub fn view(&self) -> Mat4 {
        self.view
    }

    /// Mouse-look: azimuth wraps mod 360, polar angle clamps to the
    /// configured bounds. The basis is stale until the next `update`.
    pub fn spin(&mut self, dx: f32, dy: f32) {
        self.theta = wrap_degrees(self.theta + dx * self.rotation_speed);
        self.phi = (self.phi + dy * self.rotation_speed).clamp(self.phi_min, self.phi_max);
    }

    /// Move along the current basis. Both terms apply, so strafing while
    /// moving forward is additive.
    pub fn advance(&mut self, forward_amount: f32, right_amount: f32) {
        self.position += self.forward * forward_amount + self.right * right_amount;
    }

    /// Recompute `forward`/`right`/`up` and the view matrix from the
    /// current spherical coordinates and position.
    pub fn update(&mut self) {
        let phi = self.phi.to_radians();
        let theta = self.theta.to_radians();
        // Z is negated so theta = 0 looks down -Z.
        self.forward = Vec3::new(
            theta.sin() * phi.sin(),
            phi.cos(),
            -theta.cos() * phi.sin(),
        )
        .normalize();
        self.right = self.forward.cross(Vec3::Y).normalize();
        self.up = self.right.cross(self.forward).normalize();
        self.view = Mat4::look_at_rh(self.position, self.position + self.forward, self.up);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> Camera {
        Camera::new(&CameraConfig::default())
    }

    #[test]
    fn default_looks_down_negative_z() {
        let cam = camera();
        assert!(cam.forward().abs_diff_eq(Vec3::NEG_Z, 1e-6));
        assert!(cam.right().abs_diff_eq(Vec3::X, 1e-6));
        assert!(cam.up().abs_diff_eq(Vec3::Y, 1e-6));
    }

    #[test]
    fn basis_is_orthonormal_after_spin() {
        let mut cam = camera();
        cam.spin(173.0, -41.0);
        cam.update();
        assert!((cam.forward().length() - 1.0).abs() < 1e-5);
        assert!(cam.forward().dot(cam.right()).abs() < 1e-5);
        assert!(cam.forward().dot(cam.up()).abs() < 1e-5);
        assert!(cam.right().dot(cam.up()).abs() < 1e-5);
    }

    #[test]
    fn phi_clamps_to_bounds() {
        let mut cam = camera();
        // rotation_speed is 0.05, so push hard both ways.
        cam.spin(0.0, 1e6);
        assert_eq!(cam.phi(), 178.0);
        cam.spin(0.0, -1e7);
        assert_eq!(cam.phi(), 5.0);
    }

    #[test]
    fn phi_bounds_are_stable_under_repeated_spins() {
        let mut cam = camera();
        for _ in 0..100 {
            cam.spin(0.0, 1e6);
        }
        assert_eq!(cam.phi(), 178.0);
        for _ in 0..100 {
            cam.spin(0.0, -1e6);
        }
        assert_eq!(cam.phi(), 5.0);
    }

    #[test]
    fn theta_wraps_into_range() {
        let mut cam = camera();
        // 0.05 deg per unit: 7200 units = 360 degrees, wraps to 0.
        cam.spin(7200.0, 0.0);
        assert!(cam.theta().abs() < 1e-3);
        cam.spin(-100.0, 0.0);
        assert!((0.0..360.0).contains(&cam.theta()));
    }

    #[test]
    fn zero_spin_leaves_forward_unchanged() {
        let mut cam = camera();
        let before = cam.forward();
        for _ in 0..10 {
            cam.spin(0.0, 0.0);
            cam.advance(0.0, 0.0);
            cam.update();
        }
        assert_eq!(cam.forward(), before);
    }

    #[test]
    fn advance_is_additive() {
        let mut cam = camera();
        let start = cam.position;
        cam.advance(2.0, 3.0);
        let expected = start + cam.forward() * 2.0 + cam.right() * 3.0;
        assert!(cam.position.abs_diff_eq(expected, 1e-6));
    }

    #[test]
    fn view_matrix_places_target_in_front() {
        let mut cam = camera();
        cam.spin(500.0, 200.0);
        cam.update();
        let target = cam.position + cam.forward();
        let in_view = cam.view().transform_point3(target);
        assert!(in_view.z < 0.0);
    }
}
