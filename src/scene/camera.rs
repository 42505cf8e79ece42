use glam::{Mat4, Vec3};

/// Perspective camera looking at an explicit target point. Aspect ratio is
/// recomputed whenever the host viewport resizes.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    target: Vec3,
    aspect: f32,
    fovy_degrees: f32,
    znear: f32,
    zfar: f32,
}

impl Camera {
    /// Default rig: 75 degree field of view at (0, 2, 8), looking at the origin
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            position: Vec3::new(0.0, 2.0, 8.0),
            target: Vec3::ZERO,
            aspect: width as f32 / height.max(1) as f32,
            fovy_degrees: 75.0,
            znear: 0.1,
            zfar: 1000.0,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn aspect(&self) -> f32 {
        self.aspect
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(
            self.fovy_degrees.to_radians(),
            self.aspect,
            self.znear,
            self.zfar,
        )
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rig() {
        let camera = Camera::new(1280, 720);
        assert_eq!(camera.position, Vec3::new(0.0, 2.0, 8.0));
        assert_eq!(camera.target(), Vec3::ZERO);
        assert!((camera.aspect() - 1280.0 / 720.0).abs() < 1e-6);
    }

    #[test]
    fn test_resize_recomputes_aspect() {
        let mut camera = Camera::new(100, 100);
        camera.resize(200, 100);
        assert!((camera.aspect() - 2.0).abs() < 1e-6);

        // Degenerate height must not divide by zero
        camera.resize(200, 0);
        assert!(camera.aspect().is_finite());
    }

    #[test]
    fn test_view_matrix_transforms_target_forward() {
        let camera = Camera::new(100, 100);
        let target_in_view = camera.view_matrix().transform_point3(camera.target());
        // Looking down -Z in view space
        assert!(target_in_view.z < 0.0);
    }
}
