//! Camera system for 3D rendering

use glam::{Mat4, Vec2, Vec3};

use crate::core::CameraSettings;
use crate::interaction::Ray;

/// Perspective camera for 3D rendering
#[derive(Debug, Clone)]
pub struct Camera {
    /// Camera position in world space
    pub position: Vec3,
    /// Direction the camera is looking at
    pub direction: Vec3,
    /// Up vector
    pub up: Vec3,
    /// Vertical field of view in radians
    pub fov: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
    /// Aspect ratio (width / height)
    pub aspect: f32,
}

impl Camera {
    /// Create a new camera with default settings
    pub fn new() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 5.0),
            direction: Vec3::NEG_Z,
            up: Vec3::Y,
            fov: std::f32::consts::FRAC_PI_4, // 45 degrees
            near: 0.1,
            far: 1000.0,
            aspect: 16.0 / 9.0,
        }
    }

    /// Create a camera from demo settings
    pub fn from_settings(settings: &CameraSettings) -> Self {
        Self {
            position: settings.position,
            direction: settings.direction.normalize_or(Vec3::NEG_Z),
            fov: settings.fov_degrees.to_radians(),
            near: settings.near,
            far: settings.far,
            ..Self::new()
        }
    }

    /// Get the view matrix
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.direction, self.up)
    }

    /// Get the projection matrix
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    /// Get combined view-projection matrix
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Update aspect ratio
    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width as f32 / height.max(1) as f32;
    }

    /// Ray from the camera through a point in normalized device coordinates
    pub fn screen_ray(&self, ndc: Vec2) -> Ray {
        let inverse = self.view_projection_matrix().inverse();
        let far = inverse.project_point3(Vec3::new(ndc.x, ndc.y, 1.0));
        Ray::new(self.position, far - self.position)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene_camera() -> Camera {
        let mut camera = Camera::from_settings(&CameraSettings::default());
        camera.set_aspect(1280, 720);
        camera
    }

    #[test]
    fn test_from_settings() {
        let camera = scene_camera();
        assert_eq!(camera.position, Vec3::new(0.0, 2.0, 4.0));
        assert!((camera.fov - 70.0_f32.to_radians()).abs() < 1e-6);
        assert_eq!(camera.near, 1.0);
        assert_eq!(camera.far, 100.0);
    }

    #[test]
    fn test_center_ray_looks_forward() {
        let camera = scene_camera();
        let ray = camera.screen_ray(Vec2::ZERO);
        assert_eq!(ray.origin, camera.position);
        assert!(ray.direction.dot(Vec3::NEG_Z) > 0.9999);
    }

    #[test]
    fn test_edge_rays_match_field_of_view() {
        let camera = scene_camera();
        let top = camera.screen_ray(Vec2::new(0.0, 1.0));
        let angle = top.direction.angle_between(camera.direction);
        assert!((angle - camera.fov / 2.0).abs() < 1e-3);
        assert!(top.direction.y > 0.0);

        let right = camera.screen_ray(Vec2::new(1.0, 0.0));
        assert!(right.direction.x > 0.0);
    }

    #[test]
    fn test_set_aspect_handles_zero_height() {
        let mut camera = Camera::new();
        camera.set_aspect(800, 0);
        assert_eq!(camera.aspect, 800.0);
    }
}
