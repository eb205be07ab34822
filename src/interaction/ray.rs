//! Rays, planes and the intersection tests used for mouse picking

use glam::{Vec2, Vec3};

/// Tolerance below which a ray counts as parallel to a surface
const PARALLEL_EPSILON: f32 = 1e-8;

/// A half-line starting at `origin`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    /// Unit direction
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray, normalizing the direction
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.normalize_or_zero(),
        }
    }

    /// Point at distance `t` along the ray
    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }

    /// Intersection with a plane, if it lies in front of the origin
    pub fn intersect_plane(&self, plane: &Plane) -> Option<Vec3> {
        self.distance_to_plane(plane).map(|t| self.at(t))
    }

    /// Distance along the ray to a plane
    pub fn distance_to_plane(&self, plane: &Plane) -> Option<f32> {
        let denominator = plane.normal.dot(self.direction);

        if denominator.abs() < PARALLEL_EPSILON {
            // Parallel: only a ray lying in the plane touches it
            return (plane.distance_to_point(self.origin).abs() < PARALLEL_EPSILON).then_some(0.0);
        }

        let t = -(self.origin.dot(plane.normal) + plane.constant) / denominator;
        (t >= 0.0).then_some(t)
    }

    /// Möller–Trumbore ray/triangle test, both faces
    pub fn intersect_triangle(&self, a: Vec3, b: Vec3, c: Vec3) -> Option<f32> {
        let edge1 = b - a;
        let edge2 = c - a;
        let p = self.direction.cross(edge2);
        let det = edge1.dot(p);

        if det.abs() < PARALLEL_EPSILON {
            return None;
        }

        let inv_det = 1.0 / det;
        let s = self.origin - a;
        let u = s.dot(p) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = self.direction.dot(q) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = edge2.dot(q) * inv_det;
        (t >= 0.0).then_some(t)
    }

    /// Distance to the nearest intersection with a sphere, if any
    pub fn intersect_sphere(&self, center: Vec3, radius: f32) -> Option<f32> {
        let oc = self.origin - center;
        let b = oc.dot(self.direction);
        let c = oc.length_squared() - radius * radius;
        let discriminant = b * b - c;
        if discriminant < 0.0 {
            return None;
        }

        let root = discriminant.sqrt();
        let near = -b - root;
        let far = -b + root;
        if far < 0.0 {
            None
        } else {
            Some(near.max(0.0))
        }
    }
}

/// Plane `normal · p + constant = 0`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub constant: f32,
}

impl Plane {
    /// Create a plane from a normal and constant
    pub fn new(normal: Vec3, constant: f32) -> Self {
        Self {
            normal: normal.normalize_or_zero(),
            constant,
        }
    }

    /// Signed distance from the plane to a point
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.constant
    }
}

/// Convert a cursor position in pixels to normalized device coordinates
///
/// Left/right map to −1/1 and top/bottom to 1/−1.
pub fn cursor_to_ndc(cursor: Vec2, width: u32, height: u32) -> Vec2 {
    let width = width.max(1) as f32;
    let height = height.max(1) as f32;
    Vec2::new(cursor.x / width * 2.0 - 1.0, -(cursor.y / height) * 2.0 + 1.0)
}
