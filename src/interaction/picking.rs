//! Triangle-accurate picking against model geometry

use glam::{Mat4, Vec3};

use super::ray::Ray;

/// Local-space triangles of a pickable object
#[derive(Debug, Clone, Default)]
pub struct PickShape {
    triangles: Vec<[Vec3; 3]>,
    center: Vec3,
    radius: f32,
}

impl PickShape {
    /// Build from triangles already expressed in the object's local space
    pub fn from_triangles(triangles: Vec<[Vec3; 3]>) -> Self {
        let count = (triangles.len() * 3).max(1) as f32;
        let center = triangles.iter().flatten().copied().sum::<Vec3>() / count;
        let radius = triangles
            .iter()
            .flatten()
            .map(|p| p.distance(center))
            .fold(0.0, f32::max);

        Self {
            triangles,
            center,
            radius,
        }
    }

    /// Add indexed triangles transformed by `transform`
    pub fn extend_indexed(&mut self, positions: &[Vec3], indices: &[u32], transform: Mat4) {
        let mut triangles = std::mem::take(&mut self.triangles);
        for tri in indices.chunks_exact(3) {
            let fetch = |i: u32| positions.get(i as usize).map(|p| transform.transform_point3(*p));
            if let (Some(a), Some(b), Some(c)) = (fetch(tri[0]), fetch(tri[1]), fetch(tri[2])) {
                triangles.push([a, b, c]);
            }
        }
        *self = Self::from_triangles(triangles);
    }

    /// Number of triangles
    pub fn triangle_count(&self) -> usize {
        self.triangles.len()
    }

    /// Distance along `ray` to the nearest triangle, with the shape placed by `world`
    pub fn pick(&self, ray: &Ray, world: Mat4) -> Option<f32> {
        if self.triangles.is_empty() {
            return None;
        }

        let (scale, _, _) = world.to_scale_rotation_translation();
        let world_center = world.transform_point3(self.center);
        let world_radius = self.radius * scale.abs().max_element();
        ray.intersect_sphere(world_center, world_radius + 1e-4)?;

        // Keep the direction unnormalized so `t` stays a world-space distance
        let inverse = world.inverse();
        let local = Ray {
            origin: inverse.transform_point3(ray.origin),
            direction: inverse.transform_vector3(ray.direction),
        };

        self.triangles
            .iter()
            .filter_map(|[a, b, c]| local.intersect_triangle(*a, *b, *c))
            .min_by(f32::total_cmp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Quat;

    fn unit_square() -> PickShape {
        let positions = [
            Vec3::new(-1.0, -1.0, 0.0),
            Vec3::new(1.0, -1.0, 0.0),
            Vec3::new(1.0, 1.0, 0.0),
            Vec3::new(-1.0, 1.0, 0.0),
        ];
        let mut shape = PickShape::default();
        shape.extend_indexed(&positions, &[0, 1, 2, 2, 3, 0], Mat4::IDENTITY);
        shape
    }

    #[test]
    fn test_pick_placed_shape() {
        let shape = unit_square();
        assert_eq!(shape.triangle_count(), 2);

        let world = Mat4::from_translation(Vec3::new(0.6, 1.5, 1.5));
        let ray = Ray::new(Vec3::new(0.6, 1.5, 4.0), Vec3::NEG_Z);
        let t = shape.pick(&ray, world).unwrap();
        assert!((t - 2.5).abs() < 1e-5);
    }

    #[test]
    fn test_pick_respects_scale_and_rotation() {
        let shape = unit_square();
        let world = Mat4::from_scale_rotation_translation(
            Vec3::splat(0.24),
            Quat::from_rotation_y(-std::f32::consts::FRAC_PI_2),
            Vec3::new(0.0, 1.5, 0.0),
        );

        // Rotated a quarter turn, the square now faces +X and spans 0.24 in Z
        let hit = Ray::new(Vec3::new(3.0, 1.5, 0.2), Vec3::NEG_X);
        assert!((shape.pick(&hit, world).unwrap() - 3.0).abs() < 1e-4);

        let miss = Ray::new(Vec3::new(3.0, 1.5, 0.3), Vec3::NEG_X);
        assert!(shape.pick(&miss, world).is_none());
    }

    #[test]
    fn test_nearest_triangle_wins() {
        let shape = PickShape::from_triangles(vec![
            [
                Vec3::new(-1.0, -1.0, 0.0),
                Vec3::new(1.0, -1.0, 0.0),
                Vec3::new(0.0, 1.0, 0.0),
            ],
            [
                Vec3::new(-1.0, -1.0, 1.0),
                Vec3::new(1.0, -1.0, 1.0),
                Vec3::new(0.0, 1.0, 1.0),
            ],
        ]);
        let ray = Ray::new(Vec3::new(0.0, 0.0, 5.0), Vec3::NEG_Z);
        assert!((shape.pick(&ray, Mat4::IDENTITY).unwrap() - 4.0).abs() < 1e-5);
    }

    #[test]
    fn test_out_of_range_indices_are_skipped() {
        let mut shape = PickShape::default();
        shape.extend_indexed(&[Vec3::ZERO, Vec3::X, Vec3::Y], &[0, 1, 7], Mat4::IDENTITY);
        assert_eq!(shape.triangle_count(), 0);
        let ray = Ray::new(Vec3::Z, Vec3::NEG_Z);
        assert!(shape.pick(&ray, Mat4::IDENTITY).is_none());
    }
}
