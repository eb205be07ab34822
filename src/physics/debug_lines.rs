//! Wireframe geometry for colliders

use glam::{Mat4, Vec3};

use super::world::{BodyKind, ColliderOutline, Physics, ShapeOutline};

/// Segments used to approximate each circle of a sphere
const CIRCLE_SEGMENTS: usize = 24;

/// A coloured line segment in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    pub start: Vec3,
    pub end: Vec3,
    pub color: Vec3,
}

fn kind_color(kind: BodyKind) -> Vec3 {
    match kind {
        BodyKind::Fixed => Vec3::new(0.2, 0.9, 0.2),
        BodyKind::Dynamic => Vec3::new(0.9, 0.2, 0.2),
        BodyKind::Kinematic => Vec3::new(0.2, 0.5, 1.0),
    }
}

/// Wireframe of every collider in the world
pub fn collider_lines(physics: &Physics) -> Vec<LineSegment> {
    let mut lines = Vec::new();
    for outline in physics.collider_outlines() {
        outline_lines(&outline, &mut lines);
    }
    lines
}

/// Append the wireframe of one collider
pub fn outline_lines(outline: &ColliderOutline, out: &mut Vec<LineSegment>) {
    let color = kind_color(outline.kind);
    match outline.shape {
        ShapeOutline::Cuboid { half_extents } => {
            cuboid_lines(outline.transform, half_extents, color, out)
        }
        ShapeOutline::Ball { radius } => ball_lines(outline.transform, radius, color, out),
    }
}

fn cuboid_lines(transform: Mat4, he: Vec3, color: Vec3, out: &mut Vec<LineSegment>) {
    let corner = |i: usize| {
        let sign = |bit: usize| if i & bit != 0 { 1.0 } else { -1.0 };
        transform.transform_point3(Vec3::new(sign(1) * he.x, sign(2) * he.y, sign(4) * he.z))
    };

    // Corners differing in exactly one bit share an edge
    for i in 0..8 {
        for bit in [1, 2, 4] {
            if i & bit == 0 {
                out.push(LineSegment {
                    start: corner(i),
                    end: corner(i | bit),
                    color,
                });
            }
        }
    }
}

fn ball_lines(transform: Mat4, radius: f32, color: Vec3, out: &mut Vec<LineSegment>) {
    let axes = [(Vec3::X, Vec3::Y), (Vec3::Y, Vec3::Z), (Vec3::Z, Vec3::X)];
    for (u, v) in axes {
        let point = |k: usize| {
            let angle = std::f32::consts::TAU * k as f32 / CIRCLE_SEGMENTS as f32;
            transform.transform_point3((u * angle.cos() + v * angle.sin()) * radius)
        };
        for k in 0..CIRCLE_SEGMENTS {
            out.push(LineSegment {
                start: point(k),
                end: point(k + 1),
                color,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cuboid_has_twelve_unit_edges() {
        let outline = ColliderOutline {
            kind: BodyKind::Fixed,
            shape: ShapeOutline::Cuboid {
                half_extents: Vec3::splat(0.5),
            },
            transform: Mat4::from_translation(Vec3::new(0.0, 1.0, 0.0)),
        };
        let mut lines = Vec::new();
        outline_lines(&outline, &mut lines);

        assert_eq!(lines.len(), 12);
        for line in &lines {
            assert!(((line.end - line.start).length() - 1.0).abs() < 1e-5);
            assert!(line.start.y >= 0.5 - 1e-5 && line.start.y <= 1.5 + 1e-5);
        }
    }

    #[test]
    fn test_ball_points_lie_on_sphere() {
        let center = Vec3::new(-0.75, 3.0, 1.6);
        let outline = ColliderOutline {
            kind: BodyKind::Dynamic,
            shape: ShapeOutline::Ball { radius: 0.1 },
            transform: Mat4::from_translation(center),
        };
        let mut lines = Vec::new();
        outline_lines(&outline, &mut lines);

        assert_eq!(lines.len(), 3 * CIRCLE_SEGMENTS);
        for line in &lines {
            assert!(((line.start - center).length() - 0.1).abs() < 1e-5);
            assert_eq!(line.color, kind_color(BodyKind::Dynamic));
        }
    }

    #[test]
    fn test_world_lines_cover_all_colliders() {
        let mut physics = Physics::new();
        let body = physics.create_fixed_body(Vec3::ZERO, glam::Quat::IDENTITY);
        physics.add_box_collider(body, Vec3::ONE, None);
        physics.add_sphere_collider(body, 0.5, 1.0, None);

        assert_eq!(collider_lines(&physics).len(), 12 + 3 * CIRCLE_SEGMENTS);
    }
}
