//! Box-built stand-ins used when a model file is missing

use glam::{Mat4, Vec3};

use super::model::{Model, ModelPart};
use crate::core::BodySettings;
use crate::renderer::{Material, Mesh};

fn box_part(name: &str, half_extents: Vec3, transform: Mat4, material: Material) -> ModelPart {
    ModelPart {
        name: Some(name.to_string()),
        transform,
        mesh: Mesh::cuboid(half_extents),
        material,
        base_color_image: None,
    }
}

/// Table top and net matching the static colliders, in world space
pub fn table_stand_in(bodies: &BodySettings) -> Model {
    let top = box_part(
        "table_top",
        bodies.table_half_extents,
        Mat4::from_rotation_translation(bodies.table_rotation(), bodies.table_position),
        Material::new(Vec3::new(0.05, 0.2, 0.45)).with_roughness(0.6),
    );
    let net = box_part(
        "net",
        bodies.net_half_extents,
        Mat4::from_translation(bodies.net_position),
        Material::new(Vec3::splat(0.9)),
    );

    Model {
        parts: vec![top, net],
    }
}

/// A paddle in model space: a flat blade and a handle below it.
///
/// The blade is thin along X, so the bat's yaw turns its face towards +Z. It
/// spans one unit each way so that the bat's model scale makes it as large as
/// the bat collider.
pub fn bat_stand_in() -> Model {
    let blade = box_part(
        "blade",
        Vec3::new(0.05, 1.0, 1.0),
        Mat4::IDENTITY,
        Material::new(Vec3::new(0.7, 0.05, 0.05)).with_roughness(0.5),
    );
    let handle = box_part(
        "handle",
        Vec3::new(0.12, 0.6, 0.15),
        Mat4::from_translation(Vec3::new(0.0, -1.6, 0.0)),
        Material::new(Vec3::new(0.55, 0.38, 0.2)),
    );

    Model {
        parts: vec![blade, handle],
    }
}
